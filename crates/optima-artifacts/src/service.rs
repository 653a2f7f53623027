//! Document dispatch and persistence.

use std::sync::Arc;

use metrics::counter;
use tracing::{info, instrument};

use optima_core::ids::DocumentId;
use optima_store::pool::StorePool;
use optima_store::repositories::DocumentRepo;
use optima_store::row_types::DocumentRow;

use crate::DOCUMENT_GENERATIONS_TOTAL;
use crate::errors::{ArtifactError, Result};
use crate::handler::HandlerRegistry;
use crate::writer::DeltaWriter;

/// Dispatches document requests to handlers and persists the results.
#[derive(Clone)]
pub struct ArtifactService {
    registry: Arc<HandlerRegistry>,
    pool: StorePool,
}

impl ArtifactService {
    /// New service over a registry and store.
    #[must_use]
    pub fn new(registry: Arc<HandlerRegistry>, pool: StorePool) -> Self {
        Self { registry, pool }
    }

    /// Create a document: dispatch the kind's handler, stream deltas
    /// through `writer`, persist the final content, emit `finish`.
    ///
    /// An unknown kind fails before any event is emitted, so the route can
    /// still answer with a plain 400. Handler failures emit a terminal
    /// `error` event.
    #[instrument(skip_all, fields(kind, title))]
    pub async fn create_document(
        &self,
        title: &str,
        kind: &str,
        writer: &DeltaWriter,
    ) -> Result<DocumentRow> {
        let handler = self.registry.get(kind)?;
        writer.start().await;

        match handler.on_create(title, writer).await {
            Ok(content) => {
                let id = DocumentId::generate();
                let row = self.pool.with_conn(|conn| {
                    DocumentRepo::insert(conn, id.as_str(), kind, title, &content, None)
                })?;
                counter!(DOCUMENT_GENERATIONS_TOTAL, "kind" => kind.to_owned(), "operation" => "create")
                    .increment(1);
                info!(id = %row.id, kind, "document created");
                writer.finish(content).await;
                Ok(row)
            }
            Err(e) => {
                writer.error(e.to_string()).await;
                Err(e)
            }
        }
    }

    /// Update a document: load it, dispatch `on_update`, persist, `finish`.
    #[instrument(skip_all, fields(id))]
    pub async fn update_document(
        &self,
        id: &str,
        description: &str,
        writer: &DeltaWriter,
    ) -> Result<DocumentRow> {
        let row = self.get_document(id)?;
        let handler = self.registry.get(&row.kind)?;
        writer.start().await;

        match handler
            .on_update(&row.title, &row.content, description, writer)
            .await
        {
            Ok(content) => {
                // Re-read after the write so the returned row carries the
                // fresh updated_at, not the pre-update one.
                let updated = self
                    .pool
                    .with_conn(|conn| {
                        let _ = DocumentRepo::update_content(conn, id, &content)?;
                        DocumentRepo::get_by_id(conn, id)
                    })?
                    .ok_or_else(|| ArtifactError::NotFound { id: id.to_owned() })?;
                counter!(DOCUMENT_GENERATIONS_TOTAL, "kind" => row.kind.clone(), "operation" => "update")
                    .increment(1);
                info!(id, kind = %row.kind, "document updated");
                writer.finish(content).await;
                Ok(updated)
            }
            Err(e) => {
                writer.error(e.to_string()).await;
                Err(e)
            }
        }
    }

    /// Check that `kind` has a registered handler without dispatching.
    pub fn ensure_kind(&self, kind: &str) -> Result<()> {
        let _ = self.registry.get(kind)?;
        Ok(())
    }

    /// Load a document or fail with `NotFound`.
    pub fn get_document(&self, id: &str) -> Result<DocumentRow> {
        self.pool
            .with_conn(|conn| DocumentRepo::get_by_id(conn, id))?
            .ok_or_else(|| ArtifactError::NotFound { id: id.to_owned() })
    }

    /// Most recently updated documents.
    pub fn list_recent(&self, limit: u32) -> Result<Vec<DocumentRow>> {
        Ok(self
            .pool
            .with_conn(|conn| DocumentRepo::list_recent(conn, limit))?)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
