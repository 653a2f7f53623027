//! Artifact errors.

use thiserror::Error;

/// Result alias for artifact operations.
pub type Result<T> = std::result::Result<T, ArtifactError>;

/// Errors from document dispatch and persistence.
#[derive(Debug, Error)]
pub enum ArtifactError {
    /// The request named a kind with no registered handler.
    #[error("unknown document kind: {kind}")]
    UnknownKind {
        /// The kind from the request.
        kind: String,
    },

    /// The document does not exist.
    #[error("document not found: {id}")]
    NotFound {
        /// Requested document ID.
        id: String,
    },

    /// The model call failed.
    #[error("generation failed: {0}")]
    Provider(#[from] optima_llm::ProviderError),

    /// Persistence failed.
    #[error(transparent)]
    Store(#[from] optima_store::errors::StoreError),
}
