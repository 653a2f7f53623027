//! # optima
//!
//! Optima AI server binary — loads settings, opens the store, and starts
//! the HTTP server.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::info;

use optima_server::{AppState, router};
use optima_settings::loader::{load_settings_from_path, settings_path};
use optima_settings::types::OptimaSettings;
use optima_store::StorePool;

/// Optima AI server.
#[derive(Parser, Debug)]
#[command(name = "optima", about = "Optima AI server", version)]
struct Cli {
    /// Path to a settings file (defaults to `~/.optima/settings.json`).
    #[arg(long)]
    settings: Option<PathBuf>,

    /// Emit logs as JSON lines.
    #[arg(long)]
    json_logs: bool,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run the HTTP server (the default).
    Serve {
        /// Bind host override.
        #[arg(long)]
        host: Option<String>,

        /// Bind port override.
        #[arg(long)]
        port: Option<u16>,
    },
    /// Open the database, apply pending migrations, and exit.
    Migrate,
}

/// Expand a leading `~/` against `$HOME`.
fn expand_home(path: &str) -> PathBuf {
    if let Some(rest) = path.strip_prefix("~/") {
        let home = std::env::var("HOME").unwrap_or_else(|_| "/tmp".to_owned());
        PathBuf::from(home).join(rest)
    } else {
        PathBuf::from(path)
    }
}

fn load_settings(cli_path: Option<&PathBuf>) -> OptimaSettings {
    let path = cli_path.cloned().unwrap_or_else(settings_path);
    match load_settings_from_path(&path) {
        Ok(settings) => settings,
        Err(e) => {
            eprintln!("settings unreadable at {}: {e}; using defaults", path.display());
            OptimaSettings::default()
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Settings load before logging so a broken file is still reported.
    let settings = load_settings(cli.settings.as_ref());
    optima_core::logging::init(cli.json_logs);
    optima_settings::init_settings(settings.clone());

    let db_path = expand_home(&settings.server.database_path);
    let pool = StorePool::open(&db_path)
        .with_context(|| format!("failed to open database at {}", db_path.display()))?;

    match cli.command {
        Some(Command::Migrate) => {
            // Migrations ran as part of opening the pool.
            info!(path = %db_path.display(), "database migrated");
            Ok(())
        }
        Some(Command::Serve { host, port }) => {
            serve(
                &settings,
                pool,
                host.unwrap_or_else(|| settings.server.host.clone()),
                port.unwrap_or(settings.server.port),
            )
            .await
        }
        None => {
            let host = settings.server.host.clone();
            let port = settings.server.port;
            serve(&settings, pool, host, port).await
        }
    }
}

async fn serve(
    settings: &OptimaSettings,
    pool: StorePool,
    host: String,
    port: u16,
) -> Result<()> {
    let state = AppState::build(settings, pool).context("failed to build application state")?;
    let app = router(state);

    let addr = format!("{host}:{port}");
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    info!(
        addr = %listener.local_addr().map_or(addr.clone(), |a| a.to_string()),
        "optima server listening"
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server exited with error")
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!("failed to install ctrl-c handler: {e}");
        std::future::pending::<()>().await;
    }
    info!("shutdown signal received");
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
