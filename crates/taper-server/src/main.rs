//! taper-server binary.
//!
//! Reads `config.toml` (or the path given with `--config`), opens the SQLite
//! store, and serves the TaperCommunity JSON API under `/api`.
//!
//! # Reconciling aggregates
//!
//! Vote counts on threads and replies are denormalised. To rewrite every one
//! of them from the stored vote records and exit:
//!
//! ```
//! cargo run -p taper-server -- --reconcile
//! ```

mod settings;

use std::sync::Arc;

use anyhow::Context as _;
use axum::Router;
use clap::Parser;
use taper_core::{protocol::recount, store::CommunityStore, vote::VoteTarget};
use taper_store_sqlite::SqliteStore;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

use crate::settings::{ServerConfig, expand_tilde};

#[derive(Parser)]
#[command(author, version, about = "TaperCommunity API server")]
struct Cli {
  /// Path to the TOML configuration file.
  #[arg(short, long, default_value = "config.toml")]
  config: std::path::PathBuf,

  /// Recount every thread and reply aggregate, then exit.
  #[arg(long)]
  reconcile: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
  tracing_subscriber::fmt()
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy(),
    )
    .init();

  let cli = Cli::parse();

  let server_cfg = ServerConfig::load(&cli.config).context("failed to load configuration")?;
  let store_path = expand_tilde(&server_cfg.store_path);

  if let Some(parent) = store_path.parent()
    && !parent.as_os_str().is_empty()
  {
    std::fs::create_dir_all(parent)
      .with_context(|| format!("failed to create {}", parent.display()))?;
  }

  let store = SqliteStore::open(&store_path)
    .await
    .with_context(|| format!("failed to open store at {store_path:?}"))?;

  if cli.reconcile {
    return reconcile(&store).await;
  }

  let app = Router::new()
    .nest("/api", taper_api::api_router(Arc::new(store)))
    .layer(TraceLayer::new_for_http());
  let address = server_cfg.address();

  tracing::info!("Listening on http://{address}/api");
  let listener = TcpListener::bind(&address)
    .await
    .with_context(|| format!("failed to bind {address}"))?;

  axum::serve(listener, app).await.context("server error")?;

  Ok(())
}

/// Rewrite every aggregate column from the vote records.
async fn reconcile(store: &SqliteStore) -> anyhow::Result<()> {
  let mut targets = 0usize;
  for thread in store.list_threads().await? {
    recount(store, VoteTarget::thread(thread.thread_id)).await?;
    targets += 1;
    for reply in store.list_replies(thread.thread_id).await? {
      recount(store, VoteTarget::reply(reply.reply_id)).await?;
      recount(store, VoteTarget::helpful(reply.reply_id)).await?;
      targets += 2;
    }
  }
  tracing::info!(targets, "aggregates reconciled");
  Ok(())
}
