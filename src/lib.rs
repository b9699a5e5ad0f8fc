pub mod api;
pub mod config;
pub mod core_state;
pub mod db;
pub mod ingest;
pub mod jobs;
pub mod models;
pub mod photos;
pub mod prints;
pub mod render;
pub mod status;
pub mod team;
pub mod tickets;
pub mod viewer;

use tracing_subscriber::EnvFilter;

/// Initialize tracing from RUST_LOG, falling back to the app default.
pub fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config::default_log_filter())),
        )
        .init();
}
