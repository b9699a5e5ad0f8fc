use std::process::ExitCode;
use std::sync::Arc;

use digtrack::api::{start_api_server, ApiContext};
use digtrack::config;
use digtrack::core_state::CoreState;
use digtrack::render::{PdfPageRenderer, PdfiumRenderer};

#[tokio::main]
async fn main() -> ExitCode {
    digtrack::init_tracing();
    tracing::info!("{} starting v{}", config::APP_NAME, config::APP_VERSION);

    let core = match CoreState::new() {
        Ok(core) => Arc::new(core),
        Err(e) => {
            tracing::error!(error = %e, "Failed to set up data directory");
            return ExitCode::FAILURE;
        }
    };

    let renderer: Arc<dyn PdfPageRenderer> = match PdfiumRenderer::new() {
        Ok(renderer) => Arc::new(renderer),
        Err(e) => {
            tracing::error!(error = %e, "PDFium is required for blueprint rendering");
            return ExitCode::FAILURE;
        }
    };

    let addr = match std::env::var("DIGTRACK_BIND_ADDR") {
        Ok(s) => match s.parse() {
            Ok(addr) => addr,
            Err(e) => {
                tracing::error!(addr = %s, error = %e, "Invalid DIGTRACK_BIND_ADDR");
                return ExitCode::FAILURE;
            }
        },
        Err(_) => config::DEFAULT_BIND_ADDR.parse().expect("default bind addr parses"),
    };

    let ctx = ApiContext::new(core, renderer);
    let server = match start_api_server(ctx, addr).await {
        Ok(server) => server,
        Err(e) => {
            tracing::error!(error = %e, "Failed to start API server");
            return ExitCode::FAILURE;
        }
    };
    tracing::info!(addr = %server.local_addr, "DigTrack serving");

    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
    }
    tracing::info!("Shutting down");
    server.shutdown().await;
    ExitCode::SUCCESS
}
