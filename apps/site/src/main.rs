//! # Designo Site Server
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                          Site Server                                    │
//! │                                                                         │
//! │  Browser ───► HTTP (3000) ───► Router ───► Cloudinary / Resend         │
//! │                                  │                                      │
//! │                                  ▼                                      │
//! │                          public/locales/*.json                          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Usage: `designo-site [config.toml]`

use std::path::PathBuf;

use tokio::net::TcpListener;
use tracing::{error, info};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use designo_media::SiteConfig;
use designo_site::{router, AppState};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    FmtSubscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(true)
        .init();

    info!("Starting Designo site server...");

    let config = match std::env::args().nth(1).map(PathBuf::from) {
        Some(path) => SiteConfig::load(Some(path))?,
        None => SiteConfig::load_or_default(None),
    };
    info!(
        public_url = %config.server.public_url,
        media = config.media.has_credentials(),
        auth = config.auth.is_enabled(),
        "Configuration loaded"
    );

    let addr = config.server.bind_address();
    let state = AppState::from_config(config);
    let app = router(state);

    let listener = TcpListener::bind(&addr).await?;
    info!(%addr, "Listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server shutdown complete");
    Ok(())
}

/// Resolves on Ctrl+C or SIGTERM. A handler that cannot be installed never fires.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutdown signal received, starting graceful shutdown...");
}
