//! Minimal liveness endpoint for external uptime pinging.

use axum::Router;
use tracing::{error, info};

async fn online() -> &'static str {
    "online"
}

/// Serve a static "online" body for any request path. Failures here are
/// logged and never take the bot down.
pub async fn serve(port: u16) {
    let app = Router::new().fallback(online);
    let listener = match tokio::net::TcpListener::bind(("0.0.0.0", port)).await {
        Ok(listener) => listener,
        Err(e) => {
            error!(port, error = %e, "Failed to bind liveness endpoint");
            return;
        }
    };
    info!(port, "Liveness endpoint listening");
    if let Err(e) = axum::serve(listener, app).await {
        error!(error = %e, "Liveness endpoint stopped");
    }
}
