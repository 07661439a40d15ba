//! Tool gateway entry point.
//!
//! Runs as a separate process next to the backend so agent frameworks
//! can call appointment tools over plain HTTP.

use std::sync::Arc;

use famcare::config::{GatewaySettings, APP_NAME, APP_VERSION};
use famcare::tools::{server, BackendClient};

#[tokio::main]
async fn main() -> std::io::Result<()> {
    famcare::init_tracing();
    let settings = GatewaySettings::from_env();
    tracing::info!("{APP_NAME} tool gateway starting v{APP_VERSION}");
    tracing::info!(backend = %settings.backend_url, "Proxying to backend");

    let client = Arc::new(BackendClient::new(&settings.backend_url));
    server::serve(client, settings.bind_addr).await
}
