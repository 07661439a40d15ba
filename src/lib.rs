pub mod api;
pub mod config;
pub mod db;
pub mod models;
pub mod pipeline;
pub mod tools;

use tracing_subscriber::EnvFilter;

/// Initialize tracing once per process. `RUST_LOG` wins when set.
pub fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config::default_log_filter())),
        )
        .init();
}
