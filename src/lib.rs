pub mod auth; // Sanctum cookie session + route middleware
pub mod busy;
pub mod config;
pub mod core_state;
pub mod error;
pub mod guard; // Admin-only screens
pub mod http;
pub mod layout;
pub mod models;
pub mod pages;
pub mod resources; // One module per REST resource
pub mod store;
pub mod toast;

#[cfg(test)]
mod testing;

use tracing_subscriber::EnvFilter;

pub use core_state::CoreState;
pub use error::ClientError;

/// Install the global `tracing` subscriber.
///
/// `RUST_LOG` wins when set; otherwise `config::default_log_filter()`.
/// Calling it twice is harmless: the second install is ignored.
pub fn init_tracing() {
    let installed = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config::default_log_filter())),
        )
        .try_init();

    if installed.is_ok() {
        tracing::info!("{} starting v{}", config::APP_NAME, config::APP_VERSION);
    }
}
