/// Application-level constants
pub const APP_NAME: &str = "Gestion MRC";
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Backend used when `MRC_API_URL` is not set (local Laravel dev server).
pub const DEFAULT_API_URL: &str = "http://localhost:8000";

/// Request timeout used when `MRC_API_TIMEOUT_SECS` is not set.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Page the guest middleware and the admin guard send users to.
pub const HOME_ROUTE: &str = "/dashboard";

/// Default `tracing` filter when `RUST_LOG` is unset.
pub fn default_log_filter() -> &'static str {
    "info,gestion_mrc=debug"
}

/// Connection settings for the REST backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Scheme + host (+ port) of the backend, without trailing slash.
    pub base_url: String,
    pub timeout_secs: u64,
}

impl ClientConfig {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }

    pub fn with_timeout(mut self, timeout_secs: u64) -> Self {
        self.timeout_secs = timeout_secs;
        self
    }

    /// Read `MRC_API_URL` and `MRC_API_TIMEOUT_SECS`, falling back to defaults.
    ///
    /// An unparsable timeout is ignored with a warning rather than failing startup.
    pub fn from_env() -> Self {
        let base_url =
            std::env::var("MRC_API_URL").unwrap_or_else(|_| DEFAULT_API_URL.to_string());
        let mut config = Self::new(&base_url);

        if let Ok(raw) = std::env::var("MRC_API_TIMEOUT_SECS") {
            match raw.trim().parse::<u64>() {
                Ok(secs) if secs > 0 => config.timeout_secs = secs,
                _ => tracing::warn!(value = %raw, "Ignoring invalid MRC_API_TIMEOUT_SECS"),
            }
        }

        config
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::new(DEFAULT_API_URL)
    }
}
