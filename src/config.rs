//! Client configuration.

use std::time::Duration;

use tracing::warn;

/// Default NextCaptcha API endpoint
pub const DEFAULT_API_BASE_URL: &str = "https://api.nextcaptcha.com";

/// Environment variable holding the API client key
pub const ENV_CLIENT_KEY: &str = "NEXTCAPTCHA_CLIENT_KEY";
/// Environment variable holding the affiliate soft id
pub const ENV_SOFT_ID: &str = "NEXTCAPTCHA_SOFT_ID";
/// Environment variable holding the completion callback URL
pub const ENV_CALLBACK_URL: &str = "NEXTCAPTCHA_CALLBACK_URL";
/// Environment variable overriding the solve timeout (seconds)
pub const ENV_TIMEOUT: &str = "NEXTCAPTCHA_TIMEOUT";

/// Configuration for [`NextCaptchaClient`](crate::NextCaptchaClient).
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientConfig {
    /// NextCaptcha API client key
    pub client_key: String,
    /// Affiliate soft id sent with every created task
    #[serde(default)]
    pub soft_id: String,
    /// URL the service notifies when a task completes
    #[serde(default)]
    pub callback_url: String,
    /// API endpoint base URL
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,
    /// Overall solve timeout in seconds (task creation to solution)
    #[serde(default = "default_solve_timeout_secs")]
    pub solve_timeout_secs: u64,
    /// Delay between result polls in milliseconds
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,
    /// Per-request HTTP timeout in seconds
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
    /// Verify TLS certificates when talking to the API
    #[serde(default)]
    pub verify_tls: bool,
    /// Maximum idle connections kept per host
    #[serde(default = "default_pool_max_size")]
    pub pool_max_size: usize,
}

fn default_api_base_url() -> String {
    DEFAULT_API_BASE_URL.to_string()
}

fn default_solve_timeout_secs() -> u64 {
    45
}

fn default_poll_interval_ms() -> u64 {
    500
}

fn default_request_timeout_secs() -> u64 {
    60
}

fn default_pool_max_size() -> usize {
    1000
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            client_key: String::new(),
            soft_id: String::new(),
            callback_url: String::new(),
            api_base_url: default_api_base_url(),
            solve_timeout_secs: default_solve_timeout_secs(),
            poll_interval_ms: default_poll_interval_ms(),
            request_timeout_secs: default_request_timeout_secs(),
            verify_tls: false,
            pool_max_size: default_pool_max_size(),
        }
    }
}

impl ClientConfig {
    /// Create a configuration with the given client key and default settings.
    pub fn new(client_key: &str) -> Self {
        Self {
            client_key: client_key.to_string(),
            ..Default::default()
        }
    }

    /// Read the configuration from `NEXTCAPTCHA_*` environment variables.
    ///
    /// Unset variables fall back to their defaults; an unparseable timeout is
    /// ignored with a warning.
    pub fn from_env() -> Self {
        let mut config = Self {
            client_key: std::env::var(ENV_CLIENT_KEY).unwrap_or_default(),
            soft_id: std::env::var(ENV_SOFT_ID).unwrap_or_default(),
            callback_url: std::env::var(ENV_CALLBACK_URL).unwrap_or_default(),
            ..Default::default()
        };

        if let Ok(value) = std::env::var(ENV_TIMEOUT) {
            match value.parse() {
                Ok(secs) => config.solve_timeout_secs = secs,
                Err(_) => warn!("Ignoring invalid {} value: {}", ENV_TIMEOUT, value),
            }
        }

        config
    }

    /// Set the affiliate soft id.
    pub fn with_soft_id(mut self, soft_id: &str) -> Self {
        self.soft_id = soft_id.to_string();
        self
    }

    /// Set the completion callback URL.
    pub fn with_callback_url(mut self, callback_url: &str) -> Self {
        self.callback_url = callback_url.to_string();
        self
    }

    /// Point the client at a different API endpoint.
    pub fn with_api_base_url(mut self, url: &str) -> Self {
        self.api_base_url = url.trim_end_matches('/').to_string();
        self
    }

    /// Set the overall solve timeout.
    pub fn with_solve_timeout(mut self, timeout: Duration) -> Self {
        self.solve_timeout_secs = timeout.as_secs();
        self
    }

    /// Set the delay between result polls.
    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval_ms = interval.as_millis() as u64;
        self
    }

    /// Set the per-request HTTP timeout.
    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout_secs = timeout.as_secs();
        self
    }

    /// Enable or disable TLS certificate verification.
    pub fn with_verify_tls(mut self, verify: bool) -> Self {
        self.verify_tls = verify;
        self
    }

    /// Set the connection pool size.
    pub fn with_pool_max_size(mut self, size: usize) -> Self {
        self.pool_max_size = size;
        self
    }

    /// Check if a client key is present.
    pub fn is_configured(&self) -> bool {
        !self.client_key.is_empty()
    }

    /// Solve timeout as a [`Duration`].
    pub fn solve_timeout(&self) -> Duration {
        Duration::from_secs(self.solve_timeout_secs)
    }

    /// Poll interval as a [`Duration`].
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    /// Per-request timeout as a [`Duration`].
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}
