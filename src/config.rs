use std::path::PathBuf;
use std::time::Duration;

/// Application-level constants
pub const APP_NAME: &str = "Concuerdo";
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Default log filter when RUST_LOG is unset.
pub fn default_log_filter() -> String {
    "info,concuerdo=debug".to_string()
}

/// Initialize tracing with an env-filter. Call once from the embedding
/// process; repeated calls are ignored.
pub fn init_tracing() {
    use tracing_subscriber::EnvFilter;

    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(default_log_filter())),
        )
        .try_init();
}

/// Get the application data directory (~/Concuerdo/)
pub fn app_data_dir() -> PathBuf {
    let home = dirs::home_dir().expect("Cannot determine home directory");
    home.join(APP_NAME)
}

/// Directory holding base templates and family modifier fragments.
pub fn templates_dir() -> PathBuf {
    app_data_dir().join("templates")
}

/// Directory for the local audit database.
pub fn audit_dir() -> PathBuf {
    app_data_dir().join("audit")
}

/// Configuration for the optional remote extraction service.
///
/// Disabled by default; the pipeline works entirely offline without it.
#[derive(Debug, Clone)]
pub struct RemoteConfig {
    pub enabled: bool,
    pub endpoint: Option<String>,
    pub api_key: Option<String>,
    pub timeout: Duration,
    pub max_retries: u32,
    pub backoff_base: Duration,
    pub backoff_max: Duration,
    pub breaker_threshold: u32,
    pub breaker_cooldown: Duration,
    pub debug_extraction: bool,
}

impl Default for RemoteConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            endpoint: None,
            api_key: None,
            timeout: Duration::from_millis(10_000),
            max_retries: 3,
            backoff_base: Duration::from_millis(500),
            backoff_max: Duration::from_millis(8_000),
            breaker_threshold: 5,
            breaker_cooldown: Duration::from_secs(30),
            debug_extraction: false,
        }
    }
}

impl RemoteConfig {
    /// Read configuration from `CONCUERDO_REMOTE_*` environment variables.
    /// Missing or malformed values fall back to defaults.
    pub fn from_env() -> Self {
        let defaults = Self::default();

        let env_bool = |key: &str| {
            std::env::var(key)
                .map(|v| v.to_lowercase() == "true")
                .unwrap_or(false)
        };
        let env_ms = |key: &str, fallback: Duration| {
            std::env::var(key)
                .ok()
                .and_then(|v| v.parse::<u64>().ok())
                .map(Duration::from_millis)
                .unwrap_or(fallback)
        };

        Self {
            enabled: env_bool("CONCUERDO_REMOTE_ENABLED"),
            endpoint: std::env::var("CONCUERDO_REMOTE_URL").ok(),
            api_key: std::env::var("CONCUERDO_REMOTE_API_KEY").ok(),
            timeout: env_ms("CONCUERDO_REMOTE_TIMEOUT_MS", defaults.timeout),
            max_retries: std::env::var("CONCUERDO_REMOTE_MAX_RETRIES")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.max_retries),
            backoff_base: env_ms("CONCUERDO_REMOTE_BACKOFF_MS", defaults.backoff_base),
            backoff_max: env_ms("CONCUERDO_REMOTE_BACKOFF_MAX_MS", defaults.backoff_max),
            breaker_threshold: std::env::var("CONCUERDO_REMOTE_BREAKER_THRESHOLD")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.breaker_threshold),
            breaker_cooldown: env_ms(
                "CONCUERDO_REMOTE_BREAKER_COOLDOWN_MS",
                defaults.breaker_cooldown,
            ),
            debug_extraction: env_bool("CONCUERDO_DEBUG_EXTRACTION"),
        }
    }

    /// Whether the remote path can be used at all.
    pub fn usable(&self) -> bool {
        self.enabled && self.endpoint.is_some()
    }
}
