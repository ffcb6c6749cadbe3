/// All configuration loaded from environment variables at startup.
/// Missing or malformed values cause an immediate panic with a clear message.
#[derive(Debug, Clone)]
pub struct Config {
    /// Path to the TOML file listing the analyses to run.
    pub analysis_config_path: String,

    /// Timeout applied to each provider HTTP request, in seconds.
    pub request_timeout_secs: u64,

    /// How many tickers are fetched concurrently.
    pub max_concurrent_fetches: usize,
}

impl Config {
    /// Load all configuration from environment variables.
    /// Loads `.env` if present.
    pub fn from_env() -> Self {
        let _ = dotenvy::dotenv(); // ignore error if .env not present

        Config {
            analysis_config_path: optional_env("ANALYSIS_CONFIG_PATH")
                .unwrap_or_else(|| "config/analyses.toml".to_string()),
            request_timeout_secs: parsed_env("REQUEST_TIMEOUT_SECS", 10),
            max_concurrent_fetches: parsed_env("MAX_CONCURRENT_FETCHES", 4),
        }
    }
}

fn optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok()
}

fn parsed_env<T: std::str::FromStr>(key: &str, default: T) -> T {
    match optional_env(key) {
        Some(raw) => raw.parse().unwrap_or_else(|_| {
            panic!("Environment variable '{key}' has an invalid value: '{raw}'")
        }),
        None => default,
    }
}
