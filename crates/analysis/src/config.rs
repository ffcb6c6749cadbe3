use serde::{Deserialize, Serialize};

use common::VALID_RANGES;

/// Top-level analysis config file (TOML).
///
/// Example `config/analyses.toml`:
/// ```toml
/// [[analysis]]
/// ticker = "AAPL"
/// period = 14
/// range = "1y"
/// ```
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AnalysisFileConfig {
    #[serde(rename = "analysis")]
    pub analyses: Vec<AnalysisConfig>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AnalysisConfig {
    /// Ticker symbol, e.g. "AAPL".
    pub ticker: String,
    /// Aroon look-back window in trading days.
    #[serde(default = "default_period")]
    pub period: usize,
    /// How much history to fetch, e.g. "1y". Must be one of the provider's
    /// supported range strings.
    #[serde(default = "default_range")]
    pub range: String,
}

fn default_period() -> usize {
    14
}

fn default_range() -> String {
    "1y".to_string()
}

impl AnalysisFileConfig {
    /// Load from a TOML file. Exits process on error.
    pub fn load(path: &str) -> Self {
        let content = std::fs::read_to_string(path)
            .unwrap_or_else(|e| panic!("Failed to read analysis config at '{path}': {e}"));
        let cfg: Self = toml::from_str(&content)
            .unwrap_or_else(|e| panic!("Failed to parse analysis config at '{path}': {e}"));

        for analysis in &cfg.analyses {
            if !VALID_RANGES.contains(&analysis.range.as_str()) {
                panic!(
                    "Analysis '{}' has invalid range '{}'. Valid ranges: {}",
                    analysis.ticker,
                    analysis.range,
                    VALID_RANGES.join(", ")
                );
            }
        }
        cfg
    }
}
