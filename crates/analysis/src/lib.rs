pub mod config;
pub mod indicators;
pub mod signals;

pub use config::{AnalysisConfig, AnalysisFileConfig};
pub use indicators::calculate_aroon;
pub use signals::analyze_aroon_signals;

use common::{AnalysisSummary, Error, PriceTable, Result};
use tracing::debug;

/// Run the full pipeline for one ticker: compute both Aroon lines, derive
/// signals from their trailing points, and condense the result into the
/// report row shown to the user.
pub fn summarize(ticker: &str, table: &PriceTable, period: usize) -> Result<AnalysisSummary> {
    debug!(ticker, period, bars = table.len(), "Computing Aroon analysis");
    let (up, down) = calculate_aroon(table, period)?;
    let signals = analyze_aroon_signals(&up, &down)?;

    // Signal derivation succeeding guarantees defined trailing points.
    let (last_date, aroon_up) = up.last_defined().ok_or(Error::InsufficientHistory {
        required: 2,
        actual: 0,
    })?;
    let (_, aroon_down) = down.last_defined().ok_or(Error::InsufficientHistory {
        required: 2,
        actual: 0,
    })?;

    Ok(AnalysisSummary {
        ticker: ticker.to_string(),
        last_date,
        aroon_up,
        aroon_down,
        signals,
    })
}
