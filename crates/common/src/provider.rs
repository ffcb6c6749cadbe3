use async_trait::async_trait;

use crate::{PriceTable, Result};

/// Valid history range strings accepted by the data provider.
pub const VALID_RANGES: &[&str] = &[
    "1d", "5d", "1mo", "3mo", "6mo", "1y", "2y", "5y", "10y", "ytd", "max",
];

/// Abstraction over the historical price source.
///
/// `YahooClient` in `crates/provider` implements this for live data. Tests
/// substitute their own implementation. The indicator core never talks to
/// a provider directly; it only ever sees the returned [`PriceTable`].
#[async_trait]
pub trait MarketDataProvider: Send + Sync {
    /// Fetch daily OHLC bars for `ticker` covering `range`
    /// (one of [`VALID_RANGES`]), oldest bar first.
    async fn daily_bars(&self, ticker: &str, range: &str) -> Result<PriceTable>;
}
