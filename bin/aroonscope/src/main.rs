use std::sync::Arc;
use std::time::Duration;

use futures_util::{stream, StreamExt};
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use analysis::{AnalysisConfig, AnalysisFileConfig};
use common::{AnalysisSummary, Config, MarketDataProvider};
use provider::YahooClient;

#[tokio::main]
async fn main() {
    // ── Logging ──────────────────────────────────────────────────────────────
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("info".parse().unwrap()))
        .init();

    // ── Config ────────────────────────────────────────────────────────────────
    let cfg = Config::from_env();
    let file_cfg = AnalysisFileConfig::load(&cfg.analysis_config_path);
    info!(analyses = file_cfg.analyses.len(), "AroonScope starting");

    // ── Data provider ─────────────────────────────────────────────────────────
    let provider: Arc<dyn MarketDataProvider> = Arc::new(YahooClient::new(Duration::from_secs(
        cfg.request_timeout_secs,
    )));

    // ── Scan ──────────────────────────────────────────────────────────────────
    // Each ticker is an independent computation; fetch and analyze them
    // concurrently. A failure on one ticker is logged and skipped, never
    // aborting the batch.
    let summaries: Vec<AnalysisSummary> = stream::iter(file_cfg.analyses)
        .map(|analysis| {
            let provider = provider.clone();
            async move { scan_ticker(provider.as_ref(), &analysis).await }
        })
        .buffer_unordered(cfg.max_concurrent_fetches)
        .filter_map(|summary| async move { summary })
        .collect()
        .await;

    for summary in &summaries {
        print_summary(summary);
    }
    info!(completed = summaries.len(), "Scan finished");
}

async fn scan_ticker(
    provider: &dyn MarketDataProvider,
    cfg: &AnalysisConfig,
) -> Option<AnalysisSummary> {
    let table = match provider.daily_bars(&cfg.ticker, &cfg.range).await {
        Ok(table) => table,
        Err(e) => {
            error!(ticker = %cfg.ticker, error = %e, "Failed to fetch price data");
            return None;
        }
    };

    if table.is_empty() {
        warn!(ticker = %cfg.ticker, "Provider returned no bars");
        return None;
    }

    match analysis::summarize(&cfg.ticker, &table, cfg.period) {
        Ok(summary) => Some(summary),
        Err(e) => {
            error!(ticker = %cfg.ticker, error = %e, "Analysis failed");
            None
        }
    }
}

fn print_summary(summary: &AnalysisSummary) {
    println!(
        "\nAroon Indicator for {} as of {}:",
        summary.ticker,
        summary.last_date.format("%Y-%m-%d")
    );
    println!("  Aroon Up:   {:.2}", summary.aroon_up);
    println!("  Aroon Down: {:.2}", summary.aroon_down);
    if summary.signals.is_empty() {
        println!("  No signals.");
    } else {
        for signal in &summary.signals {
            println!("  - {}", signal.advice());
        }
    }
}
