use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::Client;
use serde::Deserialize;
use tracing::debug;

use common::{Error, MarketDataProvider, PriceColumn, PriceTable, Result};

const BASE_URL: &str = "https://query1.finance.yahoo.com";

/// REST client for the Yahoo Finance v8 chart API. Used to pull daily OHLC
/// history for a ticker.
pub struct YahooClient {
    http: Client,
}

impl YahooClient {
    pub fn new(timeout: Duration) -> Self {
        Self {
            http: Client::builder()
                .use_rustls_tls()
                .timeout(timeout)
                .user_agent("aroonscope/0.1")
                .build()
                .expect("Failed to build HTTP client"),
        }
    }
}

#[async_trait]
impl MarketDataProvider for YahooClient {
    async fn daily_bars(&self, ticker: &str, range: &str) -> Result<PriceTable> {
        let url = format!("{BASE_URL}/v8/finance/chart/{ticker}?range={range}&interval=1d");
        debug!(ticker, range, "Fetching daily bars");

        let resp = self
            .http
            .get(&url)
            .send()
            .await
            .map_err(|e| Error::Http(e.to_string()))?;

        let status = resp.status();
        let body = resp.text().await.map_err(|e| Error::Http(e.to_string()))?;

        if !status.is_success() {
            return Err(Error::Provider(format!("HTTP {status}: {body}")));
        }

        let table = parse_chart_response(ticker, &body)?;
        debug!(ticker, bars = table.len(), "Fetched daily bars");
        Ok(table)
    }
}

/// Parse one chart API payload into a price table.
///
/// A quote array missing from the payload leaves that column absent from
/// the table (the indicator engine surfaces that as a schema error). Rows
/// holding a null in any present column are dropped so the table stays
/// fully numeric.
pub fn parse_chart_response(ticker: &str, body: &str) -> Result<PriceTable> {
    let resp: ChartResponse = serde_json::from_str(body)?;

    if let Some(err) = resp.chart.error {
        return Err(Error::Provider(format!(
            "{ticker}: {} ({})",
            err.description, err.code
        )));
    }

    let result = resp
        .chart
        .result
        .and_then(|mut r| if r.is_empty() { None } else { Some(r.remove(0)) })
        .ok_or_else(|| Error::Provider(format!("{ticker}: chart response contains no result")))?;

    let timestamps = result.timestamp.unwrap_or_default();
    let quote = result
        .indicators
        .quote
        .into_iter()
        .next()
        .unwrap_or_default();

    let raw_columns: Vec<(PriceColumn, Vec<Option<f64>>)> = [
        (PriceColumn::Open, quote.open),
        (PriceColumn::High, quote.high),
        (PriceColumn::Low, quote.low),
        (PriceColumn::Close, quote.close),
    ]
    .into_iter()
    .filter_map(|(column, values)| values.map(|v| (column, v)))
    .collect();

    let mut kept_timestamps: Vec<DateTime<Utc>> = Vec::with_capacity(timestamps.len());
    let mut kept_values: Vec<Vec<f64>> = vec![Vec::with_capacity(timestamps.len()); raw_columns.len()];

    for (i, &unix_secs) in timestamps.iter().enumerate() {
        let Some(timestamp) = DateTime::from_timestamp(unix_secs, 0) else {
            continue;
        };

        let mut row = Vec::with_capacity(raw_columns.len());
        let mut complete = true;
        for (_, values) in &raw_columns {
            match values.get(i) {
                Some(Some(v)) => row.push(*v),
                _ => {
                    complete = false;
                    break;
                }
            }
        }
        if !complete {
            continue;
        }

        kept_timestamps.push(timestamp);
        for (slot, value) in kept_values.iter_mut().zip(row) {
            slot.push(value);
        }
    }

    let mut table = PriceTable::new(kept_timestamps);
    for ((column, _), values) in raw_columns.iter().zip(kept_values) {
        table.insert_column(*column, values)?;
    }
    Ok(table)
}

// ─── Response types ───────────────────────────────────────────────────────────

#[derive(Deserialize)]
struct ChartResponse {
    chart: Chart,
}

#[derive(Deserialize)]
struct Chart {
    result: Option<Vec<ChartResult>>,
    error: Option<ChartError>,
}

#[derive(Deserialize)]
struct ChartError {
    code: String,
    description: String,
}

#[derive(Deserialize)]
struct ChartResult {
    timestamp: Option<Vec<i64>>,
    indicators: Indicators,
}

#[derive(Deserialize)]
struct Indicators {
    #[serde(default)]
    quote: Vec<Quote>,
}

#[derive(Deserialize, Default)]
struct Quote {
    open: Option<Vec<Option<f64>>>,
    high: Option<Vec<Option<f64>>>,
    low: Option<Vec<Option<f64>>>,
    close: Option<Vec<Option<f64>>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn payload(quote_body: &str) -> String {
        format!(
            r#"{{
                "chart": {{
                    "result": [{{
                        "meta": {{"symbol": "TEST"}},
                        "timestamp": [1704067200, 1704153600, 1704240000],
                        "indicators": {{"quote": [{quote_body}]}}
                    }}],
                    "error": null
                }}
            }}"#
        )
    }

    #[test]
    fn parses_a_complete_payload() {
        let body = payload(
            r#"{
                "open":  [10.0, 11.0, 12.0],
                "high":  [10.5, 11.5, 12.5],
                "low":   [9.5, 10.5, 11.5],
                "close": [10.2, 11.2, 12.2]
            }"#,
        );

        let table = parse_chart_response("TEST", &body).unwrap();
        assert_eq!(table.len(), 3);
        assert_eq!(
            table.column(PriceColumn::High).unwrap(),
            &[10.5, 11.5, 12.5]
        );
        assert_eq!(table.column(PriceColumn::Low).unwrap(), &[9.5, 10.5, 11.5]);
    }

    #[test]
    fn missing_quote_array_leaves_the_column_absent() {
        let body = payload(
            r#"{
                "high": [10.5, 11.5, 12.5],
                "close": [10.2, 11.2, 12.2]
            }"#,
        );

        let table = parse_chart_response("TEST", &body).unwrap();
        assert!(table.has_column(PriceColumn::High));
        assert!(!table.has_column(PriceColumn::Low));
        assert!(matches!(
            table.column(PriceColumn::Low),
            Err(Error::Schema {
                column: PriceColumn::Low
            })
        ));
    }

    #[test]
    fn rows_with_null_values_are_dropped() {
        let body = payload(
            r#"{
                "high":  [10.5, null, 12.5],
                "low":   [9.5, 10.5, 11.5],
                "close": [10.2, 11.2, null]
            }"#,
        );

        let table = parse_chart_response("TEST", &body).unwrap();
        assert_eq!(table.len(), 1);
        assert_eq!(table.column(PriceColumn::High).unwrap(), &[10.5]);
        assert_eq!(table.column(PriceColumn::Low).unwrap(), &[9.5]);
    }

    #[test]
    fn api_error_surfaces_as_a_provider_error() {
        let body = r#"{
            "chart": {
                "result": null,
                "error": {"code": "Not Found", "description": "No data found, symbol may be delisted"}
            }
        }"#;

        let err = parse_chart_response("NOPE", body).unwrap_err();
        assert!(matches!(err, Error::Provider(_)));
        assert!(err.to_string().contains("NOPE"));
    }

    #[test]
    fn empty_result_is_a_provider_error() {
        let body = r#"{"chart": {"result": [], "error": null}}"#;
        let err = parse_chart_response("TEST", body).unwrap_err();
        assert!(matches!(err, Error::Provider(_)));
    }

    #[test]
    fn malformed_json_is_a_json_error() {
        let err = parse_chart_response("TEST", "not json").unwrap_err();
        assert!(matches!(err, Error::Json(_)));
    }
}
