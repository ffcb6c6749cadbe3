use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Named price column in a daily-bar table.
///
/// Data sources are not guaranteed to deliver every column; consumers must
/// request columns through [`PriceTable::column`] and handle absence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PriceColumn {
    Open,
    High,
    Low,
    Close,
}

impl std::fmt::Display for PriceColumn {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PriceColumn::Open => write!(f, "open"),
            PriceColumn::High => write!(f, "high"),
            PriceColumn::Low => write!(f, "low"),
            PriceColumn::Close => write!(f, "close"),
        }
    }
}

/// One trading period's observed prices.
///
/// Invariant: `high >= low`. Bars come from the data provider and are never
/// mutated after construction; numeric validity is trusted downstream.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct PriceBar {
    pub timestamp: DateTime<Utc>,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
}

/// Column-oriented table of daily bars, strictly increasing by timestamp.
///
/// Columns are keyed by [`PriceColumn`] and may be individually absent when
/// the data source did not deliver them. Every present column has exactly
/// one value per timestamp.
#[derive(Debug, Clone, Default)]
pub struct PriceTable {
    timestamps: Vec<DateTime<Utc>>,
    columns: BTreeMap<PriceColumn, Vec<f64>>,
}

impl PriceTable {
    pub fn new(timestamps: Vec<DateTime<Utc>>) -> Self {
        Self {
            timestamps,
            columns: BTreeMap::new(),
        }
    }

    /// Build a table with all four columns from a bar sequence.
    pub fn from_bars(bars: &[PriceBar]) -> Self {
        let mut table = Self::new(bars.iter().map(|b| b.timestamp).collect());
        table
            .columns
            .insert(PriceColumn::Open, bars.iter().map(|b| b.open).collect());
        table
            .columns
            .insert(PriceColumn::High, bars.iter().map(|b| b.high).collect());
        table
            .columns
            .insert(PriceColumn::Low, bars.iter().map(|b| b.low).collect());
        table
            .columns
            .insert(PriceColumn::Close, bars.iter().map(|b| b.close).collect());
        table
    }

    /// Attach a column. Fails if the value count does not match the
    /// timestamp count.
    pub fn insert_column(&mut self, column: PriceColumn, values: Vec<f64>) -> crate::Result<()> {
        if values.len() != self.timestamps.len() {
            return Err(crate::Error::InvalidParameter(format!(
                "column '{column}' has {} values but the table has {} rows",
                values.len(),
                self.timestamps.len()
            )));
        }
        self.columns.insert(column, values);
        Ok(())
    }

    /// Access a column, failing with a schema error if it is absent.
    pub fn column(&self, column: PriceColumn) -> crate::Result<&[f64]> {
        self.columns
            .get(&column)
            .map(Vec::as_slice)
            .ok_or(crate::Error::Schema { column })
    }

    pub fn has_column(&self, column: PriceColumn) -> bool {
        self.columns.contains_key(&column)
    }

    pub fn timestamps(&self) -> &[DateTime<Utc>] {
        &self.timestamps
    }

    pub fn len(&self) -> usize {
        self.timestamps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.timestamps.is_empty()
    }
}

/// An indicator line aligned 1:1 with the price table it was derived from.
///
/// Positions with insufficient look-back history hold `NaN`. That sentinel
/// is the single "undefined" marker for indicator output; use [`get`] or
/// [`last_n_defined`] to test for defined values uniformly.
///
/// [`get`]: IndicatorSeries::get
/// [`last_n_defined`]: IndicatorSeries::last_n_defined
#[derive(Debug, Clone, PartialEq)]
pub struct IndicatorSeries {
    timestamps: Vec<DateTime<Utc>>,
    values: Vec<f64>,
}

impl IndicatorSeries {
    /// Pair timestamps with values. Both sides must have the same length.
    pub fn new(timestamps: Vec<DateTime<Utc>>, values: Vec<f64>) -> Self {
        assert_eq!(
            timestamps.len(),
            values.len(),
            "indicator series timestamps and values must align"
        );
        Self { timestamps, values }
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Value at `index`, or `None` when out of range or undefined.
    pub fn get(&self, index: usize) -> Option<f64> {
        self.values
            .get(index)
            .copied()
            .filter(|v| !v.is_nan())
    }

    /// Raw values including the `NaN` warm-up prefix, overlay-ready against
    /// the source table's timestamps.
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    pub fn timestamps(&self) -> &[DateTime<Utc>] {
        &self.timestamps
    }

    /// The most recent defined point, if any.
    pub fn last_defined(&self) -> Option<(DateTime<Utc>, f64)> {
        self.timestamps
            .iter()
            .zip(&self.values)
            .rev()
            .find(|(_, v)| !v.is_nan())
            .map(|(ts, v)| (*ts, *v))
    }

    /// Up to `n` most recent defined values, oldest first.
    pub fn last_n_defined(&self, n: usize) -> Vec<f64> {
        let mut tail: Vec<f64> = self
            .values
            .iter()
            .rev()
            .filter(|v| !v.is_nan())
            .take(n)
            .copied()
            .collect();
        tail.reverse();
        tail
    }
}

/// Qualitative market-state classification derived from the Aroon lines.
///
/// Each variant carries a fixed advisory shown to the user alongside the
/// latest indicator values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AroonSignal {
    StrongUptrend,
    StrongDowntrend,
    BullishCrossover,
    BearishCrossover,
    NoClearTrend,
}

impl AroonSignal {
    /// Fixed advisory text for this classification.
    pub fn advice(&self) -> &'static str {
        match self {
            AroonSignal::StrongUptrend => "Strong uptrend detected. Consider long positions.",
            AroonSignal::StrongDowntrend => {
                "Strong downtrend detected. Consider short positions or exits."
            }
            AroonSignal::BullishCrossover => {
                "Bullish crossover. Aroon Up has crossed above Aroon Down."
            }
            AroonSignal::BearishCrossover => {
                "Bearish crossover. Aroon Down has crossed above Aroon Up."
            }
            AroonSignal::NoClearTrend => "No clear trend. Market is consolidating.",
        }
    }
}

impl std::fmt::Display for AroonSignal {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AroonSignal::StrongUptrend => write!(f, "strong uptrend"),
            AroonSignal::StrongDowntrend => write!(f, "strong downtrend"),
            AroonSignal::BullishCrossover => write!(f, "bullish crossover"),
            AroonSignal::BearishCrossover => write!(f, "bearish crossover"),
            AroonSignal::NoClearTrend => write!(f, "no clear trend"),
        }
    }
}

/// Per-ticker result of one analysis run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisSummary {
    pub ticker: String,
    /// Timestamp of the most recent bar with a defined indicator value.
    pub last_date: DateTime<Utc>,
    pub aroon_up: f64,
    pub aroon_down: f64,
    pub signals: Vec<AroonSignal>,
}
