use std::collections::VecDeque;

use common::{Error, IndicatorSeries, PriceColumn, PriceTable, Result};

/// Compute the Aroon Up / Aroon Down lines over `table`.
///
/// For each bar `i` with a full look-back window of `period` bars, the Up
/// line measures how recently the window high was set:
///
/// ```text
/// aroon_up[i] = 100 * (j_max + 1) / period
/// ```
///
/// where `j_max` is the 0-based window position of the maximum high. A high
/// set on the current bar yields 100; one at the oldest in-window bar yields
/// `100 / period`. The Down line is computed identically over minimum lows.
/// When two bars tie for the window extremum, the FIRST occurrence governs.
///
/// The first `period - 1` positions of both output series are `NaN`
/// (insufficient history); output length always equals input length, so the
/// lines overlay directly onto the price series. A table shorter than
/// `period` is not an error — it simply produces all-`NaN` output.
///
/// # Errors
///
/// - [`Error::Schema`] if the table lacks a `high` or `low` column.
/// - [`Error::InvalidParameter`] if `period` is zero.
pub fn calculate_aroon(
    table: &PriceTable,
    period: usize,
) -> Result<(IndicatorSeries, IndicatorSeries)> {
    let high = table.column(PriceColumn::High)?;
    let low = table.column(PriceColumn::Low)?;

    if period == 0 {
        return Err(Error::InvalidParameter(
            "Aroon period must be positive".to_string(),
        ));
    }

    let len = high.len();
    let mut up = vec![f64::NAN; len];
    let mut down = vec![f64::NAN; len];

    // Monotonic index queues over the trailing window, updated in O(1)
    // amortized per bar. Strict comparisons leave equal values in place,
    // so the front always holds the first occurrence of the extremum.
    let mut max_idx: VecDeque<usize> = VecDeque::with_capacity(period);
    let mut min_idx: VecDeque<usize> = VecDeque::with_capacity(period);

    for i in 0..len {
        while let Some(&back) = max_idx.back() {
            if high[back] < high[i] {
                max_idx.pop_back();
            } else {
                break;
            }
        }
        max_idx.push_back(i);

        while let Some(&back) = min_idx.back() {
            if low[back] > low[i] {
                min_idx.pop_back();
            } else {
                break;
            }
        }
        min_idx.push_back(i);

        // Evict indices that slid out of the window [i + 1 - period, i].
        while let Some(&front) = max_idx.front() {
            if front + period <= i {
                max_idx.pop_front();
            } else {
                break;
            }
        }
        while let Some(&front) = min_idx.front() {
            if front + period <= i {
                min_idx.pop_front();
            } else {
                break;
            }
        }

        if i + 1 >= period {
            let window_start = i + 1 - period;
            if let (Some(&hi), Some(&lo)) = (max_idx.front(), min_idx.front()) {
                let j_max = (hi - window_start) as f64;
                let j_min = (lo - window_start) as f64;
                up[i] = 100.0 * (j_max + 1.0) / period as f64;
                down[i] = 100.0 * (j_min + 1.0) / period as f64;
            }
        }
    }

    let timestamps = table.timestamps().to_vec();
    Ok((
        IndicatorSeries::new(timestamps.clone(), up),
        IndicatorSeries::new(timestamps, down),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone, Utc};
    use common::PriceBar;

    fn table_from_highs_lows(highs: &[f64], lows: &[f64]) -> PriceTable {
        let start = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let bars: Vec<PriceBar> = highs
            .iter()
            .zip(lows)
            .enumerate()
            .map(|(i, (&high, &low))| PriceBar {
                timestamp: start + Duration::days(i as i64),
                open: low,
                high,
                low,
                close: high,
            })
            .collect();
        PriceTable::from_bars(&bars)
    }

    #[test]
    fn missing_low_column_is_a_schema_error() {
        let table = {
            let mut t = PriceTable::new(vec![
                Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
                Utc.with_ymd_and_hms(2024, 1, 2, 0, 0, 0).unwrap(),
            ]);
            t.insert_column(PriceColumn::High, vec![10.0, 11.0]).unwrap();
            t
        };

        let err = calculate_aroon(&table, 2).unwrap_err();
        assert!(matches!(
            err,
            Error::Schema {
                column: PriceColumn::Low
            }
        ));
    }

    #[test]
    fn zero_period_is_an_invalid_parameter() {
        let table = table_from_highs_lows(&[10.0, 11.0], &[9.0, 10.0]);
        let err = calculate_aroon(&table, 0).unwrap_err();
        assert!(matches!(err, Error::InvalidParameter(_)));
    }

    #[test]
    fn output_is_aligned_with_input() {
        let highs = [22.0, 23.0, 21.0, 24.0, 25.0, 20.0, 19.0, 22.0, 23.0, 21.0];
        let lows = [20.0, 21.0, 19.0, 22.0, 23.0, 18.0, 17.0, 20.0, 21.0, 19.0];
        let table = table_from_highs_lows(&highs, &lows);

        let (up, down) = calculate_aroon(&table, 4).unwrap();
        assert_eq!(up.len(), table.len());
        assert_eq!(down.len(), table.len());
        assert_eq!(up.timestamps(), table.timestamps());
        assert_eq!(down.timestamps(), table.timestamps());
    }

    #[test]
    fn warm_up_prefix_is_undefined() {
        let highs = [22.0, 23.0, 21.0, 24.0, 25.0, 20.0];
        let lows = [20.0, 21.0, 19.0, 22.0, 23.0, 18.0];
        let table = table_from_highs_lows(&highs, &lows);

        let (up, down) = calculate_aroon(&table, 4).unwrap();
        for i in 0..3 {
            assert!(up.values()[i].is_nan(), "up[{i}] should be undefined");
            assert!(down.values()[i].is_nan(), "down[{i}] should be undefined");
        }
        for i in 3..6 {
            assert!(!up.values()[i].is_nan(), "up[{i}] should be defined");
            assert!(!down.values()[i].is_nan(), "down[{i}] should be defined");
        }
    }

    #[test]
    fn short_table_yields_all_undefined_not_an_error() {
        let table = table_from_highs_lows(&[10.0, 11.0], &[9.0, 10.0]);
        let (up, down) = calculate_aroon(&table, 5).unwrap();
        assert!(up.values().iter().all(|v| v.is_nan()));
        assert!(down.values().iter().all(|v| v.is_nan()));
    }

    #[test]
    fn monotonic_highs_pin_aroon_up_at_100() {
        let highs: Vec<f64> = (0..20).map(|i| 100.0 + i as f64).collect();
        let lows: Vec<f64> = highs.iter().map(|h| h - 1.0).collect();
        let table = table_from_highs_lows(&highs, &lows);

        let (up, _) = calculate_aroon(&table, 5).unwrap();
        for i in 4..20 {
            assert!(
                (up.values()[i] - 100.0).abs() < 1e-12,
                "up[{i}] = {}, expected 100",
                up.values()[i]
            );
        }
    }

    #[test]
    fn monotonic_lows_pin_aroon_down_at_100() {
        let lows: Vec<f64> = (0..20).map(|i| 100.0 - i as f64).collect();
        let highs: Vec<f64> = lows.iter().map(|l| l + 1.0).collect();
        let table = table_from_highs_lows(&highs, &lows);

        let (_, down) = calculate_aroon(&table, 5).unwrap();
        for i in 4..20 {
            assert!(
                (down.values()[i] - 100.0).abs() < 1e-12,
                "down[{i}] = {}, expected 100",
                down.values()[i]
            );
        }
    }

    #[test]
    fn tied_highs_resolve_to_the_first_occurrence() {
        // Window maximum 25 occurs at window positions 1 and 2; the first
        // occurrence governs: 100 * (1 + 1) / 4 = 50.
        let highs = [20.0, 25.0, 25.0, 20.0];
        let lows = [10.0, 11.0, 12.0, 13.0];
        let table = table_from_highs_lows(&highs, &lows);

        let (up, _) = calculate_aroon(&table, 4).unwrap();
        assert!((up.values()[3] - 50.0).abs() < 1e-12, "got {}", up.values()[3]);
    }

    #[test]
    fn hand_checked_small_series() {
        // period 3 windows over highs [10, 12, 11, 9, 13]:
        //   i=2: [10, 12, 11] -> max at window pos 1 -> 100 * 2/3
        //   i=3: [12, 11,  9] -> max at window pos 0 -> 100 * 1/3
        //   i=4: [11,  9, 13] -> max at window pos 2 -> 100
        let highs = [10.0, 12.0, 11.0, 9.0, 13.0];
        let lows = [5.0, 6.0, 4.0, 3.0, 7.0];
        let table = table_from_highs_lows(&highs, &lows);

        let (up, down) = calculate_aroon(&table, 3).unwrap();
        let expected_up = [200.0 / 3.0, 100.0 / 3.0, 100.0];
        for (i, want) in (2..5).zip(expected_up) {
            assert!(
                (up.values()[i] - want).abs() < 1e-9,
                "up[{i}] = {}, expected {want}",
                up.values()[i]
            );
        }

        // lows [5, 6, 4, 3, 7]: minima at window positions 0, 2, 1
        let expected_down = [100.0 / 3.0, 100.0, 200.0 / 3.0];
        for (i, want) in (2..5).zip(expected_down) {
            assert!(
                (down.values()[i] - want).abs() < 1e-9,
                "down[{i}] = {}, expected {want}",
                down.values()[i]
            );
        }
    }

    #[test]
    fn defined_values_stay_within_percentage_bounds() {
        let highs = [22.0, 23.0, 21.0, 24.0, 25.0, 20.0, 19.0, 22.0, 23.0, 21.0];
        let lows = [20.0, 21.0, 19.0, 22.0, 23.0, 18.0, 17.0, 20.0, 21.0, 19.0];
        let table = table_from_highs_lows(&highs, &lows);

        let (up, down) = calculate_aroon(&table, 4).unwrap();
        for series in [&up, &down] {
            for &v in series.values().iter().filter(|v| !v.is_nan()) {
                assert!((0.0..=100.0).contains(&v), "value {v} out of range");
            }
        }
    }

    #[test]
    fn repeated_calls_are_bit_identical() {
        let highs = [22.0, 23.0, 21.0, 24.0, 25.0, 20.0, 19.0, 22.0];
        let lows = [20.0, 21.0, 19.0, 22.0, 23.0, 18.0, 17.0, 20.0];
        let table = table_from_highs_lows(&highs, &lows);

        let (up_a, down_a) = calculate_aroon(&table, 4).unwrap();
        let (up_b, down_b) = calculate_aroon(&table, 4).unwrap();

        let bits = |s: &IndicatorSeries| -> Vec<u64> {
            s.values().iter().map(|v| v.to_bits()).collect()
        };
        assert_eq!(bits(&up_a), bits(&up_b));
        assert_eq!(bits(&down_a), bits(&down_b));
    }
}
