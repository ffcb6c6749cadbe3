use common::{AroonSignal, Error, IndicatorSeries, Result};

/// Aroon level a line must exceed to signal a strong trend. Charts draw a
/// reference line here.
const UPPER_THRESHOLD: f64 = 70.0;
/// Level the opposite line must stay under to confirm a strong trend, and
/// the lower bound of the consolidation band.
const LOWER_THRESHOLD: f64 = 30.0;

/// Classify the current market state from the two most recent defined
/// points of the Aroon lines.
///
/// Zero or more signals may fire on one evaluation; they are emitted in
/// rule order. The strong-trend rules are an if/else-if pair, as are the
/// crossover rules. The consolidation rule is independent of both pairs
/// and can accompany a crossover (never a strong trend — the value ranges
/// are disjoint).
///
/// # Errors
///
/// [`Error::InsufficientHistory`] unless both series hold at least two
/// defined trailing points.
pub fn analyze_aroon_signals(
    up: &IndicatorSeries,
    down: &IndicatorSeries,
) -> Result<Vec<AroonSignal>> {
    let up_tail = up.last_n_defined(2);
    let down_tail = down.last_n_defined(2);
    let fewest = up_tail.len().min(down_tail.len());
    if fewest < 2 {
        return Err(Error::InsufficientHistory {
            required: 2,
            actual: fewest,
        });
    }

    let (up_prev, up_last) = (up_tail[0], up_tail[1]);
    let (down_prev, down_last) = (down_tail[0], down_tail[1]);

    let mut signals = Vec::new();

    if up_last > UPPER_THRESHOLD && down_last < LOWER_THRESHOLD {
        signals.push(AroonSignal::StrongUptrend);
    } else if down_last > UPPER_THRESHOLD && up_last < LOWER_THRESHOLD {
        signals.push(AroonSignal::StrongDowntrend);
    }

    if up_prev < down_prev && up_last > down_last {
        signals.push(AroonSignal::BullishCrossover);
    } else if up_prev > down_prev && up_last < down_last {
        signals.push(AroonSignal::BearishCrossover);
    }

    if (LOWER_THRESHOLD..=UPPER_THRESHOLD).contains(&up_last)
        && (LOWER_THRESHOLD..=UPPER_THRESHOLD).contains(&down_last)
    {
        signals.push(AroonSignal::NoClearTrend);
    }

    Ok(signals)
}
