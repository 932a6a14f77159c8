//! True Range and Average True Range.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::{
    overlap, simd, types::count, validate, Float, IndicatorError, Result,
};

/// Where the first bar's "previous close" comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum PrevClose {
    /// Closes are shifted circularly: bar 0 is paired with the *last* close.
    /// Produces one true range per bar.
    #[default]
    Wraparound,
    /// Bar 0 has no previous close and gets no true range.
    SkipFirst,
}

/// ATR parameters. Defaults: period 14, mean of the last 5 ATR values,
/// wraparound previous close.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct AtrParams {
    /// Moving-average window over the true range
    pub period: usize,
    /// How many trailing ATR values [`atr`] averages
    pub tail: usize,
    /// Previous-close policy for the first bar
    pub prev_close: PrevClose,
}

impl Default for AtrParams {
    fn default() -> Self {
        AtrParams {
            period: 14,
            tail: 5,
            prev_close: PrevClose::default(),
        }
    }
}

impl AtrParams {
    /// Default tail and policy with the given period.
    pub fn with_period(period: usize) -> Self {
        AtrParams {
            period,
            ..AtrParams::default()
        }
    }

    /// Checks that period and tail are non-zero.
    pub fn validate(&self) -> Result<()> {
        validate::period("atr", self.period)?;
        if self.tail == 0 {
            return Err(IndicatorError::invalid_parameter(
                "tail",
                "0",
                "at least one trailing ATR value",
            ));
        }
        Ok(())
    }
}

/// `max(high - low, |high - prev_close|, |low - prev_close|)` per bar.
///
/// With [`PrevClose::Wraparound`] the output has one value per bar; with
/// [`PrevClose::SkipFirst`] it starts at bar 1.
///
/// # Errors
///
/// - `MisalignedInput` when the three series differ in length
/// - `InsufficientData` when there is no bar to produce a true range from
/// - `InvalidInput` when a series contains NaN or infinite values
pub fn true_range(
    high: &[Float],
    low: &[Float],
    close: &[Float],
    prev_close: PrevClose,
) -> Result<Vec<Float>> {
    check("true_range", high, low, close)?;
    let required = match prev_close {
        PrevClose::Wraparound => 1,
        PrevClose::SkipFirst => 2,
    };
    validate::min_len("true_range", required, high.len())?;
    ranges(high, low, close, prev_close)
}

/// Moving average of the true range over `params.period` bars.
///
/// This is the full ATR series; [`atr`] reduces it to one value.
///
/// # Errors
///
/// As [`true_range`], plus `InvalidPeriod`/`InvalidParameter` for bad
/// parameters and `InsufficientData` when fewer true ranges than `period`
/// exist.
pub fn atr_series(
    high: &[Float],
    low: &[Float],
    close: &[Float],
    params: &AtrParams,
) -> Result<Vec<Float>> {
    params.validate()?;
    check("atr", high, low, close)?;
    let required = match params.prev_close {
        PrevClose::Wraparound => params.period,
        PrevClose::SkipFirst => params.period + 1,
    };
    validate::min_len("atr", required, high.len())?;

    let tr = ranges(high, low, close, params.prev_close)?;
    let mut series = overlap::rolling_mean(&tr, params.period);
    // Compensated sums can still leave a rounding-level -ε on all-zero windows.
    for value in &mut series {
        *value = value.max(0.0);
    }
    Ok(series)
}

/// Mean of the last `params.tail` ATR values (all of them if fewer exist).
///
/// Always `>= 0` for finite input.
///
/// # Example
///
/// ```rust
/// use tm_core::volatility::{atr, AtrParams};
///
/// let high = [10.0, 11.0, 12.0];
/// let low = [9.0, 10.0, 11.0];
/// let close = [9.5, 10.5, 11.5];
/// let value = atr(&high, &low, &close, &AtrParams::with_period(2))?;
/// assert!((value - 1.75).abs() < 1e-12);
/// # Ok::<(), tm_core::IndicatorError>(())
/// ```
pub fn atr(high: &[Float], low: &[Float], close: &[Float], params: &AtrParams) -> Result<Float> {
    let series = atr_series(high, low, close, params)?;
    let tail = &series[series.len().saturating_sub(params.tail)..];
    Ok(simd::sum(tail) / count(tail.len()))
}

fn check(indicator: &'static str, high: &[Float], low: &[Float], close: &[Float]) -> Result<()> {
    validate::aligned(indicator, "low", high.len(), low.len())?;
    validate::aligned(indicator, "close", high.len(), close.len())?;
    validate::finite(indicator, "high", high)?;
    validate::finite(indicator, "low", low)?;
    validate::finite(indicator, "close", close)
}

/// True ranges over validated, non-empty input.
fn ranges(
    high: &[Float],
    low: &[Float],
    close: &[Float],
    prev_close: PrevClose,
) -> Result<Vec<Float>> {
    let n = high.len();
    let spread = simd::sub(high, low)?;

    let first = match prev_close {
        PrevClose::Wraparound => {
            trace!(prev_close = close[n - 1], "first true range pairs with the last close");
            0
        }
        PrevClose::SkipFirst => 1,
    };

    let tr = (first..n)
        .map(|i| {
            let prev = if i == 0 { close[n - 1] } else { close[i - 1] };
            spread[i]
                .max((high[i] - prev).abs())
                .max((low[i] - prev).abs())
        })
        .collect();
    Ok(tr)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bars() -> (Vec<Float>, Vec<Float>, Vec<Float>) {
        (
            vec![10.0, 11.0, 12.0],
            vec![9.0, 10.0, 11.0],
            vec![9.5, 10.5, 11.5],
        )
    }

    #[test]
    fn test_true_range_wraparound_uses_last_close() {
        let (h, l, c) = bars();
        let tr = true_range(&h, &l, &c, PrevClose::Wraparound).unwrap();
        // bar 0 pairs with close 11.5: |9 - 11.5| = 2.5
        assert_eq!(tr, vec![2.5, 1.5, 1.5]);
    }

    #[test]
    fn test_true_range_skip_first() {
        let (h, l, c) = bars();
        let tr = true_range(&h, &l, &c, PrevClose::SkipFirst).unwrap();
        assert_eq!(tr, vec![1.5, 1.5]);
    }

    #[test]
    fn test_atr_series_and_scalar() {
        let (h, l, c) = bars();
        let params = AtrParams::with_period(2);
        let series = atr_series(&h, &l, &c, &params).unwrap();
        assert_eq!(series, vec![2.0, 1.5]);
        assert!((atr(&h, &l, &c, &params).unwrap() - 1.75).abs() < 1e-12);

        let skip = AtrParams {
            prev_close: PrevClose::SkipFirst,
            ..params
        };
        assert_eq!(atr(&h, &l, &c, &skip).unwrap(), 1.5);
    }

    #[test]
    fn test_atr_averages_only_the_tail() {
        let high: Vec<Float> = (0..20).map(|i| 10.0 + i as Float).collect();
        let low: Vec<Float> = high.iter().map(|h| h - 1.0 - 0.1 * h).collect();
        let close: Vec<Float> = high.iter().zip(&low).map(|(h, l)| (h + l) / 2.0).collect();
        let params = AtrParams::with_period(3);

        let series = atr_series(&high, &low, &close, &params).unwrap();
        let expected: Float = series[series.len() - 5..].iter().sum::<Float>() / 5.0;
        assert!((atr(&high, &low, &close, &params).unwrap() - expected).abs() < 1e-9);
    }

    #[test]
    fn test_atr_rejects_bad_input() {
        let (h, l, c) = bars();
        assert_eq!(
            atr(&h, &l, &c[..2], &AtrParams::with_period(2)),
            Err(IndicatorError::misaligned_input("close", 3, 2))
        );
        assert_eq!(
            atr(&h, &l, &c, &AtrParams::with_period(4)),
            Err(IndicatorError::insufficient_data(4, 3))
        );
        let skip = AtrParams {
            prev_close: PrevClose::SkipFirst,
            ..AtrParams::with_period(3)
        };
        assert_eq!(
            atr(&h, &l, &c, &skip),
            Err(IndicatorError::insufficient_data(4, 3))
        );
        let no_tail = AtrParams {
            tail: 0,
            ..AtrParams::with_period(2)
        };
        assert!(matches!(
            atr(&h, &l, &c, &no_tail),
            Err(IndicatorError::InvalidParameter { .. })
        ));
    }

    #[test]
    fn test_atr_rejects_non_finite_input() {
        let (h, l, c) = bars();
        let params = AtrParams::with_period(2);
        for series in 0..3 {
            let mut input = [h.clone(), l.clone(), c.clone()];
            input[series][1] = Float::NAN;
            assert!(matches!(
                atr(&input[0], &input[1], &input[2], &params),
                Err(IndicatorError::InvalidInput { .. })
            ));
            input[series][1] = Float::INFINITY;
            assert!(matches!(
                true_range(&input[0], &input[1], &input[2], PrevClose::Wraparound),
                Err(IndicatorError::InvalidInput { .. })
            ));
        }
    }
}
