//! Donchian Channel.

use std::collections::VecDeque;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::{validate, Float, Result};

/// Highest high and lowest low over the last `window` bars: `(upper, lower)`.
///
/// # Errors
///
/// - `MisalignedInput` when `high` and `low` differ in length
/// - `InvalidPeriod` when `window == 0`
/// - `InsufficientData` when `window > high.len()`
///
/// # Example
///
/// ```rust
/// use tm_core::overlap::donchian_channel;
///
/// let channel = donchian_channel(&[1.0, 5.0, 3.0, 8.0, 2.0], &[0.0, 1.0, 2.0, 1.0, 0.0], 3)?;
/// assert_eq!(channel, (8.0, 0.0));
/// # Ok::<(), tm_core::IndicatorError>(())
/// ```
pub fn donchian_channel(high: &[Float], low: &[Float], window: usize) -> Result<(Float, Float)> {
    check("donchian_channel", high, low, window)?;
    let start = high.len() - window;
    let upper = high[start..].iter().copied().fold(Float::NEG_INFINITY, Float::max);
    let lower = low[start..].iter().copied().fold(Float::INFINITY, Float::min);
    Ok((upper, lower))
}

/// Rolling channel bounds, one pair per complete window.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct DonchianSeries {
    /// Highest high of each window
    pub upper: Vec<Float>,
    /// Lowest low of each window
    pub lower: Vec<Float>,
}

/// Rolling Donchian Channel of length `high.len() - window + 1`.
///
/// Uses monotonic deques of indices so each bar is pushed and popped at most
/// once per bound.
pub fn donchian_series(high: &[Float], low: &[Float], window: usize) -> Result<DonchianSeries> {
    check("donchian_series", high, low, window)?;
    Ok(DonchianSeries {
        upper: rolling_extreme(high, window, |candidate, kept| candidate >= kept),
        lower: rolling_extreme(low, window, |candidate, kept| candidate <= kept),
    })
}

fn check(indicator: &'static str, high: &[Float], low: &[Float], window: usize) -> Result<()> {
    validate::aligned(indicator, "low", high.len(), low.len())?;
    validate::period(indicator, window)?;
    validate::min_len(indicator, window, high.len())?;
    validate::finite(indicator, "high", high)?;
    validate::finite(indicator, "low", low)
}

/// `dominates(candidate, kept)` is true when `candidate` makes `kept` useless
/// for every window still to come.
fn rolling_extreme<F>(data: &[Float], window: usize, dominates: F) -> Vec<Float>
where
    F: Fn(Float, Float) -> bool,
{
    let mut out = Vec::with_capacity(data.len() + 1 - window);
    let mut deque: VecDeque<usize> = VecDeque::with_capacity(window);

    for (i, &value) in data.iter().enumerate() {
        while deque.back().is_some_and(|&j| dominates(value, data[j])) {
            deque.pop_back();
        }
        deque.push_back(i);
        if deque.front().is_some_and(|&j| j + window <= i) {
            deque.pop_front();
        }
        if i + 1 >= window {
            if let Some(&j) = deque.front() {
                out.push(data[j]);
            }
        }
    }
    out
}
