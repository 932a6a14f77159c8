//! Relative Strength Index, as a single value for the given price window.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{simd, types::count, validate, Float, IndicatorError, Result};

/// Which differences feed the gain and loss averages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum RsiWindow {
    /// Gains and losses are collected into two separate lists, losing their
    /// positions in time, and the first `period` entries of each are averaged.
    /// An empty list averages to zero.
    #[default]
    Partitioned,
    /// The last `period` differences, each contributing `max(d, 0)` to gains
    /// and `max(-d, 0)` to losses, averaged over `period`.
    Trailing,
}

/// What to return when the average loss is zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum ZeroLossPolicy {
    /// RSI is 100
    #[default]
    Saturate,
    /// Fail with `DivisionByZero`
    Reject,
}

/// RSI parameters. Defaults: period 14, partitioned window, saturate on zero loss.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct RsiParams {
    /// Number of gains/losses (or differences) averaged
    pub period: usize,
    /// Averaging window policy
    pub window: RsiWindow,
    /// Zero average loss policy
    pub zero_loss: ZeroLossPolicy,
}

impl Default for RsiParams {
    fn default() -> Self {
        RsiParams {
            period: 14,
            window: RsiWindow::default(),
            zero_loss: ZeroLossPolicy::default(),
        }
    }
}

impl RsiParams {
    /// Default policies with the given period.
    pub fn with_period(period: usize) -> Self {
        RsiParams {
            period,
            ..RsiParams::default()
        }
    }
}

/// RSI: `100 - 100 / (1 + avg_gain / avg_loss)`.
///
/// # Errors
///
/// - `InvalidPeriod` when `period == 0`
/// - `InsufficientData` when fewer than `period + 1` prices are given
/// - `DivisionByZero` when the average loss is zero under [`ZeroLossPolicy::Reject`]
/// - `InvalidInput` when `prices` contains NaN or infinite values
///
/// # Example
///
/// ```rust
/// use tm_core::momentum::{rsi, RsiParams};
///
/// let value = rsi(&[1.0, 2.0, 3.0, 4.0, 5.0], &RsiParams::with_period(3))?;
/// assert_eq!(value, 100.0);
/// # Ok::<(), tm_core::IndicatorError>(())
/// ```
pub fn rsi(prices: &[Float], params: &RsiParams) -> Result<Float> {
    let period = params.period;
    validate::period("rsi", period)?;
    validate::min_len("rsi", period + 1, prices.len())?;
    validate::finite("rsi", "prices", prices)?;

    let changes = simd::sub(&prices[1..], &prices[..prices.len() - 1])?;
    let (avg_gain, avg_loss) = match params.window {
        RsiWindow::Partitioned => partitioned_averages(&changes, period),
        RsiWindow::Trailing => trailing_averages(&changes[changes.len() - period..]),
    };

    if avg_loss == 0.0 {
        return match params.zero_loss {
            ZeroLossPolicy::Saturate => {
                debug!(avg_gain, "rsi saturated on zero average loss");
                Ok(100.0)
            }
            ZeroLossPolicy::Reject => Err(IndicatorError::division_by_zero(
                "rsi average loss is zero",
            )),
        };
    }

    let rs = avg_gain / avg_loss;
    Ok(100.0 - 100.0 / (1.0 + rs))
}

fn partitioned_averages(changes: &[Float], period: usize) -> (Float, Float) {
    let gains: Vec<Float> = changes
        .iter()
        .copied()
        .filter(|&d| d > 0.0)
        .take(period)
        .collect();
    let losses: Vec<Float> = changes
        .iter()
        .filter(|&&d| d < 0.0)
        .map(|&d| -d)
        .take(period)
        .collect();
    (mean_or_zero(&gains), mean_or_zero(&losses))
}

fn trailing_averages(window: &[Float]) -> (Float, Float) {
    let (gain, loss) = window.iter().fold((0.0, 0.0), |(g, l), &d| {
        if d > 0.0 {
            (g + d, l)
        } else {
            (g, l - d)
        }
    });
    let n = count(window.len());
    (gain / n, loss / n)
}

fn mean_or_zero(values: &[Float]) -> Float {
    if values.is_empty() {
        return 0.0;
    }
    simd::sum(values) / count(values.len())
}
