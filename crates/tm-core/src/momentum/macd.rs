//! Moving Average Convergence Divergence.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::{
    overlap::{self, smoothing_factor, Ema},
    simd, validate, Float, Indicator, Resettable, Result,
};

/// MACD periods. Defaults: 12 / 26 / 9.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct MacdParams {
    /// Fast EMA window
    pub fast: usize,
    /// Slow EMA window
    pub slow: usize,
    /// Signal-line EMA window
    pub signal: usize,
}

impl Default for MacdParams {
    fn default() -> Self {
        MacdParams {
            fast: 12,
            slow: 26,
            signal: 9,
        }
    }
}

impl MacdParams {
    /// Checks that every period is non-zero.
    pub fn validate(&self) -> Result<()> {
        validate::period("macd", self.fast)?;
        validate::period("macd", self.slow)?;
        validate::period("macd", self.signal)
    }
}

/// MACD line, signal line and histogram, each as long as the input.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct MacdOutput {
    /// `ema(fast) - ema(slow)`
    pub macd: Vec<Float>,
    /// EMA of the MACD line
    pub signal: Vec<Float>,
    /// `macd - signal`
    pub histogram: Vec<Float>,
}

/// MACD over closing prices.
///
/// No warm-up values are dropped: EMA keeps the input length, so the early
/// part of each series is computed from a short history and is less reliable.
///
/// # Errors
///
/// - `InvalidPeriod` when any period is zero
/// - `InsufficientData` when `closes` is empty
/// - `InvalidInput` when `closes` contains NaN or infinite values
///
/// # Example
///
/// ```rust
/// use tm_core::momentum::{macd, MacdParams};
///
/// let out = macd(&[5.0; 30], &MacdParams::default())?;
/// assert!(out.macd.iter().all(|&v| v == 0.0));
/// # Ok::<(), tm_core::IndicatorError>(())
/// ```
pub fn macd(closes: &[Float], params: &MacdParams) -> Result<MacdOutput> {
    params.validate()?;
    validate::min_len("macd", 1, closes.len())?;
    validate::finite("macd", "closes", closes)?;

    let fast = overlap::smooth(closes, smoothing_factor(params.fast));
    let slow = overlap::smooth(closes, smoothing_factor(params.slow));
    let line = simd::sub(&fast, &slow)?;
    let signal = overlap::smooth(&line, smoothing_factor(params.signal));
    let histogram = simd::sub(&line, &signal)?;

    Ok(MacdOutput {
        macd: line,
        signal,
        histogram,
    })
}

/// Streaming MACD producing `(macd, signal, histogram)` per close.
#[derive(Debug, Clone)]
pub struct Macd {
    fast: Ema,
    slow: Ema,
    signal: Ema,
}

impl Macd {
    /// Create a new streaming MACD.
    pub fn new(params: MacdParams) -> Result<Self> {
        params.validate()?;
        Ok(Macd {
            fast: Ema::new(params.fast)?,
            slow: Ema::new(params.slow)?,
            signal: Ema::new(params.signal)?,
        })
    }
}

impl Indicator for Macd {
    type Input = Float;
    type Output = (Float, Float, Float);

    fn lookback(&self) -> usize {
        0
    }

    fn next(&mut self, close: Float) -> Option<(Float, Float, Float)> {
        let line = self.fast.next(close)? - self.slow.next(close)?;
        let signal = self.signal.next(line)?;
        Some((line, signal, line - signal))
    }
}

impl Resettable for Macd {
    fn reset(&mut self) {
        self.fast.reset();
        self.slow.reset();
        self.signal.reset();
    }
}
