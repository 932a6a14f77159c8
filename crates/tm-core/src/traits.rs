//! Core traits for streaming indicators
//!
//! Batch indicators are free functions over slices. The recurrences among them
//! (moving average, EMA, MACD, Force Index, Parabolic SAR) also come as small
//! state machines implementing [`Indicator`], fed one observation at a time.
//!
//! ## Warm-up semantics
//!
//! - **Batch**: leading outputs are dropped (moving average) or reported as
//!   `Float::NAN` placeholders (Parabolic SAR).
//! - **Streaming**: `next()` returns `None` until enough observations have
//!   been seen, then `Some(output)` for every further observation.
//!
//! Streaming and batch computations of the same indicator agree value for value
//! once warmed up.

/// Unified trait for streaming technical analysis indicators
///
/// # Example
///
/// ```rust
/// use tm_core::{overlap::Sma, traits::Indicator};
///
/// let mut sma = Sma::new(3)?;
/// assert_eq!(sma.lookback(), 2);
///
/// let results = sma.stream(&[1.0, 2.0, 3.0, 4.0]);
/// assert_eq!(results, vec![None, None, Some(2.0), Some(3.0)]);
/// # Ok::<(), tm_core::IndicatorError>(())
/// ```
pub trait Indicator {
    /// Input type for this indicator
    ///
    /// Single-series indicators use `Float`; multi-series ones take a tuple,
    /// e.g. `(high, low)` for Parabolic SAR.
    type Input: Copy;

    /// Output type for this indicator
    type Output;

    /// Number of observations consumed before the first `Some` output
    ///
    /// - Moving average over `w` values: `w - 1`
    /// - EMA, MACD: 0 (seeded by the first value)
    /// - Force Index over `w` values: `w` (one extra for the first price change)
    /// - Parabolic SAR: 2
    fn lookback(&self) -> usize;

    /// Process a single new observation
    ///
    /// Returns `None` while the indicator is warming up. This is a normal state,
    /// not an error.
    fn next(&mut self, input: Self::Input) -> Option<Self::Output>;

    /// Process a slice of observations in order
    ///
    /// Each element of the returned vector is the result of calling `next` with
    /// the corresponding input.
    fn stream(&mut self, inputs: &[Self::Input]) -> Vec<Option<Self::Output>> {
        inputs.iter().map(|&input| self.next(input)).collect()
    }
}

/// Trait for indicators that can reset their internal state
///
/// After calling `reset()`, the indicator behaves as if it were just created
/// with the same parameters.
pub trait Resettable {
    /// Reset the indicator to its initial state
    fn reset(&mut self);
}
