//! Simple Moving Average.

use std::collections::VecDeque;

use crate::{types::count, validate, Float, Indicator, Resettable, Result};

/// Arithmetic mean of every run of `window` consecutive values.
///
/// The output has `data.len() - window + 1` elements; `out[i]` is the mean of
/// `data[i..i + window]`. Windows are slid by adding the entering value and
/// subtracting the leaving one from a compensated running sum, so a large
/// value leaving the window does not wipe out the small ones that remain.
///
/// # Errors
///
/// - `InvalidPeriod` when `window == 0`
/// - `InsufficientData` when `window > data.len()`
/// - `InvalidInput` when `data` contains NaN or infinite values
///
/// # Example
///
/// ```rust
/// use tm_core::overlap::moving_average;
///
/// let ma = moving_average(&[1.0, 2.0, 3.0, 4.0, 5.0], 3)?;
/// assert_eq!(ma, vec![2.0, 3.0, 4.0]);
/// # Ok::<(), tm_core::IndicatorError>(())
/// ```
pub fn moving_average(data: &[Float], window: usize) -> Result<Vec<Float>> {
    validate::period("moving_average", window)?;
    validate::min_len("moving_average", window, data.len())?;
    validate::finite("moving_average", "data", data)?;
    Ok(rolling_mean(data, window))
}

/// Sliding-window mean over already validated input.
pub(crate) fn rolling_mean(data: &[Float], window: usize) -> Vec<Float> {
    let mut out = Vec::with_capacity(data.len() - window + 1);
    let mut sum = RunningSum::default();

    for &x in &data[..window] {
        sum.add(x);
    }
    out.push(sum.mean(data[..window].iter().copied(), window));

    for i in window..data.len() {
        sum.add(-data[i - window]);
        sum.add(data[i]);
        out.push(sum.mean(data[i + 1 - window..=i].iter().copied(), window));
    }
    out
}

/// Neumaier-compensated sum of the values currently in a window.
#[derive(Debug, Clone, Copy, Default)]
struct RunningSum {
    sum: Float,
    compensation: Float,
}

impl RunningSum {
    fn add(&mut self, x: Float) {
        let t = self.sum + x;
        if self.sum.abs() >= x.abs() {
            self.compensation += (self.sum - t) + x;
        } else {
            self.compensation += (x - t) + self.sum;
        }
        self.sum = t;
    }

    fn clear(&mut self) {
        *self = RunningSum::default();
    }

    /// Mean of `window`, which must hold exactly the values added so far.
    ///
    /// An overflowed sum is rebuilt from `window`; a window whose total is out
    /// of range is averaged term by term instead.
    fn mean<I>(&mut self, window: I, len: usize) -> Float
    where
        I: Iterator<Item = Float> + Clone,
    {
        let divisor = count(len);
        let total = self.sum + self.compensation;
        if total.is_finite() {
            return total / divisor;
        }

        self.clear();
        for x in window.clone() {
            self.add(x);
        }
        let total = self.sum + self.compensation;
        if total.is_finite() {
            return total / divisor;
        }

        let mut scaled = RunningSum::default();
        for x in window {
            scaled.add(x / divisor);
        }
        scaled.sum + scaled.compensation
    }
}

/// Streaming moving average.
///
/// Keeps the last `window` values in a ring buffer together with their
/// compensated running sum.
#[derive(Debug, Clone)]
pub struct Sma {
    window: usize,
    buffer: VecDeque<Float>,
    sum: RunningSum,
}

impl Sma {
    /// Create a new streaming moving average over `window` values.
    pub fn new(window: usize) -> Result<Self> {
        validate::period("sma", window)?;
        Ok(Sma {
            window,
            buffer: VecDeque::with_capacity(window),
            sum: RunningSum::default(),
        })
    }

    /// Window length.
    pub fn window(&self) -> usize {
        self.window
    }
}

impl Indicator for Sma {
    type Input = Float;
    type Output = Float;

    fn lookback(&self) -> usize {
        self.window - 1
    }

    fn next(&mut self, input: Float) -> Option<Float> {
        if self.buffer.len() == self.window {
            if let Some(leaving) = self.buffer.pop_front() {
                self.sum.add(-leaving);
            }
        }
        self.buffer.push_back(input);
        self.sum.add(input);

        if self.buffer.len() < self.window {
            return None;
        }
        Some(self.sum.mean(self.buffer.iter().copied(), self.window))
    }
}

impl Resettable for Sma {
    fn reset(&mut self) {
        self.buffer.clear();
        self.sum.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::IndicatorError;

    #[test]
    fn test_moving_average_basic() {
        let result = moving_average(&[1.0, 2.0, 3.0, 4.0, 5.0], 3).unwrap();
        assert_eq!(result.len(), 3);
        assert!((result[0] - 2.0).abs() < 1e-10);
        assert!((result[1] - 3.0).abs() < 1e-10);
        assert!((result[2] - 4.0).abs() < 1e-10);
    }

    #[test]
    fn test_moving_average_window_one_is_identity() {
        let data = [3.0, -1.0, 7.5];
        assert_eq!(moving_average(&data, 1).unwrap(), data.to_vec());
    }

    #[test]
    fn test_moving_average_full_window() {
        let result = moving_average(&[2.0, 4.0, 6.0, 8.0], 4).unwrap();
        assert_eq!(result, vec![5.0]);
    }

    #[test]
    fn test_moving_average_rejects_zero_window() {
        assert!(matches!(
            moving_average(&[1.0, 2.0], 0),
            Err(IndicatorError::InvalidPeriod { period: 0, .. })
        ));
    }

    #[test]
    fn test_moving_average_rejects_window_longer_than_data() {
        assert_eq!(
            moving_average(&[1.0, 2.0, 3.0], 5),
            Err(IndicatorError::insufficient_data(5, 3))
        );
    }

    #[test]
    fn test_moving_average_rejects_nan() {
        assert!(matches!(
            moving_average(&[1.0, Float::NAN, 3.0], 2),
            Err(IndicatorError::InvalidInput { .. })
        ));
    }

    #[test]
    fn test_moving_average_recovers_after_large_value_leaves() {
        let result = moving_average(&[1e17, 1.0, 1.0, 1.0], 2).unwrap();
        assert_eq!(result, vec![5e16, 1.0, 1.0]);
    }

    #[test]
    fn test_moving_average_recovers_from_overflowed_window() {
        let data = [Float::MAX, Float::MAX, 1.0, 1.0];
        let result = moving_average(&data, 2).unwrap();
        assert_eq!(result, vec![Float::MAX, Float::MAX / 2.0, 1.0]);

        let mut sma = Sma::new(2).unwrap();
        let streamed: Vec<Float> = sma.stream(&data).into_iter().flatten().collect();
        assert_eq!(streamed, result);
    }

    #[test]
    fn test_sma_lookback() {
        assert_eq!(Sma::new(5).unwrap().lookback(), 4);
        assert_eq!(Sma::new(1).unwrap().lookback(), 0);
        assert!(Sma::new(0).is_err());
    }

    #[test]
    fn test_sma_stream_matches_batch() {
        let data: Vec<Float> = (0..50).map(|i| ((i * 7) % 13) as Float + 0.25).collect();
        let batch = moving_average(&data, 5).unwrap();

        let mut sma = Sma::new(5).unwrap();
        let streamed: Vec<Float> = sma.stream(&data).into_iter().flatten().collect();

        assert_eq!(streamed.len(), batch.len());
        for (s, b) in streamed.iter().zip(&batch) {
            assert!((s - b).abs() < 1e-9);
        }
    }

    #[test]
    fn test_sma_reset() {
        let mut sma = Sma::new(2).unwrap();
        sma.next(1.0);
        assert_eq!(sma.next(3.0), Some(2.0));
        sma.reset();
        assert_eq!(sma.next(10.0), None);
        assert_eq!(sma.next(20.0), Some(15.0));
    }
}
