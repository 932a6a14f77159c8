//! Exponential Moving Average.

use crate::{types::count, validate, Float, Indicator, Resettable, Result};

/// Smoothing factor `2 / (window + 1)`.
#[inline]
pub fn smoothing_factor(window: usize) -> Float {
    2.0 / (count(window) + 1.0)
}

/// Exponential moving average seeded with the first value.
///
/// `out[0] = data[0]` and `out[i] = out[i-1] + α·(data[i] − out[i-1])` with
/// `α = 2 / (window + 1)`. The output has the same length as the input and is
/// evaluated strictly left to right.
///
/// # Errors
///
/// - `InvalidPeriod` when `window == 0`
/// - `InsufficientData` when `data` is empty
/// - `InvalidInput` when `data` contains NaN or infinite values
///
/// # Example
///
/// ```rust
/// use tm_core::overlap::ema;
///
/// let out = ema(&[1.0, 2.0, 3.0], 3)?;
/// assert_eq!(out, vec![1.0, 1.5, 2.25]);
/// # Ok::<(), tm_core::IndicatorError>(())
/// ```
pub fn ema(data: &[Float], window: usize) -> Result<Vec<Float>> {
    validate::period("ema", window)?;
    validate::min_len("ema", 1, data.len())?;
    validate::finite("ema", "data", data)?;
    Ok(smooth(data, smoothing_factor(window)))
}

/// EMA recurrence over already validated, non-empty input.
pub(crate) fn smooth(data: &[Float], alpha: Float) -> Vec<Float> {
    let mut out = Vec::with_capacity(data.len());
    let mut prev = data[0];
    out.push(prev);
    for &x in &data[1..] {
        prev += alpha * (x - prev);
        out.push(prev);
    }
    out
}

/// Streaming exponential moving average.
#[derive(Debug, Clone)]
pub struct Ema {
    window: usize,
    alpha: Float,
    current: Option<Float>,
}

impl Ema {
    /// Create a new streaming EMA.
    pub fn new(window: usize) -> Result<Self> {
        validate::period("ema", window)?;
        Ok(Ema {
            window,
            alpha: smoothing_factor(window),
            current: None,
        })
    }

    /// Window the smoothing factor was derived from.
    pub fn window(&self) -> usize {
        self.window
    }

    /// Latest value, if any input has been seen.
    pub fn value(&self) -> Option<Float> {
        self.current
    }
}

impl Indicator for Ema {
    type Input = Float;
    type Output = Float;

    fn lookback(&self) -> usize {
        0
    }

    fn next(&mut self, input: Float) -> Option<Float> {
        let value = match self.current {
            Some(prev) => prev + self.alpha * (input - prev),
            None => input,
        };
        self.current = Some(value);
        Some(value)
    }
}

impl Resettable for Ema {
    fn reset(&mut self) {
        self.current = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::IndicatorError;

    #[test]
    fn test_ema_seed_and_length() {
        let data = [10.0, 11.0, 12.0, 13.0];
        let out = ema(&data, 5).unwrap();
        assert_eq!(out.len(), data.len());
        assert_eq!(out[0], 10.0);
    }

    #[test]
    fn test_ema_recurrence() {
        // alpha = 0.5 for window 3
        let out = ema(&[2.0, 4.0, 8.0], 3).unwrap();
        assert!((out[1] - 3.0).abs() < 1e-12);
        assert!((out[2] - 5.5).abs() < 1e-12);
    }

    #[test]
    fn test_ema_window_one_tracks_input() {
        let data = [1.0, 5.0, -2.0];
        assert_eq!(ema(&data, 1).unwrap(), data.to_vec());
    }

    #[test]
    fn test_ema_constant_input_stays_constant() {
        let out = ema(&[0.1; 40], 26).unwrap();
        assert!(out.iter().all(|&v| v == 0.1));
    }

    #[test]
    fn test_ema_rejects_empty_and_zero_window() {
        assert_eq!(ema(&[], 3), Err(IndicatorError::insufficient_data(1, 0)));
        assert!(matches!(
            ema(&[1.0], 0),
            Err(IndicatorError::InvalidPeriod { .. })
        ));
    }

    #[test]
    fn test_ema_stream_matches_batch() {
        let data: Vec<Float> = (0..30).map(|i| (i as Float).sin() * 10.0 + 50.0).collect();
        let batch = ema(&data, 9).unwrap();
        let mut stream = Ema::new(9).unwrap();
        for (x, expected) in data.iter().zip(&batch) {
            assert_eq!(stream.next(*x), Some(*expected));
        }
    }

    #[test]
    fn test_ema_reset() {
        let mut stream = Ema::new(3).unwrap();
        stream.next(4.0);
        stream.next(8.0);
        stream.reset();
        assert_eq!(stream.value(), None);
        assert_eq!(stream.next(1.0), Some(1.0));
    }

    #[test]
    fn test_ema_rejects_non_finite_input() {
        assert!(matches!(
            ema(&[1.0, Float::INFINITY, 3.0], 2),
            Err(IndicatorError::InvalidInput { .. })
        ));
        assert!(matches!(
            ema(&[Float::NAN], 2),
            Err(IndicatorError::InvalidInput { .. })
        ));
    }
}
