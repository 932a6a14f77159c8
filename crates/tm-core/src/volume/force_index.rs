//! Elder Force Index: price change times volume, smoothed by a moving average.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::{
    overlap::{self, Sma},
    simd, validate, Float, Indicator, Resettable, Result,
};

/// Which bar's volume multiplies the change `closes[i+1] - closes[i]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum VolumeAlignment {
    /// `volumes[i]`: the volume of the earlier bar of the pair
    #[default]
    Leading,
    /// `volumes[i+1]`: the volume of the bar that produced the change
    Current,
}

/// Force Index parameters. Defaults: window 13, leading volume.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct ForceIndexParams {
    /// Moving-average window over the raw force values
    pub window: usize,
    /// Volume pairing policy
    pub volume_alignment: VolumeAlignment,
}

impl Default for ForceIndexParams {
    fn default() -> Self {
        ForceIndexParams {
            window: 13,
            volume_alignment: VolumeAlignment::default(),
        }
    }
}

impl ForceIndexParams {
    /// Default alignment with the given window.
    pub fn with_window(window: usize) -> Self {
        ForceIndexParams {
            window,
            ..ForceIndexParams::default()
        }
    }
}

/// Smoothed Elder Force Index of length `(closes.len() - 1) - window + 1`.
///
/// # Errors
///
/// - `MisalignedInput` when `volumes.len() != closes.len()`
/// - `InvalidPeriod` when `window == 0`
/// - `InsufficientData` when fewer than `window + 1` closes are given
/// - `InvalidInput` when a series contains NaN or infinite values
///
/// # Example
///
/// ```rust
/// use tm_core::volume::{elder_force_index, ForceIndexParams};
///
/// let closes = [10.0, 11.0, 10.5, 12.0];
/// let volumes = [100.0, 200.0, 300.0, 400.0];
/// let efi = elder_force_index(&closes, &volumes, &ForceIndexParams::with_window(2))?;
/// assert_eq!(efi, vec![0.0, 175.0]);
/// # Ok::<(), tm_core::IndicatorError>(())
/// ```
pub fn elder_force_index(
    closes: &[Float],
    volumes: &[Float],
    params: &ForceIndexParams,
) -> Result<Vec<Float>> {
    validate::aligned("elder_force_index", "volumes", closes.len(), volumes.len())?;
    validate::period("elder_force_index", params.window)?;
    validate::min_len("elder_force_index", params.window + 1, closes.len())?;
    validate::finite("elder_force_index", "closes", closes)?;
    validate::finite("elder_force_index", "volumes", volumes)?;

    let n = closes.len();
    let changes = simd::sub(&closes[1..], &closes[..n - 1])?;
    let paired = match params.volume_alignment {
        VolumeAlignment::Leading => &volumes[..n - 1],
        VolumeAlignment::Current => &volumes[1..],
    };
    let force = simd::mul(&changes, paired)?;
    Ok(overlap::rolling_mean(&force, params.window))
}

/// Streaming Force Index fed with `(close, volume)` bars.
#[derive(Debug, Clone)]
pub struct ForceIndex {
    alignment: VolumeAlignment,
    prev: Option<(Float, Float)>,
    sma: Sma,
}

impl ForceIndex {
    /// Create a new streaming Force Index.
    pub fn new(params: ForceIndexParams) -> Result<Self> {
        Ok(ForceIndex {
            alignment: params.volume_alignment,
            prev: None,
            sma: Sma::new(params.window)?,
        })
    }
}

impl Indicator for ForceIndex {
    type Input = (Float, Float);
    type Output = Float;

    fn lookback(&self) -> usize {
        self.sma.lookback() + 1
    }

    fn next(&mut self, (close, volume): (Float, Float)) -> Option<Float> {
        let (prev_close, prev_volume) = self.prev.replace((close, volume))?;
        let paired = match self.alignment {
            VolumeAlignment::Leading => prev_volume,
            VolumeAlignment::Current => volume,
        };
        self.sma.next((close - prev_close) * paired)
    }
}

impl Resettable for ForceIndex {
    fn reset(&mut self) {
        self.prev = None;
        self.sma.reset();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::IndicatorError;

    const CLOSES: [Float; 4] = [10.0, 11.0, 10.5, 12.0];
    const VOLUMES: [Float; 4] = [100.0, 200.0, 300.0, 400.0];

    #[test]
    fn test_force_index_leading_volume() {
        // force = [1*100, -0.5*200, 1.5*300] = [100, -100, 450]
        let efi = elder_force_index(&CLOSES, &VOLUMES, &ForceIndexParams::with_window(2)).unwrap();
        assert_eq!(efi, vec![0.0, 175.0]);
    }

    #[test]
    fn test_force_index_current_volume() {
        // force = [1*200, -0.5*300, 1.5*400] = [200, -150, 600]
        let params = ForceIndexParams {
            window: 2,
            volume_alignment: VolumeAlignment::Current,
        };
        let efi = elder_force_index(&CLOSES, &VOLUMES, &params).unwrap();
        assert_eq!(efi, vec![25.0, 225.0]);
    }

    #[test]
    fn test_force_index_output_length() {
        let closes: Vec<Float> = (0..30).map(|i| 50.0 + (i % 4) as Float).collect();
        let volumes = vec![1_000.0; 30];
        let efi = elder_force_index(&closes, &volumes, &ForceIndexParams::default()).unwrap();
        assert_eq!(efi.len(), (30 - 1) - 13 + 1);
    }

    #[test]
    fn test_force_index_rejects_misaligned_volumes() {
        assert_eq!(
            elder_force_index(&CLOSES, &VOLUMES[..3], &ForceIndexParams::with_window(2)),
            Err(IndicatorError::misaligned_input("volumes", 4, 3))
        );
    }

    #[test]
    fn test_force_index_needs_window_plus_one_closes() {
        assert_eq!(
            elder_force_index(&CLOSES, &VOLUMES, &ForceIndexParams::with_window(4)),
            Err(IndicatorError::insufficient_data(5, 4))
        );
    }

    #[test]
    fn test_force_index_recovers_after_volume_spike() {
        // force = [1e17, -1, 0.5, 0.5, -0.5]
        let closes = [100.0, 101.0, 100.0, 100.5, 101.0, 100.5];
        let volumes = [1e17, 1.0, 1.0, 1.0, 1.0, 1.0];
        let efi = elder_force_index(&closes, &volumes, &ForceIndexParams::with_window(2)).unwrap();
        assert_eq!(efi, vec![5e16, -0.25, 0.5, 0.0]);
    }

    #[test]
    fn test_force_index_rejects_non_finite_input() {
        let params = ForceIndexParams::with_window(2);
        let mut closes = CLOSES;
        closes[1] = Float::NAN;
        assert!(matches!(
            elder_force_index(&closes, &VOLUMES, &params),
            Err(IndicatorError::InvalidInput { .. })
        ));

        let mut volumes = VOLUMES;
        volumes[3] = Float::INFINITY;
        assert!(matches!(
            elder_force_index(&CLOSES, &volumes, &params),
            Err(IndicatorError::InvalidInput { .. })
        ));
    }

    #[test]
    fn test_force_index_reset() {
        let mut stream = ForceIndex::new(ForceIndexParams::with_window(2)).unwrap();
        let bars: Vec<(Float, Float)> = CLOSES.iter().copied().zip(VOLUMES).collect();
        let first = stream.stream(&bars);

        stream.reset();
        assert_eq!(stream.next(bars[0]), None);
        assert_eq!(stream.next(bars[1]), None);
        stream.reset();
        assert_eq!(stream.stream(&bars), first);
    }

    #[test]
    fn test_force_index_stream_matches_batch() {
        for alignment in [VolumeAlignment::Leading, VolumeAlignment::Current] {
            let params = ForceIndexParams {
                window: 2,
                volume_alignment: alignment,
            };
            let batch = elder_force_index(&CLOSES, &VOLUMES, &params).unwrap();
            let mut stream = ForceIndex::new(params).unwrap();
            assert_eq!(stream.lookback(), 2);

            let bars: Vec<(Float, Float)> = CLOSES.iter().copied().zip(VOLUMES).collect();
            let streamed: Vec<Float> = stream.stream(&bars).into_iter().flatten().collect();
            assert_eq!(streamed, batch);
        }
    }
}
