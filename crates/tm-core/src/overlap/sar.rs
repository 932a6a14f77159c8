//! Parabolic SAR (Stop And Reverse).
//!
//! The indicator carries `{sar, trend, ep, af}` from bar to bar; each bar is a
//! pure transition of that state given the current and two prior highs/lows.
//! Bars 0 and 1 only seed the state, so their SAR is a `NaN` placeholder and
//! their trend is [`Trend::Uninitialized`].

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::{validate, Float, Indicator, IndicatorError, Resettable, Result};

/// Trend label of a bar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Trend {
    /// Seed bar, no trend yet
    #[default]
    Uninitialized,
    /// Rising: SAR trails below price
    Up,
    /// Falling: SAR trails above price
    Down,
}

impl Trend {
    /// Lowercase label: `"uninitialized"`, `"up"` or `"down"`.
    pub fn as_str(&self) -> &'static str {
        match self {
            Trend::Uninitialized => "uninitialized",
            Trend::Up => "up",
            Trend::Down => "down",
        }
    }
}

/// Acceleration parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct SarParams {
    /// Initial acceleration factor and its increment on each new extreme
    pub acceleration: Float,
    /// Cap on the acceleration factor
    pub max_acceleration: Float,
}

impl Default for SarParams {
    fn default() -> Self {
        SarParams {
            acceleration: 0.02,
            max_acceleration: 0.2,
        }
    }
}

impl SarParams {
    /// Checks `0 < acceleration <= max_acceleration`, both finite.
    pub fn validate(&self) -> Result<()> {
        if !self.acceleration.is_finite() || self.acceleration <= 0.0 {
            return Err(IndicatorError::invalid_parameter(
                "acceleration",
                self.acceleration.to_string(),
                "finite value greater than zero",
            ));
        }
        if !self.max_acceleration.is_finite() || self.max_acceleration < self.acceleration {
            return Err(IndicatorError::invalid_parameter(
                "max_acceleration",
                self.max_acceleration.to_string(),
                format!("finite value >= acceleration ({})", self.acceleration),
            ));
        }
        Ok(())
    }
}

/// SAR values and trend labels, one per input bar.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SarOutput {
    /// Stop-and-reverse level; `NaN` for the two seed bars
    pub sar: Vec<Float>,
    /// Trend after each bar's transition
    pub trend: Vec<Trend>,
}

/// Carried state between bars.
#[derive(Debug, Clone, Copy, PartialEq)]
struct SarState {
    sar: Float,
    trend: Trend,
    ep: Float,
    af: Float,
}

impl SarState {
    /// State before bar 2: treated as a down trend whose SAR sits on the
    /// highest of the two seed highs and whose extreme is their lowest low.
    fn seed(high: [Float; 2], low: [Float; 2], params: &SarParams) -> Self {
        SarState {
            sar: high[0].max(high[1]),
            trend: Trend::Uninitialized,
            ep: low[0].min(low[1]),
            af: params.acceleration,
        }
    }

    /// Transition for one bar. `high`/`low` hold bars `[i-2, i-1, i]`.
    fn advance(self, high: [Float; 3], low: [Float; 3], params: &SarParams) -> Self {
        let step = params.acceleration;
        let cap = params.max_acceleration;

        match self.trend {
            Trend::Up => {
                if low[2] < self.sar {
                    return SarState {
                        sar: self.ep,
                        trend: Trend::Down,
                        ep: high[2],
                        af: step,
                    };
                }
                let sar = (self.sar + self.af * (self.ep - self.sar))
                    .min(low[1])
                    .min(low[0]);
                let (ep, af) = if high[2] > self.ep {
                    (high[2], (self.af + step).min(cap))
                } else {
                    (self.ep, self.af)
                };
                SarState {
                    sar,
                    trend: Trend::Up,
                    ep,
                    af,
                }
            }
            Trend::Down | Trend::Uninitialized => {
                if high[2] > self.sar {
                    return SarState {
                        sar: self.ep,
                        trend: Trend::Up,
                        ep: low[2],
                        af: step,
                    };
                }
                let sar = (self.sar - self.af * (self.sar - self.ep))
                    .max(high[1])
                    .max(high[0]);
                let (ep, af) = if low[2] < self.ep {
                    (low[2], (self.af + step).min(cap))
                } else {
                    (self.ep, self.af)
                };
                SarState {
                    sar,
                    trend: Trend::Down,
                    ep,
                    af,
                }
            }
        }
    }
}

/// Parabolic SAR over aligned high/low series.
///
/// # Errors
///
/// - `MisalignedInput` when `high` and `low` differ in length
/// - `InsufficientData` when fewer than 3 bars are given
/// - `InvalidParameter` when the acceleration parameters are out of range
/// - `InvalidInput` when a series contains NaN or infinite values
///
/// # Example
///
/// ```rust
/// use tm_core::overlap::{sar, SarParams, Trend};
///
/// let high = [10.0, 11.0, 12.0, 13.0];
/// let low = [9.0, 10.0, 11.0, 12.0];
/// let out = sar(&high, &low, &SarParams::default())?;
/// assert!(out.sar[0].is_nan());
/// assert_eq!(out.trend[3], Trend::Up);
/// # Ok::<(), tm_core::IndicatorError>(())
/// ```
pub fn sar(high: &[Float], low: &[Float], params: &SarParams) -> Result<SarOutput> {
    validate::aligned("sar", "low", high.len(), low.len())?;
    validate::min_len("sar", 3, high.len())?;
    params.validate()?;
    validate::finite("sar", "high", high)?;
    validate::finite("sar", "low", low)?;

    let n = high.len();
    let mut out = SarOutput {
        sar: vec![Float::NAN; n],
        trend: vec![Trend::Uninitialized; n],
    };

    let mut state = SarState::seed([high[0], high[1]], [low[0], low[1]], params);
    for i in 2..n {
        let next = state.advance(
            [high[i - 2], high[i - 1], high[i]],
            [low[i - 2], low[i - 1], low[i]],
            params,
        );
        if next.trend != state.trend && state.trend != Trend::Uninitialized {
            trace!(index = i, trend = next.trend.as_str(), sar = next.sar, "sar reversal");
        }
        out.sar[i] = next.sar;
        out.trend[i] = next.trend;
        state = next;
    }
    Ok(out)
}

/// Streaming Parabolic SAR fed with `(high, low)` bars.
#[derive(Debug, Clone)]
pub struct Sar {
    params: SarParams,
    highs: [Float; 2],
    lows: [Float; 2],
    seen: usize,
    state: Option<SarState>,
}

impl Sar {
    /// Create a new streaming SAR.
    pub fn new(params: SarParams) -> Result<Self> {
        params.validate()?;
        Ok(Sar {
            params,
            highs: [0.0; 2],
            lows: [0.0; 2],
            seen: 0,
            state: None,
        })
    }

    /// Current trend, `Uninitialized` until the third bar.
    pub fn trend(&self) -> Trend {
        self.state.map_or(Trend::Uninitialized, |s| s.trend)
    }
}

impl Indicator for Sar {
    type Input = (Float, Float);
    type Output = (Float, Trend);

    fn lookback(&self) -> usize {
        2
    }

    fn next(&mut self, (high, low): (Float, Float)) -> Option<(Float, Trend)> {
        if self.seen < 2 {
            self.highs[self.seen] = high;
            self.lows[self.seen] = low;
            self.seen += 1;
            if self.seen == 2 {
                self.state = Some(SarState::seed(self.highs, self.lows, &self.params));
            }
            return None;
        }

        let state = self.state?;
        let next = state.advance(
            [self.highs[0], self.highs[1], high],
            [self.lows[0], self.lows[1], low],
            &self.params,
        );
        self.highs = [self.highs[1], high];
        self.lows = [self.lows[1], low];
        self.state = Some(next);
        Some((next.sar, next.trend))
    }
}

impl Resettable for Sar {
    fn reset(&mut self) {
        self.highs = [0.0; 2];
        self.lows = [0.0; 2];
        self.seen = 0;
        self.state = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rising() -> (Vec<Float>, Vec<Float>) {
        (
            vec![10.0, 11.0, 12.0, 13.0, 14.0],
            vec![9.0, 10.0, 11.0, 12.0, 13.0],
        )
    }

    #[test]
    fn test_sar_seed_bars_are_placeholders() {
        let (high, low) = rising();
        let out = sar(&high, &low, &SarParams::default()).unwrap();
        assert!(out.sar[0].is_nan() && out.sar[1].is_nan());
        assert_eq!(out.trend[0], Trend::Uninitialized);
        assert_eq!(out.trend[1], Trend::Uninitialized);
    }

    #[test]
    fn test_sar_rising_series() {
        let (high, low) = rising();
        let out = sar(&high, &low, &SarParams::default()).unwrap();

        // Bar 2 breaks above the seed SAR (11): flip up, SAR = lowest seed low.
        assert_eq!(out.trend[2], Trend::Up);
        assert!((out.sar[2] - 9.0).abs() < 1e-12);
        // ep = low[2] = 11 after the flip, af = 0.02
        assert!((out.sar[3] - 9.04).abs() < 1e-12);
        // ep = 13, af = 0.04
        assert!((out.sar[4] - 9.1984).abs() < 1e-12);
        assert!(out.trend[2..].iter().all(|&t| t == Trend::Up));
    }

    #[test]
    fn test_sar_reversal_to_down() {
        let (mut high, mut low) = rising();
        high.push(10.0);
        low.push(8.0);
        let out = sar(&high, &low, &SarParams::default()).unwrap();

        assert_eq!(out.trend[5], Trend::Down);
        // SAR jumps to the extreme point of the up trend (high 14).
        assert!((out.sar[5] - 14.0).abs() < 1e-12);
    }

    #[test]
    fn test_sar_falling_series_stays_down() {
        let high = [20.0, 19.0, 18.0, 17.0, 16.0];
        let low = [19.0, 18.0, 17.0, 16.0, 15.0];
        let out = sar(&high, &low, &SarParams::default()).unwrap();
        assert!(out.trend[2..].iter().all(|&t| t == Trend::Down));
        for i in 3..high.len() {
            assert!(out.sar[i] >= high[i - 1] && out.sar[i] >= high[i - 2]);
        }
    }

    #[test]
    fn test_sar_falling_series_progression() {
        let high = [20.0, 19.0, 18.0, 17.0, 16.0];
        let low = [19.0, 18.0, 17.0, 16.0, 15.0];
        let out = sar(&high, &low, &SarParams::default()).unwrap();

        // Seed SAR 20, ep 18. 20 - 0.02 * 2 = 19.96, lifted to the prior high 20.
        assert!((out.sar[2] - 20.0).abs() < 1e-12);
        // ep = 17, af = 0.04: 20 - 0.04 * 3
        assert!((out.sar[3] - 19.88).abs() < 1e-12);
        // ep = 16, af = 0.06: 19.88 - 0.06 * 3.88
        assert!((out.sar[4] - 19.6472).abs() < 1e-12);
    }

    #[test]
    fn test_sar_acceleration_is_capped() {
        let params = SarParams {
            acceleration: 0.1,
            max_acceleration: 0.15,
        };
        let high: Vec<Float> = (0..10).map(|i| 10.0 + i as Float).collect();
        let low: Vec<Float> = high.iter().map(|h| h - 1.0).collect();
        let mut state = SarState::seed([high[0], high[1]], [low[0], low[1]], &params);
        for i in 2..high.len() {
            state = state.advance(
                [high[i - 2], high[i - 1], high[i]],
                [low[i - 2], low[i - 1], low[i]],
                &params,
            );
            assert!(state.af <= 0.15 + 1e-12);
        }
    }

    #[test]
    fn test_sar_rejects_bad_input() {
        let params = SarParams::default();
        assert_eq!(
            sar(&[1.0, 2.0, 3.0], &[1.0, 2.0], &params),
            Err(IndicatorError::misaligned_input("low", 3, 2))
        );
        assert_eq!(
            sar(&[1.0, 2.0], &[0.5, 1.5], &params),
            Err(IndicatorError::insufficient_data(3, 2))
        );
        let bad = SarParams {
            acceleration: 0.3,
            max_acceleration: 0.2,
        };
        assert!(matches!(
            sar(&[1.0, 2.0, 3.0], &[0.5, 1.5, 2.5], &bad),
            Err(IndicatorError::InvalidParameter { .. })
        ));
    }

    #[test]
    fn test_sar_rejects_non_finite_input() {
        let params = SarParams::default();
        assert!(matches!(
            sar(&[1.0, Float::NAN, 3.0], &[0.5, 1.5, 2.5], &params),
            Err(IndicatorError::InvalidInput { .. })
        ));
        assert!(matches!(
            sar(&[1.0, 2.0, 3.0], &[0.5, 1.5, Float::NEG_INFINITY], &params),
            Err(IndicatorError::InvalidInput { .. })
        ));
    }

    #[test]
    fn test_sar_params_reject_non_finite_acceleration() {
        for params in [
            SarParams {
                acceleration: Float::NAN,
                ..SarParams::default()
            },
            SarParams {
                acceleration: Float::INFINITY,
                ..SarParams::default()
            },
            SarParams {
                max_acceleration: Float::NAN,
                ..SarParams::default()
            },
            SarParams {
                max_acceleration: Float::INFINITY,
                ..SarParams::default()
            },
        ] {
            assert!(matches!(
                params.validate(),
                Err(IndicatorError::InvalidParameter { .. })
            ));
            assert!(Sar::new(params).is_err());
        }
    }

    #[test]
    fn test_sar_reset() {
        let (high, low) = rising();
        let bars: Vec<(Float, Float)> = high.iter().copied().zip(low.iter().copied()).collect();
        let mut stream = Sar::new(SarParams::default()).unwrap();
        let first = stream.stream(&bars);
        assert_eq!(stream.trend(), Trend::Up);

        stream.reset();
        assert_eq!(stream.trend(), Trend::Uninitialized);
        assert_eq!(stream.stream(&bars), first);
    }

    #[test]
    fn test_sar_stream_matches_batch() {
        let high: Vec<Float> = (0..60)
            .map(|i| 100.0 + (i as Float * 0.4).sin() * 8.0 + 1.0)
            .collect();
        let low: Vec<Float> = high.iter().map(|h| h - 2.0).collect();
        let batch = sar(&high, &low, &SarParams::default()).unwrap();

        let mut stream = Sar::new(SarParams::default()).unwrap();
        let bars: Vec<(Float, Float)> = high.iter().copied().zip(low.iter().copied()).collect();
        let streamed = stream.stream(&bars);

        assert_eq!(streamed[0], None);
        assert_eq!(streamed[1], None);
        for i in 2..bars.len() {
            assert_eq!(streamed[i], Some((batch.sar[i], batch.trend[i])));
        }
        assert_eq!(stream.trend(), batch.trend[bars.len() - 1]);
    }

    #[test]
    fn test_trend_labels() {
        assert_eq!(Trend::Up.as_str(), "up");
        assert_eq!(Trend::Down.as_str(), "down");
        assert_eq!(Trend::default(), Trend::Uninitialized);
    }
}
