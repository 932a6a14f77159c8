//! Overlap Studies indicators
//!
//! Indicators plotted on the same chart as the price bars:
//! - Simple Moving Average
//! - Exponential Moving Average
//! - Parabolic SAR
//! - Donchian Channel

mod donchian;
mod ema;
mod sar;
mod sma;

pub use donchian::{donchian_channel, donchian_series, DonchianSeries};
pub use ema::{ema, smoothing_factor, Ema};
pub use sar::{sar, Sar, SarOutput, SarParams, Trend};
pub use sma::{moving_average, Sma};

pub(crate) use ema::smooth;
pub(crate) use sma::rolling_mean;
