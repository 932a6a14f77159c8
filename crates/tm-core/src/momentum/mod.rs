//! Momentum indicators
//!
//! - MACD: difference of a fast and a slow EMA plus its smoothed signal line
//! - RSI: ratio of average gains to average losses, scaled to 0..100

mod macd;
mod rsi;

pub use macd::{macd, Macd, MacdOutput, MacdParams};
pub use rsi::{rsi, RsiParams, RsiWindow, ZeroLossPolicy};
