//! Volatility indicators
//!
//! - True Range: per-bar price movement including gaps from the previous close
//! - Average True Range: moving average of the true range

mod atr;

pub use atr::{atr, atr_series, true_range, AtrParams, PrevClose};
