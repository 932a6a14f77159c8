//! TM-Core: technical analysis indicators over price and volume series
//!
//! Every batch indicator is a pure function over borrowed slices that
//! validates its preconditions up front and returns a typed [`Result`].
//! Sequential recurrences (EMA, MACD, Force Index, Parabolic SAR) and the
//! moving average also come as streaming state machines implementing
//! [`Indicator`].
//!
//! # Features
//!
//! - `f64` (default): Double-precision floating-point
//! - `f32`: Single-precision floating-point
//! - `serde` (default): `Serialize`/`Deserialize` for parameter and output types
//!
//! # Modules
//!
//! - [`overlap`]: moving average, EMA, Parabolic SAR, Donchian Channel
//! - [`momentum`]: MACD, RSI
//! - [`volatility`]: True Range, ATR
//! - [`volume`]: Elder Force Index
//! - [`simd`]: runtime-dispatched element-wise kernels
//! - [`error`]: [`IndicatorError`] and the [`Result`] alias
//! - [`types`]: Floating-point type configuration
//!
//! # Example
//!
//! ```rust
//! use tm_core::{momentum::{macd, MacdParams}, overlap::moving_average};
//!
//! let closes = [10.0, 10.5, 11.0, 10.8, 11.2, 11.6];
//! let ma = moving_average(&closes, 3)?;
//! assert_eq!(ma.len(), 4);
//!
//! let out = macd(&closes, &MacdParams::default())?;
//! assert_eq!(out.histogram.len(), closes.len());
//! # Ok::<(), tm_core::IndicatorError>(())
//! ```

#![warn(missing_docs)]
#![cfg_attr(docsrs, feature(doc_auto_cfg))]

pub mod error;
pub mod momentum;
pub mod overlap;
pub mod simd;
pub mod traits;
pub mod types;
mod validate;
pub mod volatility;
pub mod volume;

pub use error::{IndicatorError, Result};
pub use traits::{Indicator, Resettable};
pub use types::Float;
