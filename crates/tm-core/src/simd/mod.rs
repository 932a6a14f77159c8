//! # SIMD accelerated element-wise kernels
//!
//! The indicators route their element-wise arithmetic (price differences,
//! MACD line subtraction, force products, window sums) through this module.
//! The best kernel family for the running CPU is selected once, with a scalar
//! fallback for unsupported platforms.
//!
//! ```rust
//! use tm_core::simd;
//!
//! let data = vec![1.0, 2.0, 3.0, 4.0];
//! let result = simd::sum(&data);  // Auto-dispatched to AVX2/NEON/SIMD128/Scalar
//! assert_eq!(result, 10.0);
//! ```
//!
//! Results may differ from a left-to-right scalar sum in the last bits because
//! vector kernels reassociate additions.

mod arch;
pub mod dispatch;
pub mod scalar;
mod types;

pub use dispatch::{level, mul, sub, sum};
pub use types::{Lanes, SimdLevel};
