//! Numeric type shared by every price, volume and indicator value
//!
//! Prices and derived series are `f64` unless the crate is built with the
//! `f32` feature, which halves memory and doubles the SIMD lane count.
//!
//! # Example
//!
//! ```rust
//! use tm_core::types::Float;
//!
//! let x: Float = 1.0;
//! let y: Float = 2.0;
//! assert_eq!(x + y, 3.0);
//! ```

/// Price/volume scalar, single precision under the `f32` feature.
#[cfg(feature = "f32")]
pub type Float = f32;

/// Price/volume scalar, double precision by default.
#[cfg(not(feature = "f32"))]
pub type Float = f64;

/// Converts a count (window length, number of samples) to [`Float`].
#[inline]
pub(crate) fn count(n: usize) -> Float {
    n as Float
}
