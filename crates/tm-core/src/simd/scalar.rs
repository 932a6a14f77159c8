//! Scalar fallback kernels.
//!
//! Portable implementations used when no SIMD level is available, and the
//! reference the vector kernels are tested against. Binary kernels write
//! `min(a.len(), b.len(), out.len())` elements; the public dispatch wrappers
//! guarantee equal lengths.

use crate::Float;

/// Sum of all elements.
///
/// # Examples
///
/// ```rust
/// use tm_core::simd::scalar::sum;
///
/// assert_eq!(sum(&[1.0, 2.0, 3.0, 4.0, 5.0]), 15.0);
/// ```
#[inline]
pub fn sum(data: &[Float]) -> Float {
    data.iter().sum()
}

/// Element-wise `out[i] = a[i] - b[i]`.
#[inline]
pub fn sub(a: &[Float], b: &[Float], out: &mut [Float]) {
    for ((o, &x), &y) in out.iter_mut().zip(a).zip(b) {
        *o = x - y;
    }
}

/// Element-wise `out[i] = a[i] * b[i]`.
#[inline]
pub fn mul(a: &[Float], b: &[Float], out: &mut [Float]) {
    for ((o, &x), &y) in out.iter_mut().zip(a).zip(b) {
        *o = x * y;
    }
}
