//! Runtime SIMD dispatch system.
//!
//! This module provides runtime CPU feature detection and function pointer dispatch
//! to select the kernel family once, on first use.
//!
//! The dispatch table lives in a `OnceLock`; after initialization every call is a
//! load plus an indirect call.

use std::sync::OnceLock;

use tracing::debug;

use super::scalar;
use super::types::SimdLevel;
use crate::types::Float;
use crate::validate;
use crate::Result;

#[cfg(target_arch = "x86_64")]
use super::arch::x86_64;

#[cfg(target_arch = "aarch64")]
use super::arch::aarch64;

#[cfg(all(target_arch = "wasm32", target_feature = "simd128"))]
use super::arch::wasm32;

/// Function pointer type for sum operations.
pub type SumFn = fn(&[Float]) -> Float;

/// Function pointer type for element-wise binary operations writing into `out`.
pub type BinaryFn = fn(&[Float], &[Float], &mut [Float]);

/// Dispatch table containing function pointers for all SIMD operations.
#[derive(Debug, Clone, Copy)]
pub struct DispatchTable {
    /// Kernel family the pointers belong to
    pub level: SimdLevel,
    /// Horizontal sum
    pub sum: SumFn,
    /// Element-wise subtraction
    pub sub: BinaryFn,
    /// Element-wise multiplication
    pub mul: BinaryFn,
}

impl DispatchTable {
    /// Scalar dispatch table (no SIMD acceleration).
    #[inline]
    pub const fn scalar() -> Self {
        Self {
            level: SimdLevel::Scalar,
            sum: scalar::sum,
            sub: scalar::sub,
            mul: scalar::mul,
        }
    }
}

static DISPATCH: OnceLock<DispatchTable> = OnceLock::new();

/// Build the table for the best available SIMD level.
///
/// The detection priority is:
/// - **x86_64**: AVX2 → scalar
/// - **aarch64**: NEON
/// - **wasm32**: SIMD128 when compiled with `+simd128`, scalar otherwise
/// - **others**: scalar
#[cold]
fn init_dispatch() -> DispatchTable {
    let table = select(SimdLevel::detect());
    debug!(level = %table.level, lanes = table.level.lanes(), "selected simd kernels");
    table
}

#[allow(unreachable_patterns)]
fn select(level: SimdLevel) -> DispatchTable {
    match level {
        #[cfg(target_arch = "x86_64")]
        SimdLevel::Avx2 => DispatchTable {
            level,
            // SAFETY: only selected when `is_x86_feature_detected!("avx2")` held.
            sum: |data| unsafe { x86_64::avx2::sum(data) },
            sub: |a, b, out| unsafe { x86_64::avx2::sub(a, b, out) },
            mul: |a, b, out| unsafe { x86_64::avx2::mul(a, b, out) },
        },
        #[cfg(target_arch = "aarch64")]
        SimdLevel::Neon => DispatchTable {
            level,
            sum: aarch64::neon::sum,
            sub: aarch64::neon::sub,
            mul: aarch64::neon::mul,
        },
        #[cfg(all(target_arch = "wasm32", target_feature = "simd128"))]
        SimdLevel::Simd128 => DispatchTable {
            level,
            sum: wasm32::simd128::sum,
            sub: wasm32::simd128::sub,
            mul: wasm32::simd128::mul,
        },
        _ => DispatchTable::scalar(),
    }
}

/// Get the global dispatch table, initializing it if necessary.
#[inline]
pub fn get_dispatch() -> &'static DispatchTable {
    DISPATCH.get_or_init(init_dispatch)
}

/// The SIMD level the dispatcher selected for this process.
#[inline]
pub fn level() -> SimdLevel {
    get_dispatch().level
}

/// Sum of all elements in a slice.
///
/// # Examples
///
/// ```rust
/// use tm_core::simd::dispatch;
///
/// assert_eq!(dispatch::sum(&[1.0, 2.0, 3.0]), 6.0);
/// ```
#[inline]
pub fn sum(data: &[Float]) -> Float {
    (get_dispatch().sum)(data)
}

/// Element-wise `a[i] - b[i]`.
///
/// Fails with `MisalignedInput` when the slices differ in length.
///
/// # Examples
///
/// ```rust
/// use tm_core::simd::dispatch;
///
/// let diff = dispatch::sub(&[5.0, 7.0], &[1.0, 2.0])?;
/// assert_eq!(diff, vec![4.0, 5.0]);
/// # Ok::<(), tm_core::IndicatorError>(())
/// ```
#[inline]
pub fn sub(a: &[Float], b: &[Float]) -> Result<Vec<Float>> {
    binary(get_dispatch().sub, a, b)
}

/// Element-wise `a[i] * b[i]`.
///
/// Fails with `MisalignedInput` when the slices differ in length.
#[inline]
pub fn mul(a: &[Float], b: &[Float]) -> Result<Vec<Float>> {
    binary(get_dispatch().mul, a, b)
}

fn binary(kernel: BinaryFn, a: &[Float], b: &[Float]) -> Result<Vec<Float>> {
    validate::aligned("simd", "rhs", a.len(), b.len())?;
    let mut out = vec![0.0; a.len()];
    kernel(a, b, &mut out);
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::IndicatorError;

    #[test]
    fn test_dispatch_initialization() {
        let dispatch1 = get_dispatch();
        let dispatch2 = get_dispatch();
        assert!(
            core::ptr::eq(dispatch1, dispatch2),
            "Dispatch table should be initialized only once"
        );
    }

    #[test]
    fn test_selected_level_matches_detection() {
        let detected = SimdLevel::detect();
        let selected = level();
        assert!(selected == detected || selected == SimdLevel::Scalar);
    }

    #[test]
    fn test_sum_empty() {
        assert_eq!(sum(&[]), 0.0);
    }

    #[test]
    fn test_sum_with_negatives() {
        let result = sum(&[1.0, -2.0, 3.0, -4.0, 5.0]);
        assert!((result - 3.0).abs() < 1e-10);
    }

    #[test]
    fn test_sub_matches_scalar() {
        let a: Vec<Float> = (0..37).map(|i| i as Float * 1.5).collect();
        let b: Vec<Float> = (0..37).map(|i| i as Float * 0.25).collect();
        let mut expected = vec![0.0; a.len()];
        scalar::sub(&a, &b, &mut expected);
        assert_eq!(sub(&a, &b).unwrap(), expected);
    }

    #[test]
    fn test_mul_matches_scalar() {
        let a: Vec<Float> = (0..37).map(|i| i as Float - 18.0).collect();
        let b: Vec<Float> = (0..37).map(|i| (i % 5) as Float).collect();
        let mut expected = vec![0.0; a.len()];
        scalar::mul(&a, &b, &mut expected);
        assert_eq!(mul(&a, &b).unwrap(), expected);
    }

    #[test]
    fn test_binary_rejects_unequal_lengths() {
        assert_eq!(
            sub(&[1.0, 2.0], &[3.0]),
            Err(IndicatorError::misaligned_input("rhs", 2, 1))
        );
    }

    #[test]
    fn test_dispatch_table_scalar() {
        let table = DispatchTable::scalar();
        assert_eq!(table.level, SimdLevel::Scalar);
        assert_eq!((table.sum)(&[1.0, 2.0, 3.0]), 6.0);
    }
}
