//! SIMD types and constants.
//!
//! This module defines the instruction-set levels the dispatcher can select and
//! the lane counts each level provides for the configured [`Float`](crate::Float).

use core::fmt;

/// SIMD instruction set level.
///
/// Represents the kernel family selected by the dispatch table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum SimdLevel {
    /// No SIMD acceleration (scalar operations)
    Scalar,
    /// AVX2 (Advanced Vector Extensions 2) - x86-64, 256-bit
    Avx2,
    /// NEON - AArch64, 128-bit
    Neon,
    /// SIMD128 - WebAssembly, 128-bit
    Simd128,
}

impl SimdLevel {
    /// Detect the best available SIMD level for the running CPU.
    ///
    /// AVX2 is detected at runtime. NEON is baseline on AArch64, and SIMD128 is
    /// a compile-time property of wasm32 builds.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use tm_core::simd::SimdLevel;
    ///
    /// let level = SimdLevel::detect();
    /// println!("Best SIMD level: {}", level);
    /// ```
    #[inline]
    #[allow(unreachable_code)]
    pub fn detect() -> Self {
        #[cfg(target_arch = "x86_64")]
        {
            if std::is_x86_feature_detected!("avx2") {
                return SimdLevel::Avx2;
            }
        }

        #[cfg(target_arch = "aarch64")]
        {
            return SimdLevel::Neon;
        }

        #[cfg(all(target_arch = "wasm32", target_feature = "simd128"))]
        {
            return SimdLevel::Simd128;
        }

        SimdLevel::Scalar
    }

    /// Number of [`Float`](crate::Float) lanes processed per vector at this level.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use tm_core::simd::SimdLevel;
    ///
    /// assert_eq!(SimdLevel::Scalar.lanes(), 1);
    /// ```
    #[inline]
    pub fn lanes(&self) -> usize {
        match self {
            SimdLevel::Scalar => Lanes::SCALAR,
            SimdLevel::Avx2 => Lanes::AVX2,
            SimdLevel::Neon => Lanes::NEON,
            SimdLevel::Simd128 => Lanes::SIMD128,
        }
    }

    /// Vector width in bits for this level.
    #[inline]
    pub fn width_bits(&self) -> usize {
        match self {
            SimdLevel::Scalar => core::mem::size_of::<crate::Float>() * 8,
            SimdLevel::Avx2 => 256,
            SimdLevel::Neon | SimdLevel::Simd128 => 128,
        }
    }
}

impl fmt::Display for SimdLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SimdLevel::Scalar => write!(f, "Scalar"),
            SimdLevel::Avx2 => write!(f, "AVX2"),
            SimdLevel::Neon => write!(f, "NEON"),
            SimdLevel::Simd128 => write!(f, "SIMD128"),
        }
    }
}

/// Lane count for each SIMD level.
///
/// Counts depend on the `f32` feature: a 256-bit register holds four `f64`
/// or eight `f32`.
#[derive(Debug, Clone, Copy)]
pub struct Lanes;

#[cfg(not(feature = "f32"))]
impl Lanes {
    /// Number of lanes for scalar operations
    pub const SCALAR: usize = 1;
    /// Number of lanes for AVX2 (4 × f64)
    pub const AVX2: usize = 4;
    /// Number of lanes for NEON (2 × f64)
    pub const NEON: usize = 2;
    /// Number of lanes for SIMD128 (2 × f64)
    pub const SIMD128: usize = 2;
}

#[cfg(feature = "f32")]
impl Lanes {
    /// Number of lanes for scalar operations
    pub const SCALAR: usize = 1;
    /// Number of lanes for AVX2 (8 × f32)
    pub const AVX2: usize = 8;
    /// Number of lanes for NEON (4 × f32)
    pub const NEON: usize = 4;
    /// Number of lanes for SIMD128 (4 × f32)
    pub const SIMD128: usize = 4;
}
