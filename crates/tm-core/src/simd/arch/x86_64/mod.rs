//! x86_64 SIMD kernels

pub mod avx2;
