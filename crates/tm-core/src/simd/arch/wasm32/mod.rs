//! WebAssembly SIMD kernels

pub mod simd128;
