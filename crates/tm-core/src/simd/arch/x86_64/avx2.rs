//! AVX2 kernels for x86_64, selected at runtime by the dispatcher.

use crate::simd::types::Lanes;
use crate::types::Float;

#[cfg(not(feature = "f32"))]
type SimdVec = wide::f64x4;

#[cfg(feature = "f32")]
type SimdVec = wide::f32x8;

const LANES: usize = Lanes::AVX2;

#[inline(always)]
fn load(chunk: &[Float]) -> SimdVec {
    let mut lanes = [0.0 as Float; LANES];
    lanes.copy_from_slice(chunk);
    SimdVec::from(lanes)
}

/// # Safety
///
/// The CPU must support AVX2.
#[inline(never)]
#[target_feature(enable = "avx2")]
pub unsafe fn sum(data: &[Float]) -> Float {
    let chunks = data.chunks_exact(LANES);
    let remainder = chunks.remainder();

    let mut acc = SimdVec::ZERO;
    for chunk in chunks {
        acc += load(chunk);
    }

    let mut total = acc.reduce_add();
    for &x in remainder {
        total += x;
    }
    total
}

/// # Safety
///
/// The CPU must support AVX2.
#[inline(never)]
#[target_feature(enable = "avx2")]
pub unsafe fn sub(a: &[Float], b: &[Float], out: &mut [Float]) {
    let n = out.len().min(a.len()).min(b.len());
    let split = n - n % LANES;

    for ((ca, cb), co) in a[..split]
        .chunks_exact(LANES)
        .zip(b[..split].chunks_exact(LANES))
        .zip(out[..split].chunks_exact_mut(LANES))
    {
        co.copy_from_slice(&(load(ca) - load(cb)).to_array());
    }
    for i in split..n {
        out[i] = a[i] - b[i];
    }
}

/// # Safety
///
/// The CPU must support AVX2.
#[inline(never)]
#[target_feature(enable = "avx2")]
pub unsafe fn mul(a: &[Float], b: &[Float], out: &mut [Float]) {
    let n = out.len().min(a.len()).min(b.len());
    let split = n - n % LANES;

    for ((ca, cb), co) in a[..split]
        .chunks_exact(LANES)
        .zip(b[..split].chunks_exact(LANES))
        .zip(out[..split].chunks_exact_mut(LANES))
    {
        co.copy_from_slice(&(load(ca) * load(cb)).to_array());
    }
    for i in split..n {
        out[i] = a[i] * b[i];
    }
}
