//! NEON kernels for AArch64, where NEON is part of the baseline ISA.

use crate::simd::types::Lanes;
use crate::types::Float;

#[cfg(not(feature = "f32"))]
type SimdVec = wide::f64x2;

#[cfg(feature = "f32")]
type SimdVec = wide::f32x4;

const LANES: usize = Lanes::NEON;

#[inline(always)]
fn load(chunk: &[Float]) -> SimdVec {
    let mut lanes = [0.0 as Float; LANES];
    lanes.copy_from_slice(chunk);
    SimdVec::from(lanes)
}

pub fn sum(data: &[Float]) -> Float {
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

pub fn sub(a: &[Float], b: &[Float], out: &mut [Float]) {
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

pub fn mul(a: &[Float], b: &[Float], out: &mut [Float]) {
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
