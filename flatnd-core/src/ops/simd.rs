use std::simd::{cmp::SimdPartialOrd, Simd};

use super::BinaryOpType;

/// Lane count of the vectorized path.
const LANES: usize = 8;

type F32s = Simd<f32, LANES>;

/// Lane-wise form of `op`, for the operators with a direct SIMD equivalent.
fn lanes_op(op: BinaryOpType) -> Option<fn(F32s, F32s) -> F32s> {
    let f: fn(F32s, F32s) -> F32s = match op {
        BinaryOpType::Add => |l, r| l + r,
        BinaryOpType::Mul => |l, r| l * r,
        BinaryOpType::Div => |l, r| l / r,
        BinaryOpType::Maximum => |l: F32s, r: F32s| l.simd_lt(r).select(r, l),
        BinaryOpType::Power | BinaryOpType::Eq | BinaryOpType::Ge => return None,
    };
    Some(f)
}

/// Returns `false` without touching `out` when `op` has no vectorized form.
pub(super) fn binary_simd_op(a: &[f32], b: &[f32], out: &mut [f32], op: BinaryOpType) -> bool {
    let Some(simd_op) = lanes_op(op) else {
        return false;
    };
    let scalar_op = op.as_closure();

    let mut out_chunks = out.chunks_exact_mut(LANES);
    let mut a_chunks = a.chunks_exact(LANES);
    let mut b_chunks = b.chunks_exact(LANES);
    for ((o, l), r) in (&mut out_chunks).zip(&mut a_chunks).zip(&mut b_chunks) {
        simd_op(F32s::from_slice(l), F32s::from_slice(r)).copy_to_slice(o);
    }
    // Scalar fallback for remainder
    for ((o, &l), &r) in out_chunks
        .into_remainder()
        .iter_mut()
        .zip(a_chunks.remainder())
        .zip(b_chunks.remainder())
    {
        *o = scalar_op(l, r);
    }
    true
}

/// Returns `false` without touching `out` when `op` has no vectorized form.
pub(super) fn scalar_simd_op(a: &[f32], val: f32, out: &mut [f32], op: BinaryOpType) -> bool {
    let Some(simd_op) = lanes_op(op) else {
        return false;
    };
    let scalar_op = op.as_closure();
    let r = F32s::splat(val);

    let mut out_chunks = out.chunks_exact_mut(LANES);
    let mut a_chunks = a.chunks_exact(LANES);
    for (o, l) in (&mut out_chunks).zip(&mut a_chunks) {
        simd_op(F32s::from_slice(l), r).copy_to_slice(o);
    }
    for (o, &l) in out_chunks
        .into_remainder()
        .iter_mut()
        .zip(a_chunks.remainder())
    {
        *o = scalar_op(l, val);
    }
    true
}
