//! Dense single-precision matrix multiply.
//!
//! [`matmul`] is the plain triple loop over row-major operands.
//! [`matmul_tiled`] works on the 4D tile-blocked layout produced by
//! [`tile_layout`] and is built on the [`aligned_dot`] micro-kernel.
//! [`matmul_auto`] picks between the two for row-major callers.

use tracing::trace;

use crate::{AlignedBuffer, Result};

mod tiled;

pub use tiled::{aligned_dot, matmul_tiled, tile_layout, untile_layout, Tile};

/// Tile width of the blocked multiply.
pub const TILE: usize = 8;

/// Whether `(m, n, p)` can go through the tiled path.
pub fn is_tileable(m: usize, n: usize, p: usize) -> bool {
    m % TILE == 0 && n % TILE == 0 && p % TILE == 0
}

/// Multiply the compact `m x n` matrix `a` by the compact `n x p` matrix `b` into `out` (`m x p`).
pub fn matmul(a: &[f32], b: &[f32], out: &mut [f32], m: usize, n: usize, p: usize) {
    assert_eq!(a.len(), m * n, "lhs is not m x n");
    assert_eq!(b.len(), n * p, "rhs is not n x p");
    assert_eq!(out.len(), m * p, "out is not m x p");

    for i in 0..m {
        let a_row = &a[i * n..(i + 1) * n];
        for j in 0..p {
            let mut sum = 0.0;
            for (k, &a_val) in a_row.iter().enumerate() {
                sum += a_val * b[k * p + j];
            }
            out[i * p + j] = sum;
        }
    }
}

/// Row-major multiply that routes through the tiled kernel when every
/// dimension is a multiple of [`TILE`].
///
/// The operands are copied into tile-blocked scratch buffers, so the only
/// failure is the allocation of that scratch space.
pub fn matmul_auto(
    a: &[f32],
    b: &[f32],
    out: &mut [f32],
    m: usize,
    n: usize,
    p: usize,
) -> Result<()> {
    if !is_tileable(m, n, p) {
        trace!(m, n, p, "matmul: naive path");
        matmul(a, b, out, m, n, p);
        return Ok(());
    }

    trace!(m, n, p, "matmul: tiled path");
    let mut a_tiled = AlignedBuffer::new(m * n)?;
    let mut b_tiled = AlignedBuffer::new(n * p)?;
    let mut out_tiled = AlignedBuffer::new(m * p)?;
    tile_layout(a, &mut a_tiled, m, n);
    tile_layout(b, &mut b_tiled, n, p);
    matmul_tiled(&a_tiled, &b_tiled, &mut out_tiled, m, n, p);
    untile_layout(&out_tiled, out, m, p);
    Ok(())
}
