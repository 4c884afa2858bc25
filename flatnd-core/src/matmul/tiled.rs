use std::mem;

use super::TILE;
use crate::{
    buffer::ELEM_SIZE,
    strided::{compact, scatter_set},
};

const TILE_AREA: usize = TILE * TILE;

/// An owned `TILE x TILE` block, aligned to the byte width of one tile row.
///
/// The micro-kernel only ever sees distinct `Tile` values, so non-overlap is
/// proven by the borrow checker and alignment by the type.
#[derive(Debug, Clone, Copy, PartialEq)]
#[repr(C, align(32))]
pub struct Tile(pub [f32; TILE_AREA]);

const _: () = assert!(mem::align_of::<Tile>() == TILE * ELEM_SIZE);

impl Tile {
    pub const fn zeroed() -> Self {
        Self([0.0; TILE_AREA])
    }

    #[inline]
    fn load(&mut self, src: &[f32]) {
        self.0.copy_from_slice(&src[..TILE_AREA]);
    }
}

impl Default for Tile {
    fn default() -> Self {
        Self::zeroed()
    }
}

/// `out += a * b` for three `TILE x TILE` row-major blocks.
///
/// `out` is accumulated into, never cleared.
#[inline]
pub fn aligned_dot(a: &Tile, b: &Tile, out: &mut Tile) {
    let (a, b, out) = (&a.0, &b.0, &mut out.0);
    // i-k-j order keeps the innermost loop contiguous in `b` and `out`; each
    // output cell still sums over k in ascending order.
    for i in 0..TILE {
        for k in 0..TILE {
            let a_ik = a[i * TILE + k];
            for j in 0..TILE {
                out[i * TILE + j] += a_ik * b[k * TILE + j];
            }
        }
    }
}

/// Multiply tile-blocked matrices.
///
/// `a`, `b` and `out` are compact 4D arrays of shape
/// `[m / TILE][n / TILE][TILE][TILE]`, `[n / TILE][p / TILE][TILE][TILE]`
/// and `[m / TILE][p / TILE][TILE][TILE]`; `m`, `n` and `p` must all be
/// multiples of [`TILE`].
pub fn matmul_tiled(a: &[f32], b: &[f32], out: &mut [f32], m: usize, n: usize, p: usize) {
    assert!(
        super::is_tileable(m, n, p),
        "tiled matmul needs dimensions divisible by {TILE}, got {m}x{n}x{p}"
    );
    assert_eq!(a.len(), m * n, "lhs is not m x n");
    assert_eq!(b.len(), n * p, "rhs is not n x p");
    assert_eq!(out.len(), m * p, "out is not m x p");

    out.fill(0.0);

    let mut a_tile = Tile::zeroed();
    let mut b_tile = Tile::zeroed();
    let mut acc = Tile::zeroed();

    for i in 0..m / TILE {
        for j in 0..p / TILE {
            acc.0.fill(0.0);
            for k in 0..n / TILE {
                a_tile.load(&a[i * TILE * n + k * TILE_AREA..]);
                b_tile.load(&b[k * TILE * p + j * TILE_AREA..]);
                aligned_dot(&a_tile, &b_tile, &mut acc);
            }
            let base = i * TILE * p + j * TILE_AREA;
            out[base..base + TILE_AREA].copy_from_slice(&acc.0);
        }
    }
}

fn tile_view(rows: usize, cols: usize) -> ([usize; 4], [isize; 4]) {
    assert!(
        rows % TILE == 0 && cols % TILE == 0,
        "{rows}x{cols} is not a whole number of {TILE}x{TILE} tiles"
    );
    let c = cols as isize;
    let t = TILE as isize;
    (
        [rows / TILE, cols / TILE, TILE, TILE],
        [c * t, t, c, 1],
    )
}

/// Rearrange a row-major `rows x cols` matrix into the tile-blocked layout.
pub fn tile_layout(src: &[f32], dst: &mut [f32], rows: usize, cols: usize) {
    let (shape, strides) = tile_view(rows, cols);
    compact(src, dst, &shape, &strides, 0);
}

/// Inverse of [`tile_layout`].
pub fn untile_layout(src: &[f32], dst: &mut [f32], rows: usize, cols: usize) {
    let (shape, strides) = tile_view(rows, cols);
    scatter_set(src, dst, &shape, &strides, 0);
}
