//! Strided-to-compact indexing.
//!
//! A view is described by `shape`, `strides` and `offset`, all in element
//! units. `shape` and `strides` are given outermost dimension first, the same
//! order numpy uses. [`StridedIndex`] enumerates the linear offset
//! `offset + Σ strides[k] * index[k]` of every multi-index in row-major order,
//! and [`compact`], [`scatter_set`] and [`scalar_set`] are thin loops over it.
//!
//! None of these functions check that the computed offsets fall inside the
//! buffer beyond ordinary slice indexing; keeping shape, strides and offset
//! consistent with the buffer extent is the caller's job.

use std::iter::FusedIterator;

/// Number of logical elements addressed by `shape`. The empty shape is a scalar.
pub fn numel(shape: &[usize]) -> usize {
    shape.iter().product()
}

/// Row-major compact strides for `shape`.
pub fn compact_strides(shape: &[usize]) -> Vec<isize> {
    let mut strides = Vec::with_capacity(shape.len());
    let mut acc = 1isize;
    for dim in shape.iter().rev() {
        strides.push(acc);
        acc *= *dim as isize;
    }
    strides.reverse();
    strides
}

/// Odometer over the logical index space of a strided view.
///
/// Yields one linear offset per logical element, `numel(shape)` in total, with
/// the last dimension varying fastest. The counter vector is stored innermost
/// first: `pos[0]` tracks `shape[d - 1]` and steps by `strides[d - 1]`.
#[derive(Debug, Clone)]
pub struct StridedIndex<'a> {
    shape: &'a [usize],
    strides: &'a [isize],
    offset: usize,
    pos: Vec<usize>,
    current: isize,
    remaining: usize,
}

impl<'a> StridedIndex<'a> {
    pub fn new(shape: &'a [usize], strides: &'a [isize], offset: usize) -> Self {
        assert_eq!(
            shape.len(),
            strides.len(),
            "shape and strides must have the same rank"
        );
        Self {
            shape,
            strides,
            offset,
            pos: vec![0; shape.len()],
            current: offset as isize,
            remaining: numel(shape),
        }
    }

    /// Rewind to the first position.
    pub fn reset(&mut self) {
        self.pos.fill(0);
        self.current = self.offset as isize;
        self.remaining = numel(self.shape);
    }

    /// Advance the innermost counter and carry outward on overflow.
    #[inline]
    fn step(&mut self) {
        let d = self.shape.len();
        for j in 0..d {
            let dim = d - 1 - j;
            self.pos[j] += 1;
            self.current += self.strides[dim];
            if self.pos[j] < self.shape[dim] {
                return;
            }
            self.current -= self.strides[dim] * self.shape[dim] as isize;
            self.pos[j] = 0;
        }
    }
}

impl Iterator for StridedIndex<'_> {
    type Item = usize;

    #[inline]
    fn next(&mut self) -> Option<usize> {
        if self.remaining == 0 {
            return None;
        }
        let idx = self.current;
        debug_assert!(idx >= 0, "strided view addresses a negative offset");
        self.remaining -= 1;
        if self.remaining > 0 {
            self.step();
        }
        Some(idx as usize)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl ExactSizeIterator for StridedIndex<'_> {}

impl FusedIterator for StridedIndex<'_> {}

/// Gather the view `(shape, strides, offset)` of `a` into the compact `out`.
///
/// `out.len()` must equal `numel(shape)`.
pub fn compact(a: &[f32], out: &mut [f32], shape: &[usize], strides: &[isize], offset: usize) {
    let walker = StridedIndex::new(shape, strides, offset);
    assert_eq!(out.len(), walker.len(), "compact output size mismatch");
    for (dst, idx) in out.iter_mut().zip(walker) {
        *dst = a[idx];
    }
}

/// Write the compact `a` into the view `(shape, strides, offset)` of `out`.
///
/// `a.len()` must equal `numel(shape)`.
pub fn scatter_set(a: &[f32], out: &mut [f32], shape: &[usize], strides: &[isize], offset: usize) {
    let walker = StridedIndex::new(shape, strides, offset);
    assert_eq!(a.len(), walker.len(), "scatter source size mismatch");
    for (src, idx) in a.iter().zip(walker) {
        out[idx] = *src;
    }
}

/// Write `val` to each of the `size` positions of the view `(shape, strides, offset)` of `out`.
pub fn scalar_set(
    size: usize,
    val: f32,
    out: &mut [f32],
    shape: &[usize],
    strides: &[isize],
    offset: usize,
) {
    let walker = StridedIndex::new(shape, strides, offset);
    debug_assert_eq!(size, walker.len(), "scalar_set count mismatch");
    for idx in walker.take(size) {
        out[idx] = val;
    }
}

/// Copy a view out into a fresh host vector in row-major order.
pub fn to_vec_strided(a: &[f32], shape: &[usize], strides: &[isize], offset: usize) -> Vec<f32> {
    StridedIndex::new(shape, strides, offset)
        .map(|idx| a[idx])
        .collect()
}
