//! Segmented folds over contiguous blocks of a compact buffer.

#[derive(PartialEq, Eq, Debug, Clone, Copy, Hash)]
pub enum ReduceOpType {
    Max,
    Sum,
}

impl ReduceOpType {
    /// Fold one non-empty block. A NaN seed is never replaced.
    #[inline]
    fn fold(&self, block: &[f32]) -> f32 {
        match self {
            Self::Max => block[1..]
                .iter()
                .fold(block[0], |acc, &x| if acc < x { x } else { acc }),
            Self::Sum => block.iter().fold(0.0, |acc, &x| acc + x),
        }
    }
}

/// `out[i] = op(a[i * reduce_size .. (i + 1) * reduce_size])`.
///
/// `a.len()` must equal `out.len() * reduce_size` and `reduce_size` must be at least 1.
pub fn reduce(a: &[f32], out: &mut [f32], reduce_size: usize, op: ReduceOpType) {
    assert!(reduce_size >= 1, "reduce_size must be at least 1");
    assert_eq!(
        a.len(),
        out.len() * reduce_size,
        "reduction input size mismatch"
    );
    for (o, block) in out.iter_mut().zip(a.chunks_exact(reduce_size)) {
        *o = op.fold(block);
    }
}

pub fn reduce_max(a: &[f32], out: &mut [f32], reduce_size: usize) {
    reduce(a, out, reduce_size, ReduceOpType::Max)
}

pub fn reduce_sum(a: &[f32], out: &mut [f32], reduce_size: usize) {
    reduce(a, out, reduce_size, ReduceOpType::Sum)
}
