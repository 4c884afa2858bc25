//! Buffer initialisers: constants, uniform and normal draws, and the usual
//! fan-in/fan-out weight schemes.
//!
//! Weight initialisers treat `out` as a row-major `fan_in x fan_out` matrix.

use rand::Rng;
use rand_distr::{Distribution, Normal};

use crate::{Context, Result};

/// Uniform draws in `[low, high)`.
pub fn rand_uniform<R: Rng + ?Sized>(out: &mut [f32], low: f32, high: f32, rng: &mut R) {
    for x in out.iter_mut() {
        *x = rng.gen::<f32>() * (high - low) + low;
    }
}

/// Normal draws with the given mean and standard deviation.
pub fn randn<R: Rng + ?Sized>(out: &mut [f32], mean: f32, std: f32, rng: &mut R) -> Result<()> {
    let normal = Normal::new(mean, std)
        .with_context(|| format!("invalid normal distribution: mean {mean}, std {std}"))?;
    for x in out.iter_mut() {
        *x = normal.sample(rng);
    }
    Ok(())
}

pub fn constant(out: &mut [f32], c: f32) {
    out.fill(c);
}

pub fn ones(out: &mut [f32]) {
    constant(out, 1.0)
}

pub fn zeros(out: &mut [f32]) {
    constant(out, 0.0)
}

/// `1.0` with probability `p`, else `0.0`.
pub fn randb<R: Rng + ?Sized>(out: &mut [f32], p: f32, rng: &mut R) {
    for x in out.iter_mut() {
        *x = f32::from(rng.gen::<f32>() <= p);
    }
}

/// One row of length `n` per entry of `indices`, with a single `1.0` at that index.
pub fn one_hot(out: &mut [f32], n: usize, indices: &[usize]) {
    assert_eq!(out.len(), indices.len() * n, "one_hot output size mismatch");
    out.fill(0.0);
    for (row, &idx) in indices.iter().enumerate() {
        assert!(idx < n, "one_hot index {idx} out of range for {n} classes");
        out[row * n + idx] = 1.0;
    }
}

fn check_fans(out: &[f32], fan_in: usize, fan_out: usize) {
    assert_eq!(
        out.len(),
        fan_in * fan_out,
        "weight buffer is not {fan_in} x {fan_out}"
    );
}

/// Uniform in `[-a, a)` with `a = gain * sqrt(6 / (fan_in + fan_out))`.
pub fn xavier_uniform<R: Rng + ?Sized>(
    out: &mut [f32],
    fan_in: usize,
    fan_out: usize,
    gain: f32,
    rng: &mut R,
) {
    check_fans(out, fan_in, fan_out);
    let a = gain * (6.0 / (fan_in + fan_out) as f32).sqrt();
    rand_uniform(out, -a, a, rng);
}

/// Normal with `std = gain * sqrt(2 / (fan_in + fan_out))`.
pub fn xavier_normal<R: Rng + ?Sized>(
    out: &mut [f32],
    fan_in: usize,
    fan_out: usize,
    gain: f32,
    rng: &mut R,
) -> Result<()> {
    check_fans(out, fan_in, fan_out);
    let std = gain * (2.0 / (fan_in + fan_out) as f32).sqrt();
    randn(out, 0.0, std, rng)
}

/// Uniform in `[-bound, bound)` with the ReLU gain: `bound = sqrt(2) * sqrt(3 / fan_in)`.
pub fn kaiming_uniform<R: Rng + ?Sized>(
    out: &mut [f32],
    fan_in: usize,
    fan_out: usize,
    rng: &mut R,
) {
    check_fans(out, fan_in, fan_out);
    let bound = std::f32::consts::SQRT_2 * (3.0 / fan_in as f32).sqrt();
    rand_uniform(out, -bound, bound, rng);
}

/// Normal with the ReLU gain: `std = sqrt(2) / sqrt(fan_in)`.
pub fn kaiming_normal<R: Rng + ?Sized>(
    out: &mut [f32],
    fan_in: usize,
    fan_out: usize,
    rng: &mut R,
) -> Result<()> {
    check_fans(out, fan_in, fan_out);
    let std = std::f32::consts::SQRT_2 / (fan_in as f32).sqrt();
    randn(out, 0.0, std, rng)
}
