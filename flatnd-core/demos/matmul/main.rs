use flatnd_core::matmul::{matmul, matmul_auto};
use flatnd_core::{init, AlignedBuffer, Result};
use rand::{rngs::StdRng, SeedableRng};
use std::time::Instant;

fn bench(
    name: &str,
    n: usize,
    iterations: u32,
    f: impl Fn(&mut AlignedBuffer) -> Result<()>,
) -> Result<()> {
    let mut out = AlignedBuffer::new(n * n)?;
    let mut total = std::time::Duration::new(0, 0);
    for _ in 0..iterations {
        let start = Instant::now();
        f(std::hint::black_box(&mut out))?;
        total += start.elapsed();
    }
    let avg = total / iterations;
    println!("{name} {n}x{n}: average over {iterations} iterations: {avg:?}");
    Ok(())
}

fn main() -> Result<()> {
    const N: usize = 256;
    let mut rng = StdRng::seed_from_u64(0);
    let mut a = AlignedBuffer::new(N * N)?;
    let mut b = AlignedBuffer::new(N * N)?;
    init::xavier_uniform(&mut a, N, N, 1.0, &mut rng);
    init::xavier_uniform(&mut b, N, N, 1.0, &mut rng);

    bench("naive", N, 5, |out| {
        matmul(&a, &b, out, N, N, N);
        Ok(())
    })?;
    bench("tiled", N, 5, |out| matmul_auto(&a, &b, out, N, N, N))?;
    Ok(())
}
