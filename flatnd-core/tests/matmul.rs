use approx::assert_relative_eq;
use flatnd_core::matmul::{
    is_tileable, matmul, matmul_auto, matmul_tiled, tile_layout, untile_layout,
};
use flatnd_core::{AlignedBuffer, BackendDevice, Cpu, TILE};
use rand::{rngs::StdRng, Rng, SeedableRng};

fn random(rng: &mut StdRng, len: usize) -> AlignedBuffer {
    let data: Vec<f32> = (0..len).map(|_| rng.gen_range(-1.0..1.0)).collect();
    AlignedBuffer::from_slice(&data).unwrap()
}

/// Row-major reference product from the `gemm` crate.
fn reference(a: &[f32], b: &[f32], m: usize, n: usize, p: usize) -> Vec<f32> {
    let mut out = vec![0.0f32; m * p];
    unsafe {
        gemm::gemm(
            /* m: usize = */ m,
            /* n: usize = */ p,
            /* k: usize = */ n,
            /* dst: *mut T = */ out.as_mut_ptr(),
            /* dst_cs: isize = */ 1,
            /* dst_rs: isize = */ p as isize,
            /* read_dst: bool = */ false,
            /* lhs: *const T = */ a.as_ptr(),
            /* lhs_cs: isize = */ 1,
            /* lhs_rs: isize = */ n as isize,
            /* rhs: *const T = */ b.as_ptr(),
            /* rhs_cs: isize = */ 1,
            /* rhs_rs: isize = */ p as isize,
            /* alpha: T = */ 0.0,
            /* beta: T = */ 1.0,
            /* conj_dst: bool = */ false,
            /* conj_lhs: bool = */ false,
            /* conj_rhs: bool = */ false,
            gemm::Parallelism::None,
        );
    }
    out
}

#[test]
fn two_by_two() {
    let a = AlignedBuffer::from_slice(&[1., 2., 3., 4.]).unwrap();
    let b = AlignedBuffer::from_slice(&[5., 6., 7., 8.]).unwrap();
    let mut out = AlignedBuffer::new(4).unwrap();
    matmul(&a, &b, &mut out, 2, 2, 2);
    assert_eq!(out.to_vec(), vec![19., 22., 43., 50.]);
}

#[test]
fn rectangular() {
    // (2x3) * (3x1)
    let a = AlignedBuffer::from_slice(&[1., 2., 3., 4., 5., 6.]).unwrap();
    let b = AlignedBuffer::from_slice(&[1., 0., -1.]).unwrap();
    let mut out = AlignedBuffer::new(2).unwrap();
    out.fill(123.0);
    matmul(&a, &b, &mut out, 2, 3, 1);
    assert_eq!(out.to_vec(), vec![-2., -2.]);
}

#[test]
fn naive_matches_gemm() {
    let mut rng = StdRng::seed_from_u64(11);
    for (m, n, p) in [(1, 1, 1), (3, 5, 7), (17, 4, 9), (32, 16, 8)] {
        let a = random(&mut rng, m * n);
        let b = random(&mut rng, n * p);
        let mut out = AlignedBuffer::new(m * p).unwrap();
        matmul(&a, &b, &mut out, m, n, p);
        let expected = reference(&a, &b, m, n, p);
        for (x, y) in out.iter().zip(&expected) {
            assert_relative_eq!(*x, *y, epsilon = 1e-4);
        }
    }
}

#[test]
fn tiled_matches_naive() {
    let mut rng = StdRng::seed_from_u64(3);
    for _ in 0..8 {
        let m = TILE * rng.gen_range(1..=4);
        let n = TILE * rng.gen_range(1..=4);
        let p = TILE * rng.gen_range(1..=4);
        let a = random(&mut rng, m * n);
        let b = random(&mut rng, n * p);

        let mut expected = AlignedBuffer::new(m * p).unwrap();
        matmul(&a, &b, &mut expected, m, n, p);

        let mut a_tiled = AlignedBuffer::new(m * n).unwrap();
        let mut b_tiled = AlignedBuffer::new(n * p).unwrap();
        tile_layout(&a, &mut a_tiled, m, n);
        tile_layout(&b, &mut b_tiled, n, p);
        let mut out_tiled = AlignedBuffer::new(m * p).unwrap();
        out_tiled.fill(f32::NAN);
        matmul_tiled(&a_tiled, &b_tiled, &mut out_tiled, m, n, p);
        let mut out = AlignedBuffer::new(m * p).unwrap();
        untile_layout(&out_tiled, &mut out, m, p);

        for (x, y) in out.iter().zip(expected.iter()) {
            assert_relative_eq!(*x, *y, epsilon = 1e-4);
        }
    }
}

#[test]
fn tiled_single_tile_is_plain_product() {
    // One tile: the tiled layout equals row-major.
    let mut rng = StdRng::seed_from_u64(5);
    let a = random(&mut rng, TILE * TILE);
    let b = random(&mut rng, TILE * TILE);
    let mut expected = AlignedBuffer::new(TILE * TILE).unwrap();
    let mut out = AlignedBuffer::new(TILE * TILE).unwrap();
    matmul(&a, &b, &mut expected, TILE, TILE, TILE);
    matmul_tiled(&a, &b, &mut out, TILE, TILE, TILE);
    for (x, y) in out.iter().zip(expected.iter()) {
        assert_relative_eq!(*x, *y, epsilon = 1e-5);
    }
}

#[test]
fn auto_takes_both_paths() {
    let mut rng = StdRng::seed_from_u64(9);
    for (m, n, p) in [(16, 8, 24), (5, 3, 2), (8, 8, 9)] {
        let a = random(&mut rng, m * n);
        let b = random(&mut rng, n * p);
        let mut out = AlignedBuffer::new(m * p).unwrap();
        matmul_auto(&a, &b, &mut out, m, n, p).unwrap();
        let expected = reference(&a, &b, m, n, p);
        for (x, y) in out.iter().zip(&expected) {
            assert_relative_eq!(*x, *y, epsilon = 1e-4);
        }
    }
    assert!(is_tileable(16, 8, 24));
    assert!(!is_tileable(8, 8, 9));
}

#[test]
fn cpu_device_matmul() {
    let cpu = Cpu;
    let n = Cpu::TILE_SIZE;
    let mut eye = cpu.allocate(n * n).unwrap();
    cpu.scalar_setitem(n, 1.0, &mut eye, &[n], &[n as isize + 1], 0);
    let mut rng = StdRng::seed_from_u64(1);
    let a = random(&mut rng, n * n);
    let mut out = cpu.allocate(n * n).unwrap();
    cpu.matmul(&a, &eye, &mut out, n, n, n);
    assert_eq!(out, a);
    cpu.matmul_tiled(&a, &eye, &mut out, n, n, n);
    assert_eq!(out, a);
}

#[test]
#[should_panic(expected = "tiled matmul needs dimensions divisible by")]
fn tiled_rejects_ragged_dims() {
    let a = AlignedBuffer::new(TILE * (TILE + 1)).unwrap();
    let b = AlignedBuffer::new((TILE + 1) * TILE).unwrap();
    let mut out = AlignedBuffer::new(TILE * TILE).unwrap();
    matmul_tiled(&a, &b, &mut out, TILE, TILE + 1, TILE);
}
