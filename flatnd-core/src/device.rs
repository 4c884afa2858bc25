use crate::{matmul, ops, reduce, strided, AlignedBuffer, Result};

/// The call boundary a host array library programs against.
///
/// Every method is a stateless operation over caller-owned buffers. Layout
/// metadata (shape, strides, offset) is passed in per call and never retained.
pub trait BackendDevice {
    const NAME: &'static str;
    const TILE_SIZE: usize;

    fn allocate(&self, size: usize) -> Result<AlignedBuffer>;

    fn fill(&self, out: &mut AlignedBuffer, val: f32);

    fn compact(
        &self,
        a: &AlignedBuffer,
        out: &mut AlignedBuffer,
        shape: &[usize],
        strides: &[isize],
        offset: usize,
    );

    fn ewise_setitem(
        &self,
        a: &AlignedBuffer,
        out: &mut AlignedBuffer,
        shape: &[usize],
        strides: &[isize],
        offset: usize,
    );

    fn scalar_setitem(
        &self,
        size: usize,
        val: f32,
        out: &mut AlignedBuffer,
        shape: &[usize],
        strides: &[isize],
        offset: usize,
    );

    fn ewise(
        &self,
        a: &AlignedBuffer,
        b: &AlignedBuffer,
        out: &mut AlignedBuffer,
        op: ops::BinaryOpType,
    );

    fn scalar(
        &self,
        a: &AlignedBuffer,
        val: f32,
        out: &mut AlignedBuffer,
        op: ops::BinaryOpType,
    );

    fn unary(&self, a: &AlignedBuffer, out: &mut AlignedBuffer, op: ops::UnaryOpType);

    fn matmul(
        &self,
        a: &AlignedBuffer,
        b: &AlignedBuffer,
        out: &mut AlignedBuffer,
        m: usize,
        n: usize,
        p: usize,
    );

    fn matmul_tiled(
        &self,
        a: &AlignedBuffer,
        b: &AlignedBuffer,
        out: &mut AlignedBuffer,
        m: usize,
        n: usize,
        p: usize,
    );

    fn reduce(
        &self,
        a: &AlignedBuffer,
        out: &mut AlignedBuffer,
        reduce_size: usize,
        op: reduce::ReduceOpType,
    );

    fn to_host(
        &self,
        a: &AlignedBuffer,
        shape: &[usize],
        strides: &[isize],
        offset: usize,
    ) -> Vec<f32>;

    fn from_host(&self, data: &[f32], out: &mut AlignedBuffer) -> Result<()>;
}

/// Single-threaded CPU backend.
#[derive(Debug, Clone, Copy, Default)]
pub struct Cpu;

impl BackendDevice for Cpu {
    const NAME: &'static str = "cpu";
    const TILE_SIZE: usize = matmul::TILE;

    fn allocate(&self, size: usize) -> Result<AlignedBuffer> {
        AlignedBuffer::new(size)
    }

    fn fill(&self, out: &mut AlignedBuffer, val: f32) {
        out.fill(val)
    }

    fn compact(
        &self,
        a: &AlignedBuffer,
        out: &mut AlignedBuffer,
        shape: &[usize],
        strides: &[isize],
        offset: usize,
    ) {
        strided::compact(a, out, shape, strides, offset)
    }

    fn ewise_setitem(
        &self,
        a: &AlignedBuffer,
        out: &mut AlignedBuffer,
        shape: &[usize],
        strides: &[isize],
        offset: usize,
    ) {
        strided::scatter_set(a, out, shape, strides, offset)
    }

    fn scalar_setitem(
        &self,
        size: usize,
        val: f32,
        out: &mut AlignedBuffer,
        shape: &[usize],
        strides: &[isize],
        offset: usize,
    ) {
        strided::scalar_set(size, val, out, shape, strides, offset)
    }

    fn ewise(
        &self,
        a: &AlignedBuffer,
        b: &AlignedBuffer,
        out: &mut AlignedBuffer,
        op: ops::BinaryOpType,
    ) {
        ops::binary_op(a, b, out, op)
    }

    fn scalar(
        &self,
        a: &AlignedBuffer,
        val: f32,
        out: &mut AlignedBuffer,
        op: ops::BinaryOpType,
    ) {
        ops::scalar_op(a, val, out, op)
    }

    fn unary(&self, a: &AlignedBuffer, out: &mut AlignedBuffer, op: ops::UnaryOpType) {
        ops::unary_op(a, out, op)
    }

    fn matmul(
        &self,
        a: &AlignedBuffer,
        b: &AlignedBuffer,
        out: &mut AlignedBuffer,
        m: usize,
        n: usize,
        p: usize,
    ) {
        matmul::matmul(a, b, out, m, n, p)
    }

    fn matmul_tiled(
        &self,
        a: &AlignedBuffer,
        b: &AlignedBuffer,
        out: &mut AlignedBuffer,
        m: usize,
        n: usize,
        p: usize,
    ) {
        matmul::matmul_tiled(a, b, out, m, n, p)
    }

    fn reduce(
        &self,
        a: &AlignedBuffer,
        out: &mut AlignedBuffer,
        reduce_size: usize,
        op: reduce::ReduceOpType,
    ) {
        reduce::reduce(a, out, reduce_size, op)
    }

    fn to_host(
        &self,
        a: &AlignedBuffer,
        shape: &[usize],
        strides: &[isize],
        offset: usize,
    ) -> Vec<f32> {
        strided::to_vec_strided(a, shape, strides, offset)
    }

    fn from_host(&self, data: &[f32], out: &mut AlignedBuffer) -> Result<()> {
        out.copy_from_host(data)
    }
}
