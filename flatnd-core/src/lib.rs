#![cfg_attr(feature = "simd", feature(portable_simd))]

//! Flatnd is the flat-memory compute core behind a strided N-dimensional array.
//!
//! The host array library owns shape, strides and offset. This crate owns only
//! memory ([`AlignedBuffer`]) and stateless kernels that receive the layout they
//! need on every call:
//!
//! - [`strided`]: the [`StridedIndex`] walker and the `compact` / `scatter_set` /
//!   `scalar_set` loops that move data between strided views and compact buffers.
//! - [`ops`]: element-wise, scalar and unary operators over compact buffers.
//! - [`reduce`]: max and sum over contiguous blocks.
//! - [`matmul`]: naive and tile-blocked matrix multiply.
//! - [`init`]: random and constant initialisers.
//!
//! Everything is single precision and single threaded. [`BackendDevice`] collects
//! the operations behind one trait, implemented by [`Cpu`].
//!
//! ## Example
//! ```
//! use flatnd_core::{matmul, strided, AlignedBuffer};
//!
//! // A 2x2 row-major matrix and its transpose as a strided view.
//! let a = AlignedBuffer::from_slice(&[1.0, 2.0, 3.0, 4.0]).unwrap();
//! let mut a_t = AlignedBuffer::new(4).unwrap();
//! strided::compact(&a, &mut a_t, &[2, 2], &[1, 2], 0);
//! assert_eq!(a_t.to_vec(), vec![1.0, 3.0, 2.0, 4.0]);
//!
//! let b = AlignedBuffer::from_slice(&[5.0, 6.0, 7.0, 8.0]).unwrap();
//! let mut out = AlignedBuffer::new(4).unwrap();
//! matmul::matmul(&a, &b, &mut out, 2, 2, 2);
//! assert_eq!(out.to_vec(), vec![19.0, 22.0, 43.0, 50.0]);
//! ```

pub mod buffer;
mod device;
mod error;
pub mod init;
pub mod matmul;
pub mod ops;
pub mod reduce;
pub mod strided;

pub use buffer::{AlignedBuffer, ALIGNMENT, ELEM_SIZE};
pub use device::{BackendDevice, Cpu};
pub use error::{Context, Error, Result};
pub use matmul::TILE;
pub use ops::{BinaryOpType, UnaryOpType};
pub use reduce::ReduceOpType;
pub use strided::StridedIndex;
