use std::alloc::{alloc_zeroed, dealloc, handle_alloc_error, Layout};
use std::fmt;
use std::mem;
use std::ops::{Deref, DerefMut};
use std::ptr::{self, NonNull};
use std::slice;

use tracing::{debug, trace};

use crate::{matmul::TILE, Error, Result};

/// Size in bytes of one scalar element.
pub const ELEM_SIZE: usize = mem::size_of::<f32>();

/// Default alignment, in bytes, of every buffer allocation.
pub const ALIGNMENT: usize = 256;

/// The smallest alignment the tiled matmul accepts: one tile row.
pub const MIN_ALIGNMENT: usize = TILE * ELEM_SIZE;

const _: () = assert!(ALIGNMENT.is_power_of_two() && ALIGNMENT >= MIN_ALIGNMENT);

/// A fixed-size, aligned, heap allocation of `f32` elements.
///
/// The buffer is the single owner of its memory. It is never resized and is
/// released exactly once when dropped. Contents start out zeroed.
///
/// The buffer dereferences to `[f32]`, so bounds-checked access goes through
/// the usual slice methods (`get`, indexing) and the hot loops can use
/// `get_unchecked`.
pub struct AlignedBuffer {
    ptr: NonNull<f32>,
    len: usize,
    align: usize,
}

// SAFETY: the buffer uniquely owns its allocation, like a `Box<[f32]>`.
unsafe impl Send for AlignedBuffer {}
unsafe impl Sync for AlignedBuffer {}

impl AlignedBuffer {
    /// Allocate `size` elements aligned to [`ALIGNMENT`].
    pub fn new(size: usize) -> Result<Self> {
        Self::with_alignment(size, ALIGNMENT)
    }

    /// Allocate `size` elements aligned to `align` bytes.
    ///
    /// `align` must be a power of two and at least [`MIN_ALIGNMENT`].
    pub fn with_alignment(size: usize, align: usize) -> Result<Self> {
        if align < MIN_ALIGNMENT {
            return Err(Error::Layout { size, align });
        }
        let layout = Self::layout(size, align)?;
        trace!(size, align, "allocating aligned buffer");

        if layout.size() == 0 {
            // SAFETY: `align` is a non-zero power of two, so it is a valid dangling address.
            let ptr = unsafe { NonNull::new_unchecked(align as *mut f32) };
            return Ok(Self {
                ptr,
                len: size,
                align,
            });
        }

        // SAFETY: the layout has a non-zero size.
        let raw = unsafe { alloc_zeroed(layout) };
        match NonNull::new(raw as *mut f32) {
            Some(ptr) => Ok(Self {
                ptr,
                len: size,
                align,
            }),
            None => {
                debug!(size, align, "aligned allocation failed");
                Err(Error::Alloc { size, align }.bt())
            }
        }
    }

    /// Allocate a buffer holding a copy of `data`.
    pub fn from_slice(data: &[f32]) -> Result<Self> {
        let mut buf = Self::new(data.len())?;
        buf.copy_from_slice(data);
        Ok(buf)
    }

    fn layout(size: usize, align: usize) -> Result<Layout> {
        let bytes = size
            .checked_mul(ELEM_SIZE)
            .ok_or(Error::Layout { size, align })?;
        Layout::from_size_align(bytes, align).map_err(|_| Error::Layout { size, align })
    }

    /// Alignment of the allocation in bytes.
    pub fn align(&self) -> usize {
        self.align
    }

    pub fn as_slice(&self) -> &[f32] {
        // SAFETY: `ptr` is valid for `len` initialised elements for the lifetime of `self`.
        unsafe { slice::from_raw_parts(self.ptr.as_ptr(), self.len) }
    }

    pub fn as_mut_slice(&mut self) -> &mut [f32] {
        // SAFETY: as above, and `&mut self` guarantees exclusive access.
        unsafe { slice::from_raw_parts_mut(self.ptr.as_ptr(), self.len) }
    }

    /// Address of the first element, for alignment checks and host interop.
    pub fn ptr_as_usize(&self) -> usize {
        self.ptr.as_ptr() as usize
    }

    /// Set every element to `value`.
    pub fn fill(&mut self, value: f32) {
        self.as_mut_slice().fill(value);
    }

    /// Copy host data into the buffer. The lengths must match exactly.
    pub fn copy_from_host(&mut self, data: &[f32]) -> Result<()> {
        if data.len() != self.len {
            return Err(Error::LengthMismatch {
                expected: self.len,
                got: data.len(),
            });
        }
        self.as_mut_slice().copy_from_slice(data);
        Ok(())
    }
}

impl Deref for AlignedBuffer {
    type Target = [f32];

    fn deref(&self) -> &[f32] {
        self.as_slice()
    }
}

impl DerefMut for AlignedBuffer {
    fn deref_mut(&mut self) -> &mut [f32] {
        self.as_mut_slice()
    }
}

impl Clone for AlignedBuffer {
    fn clone(&self) -> Self {
        let cloned = match Self::with_alignment(self.len, self.align) {
            Ok(buf) => buf,
            // The layout was valid for `self`, so only the allocator can fail here.
            Err(_) => handle_alloc_error(
                Layout::from_size_align(self.len * ELEM_SIZE, self.align)
                    .unwrap_or(Layout::new::<f32>()),
            ),
        };
        // SAFETY: both buffers hold `len` elements and are distinct allocations.
        unsafe {
            ptr::copy_nonoverlapping(self.ptr.as_ptr(), cloned.ptr.as_ptr(), self.len);
        }
        cloned
    }
}

impl Drop for AlignedBuffer {
    fn drop(&mut self) {
        let bytes = self.len * ELEM_SIZE;
        if bytes == 0 {
            return;
        }
        // SAFETY: the same layout was validated and used for the allocation.
        unsafe {
            let layout = Layout::from_size_align_unchecked(bytes, self.align);
            dealloc(self.ptr.as_ptr() as *mut u8, layout);
        }
    }
}

impl fmt::Debug for AlignedBuffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AlignedBuffer")
            .field("len", &self.len)
            .field("align", &self.align)
            .field("data", &self.as_slice())
            .finish()
    }
}

impl PartialEq for AlignedBuffer {
    fn eq(&self, other: &Self) -> bool {
        self.as_slice() == other.as_slice()
    }
}
