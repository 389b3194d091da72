//! Owned byte buffers.
//!
//! A [`RawBuf`] is an owned pointer to a block obtained from an
//! [`Allocator`]. It does not know its own size: the owner tracks it and passes
//! it back on every call. Zero-sized buffers are never allocated; they are
//! represented by the empty sentinel instead.

use std::ptr::{self, NonNull};

use log::{debug, trace};

use crate::{Allocator, Error, Result};

/// An owned, possibly empty, heap block of bytes.
///
/// `RawBuf` is neither `Copy` nor `Clone`, and it does not release its block
/// on drop: the owner must call [`RawBuf::deallocate`] with the allocator the
/// block came from.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct RawBuf {
  ptr: Option<NonNull<u8>>,
}

impl RawBuf {
  /// The empty sentinel: no block, no allocator call.
  pub const EMPTY: RawBuf = RawBuf { ptr: None };

  pub const fn empty() -> Self {
    Self::EMPTY
  }

  /// Allocates a block of `size` bytes. A `size` of `0` yields the empty
  /// sentinel without calling the allocator.
  pub fn allocate<A: Allocator + ?Sized>(
    alloc: &A,
    size: usize,
  ) -> Result<Self> {
    if size == 0 {
      return Ok(Self::EMPTY);
    }

    let address = unsafe { alloc.allocate(size) };
    match NonNull::new(address) {
      Some(ptr) => {
        trace!("allocated {size} bytes at {ptr:p}");
        Ok(Self { ptr: Some(ptr) })
      }
      None => {
        debug!("allocation of {size} bytes failed");
        Err(Error::MemAllocFailed)
      }
    }
  }

  /// Resizes the block from `src_size` to `dst_size` bytes.
  ///
  /// An empty buffer is freshly allocated. Equal sizes are a no-op, and a
  /// `dst_size` of `0` releases the block and leaves the empty sentinel. On
  /// failure the buffer still owns its original, untouched block.
  ///
  /// # Safety
  ///
  /// A non-empty `self` must hold a block of `src_size` bytes allocated by
  /// `alloc`.
  pub unsafe fn reallocate<A: Allocator + ?Sized>(
    &mut self,
    alloc: &A,
    src_size: usize,
    dst_size: usize,
  ) -> Result<()> {
    let Some(src) = self.ptr else {
      *self = Self::allocate(alloc, dst_size)?;
      return Ok(());
    };

    if dst_size == src_size {
      return Ok(());
    }

    if dst_size == 0 {
      unsafe { self.deallocate(alloc) };
      return Ok(());
    }

    let moved = unsafe { alloc.reallocate(src.as_ptr(), dst_size) };
    match NonNull::new(moved) {
      Some(dst) => {
        trace!("reallocated {src:p} ({src_size} bytes) to {dst:p} ({dst_size} bytes)");
        self.ptr = Some(dst);
        Ok(())
      }
      None => {
        debug!("reallocation of {src:p} from {src_size} to {dst_size} bytes failed");
        Err(Error::MemAllocFailed)
      }
    }
  }

  /// Releases the block and resets `self` to the empty sentinel, so a second
  /// call is a no-op.
  ///
  /// # Safety
  ///
  /// A non-empty `self` must hold a block allocated by `alloc`.
  pub unsafe fn deallocate<A: Allocator + ?Sized>(
    &mut self,
    alloc: &A,
  ) {
    if let Some(ptr) = self.ptr {
      trace!("deallocating {ptr:p}");
    }
    unsafe { alloc.deallocate(self.as_mut_ptr()) };
    self.ptr = None;
  }

  /// Takes ownership of `address`. A null `address` is the empty sentinel.
  ///
  /// # Safety
  ///
  /// A non-null `address` must be a block that nothing else owns.
  pub unsafe fn from_raw(address: *mut u8) -> Self {
    Self {
      ptr: NonNull::new(address),
    }
  }

  /// Gives up ownership of the block. Null for the empty sentinel.
  pub fn into_raw(self) -> *mut u8 {
    self.as_mut_ptr()
  }

  pub fn as_ptr(&self) -> *const u8 {
    self.as_mut_ptr()
  }

  pub fn as_mut_ptr(&self) -> *mut u8 {
    self.ptr.map_or(ptr::null_mut(), NonNull::as_ptr)
  }

  pub const fn as_non_null(&self) -> Option<NonNull<u8>> {
    self.ptr
  }

  pub const fn is_empty(&self) -> bool {
    self.ptr.is_none()
  }
}
