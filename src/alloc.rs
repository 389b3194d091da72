use libc::c_void;

/// A memory backend that can allocate, reallocate (grow, shrink), and
/// deallocate untyped blocks of bytes.
///
/// Backends report failure with a null pointer. Zero-sized requests never
/// reach a backend: [`RawBuf`](crate::RawBuf) collapses them to the empty
/// sentinel first.
///
/// # Safety
///
/// Implementors must return blocks of at least the requested size aligned to
/// a machine word, and must keep a block valid until it is passed to
/// `reallocate` (successfully) or `deallocate`.
pub unsafe trait Allocator {
  /// Attempts to allocate `size` bytes. Returns null on failure.
  ///
  /// # Safety
  ///
  /// `size` must be non-zero.
  unsafe fn allocate(
    &self,
    size: usize,
  ) -> *mut u8;

  /// Attempts to resize the block at `ptr` to `new_size` bytes.
  ///
  /// On success ownership of `ptr` moves to the allocator and only the
  /// returned pointer is valid. On failure null is returned and `ptr` stays
  /// valid and unchanged.
  ///
  /// # Safety
  ///
  /// `ptr` must be a block currently allocated by this allocator and
  /// `new_size` must be non-zero.
  unsafe fn reallocate(
    &self,
    ptr: *mut u8,
    new_size: usize,
  ) -> *mut u8;

  /// Releases the block at `ptr`. A null `ptr` is a no-op.
  ///
  /// # Safety
  ///
  /// `ptr` must be null or a block currently allocated by this allocator.
  unsafe fn deallocate(
    &self,
    ptr: *mut u8,
  );
}

unsafe impl<A: Allocator + ?Sized> Allocator for &A {
  unsafe fn allocate(
    &self,
    size: usize,
  ) -> *mut u8 {
    unsafe { (**self).allocate(size) }
  }

  unsafe fn reallocate(
    &self,
    ptr: *mut u8,
    new_size: usize,
  ) -> *mut u8 {
    unsafe { (**self).reallocate(ptr, new_size) }
  }

  unsafe fn deallocate(
    &self,
    ptr: *mut u8,
  ) {
    unsafe { (**self).deallocate(ptr) }
  }
}

/// A capability record of three C functions, laid out so it can be shared
/// with C code.
#[repr(C)]
#[derive(Debug, Clone, Copy)]
pub struct VTable {
  pub allocate: unsafe extern "C" fn(usize) -> *mut c_void,
  pub reallocate: unsafe extern "C" fn(*mut c_void, usize) -> *mut c_void,
  pub deallocate: unsafe extern "C" fn(*mut c_void),
}

/// The process-wide default backend: libc `malloc`, `realloc`, and `free`.
///
/// It is a constant, so it can be read from any thread.
pub const GLOBAL_ALLOCATOR: VTable = VTable {
  allocate: libc::malloc,
  reallocate: libc::realloc,
  deallocate: libc::free,
};

unsafe impl Allocator for VTable {
  unsafe fn allocate(
    &self,
    size: usize,
  ) -> *mut u8 {
    unsafe { (self.allocate)(size) }.cast()
  }

  unsafe fn reallocate(
    &self,
    ptr: *mut u8,
    new_size: usize,
  ) -> *mut u8 {
    unsafe { (self.reallocate)(ptr.cast(), new_size) }.cast()
  }

  unsafe fn deallocate(
    &self,
    ptr: *mut u8,
  ) {
    unsafe { (self.deallocate)(ptr.cast()) }
  }
}

/// Zero-sized handle to [`GLOBAL_ALLOCATOR`], the default allocator of
/// [`String`](crate::String).
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Global;

unsafe impl Allocator for Global {
  #[inline]
  unsafe fn allocate(
    &self,
    size: usize,
  ) -> *mut u8 {
    unsafe { GLOBAL_ALLOCATOR.allocate(size) }
  }

  #[inline]
  unsafe fn reallocate(
    &self,
    ptr: *mut u8,
    new_size: usize,
  ) -> *mut u8 {
    unsafe { GLOBAL_ALLOCATOR.reallocate(ptr, new_size) }
  }

  #[inline]
  unsafe fn deallocate(
    &self,
    ptr: *mut u8,
  ) {
    unsafe { GLOBAL_ALLOCATOR.deallocate(ptr) }
  }
}
