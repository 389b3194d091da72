use std::mem;

/// Header written in front of every block served by
/// [`SystemAllocator`](crate::SystemAllocator).
///
/// ```text
///   ┌──────────────┬────────────────────────────┐
///   │ Block header │ user data (size bytes)     │
///   └──────────────┴────────────────────────────┘
///                  ▲
///                  └── pointer returned to the caller
/// ```
#[derive(Debug, Clone, Copy)]
pub(crate) struct Block {
  pub size: usize,
}

impl Block {
  /// Bytes reserved for the header, rounded so user data stays word aligned.
  pub const SIZE: usize = crate::align!(mem::size_of::<Block>());

  pub fn new(size: usize) -> Self {
    Self { size }
  }

  /// Total bytes backing a block with `size` user bytes, or `None` when that
  /// does not fit in `usize`.
  pub fn total_size(size: usize) -> Option<usize> {
    size.checked_add(Self::SIZE)
  }

  /// Header address for a user pointer previously returned by the allocator.
  ///
  /// # Safety
  ///
  /// `address` must be a pointer handed out by `SystemAllocator`.
  pub unsafe fn find(address: *mut u8) -> *mut Block {
    unsafe { address.sub(Self::SIZE) }.cast::<Block>()
  }

  /// User pointer for the block whose header starts at `block`.
  ///
  /// # Safety
  ///
  /// `block` must point to the start of an allocation of at least
  /// `Block::SIZE` bytes.
  pub unsafe fn data(block: *mut Block) -> *mut u8 {
    unsafe { block.cast::<u8>().add(Self::SIZE) }
  }
}
