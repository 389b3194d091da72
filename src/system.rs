use std::alloc::{GlobalAlloc, Layout, System};
use std::ptr;

use crate::{Allocator, align::WORD, block::Block};

/// Allocator backed by Rust's [`System`] allocator.
///
/// `System` needs the old layout to resize or free a block, while
/// [`Allocator::reallocate`] only receives the pointer. Every block therefore
/// carries a [`Block`] header recording its size:
///
/// ```text
///   ┌───────────────────────┬────────────────────────────────┐
///   │    Block Header       │         User Data              │
///   │  ┌─────────────────┐  │                                │
///   │  │ size: N         │  │  ┌──────────────────────────┐  │
///   │  └─────────────────┘  │  │     N bytes usable       │  │
///   │   one machine word    │  └──────────────────────────┘  │
///   └───────────────────────┴────────────────────────────────┘
///                           ▲
///                           └── Pointer returned to user
/// ```
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SystemAllocator;

impl SystemAllocator {
  pub const fn new() -> Self {
    Self
  }

  fn layout(size: usize) -> Option<Layout> {
    let total = Block::total_size(size)?;
    Layout::from_size_align(total, WORD).ok()
  }
}

unsafe impl Allocator for SystemAllocator {
  unsafe fn allocate(
    &self,
    size: usize,
  ) -> *mut u8 {
    let Some(layout) = Self::layout(size) else {
      return ptr::null_mut();
    };

    unsafe {
      let block = System.alloc(layout).cast::<Block>();
      if block.is_null() {
        return ptr::null_mut();
      }

      block.write(Block::new(size));
      Block::data(block)
    }
  }

  unsafe fn reallocate(
    &self,
    address: *mut u8,
    new_size: usize,
  ) -> *mut u8 {
    let Some(new_layout) = Self::layout(new_size) else {
      return ptr::null_mut();
    };

    unsafe {
      let block = Block::find(address);
      let Some(old_layout) = Self::layout((*block).size) else {
        return ptr::null_mut();
      };

      let moved = System
        .realloc(block.cast(), old_layout, new_layout.size())
        .cast::<Block>();
      if moved.is_null() {
        return ptr::null_mut();
      }

      (*moved).size = new_size;
      Block::data(moved)
    }
  }

  unsafe fn deallocate(
    &self,
    address: *mut u8,
  ) {
    if address.is_null() {
      return;
    }

    unsafe {
      let block = Block::find(address);
      if let Some(layout) = Self::layout((*block).size) {
        System.dealloc(block.cast(), layout);
      }
    }
  }
}
