use std::{cell::Cell, ptr};

use crate::{Allocator, Global};

/// Wraps another allocator and counts the requests that reach it.
///
/// It can also be switched into a failing mode in which every allocate and
/// reallocate request returns null without touching the inner allocator,
/// which is how allocation failures are exercised in tests.
///
/// Counters use [`Cell`], so a `CountingAllocator` is not `Sync`. Share it
/// within a thread by passing `&CountingAllocator` as the allocator.
#[derive(Debug, Default)]
pub struct CountingAllocator<A = Global> {
  inner: A,
  allocations: Cell<usize>,
  reallocations: Cell<usize>,
  deallocations: Cell<usize>,
  failures: Cell<usize>,
  failing: Cell<bool>,
}

impl CountingAllocator<Global> {
  pub fn new() -> Self {
    Self::wrap(Global)
  }
}

impl<A: Allocator> CountingAllocator<A> {
  pub fn wrap(inner: A) -> Self {
    Self {
      inner,
      allocations: Cell::new(0),
      reallocations: Cell::new(0),
      deallocations: Cell::new(0),
      failures: Cell::new(0),
      failing: Cell::new(false),
    }
  }

  /// Successful `allocate` calls.
  pub fn allocations(&self) -> usize {
    self.allocations.get()
  }

  /// Successful `reallocate` calls.
  pub fn reallocations(&self) -> usize {
    self.reallocations.get()
  }

  /// `deallocate` calls with a non-null pointer.
  pub fn deallocations(&self) -> usize {
    self.deallocations.get()
  }

  /// Requests that returned null.
  pub fn failures(&self) -> usize {
    self.failures.get()
  }

  /// Blocks handed out and not yet released.
  pub fn live(&self) -> usize {
    self.allocations().saturating_sub(self.deallocations())
  }

  /// While set, every allocate and reallocate request fails.
  pub fn set_failing(
    &self,
    failing: bool,
  ) {
    self.failing.set(failing);
  }

  pub fn is_failing(&self) -> bool {
    self.failing.get()
  }

  pub fn into_inner(self) -> A {
    self.inner
  }

  fn record(
    &self,
    counter: &Cell<usize>,
    address: *mut u8,
  ) -> *mut u8 {
    if address.is_null() {
      self.failures.set(self.failures.get() + 1);
    } else {
      counter.set(counter.get() + 1);
    }
    address
  }

  fn fail(&self) -> *mut u8 {
    self.failures.set(self.failures.get() + 1);
    ptr::null_mut()
  }
}

unsafe impl<A: Allocator> Allocator for CountingAllocator<A> {
  unsafe fn allocate(
    &self,
    size: usize,
  ) -> *mut u8 {
    if self.is_failing() {
      return self.fail();
    }
    let address = unsafe { self.inner.allocate(size) };
    self.record(&self.allocations, address)
  }

  unsafe fn reallocate(
    &self,
    address: *mut u8,
    new_size: usize,
  ) -> *mut u8 {
    if self.is_failing() {
      return self.fail();
    }
    let moved = unsafe { self.inner.reallocate(address, new_size) };
    self.record(&self.reallocations, moved)
  }

  unsafe fn deallocate(
    &self,
    address: *mut u8,
  ) {
    if !address.is_null() {
      self.deallocations.set(self.deallocations.get() + 1);
    }
    unsafe { self.inner.deallocate(address) }
  }
}
