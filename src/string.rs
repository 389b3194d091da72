//! A growable, heap-backed byte string.
//!
//! ```text
//!   String
//!   ┌────────────┐
//!   │ buf  ──────┼──►┌───┬───┬───┬───┬───┬───┬───┬───┐
//!   │ len: 5     │   │ h │ e │ l │ l │ o │ ? │ ? │ ? │
//!   │ cap: 8     │   └───┴───┴───┴───┴───┴───┴───┴───┘
//!   │ alloc      │   ◄──────── len ────────►
//!   └────────────┘   ◄──────────────── cap ──────────────►
//! ```
//!
//! Bytes in `buf[len..cap]` are uninitialized and never read. A string with no
//! capacity owns no block at all.

use std::{
  fmt,
  hash::{Hash, Hasher},
  mem::ManuallyDrop,
  ops::{Deref, DerefMut},
  ptr, slice,
};

use bstr::BStr;

use crate::{Allocator, Error, Global, RawBuf, Result};

/// A growable byte string with explicit capacity control.
///
/// Content is raw bytes; no UTF-8 validation is performed. Every fallible
/// operation either succeeds or leaves the string exactly as it was.
///
/// # Growth
///
/// [`reserve`](String::reserve) (and everything that appends through it)
/// grows the capacity to `max(2 * capacity, required, 8)`, so `n` single-byte
/// pushes reallocate `O(log n)` times. [`reserve_exact`](String::reserve_exact)
/// grows to exactly the required capacity.
///
/// # Examples
///
/// ```rust
/// use rstring::String;
///
/// let mut s = String::from_bytes(b"abc")?;
/// s.push(b'd')?;
/// s.push_str(b"ef")?;
///
/// assert_eq!(s, "abcdef");
/// assert_eq!(s.len(), 6);
/// assert_eq!(s.capacity(), 8);
/// # Ok::<(), rstring::Error>(())
/// ```
pub struct String<A: Allocator = Global> {
  buf: RawBuf,
  len: usize,
  cap: usize,
  alloc: A,
}

// The string exclusively owns its block, so it may move between threads
// whenever its allocator can.
unsafe impl<A: Allocator + Send> Send for String<A> {}
unsafe impl<A: Allocator + Sync> Sync for String<A> {}

impl String {
  /// Creates an empty string. Does not allocate.
  pub const fn new() -> Self {
    Self::new_in(Global)
  }

  /// Creates an empty string able to hold at least `capacity` bytes.
  pub fn with_capacity(capacity: usize) -> Result<Self> {
    Self::with_capacity_in(capacity, Global)
  }

  /// Creates a string holding a copy of `bytes`.
  pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
    Self::from_bytes_in(bytes, Global)
  }

  /// Reassembles a string from parts produced by
  /// [`into_raw_parts`](String::into_raw_parts).
  ///
  /// # Safety
  ///
  /// Nothing is validated. `buf` must be null with `capacity == 0`, or a
  /// block of `capacity` bytes from [`GLOBAL_ALLOCATOR`](crate::GLOBAL_ALLOCATOR)
  /// that nothing else owns; `length <= capacity`; and the first `length`
  /// bytes must be initialized.
  pub unsafe fn from_raw_parts(
    buf: *mut u8,
    length: usize,
    capacity: usize,
  ) -> Self {
    unsafe { Self::from_raw_parts_in(buf, length, capacity, Global) }
  }
}

impl<A: Allocator> String<A> {
  /// Smallest non-zero capacity chosen by amortized growth. Allocators round
  /// tiny requests up to at least this anyway.
  pub const MIN_NON_ZERO_CAP: usize = 8;

  /// Creates an empty string that will allocate from `alloc`.
  pub const fn new_in(alloc: A) -> Self {
    Self {
      buf: RawBuf::EMPTY,
      len: 0,
      cap: 0,
      alloc,
    }
  }

  pub fn with_capacity_in(
    capacity: usize,
    alloc: A,
  ) -> Result<Self> {
    let mut string = Self::new_in(alloc);
    string.reserve(capacity)?;
    Ok(string)
  }

  pub fn from_bytes_in(
    bytes: &[u8],
    alloc: A,
  ) -> Result<Self> {
    let mut string = Self::new_in(alloc);
    string.push_str(bytes)?;
    Ok(string)
  }

  /// Reassembles a string from parts produced by
  /// [`into_raw_parts_with_alloc`](String::into_raw_parts_with_alloc).
  ///
  /// # Safety
  ///
  /// Same contract as [`String::from_raw_parts`], with `buf` allocated by
  /// `alloc`.
  pub unsafe fn from_raw_parts_in(
    buf: *mut u8,
    length: usize,
    capacity: usize,
    alloc: A,
  ) -> Self {
    Self {
      buf: unsafe { RawBuf::from_raw(buf) },
      len: length,
      cap: capacity,
      alloc,
    }
  }

  /// Decomposes the string into `(buf, len, cap)`, handing ownership of the
  /// block to the caller.
  ///
  /// The allocator handle is dropped; use
  /// [`into_raw_parts_with_alloc`](String::into_raw_parts_with_alloc) when it
  /// owns state the block depends on.
  pub fn into_raw_parts(self) -> (*mut u8, usize, usize) {
    let (buf, len, cap, _) = self.into_raw_parts_with_alloc();
    (buf, len, cap)
  }

  pub fn into_raw_parts_with_alloc(self) -> (*mut u8, usize, usize, A) {
    let this = ManuallyDrop::new(self);
    // `this` is never dropped, so the allocator is moved out exactly once.
    let alloc = unsafe { ptr::read(&this.alloc) };
    (this.buf.as_mut_ptr(), this.len, this.cap, alloc)
  }

  #[inline]
  pub const fn len(&self) -> usize {
    self.len
  }

  #[inline]
  pub const fn capacity(&self) -> usize {
    self.cap
  }

  #[inline]
  pub const fn is_empty(&self) -> bool {
    self.len == 0
  }

  pub fn allocator(&self) -> &A {
    &self.alloc
  }

  /// Pointer to the first byte, or null when the string owns no block.
  pub fn as_ptr(&self) -> *const u8 {
    self.buf.as_ptr()
  }

  pub fn as_mut_ptr(&mut self) -> *mut u8 {
    self.buf.as_mut_ptr()
  }

  pub fn as_bytes(&self) -> &[u8] {
    match self.buf.as_non_null() {
      Some(ptr) => unsafe { slice::from_raw_parts(ptr.as_ptr(), self.len) },
      None => &[],
    }
  }

  pub fn as_bytes_mut(&mut self) -> &mut [u8] {
    match self.buf.as_non_null() {
      Some(ptr) => unsafe { slice::from_raw_parts_mut(ptr.as_ptr(), self.len) },
      None => &mut [],
    }
  }

  /// Reserves room for at least `additional` more bytes, growing amortized.
  ///
  /// Fails with [`Error::OutOfRange`] if `len + additional` overflows and with
  /// [`Error::MemAllocFailed`] if the allocator refuses.
  pub fn reserve(
    &mut self,
    additional: usize,
  ) -> Result<()> {
    self.grow(additional, false)
  }

  /// Reserves room for exactly `additional` more bytes.
  pub fn reserve_exact(
    &mut self,
    additional: usize,
  ) -> Result<()> {
    self.grow(additional, true)
  }

  pub fn shrink_to_fit(&mut self) -> Result<()> {
    self.shrink_to(self.len)
  }

  /// Shrinks the capacity to `min_capacity`, but never below the length nor
  /// above the current capacity.
  pub fn shrink_to(
    &mut self,
    min_capacity: usize,
  ) -> Result<()> {
    let new_cap = min_capacity.clamp(self.len, self.cap);
    self.resize_buffer(new_cap)
  }

  pub fn push(
    &mut self,
    byte: u8,
  ) -> Result<()> {
    self.insert(self.len, byte)
  }

  pub fn push_str(
    &mut self,
    bytes: &[u8],
  ) -> Result<()> {
    self.insert_str(self.len, bytes)
  }

  pub fn insert(
    &mut self,
    idx: usize,
    byte: u8,
  ) -> Result<()> {
    self.insert_str(idx, &[byte])
  }

  /// Inserts `bytes` at `idx`, shifting the tail right.
  ///
  /// `idx == len` appends; `idx > len` fails with [`Error::OutOfRange`].
  pub fn insert_str(
    &mut self,
    idx: usize,
    bytes: &[u8],
  ) -> Result<()> {
    if idx > self.len {
      return Err(Error::OutOfRange);
    }

    let count = bytes.len();
    if count == 0 {
      return Ok(());
    }

    self.reserve(count)?;

    unsafe {
      let at = self.buf.as_mut_ptr().add(idx);
      ptr::copy(at, at.add(count), self.len - idx);
      ptr::copy_nonoverlapping(bytes.as_ptr(), at, count);
    }
    self.len += count;

    Ok(())
  }

  /// Removes and returns the byte at `idx`, shifting the tail left.
  pub fn remove(
    &mut self,
    idx: usize,
  ) -> Result<u8> {
    if idx >= self.len {
      return Err(Error::OutOfRange);
    }

    let byte = unsafe {
      let at = self.buf.as_mut_ptr().add(idx);
      let byte = at.read();
      ptr::copy(at.add(1), at, self.len - idx - 1);
      byte
    };
    self.len -= 1;

    Ok(byte)
  }

  /// Removes and returns the last byte.
  pub fn pop(&mut self) -> Result<u8> {
    let last = self.len.checked_sub(1).ok_or(Error::OutOfRange)?;
    self.remove(last)
  }

  /// Keeps only the bytes for which `keep` returns `true`.
  ///
  /// `keep` sees every byte exactly once, in order. Kept bytes are compacted
  /// in a single pass; the capacity is unchanged.
  ///
  /// If `keep` panics, the bytes it has not yet seen (including the one it
  /// panicked on) are kept after the bytes already retained.
  pub fn retain<F>(
    &mut self,
    mut keep: F,
  ) where
    F: FnMut(u8) -> bool,
  {
    /// Moves the unvisited tail down behind the kept bytes when dropped, so
    /// the string stays consistent even if the predicate unwinds.
    struct Compaction<'a, A: Allocator> {
      string: &'a mut String<A>,
      read: usize,
      kept: usize,
    }

    impl<A: Allocator> Drop for Compaction<'_, A> {
      fn drop(&mut self) {
        let tail = self.string.len - self.read;
        if tail > 0 && self.read != self.kept {
          unsafe {
            let base = self.string.buf.as_mut_ptr();
            ptr::copy(base.add(self.read), base.add(self.kept), tail);
          }
        }
        self.string.len = self.kept + tail;
      }
    }

    let len = self.len;
    let mut compaction = Compaction {
      string: self,
      read: 0,
      kept: 0,
    };

    while compaction.read < len {
      let base = compaction.string.buf.as_mut_ptr();
      let byte = unsafe { base.add(compaction.read).read() };

      if keep(byte) {
        unsafe { base.add(compaction.kept).write(byte) };
        compaction.kept += 1;
      }
      compaction.read += 1;
    }
  }

  /// Shortens the string to `new_len` bytes. No-op if it is already shorter.
  pub fn truncate(
    &mut self,
    new_len: usize,
  ) {
    self.len = self.len.min(new_len);
  }

  pub fn clear(&mut self) {
    self.truncate(0);
  }

  /// Splits the string at `at`, returning the tail `[at, len)` as a new
  /// string on a clone of the allocator. `self` keeps its capacity.
  pub fn split_off(
    &mut self,
    at: usize,
  ) -> Result<Self>
  where
    A: Clone,
  {
    if at > self.len {
      return Err(Error::OutOfRange);
    }

    let mut tail = Self::new_in(self.alloc.clone());
    tail.push_str(&self.as_bytes()[at..])?;
    self.len = at;

    Ok(tail)
  }

  /// Deep copy of the content into a block sized to exactly `len` bytes.
  pub fn try_clone(&self) -> Result<Self>
  where
    A: Clone,
  {
    let mut copy = Self::new_in(self.alloc.clone());
    copy.reserve_exact(self.len)?;
    copy.push_str(self.as_bytes())?;
    Ok(copy)
  }

  /// Replaces the content with a copy of `source`, reusing the block when it
  /// is large enough.
  pub fn try_clone_from<B: Allocator>(
    &mut self,
    source: &String<B>,
  ) -> Result<()> {
    self.reserve_exact(source.len().saturating_sub(self.len))?;
    self.clear();
    self.push_str(source.as_bytes())
  }

  fn grow(
    &mut self,
    additional: usize,
    exact: bool,
  ) -> Result<()> {
    let required = self
      .len
      .checked_add(additional)
      .ok_or(Error::OutOfRange)?;

    if required <= self.cap {
      return Ok(());
    }

    let new_cap = if exact {
      required
    } else {
      self.amortized_capacity(required)
    };
    self.resize_buffer(new_cap)
  }

  fn amortized_capacity(
    &self,
    required: usize,
  ) -> usize {
    self
      .cap
      .saturating_mul(2)
      .max(required)
      .max(Self::MIN_NON_ZERO_CAP)
  }

  fn resize_buffer(
    &mut self,
    new_cap: usize,
  ) -> Result<()> {
    unsafe { self.buf.reallocate(&self.alloc, self.cap, new_cap)? };
    self.cap = new_cap;
    Ok(())
  }
}

impl<A: Allocator> Drop for String<A> {
  fn drop(&mut self) {
    unsafe { self.buf.deallocate(&self.alloc) };
  }
}

impl<A: Allocator + Default> Default for String<A> {
  fn default() -> Self {
    Self::new_in(A::default())
  }
}

impl<A: Allocator> Deref for String<A> {
  type Target = [u8];

  fn deref(&self) -> &[u8] {
    self.as_bytes()
  }
}

impl<A: Allocator> DerefMut for String<A> {
  fn deref_mut(&mut self) -> &mut [u8] {
    self.as_bytes_mut()
  }
}

impl<A: Allocator> AsRef<[u8]> for String<A> {
  fn as_ref(&self) -> &[u8] {
    self.as_bytes()
  }
}

impl<A: Allocator, B: Allocator> PartialEq<String<B>> for String<A> {
  fn eq(
    &self,
    other: &String<B>,
  ) -> bool {
    self.as_bytes() == other.as_bytes()
  }
}

impl<A: Allocator> Eq for String<A> {}

impl<A: Allocator> PartialEq<[u8]> for String<A> {
  fn eq(
    &self,
    other: &[u8],
  ) -> bool {
    self.as_bytes() == other
  }
}

impl<A: Allocator> PartialEq<&[u8]> for String<A> {
  fn eq(
    &self,
    other: &&[u8],
  ) -> bool {
    self.as_bytes() == *other
  }
}

impl<A: Allocator, const N: usize> PartialEq<&[u8; N]> for String<A> {
  fn eq(
    &self,
    other: &&[u8; N],
  ) -> bool {
    self.as_bytes() == other.as_slice()
  }
}

impl<A: Allocator> PartialEq<str> for String<A> {
  fn eq(
    &self,
    other: &str,
  ) -> bool {
    self.as_bytes() == other.as_bytes()
  }
}

impl<A: Allocator> PartialEq<&str> for String<A> {
  fn eq(
    &self,
    other: &&str,
  ) -> bool {
    self.as_bytes() == other.as_bytes()
  }
}

impl<A: Allocator> Hash for String<A> {
  fn hash<H: Hasher>(
    &self,
    state: &mut H,
  ) {
    self.as_bytes().hash(state);
  }
}

impl<A: Allocator> fmt::Debug for String<A> {
  fn fmt(
    &self,
    f: &mut fmt::Formatter<'_>,
  ) -> fmt::Result {
    fmt::Debug::fmt(BStr::new(self.as_bytes()), f)
  }
}

/// Lossy: invalid UTF-8 is shown as U+FFFD.
impl<A: Allocator> fmt::Display for String<A> {
  fn fmt(
    &self,
    f: &mut fmt::Formatter<'_>,
  ) -> fmt::Result {
    fmt::Display::fmt(BStr::new(self.as_bytes()), f)
  }
}

impl<A: Allocator> fmt::Write for String<A> {
  fn write_str(
    &mut self,
    s: &str,
  ) -> fmt::Result {
    self.push_str(s.as_bytes()).map_err(|_| fmt::Error)
  }
}

impl TryFrom<&[u8]> for String {
  type Error = Error;

  fn try_from(bytes: &[u8]) -> Result<Self> {
    Self::from_bytes(bytes)
  }
}

impl TryFrom<&str> for String {
  type Error = Error;

  fn try_from(s: &str) -> Result<Self> {
    Self::from_bytes(s.as_bytes())
  }
}

#[cfg(test)]
mod tests {
  use std::{
    fmt::Write as _,
    panic::{self, AssertUnwindSafe},
  };

  use rstest::rstest;

  use super::*;
  use crate::{CountingAllocator, SystemAllocator};

  fn assert_invariants<A: Allocator>(s: &String<A>) {
    assert!(s.len() <= s.capacity());
    assert_eq!(s.capacity() == 0, s.as_ptr().is_null());
  }

  #[test]
  fn test_new() {
    let s = String::new();

    assert_eq!(s.len(), 0);
    assert_eq!(s.capacity(), 0);
    assert!(s.as_ptr().is_null());
    assert!(s.is_empty());
    assert_eq!(s, String::<Global>::default());
  }

  #[test]
  fn test_with_capacity() {
    let empty = String::with_capacity(0).unwrap();
    assert_eq!(empty.capacity(), 0);
    assert!(empty.as_ptr().is_null());

    let s = String::with_capacity(100).unwrap();
    assert!(!s.as_ptr().is_null());
    assert!(s.is_empty());
    assert!(s.capacity() >= 100);
  }

  #[test]
  fn test_with_capacity_too_large() {
    assert_eq!(
      String::with_capacity(usize::MAX).unwrap_err(),
      Error::MemAllocFailed
    );
  }

  #[test]
  fn test_with_capacity_small_uses_floor() {
    let s = String::with_capacity(1).unwrap();
    assert_eq!(s.capacity(), String::<Global>::MIN_NON_ZERO_CAP);
  }

  #[test]
  fn test_from_bytes_grows_amortized() {
    let s = String::from_bytes(b"abcdefgh").unwrap();
    assert_eq!(s, "abcdefgh");
    assert_eq!(s.capacity(), 8);

    let s = String::from_bytes(b"abcdefghi").unwrap();
    assert_eq!(s.capacity(), 9);

    let s = String::from_bytes(b"").unwrap();
    assert_eq!(s.capacity(), 0);
  }

  #[test]
  fn test_reserve() {
    let mut s = String::new();
    s.reserve(0).unwrap();
    assert_eq!(s.capacity(), 0);
    assert!(s.as_ptr().is_null());

    s.reserve(10).unwrap();
    assert_eq!(s.capacity(), 10);

    s.push_str(b"0123456789").unwrap();
    s.reserve(1).unwrap();
    assert_eq!(s.capacity(), 20);

    s.reserve(5).unwrap();
    assert_eq!(s.capacity(), 20);
  }

  #[test]
  fn test_reserve_overflow_leaves_state() {
    let mut s = String::from_bytes(b"abcdefgh").unwrap();
    let (ptr, cap) = (s.as_ptr(), s.capacity());

    assert_eq!(s.reserve(usize::MAX), Err(Error::OutOfRange));
    assert_eq!(s.reserve_exact(usize::MAX), Err(Error::OutOfRange));

    assert_eq!(s, "abcdefgh");
    assert_eq!(s.as_ptr(), ptr);
    assert_eq!(s.capacity(), cap);
  }

  #[test]
  fn test_reserve_infinite_on_empty() {
    let mut s = String::new();

    assert_eq!(s.reserve(usize::MAX), Err(Error::MemAllocFailed));
    assert_eq!(s.reserve_exact(usize::MAX), Err(Error::MemAllocFailed));
    assert_eq!(s.capacity(), 0);
    assert!(s.as_ptr().is_null());
  }

  #[test]
  fn test_reserve_exact() {
    let mut s = String::new();
    s.reserve_exact(0).unwrap();
    assert_eq!(s.capacity(), 0);

    s.reserve_exact(3).unwrap();
    assert_eq!(s.capacity(), 3);

    s.push_str(b"abc").unwrap();
    s.reserve_exact(1).unwrap();
    assert_eq!(s.capacity(), 4);
  }

  #[test]
  fn test_shrink() {
    let mut s = String::with_capacity(64).unwrap();
    s.push_str(b"hello").unwrap();

    s.shrink_to(32).unwrap();
    assert_eq!(s.capacity(), 32);

    s.shrink_to(128).unwrap();
    assert_eq!(s.capacity(), 32);

    s.shrink_to(0).unwrap();
    assert_eq!(s.capacity(), 5);
    assert_eq!(s, "hello");

    s.clear();
    s.shrink_to_fit().unwrap();
    assert_eq!(s.capacity(), 0);
    assert_invariants(&s);
  }

  #[test]
  fn test_shrink_failure_leaves_state() {
    let allocator = CountingAllocator::new();
    let mut s = String::with_capacity_in(64, &allocator).unwrap();
    s.push_str(b"abc").unwrap();

    allocator.set_failing(true);
    assert_eq!(s.shrink_to_fit(), Err(Error::MemAllocFailed));
    allocator.set_failing(false);

    assert_eq!(s.capacity(), 64);
    assert_eq!(s, "abc");
  }

  #[test]
  fn test_push_and_push_str() {
    let mut s = String::from_bytes(b"abc").unwrap();
    s.push(b'd').unwrap();
    s.push_str(b"ef").unwrap();
    s.push_str(b"").unwrap();

    assert_eq!(s, "abcdef");
    assert_eq!(s.len(), 6);
    assert_invariants(&s);
  }

  #[test]
  fn test_push_failure_leaves_state() {
    let allocator = CountingAllocator::new();
    let mut s = String::from_bytes_in(b"abcdefgh", &allocator).unwrap();

    allocator.set_failing(true);
    assert_eq!(s.push(b'i'), Err(Error::MemAllocFailed));
    assert_eq!(s.push_str(b"ij"), Err(Error::MemAllocFailed));
    allocator.set_failing(false);

    assert_eq!(s, "abcdefgh");
    assert_eq!(s.capacity(), 8);
  }

  #[test]
  fn test_growth_is_amortized() {
    let allocator = CountingAllocator::new();
    let mut s = String::new_in(&allocator);

    for i in 0..1000 {
      s.push(b'a' + (i % 26) as u8).unwrap();
    }

    assert_eq!(s.len(), 1000);
    assert_eq!(s.capacity(), 1024);
    assert_eq!(allocator.allocations(), 1);
    assert_eq!(allocator.reallocations(), 7);
  }

  #[rstest]
  #[case(0, b"Xhello")]
  #[case(2, b"heXllo")]
  #[case(5, b"helloX")]
  fn test_insert(
    #[case] idx: usize,
    #[case] expected: &[u8],
  ) {
    let mut s = String::from_bytes(b"hello").unwrap();
    s.insert(idx, b'X').unwrap();
    assert_eq!(s, expected);
  }

  #[test]
  fn test_insert_out_of_range() {
    let mut s = String::from_bytes(b"hello").unwrap();
    assert_eq!(s.insert(6, b'X'), Err(Error::OutOfRange));
    assert_eq!(s.insert_str(6, b""), Err(Error::OutOfRange));
    assert_eq!(s, "hello");

    let mut empty = String::new();
    assert_eq!(empty.insert(1, b'X'), Err(Error::OutOfRange));
    empty.insert(0, b'X').unwrap();
    assert_eq!(empty, "X");
  }

  #[test]
  fn test_insert_str_shifts_overlapping_tail() {
    let mut s = String::from_bytes(b"abcdefgh").unwrap();
    s.insert_str(1, b"0123456789").unwrap();
    assert_eq!(s, "a0123456789bcdefgh");
    assert_invariants(&s);
  }

  #[test]
  fn test_insert_at_len_matches_push() {
    let mut inserted = String::from_bytes(b"ab").unwrap();
    let mut pushed = String::from_bytes(b"ab").unwrap();

    inserted.insert_str(inserted.len(), b"cd").unwrap();
    pushed.push_str(b"cd").unwrap();

    assert_eq!(inserted, pushed);
    assert_eq!(inserted.capacity(), pushed.capacity());
  }

  #[test]
  fn test_pop() {
    let mut s = String::from_bytes(b"abcdefgh").unwrap();

    for expected in [b'h', b'g', b'f', b'e'] {
      assert_eq!(s.pop(), Ok(expected));
    }
    assert_eq!(s, "abcd");
    assert_eq!(s.capacity(), 8);
  }

  #[test]
  fn test_pop_empty() {
    let mut s = String::new();
    assert_eq!(s.pop(), Err(Error::OutOfRange));
    assert_eq!(s.len(), 0);
    assert_eq!(s.capacity(), 0);
  }

  #[test]
  fn test_remove() {
    let mut s = String::from_bytes(b"abcdefgh").unwrap();

    assert_eq!(s.remove(0), Ok(b'a'));
    assert_eq!(s.remove(0), Ok(b'b'));
    assert_eq!(s.remove(s.len() - 1), Ok(b'h'));
    assert_eq!(s.remove(s.len() - 1), Ok(b'g'));

    assert_eq!(s, "cdef");
  }

  #[test]
  fn test_remove_out_of_range() {
    let mut s = String::from_bytes(b"abc").unwrap();
    assert_eq!(s.remove(3), Err(Error::OutOfRange));
    assert_eq!(s, "abc");

    let mut empty = String::new();
    assert_eq!(empty.remove(0), Err(Error::OutOfRange));
  }

  #[test]
  fn test_remove_then_insert_restores() {
    let mut s = String::from_bytes(b"restore me").unwrap();
    let original = s.try_clone().unwrap();

    for idx in 0..s.len() {
      let byte = s.remove(idx).unwrap();
      s.insert(idx, byte).unwrap();
      assert_eq!(s, original);
    }
  }

  #[test]
  fn test_retain() {
    let mut s = String::from_bytes(b"f_o_ob_ar").unwrap();
    s.retain(|byte| byte != b'_');
    assert_eq!(s, "foobar");
    assert_eq!(s.capacity(), 9);
  }

  #[test]
  fn test_retain_visits_each_byte_once_in_order() {
    let mut s = String::from_bytes(b"a1b2c3").unwrap();
    let mut seen = Vec::new();
    let mut calls = 0;

    s.retain(|byte| {
      seen.push(byte);
      calls += 1;
      calls % 2 == 0
    });

    assert_eq!(seen, b"a1b2c3");
    assert_eq!(s, "123");
  }

  #[test]
  fn test_retain_everything_and_nothing() {
    let mut s = String::from_bytes(b"keep").unwrap();
    s.retain(|_| true);
    assert_eq!(s, "keep");

    s.retain(|_| false);
    assert!(s.is_empty());
    assert_eq!(s.capacity(), 8);

    let mut empty = String::new();
    empty.retain(|_| unreachable!());
    assert!(empty.is_empty());
  }

  #[test]
  fn test_retain_panicking_predicate_keeps_unvisited_tail() {
    let mut s = String::from_bytes(b"a_b_c_d").unwrap();

    let result = panic::catch_unwind(AssertUnwindSafe(|| {
      s.retain(|byte| {
        if byte == b'c' {
          panic!("predicate gave up at 'c'");
        }
        byte != b'_'
      })
    }));

    assert!(result.is_err());
    assert_eq!(s, "abc_d");
    assert_eq!(s.capacity(), 8);
    assert_invariants(&s);
  }

  #[test]
  fn test_truncate() {
    let mut s = String::from_bytes(b"abcdef").unwrap();

    s.truncate(10);
    assert_eq!(s, "abcdef");

    s.truncate(3);
    assert_eq!(s, "abc");
    assert_eq!(s.capacity(), 8);

    s.clear();
    assert!(s.is_empty());
    assert_eq!(s.capacity(), 8);
  }

  #[test]
  fn test_split_off() {
    let mut s = String::from_bytes(b"Hello, World!").unwrap();
    let cap = s.capacity();

    let tail = s.split_off(7).unwrap();

    assert_eq!(s, "Hello, ");
    assert_eq!(tail, "World!");
    assert_eq!(s.capacity(), cap);
    assert_eq!(tail.capacity(), String::<Global>::MIN_NON_ZERO_CAP);
  }

  #[test]
  fn test_split_off_bounds() {
    let mut s = String::from_bytes(b"abc").unwrap();

    let tail = s.split_off(3).unwrap();
    assert!(tail.is_empty());
    assert_eq!(tail.capacity(), 0);
    assert_eq!(s, "abc");

    assert_eq!(s.split_off(4).unwrap_err(), Error::OutOfRange);
    assert_eq!(s, "abc");

    let head = s.split_off(0).unwrap();
    assert!(s.is_empty());
    assert_eq!(head, "abc");
  }

  #[test]
  fn test_split_off_failure_leaves_state() {
    let allocator = CountingAllocator::new();
    let mut s = String::from_bytes_in(b"abcdef", &allocator).unwrap();

    allocator.set_failing(true);
    assert_eq!(s.split_off(2).unwrap_err(), Error::MemAllocFailed);
    allocator.set_failing(false);

    assert_eq!(s, "abcdef");
  }

  #[test]
  fn test_try_clone() {
    let mut s = String::with_capacity(64).unwrap();
    s.push_str(b"copy me").unwrap();

    let copy = s.try_clone().unwrap();
    assert_eq!(copy, s);
    assert_eq!(copy.capacity(), 7);
    assert_ne!(copy.as_ptr(), s.as_ptr());

    let empty = String::new().try_clone().unwrap();
    assert_eq!(empty.capacity(), 0);
    assert!(empty.as_ptr().is_null());
  }

  #[test]
  fn test_try_clone_from() {
    let source = String::from_bytes(b"source").unwrap();

    let mut target = String::from_bytes(b"a much longer target").unwrap();
    let cap = target.capacity();
    target.try_clone_from(&source).unwrap();
    assert_eq!(target, source);
    assert_eq!(target.capacity(), cap);

    let mut small = String::from_bytes(b"ab").unwrap();
    small.try_clone_from(&source).unwrap();
    assert_eq!(small, "source");
  }

  #[test]
  fn test_try_clone_from_failure_leaves_state() {
    let allocator = CountingAllocator::new();
    let source = String::from_bytes(b"0123456789abcdef").unwrap();
    let mut target = String::from_bytes_in(b"abc", &allocator).unwrap();

    allocator.set_failing(true);
    assert_eq!(
      target.try_clone_from(&source),
      Err(Error::MemAllocFailed)
    );
    allocator.set_failing(false);

    assert_eq!(target, "abc");
  }

  #[test]
  fn test_eq() {
    let a = String::from_bytes(b"abc").unwrap();
    let b = String::from_bytes_in(b"abc", SystemAllocator::new()).unwrap();
    let c = String::from_bytes(b"abd").unwrap();
    let d = String::from_bytes(b"ab").unwrap();

    assert_eq!(a, a);
    assert_eq!(a, b);
    assert_eq!(b, a);
    assert_ne!(a, c);
    assert_ne!(a, d);
    assert_eq!(String::new(), String::with_capacity(32).unwrap());
  }

  #[test]
  fn test_raw_parts_round_trip() {
    let s = String::from_bytes(b"abcdefgh").unwrap();
    let copy = s.try_clone().unwrap();

    let (buf, len, cap) = copy.into_raw_parts();
    assert_eq!((len, cap), (8, 8));

    let rebuilt = unsafe { String::from_raw_parts(buf, len, cap) };
    assert_eq!(rebuilt, s);
    assert_eq!(rebuilt.as_ptr(), buf as *const u8);
  }

  #[test]
  fn test_raw_parts_with_alloc() {
    let allocator = CountingAllocator::new();
    let s = String::from_bytes_in(b"xyz", &allocator).unwrap();

    let (buf, len, cap, alloc) = s.into_raw_parts_with_alloc();
    assert_eq!(allocator.live(), 1);

    let rebuilt = unsafe { String::from_raw_parts_in(buf, len, cap, alloc) };
    assert_eq!(rebuilt, "xyz");
    drop(rebuilt);

    assert_eq!(allocator.live(), 0);
  }

  #[test]
  fn test_drop_releases_block() {
    let allocator = CountingAllocator::new();

    {
      let mut s = String::new_in(&allocator);
      s.push_str(b"some bytes that need a block").unwrap();
      let _tail = s.split_off(4).unwrap();
      assert_eq!(allocator.live(), 2);
    }

    assert_eq!(allocator.live(), 0);
  }

  #[test]
  fn test_as_mut_ptr_and_bytes_mut() {
    let mut s = String::from_bytes(b"abc").unwrap();

    unsafe { s.as_mut_ptr().write(b'x') };
    s.as_bytes_mut()[2] = b'z';
    s[1] = b'y';

    assert_eq!(s, "xyz");
    assert!(String::new().as_bytes().is_empty());
  }

  #[test]
  fn test_formatting() {
    let mut s = String::new();
    write!(s, "{}-{}", 4, "two").unwrap();
    assert_eq!(s, "4-two");

    assert_eq!(format!("{s}"), "4-two");
    assert_eq!(format!("{s:?}"), "\"4-two\"");

    let invalid = String::from_bytes(b"a\xFFb").unwrap();
    assert_eq!(format!("{invalid}"), "a\u{FFFD}b");
  }

  #[test]
  fn test_try_from() {
    let from_str = String::try_from("abc").unwrap();
    let from_bytes = String::try_from(&b"abc"[..]).unwrap();
    assert_eq!(from_str, from_bytes);
  }

  #[test]
  fn test_moves_between_threads() {
    let s = String::from_bytes(b"sent").unwrap();
    let handle = std::thread::spawn(move || {
      let mut s = s;
      s.push(b'!').unwrap();
      s
    });

    assert_eq!(handle.join().unwrap(), "sent!");
  }
}
