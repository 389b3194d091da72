//! C ABI over [`String`] backed by [`GLOBAL_ALLOCATOR`](crate::GLOBAL_ALLOCATOR).
//!
//! C code holds a [`RawString`] by value and passes it by pointer to every
//! mutating function. Each function returns a [`ResultCode`]; pointer
//! arguments are checked and reported as `PtrIsNull` rather than
//! dereferenced. Buffers come from libc `malloc`, so the `buf` of raw parts
//! obtained through [`rstring_into_raw_parts`] may be released with `free`.
//!
//! ```text
//!   rstring_t s = rstring_new ();
//!   rstring_push_str (&s, "abc", 3);
//!   rstring_push (&s, 'd');
//!   rstring_drop (&s);
//!   rstring_drop (&s); // no-op
//! ```

use std::{mem::ManuallyDrop, ptr, slice};

use libc::c_char;

use crate::{Result, ResultCode, String, ensure_not_null};

/// The `(buf, len, cap)` triple of a [`String`], laid out for C.
///
/// It is plain data: copying it does not copy the buffer, and C callers must
/// never let two copies outlive a call that mutates or drops one of them.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RawString {
  pub buf: *mut u8,
  pub len: usize,
  pub cap: usize,
}

impl RawString {
  pub const EMPTY: RawString = RawString {
    buf: ptr::null_mut(),
    len: 0,
    cap: 0,
  };

  /// Takes the string out, leaving `EMPTY` behind.
  unsafe fn take(&mut self) -> String {
    let string = unsafe { String::from_raw_parts(self.buf, self.len, self.cap) };
    *self = Self::EMPTY;
    string
  }

  fn put(
    &mut self,
    string: String,
  ) {
    let (buf, len, cap) = string.into_raw_parts();
    *self = RawString { buf, len, cap };
  }

  /// Borrows the string without taking ownership.
  unsafe fn view<R>(
    &self,
    op: impl FnOnce(&String) -> R,
  ) -> R {
    let string = ManuallyDrop::new(unsafe {
      String::from_raw_parts(self.buf, self.len, self.cap)
    });
    op(&string)
  }
}

impl From<String> for RawString {
  fn from(string: String) -> Self {
    let mut raw = RawString::EMPTY;
    raw.put(string);
    raw
  }
}

unsafe fn with_string<R>(
  this: *mut RawString,
  op: impl FnOnce(&mut String) -> Result<R>,
) -> Result<R> {
  ensure_not_null!(this);

  let raw = unsafe { &mut *this };
  let mut string = unsafe { raw.take() };
  let result = op(&mut string);
  raw.put(string);

  result
}

/// Writes `EMPTY` to the output slot, then the constructed string on success.
unsafe fn init(
  this: *mut RawString,
  make: impl FnOnce() -> Result<String>,
) -> Result<()> {
  ensure_not_null!(this);

  unsafe { this.write(RawString::EMPTY) };
  let string = make()?;
  unsafe { (*this).put(string) };

  Ok(())
}

unsafe fn bytes<'a>(
  string: *const c_char,
  len: usize,
) -> Result<&'a [u8]> {
  if len == 0 {
    return Ok(&[]);
  }
  ensure_not_null!(string);
  Ok(unsafe { slice::from_raw_parts(string.cast::<u8>(), len) })
}

unsafe fn write_optional(
  out: *mut c_char,
  byte: u8,
) {
  if !out.is_null() {
    unsafe { out.write(byte as c_char) };
  }
}

#[unsafe(no_mangle)]
pub extern "C" fn rstring_new() -> RawString {
  RawString::EMPTY
}

#[unsafe(no_mangle)]
pub extern "C" fn rstring_default() -> RawString {
  rstring_new()
}

/// # Safety
///
/// `this` must be null or valid for writes.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn rstring_with_capacity(
  this: *mut RawString,
  capacity: usize,
) -> ResultCode {
  unsafe { init(this, || String::with_capacity(capacity)) }.into()
}

/// # Safety
///
/// `this` must be null or valid for writes; `string` must be null or valid for
/// `len` bytes.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn rstring_from(
  this: *mut RawString,
  string: *const c_char,
  len: usize,
) -> ResultCode {
  unsafe { init(this, || String::from_bytes(bytes(string, len)?)) }.into()
}

/// Reassembles raw parts without validation.
#[unsafe(no_mangle)]
pub extern "C" fn rstring_from_raw_parts(
  buf: *mut u8,
  len: usize,
  cap: usize,
) -> RawString {
  RawString { buf, len, cap }
}

/// Moves the buffer out to the caller and resets `*this` to empty.
///
/// # Safety
///
/// Every pointer must be null or valid for writes.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn rstring_into_raw_parts(
  this: *mut RawString,
  buf: *mut *mut u8,
  len: *mut usize,
  cap: *mut usize,
) -> ResultCode {
  unsafe { into_raw_parts(this, buf, len, cap) }.into()
}

unsafe fn into_raw_parts(
  this: *mut RawString,
  buf: *mut *mut u8,
  len: *mut usize,
  cap: *mut usize,
) -> Result<()> {
  ensure_not_null!(this, buf, len, cap);

  unsafe {
    let raw = this.replace(RawString::EMPTY);
    buf.write(raw.buf);
    len.write(raw.len);
    cap.write(raw.cap);
  }
  Ok(())
}

/// # Safety
///
/// `this` must be null or point to a live string.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn rstring_push(
  this: *mut RawString,
  chr: c_char,
) -> ResultCode {
  unsafe { with_string(this, |s| s.push(chr as u8)) }.into()
}

/// # Safety
///
/// `this` must be null or point to a live string; `string` must be null or
/// valid for `len` bytes and must not alias the string's buffer.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn rstring_push_str(
  this: *mut RawString,
  string: *const c_char,
  len: usize,
) -> ResultCode {
  unsafe { with_string(this, |s| s.push_str(bytes(string, len)?)) }.into()
}

/// # Safety
///
/// `this` must be null or point to a live string.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn rstring_insert(
  this: *mut RawString,
  idx: usize,
  chr: c_char,
) -> ResultCode {
  unsafe { with_string(this, |s| s.insert(idx, chr as u8)) }.into()
}

/// # Safety
///
/// Same as [`rstring_push_str`].
#[unsafe(no_mangle)]
pub unsafe extern "C" fn rstring_insert_str(
  this: *mut RawString,
  idx: usize,
  string: *const c_char,
  len: usize,
) -> ResultCode {
  unsafe { with_string(this, |s| s.insert_str(idx, bytes(string, len)?)) }.into()
}

/// Removes the byte at `idx`, storing it in `chr` unless `chr` is null.
///
/// # Safety
///
/// `this` must be null or point to a live string; `chr` must be null or valid
/// for writes.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn rstring_remove(
  this: *mut RawString,
  idx: usize,
  chr: *mut c_char,
) -> ResultCode {
  unsafe {
    with_string(this, |s| {
      let byte = s.remove(idx)?;
      write_optional(chr, byte);
      Ok(())
    })
  }
  .into()
}

/// # Safety
///
/// Same as [`rstring_remove`].
#[unsafe(no_mangle)]
pub unsafe extern "C" fn rstring_pop(
  this: *mut RawString,
  chr: *mut c_char,
) -> ResultCode {
  unsafe {
    with_string(this, |s| {
      let byte = s.pop()?;
      write_optional(chr, byte);
      Ok(())
    })
  }
  .into()
}

/// # Safety
///
/// `this` must be null or point to a live string. `keep` must not touch the
/// string being retained.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn rstring_retain(
  this: *mut RawString,
  keep: Option<unsafe extern "C" fn(c_char) -> bool>,
) -> ResultCode {
  let Some(keep) = keep else {
    return ResultCode::PtrIsNull;
  };
  unsafe {
    with_string(this, |s| {
      s.retain(|byte| keep(byte as c_char));
      Ok(())
    })
  }
  .into()
}

/// # Safety
///
/// `this` must be null or point to a live string.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn rstring_truncate(
  this: *mut RawString,
  new_len: usize,
) -> ResultCode {
  unsafe {
    with_string(this, |s| {
      s.truncate(new_len);
      Ok(())
    })
  }
  .into()
}

/// # Safety
///
/// `this` must be null or point to a live string.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn rstring_clear(this: *mut RawString) -> ResultCode {
  unsafe { rstring_truncate(this, 0) }
}

/// Moves `[idx, len)` into a new string written to `target`. `target` is set
/// to empty first, even on failure.
///
/// # Safety
///
/// `this` must be null or point to a live string; `target` must be null or
/// valid for writes and distinct from `this`.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn rstring_split_off(
  this: *mut RawString,
  idx: usize,
  target: *mut RawString,
) -> ResultCode {
  unsafe { init(target, || with_string(this, |s| s.split_off(idx))) }.into()
}

/// # Safety
///
/// `this` must be null or point to a live string.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn rstring_reserve(
  this: *mut RawString,
  additional: usize,
) -> ResultCode {
  unsafe { with_string(this, |s| s.reserve(additional)) }.into()
}

/// # Safety
///
/// `this` must be null or point to a live string.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn rstring_reserve_exact(
  this: *mut RawString,
  additional: usize,
) -> ResultCode {
  unsafe { with_string(this, |s| s.reserve_exact(additional)) }.into()
}

/// # Safety
///
/// `this` must be null or point to a live string.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn rstring_shrink_to_fit(this: *mut RawString) -> ResultCode {
  unsafe { with_string(this, |s| s.shrink_to_fit()) }.into()
}

/// # Safety
///
/// `this` must be null or point to a live string.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn rstring_shrink_to(
  this: *mut RawString,
  min_capacity: usize,
) -> ResultCode {
  unsafe { with_string(this, |s| s.shrink_to(min_capacity)) }.into()
}

#[unsafe(no_mangle)]
pub extern "C" fn rstring_len(this: RawString) -> usize {
  this.len
}

#[unsafe(no_mangle)]
pub extern "C" fn rstring_capacity(this: RawString) -> usize {
  this.cap
}

#[unsafe(no_mangle)]
pub extern "C" fn rstring_is_empty(this: RawString) -> bool {
  this.len == 0
}

/// Byte-wise equality.
///
/// # Safety
///
/// Both arguments must be live strings.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn rstring_eq(
  this: RawString,
  other: RawString,
) -> bool {
  unsafe { this.view(|a| other.view(|b| a == b)) }
}

/// # Safety
///
/// Both arguments must be live strings.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn rstring_ne(
  this: RawString,
  other: RawString,
) -> bool {
  !unsafe { rstring_eq(this, other) }
}

#[unsafe(no_mangle)]
pub extern "C" fn rstring_as_ptr(this: RawString) -> *const c_char {
  this.buf.cast_const().cast()
}

#[unsafe(no_mangle)]
pub extern "C" fn rstring_as_mut_ptr(this: RawString) -> *mut c_char {
  this.buf.cast()
}

/// Writes a copy of `this`, sized to exactly its length, to `target`.
///
/// # Safety
///
/// `this` must be a live string; `target` must be null or valid for writes.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn rstring_clone(
  this: RawString,
  target: *mut RawString,
) -> ResultCode {
  unsafe { init(target, || this.view(String::try_clone)) }.into()
}

/// Replaces the content of `*this` with a copy of `source`.
///
/// # Safety
///
/// `this` must be null or point to a live string; `source` must be a live
/// string with a different buffer.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn rstring_clone_from(
  this: *mut RawString,
  source: RawString,
) -> ResultCode {
  unsafe { with_string(this, |s| source.view(|source| s.try_clone_from(source))) }.into()
}

/// Releases the buffer and resets `*this` to empty; calling it again is a
/// no-op.
///
/// # Safety
///
/// `this` must be null or point to a live string.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn rstring_drop(this: *mut RawString) -> ResultCode {
  if this.is_null() {
    return ResultCode::PtrIsNull;
  }
  drop(unsafe { (*this).take() });
  ResultCode::Ok
}
