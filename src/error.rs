use thiserror::Error;

/// Failure kinds reported by every fallible operation in this crate.
///
/// An operation that returns an error leaves its receiver exactly as it was
/// before the call.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Error {
  /// A required pointer (receiver, output slot, or input with a non-zero
  /// length) was null. Only produced at the C boundary.
  #[error("pointer is null")]
  PtrIsNull,
  /// An index exceeded the bound of the operation, or a size computation
  /// overflowed `usize`.
  #[error("index or size out of range")]
  OutOfRange,
  /// The allocator could not satisfy an allocate or reallocate request.
  #[error("memory allocation failed")]
  MemAllocFailed,
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

/// C-compatible outcome code.
///
/// `Ok` is always `0`, so C callers may test `if (code)` for failure.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResultCode {
  Ok = 0,
  PtrIsNull,
  OutOfRange,
  MemAllocFailed,
}

impl ResultCode {
  pub const fn is_ok(self) -> bool {
    matches!(self, ResultCode::Ok)
  }

  pub const fn is_err(self) -> bool {
    !self.is_ok()
  }

  /// Converts back into a Rust result.
  pub const fn into_result(self) -> Result<()> {
    match self {
      ResultCode::Ok => Ok(()),
      ResultCode::PtrIsNull => Err(Error::PtrIsNull),
      ResultCode::OutOfRange => Err(Error::OutOfRange),
      ResultCode::MemAllocFailed => Err(Error::MemAllocFailed),
    }
  }
}

impl From<Error> for ResultCode {
  fn from(error: Error) -> Self {
    match error {
      Error::PtrIsNull => ResultCode::PtrIsNull,
      Error::OutOfRange => ResultCode::OutOfRange,
      Error::MemAllocFailed => ResultCode::MemAllocFailed,
    }
  }
}

impl From<Result<()>> for ResultCode {
  fn from(result: Result<()>) -> Self {
    match result {
      Ok(()) => ResultCode::Ok,
      Err(error) => error.into(),
    }
  }
}

/// Returns early with [`Error::PtrIsNull`] if any of the given raw pointers is
/// null.
///
/// # Examples
///
/// ```rust
/// use rstring::{Error, Result, ensure_not_null};
///
/// fn read(ptr: *const u8) -> Result<u8> {
///   ensure_not_null!(ptr);
///   Ok(unsafe { *ptr })
/// }
///
/// assert_eq!(read(std::ptr::null()), Err(Error::PtrIsNull));
/// assert_eq!(read(&7u8), Ok(7));
/// ```
#[macro_export]
macro_rules! ensure_not_null {
  ($($ptr:expr),+ $(,)?) => {
    $(
      if $ptr.is_null() {
        return ::core::result::Result::Err($crate::Error::PtrIsNull);
      }
    )+
  };
}
