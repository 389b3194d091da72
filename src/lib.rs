//! # rstring - A Growable Byte String over a Pluggable Allocator
//!
//! This crate provides a heap-backed, growable **byte string** with explicit
//! capacity control, built on a small allocator abstraction and a closed
//! error model. It can be used from Rust directly or from C through the
//! `rstring_*` functions of the [`ffi`] module.
//!
//! ## Overview
//!
//! ```text
//!   Layers:
//!
//!   ┌──────────────────────────────────────────────────────────────┐
//!   │  String<A>     push / insert / remove / retain / split_off   │
//!   ├──────────────────────────────────────────────────────────────┤
//!   │  RawBuf        allocate / reallocate / deallocate,           │
//!   │                zero sizes collapse to the empty sentinel     │
//!   ├──────────────────────────────────────────────────────────────┤
//!   │  Allocator     Global (libc malloc/realloc/free)             │
//!   │                SystemAllocator (std System + Block header)   │
//!   │                CountingAllocator<A> (counters, failures)     │
//!   └──────────────────────────────────────────────────────────────┘
//!
//!   Errors travel up unchanged: Error::{OutOfRange, MemAllocFailed},
//!   plus PtrIsNull at the C boundary.
//! ```
//!
//! ## Crate Structure
//!
//! ```text
//!   rstring
//!   ├── align      - Alignment macros (align!, align_to!)
//!   ├── alloc      - Allocator trait, VTable, GLOBAL_ALLOCATOR, Global
//!   ├── ascii      - Byte classification predicates for String::retain
//!   ├── block      - Block header metadata (internal)
//!   ├── counting   - CountingAllocator
//!   ├── cstr       - RawBuf, the owned byte buffer
//!   ├── error      - Error, Result, ResultCode
//!   ├── ffi        - C ABI (feature "ffi")
//!   ├── string     - String
//!   └── system     - SystemAllocator
//! ```
//!
//! ## Quick Start
//!
//! ```rust
//! use rstring::{Error, String};
//!
//! let mut s = String::from_bytes(b"Hello, World!")?;
//! let tail = s.split_off(7)?;
//!
//! assert_eq!(s, "Hello, ");
//! assert_eq!(tail, "World!");
//!
//! assert_eq!(s.insert(100, b'!'), Err(Error::OutOfRange));
//! # Ok::<(), Error>(())
//! ```
//!
//! ## How Growth Works
//!
//! Appending past the capacity doubles it, with a floor of eight bytes:
//!
//! ```text
//!   push x 1    cap 0 ──► 8
//!   push x 9    cap 8 ──► 16
//!   push x 17   cap 16 ─► 32
//!   ...
//!   n pushes    O(log n) reallocations
//! ```
//!
//! `reserve_exact`, `shrink_to`, and `shrink_to_fit` set the capacity to an
//! exact value instead. Shrinking to zero releases the block.
//!
//! ## Injecting an Allocator
//!
//! ```rust
//! use rstring::{CountingAllocator, Error, String};
//!
//! let allocator = CountingAllocator::new();
//! let mut s = String::new_in(&allocator);
//! s.push_str(b"abc")?;
//!
//! allocator.set_failing(true);
//! assert_eq!(s.reserve(100), Err(Error::MemAllocFailed));
//! assert_eq!(s, "abc");
//! # Ok::<(), Error>(())
//! ```
//!
//! ## Limitations
//!
//! - **Bytes, not text**: no UTF-8 validation, no locale or grapheme handling
//! - **Single owner**: a `String` may move between threads but concurrent
//!   mutation needs an external lock
//! - **Raw parts are unchecked**: `from_raw_parts` trusts its caller
//!
//! ## Logging
//!
//! Allocation traffic is reported through the `log` facade at `trace` level,
//! and allocation failures at `debug` level. Nothing is printed unless the
//! application installs a logger.

pub mod align;
pub mod alloc;
pub mod ascii;
mod block;
pub mod counting;
pub mod cstr;
pub mod error;
#[cfg(feature = "ffi")]
pub mod ffi;
pub mod string;
pub mod system;

pub use alloc::{Allocator, GLOBAL_ALLOCATOR, Global, VTable};
pub use counting::CountingAllocator;
pub use cstr::RawBuf;
pub use error::{Error, Result, ResultCode};
pub use string::String;
pub use system::SystemAllocator;
