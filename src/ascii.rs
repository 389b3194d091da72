//! ASCII classification of single bytes.
//!
//! Every predicate has the shape `fn(u8) -> bool`, so it can be handed to
//! [`String::retain`](crate::String::retain) directly:
//!
//! ```rust
//! use rstring::{String, ascii};
//!
//! let mut s = String::from_bytes(b"a1 b2\tc3").unwrap();
//! s.retain(ascii::is_alphabetic);
//! assert_eq!(s, "abc");
//! ```
//!
//! Bytes above `0x7F` are never classified as anything.

pub const NUL: u8 = 0x00;
pub const BEL: u8 = 0x07;
pub const BS: u8 = 0x08;
pub const HT: u8 = b'\t';
pub const LF: u8 = b'\n';
pub const VT: u8 = 0x0B;
pub const FF: u8 = 0x0C;
pub const CR: u8 = b'\r';
pub const ESC: u8 = 0x1B;
pub const US: u8 = 0x1F;
pub const DEL: u8 = 0x7F;

/// `true` if `byte` lies in the inclusive range `start..=end`.
pub const fn in_range(
  byte: u8,
  start: u8,
  end: u8,
) -> bool {
  start <= byte && byte <= end
}

pub const fn is_alphabetic(byte: u8) -> bool {
  byte.is_ascii_alphabetic()
}

pub const fn is_alphanumeric(byte: u8) -> bool {
  byte.is_ascii_alphanumeric()
}

/// `NUL..=US` and `DEL`.
pub const fn is_control(byte: u8) -> bool {
  byte.is_ascii_control()
}

pub const fn is_digit(byte: u8) -> bool {
  byte.is_ascii_digit()
}

/// `'!'..='~'`: printable and not a space.
pub const fn is_graphic(byte: u8) -> bool {
  byte.is_ascii_graphic()
}

pub const fn is_hexdigit(byte: u8) -> bool {
  byte.is_ascii_hexdigit()
}

pub const fn is_lowercase(byte: u8) -> bool {
  byte.is_ascii_lowercase()
}

pub const fn is_octdigit(byte: u8) -> bool {
  in_range(byte, b'0', b'7')
}

pub const fn is_punctuation(byte: u8) -> bool {
  byte.is_ascii_punctuation()
}

pub const fn is_uppercase(byte: u8) -> bool {
  byte.is_ascii_uppercase()
}

/// WHATWG whitespace: `HT`, `LF`, `FF`, `CR`, and space. `VT` is excluded.
pub const fn is_whitespace(byte: u8) -> bool {
  byte.is_ascii_whitespace()
}

pub const fn to_uppercase(byte: u8) -> u8 {
  byte.to_ascii_uppercase()
}

pub const fn to_lowercase(byte: u8) -> u8 {
  byte.to_ascii_lowercase()
}

pub const fn eq_ignore_case(
  byte: u8,
  other: u8,
) -> bool {
  byte.eq_ignore_ascii_case(&other)
}
