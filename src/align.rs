/// Size of a machine word in bytes, the alignment every allocator backend in
/// this crate hands out.
pub const WORD: usize = ::core::mem::size_of::<usize>();

/// Rounds `value` up to the next multiple of the machine word size.
///
/// # Examples
///
/// ```rust
/// use rstring::align;
/// use rstring::align::WORD;
///
/// assert_eq!(align!(0usize), 0);
/// assert_eq!(align!(1usize), WORD);
/// assert_eq!(align!(WORD), WORD);
/// assert_eq!(align!(WORD + 1), 2 * WORD);
/// ```
#[macro_export]
macro_rules! align {
  ($value:expr) => {
    $crate::align_to!($value, $crate::align::WORD)
  };
}

/// Rounds `value` up to the next multiple of `align`, which must be a power of
/// two.
///
/// # Examples
///
/// ```rust
/// use rstring::align_to;
///
/// assert_eq!(align_to!(0, 16), 0);
/// assert_eq!(align_to!(1, 16), 16);
/// assert_eq!(align_to!(33, 32), 64);
/// ```
#[macro_export]
macro_rules! align_to {
  ($value:expr, $align:expr) => {
    ($value + $align - 1) & !($align - 1)
  };
}
