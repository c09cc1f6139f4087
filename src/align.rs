/// Rounds `value` up to the next multiple of `alignment`.
///
/// `alignment` must be a power of two; the rounding is a bitmask, not a division.
///
/// # Examples
///
/// ```rust
/// use linalloc::align_to;
///
/// assert_eq!(align_to!(13usize, 8usize), 16);
/// assert_eq!(align_to!(24usize, 16usize), 32);
/// assert_eq!(align_to!(32usize, 16usize), 32);
/// ```
#[macro_export]
macro_rules! align_to {
  ($value:expr, $alignment:expr) => {
    ($value + ($alignment - 1)) & !($alignment - 1)
  };
}

/// Largest fundamental alignment, the `max_align_t` of the platform C ABI.
pub const MAX_ALIGN: usize = 16;

/// Returns `true` when `alignment` is a positive power of two.
pub fn is_valid_alignment(alignment: usize) -> bool {
  alignment != 0 && alignment.is_power_of_two()
}

/// Overflow-checked version of [`align_to!`].
///
/// Returns `None` if `alignment` is not a power of two or the rounded value
/// does not fit in a `usize`.
pub fn align_up(
  value: usize,
  alignment: usize,
) -> Option<usize> {
  if !is_valid_alignment(alignment) {
    return None;
  }

  value.checked_add(alignment - 1)?;

  Some(align_to!(value, alignment))
}

/// Bytes that must be skipped from `address` to reach the next multiple of `alignment`.
///
/// ```text
///   address            aligned
///      │                  │
///      ▼                  ▼
///   ───┬──────────────────┬──────────
///      │ ░░░ padding ░░░  │  payload
///   ───┴──────────────────┴──────────
/// ```
pub fn padding_for(
  address: usize,
  alignment: usize,
) -> Option<usize> {
  align_up(address, alignment).map(|aligned| aligned - address)
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_align_to() {
    for alignment in [1usize, 2, 4, 8, 16, 32, 64] {
      for i in 0..10 {
        let sizes = (alignment * i + 1)..=(alignment * (i + 1));
        let expected = alignment * (i + 1);

        for size in sizes {
          assert_eq!(expected, align_to!(size, alignment));
        }
      }
    }
  }

  #[test]
  fn test_valid_alignment() {
    assert!(is_valid_alignment(1));
    assert!(is_valid_alignment(16));
    assert!(is_valid_alignment(4096));

    assert!(!is_valid_alignment(0));
    assert!(!is_valid_alignment(3));
    assert!(!is_valid_alignment(12));
  }

  #[test]
  fn test_padding() {
    assert_eq!(padding_for(24, 16), Some(8));
    assert_eq!(padding_for(32, 16), Some(0));
    assert_eq!(padding_for(7, 1), Some(0));
    assert_eq!(padding_for(5, 3), None);
  }

  #[test]
  fn test_align_up_overflow() {
    assert_eq!(align_up(usize::MAX, 8), None);
    assert_eq!(align_up(usize::MAX, 1), Some(usize::MAX));
  }
}
