/// Granularity every payload size is rounded to.
pub const ALIGNMENT: usize = 8;

/// Rounds the given size up to the next multiple of [`ALIGNMENT`].
///
/// The expression must not overflow `usize`; use [`align`] when the input is
/// untrusted.
///
/// # Examples
///
/// ```rust
/// use brkheap::align;
///
/// assert_eq!(align!(13), 16);
/// assert_eq!(align!(16), 16);
/// assert_eq!(align!(0), 0);
/// ```
#[macro_export]
macro_rules! align {
  ($value:expr) => {
    ($value + ($crate::align::ALIGNMENT - 1)) & !($crate::align::ALIGNMENT - 1)
  };
}

/// Returns the smallest multiple of [`ALIGNMENT`] that is `>= size`, or
/// `None` if that value does not fit in a `usize`.
#[must_use]
pub const fn align(size: usize) -> Option<usize> {
  if size > usize::MAX - (ALIGNMENT - 1) {
    return None;
  }
  Some(align!(size))
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_align() {
    let mut alignments = Vec::new();

    for i in 0..10 {
      let sizes = (ALIGNMENT * i + 1)..=(ALIGNMENT * (i + 1));

      let expected_alignment = ALIGNMENT * (i + 1);

      alignments.push((sizes, expected_alignment));
    }

    for (sizes, expected) in alignments {
      for size in sizes {
        assert_eq!(Some(expected), align(size));
        assert_eq!(expected, align!(size));
      }
    }
  }

  #[test]
  fn test_align_zero() {
    assert_eq!(align(0), Some(0));
  }

  #[test]
  fn test_align_overflow() {
    assert_eq!(align(usize::MAX), None);
    assert_eq!(align(usize::MAX - 6), None);
    assert_eq!(align(usize::MAX - 7), Some(usize::MAX - 7));
    assert_eq!(align(usize::MAX - 8), Some(usize::MAX - 7));
    assert_eq!(align(usize::MAX - 15), Some(usize::MAX - 15));
  }
}
