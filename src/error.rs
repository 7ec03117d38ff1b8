use std::io;

use thiserror::Error;

/// Errors raised while setting up a [`Heap`](crate::Heap).
///
/// Once a heap exists its operations never fail with an error: running out
/// of space is reported by `allocate` returning `None`.
#[derive(Error, Debug)]
pub enum HeapError {
  /// The byte store capacity is zero or not a multiple of the alignment.
  #[error("invalid heap capacity {capacity}: must be a non-zero multiple of 8")]
  InvalidCapacity { capacity: usize },

  /// The minimum growth increment is not a multiple of the alignment.
  #[error("invalid minimum increment {min_increment}: must be a multiple of 8")]
  InvalidMinIncrement { min_increment: usize },

  /// The operating system refused to map the byte store.
  #[error("failed to map a {capacity} byte arena")]
  Map {
    capacity: usize,
    #[source]
    source: io::Error,
  },
}
