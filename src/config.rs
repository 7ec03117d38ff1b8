use crate::{align::ALIGNMENT, error::HeapError};

/// Default byte store capacity: 100 MiB.
pub const DEFAULT_CAPACITY: usize = 100 * 1024 * 1024;

/// Default minimum break advance per growth: 4 KiB.
pub const DEFAULT_MIN_INCREMENT: usize = 4 * 1024;

/// Sizing knobs for a [`Heap`](crate::Heap).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HeapConfig {
  /// Total bytes of the byte store. Never grows.
  pub capacity: usize,
  /// Lower bound on how far a single growth moves the break. `0` means every
  /// growth carves exactly the header plus the aligned request.
  pub min_increment: usize,
}

impl Default for HeapConfig {
  fn default() -> Self {
    Self {
      capacity: DEFAULT_CAPACITY,
      min_increment: DEFAULT_MIN_INCREMENT,
    }
  }
}

impl HeapConfig {
  #[must_use]
  pub fn with_capacity(
    mut self,
    capacity: usize,
  ) -> Self {
    self.capacity = capacity;
    self
  }

  #[must_use]
  pub fn with_min_increment(
    mut self,
    min_increment: usize,
  ) -> Self {
    self.min_increment = min_increment;
    self
  }

  /// Checks that both sizes keep every block boundary 8-byte aligned.
  pub fn validate(&self) -> Result<(), HeapError> {
    if self.capacity == 0 || self.capacity % ALIGNMENT != 0 {
      return Err(HeapError::InvalidCapacity {
        capacity: self.capacity,
      });
    }

    if self.min_increment % ALIGNMENT != 0 {
      return Err(HeapError::InvalidMinIncrement {
        min_increment: self.min_increment,
      });
    }

    Ok(())
  }
}
