use std::{io, ptr, ptr::NonNull};

use libc::{MAP_ANONYMOUS, MAP_FAILED, MAP_PRIVATE, PROT_READ, PROT_WRITE, c_void, mmap, munmap};
use tracing::debug;

use crate::error::HeapError;

/// Fixed-capacity byte store with a private program break.
///
/// The store is a private anonymous mapping, so it starts zero-filled and
/// page aligned. `[base, base + brk)` is the committed prefix; the rest has
/// never been handed out (or was handed back).
pub struct Arena {
  base: NonNull<u8>,
  capacity: usize,
  brk: usize,
}

impl Arena {
  pub fn map(capacity: usize) -> Result<Self, HeapError> {
    let address = unsafe {
      mmap(
        ptr::null_mut(),
        capacity,
        PROT_READ | PROT_WRITE,
        MAP_PRIVATE | MAP_ANONYMOUS,
        -1,
        0,
      )
    };

    if address == MAP_FAILED {
      return Err(HeapError::Map {
        capacity,
        source: io::Error::last_os_error(),
      });
    }

    let base = NonNull::new(address.cast::<u8>()).ok_or_else(|| HeapError::Map {
      capacity,
      source: io::Error::other("mapping placed at the null address"),
    })?;

    debug!(base = ?base, capacity, "arena mapped");

    Ok(Self {
      base,
      capacity,
      brk: 0,
    })
  }

  pub fn base(&self) -> NonNull<u8> {
    self.base
  }

  pub fn capacity(&self) -> usize {
    self.capacity
  }

  /// Bytes committed so far, `break - base`.
  pub fn used(&self) -> usize {
    self.brk
  }

  /// Current break address.
  pub fn brk(&self) -> NonNull<u8> {
    unsafe { self.base.add(self.brk) }
  }

  /// Moves the break forward by `increment` and returns the old break, like
  /// `sbrk(increment)`. Returns `None`, leaving the break untouched, when the
  /// store cannot hold that many more bytes.
  pub fn extend(
    &mut self,
    increment: usize,
  ) -> Option<NonNull<u8>> {
    if increment > self.capacity - self.brk {
      return None;
    }

    let previous = self.brk();
    self.brk += increment;
    Some(previous)
  }

  /// Moves the break back by `decrement`.
  pub fn retract(
    &mut self,
    decrement: usize,
  ) {
    assert!(decrement <= self.brk, "break retracted below the arena base");
    self.brk -= decrement;
  }

  /// Whether `address` lies inside the committed prefix.
  pub fn is_committed(
    &self,
    address: *const u8,
  ) -> bool {
    let start = self.base.as_ptr() as usize;
    let address = address as usize;
    address >= start && address < start + self.brk
  }
}

impl Drop for Arena {
  fn drop(&mut self) {
    let result = unsafe { munmap(self.base.as_ptr().cast::<c_void>(), self.capacity) };
    if result != 0 {
      debug!(
        base = ?self.base,
        error = %io::Error::last_os_error(),
        "failed to unmap arena"
      );
    } else {
      debug!(base = ?self.base, capacity = self.capacity, "arena unmapped");
    }
  }
}
