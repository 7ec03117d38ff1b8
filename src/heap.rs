use std::ptr::{self, NonNull};

use tracing::{debug, trace};

use crate::{
  align::align,
  arena::Arena,
  block::{Block, Blocks, HEADER_SIZE},
  config::HeapConfig,
  error::HeapError,
  stats::HeapStats,
};

/// First-fit heap over a private, fixed-capacity arena.
///
/// Blocks are never split and only the trailing run of free blocks is ever
/// handed back to the arena; a free block in the middle of the registry stays
/// there until a request small enough to fit it comes along.
///
/// The heap is neither `Send` nor `Sync`. Dropping it unmaps the arena, after
/// which every address it handed out dangles.
pub struct Heap {
  arena: Arena,
  min_increment: usize,
  first: *mut Block,
  last: *mut Block,
}

impl Heap {
  /// Creates a heap with the default 100 MiB arena and 4 KiB minimum growth.
  pub fn new() -> Result<Self, HeapError> {
    Self::with_config(HeapConfig::default())
  }

  pub fn with_config(config: HeapConfig) -> Result<Self, HeapError> {
    config.validate()?;
    let arena = Arena::map(config.capacity)?;

    Ok(Self {
      arena,
      min_increment: config.min_increment,
      first: ptr::null_mut(),
      last: ptr::null_mut(),
    })
  }

  pub fn base(&self) -> NonNull<u8> {
    self.arena.base()
  }

  pub fn brk(&self) -> NonNull<u8> {
    self.arena.brk()
  }

  pub fn capacity(&self) -> usize {
    self.arena.capacity()
  }

  pub fn used(&self) -> usize {
    self.arena.used()
  }

  pub fn min_increment(&self) -> usize {
    self.min_increment
  }

  /// Walks the registry in creation order.
  pub fn blocks(&self) -> Blocks<'_> {
    unsafe { Blocks::new(self.first) }
  }

  unsafe fn find_free_block(
    &self,
    size: usize,
  ) -> *mut Block {
    unsafe {
      let mut current: *mut Block = self.first;

      while !current.is_null() {
        if (*current).is_free && (*current).size >= size {
          return current;
        }
        current = (*current).next;
      }

      ptr::null_mut()
    }
  }

  /// Returns the address of at least `size` writable bytes, or `None` if
  /// `size` is zero or the arena cannot fit another block.
  ///
  /// The first free block large enough is reused as a whole, however much
  /// bigger than `size` it is.
  pub fn allocate(
    &mut self,
    size: usize,
  ) -> Option<NonNull<u8>> {
    if size == 0 {
      return None;
    }

    let size = align(size)?;

    unsafe {
      let free_block = self.find_free_block(size);

      if !free_block.is_null() {
        (*free_block).is_free = false;
        trace!(requested = size, payload_size = (*free_block).size, "reused free block");

        return Some(Block::payload(free_block));
      }

      let block = self.grow(size)?;
      Some(Block::payload(block))
    }
  }

  /// Carves a new allocated block at the break and appends it to the registry.
  unsafe fn grow(
    &mut self,
    size: usize,
  ) -> Option<*mut Block> {
    let total_size = HEADER_SIZE.checked_add(size)?;
    let increment = total_size.max(self.min_increment);

    let Some(address) = self.arena.extend(increment) else {
      debug!(
        requested = size,
        increment,
        used = self.arena.used(),
        capacity = self.arena.capacity(),
        "arena exhausted"
      );
      return None;
    };

    unsafe {
      let block = Block::write(address, increment - HEADER_SIZE);

      if self.first.is_null() {
        self.first = block;
        self.last = block;
      } else {
        (*self.last).next = block;
        self.last = block;
      }

      debug!(
        requested = size,
        payload_size = (*block).size,
        used = self.arena.used(),
        "heap grown"
      );

      Some(block)
    }
  }

  /// Marks the block behind `address` free, then hands any trailing run of
  /// free blocks back to the arena. `None` is ignored.
  ///
  /// # Safety
  ///
  /// `address` must be `None` or a value returned by [`allocate`] on this
  /// heap that has not been released since. Debug builds catch addresses
  /// outside the committed arena and releasing the same block twice.
  ///
  /// [`allocate`]: Self::allocate
  pub unsafe fn release(
    &mut self,
    address: Option<NonNull<u8>>,
  ) {
    let Some(address) = address else {
      return;
    };

    unsafe {
      let block = Block::from_payload(address);
      debug_assert!(
        self.arena.is_committed(block.cast::<u8>()),
        "released {address:p}, which this heap never handed out"
      );
      debug_assert!(!(*block).is_free, "block at {address:p} released twice");

      (*block).is_free = true;

      if block != self.last {
        trace!(address = ?address, payload_size = (*block).size, "interior block freed");
        return;
      }

      self.shrink();
    }
  }

  /// Unlinks free blocks from the tail and retracts the break past them.
  unsafe fn shrink(&mut self) {
    unsafe {
      while !self.last.is_null() && (*self.last).is_free {
        let tail = self.last;
        let footprint = (*tail).footprint();

        if self.first == tail {
          self.first = ptr::null_mut();
          self.last = ptr::null_mut();
        } else {
          let mut current: *mut Block = self.first;
          while (*current).next != tail {
            current = (*current).next;
          }
          (*current).next = ptr::null_mut();
          self.last = current;
        }

        self.arena.retract(footprint);
        debug_assert_eq!(self.arena.brk().as_ptr(), tail.cast::<u8>());

        debug!(
          payload_size = footprint - HEADER_SIZE,
          used = self.arena.used(),
          "tail block reclaimed"
        );
      }
    }
  }

  /// Summarizes the registry. Has no side effects.
  pub fn report(&self) -> HeapStats {
    let mut stats = HeapStats {
      base: self.base().as_ptr() as usize,
      brk: self.brk().as_ptr() as usize,
      used: self.used(),
      ..HeapStats::default()
    };

    for block in self.blocks() {
      stats.blocks += 1;
      if block.is_free {
        stats.free += block.payload_size;
      } else {
        stats.allocated += block.payload_size;
      }
    }

    stats
  }
}
