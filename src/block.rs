use std::{marker::PhantomData, mem, ptr, ptr::NonNull};

/// Descriptor written in front of every payload carved from the arena.
///
/// Descriptors are chained in creation order, which is also address order:
/// each one is carved at the break pointer and the break only grows past it.
#[repr(C, align(8))]
pub struct Block {
  pub size: usize,
  pub is_free: bool,
  pub next: *mut Block,
}

/// Bytes occupied by a [`Block`] in front of its payload.
pub const HEADER_SIZE: usize = mem::size_of::<Block>();
const _: () = assert!(HEADER_SIZE % crate::align::ALIGNMENT == 0);
const _: () = assert!(mem::align_of::<Block>() <= crate::align::ALIGNMENT);

impl Block {
  pub fn new(
    size: usize,
    is_free: bool,
    next: *mut Block,
  ) -> Self {
    Self { size, is_free, next }
  }

  /// Writes an allocated, unlinked descriptor at `at` and returns it.
  ///
  /// # Safety
  ///
  /// `at..at + HEADER_SIZE + size` must be committed arena memory owned by
  /// no other descriptor, and `at` must be aligned for `Block`.
  pub unsafe fn write(
    at: NonNull<u8>,
    size: usize,
  ) -> *mut Block {
    let block = at.as_ptr().cast::<Block>();
    unsafe { block.write(Block::new(size, false, ptr::null_mut())) };
    block
  }

  /// Address handed out to the requester for this descriptor.
  ///
  /// # Safety
  ///
  /// `block` must point to a live descriptor.
  pub unsafe fn payload(block: *mut Block) -> NonNull<u8> {
    unsafe { NonNull::new_unchecked(block.cast::<u8>().add(HEADER_SIZE)) }
  }

  /// Recovers the descriptor sitting right before a payload address.
  ///
  /// # Safety
  ///
  /// `address` must have been produced by [`Block::payload`].
  pub unsafe fn from_payload(address: NonNull<u8>) -> *mut Block {
    unsafe { address.as_ptr().sub(HEADER_SIZE).cast::<Block>() }
  }

  /// Header plus payload, i.e. how far the break moved to create it.
  pub fn footprint(&self) -> usize {
    HEADER_SIZE + self.size
  }
}

/// Snapshot of one registered block, as seen by [`Blocks`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlockInfo {
  /// Payload address, the value `allocate` returned for this block.
  pub address: NonNull<u8>,
  pub payload_size: usize,
  pub is_free: bool,
}

/// Iterator over the registry in creation order.
pub struct Blocks<'a> {
  current: *const Block,
  _heap: PhantomData<&'a Block>,
}

impl<'a> Blocks<'a> {
  /// # Safety
  ///
  /// Every descriptor reachable from `first` must stay alive and unmodified
  /// for `'a`.
  pub(crate) unsafe fn new(first: *const Block) -> Self {
    Self {
      current: first,
      _heap: PhantomData,
    }
  }
}

impl Iterator for Blocks<'_> {
  type Item = BlockInfo;

  fn next(&mut self) -> Option<Self::Item> {
    if self.current.is_null() {
      return None;
    }

    unsafe {
      let block = &*self.current;
      let info = BlockInfo {
        address: Block::payload(self.current.cast_mut()),
        payload_size: block.size,
        is_free: block.is_free,
      };
      self.current = block.next;
      Some(info)
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[repr(C, align(16))]
  struct Backing([u8; 256]);

  #[test]
  fn test_header_round_trip() {
    let mut backing = Backing([0; 256]);
    let at = NonNull::new(backing.0.as_mut_ptr()).unwrap();

    unsafe {
      let block = Block::write(at, 64);
      assert_eq!((*block).size, 64);
      assert!(!(*block).is_free);
      assert!((*block).next.is_null());
      assert_eq!((*block).footprint(), HEADER_SIZE + 64);

      let payload = Block::payload(block);
      assert_eq!(payload.as_ptr() as usize - at.as_ptr() as usize, HEADER_SIZE);
      assert_eq!(Block::from_payload(payload), block);
    }
  }

  #[test]
  fn test_blocks_follow_links() {
    let mut backing = Backing([0; 256]);
    let base = backing.0.as_mut_ptr();

    unsafe {
      let first = Block::write(NonNull::new(base).unwrap(), 16);
      let second_at = NonNull::new(base.add((*first).footprint())).unwrap();
      let second = Block::write(second_at, 32);
      (*first).next = second;
      (*second).is_free = true;

      let infos: Vec<_> = Blocks::new(first).collect();
      assert_eq!(infos.len(), 2);
      assert_eq!(infos[0].address, Block::payload(first));
      assert_eq!(infos[0].payload_size, 16);
      assert!(!infos[0].is_free);
      assert_eq!(infos[1].address, Block::payload(second));
      assert_eq!(infos[1].payload_size, 32);
      assert!(infos[1].is_free);
    }
  }

  #[test]
  fn test_header_keeps_payloads_aligned() {
    assert_eq!(mem::align_of::<Block>(), 8);
    assert_eq!(HEADER_SIZE % 8, 0);
    assert!(HEADER_SIZE >= 2 * mem::size_of::<usize>() + 1);
  }

  #[test]
  fn test_blocks_empty() {
    let mut blocks = unsafe { Blocks::new(ptr::null()) };
    assert!(blocks.next().is_none());
  }
}
