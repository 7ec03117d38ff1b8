//! Four-phase randomized workload: fill, punch holes, refill, drain.

use std::{io::Write, ptr::NonNull, slice};

use rand::{Rng, SeedableRng, rngs::StdRng};
use tracing::{info, warn};

use super::HarnessError;
use crate::{Heap, HeapStats};

pub const DEFAULT_ALLOCS: usize = 100;
pub const MAX_ALLOCS: usize = 1000;
pub const MIN_BLOCK_SIZE: usize = 16;
pub const MAX_BLOCK_SIZE: usize = 4096;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RandomPlan {
  pub num_allocs: usize,
  /// Fixed seed for a reproducible run; `None` draws one from the OS.
  pub seed: Option<u64>,
}

impl Default for RandomPlan {
  fn default() -> Self {
    Self {
      num_allocs: DEFAULT_ALLOCS,
      seed: None,
    }
  }
}

impl RandomPlan {
  pub fn validate(&self) -> Result<(), HarnessError> {
    if self.num_allocs > MAX_ALLOCS {
      return Err(HarnessError::TooManyAllocations {
        requested: self.num_allocs,
        max: MAX_ALLOCS,
      });
    }
    Ok(())
  }
}

/// Heap state after each phase plus what the phases did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RandomReport {
  pub phases: [HeapStats; 4],
  /// Blocks actually released in phase 2; repeated draws are skipped.
  pub released: usize,
  pub reallocated: usize,
  pub failed_reallocations: usize,
}

struct Slot {
  address: NonNull<u8>,
  size: usize,
  pattern: u8,
}

impl Slot {
  fn fill(
    address: NonNull<u8>,
    size: usize,
    index: usize,
  ) -> Self {
    let pattern = (index % 256) as u8;
    unsafe { address.write_bytes(pattern, size) };
    Self {
      address,
      size,
      pattern,
    }
  }

  fn release(
    self,
    heap: &mut Heap,
    index: usize,
  ) -> Result<(), HarnessError> {
    let bytes = unsafe { slice::from_raw_parts(self.address.as_ptr(), self.size) };
    if bytes.iter().any(|&byte| byte != self.pattern) {
      return Err(HarnessError::Corrupted {
        index,
        address: self.address.as_ptr() as usize,
      });
    }

    unsafe { heap.release(Some(self.address)) };
    Ok(())
  }
}

fn random_size(rng: &mut StdRng) -> usize {
  rng.gen_range(MIN_BLOCK_SIZE..MAX_BLOCK_SIZE)
}

fn print_stats<W: Write>(
  out: &mut W,
  stats: &HeapStats,
) -> Result<(), HarnessError> {
  writeln!(out, "\n{stats}\n")?;
  Ok(())
}

pub fn run<W: Write>(
  heap: &mut Heap,
  plan: &RandomPlan,
  out: &mut W,
) -> Result<RandomReport, HarnessError> {
  plan.validate()?;

  let mut rng = match plan.seed {
    Some(seed) => StdRng::seed_from_u64(seed),
    None => StdRng::from_entropy(),
  };
  let num_allocs = plan.num_allocs;

  writeln!(out, "=== Random Allocation Test ===")?;
  writeln!(out, "Performing {num_allocs} random allocations\n")?;

  writeln!(out, "Phase 1: Allocating blocks with random sizes...")?;
  let mut slots: Vec<Option<Slot>> = Vec::with_capacity(num_allocs);
  for index in 0..num_allocs {
    let size = random_size(&mut rng);
    let address = heap
      .allocate(size)
      .ok_or(HarnessError::AllocationFailed { index, size })?;
    slots.push(Some(Slot::fill(address, size, index)));
  }
  writeln!(out, "All allocations successful!")?;
  let allocated = heap.report();
  print_stats(out, &allocated)?;

  writeln!(out, "Phase 2: Freeing random blocks...")?;
  let num_to_free = num_allocs / 2;
  let mut released = 0;
  for _ in 0..num_to_free {
    let index = rng.gen_range(0..num_allocs);
    if let Some(slot) = slots[index].take() {
      slot.release(heap, index)?;
      released += 1;
    }
  }
  writeln!(out, "Freed approximately {num_to_free} blocks")?;
  let punched = heap.report();
  print_stats(out, &punched)?;

  writeln!(out, "Phase 3: Allocating more blocks to test reuse...")?;
  let mut reallocated = 0;
  let mut failed_reallocations = 0;
  for (index, slot) in slots.iter_mut().enumerate() {
    if slot.is_some() {
      continue;
    }
    let size = random_size(&mut rng);
    match heap.allocate(size) {
      Some(address) => {
        *slot = Some(Slot::fill(address, size, index));
        reallocated += 1;
      }
      None => {
        warn!(index, size, "reallocation failed");
        failed_reallocations += 1;
      }
    }
  }
  let refilled = heap.report();
  print_stats(out, &refilled)?;

  writeln!(out, "Phase 4: Freeing all remaining blocks...")?;
  for (index, slot) in slots.iter_mut().enumerate() {
    if let Some(slot) = slot.take() {
      slot.release(heap, index)?;
    }
  }
  let drained = heap.report();
  print_stats(out, &drained)?;

  writeln!(out, "Test completed successfully!")?;

  info!(
    num_allocs,
    released, reallocated, failed_reallocations, "random workload finished"
  );

  Ok(RandomReport {
    phases: [allocated, punched, refilled, drained],
    released,
    reallocated,
    failed_reallocations,
  })
}
