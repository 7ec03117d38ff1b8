//! Allocate a run of equally sized blocks, then release a strided slice of
//! them and compare the two reports.

use std::{io::Write, ptr::NonNull};

use tracing::info;

use super::HarnessError;
use crate::{Heap, HeapStats};

/// Upper bound on `num_allocs`.
pub const MAX_ALLOCS: usize = 1_000_000;

/// What to allocate and which of those blocks to release afterwards.
///
/// `free_min` and `free_max` are 1-based and inclusive, so the released
/// indices are `free_min - 1, free_min - 1 + free_step, ...` while `< free_max`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SequentialPlan {
  pub num_allocs: usize,
  pub block_size: usize,
  pub free_step: usize,
  pub free_min: usize,
  pub free_max: usize,
}

impl SequentialPlan {
  /// Releases every block, in allocation order.
  pub fn new(
    num_allocs: usize,
    block_size: usize,
  ) -> Self {
    Self {
      num_allocs,
      block_size,
      free_step: 1,
      free_min: 1,
      free_max: num_allocs,
    }
  }

  /// Builds a plan from the optional trailing `[step [min [max]]]` values,
  /// falling back to the defaults of [`SequentialPlan::new`].
  pub fn from_args(
    num_allocs: usize,
    block_size: usize,
    rest: &[usize],
  ) -> Result<Self, HarnessError> {
    if rest.len() > 3 {
      return Err(HarnessError::TooManyArguments { given: rest.len() });
    }

    let defaults = Self::new(num_allocs, block_size);
    Ok(Self {
      free_step: rest.first().copied().unwrap_or(defaults.free_step),
      free_min: rest.get(1).copied().unwrap_or(defaults.free_min),
      free_max: rest.get(2).copied().unwrap_or(defaults.free_max),
      ..defaults
    })
  }

  pub fn validate(&self) -> Result<(), HarnessError> {
    if self.num_allocs > MAX_ALLOCS {
      return Err(HarnessError::TooManyAllocations {
        requested: self.num_allocs,
        max: MAX_ALLOCS,
      });
    }
    if self.free_max > self.num_allocs {
      return Err(HarnessError::FreeRangeOutOfBounds {
        free_max: self.free_max,
        num_allocs: self.num_allocs,
      });
    }
    if self.free_min == 0 {
      return Err(HarnessError::InvalidFreeStart);
    }
    if self.free_step == 0 {
      return Err(HarnessError::InvalidFreeStep);
    }
    Ok(())
  }
}

/// Heap state captured around the release pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SequentialReport {
  pub after_allocation: HeapStats,
  pub after_release: HeapStats,
  pub released: usize,
}

pub fn run<W: Write>(
  heap: &mut Heap,
  plan: &SequentialPlan,
  out: &mut W,
) -> Result<SequentialReport, HarnessError> {
  plan.validate()?;

  writeln!(out, "Allocating {}*{} bytes", plan.num_allocs, plan.block_size)?;

  let mut addresses: Vec<NonNull<u8>> = Vec::with_capacity(plan.num_allocs);
  for index in 0..plan.num_allocs {
    let address = heap
      .allocate(plan.block_size)
      .ok_or(HarnessError::AllocationFailed {
        index,
        size: plan.block_size,
      })?;
    addresses.push(address);
  }

  let after_allocation = heap.report();
  writeln!(out, "\n{after_allocation}\n")?;

  writeln!(
    out,
    "Freeing blocks from {} to {} in steps of {}",
    plan.free_min, plan.free_max, plan.free_step
  )?;

  let mut released = 0;
  for index in (plan.free_min - 1..plan.free_max).step_by(plan.free_step) {
    unsafe { heap.release(Some(addresses[index])) };
    released += 1;
  }

  let after_release = heap.report();
  writeln!(out, "\n{after_release}\n")?;

  info!(
    num_allocs = plan.num_allocs,
    released,
    blocks = after_release.blocks,
    "sequential workload finished"
  );

  Ok(SequentialReport {
    after_allocation,
    after_release,
    released,
  })
}
