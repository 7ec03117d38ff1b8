//! Workload drivers that exercise a [`Heap`](crate::Heap) the way the
//! bundled binaries do.
//!
//! Both drivers only use `allocate`, `release` and `report`, and write their
//! narration to any [`std::io::Write`] so that tests can capture it.

use std::{error::Error as _, io};

use thiserror::Error;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::error::HeapError;

pub mod random;
pub mod sequential;

/// Environment variable holding the log filter for the harness binaries.
pub const LOG_ENV: &str = "BRKHEAP_LOG";

#[derive(Error, Debug)]
pub enum HarnessError {
  #[error("num-allocs {requested} > {max}")]
  TooManyAllocations { requested: usize, max: usize },

  #[error("free-max {free_max} > num-allocs {num_allocs}")]
  FreeRangeOutOfBounds { free_max: usize, num_allocs: usize },

  #[error("expected at most 3 optional arguments (step, min, max), got {given}")]
  TooManyArguments { given: usize },

  #[error("free-min must be at least 1")]
  InvalidFreeStart,

  #[error("free step must be at least 1")]
  InvalidFreeStep,

  #[error("allocation {index} of {size} bytes returned null")]
  AllocationFailed { index: usize, size: usize },

  #[error("block {index} at {address:#x} no longer holds its fill pattern")]
  Corrupted { index: usize, address: usize },

  #[error("failed to set up the heap")]
  Heap(#[from] HeapError),

  #[error("failed to write the report")]
  Io(#[from] io::Error),
}

/// Initialize tracing from the `BRKHEAP_LOG` environment variable.
///
/// Defaults to "warn". Logs go to stderr so reports on stdout stay readable.
pub fn init_tracing() {
  tracing_subscriber::registry()
    .with(
      tracing_subscriber::EnvFilter::try_from_env(LOG_ENV)
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
    )
    .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
    .init();
}

/// Renders `err` followed by one `caused by:` line per source.
pub fn render_error(err: &HarnessError) -> String {
  let mut rendered = format!("error: {err}");

  let mut source = err.source();
  while let Some(cause) = source {
    rendered.push_str("\n  caused by: ");
    rendered.push_str(&cause.to_string());
    source = cause.source();
  }

  rendered
}
