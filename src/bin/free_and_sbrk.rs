use std::{io, process};

use argh::FromArgs;
use brkheap::{
  Heap, HeapConfig,
  config::{DEFAULT_CAPACITY, DEFAULT_MIN_INCREMENT},
  harness::{
    self, HarnessError,
    sequential::{self, SequentialPlan},
  },
};

/// Allocate num-allocs blocks of block-size bytes, then free blocks min..=max
/// in steps of step and print the heap statistics before and after.
#[derive(Debug, FromArgs)]
struct Args {
  /// number of blocks to allocate
  #[argh(positional)]
  num_allocs: usize,
  /// size of every block in bytes
  #[argh(positional)]
  block_size: usize,
  /// optional step, first and last block to free, 1-based (defaults 1, 1,
  /// num-allocs)
  #[argh(positional)]
  free_range: Vec<usize>,
  /// byte store capacity in bytes
  #[argh(option, default = "DEFAULT_CAPACITY")]
  heap_size: usize,
  /// minimum break advance per growth in bytes
  #[argh(option, default = "DEFAULT_MIN_INCREMENT")]
  min_increment: usize,
}

fn main() {
  harness::init_tracing();
  let args: Args = argh::from_env();

  if let Err(err) = run(&args) {
    eprintln!("{}", harness::render_error(&err));
    process::exit(1);
  }
}

fn run(args: &Args) -> Result<(), HarnessError> {
  let plan = SequentialPlan::from_args(args.num_allocs, args.block_size, &args.free_range)?;
  let config = HeapConfig::default()
    .with_capacity(args.heap_size)
    .with_min_increment(args.min_increment);

  let mut heap = Heap::with_config(config)?;
  sequential::run(&mut heap, &plan, &mut io::stdout().lock())?;

  Ok(())
}
