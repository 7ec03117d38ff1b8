use std::{io, process};

use argh::FromArgs;
use brkheap::{
  Heap, HeapConfig,
  config::{DEFAULT_CAPACITY, DEFAULT_MIN_INCREMENT},
  harness::{
    self, HarnessError,
    random::{self, DEFAULT_ALLOCS, RandomPlan},
  },
};

/// Allocate blocks of random size, free about half, refill the holes, then
/// free everything, printing the heap statistics after every phase.
#[derive(Debug, FromArgs)]
struct Args {
  /// number of blocks to allocate (default 100, at most 1000)
  #[argh(positional)]
  num_allocs: Option<usize>,
  /// seed for the block sizes and release order
  #[argh(option)]
  seed: Option<u64>,
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
  let plan = RandomPlan {
    num_allocs: args.num_allocs.unwrap_or(DEFAULT_ALLOCS),
    seed: args.seed,
  };
  let config = HeapConfig::default()
    .with_capacity(args.heap_size)
    .with_min_increment(args.min_increment);

  let mut heap = Heap::with_config(config)?;
  random::run(&mut heap, &plan, &mut io::stdout().lock())?;

  Ok(())
}
