//! # brkheap - A First-Fit Heap Over a Private Break
//!
//! This crate provides a small **first-fit heap manager** that carves blocks
//! out of a fixed-capacity byte store by moving a private program break, the
//! same way a classic `sbrk`-based `malloc` grows the data segment.
//!
//! ## Overview
//!
//! ```text
//!   Byte Store:
//!
//!   ┌──────────────────────────────────────────────────────────────────────┐
//!   │                                                                      │
//!   │   ┌────┬──────┬────┬──────┬────┬──────┬─────────────────────────────┐│
//!   │   │ H1 │ used │ H2 │ free │ H3 │ used │        uncommitted          ││
//!   │   └────┴──────┴────┴──────┴────┴──────┴─────────────────────────────┘│
//!   │   ▲                                   ▲                             ▲│
//!   │   │                                   │                             ││
//!   │  base                               break                  base + C  │
//!   │                                                                      │
//!   └──────────────────────────────────────────────────────────────────────┘
//!
//!   H1 -> H2 -> H3 : registry, in creation order (= address order)
//! ```
//!
//! - **allocate** scans the registry for the first free block whose payload
//!   is large enough and hands it out whole. If there is none, a new block is
//!   carved at the break, which moves by at least the configured minimum
//!   increment (4 KiB by default).
//! - **release** marks the block free. If it is the last block, every free
//!   block at the end of the registry is unlinked and the break moves back.
//! - **report** summarizes the registry without changing anything.
//!
//! ## Crate Structure
//!
//! ```text
//!   brkheap
//!   ├── align      - 8-byte size rounding (align!, align)
//!   ├── arena      - mmap-backed byte store and its break (internal)
//!   ├── block      - Block header and registry iterator
//!   ├── config     - HeapConfig
//!   ├── error      - HeapError
//!   ├── heap       - Heap: allocate / release / report
//!   ├── stats      - HeapStats
//!   └── harness    - sequential and randomized workloads
//! ```
//!
//! ## Quick Start
//!
//! ```rust
//! use brkheap::Heap;
//!
//! let mut heap = Heap::new().unwrap();
//!
//! let ptr = heap.allocate(8).unwrap().cast::<u64>();
//! unsafe {
//!     ptr.write(42);
//!     assert_eq!(ptr.read(), 42);
//!
//!     heap.release(Some(ptr.cast()));
//! }
//!
//! assert_eq!(heap.report().blocks, 0);
//! ```
//!
//! ## Block Layout
//!
//! ```text
//!   Single Block:
//!   ┌───────────────────────┬────────────────────────────────┐
//!   │    Block Header       │         Payload                │
//!   │  ┌─────────────────┐  │                                │
//!   │  │ size: N         │  │  ┌──────────────────────────┐  │
//!   │  │ is_free: bool   │  │  │                          │  │
//!   │  │ next: null/ptr  │  │  │  N bytes, multiple of 8  │  │
//!   │  └─────────────────┘  │  │                          │  │
//!   │      24 bytes         │  └──────────────────────────┘  │
//!   └───────────────────────┴────────────────────────────────┘
//!                           ▲
//!                           └── Pointer returned to user
//! ```
//!
//! ## Limitations
//!
//! - **Single-threaded only**: `Heap` is neither `Send` nor `Sync`
//! - **No splitting**: a reused block is handed out whole
//! - **Tail-only reclamation**: free blocks in the middle are never merged
//! - **Unix-only**: the byte store is an anonymous `mmap`
//!
//! ## Safety
//!
//! `release` is `unsafe`: passing an address this heap did not hand out, or
//! releasing one twice, is undefined behavior. Debug builds assert against
//! both.

pub mod align;
mod arena;
mod block;
pub mod config;
mod error;
pub mod harness;
mod heap;
mod stats;

pub use block::{BlockInfo, Blocks};
pub use config::HeapConfig;
pub use error::HeapError;
pub use heap::Heap;
pub use stats::HeapStats;
