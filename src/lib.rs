//! # linalloc - A Linear Arena Allocator
//!
//! This crate provides a **linear allocator** (also known as a bump-pointer or
//! arena allocator) that carves aligned regions out of one contiguous,
//! pre-reserved block of memory.
//!
//! ## Overview
//!
//! ```text
//!   Linear Allocator Concept:
//!
//!   ┌──────────────────────────────────────────────────────────────────────┐
//!   │                         ARENA BLOCK                                  │
//!   │                                                                      │
//!   │   ┌─────┬──┬─────┬─────┬──────────────────────────────────────────┐  │
//!   │   │ A1  │░░│ A2  │ A3  │              Free Space                  │  │
//!   │   └─────┴──┴─────┴─────┴──────────────────────────────────────────┘  │
//!   │   ▲        ▲     ▲     ▲                                          ▲  │
//!   │   │        │     │     │                                          │  │
//!   │ buffer  padding last  used                                 capacity  │
//!   │                 offset                                               │
//!   └──────────────────────────────────────────────────────────────────────┘
//!
//!   Each allocation moves `used` forward past its padding and payload.
//!   Fast allocation: O(1) - just move the cursor.
//!   Reset: O(1) - move the cursor back to the start.
//! ```
//!
//! ## Crate Structure
//!
//! ```text
//!   linalloc
//!   ├── align      - Alignment math (align_to!, align_up, padding_for)
//!   ├── arena      - Arena: factories, allocation, resize, reset, release
//!   ├── config     - ArenaConfig (zero-on-alloc)
//!   ├── error      - AllocError
//!   └── savepoint  - Savepoint: scoped rollback of the arena cursor
//! ```
//!
//! ## Quick Start
//!
//! ```rust
//! use linalloc::{AllocError, Arena};
//!
//! let mut arena = Arena::create(1024)?;
//!
//! let values = arena.allocate::<u32>(5)?;
//! unsafe {
//!   for i in 0..5 {
//!     values.add(i).write(i as u32 * 10);
//!   }
//! }
//! assert_eq!(arena.used(), 20);
//!
//! // Grow the most recent allocation without copying.
//! let values = unsafe { arena.resize(values, 5, 8)? };
//! assert_eq!(arena.used(), 32);
//!
//! {
//!   let mut scratch = arena.savepoint();
//!   scratch.allocate_bytes(256, 16)?;
//! }
//! assert_eq!(arena.used(), 32);
//!
//! assert_eq!(arena.allocate_bytes(8, 3).unwrap_err(), AllocError::InvalidAlignment);
//!
//! arena.reset();
//! assert_eq!(arena.used(), 0);
//! # let _ = values;
//! # Ok::<(), AllocError>(())
//! ```
//!
//! ## Ownership
//!
//! ```text
//!   Arena::create(size)                  Arena::create_from_buffer(ptr, size)
//!   ┌──────────────────────┐             ┌──────────────────────┐
//!   │ posix_memalign(size) │             │ caller's buffer      │
//!   │ owns_memory = true   │             │ owns_memory = false  │
//!   └──────────┬───────────┘             └──────────┬───────────┘
//!              │ release() / drop                   │ release() / drop
//!              ▼                                    ▼
//!        free(buffer)                         buffer untouched
//! ```
//!
//! ## Limitations
//!
//! - **Single-threaded only**: No synchronization primitives
//! - **No individual frees**: Memory comes back only through reset, a savepoint or release
//! - **No growth**: The block never grows; a full arena reports `OutOfMemory`
//! - **Unix-only**: Requires `libc` and `posix_memalign` (POSIX systems)
//!
//! ## Safety
//!
//! Allocation hands out raw pointers. Writing through them, wrapping a foreign
//! buffer, and resizing a previous allocation all require `unsafe` blocks.

pub mod align;
mod arena;
mod config;
mod error;
mod savepoint;

pub use align::MAX_ALIGN;
pub use arena::Arena;
pub use config::ArenaConfig;
pub use error::{AllocError, Result};
pub use savepoint::Savepoint;
