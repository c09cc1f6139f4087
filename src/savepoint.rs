use std::ops::{Deref, DerefMut};

use log::debug;

use crate::arena::Arena;

/// Snapshot of an arena's cursor that rolls it back when ended or dropped.
///
/// ```text
///   begin()                                    end() / drop
///     │                                            │
///     ▼                                            ▼
///   ┌────┬────┬──────────────────────────┐      ┌────┬────┬──────────────────────────┐
///   │ A1 │ A2 │ tmp │ tmp │ tmp │  free  │  ──► │ A1 │ A2 │          free            │
///   └────┴────┴──────────────────────────┘      └────┴────┴──────────────────────────┘
///             ▲ captured used                             ▲ used restored
/// ```
///
/// The handle mutably borrows the arena, so scratch allocations go through it
/// (it dereferences to [`Arena`]) and it cannot outlive the arena. A nested
/// savepoint is begun on the outer handle, which forces the inner one to end
/// first.
///
/// ```rust
/// use linalloc::{Arena, Savepoint};
///
/// let mut arena = Arena::create(256).unwrap();
/// arena.allocate::<u32>(1).unwrap();
///
/// {
///   let mut scratch = Savepoint::begin(&mut arena);
///   scratch.allocate::<f32>(16).unwrap();
///   assert_eq!(scratch.used(), 68);
/// }
///
/// assert_eq!(arena.used(), 4);
/// ```
#[derive(Debug)]
pub struct Savepoint<'a> {
  arena: &'a mut Arena,
  buffer: *const u8,
  used: usize,
  last_offset: usize,
  active: bool,
}

impl<'a> Savepoint<'a> {
  /// Captures the arena's `used` and `last_offset`.
  pub fn begin(arena: &'a mut Arena) -> Self {
    let buffer = arena.as_ptr();
    let used = arena.used();
    let last_offset = arena.last_offset();

    Self {
      arena,
      buffer,
      used,
      last_offset,
      active: true,
    }
  }

  /// Restores both captured cursors. Only the first call has an effect.
  ///
  /// If the arena behind the handle no longer has the block seen at
  /// [`Savepoint::begin`] (it was replaced through the handle), nothing is
  /// restored.
  pub fn end(&mut self) {
    if !self.active {
      return;
    }

    self.active = false;

    debug_assert!(
      !self.arena.is_released(),
      "savepoint ended after its arena was released"
    );

    if self.arena.is_released() {
      return;
    }

    debug!(
      "savepoint end: used {} -> {}, last_offset {} -> {}",
      self.arena.used(),
      self.used,
      self.arena.last_offset(),
      self.last_offset
    );

    self.arena.rewind(self.buffer, self.used, self.last_offset);
  }

  pub fn is_active(&self) -> bool {
    self.active
  }

  pub fn captured_used(&self) -> usize {
    self.used
  }

  pub fn captured_last_offset(&self) -> usize {
    self.last_offset
  }
}

impl Deref for Savepoint<'_> {
  type Target = Arena;

  fn deref(&self) -> &Arena {
    self.arena
  }
}

impl DerefMut for Savepoint<'_> {
  fn deref_mut(&mut self) -> &mut Arena {
    self.arena
  }
}

impl Drop for Savepoint<'_> {
  fn drop(&mut self) {
    self.end();
  }
}
