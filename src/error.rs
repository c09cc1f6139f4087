use thiserror::Error;

/// Why an arena operation was refused.
///
/// A failed call never changes the arena's `used`, `last_offset` or `capacity`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Error)]
pub enum AllocError {
  /// Not enough capacity left, or a zero-size arena was requested.
  #[error("out of memory: not enough capacity left in the arena")]
  OutOfMemory,
  /// Alignment is not a positive power of two.
  #[error("invalid alignment: must be a positive power of two")]
  InvalidAlignment,
  /// The arena has no live buffer, or a null buffer was supplied.
  #[error("null pointer: arena has no backing buffer")]
  NullPointer,
  /// The system allocator refused to reserve the backing block.
  #[error("allocation failed: system allocator could not reserve the block")]
  AllocationFailed,
}

pub type Result<T> = std::result::Result<T, AllocError>;
