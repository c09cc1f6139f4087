use std::{mem, ptr};

use libc::c_void;
use log::{debug, trace};

use crate::{
  align::{self, MAX_ALIGN},
  config::ArenaConfig,
  error::{AllocError, Result},
  savepoint::Savepoint,
};

/// A linear allocator over one contiguous block.
///
/// ```text
///   buffer                          last_offset        used            capacity
///     │                                  │               │                 │
///     ▼                                  ▼               ▼                 ▼
///     ┌──────┬──┬──────────────────┬─────┬───────────────┬─────────────────┐
///     │  A1  │░░│        A2        │░░░░░│      A3       │   free space    │
///     └──────┴──┴──────────────────┴─────┴───────────────┴─────────────────┘
///                                    ▲
///                                    └── alignment padding
/// ```
///
/// The block is either reserved by [`Arena::create`] (owned, freed on release)
/// or supplied by the caller through [`Arena::create_from_buffer`] (borrowed,
/// never freed by the arena).
#[derive(Debug)]
pub struct Arena {
  buffer: *mut u8,
  capacity: usize,
  used: usize,
  last_offset: usize,
  owns_memory: bool,
  zero_on_alloc: bool,
}

impl Arena {
  /// Reserves `size` bytes from the system allocator with the default config.
  pub fn create(size: usize) -> Result<Self> {
    Self::create_with(size, ArenaConfig::default())
  }

  /// Reserves `size` bytes from the system allocator.
  ///
  /// The block is aligned to [`MAX_ALIGN`] and owned by the returned arena.
  pub fn create_with(
    size: usize,
    config: ArenaConfig,
  ) -> Result<Self> {
    if size == 0 {
      debug!("refusing to create a zero-size arena");
      return Err(AllocError::OutOfMemory);
    }

    let mut raw: *mut c_void = ptr::null_mut();
    let status = unsafe { libc::posix_memalign(&mut raw, MAX_ALIGN, size) };

    if status != 0 || raw.is_null() {
      debug!("posix_memalign({} bytes) failed with status {}", size, status);
      return Err(AllocError::AllocationFailed);
    }

    debug!("created owning arena: {} bytes at {:?}", size, raw);

    Ok(Self {
      buffer: raw as *mut u8,
      capacity: size,
      used: 0,
      last_offset: 0,
      owns_memory: true,
      zero_on_alloc: config.zero_on_alloc,
    })
  }

  /// Wraps a caller-supplied block with the default config.
  ///
  /// # Safety
  ///
  /// See [`Arena::create_from_buffer_with`].
  pub unsafe fn create_from_buffer(
    buffer: *mut u8,
    size: usize,
  ) -> Result<Self> {
    unsafe { Self::create_from_buffer_with(buffer, size, ArenaConfig::default()) }
  }

  /// Wraps a caller-supplied block. The arena never frees it.
  ///
  /// # Safety
  ///
  /// `buffer..buffer + size` must be valid for reads and writes, and must not be
  /// accessed through other pointers while the arena hands out regions from it,
  /// for as long as the arena is alive.
  pub unsafe fn create_from_buffer_with(
    buffer: *mut u8,
    size: usize,
    config: ArenaConfig,
  ) -> Result<Self> {
    if buffer.is_null() {
      return Err(AllocError::NullPointer);
    }

    if size == 0 {
      return Err(AllocError::OutOfMemory);
    }

    debug!("created borrowing arena: {} bytes at {:?}", size, buffer);

    Ok(Self {
      buffer,
      capacity: size,
      used: 0,
      last_offset: 0,
      owns_memory: false,
      zero_on_alloc: config.zero_on_alloc,
    })
  }

  /// Carves `size` bytes aligned to `alignment` off the front of the free space.
  ///
  /// Alignment is computed on the absolute address `buffer + used`, so the
  /// returned pointer satisfies `ptr % alignment == 0` whatever the block's own
  /// alignment. A zero-size request succeeds and returns the aligned cursor.
  ///
  /// On any error the arena is left untouched.
  pub fn allocate_bytes(
    &mut self,
    size: usize,
    alignment: usize,
  ) -> Result<*mut u8> {
    if !align::is_valid_alignment(alignment) {
      debug!("rejecting alignment {}", alignment);
      return Err(AllocError::InvalidAlignment);
    }

    if self.buffer.is_null() {
      return Err(AllocError::NullPointer);
    }

    let cursor = self.buffer as usize + self.used;
    let padding = align::padding_for(cursor, alignment).ok_or(AllocError::OutOfMemory)?;

    let offset = self.used.checked_add(padding).ok_or(AllocError::OutOfMemory)?;
    let end = offset.checked_add(size).ok_or(AllocError::OutOfMemory)?;

    if end > self.capacity {
      debug!(
        "out of memory: {} bytes (+{} padding) requested, {} of {} used",
        size, padding, self.used, self.capacity
      );
      return Err(AllocError::OutOfMemory);
    }

    self.last_offset = offset;
    self.used = end;

    let region = unsafe { self.buffer.add(offset) };

    if self.zero_on_alloc && size > 0 {
      unsafe { ptr::write_bytes(region, 0, size) };
    }

    trace!(
      "allocated {} bytes at offset {} (align {}, padding {}), used = {}",
      size, offset, alignment, padding, self.used
    );

    Ok(region)
  }

  /// Allocates room for a single `T` at its natural alignment.
  pub fn allocate_one<T>(&mut self) -> Result<*mut T> {
    self.allocate(1)
  }

  /// Allocates room for `count` values of `T` at `T`'s natural alignment.
  ///
  /// Nothing is constructed; with `zero_on_alloc` the bytes are zeroed,
  /// otherwise they hold whatever was there before. `count == 0` yields a
  /// null pointer and touches nothing.
  pub fn allocate<T>(
    &mut self,
    count: usize,
  ) -> Result<*mut T> {
    self.allocate_aligned(count, mem::align_of::<T>())
  }

  /// Like [`Arena::allocate`] with an explicit alignment.
  pub fn allocate_aligned<T>(
    &mut self,
    count: usize,
    alignment: usize,
  ) -> Result<*mut T> {
    if !align::is_valid_alignment(alignment) {
      return Err(AllocError::InvalidAlignment);
    }

    if count == 0 {
      return Ok(ptr::null_mut());
    }

    let size = count.checked_mul(mem::size_of::<T>()).ok_or(AllocError::OutOfMemory)?;

    self.allocate_bytes(size, alignment).map(|region| region.cast::<T>())
  }

  /// Resizes an allocation of `old_count` values of `T` to `new_count` values.
  ///
  /// # Safety
  ///
  /// See [`Arena::resize_aligned`].
  pub unsafe fn resize<T>(
    &mut self,
    old_ptr: *mut T,
    old_count: usize,
    new_count: usize,
  ) -> Result<*mut T> {
    unsafe { self.resize_aligned(old_ptr, old_count, new_count, mem::align_of::<T>()) }
  }

  /// Resizes an allocation of `old_count` values of `T` to `new_count` values.
  ///
  /// ```text
  ///   last allocation (in place):          older allocation (copy):
  ///
  ///   ┌────┬────────┬─────────┐            ┌────┬────────┬────┬────────────┐
  ///   │ A1 │   A2   │ → grow  │            │ A1 │   A2   │ A3 │  A1 copy   │
  ///   └────┴────────┴─────────┘            └────┴────────┴────┴────────────┘
  ///        ▲ same pointer                    ▲ wasted until reset
  /// ```
  ///
  /// When `old_ptr` is the most recent allocation the cursor is moved and the
  /// same pointer is returned; if that does not fit the result is
  /// [`AllocError::OutOfMemory`]. Otherwise a fresh region is allocated and the
  /// common prefix copied over. A null `old_ptr` or `old_count == 0` is a plain
  /// allocation.
  ///
  /// `alignment` is not checked against the one the region was allocated with.
  ///
  /// # Safety
  ///
  /// `old_ptr` must be null or point to a region of at least `old_count`
  /// values of `T` previously returned by this arena since its last reset.
  pub unsafe fn resize_aligned<T>(
    &mut self,
    old_ptr: *mut T,
    old_count: usize,
    new_count: usize,
    alignment: usize,
  ) -> Result<*mut T> {
    if !align::is_valid_alignment(alignment) {
      return Err(AllocError::InvalidAlignment);
    }

    if old_ptr.is_null() || old_count == 0 {
      return self.allocate_aligned(new_count, alignment);
    }

    if self.buffer.is_null() {
      return Err(AllocError::NullPointer);
    }

    let old_size = old_count.checked_mul(mem::size_of::<T>()).ok_or(AllocError::OutOfMemory)?;
    let new_size = new_count.checked_mul(mem::size_of::<T>()).ok_or(AllocError::OutOfMemory)?;

    let old_offset = (old_ptr as usize).wrapping_sub(self.buffer as usize);
    debug_assert!(
      old_offset <= self.used,
      "resize: {:?} was not allocated from this arena",
      old_ptr
    );

    if old_offset == self.last_offset {
      let end = match self.last_offset.checked_add(new_size) {
        Some(end) if end <= self.capacity => end,
        _ => {
          debug!(
            "in-place resize to {} bytes at offset {} does not fit in {} bytes",
            new_size, self.last_offset, self.capacity
          );
          return Err(AllocError::OutOfMemory);
        }
      };

      if self.zero_on_alloc && new_size > old_size {
        unsafe {
          ptr::write_bytes(self.buffer.add(self.last_offset + old_size), 0, new_size - old_size);
        }
      }

      self.used = end;
      trace!("resized in place at offset {}: {} -> {} bytes", old_offset, old_size, new_size);

      return Ok(old_ptr);
    }

    let fresh = self.allocate_aligned::<T>(new_count, alignment)?;

    if !fresh.is_null() {
      unsafe {
        ptr::copy_nonoverlapping(old_ptr as *const u8, fresh as *mut u8, old_size.min(new_size));
      }
    }

    trace!(
      "resized by copy from offset {}: {} -> {} bytes, used = {}",
      old_offset, old_size, new_size, self.used
    );

    Ok(fresh)
  }

  /// Forgets every allocation. Buffer contents are left as they are.
  pub fn reset(&mut self) {
    debug!("reset arena: {} of {} bytes were used", self.used, self.capacity);
    self.used = 0;
    self.last_offset = 0;
  }

  /// Frees the block if the arena owns it and leaves the arena inert.
  ///
  /// Calling it again is a no-op. Allocating afterwards fails with
  /// [`AllocError::NullPointer`].
  pub fn release(&mut self) {
    if self.buffer.is_null() {
      return;
    }

    if self.owns_memory {
      unsafe { libc::free(self.buffer as *mut c_void) };
    }

    debug!(
      "released arena at {:?} ({} bytes, owned = {})",
      self.buffer, self.capacity, self.owns_memory
    );

    self.buffer = ptr::null_mut();
    self.capacity = 0;
    self.used = 0;
    self.last_offset = 0;
  }

  /// Opens a savepoint that rolls this arena back when ended or dropped.
  pub fn savepoint(&mut self) -> Savepoint<'_> {
    Savepoint::begin(self)
  }

  /// Offset of `ptr` from the start of the block, if it lies within the used part.
  pub fn offset_of<T>(
    &self,
    ptr: *const T,
  ) -> Option<usize> {
    if self.buffer.is_null() {
      return None;
    }

    let offset = (ptr as usize).checked_sub(self.buffer as usize)?;
    (offset <= self.used).then_some(offset)
  }

  /// Moves both cursors back, provided `buffer` is still this arena's block
  /// and the cursors fit in it. Returns whether anything was restored.
  pub(crate) fn rewind(
    &mut self,
    buffer: *const u8,
    used: usize,
    last_offset: usize,
  ) -> bool {
    if !ptr::eq(self.buffer, buffer) || used > self.capacity || last_offset > used {
      debug!(
        "skipping rewind to used {} / last_offset {}: arena at {:?} has {} bytes",
        used, last_offset, self.buffer, self.capacity
      );
      return false;
    }

    self.used = used;
    self.last_offset = last_offset;
    true
  }

  pub fn as_ptr(&self) -> *const u8 {
    self.buffer
  }

  pub fn capacity(&self) -> usize {
    self.capacity
  }

  pub fn used(&self) -> usize {
    self.used
  }

  pub fn last_offset(&self) -> usize {
    self.last_offset
  }

  pub fn remaining(&self) -> usize {
    self.capacity - self.used
  }

  pub fn owns_memory(&self) -> bool {
    self.owns_memory
  }

  pub fn zero_on_alloc(&self) -> bool {
    self.zero_on_alloc
  }

  pub fn is_released(&self) -> bool {
    self.buffer.is_null()
  }
}

/// An unbound arena: no buffer, every allocation fails with [`AllocError::NullPointer`].
impl Default for Arena {
  fn default() -> Self {
    Self {
      buffer: ptr::null_mut(),
      capacity: 0,
      used: 0,
      last_offset: 0,
      owns_memory: false,
      zero_on_alloc: ArenaConfig::default().zero_on_alloc,
    }
  }
}

impl Drop for Arena {
  fn drop(&mut self) {
    self.release();
  }
}
