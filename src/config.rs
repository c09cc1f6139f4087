/// Construction-time options shared by both arena factories.
///
/// Ownership is not an option: it follows from the factory used.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ArenaConfig {
  /// Zero every region (and every byte exposed by an in-place grow) before handing it out.
  pub zero_on_alloc: bool,
}

impl ArenaConfig {
  pub fn new() -> Self {
    Self { zero_on_alloc: true }
  }

  pub fn zero_on_alloc(
    mut self,
    enabled: bool,
  ) -> Self {
    self.zero_on_alloc = enabled;
    self
  }
}

impl Default for ArenaConfig {
  fn default() -> Self {
    Self::new()
  }
}
