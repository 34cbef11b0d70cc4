//! Versioned publication of the pattern index.
//!
//! Readers clone an `Arc` to the current index and keep using it for as long as they need;
//! a rebuild compiles the new index outside the lock and swaps it in with one write.

use std::sync::{Arc, PoisonError, RwLock};

use newsrel_core::EntityRecord;
use tracing::info;

use crate::pattern::PatternIndex;

/// A published index together with its publication number (1 for the first publish)
#[derive(Debug, Clone)]
pub struct IndexSnapshot {
  pub version: u64,
  pub index: Arc<PatternIndex>,
}

#[derive(Debug, Default)]
pub struct SharedIndex {
  current: RwLock<Option<IndexSnapshot>>,
}

impl SharedIndex {
  /// No index published yet
  pub fn new() -> Self {
    Self::default()
  }

  pub fn with_index(index: PatternIndex) -> Self {
    let shared = Self::new();
    shared.publish(index);
    shared
  }

  /// The current snapshot, `None` until the first publish
  pub fn load(&self) -> Option<IndexSnapshot> {
    self.current.read().unwrap_or_else(PoisonError::into_inner).clone()
  }

  pub fn is_ready(&self) -> bool {
    self.current.read().unwrap_or_else(PoisonError::into_inner).is_some()
  }

  /// Version of the current snapshot, 0 when nothing is published
  pub fn version(&self) -> u64 {
    self
      .current
      .read()
      .unwrap_or_else(PoisonError::into_inner)
      .as_ref()
      .map_or(0, |s| s.version)
  }

  /// Swap in `index` as the current snapshot and return its version
  pub fn publish(&self, index: PatternIndex) -> u64 {
    let entities = index.len();
    let index = Arc::new(index);

    let mut current = self.current.write().unwrap_or_else(PoisonError::into_inner);
    let version = current.as_ref().map_or(0, |s| s.version) + 1;
    *current = Some(IndexSnapshot { version, index });
    drop(current);

    info!(version, entities, "Published pattern index");
    version
  }

  /// Build a fresh index from `entities` and publish it
  pub fn rebuild(&self, entities: &[EntityRecord]) -> u64 {
    self.publish(PatternIndex::build(entities))
  }
}
