use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier of a tracked entity as assigned by the entity catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntityId(pub i64);

impl fmt::Display for EntityId {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}", self.0)
  }
}

impl From<i64> for EntityId {
  fn from(id: i64) -> Self {
    Self(id)
  }
}

/// One row of the entity catalog: the only input the pattern index is built from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntityRecord {
  pub id: EntityId,
  /// Short ticker-like code, e.g. "AAPL"
  pub symbol: String,
  /// Full registered name, e.g. "Apple Inc."
  #[serde(alias = "name")]
  pub display_name: String,
}

impl EntityRecord {
  pub fn new(id: impl Into<EntityId>, symbol: impl Into<String>, display_name: impl Into<String>) -> Self {
    Self {
      id: id.into(),
      symbol: symbol.into(),
      display_name: display_name.into(),
    }
  }
}
