pub mod categorize;
pub mod classifier;
pub mod curated;
pub mod linguistic;
pub mod pattern;
pub mod processor;
pub mod report;
pub mod sanitize;
pub mod snapshot;

pub use categorize::categorize;
pub use classifier::{Classifier, ClassifyOptions};
pub use pattern::{EntityProfile, PatternIndex};
pub use processor::{ClassifierStats, NewsProcessor};
pub use report::QualityReport;
pub use sanitize::ContentSanitizer;
pub use snapshot::{IndexSnapshot, SharedIndex};

use newsrel_core::EntityRecord;

/// Compile a fresh pattern index for an entity catalog snapshot
pub fn rebuild_pattern_index(entities: &[EntityRecord]) -> PatternIndex {
  PatternIndex::build(entities)
}
