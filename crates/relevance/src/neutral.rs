use async_trait::async_trait;

use crate::{RelevanceError, RelevanceModel};

/// Score used whenever no learned signal is available
pub const NEUTRAL_SCORE: f32 = 0.5;

/// Stand-in model that has no opinion about any entity.
///
/// With it, classification rests on the linguistic score alone.
#[derive(Debug, Clone, Copy, Default)]
pub struct NeutralModel;

#[async_trait]
impl RelevanceModel for NeutralModel {
  fn name(&self) -> &str {
    "neutral"
  }

  fn model_id(&self) -> &str {
    "none"
  }

  async fn score_relevance(&self, _text: &str, _entity_name: &str) -> Result<f32, RelevanceError> {
    Ok(NEUTRAL_SCORE)
  }

  async fn is_available(&self) -> bool {
    true
  }
}
