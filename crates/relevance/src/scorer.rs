use std::sync::Arc;

use newsrel_core::{ModelFailurePolicy, RelevanceConfig};
use tracing::{debug, info, warn};

use crate::neutral::NEUTRAL_SCORE;
use crate::{RelevanceError, RelevanceModel};

/// Front door to the relevance model used by the classifier.
///
/// Holds an optional model. Without one every entity scores the neutral 0.5. With one,
/// scores are clamped into [0, 1] and failures are handled per [`ModelFailurePolicy`].
#[derive(Clone)]
pub struct RelevanceScorer {
  model: Option<Arc<dyn RelevanceModel>>,
  on_failure: ModelFailurePolicy,
}

impl std::fmt::Debug for RelevanceScorer {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("RelevanceScorer")
      .field("model", &self.model_name())
      .field("on_failure", &self.on_failure)
      .finish()
  }
}

impl Default for RelevanceScorer {
  fn default() -> Self {
    Self::neutral()
  }
}

impl RelevanceScorer {
  /// Scorer with no model; every call returns the neutral score
  pub fn neutral() -> Self {
    Self {
      model: None,
      on_failure: ModelFailurePolicy::Neutral,
    }
  }

  pub fn new(model: Arc<dyn RelevanceModel>, on_failure: ModelFailurePolicy) -> Self {
    Self {
      model: Some(model),
      on_failure,
    }
  }

  pub fn from_config(config: &RelevanceConfig, on_failure: ModelFailurePolicy) -> Result<Self, RelevanceError> {
    let model = <dyn RelevanceModel>::from_config(config)?;
    Ok(Self { model, on_failure })
  }

  /// Check the model once and fall back to neutral scoring when it cannot be reached
  pub async fn probe(self) -> Self {
    let Some(model) = &self.model else {
      info!("No relevance model configured, using neutral scores");
      return self;
    };

    if model.is_available().await {
      info!(provider = model.name(), model = model.model_id(), "Relevance model available");
      self
    } else {
      warn!(
        provider = model.name(),
        model = model.model_id(),
        "Relevance model unavailable, falling back to neutral scores"
      );
      Self {
        model: None,
        on_failure: self.on_failure,
      }
    }
  }

  /// Score how much `text` is about `entity_name`.
  ///
  /// Returns `Err` only under [`ModelFailurePolicy::Skip`]; the caller drops the entity.
  pub async fn score(&self, text: &str, entity_name: &str) -> Result<f32, RelevanceError> {
    let Some(model) = &self.model else {
      return Ok(NEUTRAL_SCORE);
    };

    let outcome = match model.score_relevance(text, entity_name).await {
      Ok(score) if score.is_finite() => Ok(score.clamp(0.0, 1.0)),
      Ok(score) => Err(RelevanceError::InvalidScore(score)),
      Err(e) => Err(e),
    };

    match outcome {
      Ok(score) => {
        debug!(entity = entity_name, score, "Model relevance");
        Ok(score)
      }
      Err(e) => match self.on_failure {
        ModelFailurePolicy::Neutral => {
          warn!(entity = entity_name, err = %e, "Relevance model failed, using neutral score");
          Ok(NEUTRAL_SCORE)
        }
        ModelFailurePolicy::Skip => {
          warn!(entity = entity_name, err = %e, "Relevance model failed, skipping entity");
          Err(e)
        }
      },
    }
  }

  pub fn is_model_backed(&self) -> bool {
    self.model.is_some()
  }

  /// Model identifier, `None` when scoring is neutral
  pub fn model_name(&self) -> Option<&str> {
    self.model.as_ref().map(|m| m.model_id())
  }

  pub fn failure_policy(&self) -> ModelFailurePolicy {
    self.on_failure
  }
}
