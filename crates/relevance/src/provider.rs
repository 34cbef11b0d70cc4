use std::sync::Arc;

use async_trait::async_trait;
use newsrel_core::{RelevanceConfig, RelevanceProviderKind};

use crate::http::HttpRelevanceModel;
use crate::resilient::{ResilientModel, RetryConfig};

/// A learned scorer estimating how much a text is about a named entity.
///
/// Implementations must return scores in [0, 1].
#[async_trait]
pub trait RelevanceModel: Send + Sync {
  fn name(&self) -> &str;
  fn model_id(&self) -> &str;

  async fn score_relevance(&self, text: &str, entity_name: &str) -> Result<f32, RelevanceError>;
  async fn is_available(&self) -> bool;
}

impl dyn RelevanceModel {
  /// Build the configured model, or `None` when no provider is configured.
  pub fn from_config(config: &RelevanceConfig) -> Result<Option<Arc<dyn RelevanceModel>>, RelevanceError> {
    match config.provider {
      RelevanceProviderKind::None => Ok(None),
      RelevanceProviderKind::Http => {
        let model = HttpRelevanceModel::from_config(config)?;

        if config.resilient {
          let resilient = ResilientModel::with_config(model, RetryConfig::from_relevance_config(config));
          Ok(Some(Arc::new(resilient)))
        } else {
          Ok(Some(Arc::new(model)))
        }
      }
    }
  }
}

#[derive(Debug, thiserror::Error)]
pub enum RelevanceError {
  #[error("Model not available")]
  NotAvailable,
  #[error("Request failed: {0}")]
  Request(#[from] reqwest::Error),
  #[error("Provider error: {0}")]
  ProviderError(String),
  #[error("Network error: {0}")]
  Network(String),
  #[error("Request timed out")]
  Timeout,
  #[error("Score out of range: {0}")]
  InvalidScore(f32),
}
