//! Shared fixtures for classification integration tests

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use classify::{Classifier, PatternIndex};
use newsrel_core::{EntityRecord, ModelFailurePolicy};
use relevance::{RelevanceError, RelevanceModel, RelevanceScorer};

/// Relevance model with canned per-entity answers and a call counter
pub struct ScriptedModel {
  scores: HashMap<String, f32>,
  failing: Vec<String>,
  default_score: f32,
  calls: AtomicUsize,
}

#[allow(dead_code)]
impl ScriptedModel {
  pub fn constant(score: f32) -> Self {
    Self {
      scores: HashMap::new(),
      failing: Vec::new(),
      default_score: score,
      calls: AtomicUsize::new(0),
    }
  }

  pub fn with_score(mut self, entity_name: &str, score: f32) -> Self {
    self.scores.insert(entity_name.to_string(), score);
    self
  }

  pub fn failing_for(mut self, entity_name: &str) -> Self {
    self.failing.push(entity_name.to_string());
    self
  }

  pub fn calls(&self) -> usize {
    self.calls.load(Ordering::SeqCst)
  }
}

#[async_trait]
impl RelevanceModel for ScriptedModel {
  fn name(&self) -> &str {
    "scripted"
  }

  fn model_id(&self) -> &str {
    "scripted-model"
  }

  async fn score_relevance(&self, _text: &str, entity_name: &str) -> Result<f32, RelevanceError> {
    self.calls.fetch_add(1, Ordering::SeqCst);
    if self.failing.iter().any(|n| n == entity_name) {
      return Err(RelevanceError::ProviderError("Inference server returned 500".to_string()));
    }
    Ok(self.scores.get(entity_name).copied().unwrap_or(self.default_score))
  }

  async fn is_available(&self) -> bool {
    true
  }
}

#[allow(dead_code)]
pub fn catalog() -> Vec<EntityRecord> {
  vec![
    EntityRecord::new(1, "AAPL", "Apple Inc."),
    EntityRecord::new(2, "MSFT", "Microsoft Corporation"),
    EntityRecord::new(3, "GOOGL", "Alphabet Inc. Class A"),
    EntityRecord::new(4, "NVDA", "NVIDIA Corporation"),
    EntityRecord::new(5, "TSLA", "Tesla, Inc."),
    EntityRecord::new(6, "CAT", "Caterpillar Inc."),
    EntityRecord::new(7, "META", "Meta Platforms, Inc."),
    EntityRecord::new(8, "F", "Ford Motor Company"),
  ]
}

#[allow(dead_code)]
pub fn index() -> PatternIndex {
  PatternIndex::build(&catalog())
}

/// Classifier backed by `model`, returned alongside it for call inspection
#[allow(dead_code)]
pub fn classifier_with(model: ScriptedModel, policy: ModelFailurePolicy) -> (Arc<ScriptedModel>, Classifier) {
  let model = Arc::new(model);
  let scorer = RelevanceScorer::new(model.clone(), policy);
  (model, Classifier::new(scorer))
}
