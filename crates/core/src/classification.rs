use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::article::{Article, Category};
use crate::entity::EntityId;

/// Weight of the linguistic score in the combined score
pub const LINGUISTIC_WEIGHT: f32 = 0.6;
/// Weight of the learned-model score in the combined score
pub const MODEL_WEIGHT: f32 = 0.4;

/// An entity that survived the cheap linguistic stage and was scored by the model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RelevanceCandidate {
  pub entity_id: EntityId,
  pub symbol: String,
  pub linguistic_score: f32,
  pub ml_score: f32,
  pub combined_score: f32,
  pub confidence: f32,
}

impl RelevanceCandidate {
  /// Build a candidate from its two input scores.
  ///
  /// `combined_score` and `confidence` are always derived here so they can never drift
  /// from the weighting: combined = 0.6·linguistic + 0.4·ml, confidence = mean of both.
  pub fn new(entity_id: EntityId, symbol: impl Into<String>, linguistic_score: f32, ml_score: f32) -> Self {
    let linguistic_score = linguistic_score.clamp(0.0, 1.0);
    let ml_score = ml_score.clamp(0.0, 1.0);
    let combined_score = (LINGUISTIC_WEIGHT * linguistic_score + MODEL_WEIGHT * ml_score).min(1.0);
    let confidence = ((linguistic_score + ml_score) / 2.0).min(1.0);

    Self {
      entity_id,
      symbol: symbol.into(),
      linguistic_score,
      ml_score,
      combined_score,
      confidence,
    }
  }

  pub fn scores(&self) -> EntityScores {
    EntityScores {
      relevance_score: self.combined_score,
      linguistic_score: self.linguistic_score,
      ml_score: self.ml_score,
      confidence: self.confidence,
    }
  }
}

/// Output of classifying one article
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ClassificationResult {
  pub category: Category,
  /// Descending by `combined_score`, at most `top_k` entries
  pub candidates: Vec<RelevanceCandidate>,
}

impl ClassificationResult {
  pub fn entity_ids(&self) -> Vec<EntityId> {
    self.candidates.iter().map(|c| c.entity_id).collect()
  }

  pub fn is_empty(&self) -> bool {
    self.candidates.is_empty()
  }
}

/// Per-entity score breakdown stored alongside a processed article
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EntityScores {
  pub relevance_score: f32,
  pub linguistic_score: f32,
  pub ml_score: f32,
  pub confidence: f32,
}

/// An article enriched with its cleaned snippet, category and matched entities.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProcessedArticle {
  #[serde(flatten)]
  pub article: Article,
  /// Sanitized snippet; empty when the snippet was rejected as noise
  pub cleaned_snippet: String,
  pub category: Category,
  pub mentioned_entity_ids: Vec<EntityId>,
  pub entity_scores: BTreeMap<EntityId, EntityScores>,
}

impl ProcessedArticle {
  pub fn new(article: Article, cleaned_snippet: String, result: ClassificationResult) -> Self {
    let mentioned_entity_ids = result.entity_ids();
    let entity_scores = result.candidates.iter().map(|c| (c.entity_id, c.scores())).collect();

    Self {
      article,
      cleaned_snippet,
      category: result.category,
      mentioned_entity_ids,
      entity_scores,
    }
  }

  pub fn has_entities(&self) -> bool {
    !self.mentioned_entity_ids.is_empty()
  }
}
