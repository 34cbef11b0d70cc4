use std::sync::Arc;
use std::sync::atomic::{AtomicU32, Ordering};

use futures::StreamExt;
use newsrel_core::{Article, ClassificationResult, Config, EntityRecord, Error, ProcessedArticle, Result};
use relevance::{RelevanceError, RelevanceScorer};
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::categorize::categorize;
use crate::classifier::Classifier;
use crate::snapshot::SharedIndex;

/// Point-in-time view of the processor for monitoring
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClassifierStats {
  pub entities_loaded: usize,
  pub index_version: u64,
  pub model_available: bool,
  pub model_name: Option<String>,
  pub global_threshold: f32,
}

/// Article-level pipeline: clean, categorize and attribute entities.
///
/// The pattern index lives in a [`SharedIndex`] so catalog reloads can happen while articles
/// are in flight. The global threshold can be tuned at runtime.
pub struct NewsProcessor {
  classifier: Classifier,
  index: Arc<SharedIndex>,
  global_threshold: AtomicU32,
}

impl NewsProcessor {
  pub fn new(classifier: Classifier) -> Self {
    Self::with_shared_index(classifier, Arc::new(SharedIndex::new()))
  }

  pub fn with_shared_index(classifier: Classifier, index: Arc<SharedIndex>) -> Self {
    let global_threshold = AtomicU32::new(classifier.options().global_threshold.to_bits());
    Self {
      classifier,
      index,
      global_threshold,
    }
  }

  /// Build the processor from config, probing the relevance model once
  pub async fn from_config(config: &Config) -> std::result::Result<Self, RelevanceError> {
    let scorer = RelevanceScorer::from_config(&config.relevance, config.classifier.model_failure)?
      .probe()
      .await;
    Ok(Self::new(Classifier::from_config(config, scorer)))
  }

  pub fn classifier(&self) -> &Classifier {
    &self.classifier
  }

  pub fn shared_index(&self) -> &Arc<SharedIndex> {
    &self.index
  }

  /// Rebuild the pattern index from a new catalog snapshot
  pub fn update_entities(&self, entities: &[EntityRecord]) -> u64 {
    info!(entities = entities.len(), "Updating entity catalog");
    self.index.rebuild(entities)
  }

  pub fn global_threshold(&self) -> f32 {
    f32::from_bits(self.global_threshold.load(Ordering::Relaxed))
  }

  pub fn set_global_threshold(&self, threshold: f32) -> Result<()> {
    if !(0.0..=1.0).contains(&threshold) {
      warn!(threshold, "Rejected global threshold outside [0, 1]");
      return Err(Error::Validation(format!(
        "global threshold must be between 0.0 and 1.0, got {threshold}"
      )));
    }

    self.global_threshold.store(threshold.to_bits(), Ordering::Relaxed);
    info!(threshold, "Global threshold updated");
    Ok(())
  }

  pub async fn process_article(&self, article: Article) -> ProcessedArticle {
    let Some(snapshot) = self.index.load() else {
      warn!("Classifier not ready, skipping entity identification");
      let cleaned = self.classifier.sanitizer().clean(&article.raw_snippet, &article.title);
      let category = categorize(&article.title, &cleaned);
      let result = ClassificationResult {
        category,
        candidates: Vec::new(),
      };
      return ProcessedArticle::new(article, cleaned, result);
    };

    let options = self.classifier.options().with_global_threshold(self.global_threshold());
    let (cleaned, result) = self
      .classifier
      .classify_raw(&article.title, &article.raw_snippet, &snapshot.index, &options)
      .await;

    if result.is_empty() {
      debug!(title = %preview(&article.title), category = %result.category, "No entities");
    } else {
      let entities = result
        .candidates
        .iter()
        .map(|c| format!("{}({:.2})", c.symbol, c.combined_score))
        .collect::<Vec<_>>()
        .join(", ");
      info!(
        title = %preview(&article.title),
        category = %result.category,
        entities = %entities,
        index_version = snapshot.version,
        "Article classified"
      );
    }

    ProcessedArticle::new(article, cleaned, result)
  }

  /// Process independent articles concurrently, keeping input order
  pub async fn process_batch(&self, articles: Vec<Article>, concurrency: usize) -> Vec<ProcessedArticle> {
    let total = articles.len();
    let processed: Vec<ProcessedArticle> = futures::stream::iter(articles)
      .map(|article| self.process_article(article))
      .buffered(concurrency.max(1))
      .collect()
      .await;

    let with_entities = processed.iter().filter(|p| p.has_entities()).count();
    info!(total, with_entities, "Batch processed");
    processed
  }

  pub fn stats(&self) -> ClassifierStats {
    let snapshot = self.index.load();
    let scorer = self.classifier.scorer();

    ClassifierStats {
      entities_loaded: snapshot.as_ref().map_or(0, |s| s.index.len()),
      index_version: snapshot.as_ref().map_or(0, |s| s.version),
      model_available: scorer.is_model_backed(),
      model_name: scorer.model_name().map(str::to_string),
      global_threshold: self.global_threshold(),
    }
  }
}

fn preview(title: &str) -> String {
  match title.char_indices().nth(60) {
    Some((idx, _)) => format!("{}...", &title[..idx]),
    None => title.to_string(),
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use newsrel_core::{Category, EntityId};
  use pretty_assertions::assert_eq;

  fn catalog() -> Vec<EntityRecord> {
    vec![
      EntityRecord::new(1, "AAPL", "Apple Inc."),
      EntityRecord::new(2, "TSLA", "Tesla, Inc."),
    ]
  }

  fn ready_processor() -> NewsProcessor {
    let processor = NewsProcessor::new(Classifier::default());
    processor.update_entities(&catalog());
    processor
  }

  #[tokio::test]
  async fn test_not_ready_returns_no_entities() {
    let processor = NewsProcessor::new(Classifier::default());
    let article = Article::new(
      "Tesla recalls vehicles over software update",
      "Tesla is recalling cars to fix a software problem",
    );

    let processed = processor.process_article(article).await;
    assert!(!processed.has_entities());
    assert_eq!(processed.category, Category::Product);
    assert_eq!(processed.cleaned_snippet, "Tesla is recalling cars to fix a software problem");
  }

  #[tokio::test]
  async fn test_process_article_attributes_entities() {
    let processor = ready_processor();
    processor.set_global_threshold(0.6).unwrap();

    let article = Article::new(
      "Tesla deliveries top forecasts",
      "Tesla, Inc. delivered more cars than analysts had expected this quarter",
    );
    let processed = processor.process_article(article).await;

    assert_eq!(processed.mentioned_entity_ids, vec![EntityId(2)]);
    assert!(processed.entity_scores.contains_key(&EntityId(2)));
    assert_eq!(processed.category, Category::Market);
  }

  #[tokio::test]
  async fn test_threshold_controls_acceptance() {
    let processor = ready_processor();
    let article = Article::new(
      "Apple reports record iPhone sales growth",
      "iPhone revenue grew across markets",
    );

    // neutral model: 0.6 * 0.7 + 0.4 * 0.5 = 0.62
    assert!(!processor.process_article(article.clone()).await.has_entities());
    processor.set_global_threshold(0.6).unwrap();
    assert!(processor.process_article(article).await.has_entities());
  }

  #[test]
  fn test_set_global_threshold_validates() {
    let processor = NewsProcessor::new(Classifier::default());
    assert_eq!(processor.global_threshold(), 0.7);

    assert!(processor.set_global_threshold(1.2).is_err());
    assert!(processor.set_global_threshold(-0.1).is_err());
    assert!(processor.set_global_threshold(f32::NAN).is_err());
    assert_eq!(processor.global_threshold(), 0.7);

    processor.set_global_threshold(0.55).unwrap();
    assert_eq!(processor.global_threshold(), 0.55);
  }

  #[tokio::test]
  async fn test_batch_preserves_order() {
    let processor = ready_processor();
    processor.set_global_threshold(0.6).unwrap();

    let articles = vec![
      Article::new("Apple unveils new iPhone lineup", "The event showed four new models today"),
      Article::new("Oil prices climb", "Crude rose on supply concerns this week"),
      Article::new("Tesla opens a new factory", "Tesla will build its newest model there"),
    ];

    let processed = processor.process_batch(articles, 2).await;

    assert_eq!(processed.len(), 3);
    assert_eq!(processed[0].mentioned_entity_ids, vec![EntityId(1)]);
    assert!(processed[1].mentioned_entity_ids.is_empty());
    assert_eq!(processed[2].mentioned_entity_ids, vec![EntityId(2)]);
  }

  #[test]
  fn test_stats() {
    let processor = NewsProcessor::new(Classifier::default());
    let stats = processor.stats();
    assert_eq!(stats.entities_loaded, 0);
    assert_eq!(stats.index_version, 0);
    assert!(!stats.model_available);

    processor.update_entities(&catalog());
    let stats = processor.stats();
    assert_eq!(stats.entities_loaded, 2);
    assert_eq!(stats.index_version, 1);
    assert_eq!(stats.model_name, None);
  }

  #[test]
  fn test_preview_truncates_on_char_boundary() {
    assert_eq!(preview("short"), "short");
    let long = "é".repeat(70);
    assert_eq!(preview(&long).chars().count(), 63);
  }
}
