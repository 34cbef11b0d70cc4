//! Two-stage entity relevance classification.
//!
//! Stage one scores every entity linguistically and drops anything under the cheap filter,
//! so the model only ever sees a handful of candidates. Stage two asks the relevance model
//! about the survivors, blends both scores and keeps the best few that clear both bars.

use std::sync::Arc;
use std::time::Instant;

use newsrel_core::{
  ArticleText, ClassificationResult, ClassifierConfig, Config, MAX_CONCURRENT_MODEL_CALLS, RelevanceCandidate,
};
use relevance::RelevanceScorer;
use tokio::sync::Semaphore;
use tracing::{debug, trace};

use crate::categorize::categorize;
use crate::linguistic;
use crate::pattern::{EntityProfile, PatternIndex};
use crate::sanitize::ContentSanitizer;

/// Thresholds for one classification run
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClassifyOptions {
  pub cheap_filter: f32,
  pub global_threshold: f32,
  pub secondary_floor: f32,
  pub top_k: usize,
}

impl Default for ClassifyOptions {
  fn default() -> Self {
    Self::from(&ClassifierConfig::default())
  }
}

impl From<&ClassifierConfig> for ClassifyOptions {
  fn from(config: &ClassifierConfig) -> Self {
    Self {
      cheap_filter: config.cheap_filter,
      global_threshold: config.global_threshold,
      secondary_floor: config.secondary_floor,
      top_k: config.top_k,
    }
  }
}

impl ClassifyOptions {
  pub fn with_global_threshold(self, global_threshold: f32) -> Self {
    Self {
      global_threshold,
      ..self
    }
  }
}

/// Sanitizer, categorizer and two-stage entity classifier behind one entry point.
#[derive(Debug, Clone)]
pub struct Classifier {
  scorer: RelevanceScorer,
  sanitizer: ContentSanitizer,
  options: ClassifyOptions,
  max_concurrent: usize,
}

impl Default for Classifier {
  fn default() -> Self {
    Self::new(RelevanceScorer::neutral())
  }
}

impl Classifier {
  pub fn new(scorer: RelevanceScorer) -> Self {
    let defaults = ClassifierConfig::default();
    Self {
      scorer,
      sanitizer: ContentSanitizer::default(),
      options: ClassifyOptions::from(&defaults),
      max_concurrent: defaults.max_concurrent_model_calls,
    }
  }

  pub fn from_config(config: &Config, scorer: RelevanceScorer) -> Self {
    Self {
      scorer,
      sanitizer: ContentSanitizer::new(config.sanitizer.clone()),
      options: ClassifyOptions::from(&config.classifier),
      max_concurrent: config
        .classifier
        .max_concurrent_model_calls
        .clamp(1, MAX_CONCURRENT_MODEL_CALLS),
    }
  }

  pub fn with_options(mut self, options: ClassifyOptions) -> Self {
    self.options = options;
    self
  }

  pub fn options(&self) -> &ClassifyOptions {
    &self.options
  }

  pub fn scorer(&self) -> &RelevanceScorer {
    &self.scorer
  }

  pub fn sanitizer(&self) -> &ContentSanitizer {
    &self.sanitizer
  }

  /// Clean the snippet, categorize, and classify against `index` with the configured options
  pub async fn classify_article(&self, title: &str, raw_snippet: &str, index: &PatternIndex) -> ClassificationResult {
    self.classify_raw(title, raw_snippet, index, &self.options).await.1
  }

  /// Like [`Classifier::classify_article`], also returning the cleaned snippet
  pub async fn classify_raw(
    &self,
    title: &str,
    raw_snippet: &str,
    index: &PatternIndex,
    options: &ClassifyOptions,
  ) -> (String, ClassificationResult) {
    let cleaned = self.sanitizer.clean(raw_snippet, title);
    let category = categorize(title, &cleaned);
    let text = ArticleText::new(title, cleaned.as_str());
    let candidates = self.classify(&text, index, options).await;

    (cleaned, ClassificationResult { category, candidates })
  }

  /// Rank the entities of `index` that `text` is about.
  ///
  /// The result holds at most `top_k` candidates, descending by combined score with ties
  /// broken by ascending entity id. A failed model call drops only that entity.
  #[tracing::instrument(level = "trace", skip(self, text, index, options), fields(entities = index.len()))]
  pub async fn classify(
    &self,
    text: &ArticleText,
    index: &PatternIndex,
    options: &ClassifyOptions,
  ) -> Vec<RelevanceCandidate> {
    let start = Instant::now();

    let survivors: Vec<(&EntityProfile, f32)> = index
      .profiles()
      .filter_map(|profile| {
        let score = linguistic::score(text, profile);
        if score < options.cheap_filter {
          if score > 0.0 {
            trace!(symbol = %profile.symbol, score, "Below cheap filter");
          }
          return None;
        }
        debug!(symbol = %profile.symbol, linguistic_score = score, "Passed cheap filter");
        Some((profile, score))
      })
      .collect();

    if survivors.is_empty() {
      return Vec::new();
    }

    let joined = text.joined();
    let semaphore = Arc::new(Semaphore::new(self.max_concurrent));

    let futures: Vec<_> = survivors
      .into_iter()
      .map(|(profile, linguistic_score)| {
        let permit = semaphore.clone();
        let joined = joined.as_str();
        async move {
          let _permit = permit.acquire().await.ok();
          let ml = self.scorer.score(joined, &profile.display_name).await;
          (profile, linguistic_score, ml)
        }
      })
      .collect();

    let scored = futures::future::join_all(futures).await;
    let model_calls = scored.len();

    let mut candidates: Vec<RelevanceCandidate> = scored
      .into_iter()
      .filter_map(|(profile, linguistic_score, ml)| {
        let ml_score = match ml {
          Ok(score) => score,
          Err(e) => {
            debug!(symbol = %profile.symbol, err = %e, "Skipping entity after model failure");
            return None;
          }
        };

        let candidate = RelevanceCandidate::new(profile.id, &profile.symbol, linguistic_score, ml_score);
        if candidate.combined_score < options.global_threshold {
          debug!(
            symbol = %profile.symbol,
            combined_score = candidate.combined_score,
            threshold = options.global_threshold,
            "Below global threshold"
          );
          return None;
        }
        if candidate.linguistic_score < options.secondary_floor {
          debug!(
            symbol = %profile.symbol,
            linguistic_score = candidate.linguistic_score,
            "Filtered out by secondary floor"
          );
          return None;
        }
        Some(candidate)
      })
      .collect();

    candidates.sort_by(|a, b| {
      b.combined_score
        .total_cmp(&a.combined_score)
        .then_with(|| a.entity_id.cmp(&b.entity_id))
    });
    candidates.truncate(options.top_k);

    trace!(
      model_calls,
      accepted = candidates.len(),
      elapsed_ms = start.elapsed().as_millis(),
      "Classification complete"
    );
    candidates
  }
}
