use newsrel_core::ProcessedArticle;
use serde::Serialize;

fn round_to(value: f32, places: i32) -> f32 {
  let factor = 10f32.powi(places);
  (value * factor).round() / factor
}

/// Classification quality summary over a set of processed articles
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct QualityReport {
  pub total_articles: usize,
  pub articles_with_entities: usize,
  pub articles_without_entities: usize,
  pub classification_rate: f32,
  /// Rounded to 2 decimal places
  pub avg_entities_per_article: f32,
  /// Rounded to 3 decimal places
  pub avg_confidence: f32,
  pub min_confidence: f32,
  pub max_confidence: f32,
}

impl QualityReport {
  pub fn from_articles(articles: &[ProcessedArticle]) -> Self {
    if articles.is_empty() {
      return Self::default();
    }

    let total_articles = articles.len();
    let articles_with_entities = articles.iter().filter(|a| a.has_entities()).count();
    let entity_count: usize = articles.iter().map(|a| a.mentioned_entity_ids.len()).sum();

    let confidences: Vec<f32> = articles
      .iter()
      .flat_map(|a| a.entity_scores.values().map(|s| s.confidence))
      .collect();

    let (avg_confidence, min_confidence, max_confidence) = if confidences.is_empty() {
      (0.0, 0.0, 0.0)
    } else {
      let sum: f32 = confidences.iter().sum();
      (
        sum / confidences.len() as f32,
        confidences.iter().copied().fold(f32::INFINITY, f32::min),
        confidences.iter().copied().fold(f32::NEG_INFINITY, f32::max),
      )
    };

    Self {
      total_articles,
      articles_with_entities,
      articles_without_entities: total_articles - articles_with_entities,
      classification_rate: articles_with_entities as f32 / total_articles as f32,
      avg_entities_per_article: round_to(entity_count as f32 / total_articles as f32, 2),
      avg_confidence: round_to(avg_confidence, 3),
      min_confidence,
      max_confidence,
    }
  }
}
