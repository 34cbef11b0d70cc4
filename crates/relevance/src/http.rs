use std::time::{Duration, Instant};

use async_trait::async_trait;
use newsrel_core::RelevanceConfig;
use serde::{Deserialize, Serialize};
use tracing::{debug, trace, warn};

use crate::{RelevanceError, RelevanceModel};

const DEFAULT_URL: &str = "http://localhost:8080";
const DEFAULT_MODEL: &str = "distilbert-base-uncased";
const DEFAULT_MAX_INPUT_CHARS: usize = 400;
const DEFAULT_SCORE_SCALE: f32 = 1.2;
const DEFAULT_NAME_BOOST: f32 = 0.2;
const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Relevance model backed by a sequence-classification inference server.
///
/// Sends `POST {base_url}/predict` and turns the most confident label probability into a
/// relevance score, nudged upward when the entity name appears in the text.
#[derive(Debug, Clone)]
pub struct HttpRelevanceModel {
  client: reqwest::Client,
  base_url: String,
  model: String,
  max_input_chars: usize,
  score_scale: f32,
  name_boost: f32,
  /// Deadline for one `/predict` round trip
  request_timeout: Duration,
}

impl Default for HttpRelevanceModel {
  fn default() -> Self {
    Self::new()
  }
}

#[derive(Debug, Serialize)]
struct PredictRequest<'a> {
  inputs: &'a str,
  truncate: bool,
}

#[derive(Debug, Deserialize)]
struct Prediction {
  #[allow(dead_code)]
  label: String,
  score: f32,
}

impl HttpRelevanceModel {
  pub fn new() -> Self {
    Self {
      client: reqwest::Client::new(),
      base_url: DEFAULT_URL.to_string(),
      model: DEFAULT_MODEL.to_string(),
      max_input_chars: DEFAULT_MAX_INPUT_CHARS,
      score_scale: DEFAULT_SCORE_SCALE,
      name_boost: DEFAULT_NAME_BOOST,
      request_timeout: DEFAULT_REQUEST_TIMEOUT,
    }
  }

  pub fn from_config(config: &RelevanceConfig) -> Result<Self, RelevanceError> {
    if config.url.trim().is_empty() {
      return Err(RelevanceError::ProviderError("no inference server url configured".to_string()));
    }

    debug!(
      url = %config.url,
      model = %config.model,
      max_input_chars = config.max_input_chars,
      timeout_secs = config.request_timeout_secs,
      "HTTP relevance model initialized"
    );

    Ok(
      Self::new()
        .with_url(config.url.trim_end_matches('/'))
        .with_model(&config.model)
        .with_scoring(config.max_input_chars, config.score_scale, config.name_boost)
        .with_timeout(Duration::from_secs(config.request_timeout_secs.max(1))),
    )
  }

  pub fn with_url(mut self, url: impl Into<String>) -> Self {
    self.base_url = url.into();
    self
  }

  pub fn with_model(mut self, model: impl Into<String>) -> Self {
    self.model = model.into();
    self
  }

  pub fn with_scoring(mut self, max_input_chars: usize, score_scale: f32, name_boost: f32) -> Self {
    self.max_input_chars = max_input_chars.max(1);
    self.score_scale = score_scale;
    self.name_boost = name_boost.clamp(0.0, 1.0);
    self
  }

  pub fn with_timeout(mut self, timeout: Duration) -> Self {
    self.request_timeout = timeout;
    self
  }

  fn predict_url(&self) -> String {
    format!("{}/predict", self.base_url)
  }

  fn health_url(&self) -> String {
    format!("{}/health", self.base_url)
  }

  /// Turn label probabilities into a relevance score in [0, 1]
  fn score_from_predictions(&self, predictions: &[Prediction], text: &str, entity_name: &str) -> f32 {
    let top = predictions.iter().map(|p| p.score).fold(0.0_f32, f32::max);
    let mut score = (top * self.score_scale).clamp(0.0, 1.0);

    if !entity_name.is_empty() && text.to_lowercase().contains(&entity_name.to_lowercase()) {
      score = (score + self.name_boost).min(1.0);
    }

    score
  }
}

/// Cut `text` to at most `max_chars` characters without splitting a code point
pub fn truncate_chars(text: &str, max_chars: usize) -> &str {
  match text.char_indices().nth(max_chars) {
    Some((idx, _)) => &text[..idx],
    None => text,
  }
}

fn map_send_error(err: reqwest::Error) -> RelevanceError {
  if err.is_timeout() {
    RelevanceError::Timeout
  } else if err.is_connect() {
    RelevanceError::Network(err.to_string())
  } else {
    RelevanceError::Request(err)
  }
}

#[async_trait]
impl RelevanceModel for HttpRelevanceModel {
  fn name(&self) -> &str {
    "http"
  }

  fn model_id(&self) -> &str {
    &self.model
  }

  #[tracing::instrument(level = "trace", skip(self, text), fields(text_len = text.len()))]
  async fn score_relevance(&self, text: &str, entity_name: &str) -> Result<f32, RelevanceError> {
    let input = truncate_chars(text, self.max_input_chars);
    let request = PredictRequest {
      inputs: input,
      truncate: true,
    };

    trace!(input_chars = input.chars().count(), model = %self.model, "Sending relevance request");
    let start = Instant::now();

    let response = self
      .client
      .post(self.predict_url())
      .timeout(self.request_timeout)
      .json(&request)
      .send()
      .await
      .map_err(map_send_error)?;

    if !response.status().is_success() {
      let status = response.status();
      let body = response.text().await.unwrap_or_default();
      warn!(status = %status, model = %self.model, "Relevance request failed");
      return Err(RelevanceError::ProviderError(format!(
        "Inference server returned {}: {}",
        status, body
      )));
    }

    let predictions: Vec<Prediction> = response.json().await?;
    if predictions.is_empty() {
      return Err(RelevanceError::ProviderError("empty prediction list".to_string()));
    }

    let score = self.score_from_predictions(&predictions, text, entity_name);
    trace!(
      score,
      labels = predictions.len(),
      elapsed_ms = start.elapsed().as_millis(),
      "Relevance scored"
    );

    Ok(score)
  }

  async fn is_available(&self) -> bool {
    match self
      .client
      .get(self.health_url())
      .timeout(std::time::Duration::from_secs(5))
      .send()
      .await
    {
      Ok(response) => response.status().is_success(),
      Err(_) => false,
    }
  }
}
