//! Retry and timeout handling around a [`RelevanceModel`].
//!
//! Inference servers behind a load balancer shed load with 429 and 50x responses. Those,
//! network errors and per-call timeouts are retried with capped exponential backoff; any
//! other failure is returned on the first attempt.

use std::time::Duration;

use async_trait::async_trait;
use newsrel_core::RelevanceConfig;
use tracing::{debug, info, warn};

use crate::{RelevanceError, RelevanceModel};

/// Provider error fragments that mark a transient server-side condition
const TRANSIENT_STATUSES: &[&str] = &["429", "502", "503", "504"];

/// Upper bound on the random stretch applied to each backoff
const JITTER_RATIO: f64 = 0.25;

#[derive(Debug, Clone)]
pub struct RetryConfig {
  /// Retries after the first attempt
  pub max_retries: u32,
  pub initial_backoff: Duration,
  /// Cap on any single wait, jitter included
  pub max_backoff: Duration,
  pub backoff_multiplier: f64,
  pub add_jitter: bool,
  /// Deadline for one call to the wrapped model
  pub request_timeout: Duration,
}

impl Default for RetryConfig {
  fn default() -> Self {
    Self {
      max_retries: 3,
      initial_backoff: Duration::from_secs(1),
      max_backoff: Duration::from_secs(30),
      backoff_multiplier: 2.0,
      add_jitter: true,
      request_timeout: Duration::from_secs(60),
    }
  }
}

impl RetryConfig {
  /// Short waits for an inference server on the same host or network
  pub fn for_local() -> Self {
    Self {
      max_retries: 2,
      initial_backoff: Duration::from_millis(250),
      max_backoff: Duration::from_secs(5),
      backoff_multiplier: 2.0,
      add_jitter: true,
      request_timeout: Duration::from_secs(30),
    }
  }

  pub fn from_relevance_config(config: &RelevanceConfig) -> Self {
    Self {
      max_retries: config.max_retries,
      request_timeout: Duration::from_secs(config.request_timeout_secs.max(1)),
      ..Self::for_local()
    }
  }

  /// Wait before retry number `attempt + 1`
  pub fn backoff_for_attempt(&self, attempt: u32) -> Duration {
    let cap = self.max_backoff.as_secs_f64();
    let exponent = i32::try_from(attempt).unwrap_or(i32::MAX);
    let mut secs = (self.initial_backoff.as_secs_f64() * self.backoff_multiplier.powi(exponent)).min(cap);

    if self.add_jitter {
      secs *= 1.0 + jitter_fraction() * JITTER_RATIO;
    }

    Duration::from_secs_f64(secs.min(cap))
  }
}

/// A value in [0, 1) from the clock's sub-second part
fn jitter_fraction() -> f64 {
  let nanos = std::time::SystemTime::now()
    .duration_since(std::time::UNIX_EPOCH)
    .map(|d| d.subsec_nanos())
    .unwrap_or(0);
  f64::from(nanos) / 1_000_000_000.0
}

/// Whether a failed model call is worth repeating
pub fn is_retryable_error(error: &RelevanceError) -> bool {
  match error {
    RelevanceError::Network(_) | RelevanceError::Timeout => true,
    RelevanceError::ProviderError(msg) => TRANSIENT_STATUSES.iter().any(|status| msg.contains(status)),
    _ => false,
  }
}

/// Wraps a model so each call gets a deadline and transient failures are retried
pub struct ResilientModel<M: RelevanceModel> {
  inner: M,
  config: RetryConfig,
}

impl<M: RelevanceModel> ResilientModel<M> {
  pub fn new(model: M) -> Self {
    Self::with_config(model, RetryConfig::default())
  }

  pub fn with_config(model: M, config: RetryConfig) -> Self {
    Self { inner: model, config }
  }

  pub fn config(&self) -> &RetryConfig {
    &self.config
  }

  async fn attempt(&self, text: &str, entity_name: &str) -> Result<f32, RelevanceError> {
    tokio::time::timeout(self.config.request_timeout, self.inner.score_relevance(text, entity_name))
      .await
      .unwrap_or(Err(RelevanceError::Timeout))
  }

  async fn score_with_retry(&self, text: &str, entity_name: &str) -> Result<f32, RelevanceError> {
    let max_retries = self.config.max_retries;
    let mut attempt = 0;

    loop {
      match self.attempt(text, entity_name).await {
        Ok(score) => {
          if attempt > 0 {
            info!(attempt, entity = entity_name, "Relevance call succeeded after retry");
          }
          return Ok(score);
        }
        Err(e) if attempt < max_retries && is_retryable_error(&e) => {
          let backoff = self.config.backoff_for_attempt(attempt);
          attempt += 1;
          warn!(attempt, max_retries, err = %e, "Transient relevance failure");
          debug!(backoff_ms = backoff.as_millis(), entity = entity_name, "Backing off before retry");
          tokio::time::sleep(backoff).await;
        }
        Err(e) => {
          if attempt > 0 {
            warn!(attempts = attempt + 1, err = %e, entity = entity_name, "Giving up on relevance call");
          }
          return Err(e);
        }
      }
    }
  }
}

#[async_trait]
impl<M: RelevanceModel> RelevanceModel for ResilientModel<M> {
  fn name(&self) -> &str {
    self.inner.name()
  }

  fn model_id(&self) -> &str {
    self.inner.model_id()
  }

  async fn score_relevance(&self, text: &str, entity_name: &str) -> Result<f32, RelevanceError> {
    self.score_with_retry(text, entity_name).await
  }

  async fn is_available(&self) -> bool {
    self.inner.is_available().await
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use std::sync::atomic::{AtomicUsize, Ordering};

  fn no_jitter(initial: Duration, multiplier: f64, max: Duration) -> RetryConfig {
    RetryConfig {
      initial_backoff: initial,
      backoff_multiplier: multiplier,
      max_backoff: max,
      add_jitter: false,
      ..Default::default()
    }
  }

  #[test]
  fn test_config_from_relevance_section() {
    let relevance = RelevanceConfig {
      max_retries: 5,
      request_timeout_secs: 7,
      ..Default::default()
    };
    let config = RetryConfig::from_relevance_config(&relevance);
    assert_eq!(config.max_retries, 5);
    assert_eq!(config.request_timeout, Duration::from_secs(7));
    assert_eq!(config.initial_backoff, RetryConfig::for_local().initial_backoff);
  }

  #[test]
  fn test_backoff_doubles_then_caps() {
    let config = no_jitter(Duration::from_millis(250), 2.0, Duration::from_secs(1));
    let waits: Vec<u128> = (0..5).map(|a| config.backoff_for_attempt(a).as_millis()).collect();
    assert_eq!(waits, vec![250, 500, 1000, 1000, 1000]);
  }

  #[test]
  fn test_jitter_stays_within_cap() {
    let config = RetryConfig::for_local();
    for attempt in 0..10 {
      let backoff = config.backoff_for_attempt(attempt);
      assert!(backoff >= config.initial_backoff.min(config.max_backoff));
      assert!(backoff <= config.max_backoff);
    }
  }

  #[test]
  fn test_retryable_classification() {
    assert!(is_retryable_error(&RelevanceError::Network("connection reset".to_string())));
    assert!(is_retryable_error(&RelevanceError::Timeout));
    assert!(is_retryable_error(&RelevanceError::ProviderError(
      "Inference server returned 429 Too Many Requests".to_string()
    )));
    assert!(is_retryable_error(&RelevanceError::ProviderError("upstream 503".to_string())));
    assert!(!is_retryable_error(&RelevanceError::ProviderError(
      "Inference server returned 422".to_string()
    )));
    assert!(!is_retryable_error(&RelevanceError::InvalidScore(2.0)));
    assert!(!is_retryable_error(&RelevanceError::NotAvailable));
  }

  /// Fails the first `failures` calls, then scores 0.9
  struct FlakyModel {
    calls: AtomicUsize,
    failures: usize,
    error: fn() -> RelevanceError,
  }

  impl FlakyModel {
    fn new(failures: usize, error: fn() -> RelevanceError) -> Self {
      Self {
        calls: AtomicUsize::new(0),
        failures,
        error,
      }
    }

    fn calls(&self) -> usize {
      self.calls.load(Ordering::SeqCst)
    }
  }

  #[async_trait]
  impl RelevanceModel for FlakyModel {
    fn name(&self) -> &str {
      "flaky"
    }

    fn model_id(&self) -> &str {
      "flaky-classifier"
    }

    async fn score_relevance(&self, _text: &str, _entity_name: &str) -> Result<f32, RelevanceError> {
      if self.calls.fetch_add(1, Ordering::SeqCst) < self.failures {
        return Err((self.error)());
      }
      Ok(0.9)
    }

    async fn is_available(&self) -> bool {
      true
    }
  }

  fn overloaded() -> RelevanceError {
    RelevanceError::ProviderError("Inference server returned 503".to_string())
  }

  fn rejected() -> RelevanceError {
    RelevanceError::ProviderError("Inference server returned 400".to_string())
  }

  fn quick(max_retries: u32) -> RetryConfig {
    RetryConfig {
      max_retries,
      request_timeout: Duration::from_secs(5),
      ..no_jitter(Duration::from_millis(1), 2.0, Duration::from_millis(4))
    }
  }

  #[tokio::test]
  async fn test_recovers_from_overload() {
    let model = ResilientModel::with_config(FlakyModel::new(2, overloaded), quick(3));

    assert_eq!(model.score_relevance("text", "Entity").await.unwrap(), 0.9);
    assert_eq!(model.inner.calls(), 3);
  }

  #[tokio::test]
  async fn test_client_error_fails_fast() {
    let model = ResilientModel::with_config(FlakyModel::new(5, rejected), quick(3));

    assert!(model.score_relevance("text", "Entity").await.is_err());
    assert_eq!(model.inner.calls(), 1);
  }

  #[tokio::test]
  async fn test_returns_last_error_when_retries_run_out() {
    let model = ResilientModel::with_config(FlakyModel::new(10, overloaded), quick(2));

    let err = model.score_relevance("text", "Entity").await.unwrap_err();
    assert!(matches!(err, RelevanceError::ProviderError(_)));
    assert_eq!(model.inner.calls(), 3);
  }

  #[tokio::test]
  async fn test_slow_model_times_out() {
    struct StalledModel;

    #[async_trait]
    impl RelevanceModel for StalledModel {
      fn name(&self) -> &str {
        "stalled"
      }

      fn model_id(&self) -> &str {
        "stalled-classifier"
      }

      async fn score_relevance(&self, _text: &str, _entity_name: &str) -> Result<f32, RelevanceError> {
        tokio::time::sleep(Duration::from_millis(200)).await;
        Ok(0.7)
      }

      async fn is_available(&self) -> bool {
        true
      }
    }

    let config = RetryConfig {
      request_timeout: Duration::from_millis(10),
      ..quick(1)
    };
    let model = ResilientModel::with_config(StalledModel, config);

    assert!(matches!(
      model.score_relevance("text", "Entity").await,
      Err(RelevanceError::Timeout)
    ));
  }
}
