//! Configuration for the classification pipeline.
//!
//! Config priority: explicit path > project-relative (./newsrel.toml) > user (~/.config/newsrel/config.toml) > defaults

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};

/// File name looked up in the working directory
pub const PROJECT_CONFIG_FILE: &str = "newsrel.toml";

/// Upper bound for `classifier.max_concurrent_model_calls`
pub const MAX_CONCURRENT_MODEL_CALLS: usize = 1024;

// ============================================================================
// Classifier Configuration
// ============================================================================

/// What the classifier does when the relevance model fails for one entity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ModelFailurePolicy {
  /// Substitute the neutral score and keep the entity in play
  #[default]
  Neutral,
  /// Drop the entity for this article
  Skip,
}

/// Two-stage classifier thresholds
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ClassifierConfig {
  /// Minimum linguistic score to reach the model stage (default: 0.3)
  pub cheap_filter: f32,

  /// Minimum combined score for an entity to be kept (default: 0.7)
  pub global_threshold: f32,

  /// Minimum linguistic score for an entity to be kept, regardless of model score (default: 0.5)
  pub secondary_floor: f32,

  /// Maximum entities attributed to one article (default: 3)
  pub top_k: usize,

  /// Concurrent relevance model calls per article (default: 4)
  pub max_concurrent_model_calls: usize,

  /// Behavior on a failed model call: "neutral" or "skip" (default: neutral)
  pub model_failure: ModelFailurePolicy,
}

impl Default for ClassifierConfig {
  fn default() -> Self {
    Self {
      cheap_filter: 0.3,
      global_threshold: 0.7,
      secondary_floor: 0.5,
      top_k: 3,
      max_concurrent_model_calls: 4,
      model_failure: ModelFailurePolicy::Neutral,
    }
  }
}

// ============================================================================
// Sanitizer Configuration
// ============================================================================

/// Snippet cleaning thresholds
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SanitizerConfig {
  /// Snippets with fewer words after cleaning are rejected (default: 5)
  pub min_words: usize,

  /// Share of title words found in the snippet above which it counts as a repeat (default: 0.8)
  pub title_repeat_ratio: f32,

  /// The repeat filter only applies to snippets shorter than this many words (default: 10)
  pub title_repeat_max_words: usize,
}

impl Default for SanitizerConfig {
  fn default() -> Self {
    Self {
      min_words: 5,
      title_repeat_ratio: 0.8,
      title_repeat_max_words: 10,
    }
  }
}

// ============================================================================
// Relevance Model Configuration
// ============================================================================

/// Relevance model provider options
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum RelevanceProviderKind {
  /// No model: every entity gets the neutral score
  #[default]
  None,
  /// Sequence-classification inference server over HTTP
  Http,
}

/// Relevance model configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RelevanceConfig {
  /// Which provider to use
  pub provider: RelevanceProviderKind,

  /// Inference server base URL (only used when provider = http)
  pub url: String,

  /// Model name reported in stats and sent to the server
  pub model: String,

  /// Input is truncated to this many characters before scoring (default: 400)
  pub max_input_chars: usize,

  /// Multiplier applied to the top label probability (default: 1.2)
  pub score_scale: f32,

  /// Added when the entity name appears literally in the text (default: 0.2)
  pub name_boost: f32,

  /// Wrap the provider with retries and timeouts (default: true)
  pub resilient: bool,

  /// Per-call timeout in seconds (default: 30)
  pub request_timeout_secs: u64,

  /// Retries on transient failures (default: 2)
  pub max_retries: u32,
}

impl Default for RelevanceConfig {
  fn default() -> Self {
    Self {
      provider: RelevanceProviderKind::None,
      url: "http://localhost:8080".to_string(),
      model: "distilbert-base-uncased".to_string(),
      max_input_chars: 400,
      score_scale: 1.2,
      name_boost: 0.2,
      resilient: true,
      request_timeout_secs: 30,
      max_retries: 2,
    }
  }
}

// ============================================================================
// Logging Configuration
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
  /// Log level: "error", "warn", "info", "debug", "trace" (default: info)
  pub level: String,

  /// Log file rotation: "daily", "hourly", "never" (default: daily)
  pub rotation: String,

  /// Write logs to files in this directory instead of stderr
  #[serde(skip_serializing_if = "Option::is_none")]
  pub directory: Option<String>,
}

impl Default for LoggingConfig {
  fn default() -> Self {
    Self {
      level: "info".to_string(),
      rotation: "daily".to_string(),
      directory: None,
    }
  }
}

// ============================================================================
// Main Configuration
// ============================================================================

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
  #[serde(default)]
  pub classifier: ClassifierConfig,

  #[serde(default)]
  pub sanitizer: SanitizerConfig,

  #[serde(default)]
  pub relevance: RelevanceConfig,

  #[serde(default)]
  pub logging: LoggingConfig,
}

fn check_unit(name: &str, value: f32) -> Result<()> {
  if !(0.0..=1.0).contains(&value) {
    return Err(Error::Validation(format!("{name} must be between 0.0 and 1.0, got {value}")));
  }
  Ok(())
}

impl ClassifierConfig {
  pub fn validate(&self) -> Result<()> {
    check_unit("classifier.cheap_filter", self.cheap_filter)?;
    check_unit("classifier.global_threshold", self.global_threshold)?;
    check_unit("classifier.secondary_floor", self.secondary_floor)?;
    if self.top_k == 0 {
      return Err(Error::Validation("classifier.top_k must be at least 1".to_string()));
    }
    if !(1..=MAX_CONCURRENT_MODEL_CALLS).contains(&self.max_concurrent_model_calls) {
      return Err(Error::Validation(format!(
        "classifier.max_concurrent_model_calls must be between 1 and {MAX_CONCURRENT_MODEL_CALLS}, got {}",
        self.max_concurrent_model_calls
      )));
    }
    Ok(())
  }
}

impl Config {
  /// Parse a config from TOML text and validate it
  pub fn from_toml(content: &str) -> Result<Self> {
    let config: Config = toml::from_str(content).map_err(|e| Error::Parse(e.to_string()))?;
    config.validate()?;
    Ok(config)
  }

  /// Load from an explicit path. Unlike discovery, a missing or invalid file is an error.
  pub fn load_from_path(path: &Path) -> Result<Self> {
    let content = std::fs::read_to_string(path)?;
    Self::from_toml(&content).map_err(|e| Error::Config(format!("{}: {}", path.display(), e)))
  }

  /// Discover config for a working directory, with fallback to user config, then defaults
  pub fn load_for_dir(dir: &Path) -> Self {
    let project_config = Self::project_config_path(dir);
    if project_config.exists()
      && let Ok(content) = std::fs::read_to_string(&project_config)
      && let Ok(config) = Self::from_toml(&content)
    {
      return config;
    }

    if let Some(user_config_path) = Self::user_config_path()
      && user_config_path.exists()
      && let Ok(content) = std::fs::read_to_string(&user_config_path)
      && let Ok(config) = Self::from_toml(&content)
    {
      return config;
    }

    Self::default()
  }

  /// Get the user-level config path
  pub fn user_config_path() -> Option<PathBuf> {
    if let Ok(path) = std::env::var("NEWSREL_CONFIG_DIR") {
      return Some(PathBuf::from(path).join("config.toml"));
    }

    if let Ok(path) = std::env::var("XDG_CONFIG_HOME") {
      return Some(PathBuf::from(path).join("newsrel").join("config.toml"));
    }

    dirs::config_dir().map(|p: PathBuf| p.join("newsrel").join("config.toml"))
  }

  /// Get the project-relative config path
  pub fn project_config_path(dir: &Path) -> PathBuf {
    dir.join(PROJECT_CONFIG_FILE)
  }

  pub fn validate(&self) -> Result<()> {
    self.classifier.validate()?;

    check_unit("sanitizer.title_repeat_ratio", self.sanitizer.title_repeat_ratio)?;
    if self.sanitizer.min_words == 0 {
      return Err(Error::Validation("sanitizer.min_words must be at least 1".to_string()));
    }

    check_unit("relevance.name_boost", self.relevance.name_boost)?;
    if self.relevance.score_scale <= 0.0 {
      return Err(Error::Validation("relevance.score_scale must be positive".to_string()));
    }
    if self.relevance.max_input_chars == 0 {
      return Err(Error::Validation("relevance.max_input_chars must be at least 1".to_string()));
    }
    if self.relevance.provider == RelevanceProviderKind::Http && self.relevance.url.trim().is_empty() {
      return Err(Error::Validation("relevance.url is required when provider = \"http\"".to_string()));
    }

    Ok(())
  }

  /// Generate a default config file as a string
  pub fn generate_template() -> String {
    let defaults = Config::default();
    format!(
      r#"# newsrel configuration
# Place in ./newsrel.toml (project) or ~/.config/newsrel/config.toml (user)

# ============================================================================
# Classifier
# ============================================================================
[classifier]
# Entities scoring below this linguistically never reach the relevance model
cheap_filter = {cheap_filter}
# Minimum combined score (0.6 * linguistic + 0.4 * model)
global_threshold = {global_threshold}
# Minimum linguistic score, so a high model score alone cannot rescue weak text evidence
secondary_floor = {secondary_floor}
# Maximum entities attributed to one article
top_k = {top_k}
max_concurrent_model_calls = {max_concurrent}
# "neutral" substitutes 0.5 on model failure, "skip" drops the entity for that article
model_failure = "neutral"

# ============================================================================
# Sanitizer
# ============================================================================
[sanitizer]
min_words = {min_words}
title_repeat_ratio = {title_repeat_ratio}
title_repeat_max_words = {title_repeat_max_words}

# ============================================================================
# Relevance model
# ============================================================================
[relevance]
# "none" (neutral 0.5 for every entity) or "http"
provider = "none"
url = "{url}"
model = "{model}"
max_input_chars = {max_input_chars}
score_scale = {score_scale}
name_boost = {name_boost}
resilient = true
request_timeout_secs = {request_timeout_secs}
max_retries = {max_retries}

# ============================================================================
# Logging
# ============================================================================
[logging]
level = "info"
# "daily", "hourly" or "never"; only used when directory is set
rotation = "daily"
# directory = "/var/log/newsrel"
"#,
      cheap_filter = defaults.classifier.cheap_filter,
      global_threshold = defaults.classifier.global_threshold,
      secondary_floor = defaults.classifier.secondary_floor,
      top_k = defaults.classifier.top_k,
      max_concurrent = defaults.classifier.max_concurrent_model_calls,
      min_words = defaults.sanitizer.min_words,
      title_repeat_ratio = defaults.sanitizer.title_repeat_ratio,
      title_repeat_max_words = defaults.sanitizer.title_repeat_max_words,
      url = defaults.relevance.url,
      model = defaults.relevance.model,
      max_input_chars = defaults.relevance.max_input_chars,
      score_scale = defaults.relevance.score_scale,
      name_boost = defaults.relevance.name_boost,
      request_timeout_secs = defaults.relevance.request_timeout_secs,
      max_retries = defaults.relevance.max_retries,
    )
  }
}
