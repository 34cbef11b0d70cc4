pub mod article;
pub mod classification;
pub mod config;
pub mod entity;
pub mod error;

pub use article::{Article, ArticleText, Category};
pub use classification::{ClassificationResult, EntityScores, ProcessedArticle, RelevanceCandidate};
pub use config::{
  ClassifierConfig, Config, LoggingConfig, MAX_CONCURRENT_MODEL_CALLS, ModelFailurePolicy, RelevanceConfig, RelevanceProviderKind, SanitizerConfig,
};
pub use entity::{EntityId, EntityRecord};
pub use error::{Error, Result};
