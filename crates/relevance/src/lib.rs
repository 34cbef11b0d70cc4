pub mod http;
pub mod neutral;
pub mod provider;
pub mod resilient;
pub mod scorer;

pub use http::HttpRelevanceModel;
pub use neutral::{NEUTRAL_SCORE, NeutralModel};
pub use provider::{RelevanceError, RelevanceModel};
pub use resilient::{ResilientModel, RetryConfig, is_retryable_error};
pub use scorer::RelevanceScorer;
