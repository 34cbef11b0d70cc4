use newsrel_core::ArticleText;
use tracing::{debug, trace};

use crate::pattern::EntityProfile;

const TITLE_HIT_WEIGHT: f32 = 0.4;
const CONTENT_HIT_WEIGHT: f32 = 0.2;
const SYMBOL_BONUS: f32 = 0.3;
const NAME_BONUS: f32 = 0.3;

/// Cheap textual relevance of `text` to `profile`, in [0, 1].
///
/// An exclusion hit anywhere in title or content is a hard 0, as is text with no matcher
/// hit at all. Otherwise title hits weigh twice content hits, plus bonuses for the symbol
/// and the name appearing as whole words.
pub fn score(text: &ArticleText, profile: &EntityProfile) -> f32 {
  if !profile.has_matcher() {
    return 0.0;
  }

  let joined = text.joined();
  if let Some(pattern) = profile.exclusion_hit(&joined) {
    debug!(symbol = %profile.symbol, pattern, "Excluded by pattern");
    return 0.0;
  }

  let title_hits = profile.count_matches(&text.title);
  let content_hits = profile.count_matches(&text.content);
  if title_hits + content_hits == 0 {
    return 0.0;
  }

  let mut score = title_hits as f32 * TITLE_HIT_WEIGHT + content_hits as f32 * CONTENT_HIT_WEIGHT;
  if profile.mentions_symbol(&joined) {
    score += SYMBOL_BONUS;
  }
  if profile.mentions_name(&joined) {
    score += NAME_BONUS;
  }

  let score = score.min(1.0);
  trace!(symbol = %profile.symbol, title_hits, content_hits, score, "Linguistic score");
  score
}
