//! Snippet cleaning for scraped article content.
//!
//! Feed snippets arrive as HTML fragments full of links, entity soup and trailing source
//! credits. [`ContentSanitizer::clean`] reduces them to plain prose and rejects whatever is
//! left too thin to classify on (an empty string means rejected).

use std::collections::HashSet;
use std::sync::LazyLock;

use newsrel_core::SanitizerConfig;
use regex::{Captures, Regex};
use tracing::trace;

static SCRIPT_STYLE_RE: LazyLock<Regex> =
  LazyLock::new(|| Regex::new(r"(?is)<script\b.*?</script\s*>|<style\b.*?</style\s*>").unwrap());

// Inline formatting can sit inside a word ("<b>Nv</b>idia"), so it leaves no gap
static INLINE_TAG_RE: LazyLock<Regex> = LazyLock::new(|| {
  Regex::new(r"(?i)</?(?:a|b|i|u|em|strong|span|font|sup|sub|small|mark)\b[^>]*>").unwrap()
});

static TAG_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"<[^>]*>").unwrap());

static ENTITY_RE: LazyLock<Regex> =
  LazyLock::new(|| Regex::new(r"&(#[0-9]{1,7}|#[xX][0-9a-fA-F]{1,6}|[a-zA-Z][a-zA-Z0-9]{1,31});").unwrap());

static URL_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r#"(?i)https?://[^\s<>"]+|www\.[^\s<>"]+"#).unwrap());

static ATTRIBUTE_RE: LazyLock<Regex> =
  LazyLock::new(|| Regex::new(r#"(?i)target\s*=\s*["']_blank["']|color\s*=\s*["'][^"']*["']"#).unwrap());

static ENTITY_REMNANT_RE: LazyLock<Regex> =
  LazyLock::new(|| Regex::new(r"&#[0-9]+;|&#[xX][0-9a-fA-F]+;|&[a-zA-Z]+;").unwrap());

// A bare hyphen needs a space in front so "Coca-Cola Beats Estimates" keeps its name
static DASH_ATTRIBUTION_RE: LazyLock<Regex> =
  LazyLock::new(|| Regex::new(r"(?:\s+-|\s*[–—])\s*[A-Z][a-zA-Z\s]+$").unwrap());

static PAREN_ATTRIBUTION_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s*\([A-Z][A-Za-z\s]+\)$").unwrap());

/// Named entities seen in news feeds. Anything else is dropped as a remnant.
const NAMED_ENTITIES: &[(&str, &str)] = &[
  ("amp", "&"),
  ("lt", "<"),
  ("gt", ">"),
  ("quot", "\""),
  ("apos", "'"),
  ("nbsp", "\u{a0}"),
  ("ndash", "–"),
  ("mdash", "—"),
  ("hellip", "…"),
  ("lsquo", "‘"),
  ("rsquo", "’"),
  ("ldquo", "“"),
  ("rdquo", "”"),
  ("laquo", "«"),
  ("raquo", "»"),
  ("bull", "•"),
  ("middot", "·"),
  ("copy", "©"),
  ("reg", "®"),
  ("trade", "™"),
  ("euro", "€"),
  ("pound", "£"),
  ("yen", "¥"),
  ("cent", "¢"),
];

/// Decode numeric and common named character references, leaving unknown ones in place
pub fn decode_entities(text: &str) -> String {
  ENTITY_RE
    .replace_all(text, |caps: &Captures| {
      let body = &caps[1];
      let decoded = if let Some(hex) = body.strip_prefix("#x").or_else(|| body.strip_prefix("#X")) {
        u32::from_str_radix(hex, 16).ok().and_then(char::from_u32).map(String::from)
      } else if let Some(dec) = body.strip_prefix('#') {
        dec.parse::<u32>().ok().and_then(char::from_u32).map(String::from)
      } else {
        NAMED_ENTITIES
          .iter()
          .find(|(name, _)| *name == body)
          .map(|(_, value)| value.to_string())
      };
      decoded.unwrap_or_else(|| caps[0].to_string())
    })
    .into_owned()
}

/// Lower-cased word set with surrounding punctuation trimmed
fn word_set(text: &str) -> HashSet<String> {
  text
    .split_whitespace()
    .map(|w| w.trim_matches(|c: char| !c.is_alphanumeric()).to_lowercase())
    .filter(|w| !w.is_empty())
    .collect()
}

/// Cleans raw snippets into classifiable text.
#[derive(Debug, Clone, Default)]
pub struct ContentSanitizer {
  config: SanitizerConfig,
}

impl ContentSanitizer {
  pub fn new(config: SanitizerConfig) -> Self {
    Self { config }
  }

  pub fn config(&self) -> &SanitizerConfig {
    &self.config
  }

  /// Clean `raw_snippet`, returning an empty string when it is rejected.
  ///
  /// `title` is only used by the headline-repetition filter. Never fails.
  pub fn clean(&self, raw_snippet: &str, title: &str) -> String {
    if raw_snippet.trim().is_empty() {
      return String::new();
    }

    let text = SCRIPT_STYLE_RE.replace_all(raw_snippet, " ");
    let text = INLINE_TAG_RE.replace_all(&text, "");
    let text = TAG_RE.replace_all(&text, " ");
    let text = decode_entities(&text);
    let text = URL_RE.replace_all(&text, "");
    let text = ATTRIBUTE_RE.replace_all(&text, "");
    let text = ENTITY_REMNANT_RE.replace_all(&text, " ");

    let text = text.trim();
    let text = DASH_ATTRIBUTION_RE.replace(text, "");
    let text = PAREN_ATTRIBUTION_RE.replace(&text, "");

    let words: Vec<&str> = text.split_whitespace().collect();
    if words.len() < self.config.min_words {
      trace!(words = words.len(), min_words = self.config.min_words, "Snippet rejected as too short");
      return String::new();
    }

    let cleaned = words.join(" ");

    if words.len() < self.config.title_repeat_max_words {
      let ratio = self.title_overlap(title, &cleaned);
      if ratio > self.config.title_repeat_ratio {
        trace!(ratio, words = words.len(), "Snippet rejected as repeated headline");
        return String::new();
      }
    }

    cleaned
  }

  /// Share of the title's distinct words that also occur in `text`
  fn title_overlap(&self, title: &str, text: &str) -> f32 {
    let title_words = word_set(title);
    if title_words.is_empty() {
      return 0.0;
    }

    let text_words = word_set(text);
    let shared = title_words.iter().filter(|w| text_words.contains(*w)).count();
    shared as f32 / title_words.len() as f32
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use pretty_assertions::assert_eq;

  fn clean(raw: &str, title: &str) -> String {
    ContentSanitizer::default().clean(raw, title)
  }

  #[test]
  fn test_plain_text_is_only_whitespace_normalized() {
    let raw = "  Microsoft expands its   cloud\tbusiness in Europe this quarter ";
    assert_eq!(
      clean(raw, "Unrelated headline"),
      "Microsoft expands its cloud business in Europe this quarter"
    );
  }

  #[test]
  fn test_empty_input_is_rejected() {
    assert_eq!(clean("", "Title"), "");
    assert_eq!(clean("   \n ", "Title"), "");
  }

  #[test]
  fn test_too_few_words_is_rejected() {
    assert_eq!(clean("Four words only here", "Title"), "");
  }

  #[test]
  fn test_markup_and_links_are_removed() {
    let raw = r#"<p>Nvidia shares <b>climbed</b> after the <a href="https://example.com/x" target="_blank">chipmaker</a> raised guidance, see www.example.com/more for details</p>"#;
    assert_eq!(
      clean(raw, "Nvidia raises guidance"),
      "Nvidia shares climbed after the chipmaker raised guidance, see for details"
    );
  }

  #[test]
  fn test_inline_markup_inside_a_word_is_joined() {
    let raw = "<p><b>Nv</b>idia and <span class=\"x\">Micro</span>soft expand their partnership</p><br>Shares rose";
    assert_eq!(
      clean(raw, "Chip alliance"),
      "Nvidia and Microsoft expand their partnership Shares rose"
    );

    let raw = "Apple<br/>shares rose after the<div>iPhone</div>launch event";
    assert_eq!(clean(raw, "Tech roundup"), "Apple shares rose after the iPhone launch event");
  }

  #[test]
  fn test_script_content_is_not_visible_text() {
    let raw = "<script>var tracking = 1;</script>Tesla delivered more vehicles than analysts expected";
    assert_eq!(
      clean(raw, "Deliveries"),
      "Tesla delivered more vehicles than analysts expected"
    );
  }

  #[test]
  fn test_entities_are_decoded() {
    let raw = "Procter &amp; Gamble said it&#39;s raising prices &ldquo;modestly&rdquo; next year";
    assert_eq!(
      clean(raw, "Prices"),
      "Procter & Gamble said it's raising prices “modestly” next year"
    );
  }

  #[test]
  fn test_entity_remnants_are_dropped() {
    let raw = "Costco membership fees rise&amp;nbsp;for the first time&bogus; since 2017";
    assert_eq!(clean(raw, "Costco"), "Costco membership fees rise for the first time since 2017");
  }

  #[test]
  fn test_decode_entities_numeric_forms() {
    assert_eq!(decode_entities("&#65;&#x42;&#X43;"), "ABC");
    assert_eq!(decode_entities("&unknown;"), "&unknown;");
    assert_eq!(decode_entities("a &nbsp b"), "a &nbsp b");
  }

  #[test]
  fn test_dash_attribution_is_stripped() {
    let raw = "Boeing cut its delivery forecast for the year - The Wall Street Journal";
    assert_eq!(clean(raw, "Aerospace outlook"), "Boeing cut its delivery forecast for the year");

    let raw = "Boeing cut its delivery forecast for the year — Reuters";
    assert_eq!(clean(raw, "Aerospace outlook"), "Boeing cut its delivery forecast for the year");
  }

  #[test]
  fn test_paren_attribution_is_stripped() {
    let raw = "Walmart posts stronger grocery sales across stores (Associated Press)";
    assert_eq!(clean(raw, "Retail roundup"), "Walmart posts stronger grocery sales across stores");
  }

  #[test]
  fn test_hyphenated_names_survive() {
    let raw = "Quarterly results at Coca-Cola Beat Street Estimates";
    assert_eq!(clean(raw, "Beverage news"), "Quarterly results at Coca-Cola Beat Street Estimates");
  }

  #[test]
  fn test_markup_only_snippet_is_rejected() {
    let raw = r##"<a href="https://x">Headline</a>&nbsp;&nbsp;<font color="#666">Source</font>"##;
    assert_eq!(clean(raw, "Headline"), "");
  }

  #[test]
  fn test_repeated_headline_is_rejected() {
    assert_eq!(clean("Revenue Revenue Revenue Revenue", "Revenue Revenue Revenue Revenue"), "");

    let title = "Apple shares jump after strong earnings report";
    assert_eq!(clean(title, title), "");
  }

  #[test]
  fn test_long_snippet_sharing_title_words_is_kept() {
    let title = "Apple shares jump";
    let raw = "Apple shares jump as investors cheer record services revenue and a bigger buyback";
    assert_eq!(clean(raw, title), raw);
  }

  #[test]
  fn test_custom_thresholds() {
    let sanitizer = ContentSanitizer::new(SanitizerConfig {
      min_words: 2,
      ..Default::default()
    });
    assert_eq!(sanitizer.clean("Oracle rallies", "Cloud deal"), "Oracle rallies");
  }
}
