//! Snippet cleaning command

use anyhow::{Context, Result, bail};
use classify::ContentSanitizer;
use newsrel_core::Config;

/// Sanitize one snippet given on the command line or stdin
pub fn cmd_clean(config: &Config, text: Option<String>, title: &str) -> Result<()> {
  let raw = match text {
    Some(text) => text,
    None => std::io::read_to_string(std::io::stdin()).context("Failed to read snippet from stdin")?,
  };

  println!("{}", clean_snippet(config, &raw, title)?);
  Ok(())
}

fn clean_snippet(config: &Config, raw: &str, title: &str) -> Result<String> {
  let cleaned = ContentSanitizer::new(config.sanitizer.clone()).clean(raw, title);
  if cleaned.is_empty() {
    bail!(
      "Snippet rejected ({} chars): too short or repeats the title",
      raw.chars().count()
    );
  }
  Ok(cleaned)
}

#[cfg(test)]
mod tests {
  use super::*;
  use pretty_assertions::assert_eq;

  #[test]
  fn test_clean_snippet_returns_prose() {
    let cleaned = clean_snippet(
      &Config::default(),
      "<p>Netflix added more subscribers than expected</p>",
      "Streaming",
    )
    .unwrap();
    assert_eq!(cleaned, "Netflix added more subscribers than expected");
  }

  #[test]
  fn test_rejected_snippet_is_an_error() {
    let err = clean_snippet(&Config::default(), "<b>Headline</b>", "Headline").unwrap_err();
    assert!(err.to_string().contains("Snippet rejected"));
  }
}
