use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A scraped article as delivered by the article source.
///
/// Only `title` and `raw_snippet` feed classification; the remaining fields are carried
/// through untouched for the caller's persistence layer. Missing fields deserialize as empty.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Article {
  pub title: String,
  #[serde(alias = "content_snippet")]
  pub raw_snippet: String,
  pub url: String,
  pub source: String,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub published_at: Option<DateTime<Utc>>,
}

impl Article {
  pub fn new(title: impl Into<String>, raw_snippet: impl Into<String>) -> Self {
    Self {
      title: title.into(),
      raw_snippet: raw_snippet.into(),
      ..Default::default()
    }
  }
}

/// Title plus sanitized content, the text every scorer works on.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ArticleText {
  pub title: String,
  pub content: String,
}

impl ArticleText {
  pub fn new(title: impl Into<String>, content: impl Into<String>) -> Self {
    Self {
      title: title.into(),
      content: content.into(),
    }
  }

  /// `title + " " + content`, the form handed to the relevance model and categorizer.
  pub fn joined(&self) -> String {
    format!("{} {}", self.title, self.content)
  }
}

/// Topical category of an article
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
  Earnings,
  Executive,
  Legal,
  Product,
  Market,
  #[default]
  General,
}

impl Category {
  pub fn as_str(&self) -> &'static str {
    match self {
      Category::Earnings => "earnings",
      Category::Executive => "executive",
      Category::Legal => "legal",
      Category::Product => "product",
      Category::Market => "market",
      Category::General => "general",
    }
  }
}

impl fmt::Display for Category {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

impl std::str::FromStr for Category {
  type Err = String;

  fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
    match s.to_lowercase().as_str() {
      "earnings" => Ok(Category::Earnings),
      "executive" => Ok(Category::Executive),
      "legal" => Ok(Category::Legal),
      "product" => Ok(Category::Product),
      "market" => Ok(Category::Market),
      "general" => Ok(Category::General),
      _ => Err(format!("Unknown category: {}", s)),
    }
  }
}
