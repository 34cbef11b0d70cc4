//! Per-entity compiled matchers built from the entity catalog.
//!
//! A [`PatternIndex`] is immutable once built. Catalog changes produce a whole new index,
//! published through [`crate::snapshot::SharedIndex`].

use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::{Arc, LazyLock};

use newsrel_core::{EntityId, EntityRecord};
use regex::{Regex, RegexBuilder, RegexSet, RegexSetBuilder};
use tracing::{debug, info, warn};

use crate::curated;

static LEGAL_SUFFIX_RE: LazyLock<Regex> = LazyLock::new(|| {
  Regex::new(r"(?i),?\s+(?:Inc|Corp|Corporation|Company|Co|Ltd|LLC|Class\s+[A-Z])\b.*$").unwrap()
});

static GENERIC_EXCLUSIONS: LazyLock<Arc<RegexSet>> =
  LazyLock::new(|| Arc::new(exclusion_set(curated::GENERIC_EXCLUSIONS).unwrap()));

static ENTITY_EXCLUSIONS: LazyLock<HashMap<&'static str, Arc<RegexSet>>> = LazyLock::new(|| {
  curated::symbols_with_exclusions()
    .map(|symbol| (symbol, Arc::new(exclusion_set(curated::entity_exclusions(symbol)).unwrap())))
    .collect()
});

fn exclusion_set(patterns: &[&str]) -> Result<RegexSet, regex::Error> {
  RegexSetBuilder::new(patterns).case_insensitive(true).build()
}

/// `display_name` without a trailing legal suffix ("Inc", "Corp", "Class A", ...)
pub fn base_name(display_name: &str) -> String {
  LEGAL_SUFFIX_RE.replace(display_name.trim(), "").trim().to_string()
}

fn is_word_char(c: char) -> bool {
  c.is_alphanumeric() || c == '_'
}

/// Escaped term with word boundaries on the sides that start or end in a word character
fn term_pattern(term: &str) -> String {
  let lead = if term.starts_with(is_word_char) { r"\b" } else { "" };
  let trail = if term.ends_with(is_word_char) { r"\b" } else { "" };
  format!("{lead}{}{trail}", regex::escape(term))
}

/// Case-insensitive alternation over `terms`; `None` when there is nothing to match
fn compile_alternation(terms: &[String]) -> Option<Regex> {
  compile_terms(terms, true)
}

fn compile_terms(terms: &[String], case_insensitive: bool) -> Option<Regex> {
  if terms.is_empty() {
    return None;
  }

  let alternation = terms.iter().map(|t| term_pattern(t)).collect::<Vec<_>>().join("|");
  match RegexBuilder::new(&alternation).case_insensitive(case_insensitive).build() {
    Ok(re) => Some(re),
    Err(e) => {
      warn!(err = %e, terms = terms.len(), "Failed to compile matcher, entity will never match");
      None
    }
  }
}

/// Dedupe case-insensitively, keeping first spelling; drop terms of 2 chars or fewer
fn usable_terms<'a>(candidates: impl IntoIterator<Item = &'a str>) -> Vec<String> {
  let mut seen = HashSet::new();
  let mut terms: Vec<String> = candidates
    .into_iter()
    .map(str::trim)
    .filter(|t| t.chars().count() > 2)
    .filter(|t| seen.insert(t.to_lowercase()))
    .map(str::to_string)
    .collect();

  // longest first so "Apple Inc." wins over "Apple" at the same position
  terms.sort_by(|a, b| b.chars().count().cmp(&a.chars().count()).then_with(|| a.cmp(b)));
  terms
}

/// Everything the scorer needs to know about one entity.
#[derive(Debug, Clone)]
pub struct EntityProfile {
  pub id: EntityId,
  pub symbol: String,
  pub display_name: String,
  pub base_name: String,
  pub aliases: Vec<String>,
  terms: Vec<String>,
  matcher: Option<Regex>,
  symbol_matcher: Option<Regex>,
  name_matcher: Option<Regex>,
  specific_exclusions: Option<Arc<RegexSet>>,
  generic_exclusions: Arc<RegexSet>,
}

impl EntityProfile {
  pub fn build(record: &EntityRecord) -> Self {
    let symbol = record.symbol.trim().to_uppercase();
    let display_name = record.display_name.trim().to_string();
    let base_name = base_name(&display_name);

    let mut aliases: Vec<String> = curated::known_aliases(&symbol).iter().map(|a| a.to_string()).collect();
    if base_name != display_name && base_name.chars().count() > 3 && !aliases.contains(&base_name) {
      aliases.push(base_name.clone());
    }

    let terms = usable_terms(
      [symbol.as_str(), display_name.as_str(), base_name.as_str()]
        .into_iter()
        .chain(aliases.iter().map(String::as_str)),
    );

    let matcher = compile_alternation(&terms);
    let symbol_matcher = single_term(&symbol);
    let name_matcher = compile_alternation(&name_terms(&display_name, &base_name));

    Self {
      id: record.id,
      specific_exclusions: ENTITY_EXCLUSIONS.get(symbol.as_str()).cloned(),
      generic_exclusions: Arc::clone(&GENERIC_EXCLUSIONS),
      symbol,
      display_name,
      base_name,
      aliases,
      terms,
      matcher,
      symbol_matcher,
      name_matcher,
    }
  }

  /// Terms the matcher alternates over, longest first
  pub fn terms(&self) -> &[String] {
    &self.terms
  }

  pub fn has_matcher(&self) -> bool {
    self.matcher.is_some()
  }

  /// Non-overlapping matcher hits in `text`
  pub fn count_matches(&self, text: &str) -> usize {
    self.matcher.as_ref().map_or(0, |m| m.find_iter(text).count())
  }

  /// Symbol present as a whole word
  pub fn mentions_symbol(&self, text: &str) -> bool {
    self.symbol_matcher.as_ref().is_some_and(|m| m.is_match(text))
  }

  /// Display name, or its suffix-stripped base name, present as a whole phrase
  pub fn mentions_name(&self, text: &str) -> bool {
    self.name_matcher.as_ref().is_some_and(|m| m.is_match(text))
  }

  /// The first exclusion pattern that fires on `text`, if any
  pub fn exclusion_hit(&self, text: &str) -> Option<&str> {
    let specific = self.specific_exclusions.as_deref().into_iter();
    specific.chain(std::iter::once(self.generic_exclusions.as_ref())).find_map(|set| {
      set
        .matches(text)
        .iter()
        .next()
        .map(|idx| set.patterns()[idx].as_str())
    })
  }

  pub fn is_excluded(&self, text: &str) -> bool {
    self.exclusion_hit(text).is_some()
  }

  /// All exclusion patterns, entity-specific first
  pub fn exclusion_phrases(&self) -> impl Iterator<Item = &str> {
    self
      .specific_exclusions
      .iter()
      .flat_map(|set| set.patterns())
      .chain(self.generic_exclusions.patterns())
      .map(String::as_str)
  }
}

/// Symbols this short only count when written in capitals
const CASE_SENSITIVE_SYMBOL_LEN: usize = 2;

/// Whole-word check for the symbol alone, even one too short to be a matcher term
fn single_term(symbol: &str) -> Option<Regex> {
  if symbol.is_empty() {
    return None;
  }
  // "don't" and "isn't" leave a stray "t" word
  let case_insensitive = symbol.chars().count() > CASE_SENSITIVE_SYMBOL_LEN;
  compile_terms(&[symbol.to_string()], case_insensitive)
}

fn name_terms(display_name: &str, base_name: &str) -> Vec<String> {
  let mut names = vec![display_name.to_string()];
  if !base_name.is_empty() && !base_name.eq_ignore_ascii_case(display_name) {
    names.push(base_name.to_string());
  }
  names.retain(|n| !n.is_empty());
  names
}

/// Compiled profiles for a catalog snapshot, keyed and iterated by entity id.
#[derive(Debug, Clone, Default)]
pub struct PatternIndex {
  profiles: BTreeMap<EntityId, EntityProfile>,
}

impl PatternIndex {
  pub fn empty() -> Self {
    Self::default()
  }

  /// Build profiles for every record. A later duplicate id replaces the earlier one.
  pub fn build(entities: &[EntityRecord]) -> Self {
    let mut profiles = BTreeMap::new();
    let mut unmatchable = 0usize;

    for record in entities {
      let profile = EntityProfile::build(record);
      if !profile.has_matcher() {
        unmatchable += 1;
        debug!(id = %record.id, symbol = %profile.symbol, "Entity has no usable terms");
      }
      if profiles.insert(record.id, profile).is_some() {
        warn!(id = %record.id, "Duplicate entity id in catalog, keeping the last record");
      }
    }

    info!(entities = profiles.len(), unmatchable, "Pattern index built");
    Self { profiles }
  }

  pub fn len(&self) -> usize {
    self.profiles.len()
  }

  pub fn is_empty(&self) -> bool {
    self.profiles.is_empty()
  }

  pub fn get(&self, id: EntityId) -> Option<&EntityProfile> {
    self.profiles.get(&id)
  }

  pub fn ids(&self) -> impl Iterator<Item = EntityId> + '_ {
    self.profiles.keys().copied()
  }

  /// Profiles in ascending id order
  pub fn profiles(&self) -> impl Iterator<Item = &EntityProfile> {
    self.profiles.values()
  }
}
