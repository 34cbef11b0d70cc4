//! Batch classification over a catalog and a JSON-lines article feed

use anyhow::{Context, Result};
use classify::{NewsProcessor, QualityReport};
use newsrel_core::{Article, Config, EntityRecord, ProcessedArticle};
use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;
use tracing::{info, warn};

/// Classify every article in `articles` against the entities in `catalog`.
///
/// Writes one `ProcessedArticle` JSON object per line to stdout, then a quality report to
/// stderr. `articles` may be `-` for stdin.
pub async fn cmd_classify(
  config: &Config,
  catalog: &Path,
  articles: &Path,
  concurrency: usize,
  threshold: Option<f32>,
) -> Result<()> {
  let entities = read_catalog(catalog)?;
  let articles = if articles == Path::new("-") {
    parse_articles(std::io::stdin().lock())?
  } else {
    let file = File::open(articles).with_context(|| format!("Failed to open articles: {}", articles.display()))?;
    parse_articles(BufReader::new(file))?
  };

  let processor = NewsProcessor::from_config(config)
    .await
    .context("Failed to set up relevance model")?;
  if let Some(threshold) = threshold {
    processor.set_global_threshold(threshold)?;
  }
  processor.update_entities(&entities);

  let stats = processor.stats();
  info!(
    entities = stats.entities_loaded,
    articles = articles.len(),
    model = stats.model_name.as_deref().unwrap_or("neutral"),
    threshold = stats.global_threshold,
    "Starting classification"
  );

  let processed = processor.process_batch(articles, concurrency).await;

  let mut out = BufWriter::new(std::io::stdout().lock());
  write_jsonl(&mut out, &processed)?;
  out.flush()?;

  let report = QualityReport::from_articles(&processed);
  eprintln!("{}", serde_json::to_string_pretty(&report)?);

  Ok(())
}

/// Load the entity catalog: a JSON array of `{id, symbol, display_name}`
pub fn read_catalog(path: &Path) -> Result<Vec<EntityRecord>> {
  let content = std::fs::read_to_string(path).with_context(|| format!("Failed to read catalog: {}", path.display()))?;
  let entities: Vec<EntityRecord> =
    serde_json::from_str(&content).with_context(|| format!("Invalid catalog JSON: {}", path.display()))?;
  Ok(entities)
}

/// Parse one article per line, skipping blank and malformed lines
pub fn parse_articles(reader: impl BufRead) -> Result<Vec<Article>> {
  let mut articles = Vec::new();

  for (idx, line) in reader.lines().enumerate() {
    let line = line.context("Failed to read articles")?;
    if line.trim().is_empty() {
      continue;
    }

    match serde_json::from_str::<Article>(&line) {
      Ok(article) => articles.push(article),
      Err(e) => warn!(line = idx + 1, err = %e, "Skipping malformed article"),
    }
  }

  Ok(articles)
}

fn write_jsonl(out: &mut impl Write, processed: &[ProcessedArticle]) -> Result<()> {
  for article in processed {
    serde_json::to_writer(&mut *out, article)?;
    writeln!(out)?;
  }
  Ok(())
}
