//! newsrel CLI - Attribute news articles to the entities they are about

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

mod commands;
mod logging;

use commands::{cmd_classify, cmd_clean, cmd_config_init, cmd_config_show, load_config};
use logging::init_logging;

#[derive(Parser)]
#[command(name = "newsrel")]
#[command(about = "Attribute news articles to the entities they are about")]
#[command(after_help = "\
QUICK START:
  newsrel config init --write                      # Create ./newsrel.toml
  newsrel clean \"<p>Snippet</p>\" --title \"Title\"   # Sanitize one snippet
  newsrel classify --catalog entities.json --articles feed.jsonl > out.jsonl")]
struct Cli {
  /// Config file (default: ./newsrel.toml, then the user config)
  #[arg(long, global = true, value_name = "FILE")]
  config: Option<PathBuf>,

  /// Log at debug level
  #[arg(short, long, global = true)]
  verbose: bool,

  #[command(subcommand)]
  command: Commands,
}

/// Subcommands for `newsrel config`
#[derive(Subcommand)]
enum ConfigCommand {
  /// Print a commented config template
  Init {
    /// Write the template to ./newsrel.toml instead of stdout
    #[arg(long)]
    write: bool,
  },
  /// Show the effective configuration
  Show,
}

#[derive(Subcommand)]
enum Commands {
  /// Sanitize a raw snippet (argument or stdin) and print the cleaned text
  Clean {
    /// Raw snippet; read from stdin when omitted
    text: Option<String>,
    /// Article title, used to reject snippets that only repeat it
    #[arg(short, long, default_value = "")]
    title: String,
  },
  /// Classify a JSON-lines article feed against an entity catalog
  Classify {
    /// JSON array of {id, symbol, display_name}
    #[arg(long, value_name = "FILE")]
    catalog: PathBuf,
    /// One article object per line, or - for stdin
    #[arg(long, value_name = "FILE")]
    articles: PathBuf,
    /// Articles classified concurrently
    #[arg(long, default_value_t = 8)]
    concurrency: usize,
    /// Override classifier.global_threshold
    #[arg(long)]
    threshold: Option<f32>,
  },
  /// Configuration management
  Config {
    #[command(subcommand)]
    command: ConfigCommand,
  },
}

#[tokio::main]
async fn main() -> Result<()> {
  let cli = Cli::parse();

  let config = load_config(cli.config.as_deref())?;
  let _guard = init_logging(&config.logging, cli.verbose);

  match cli.command {
    Commands::Clean { text, title } => cmd_clean(&config, text, &title),
    Commands::Classify {
      catalog,
      articles,
      concurrency,
      threshold,
    } => cmd_classify(&config, &catalog, &articles, concurrency, threshold).await,
    Commands::Config { command } => match command {
      ConfigCommand::Init { write } => cmd_config_init(write),
      ConfigCommand::Show => cmd_config_show(&config, cli.config.as_deref()),
    },
  }
}
