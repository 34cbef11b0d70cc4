//! Configuration commands

use anyhow::{Context, Result, bail};
use newsrel_core::Config;
use std::path::{Path, PathBuf};

/// Resolve the effective config: explicit path, then project, then user, then defaults
pub fn load_config(explicit: Option<&Path>) -> Result<Config> {
  match explicit {
    Some(path) => Config::load_from_path(path).with_context(|| format!("Failed to load config {}", path.display())),
    None => {
      let cwd = std::env::current_dir().context("Failed to resolve working directory")?;
      Ok(Config::load_for_dir(&cwd))
    }
  }
}

/// Where the effective config came from, for display
fn config_source(explicit: Option<&Path>, cwd: &Path) -> String {
  if let Some(path) = explicit {
    return format!("Using config: {:?}", path);
  }

  let project_config = Config::project_config_path(cwd);
  if project_config.exists() {
    return format!("Using project config: {:?}", project_config);
  }

  match Config::user_config_path() {
    Some(user_path) if user_path.exists() => format!("Using user config: {:?}", user_path),
    _ => "Using default configuration (no config file found)".to_string(),
  }
}

/// Print the effective configuration as TOML
pub fn cmd_config_show(config: &Config, explicit: Option<&Path>) -> Result<()> {
  let cwd = std::env::current_dir()?;

  println!("# {}", config_source(explicit, &cwd));
  println!();
  println!("{}", toml::to_string_pretty(config)?);

  Ok(())
}

/// Print the config template, or write it to `./newsrel.toml` with `write`
pub fn cmd_config_init(write: bool) -> Result<()> {
  if !write {
    print!("{}", Config::generate_template());
    return Ok(());
  }

  let cwd = std::env::current_dir()?;
  let config_path = write_project_template(&cwd)?;
  println!("Created project config: {:?}", config_path);
  println!("Edit the file to customize settings.");

  Ok(())
}

/// Write the template as `dir`'s project config, refusing to overwrite one
fn write_project_template(dir: &Path) -> Result<PathBuf> {
  let config_path = Config::project_config_path(dir);
  if config_path.exists() {
    bail!(
      "Config file already exists: {}. Delete it first if you want to regenerate",
      config_path.display()
    );
  }

  std::fs::write(&config_path, Config::generate_template())
    .with_context(|| format!("Failed to write {}", config_path.display()))?;
  Ok(config_path)
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_explicit_config_is_loaded_and_validated() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("custom.toml");

    std::fs::write(&path, "[classifier]\nglobal_threshold = 0.55\n").unwrap();
    let config = load_config(Some(&path)).unwrap();
    assert_eq!(config.classifier.global_threshold, 0.55);

    std::fs::write(&path, "[classifier]\nglobal_threshold = 1.5\n").unwrap();
    assert!(load_config(Some(&path)).is_err());

    assert!(load_config(Some(&dir.path().join("missing.toml"))).is_err());
  }

  #[test]
  fn test_write_template_refuses_to_overwrite() {
    let dir = tempfile::tempdir().unwrap();

    let path = write_project_template(dir.path()).unwrap();
    assert_eq!(path, Config::project_config_path(dir.path()));
    assert!(Config::load_from_path(&path).is_ok());

    std::fs::write(&path, "# edited\n").unwrap();
    let err = write_project_template(dir.path()).unwrap_err();
    assert!(err.to_string().contains("already exists"));
    assert_eq!(std::fs::read_to_string(&path).unwrap(), "# edited\n");
  }

  #[test]
  fn test_config_source_prefers_explicit_and_project() {
    let dir = tempfile::tempdir().unwrap();
    let explicit = dir.path().join("x.toml");
    assert!(config_source(Some(&explicit), dir.path()).starts_with("Using config"));

    std::fs::write(Config::project_config_path(dir.path()), "").unwrap();
    assert!(config_source(None, dir.path()).starts_with("Using project config"));
  }
}
