//! CLI command implementations

mod clean;
mod config;
mod process;

pub use clean::cmd_clean;
pub use config::{cmd_config_init, cmd_config_show, load_config};
pub use process::cmd_classify;
