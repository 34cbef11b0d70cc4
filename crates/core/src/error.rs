use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
  #[error("Validation: {0}")]
  Validation(String),

  #[error("Config: {0}")]
  Config(String),

  #[error("Parse: {0}")]
  Parse(String),

  #[error("IO: {0}")]
  Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
