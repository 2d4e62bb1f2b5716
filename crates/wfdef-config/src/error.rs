use thiserror::Error;
use wfdef_builder::LoadError;

/// A JSON value that cannot be used as the value of a field.
#[derive(Debug, Error)]
pub enum ReadError {
  #[error("expected {expected}, found {found}")]
  Mismatch {
    expected: &'static str,
    found: &'static str,
  },

  #[error("{value} is out of range for {target}")]
  OutOfRange { value: String, target: &'static str },

  #[error("{found} cannot be used as a config value")]
  UnsupportedConfigValue { found: &'static str },
}

/// Errors that stop a whole document from loading.
#[derive(Debug, Error)]
pub enum DocumentError {
  /// The text is not JSON at all.
  #[error("invalid JSON: {0}")]
  Json(#[from] serde_json::Error),

  /// Strict mode aborted on a field failure.
  #[error(transparent)]
  Load(#[from] LoadError),
}
