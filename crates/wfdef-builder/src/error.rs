use thiserror::Error;

use crate::failure::LoadFailure;

/// Errors surfaced to the caller of a builder.
///
/// Lenient builders record failures instead of returning them, so the only
/// error is the strict-mode abort.
#[derive(Debug, Error)]
pub enum LoadError {
  /// Strict mode stopped at the first field that failed to load.
  #[error("load aborted: {0}")]
  Aborted(#[source] LoadFailure),
}

impl LoadError {
  pub fn failure(&self) -> &LoadFailure {
    match self {
      LoadError::Aborted(failure) => failure,
    }
  }
}
