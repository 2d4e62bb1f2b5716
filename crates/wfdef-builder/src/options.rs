use serde::{Deserialize, Serialize};

use crate::error::LoadError;
use crate::failure::LoadFailure;
use crate::loaded::Loaded;

/// Options shared by every builder taking part in one load.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoadOptions {
  /// Abort on the first failure instead of recording it and substituting the
  /// default.
  pub strict: bool,
}

impl LoadOptions {
  pub fn strict() -> Self {
    Self { strict: true }
  }

  /// Substitute `default` for an object that could not be built, or abort in
  /// strict mode.
  pub fn recover<D>(&self, default: D, failure: LoadFailure) -> Result<Loaded<D>, LoadError> {
    if self.strict {
      return Err(LoadError::Aborted(failure));
    }
    Ok(Loaded::substituted(default, failure))
  }
}
