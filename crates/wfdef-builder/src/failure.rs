//! Load failures and the paths that locate them.

use std::error::Error;
use std::fmt;
use std::sync::Arc;

use thiserror::Error;

/// Error raised by a field source.
pub type SourceError = Box<dyn Error + Send + Sync + 'static>;

/// Why a field failed to load.
#[derive(Debug, Clone, Error)]
pub enum FailureCause {
  /// The field's source raised an error.
  #[error("{0}")]
  Source(#[source] Arc<dyn Error + Send + Sync + 'static>),

  /// A required field produced no value, or was never set.
  #[error("required value is absent")]
  RequiredAbsent,

  /// The value was produced but violates a declared constraint.
  #[error("invalid value: {0}")]
  Validation(String),
}

impl FailureCause {
  /// Wrap an error raised by a field source.
  pub fn raised(error: impl Into<SourceError>) -> Self {
    let error: SourceError = error.into();
    FailureCause::Source(Arc::from(error))
  }
}

/// A field that failed to load, together with its cause.
#[derive(Debug, Clone, Error)]
#[error("field '{field}': {cause}")]
pub struct LoadFailure {
  field: String,
  #[source]
  cause: FailureCause,
}

impl LoadFailure {
  /// `field` names the field the failure belongs to or, for an object that
  /// was substituted wholesale, the kind of object that could not be read.
  pub fn new(field: impl Into<String>, cause: FailureCause) -> Self {
    Self {
      field: field.into(),
      cause,
    }
  }

  pub fn field(&self) -> &str {
    &self.field
  }

  pub fn cause(&self) -> &FailureCause {
    &self.cause
  }

  pub fn is_required_absent(&self) -> bool {
    matches!(self.cause, FailureCause::RequiredAbsent)
  }

  /// The error raised by the field's source, if that is what failed.
  ///
  /// Use `downcast_ref` on the result to recover the concrete error type.
  pub fn source_error(&self) -> Option<&(dyn Error + Send + Sync + 'static)> {
    match &self.cause {
      FailureCause::Source(error) => Some(&**error),
      _ => None,
    }
  }
}

/// One step into a failure tree.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Segment {
  /// A named field of a value object.
  Field(&'static str),
  /// An element of a list field.
  Index(usize),
  /// An entry of a keyed field.
  Key(String),
}

impl fmt::Display for Segment {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Segment::Field(name) => write!(f, "{}", name),
      Segment::Index(index) => write!(f, "[{}]", index),
      Segment::Key(key) => write!(f, "[{:?}]", key),
    }
  }
}

/// Location of a failure relative to the root object, e.g.
/// `nodes[1].position.x`.
#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct FieldPath(Vec<Segment>);

impl FieldPath {
  pub fn root() -> Self {
    Self::default()
  }

  pub fn is_root(&self) -> bool {
    self.0.is_empty()
  }

  pub fn segments(&self) -> &[Segment] {
    &self.0
  }

  pub fn join(&self, segment: Segment) -> Self {
    let mut segments = self.0.clone();
    segments.push(segment);
    Self(segments)
  }
}

impl fmt::Display for FieldPath {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    if self.0.is_empty() {
      return write!(f, "<root>");
    }
    for (i, segment) in self.0.iter().enumerate() {
      if i > 0 && matches!(segment, Segment::Field(_)) {
        write!(f, ".")?;
      }
      write!(f, "{}", segment)?;
    }
    Ok(())
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_path_display() {
    let path = FieldPath::root()
      .join(Segment::Field("nodes"))
      .join(Segment::Index(1))
      .join(Segment::Field("position"))
      .join(Segment::Field("x"));
    assert_eq!(path.to_string(), "nodes[1].position.x");

    let keyed = FieldPath::root()
      .join(Segment::Field("credentials"))
      .join(Segment::Key("db".to_string()))
      .join(Segment::Field("name"));
    assert_eq!(keyed.to_string(), "credentials[\"db\"].name");

    let quoted = FieldPath::root()
      .join(Segment::Field("config"))
      .join(Segment::Key("a\"]b".to_string()));
    assert_eq!(quoted.to_string(), r#"config["a\"]b"]"#);

    assert_eq!(FieldPath::root().to_string(), "<root>");
  }

  #[test]
  fn test_source_error_downcast() {
    let parse_error = "abc".parse::<i64>().unwrap_err();
    let failure = LoadFailure::new("x", FailureCause::raised(parse_error.clone()));

    let source = failure.source_error().expect("source error");
    assert_eq!(
      source.downcast_ref::<std::num::ParseIntError>(),
      Some(&parse_error)
    );
    assert!(!failure.is_required_absent());
    assert_eq!(
      failure.to_string(),
      "field 'x': invalid digit found in string"
    );
  }
}
