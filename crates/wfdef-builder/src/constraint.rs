//! Declarative constraints on loaded field values.

use std::collections::BTreeMap;
use std::fmt;

/// A domain constraint checked after a field's source succeeded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Constraint {
  /// Inclusive numeric range.
  Range { min: i64, max: i64 },
  /// String must contain at least one non-whitespace character.
  NonBlank,
  /// String must equal one of the listed values.
  OneOf(&'static [&'static str]),
  /// String length (in chars) or collection size upper bound.
  MaxLen(usize),
}

impl fmt::Display for Constraint {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Constraint::Range { min, max } => write!(f, "range {}..={}", min, max),
      Constraint::NonBlank => write!(f, "non-blank"),
      Constraint::OneOf(values) => write!(f, "one of [{}]", values.join(", ")),
      Constraint::MaxLen(max) => write!(f, "length at most {}", max),
    }
  }
}

/// A type that can be stored in a builder slot.
///
/// `Default` supplies the value a required field holds when it was never set.
/// `check` returns a human-readable message when the value violates a
/// constraint. Types that support no constraint keep the provided method,
/// which rejects every constraint.
pub trait FieldValue: Clone + Default + fmt::Debug {
  fn check(&self, constraint: &Constraint) -> Result<(), String> {
    Err(format!("{} cannot be applied to this field", constraint))
  }
}

macro_rules! integer_field_value {
  ($($ty:ty),*) => {
    $(
      impl FieldValue for $ty {
        fn check(&self, constraint: &Constraint) -> Result<(), String> {
          match constraint {
            Constraint::Range { min, max } => {
              let value = i64::from(*self);
              if value < *min || value > *max {
                Err(format!("{} is outside {}", value, constraint))
              } else {
                Ok(())
              }
            }
            other => Err(format!("{} cannot be applied to an integer", other)),
          }
        }
      }
    )*
  };
}

integer_field_value!(i16, i32, i64, u8, u16, u32);

impl FieldValue for bool {}

impl FieldValue for f64 {}

impl FieldValue for String {
  fn check(&self, constraint: &Constraint) -> Result<(), String> {
    match constraint {
      Constraint::NonBlank if self.trim().is_empty() => Err("value is blank".to_string()),
      Constraint::NonBlank => Ok(()),
      Constraint::OneOf(allowed) if allowed.contains(&self.as_str()) => Ok(()),
      Constraint::OneOf(_) => Err(format!("'{}' is not {}", self, constraint)),
      Constraint::MaxLen(max) if self.chars().count() > *max => {
        Err(format!("length {} exceeds {}", self.chars().count(), max))
      }
      Constraint::MaxLen(_) => Ok(()),
      Constraint::Range { .. } => Err(format!("{} cannot be applied to a string", constraint)),
    }
  }
}

/// Constraints apply to the contained value; an absent value satisfies all of
/// them.
impl<T: FieldValue> FieldValue for Option<T> {
  fn check(&self, constraint: &Constraint) -> Result<(), String> {
    match self {
      Some(value) => value.check(constraint),
      None => Ok(()),
    }
  }
}

impl<T: FieldValue> FieldValue for Vec<T> {
  fn check(&self, constraint: &Constraint) -> Result<(), String> {
    match constraint {
      Constraint::MaxLen(max) if self.len() > *max => {
        Err(format!("{} elements exceed {}", self.len(), max))
      }
      Constraint::MaxLen(_) => Ok(()),
      other => Err(format!("{} cannot be applied to a list", other)),
    }
  }
}

impl<T: FieldValue> FieldValue for BTreeMap<String, T> {
  fn check(&self, constraint: &Constraint) -> Result<(), String> {
    match constraint {
      Constraint::MaxLen(max) if self.len() > *max => {
        Err(format!("{} entries exceed {}", self.len(), max))
      }
      Constraint::MaxLen(_) => Ok(()),
      other => Err(format!("{} cannot be applied to a map", other)),
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_integer_range() {
    let range = Constraint::Range { min: 1, max: 10 };
    assert!(5u32.check(&range).is_ok());
    assert!(0u32.check(&range).is_err());
    assert!((-3i64).check(&range).is_err());
    assert!(10i32.check(&range).is_ok());
  }

  #[test]
  fn test_string_constraints() {
    assert!("  ".to_string().check(&Constraint::NonBlank).is_err());
    assert!("db".to_string().check(&Constraint::NonBlank).is_ok());

    let one_of = Constraint::OneOf(&["left", "right"]);
    assert!("left".to_string().check(&one_of).is_ok());
    let err = "up".to_string().check(&one_of).unwrap_err();
    assert_eq!(err, "'up' is not one of [left, right]");

    assert!("abcd".to_string().check(&Constraint::MaxLen(3)).is_err());
  }

  #[test]
  fn test_option_absent_satisfies_constraints() {
    let none: Option<u32> = None;
    assert!(none.check(&Constraint::Range { min: 1, max: 2 }).is_ok());
    assert!(Some(7u32).check(&Constraint::Range { min: 1, max: 2 }).is_err());
  }

  #[test]
  fn test_unsupported_constraint_is_rejected() {
    assert!(true.check(&Constraint::NonBlank).is_err());
    assert!(7u32.check(&Constraint::NonBlank).is_err());
    assert!(vec![1u32].check(&Constraint::Range { min: 0, max: 1 }).is_err());
  }
}
