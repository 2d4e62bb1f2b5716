/// State of one field inside a builder draft.
#[derive(Debug, Clone, PartialEq)]
pub enum Slot<T> {
  /// Never set.
  Unset,
  /// Set from a source that succeeded.
  Value(T),
  /// Set to the caller's default: the source failed, or produced no value
  /// for an optional field.
  Defaulted(T),
}

impl<T> Slot<T> {
  pub fn is_unset(&self) -> bool {
    matches!(self, Slot::Unset)
  }

  pub fn get(&self) -> Option<&T> {
    match self {
      Slot::Unset => None,
      Slot::Value(value) | Slot::Defaulted(value) => Some(value),
    }
  }
}

impl<T: Clone + Default> Slot<T> {
  /// The value to freeze into a built object; unset slots resolve to the
  /// type's absent-default.
  pub fn resolve(&self) -> T {
    self.get().cloned().unwrap_or_default()
  }
}

impl<T> Default for Slot<T> {
  fn default() -> Self {
    Slot::Unset
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_resolve() {
    assert_eq!(Slot::<u32>::Unset.resolve(), 0);
    assert_eq!(Slot::Value(4u32).resolve(), 4);
    assert_eq!(Slot::Defaulted(9u32).resolve(), 9);
    assert_eq!(Slot::<Option<String>>::default().resolve(), None);
  }
}
