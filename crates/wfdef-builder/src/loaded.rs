use std::collections::BTreeMap;
use std::ops::Deref;

use crate::builder::Def;
use crate::failure::{LoadFailure, Segment};
use crate::tree::FailureTree;

/// A built value object together with the failures recorded while building it.
#[derive(Debug, Clone)]
pub struct Loaded<D> {
  value: D,
  failures: FailureTree,
}

impl<D> Loaded<D> {
  pub fn new(value: D, failures: FailureTree) -> Self {
    Self { value, failures }
  }

  /// A value with no recorded failures.
  pub fn clean(value: D) -> Self {
    Self::new(value, FailureTree::empty())
  }

  /// A stand-in for an object that could not be built at all. The failure is
  /// attached to the object itself and is reported by
  /// [`own_failure`](Self::own_failure).
  pub fn substituted(value: D, failure: LoadFailure) -> Self {
    Self::new(value, FailureTree::leaf(failure))
  }

  pub fn value(&self) -> &D {
    &self.value
  }

  pub fn into_value(self) -> D {
    self.value
  }

  pub fn failures(&self) -> &FailureTree {
    &self.failures
  }

  pub fn into_parts(self) -> (D, FailureTree) {
    (self.value, self.failures)
  }

  pub fn has_failures(&self) -> bool {
    self.failures.has_failures()
  }

  pub fn own_failure(&self) -> Option<&LoadFailure> {
    self.failures.own_failure()
  }
}

impl<D: Def> Loaded<D> {
  pub fn failure(&self, key: D::Field) -> Option<&LoadFailure> {
    self.failures.failure(key)
  }

  pub fn subtree(&self, key: D::Field) -> Option<&FailureTree> {
    self.failures.subtree(key)
  }
}

impl<D> Deref for Loaded<D> {
  type Target = D;

  fn deref(&self) -> &D {
    &self.value
  }
}

/// A field value that may carry failures of its own: a loaded object, or a
/// list, map or option of loaded objects.
pub trait Annotated {
  type Value;

  fn into_parts(self) -> (Self::Value, FailureTree);
}

impl<D> Annotated for Loaded<D> {
  type Value = D;

  fn into_parts(self) -> (D, FailureTree) {
    Loaded::into_parts(self)
  }
}

impl<D> Annotated for Option<Loaded<D>> {
  type Value = Option<D>;

  fn into_parts(self) -> (Option<D>, FailureTree) {
    match self {
      Some(loaded) => {
        let (value, failures) = loaded.into_parts();
        (Some(value), failures)
      }
      None => (None, FailureTree::empty()),
    }
  }
}

impl<D> Annotated for Vec<Loaded<D>> {
  type Value = Vec<D>;

  fn into_parts(self) -> (Vec<D>, FailureTree) {
    let mut values = Vec::with_capacity(self.len());
    let mut entries = Vec::new();
    for (index, loaded) in self.into_iter().enumerate() {
      let (value, failures) = loaded.into_parts();
      values.push(value);
      entries.push((Segment::Index(index), failures));
    }
    (values, FailureTree::from_entries(entries))
  }
}

impl<D> Annotated for BTreeMap<String, Loaded<D>> {
  type Value = BTreeMap<String, D>;

  fn into_parts(self) -> (BTreeMap<String, D>, FailureTree) {
    let mut values = BTreeMap::new();
    let mut entries = Vec::new();
    for (key, loaded) in self {
      let (value, failures) = loaded.into_parts();
      entries.push((Segment::Key(key.clone()), failures));
      values.insert(key, value);
    }
    (values, FailureTree::from_entries(entries))
  }
}
