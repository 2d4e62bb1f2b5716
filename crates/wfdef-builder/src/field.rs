//! Field identities and descriptors.
//!
//! Every value object declares a small enum of field keys and a static list of
//! [`FieldSpec`] descriptors. The builder consults the descriptors for the
//! required flag and the constraints of a field; [`Field`] handles give typed
//! write access to the matching slot of the object's draft.

use std::fmt;
use std::hash::Hash;

use crate::builder::Def;
use crate::constraint::Constraint;
use crate::slot::Slot;

/// Identity of one field of a value object.
pub trait FieldKey: Copy + Eq + Ord + Hash + fmt::Debug + 'static {
  /// Name of the field as it appears in serialized documents.
  fn name(self) -> &'static str;
}

/// Declared shape of a field: its key, whether it must be present, and the
/// constraints a loaded value has to satisfy.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FieldSpec<K: 'static> {
  pub key: K,
  pub required: bool,
  pub constraints: &'static [Constraint],
}

impl<K: FieldKey> FieldSpec<K> {
  pub const fn required(key: K) -> Self {
    Self {
      key,
      required: true,
      constraints: &[],
    }
  }

  pub const fn optional(key: K) -> Self {
    Self {
      key,
      required: false,
      constraints: &[],
    }
  }

  /// Attach constraints checked after every successful fetch.
  pub const fn with(self, constraints: &'static [Constraint]) -> Self {
    Self {
      key: self.key,
      required: self.required,
      constraints,
    }
  }
}

/// Typed handle on one field of a value object.
///
/// Pairs the field key with a writer into the object's draft so that
/// [`Builder::set`](crate::Builder::set) can store a `T` without knowing the
/// draft's layout.
pub struct Field<D: Def, T> {
  key: D::Field,
  write: fn(&mut D::Draft, Slot<T>),
}

impl<D: Def, T> Field<D, T> {
  pub const fn new(key: D::Field, write: fn(&mut D::Draft, Slot<T>)) -> Self {
    Self { key, write }
  }

  pub fn key(&self) -> D::Field {
    self.key
  }

  pub(crate) fn store(&self, draft: &mut D::Draft, slot: Slot<T>) {
    (self.write)(draft, slot)
  }
}

impl<D: Def, T> Clone for Field<D, T> {
  fn clone(&self) -> Self {
    *self
  }
}

impl<D: Def, T> Copy for Field<D, T> {}

impl<D: Def, T> fmt::Debug for Field<D, T> {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_tuple("Field").field(&self.key.name()).finish()
  }
}
