//! Failure trees.
//!
//! A [`FailureTree`] is empty, a single leaf [`LoadFailure`], or a non-empty
//! map from [`Segment`] to a non-empty subtree. The constructors keep that
//! shape: empty subtrees are dropped, and a map that ends up with no entries
//! collapses to the empty tree.

use std::collections::BTreeMap;
use std::fmt;

use crate::failure::{FieldPath, LoadFailure, Segment};
use crate::field::FieldKey;

#[derive(Debug, Clone, Default)]
pub struct FailureTree {
  repr: Repr,
}

#[derive(Debug, Clone, Default)]
enum Repr {
  #[default]
  Empty,
  Leaf(LoadFailure),
  Branch(BTreeMap<Segment, FailureTree>),
}

impl FailureTree {
  pub fn empty() -> Self {
    Self::default()
  }

  pub fn leaf(failure: LoadFailure) -> Self {
    Self {
      repr: Repr::Leaf(failure),
    }
  }

  /// Build a tree from per-segment subtrees, skipping the empty ones.
  pub fn from_entries(entries: impl IntoIterator<Item = (Segment, FailureTree)>) -> Self {
    let map: BTreeMap<Segment, FailureTree> = entries
      .into_iter()
      .filter(|(_, tree)| tree.has_failures())
      .collect();

    if map.is_empty() {
      Self::empty()
    } else {
      Self {
        repr: Repr::Branch(map),
      }
    }
  }

  /// Whether any failure exists anywhere in this tree.
  pub fn has_failures(&self) -> bool {
    !matches!(self.repr, Repr::Empty)
  }

  /// The failure attached to the object itself, when it was substituted
  /// wholesale instead of being built field by field.
  pub fn own_failure(&self) -> Option<&LoadFailure> {
    match &self.repr {
      Repr::Leaf(failure) => Some(failure),
      _ => None,
    }
  }

  /// Subtree stored under `segment`.
  pub fn get(&self, segment: &Segment) -> Option<&FailureTree> {
    match &self.repr {
      Repr::Branch(map) => map.get(segment),
      _ => None,
    }
  }

  /// Leaf failure recorded directly for `key`.
  pub fn failure<K: FieldKey>(&self, key: K) -> Option<&LoadFailure> {
    self.subtree(key).and_then(FailureTree::own_failure)
  }

  /// Everything recorded for `key`: a leaf, or the nested tree of a composite
  /// field.
  pub fn subtree<K: FieldKey>(&self, key: K) -> Option<&FailureTree> {
    self.get(&Segment::Field(key.name()))
  }

  /// Subtree for element `index` of a list field's tree.
  pub fn index(&self, index: usize) -> Option<&FailureTree> {
    self.get(&Segment::Index(index))
  }

  /// Subtree for entry `key` of a keyed field's tree.
  pub fn key(&self, key: &str) -> Option<&FailureTree> {
    self.get(&Segment::Key(key.to_string()))
  }

  pub fn entries(&self) -> impl Iterator<Item = (&Segment, &FailureTree)> {
    let map = match &self.repr {
      Repr::Branch(map) => Some(map),
      _ => None,
    };
    map.into_iter().flat_map(|map| map.iter())
  }

  /// Every leaf failure with its full path, depth first in key order.
  pub fn leaves(&self) -> Vec<(FieldPath, &LoadFailure)> {
    let mut out = Vec::new();
    self.collect_leaves(FieldPath::root(), &mut out);
    out
  }

  /// Number of leaf failures.
  pub fn len(&self) -> usize {
    match &self.repr {
      Repr::Empty => 0,
      Repr::Leaf(_) => 1,
      Repr::Branch(map) => map.values().map(FailureTree::len).sum(),
    }
  }

  pub fn is_empty(&self) -> bool {
    !self.has_failures()
  }

  fn collect_leaves<'a>(&'a self, path: FieldPath, out: &mut Vec<(FieldPath, &'a LoadFailure)>) {
    match &self.repr {
      Repr::Empty => {}
      Repr::Leaf(failure) => out.push((path, failure)),
      Repr::Branch(map) => {
        for (segment, subtree) in map {
          subtree.collect_leaves(path.join(segment.clone()), out);
        }
      }
    }
  }
}

/// One line per leaf: `path: cause`.
impl fmt::Display for FailureTree {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    for (path, failure) in self.leaves() {
      writeln!(f, "{}: {}", path, failure.cause())?;
    }
    Ok(())
  }
}
