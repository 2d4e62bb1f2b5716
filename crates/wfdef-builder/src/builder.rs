//! The generic fallible builder.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use tracing::debug;

use crate::constraint::FieldValue;
use crate::error::LoadError;
use crate::failure::{FailureCause, LoadFailure, Segment, SourceError};
use crate::field::{Field, FieldKey, FieldSpec};
use crate::loaded::{Annotated, Loaded};
use crate::options::LoadOptions;
use crate::slot::Slot;
use crate::tree::FailureTree;

/// A value object assembled by [`Builder`].
///
/// Implementors declare their fields as data: a key enum, the descriptor list
/// in [`FIELDS`](Def::FIELDS), and a draft holding one [`Slot`] per field.
pub trait Def: Clone + PartialEq + fmt::Debug + Sized {
  type Field: FieldKey;
  type Draft: Default + Clone + fmt::Debug;

  /// Short name of the object kind, used for logging and substitution
  /// failures.
  const KIND: &'static str;

  const FIELDS: &'static [FieldSpec<Self::Field>];

  /// Freeze a draft into a value; unset slots take their absent-default.
  fn assemble(draft: &Self::Draft) -> Self;

  /// A draft with every field set from this value.
  fn to_draft(&self) -> Self::Draft;

  fn builder() -> Builder<Self> {
    Builder::new()
  }

  fn spec(key: Self::Field) -> Option<&'static FieldSpec<Self::Field>> {
    Self::FIELDS.iter().find(|spec| spec.key == key)
  }
}

/// Accumulates field values and per-field failures for one value object.
///
/// Every `set*` call replaces both the field's value and its failure entry.
/// A successful set clears any earlier failure for the field. A failed set
/// stores the caller's default and records the cause, unless strict mode is
/// on, in which case the failure is returned as [`LoadError::Aborted`].
///
/// ```
/// use wfdef_builder::{Builder, Def};
/// # use wfdef_builder::{Field, FieldKey, FieldSpec, Slot};
/// # #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
/// # enum SizeField { Width }
/// # impl FieldKey for SizeField {
/// #   fn name(self) -> &'static str { "width" }
/// # }
/// # #[derive(Debug, Clone, PartialEq, Default)]
/// # struct Size { width: u32 }
/// # #[derive(Debug, Clone, Default)]
/// # struct SizeDraft { width: Slot<u32> }
/// # impl Def for Size {
/// #   type Field = SizeField;
/// #   type Draft = SizeDraft;
/// #   const KIND: &'static str = "size";
/// #   const FIELDS: &'static [FieldSpec<SizeField>] = &[FieldSpec::required(SizeField::Width)];
/// #   fn assemble(draft: &SizeDraft) -> Self { Size { width: draft.width.resolve() } }
/// #   fn to_draft(&self) -> SizeDraft { SizeDraft { width: Slot::Value(self.width) } }
/// # }
/// # const WIDTH: Field<Size, u32> = Field::<Size, u32>::new(SizeField::Width, |draft, slot| draft.width = slot);
/// let loaded = Size::builder()
///   .set(WIDTH, || Ok("12".parse::<u32>()?), 0)?
///   .build()?;
/// assert_eq!(loaded.value().width, 12);
/// assert!(!loaded.has_failures());
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[derive(Debug, Clone)]
pub struct Builder<D: Def> {
  draft: D::Draft,
  failures: BTreeMap<D::Field, FailureTree>,
  touched: BTreeSet<D::Field>,
  options: LoadOptions,
}

impl<D: Def> Builder<D> {
  pub fn new() -> Self {
    Self::with_options(LoadOptions::default())
  }

  pub fn with_options(options: LoadOptions) -> Self {
    Self {
      draft: D::Draft::default(),
      failures: BTreeMap::new(),
      touched: BTreeSet::new(),
      options,
    }
  }

  /// Seed a builder from an existing value. No failures are recorded and
  /// every declared field counts as set.
  pub fn from_value(value: &D) -> Self {
    Self::from_value_with_options(value, LoadOptions::default())
  }

  pub fn from_value_with_options(value: &D, options: LoadOptions) -> Self {
    Self {
      draft: value.to_draft(),
      failures: BTreeMap::new(),
      touched: D::FIELDS.iter().map(|spec| spec.key).collect(),
      options,
    }
  }

  pub fn options(&self) -> LoadOptions {
    self.options
  }

  /// Evaluate `source` and store its value, or `default` if it fails.
  pub fn set<T, S>(&mut self, field: Field<D, T>, source: S, default: T) -> Result<&mut Self, LoadError>
  where
    T: FieldValue,
    S: FnOnce() -> Result<T, SourceError>,
  {
    let outcome = source()
      .map(|value| (value, FailureTree::empty()))
      .map_err(FailureCause::raised);
    self.settle(field, outcome, default)
  }

  /// Like [`set`](Self::set) for sources that may produce no value.
  ///
  /// `None` on a required field is a [`FailureCause::RequiredAbsent`]
  /// failure. On an optional field it stores `default` without a failure.
  pub fn set_present<T, S>(
    &mut self,
    field: Field<D, T>,
    source: S,
    default: T,
  ) -> Result<&mut Self, LoadError>
  where
    T: FieldValue,
    S: FnOnce() -> Result<Option<T>, SourceError>,
  {
    let outcome = match source() {
      Ok(Some(value)) => Ok((value, FailureTree::empty())),
      Ok(None) if Self::is_required(field.key()) => Err(FailureCause::RequiredAbsent),
      Ok(None) => return Ok(self.absent(field, default)),
      Err(error) => Err(FailureCause::raised(error)),
    };
    self.settle(field, outcome, default)
  }

  /// Like [`set`](Self::set) for composite fields whose value carries its own
  /// failure tree. A non-empty nested tree is registered under the field as a
  /// subtree.
  pub fn set_nested<N, S>(
    &mut self,
    field: Field<D, N::Value>,
    source: S,
    default: N::Value,
  ) -> Result<&mut Self, LoadError>
  where
    N: Annotated,
    N::Value: FieldValue,
    S: FnOnce() -> Result<N, SourceError>,
  {
    let outcome = source()
      .map(Annotated::into_parts)
      .map_err(FailureCause::raised);
    self.settle(field, outcome, default)
  }

  /// Freeze the current state into a value and its failure tree.
  ///
  /// Required fields that were never set are reported as
  /// [`FailureCause::RequiredAbsent`] and hold their absent-default. Only
  /// strict mode can make this return an error.
  pub fn build(&self) -> Result<Loaded<D>, LoadError> {
    let mut entries: BTreeMap<Segment, FailureTree> = self
      .failures
      .iter()
      .map(|(key, tree)| (Segment::Field(key.name()), tree.clone()))
      .collect();

    let missing = D::FIELDS
      .iter()
      .filter(|spec| spec.required && !self.touched.contains(&spec.key));
    for spec in missing {
      let failure = LoadFailure::new(spec.key.name(), FailureCause::RequiredAbsent);
      if self.options.strict {
        return Err(LoadError::Aborted(failure));
      }
      entries.insert(Segment::Field(spec.key.name()), FailureTree::leaf(failure));
    }

    let failures = FailureTree::from_entries(entries);
    if failures.has_failures() {
      debug!(kind = D::KIND, failures = failures.len(), "built with failures");
    }

    Ok(Loaded::new(D::assemble(&self.draft), failures))
  }

  fn is_required(key: D::Field) -> bool {
    D::spec(key).is_some_and(|spec| spec.required)
  }

  /// An optional field with no value holds `default` unchecked, like a
  /// failed source, but records nothing.
  fn absent<T: FieldValue>(&mut self, field: Field<D, T>, default: T) -> &mut Self {
    let key = field.key();
    self.touched.insert(key);
    field.store(&mut self.draft, Slot::Defaulted(default));
    if self.failures.remove(&key).is_some() {
      debug!(kind = D::KIND, field = key.name(), "cleared earlier failure");
    }
    self
  }

  fn settle<T: FieldValue>(
    &mut self,
    field: Field<D, T>,
    outcome: Result<(T, FailureTree), FailureCause>,
    default: T,
  ) -> Result<&mut Self, LoadError> {
    let key = field.key();
    self.touched.insert(key);

    let outcome = outcome.and_then(|(value, nested)| {
      validate::<D, T>(key, &value)?;
      Ok((value, nested))
    });

    match outcome {
      Ok((value, nested)) => {
        if self.options.strict {
          if let Some((_, failure)) = nested.leaves().first() {
            return Err(LoadError::Aborted((*failure).clone()));
          }
        }
        field.store(&mut self.draft, Slot::Value(value));
        if nested.has_failures() {
          debug!(
            kind = D::KIND,
            field = key.name(),
            failures = nested.len(),
            "nested value loaded with failures"
          );
          self.failures.insert(key, nested);
        } else if self.failures.remove(&key).is_some() {
          debug!(kind = D::KIND, field = key.name(), "cleared earlier failure");
        }
        Ok(self)
      }
      Err(cause) => {
        let failure = LoadFailure::new(key.name(), cause);
        if self.options.strict {
          return Err(LoadError::Aborted(failure));
        }
        debug!(kind = D::KIND, error = %failure, "field failed, default substituted");
        field.store(&mut self.draft, Slot::Defaulted(default));
        self.failures.insert(key, FailureTree::leaf(failure));
        Ok(self)
      }
    }
  }
}

impl<D: Def> Default for Builder<D> {
  fn default() -> Self {
    Self::new()
  }
}

fn validate<D: Def, T: FieldValue>(key: D::Field, value: &T) -> Result<(), FailureCause> {
  let Some(spec) = D::spec(key) else {
    return Ok(());
  };
  for constraint in spec.constraints {
    value.check(constraint).map_err(FailureCause::Validation)?;
  }
  Ok(())
}
