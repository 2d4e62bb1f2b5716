//! wfdef Builder
//!
//! A fallible builder for immutable value objects. Each field is populated
//! from a source that may fail; a failed source is replaced by a
//! caller-supplied default and the failure is recorded instead of aborting the
//! whole object. The result is a [`Loaded`] value carrying a navigable
//! [`FailureTree`]:
//!
//! - a leaf [`LoadFailure`] for a field whose source failed, whose value
//!   violated a declared [`Constraint`], or that is required but absent
//! - a nested tree for a composite field whose own value recorded failures
//! - an own failure when the object itself was substituted wholesale
//!
//! Value objects describe their fields as data through the [`Def`] trait:
//! a key enum, a list of [`FieldSpec`] descriptors, and a draft of [`Slot`]s.
//! [`LoadOptions::strict`] turns the first recorded failure into an immediate
//! [`LoadError::Aborted`].

mod builder;
mod constraint;
mod error;
mod failure;
mod field;
mod loaded;
mod options;
mod slot;
mod tree;

pub use builder::{Builder, Def};
pub use constraint::{Constraint, FieldValue};
pub use error::LoadError;
pub use failure::{FailureCause, FieldPath, LoadFailure, Segment, SourceError};
pub use field::{Field, FieldKey, FieldSpec};
pub use loaded::{Annotated, Loaded};
pub use options::LoadOptions;
pub use slot::Slot;
pub use tree::FailureTree;
