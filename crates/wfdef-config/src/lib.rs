//! wfdef Config
//!
//! This crate contains the workflow definition types for wfdef and the reader
//! that loads them from JSON documents.
//!
//! Every type is a value object assembled by a [`wfdef_builder::Builder`].
//! Reading never stops at the first bad field: each field failure is recorded
//! in the [`FailureTree`](wfdef_builder::FailureTree) of the returned
//! [`Loaded`](wfdef_builder::Loaded) value and the field takes its default,
//! unless the load runs in strict mode.
//!
//! Documents can be read from:
//! - JSON text (via [`parse_workflow`])
//! - an already parsed [`serde_json::Value`] (via [`read_workflow`])

mod cipher;
mod config_value;
mod credential;
mod error;
mod geometry;
mod link;
mod node;
mod read;
mod template;
mod workflow;

pub use cipher::{CIPHER_ALGORITHMS, CipherDef, CipherField};
pub use config_value::{ConfigValue, ConfigValueDef, ConfigValueField};
pub use credential::{CredentialField, CredentialPlaceholderDef};
pub use error::{DocumentError, ReadError};
pub use geometry::{BoundsDef, BoundsField, PointDef, PointField};
pub use link::{LinkDef, LinkField};
pub use node::{ALIGNMENTS, AnnotationDef, AnnotationField, NodeDef, NodeField};
pub use read::{
  parse_workflow, read_annotation, read_bounds, read_cipher, read_config_value, read_credential,
  read_link, read_node, read_point, read_template, read_workflow,
};
pub use template::{TemplateDef, TemplateField};
pub use workflow::{WorkflowDef, WorkflowField};
