use std::collections::BTreeMap;

use serde::Serialize;
use wfdef_builder::{Constraint, Def, Field, FieldKey, FieldSpec, Slot};

use crate::cipher::CipherDef;
use crate::config_value::ConfigValueDef;
use crate::credential::CredentialPlaceholderDef;
use crate::link::LinkDef;
use crate::node::NodeDef;
use crate::template::TemplateDef;

/// A complete workflow document.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct WorkflowDef {
  pub name: String,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub version: Option<u32>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub author: Option<String>,
  pub nodes: Vec<NodeDef>,
  pub links: Vec<LinkDef>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub template: Option<TemplateDef>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub cipher: Option<CipherDef>,
  #[serde(skip_serializing_if = "BTreeMap::is_empty")]
  pub credentials: BTreeMap<String, CredentialPlaceholderDef>,
  #[serde(skip_serializing_if = "BTreeMap::is_empty")]
  pub config: BTreeMap<String, ConfigValueDef>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum WorkflowField {
  Name,
  Version,
  Author,
  Nodes,
  Links,
  Template,
  Cipher,
  Credentials,
  Config,
}

impl FieldKey for WorkflowField {
  fn name(self) -> &'static str {
    match self {
      WorkflowField::Name => "name",
      WorkflowField::Version => "version",
      WorkflowField::Author => "author",
      WorkflowField::Nodes => "nodes",
      WorkflowField::Links => "links",
      WorkflowField::Template => "template",
      WorkflowField::Cipher => "cipher",
      WorkflowField::Credentials => "credentials",
      WorkflowField::Config => "config",
    }
  }
}

#[derive(Debug, Clone, Default)]
pub struct WorkflowDraft {
  name: Slot<String>,
  version: Slot<Option<u32>>,
  author: Slot<Option<String>>,
  nodes: Slot<Vec<NodeDef>>,
  links: Slot<Vec<LinkDef>>,
  template: Slot<Option<TemplateDef>>,
  cipher: Slot<Option<CipherDef>>,
  credentials: Slot<BTreeMap<String, CredentialPlaceholderDef>>,
  config: Slot<BTreeMap<String, ConfigValueDef>>,
}

impl WorkflowDef {
  pub const NAME: Field<Self, String> =
    Field::<Self, String>::new(WorkflowField::Name, |d, s| d.name = s);
  pub const VERSION: Field<Self, Option<u32>> =
    Field::<Self, Option<u32>>::new(WorkflowField::Version, |d, s| d.version = s);
  pub const AUTHOR: Field<Self, Option<String>> =
    Field::<Self, Option<String>>::new(WorkflowField::Author, |d, s| d.author = s);
  pub const NODES: Field<Self, Vec<NodeDef>> =
    Field::<Self, Vec<NodeDef>>::new(WorkflowField::Nodes, |d, s| d.nodes = s);
  pub const LINKS: Field<Self, Vec<LinkDef>> =
    Field::<Self, Vec<LinkDef>>::new(WorkflowField::Links, |d, s| d.links = s);
  pub const TEMPLATE: Field<Self, Option<TemplateDef>> =
    Field::<Self, Option<TemplateDef>>::new(WorkflowField::Template, |d, s| d.template = s);
  pub const CIPHER: Field<Self, Option<CipherDef>> =
    Field::<Self, Option<CipherDef>>::new(WorkflowField::Cipher, |d, s| d.cipher = s);
  pub const CREDENTIALS: Field<Self, BTreeMap<String, CredentialPlaceholderDef>> =
    Field::<Self, BTreeMap<String, CredentialPlaceholderDef>>::new(
      WorkflowField::Credentials,
      |d, s| d.credentials = s,
    );
  pub const CONFIG: Field<Self, BTreeMap<String, ConfigValueDef>> =
    Field::<Self, BTreeMap<String, ConfigValueDef>>::new(
      WorkflowField::Config,
      |d, s| d.config = s,
    );

  /// Get a node by ID.
  pub fn get_node(&self, node_id: u32) -> Option<&NodeDef> {
    self.nodes.iter().find(|node| node.node_id == node_id)
  }

  /// Links whose source or destination is not a node of this workflow.
  pub fn dangling_links(&self) -> impl Iterator<Item = &LinkDef> {
    self
      .links
      .iter()
      .filter(|link| self.get_node(link.source_id).is_none() || self.get_node(link.dest_id).is_none())
  }
}

impl Def for WorkflowDef {
  type Field = WorkflowField;
  type Draft = WorkflowDraft;

  const KIND: &'static str = "workflow";
  const FIELDS: &'static [FieldSpec<WorkflowField>] = &[
    FieldSpec::required(WorkflowField::Name).with(&[Constraint::NonBlank, Constraint::MaxLen(256)]),
    FieldSpec::optional(WorkflowField::Version).with(&[Constraint::Range { min: 1, max: 99 }]),
    FieldSpec::optional(WorkflowField::Author),
    FieldSpec::optional(WorkflowField::Nodes),
    FieldSpec::optional(WorkflowField::Links),
    FieldSpec::optional(WorkflowField::Template),
    FieldSpec::optional(WorkflowField::Cipher),
    FieldSpec::optional(WorkflowField::Credentials),
    FieldSpec::optional(WorkflowField::Config),
  ];

  fn assemble(draft: &WorkflowDraft) -> Self {
    Self {
      name: draft.name.resolve(),
      version: draft.version.resolve(),
      author: draft.author.resolve(),
      nodes: draft.nodes.resolve(),
      links: draft.links.resolve(),
      template: draft.template.resolve(),
      cipher: draft.cipher.resolve(),
      credentials: draft.credentials.resolve(),
      config: draft.config.resolve(),
    }
  }

  fn to_draft(&self) -> WorkflowDraft {
    WorkflowDraft {
      name: Slot::Value(self.name.clone()),
      version: Slot::Value(self.version),
      author: Slot::Value(self.author.clone()),
      nodes: Slot::Value(self.nodes.clone()),
      links: Slot::Value(self.links.clone()),
      template: Slot::Value(self.template.clone()),
      cipher: Slot::Value(self.cipher.clone()),
      credentials: Slot::Value(self.credentials.clone()),
      config: Slot::Value(self.config.clone()),
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_version_is_optional_and_ranged() {
    let mut builder = WorkflowDef::builder();
    builder
      .set(WorkflowDef::NAME, || Ok("ingest".to_string()), String::new())
      .unwrap();
    let loaded = builder.build().unwrap();
    assert_eq!(loaded.value().version, None);
    assert!(!loaded.has_failures());

    builder
      .set(WorkflowDef::VERSION, || Ok(Some(100)), None)
      .unwrap();
    let loaded = builder.build().unwrap();
    assert_eq!(loaded.value().version, None);
    assert!(loaded.failure(WorkflowField::Version).is_some());

    builder.set(WorkflowDef::VERSION, || Ok(Some(2)), None).unwrap();
    assert_eq!(builder.build().unwrap().value().version, Some(2));
  }
}
