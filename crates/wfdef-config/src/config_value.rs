//! Typed configuration values attached to nodes and workflows.

use serde::Serialize;
use wfdef_builder::{Def, Field, FieldKey, FieldSpec, FieldValue, Slot};

/// A typed configuration value.
///
/// Integers are kept apart from doubles so that `3` and `3.0` round-trip to
/// the same JSON they were read from.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ConfigValue {
  Boolean(bool),
  Integer(i64),
  Double(f64),
  String(String),
  List(Vec<ConfigValue>),
}

impl ConfigValue {
  pub fn type_name(&self) -> &'static str {
    match self {
      ConfigValue::Boolean(_) => "boolean",
      ConfigValue::Integer(_) => "integer",
      ConfigValue::Double(_) => "double",
      ConfigValue::String(_) => "string",
      ConfigValue::List(_) => "list",
    }
  }
}

impl Default for ConfigValue {
  fn default() -> Self {
    ConfigValue::String(String::new())
  }
}

impl FieldValue for ConfigValue {}

/// A named config entry: the value plus an optional description.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ConfigValueDef {
  pub value: ConfigValue,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub description: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ConfigValueField {
  Value,
  Description,
}

impl FieldKey for ConfigValueField {
  fn name(self) -> &'static str {
    match self {
      ConfigValueField::Value => "value",
      ConfigValueField::Description => "description",
    }
  }
}

#[derive(Debug, Clone, Default)]
pub struct ConfigValueDraft {
  value: Slot<ConfigValue>,
  description: Slot<Option<String>>,
}

impl ConfigValueDef {
  pub const VALUE: Field<Self, ConfigValue> =
    Field::<Self, ConfigValue>::new(ConfigValueField::Value, |d, s| d.value = s);
  pub const DESCRIPTION: Field<Self, Option<String>> =
    Field::<Self, Option<String>>::new(ConfigValueField::Description, |d, s| d.description = s);
}

impl Def for ConfigValueDef {
  type Field = ConfigValueField;
  type Draft = ConfigValueDraft;

  const KIND: &'static str = "config value";
  const FIELDS: &'static [FieldSpec<ConfigValueField>] = &[
    FieldSpec::required(ConfigValueField::Value),
    FieldSpec::optional(ConfigValueField::Description),
  ];

  fn assemble(draft: &ConfigValueDraft) -> Self {
    Self {
      value: draft.value.resolve(),
      description: draft.description.resolve(),
    }
  }

  fn to_draft(&self) -> ConfigValueDraft {
    ConfigValueDraft {
      value: Slot::Value(self.value.clone()),
      description: Slot::Value(self.description.clone()),
    }
  }
}

impl FieldValue for ConfigValueDef {}
