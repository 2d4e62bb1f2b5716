//! Reading workflow documents from JSON.
//!
//! Each reader walks one JSON object and feeds its keys to the matching
//! builder as field sources. Keys are the field names declared by the Def.
//!
//! - an absent key leaves the field unset; `build()` reports it when the
//!   field is required
//! - `null` is an absent value, see [`Builder::set_present`]
//! - a value of the wrong JSON type is a source failure of that field
//! - a composite that is not a JSON object is substituted wholesale by its
//!   default, with the failure attached to the substituted object
//!
//! Config values accept a shorthand: a bare scalar or list stands for
//! `{"value": ...}`.

use std::collections::BTreeMap;

use serde_json::{Map, Value};
use tracing::debug;
use wfdef_builder::{
  Annotated, Builder, Def, FailureCause, Field, FieldKey, FieldValue, LoadError, LoadFailure,
  LoadOptions, Loaded,
};

use crate::cipher::CipherDef;
use crate::config_value::{ConfigValue, ConfigValueDef};
use crate::credential::CredentialPlaceholderDef;
use crate::error::{DocumentError, ReadError};
use crate::geometry::{BoundsDef, PointDef};
use crate::link::LinkDef;
use crate::node::{AnnotationDef, NodeDef};
use crate::template::TemplateDef;
use crate::workflow::WorkflowDef;

type Object = Map<String, Value>;

/// Parse JSON text and read it as a workflow.
pub fn parse_workflow(text: &str, options: LoadOptions) -> Result<Loaded<WorkflowDef>, DocumentError> {
  let document: Value = serde_json::from_str(text)?;
  Ok(read_workflow(&document, options)?)
}

pub fn read_workflow(value: &Value, options: LoadOptions) -> Result<Loaded<WorkflowDef>, LoadError> {
  read_def(value, options, |b, object| {
    scalar(b, object, WorkflowDef::NAME, string)?;
    scalar(b, object, WorkflowDef::VERSION, |v| uint(v).map(Some))?;
    scalar(b, object, WorkflowDef::AUTHOR, |v| string(v).map(Some))?;
    list(b, object, WorkflowDef::NODES, |v| read_node(v, options))?;
    list(b, object, WorkflowDef::LINKS, |v| read_link(v, options))?;
    nested(b, object, WorkflowDef::TEMPLATE, |v| {
      read_template(v, options).map(Some)
    })?;
    nested(b, object, WorkflowDef::CIPHER, |v| read_cipher(v, options).map(Some))?;
    keyed(b, object, WorkflowDef::CREDENTIALS, |v| {
      read_credential(v, options)
    })?;
    keyed(b, object, WorkflowDef::CONFIG, |v| read_config_value(v, options))
  })
}

pub fn read_node(value: &Value, options: LoadOptions) -> Result<Loaded<NodeDef>, LoadError> {
  read_def(value, options, |b, object| {
    scalar(b, object, NodeDef::NODE_ID, uint)?;
    scalar(b, object, NodeDef::NAME, string)?;
    scalar(b, object, NodeDef::FACTORY, string)?;
    nested(b, object, NodeDef::POSITION, |v| read_point(v, options))?;
    keyed(b, object, NodeDef::SETTINGS, |v| read_config_value(v, options))?;
    nested(b, object, NodeDef::ANNOTATION, |v| {
      read_annotation(v, options).map(Some)
    })
  })
}

pub fn read_point(value: &Value, options: LoadOptions) -> Result<Loaded<PointDef>, LoadError> {
  read_def(value, options, |b, object| {
    scalar(b, object, PointDef::X, int)?;
    scalar(b, object, PointDef::Y, int)
  })
}

pub fn read_bounds(value: &Value, options: LoadOptions) -> Result<Loaded<BoundsDef>, LoadError> {
  read_def(value, options, |b, object| {
    scalar(b, object, BoundsDef::X, int)?;
    scalar(b, object, BoundsDef::Y, int)?;
    scalar(b, object, BoundsDef::WIDTH, uint)?;
    scalar(b, object, BoundsDef::HEIGHT, uint)
  })
}

pub fn read_annotation(
  value: &Value,
  options: LoadOptions,
) -> Result<Loaded<AnnotationDef>, LoadError> {
  read_def(value, options, |b, object| {
    scalar(b, object, AnnotationDef::TEXT, string)?;
    nested(b, object, AnnotationDef::BOUNDS, |v| read_bounds(v, options))?;
    scalar(b, object, AnnotationDef::FONT_SIZE, |v| uint(v).map(Some))?;
    scalar(b, object, AnnotationDef::ALIGNMENT, |v| string(v).map(Some))
  })
}

pub fn read_link(value: &Value, options: LoadOptions) -> Result<Loaded<LinkDef>, LoadError> {
  read_def(value, options, |b, object| {
    scalar(b, object, LinkDef::SOURCE_ID, uint)?;
    scalar(b, object, LinkDef::SOURCE_PORT, uint)?;
    scalar(b, object, LinkDef::DEST_ID, uint)?;
    scalar(b, object, LinkDef::DEST_PORT, uint)?;
    list(b, object, LinkDef::BENDPOINTS, |v| read_point(v, options))
  })
}

pub fn read_template(value: &Value, options: LoadOptions) -> Result<Loaded<TemplateDef>, LoadError> {
  read_def(value, options, |b, object| {
    scalar(b, object, TemplateDef::TEMPLATE_ID, string)?;
    scalar(b, object, TemplateDef::URI, string)?;
    scalar(b, object, TemplateDef::VERSION, |v| string(v).map(Some))?;
    scalar(b, object, TemplateDef::LINKED, boolean)
  })
}

pub fn read_cipher(value: &Value, options: LoadOptions) -> Result<Loaded<CipherDef>, LoadError> {
  read_def(value, options, |b, object| {
    scalar(b, object, CipherDef::ALGORITHM, string)?;
    scalar(b, object, CipherDef::ITERATIONS, uint)?;
    scalar(b, object, CipherDef::SALT, string)?;
    scalar(b, object, CipherDef::KEY_LENGTH, |v| uint(v).map(Some))
  })
}

pub fn read_credential(
  value: &Value,
  options: LoadOptions,
) -> Result<Loaded<CredentialPlaceholderDef>, LoadError> {
  read_def(value, options, |b, object| {
    scalar(b, object, CredentialPlaceholderDef::NAME, string)?;
    scalar(b, object, CredentialPlaceholderDef::LOGIN, |v| {
      string(v).map(Some)
    })
  })
}

pub fn read_config_value(
  value: &Value,
  options: LoadOptions,
) -> Result<Loaded<ConfigValueDef>, LoadError> {
  if !value.is_object() {
    let mut builder = Builder::with_options(options);
    builder.set(ConfigValueDef::VALUE, || Ok(config_value(value)?), ConfigValue::default())?;
    return builder.build();
  }

  read_def(value, options, |b, object| {
    scalar(b, object, ConfigValueDef::VALUE, config_value)?;
    scalar(b, object, ConfigValueDef::DESCRIPTION, |v| {
      string(v).map(Some)
    })
  })
}

fn read_def<D, F>(value: &Value, options: LoadOptions, fill: F) -> Result<Loaded<D>, LoadError>
where
  D: Def + Default,
  F: FnOnce(&mut Builder<D>, &Object) -> Result<(), LoadError>,
{
  let Some(object) = value.as_object() else {
    let failure = LoadFailure::new(
      D::KIND,
      FailureCause::raised(ReadError::mismatch("object", value)),
    );
    return options.recover(D::default(), failure);
  };

  let mut builder = Builder::with_options(options);
  fill(&mut builder, object)?;

  for key in object.keys() {
    if !D::FIELDS.iter().any(|spec| spec.key.name() == key) {
      debug!(kind = D::KIND, key = %key, "ignoring unknown key");
    }
  }

  builder.build()
}

fn scalar<D, T, P>(
  builder: &mut Builder<D>,
  object: &Object,
  field: Field<D, T>,
  parse: P,
) -> Result<(), LoadError>
where
  D: Def,
  T: FieldValue,
  P: FnOnce(&Value) -> Result<T, ReadError>,
{
  match object.get(field.key().name()) {
    None => {}
    Some(Value::Null) => {
      builder.set_present(field, || Ok(None), T::default())?;
    }
    Some(value) => {
      builder.set(field, || Ok(parse(value)?), T::default())?;
    }
  }
  Ok(())
}

fn nested<D, N, R>(
  builder: &mut Builder<D>,
  object: &Object,
  field: Field<D, N::Value>,
  read: R,
) -> Result<(), LoadError>
where
  D: Def,
  N: Annotated,
  N::Value: FieldValue,
  R: FnOnce(&Value) -> Result<N, LoadError>,
{
  match object.get(field.key().name()) {
    None => {}
    Some(Value::Null) => {
      builder.set_present(field, || Ok(None), Default::default())?;
    }
    Some(value) => {
      let loaded = read(value)?;
      builder.set_nested(field, move || Ok(loaded), Default::default())?;
    }
  }
  Ok(())
}

fn list<D, T, R>(
  builder: &mut Builder<D>,
  object: &Object,
  field: Field<D, Vec<T>>,
  read: R,
) -> Result<(), LoadError>
where
  D: Def,
  T: FieldValue,
  R: Fn(&Value) -> Result<Loaded<T>, LoadError>,
{
  match object.get(field.key().name()) {
    None => {}
    Some(Value::Null) => {
      builder.set_present(field, || Ok(None), Vec::new())?;
    }
    Some(Value::Array(items)) => {
      let loaded = items.iter().map(read).collect::<Result<Vec<_>, _>>()?;
      builder.set_nested(field, move || Ok(loaded), Vec::new())?;
    }
    Some(other) => {
      builder.set(
        field,
        || Err(ReadError::mismatch("array", other).into()),
        Vec::new(),
      )?;
    }
  }
  Ok(())
}

fn keyed<D, T, R>(
  builder: &mut Builder<D>,
  object: &Object,
  field: Field<D, BTreeMap<String, T>>,
  read: R,
) -> Result<(), LoadError>
where
  D: Def,
  T: FieldValue,
  R: Fn(&Value) -> Result<Loaded<T>, LoadError>,
{
  match object.get(field.key().name()) {
    None => {}
    Some(Value::Null) => {
      builder.set_present(field, || Ok(None), BTreeMap::new())?;
    }
    Some(Value::Object(entries)) => {
      let mut loaded = BTreeMap::new();
      for (key, value) in entries {
        loaded.insert(key.clone(), read(value)?);
      }
      builder.set_nested(field, move || Ok(loaded), BTreeMap::new())?;
    }
    Some(other) => {
      builder.set(
        field,
        || Err(ReadError::mismatch("object", other).into()),
        BTreeMap::new(),
      )?;
    }
  }
  Ok(())
}

fn string(value: &Value) -> Result<String, ReadError> {
  value
    .as_str()
    .map(str::to_string)
    .ok_or_else(|| ReadError::mismatch("string", value))
}

fn boolean(value: &Value) -> Result<bool, ReadError> {
  value
    .as_bool()
    .ok_or_else(|| ReadError::mismatch("boolean", value))
}

fn int(value: &Value) -> Result<i64, ReadError> {
  if let Some(n) = value.as_i64() {
    return Ok(n);
  }
  if value.is_u64() {
    return Err(ReadError::OutOfRange {
      value: value.to_string(),
      target: "i64",
    });
  }
  Err(ReadError::mismatch("integer", value))
}

fn uint(value: &Value) -> Result<u32, ReadError> {
  if let Some(n) = value.as_u64() {
    return u32::try_from(n).map_err(|_| ReadError::OutOfRange {
      value: n.to_string(),
      target: "u32",
    });
  }
  if value.is_i64() {
    return Err(ReadError::OutOfRange {
      value: value.to_string(),
      target: "u32",
    });
  }
  Err(ReadError::mismatch("integer", value))
}

fn config_value(value: &Value) -> Result<ConfigValue, ReadError> {
  match value {
    Value::Bool(b) => Ok(ConfigValue::Boolean(*b)),
    Value::Number(n) => match n.as_i64() {
      Some(i) => Ok(ConfigValue::Integer(i)),
      None => n
        .as_f64()
        .map(ConfigValue::Double)
        .ok_or_else(|| ReadError::OutOfRange {
          value: n.to_string(),
          target: "double",
        }),
    },
    Value::String(s) => Ok(ConfigValue::String(s.clone())),
    Value::Array(items) => items
      .iter()
      .map(config_value)
      .collect::<Result<Vec<_>, _>>()
      .map(ConfigValue::List),
    other => Err(ReadError::UnsupportedConfigValue {
      found: json_kind(other),
    }),
  }
}

fn json_kind(value: &Value) -> &'static str {
  match value {
    Value::Null => "null",
    Value::Bool(_) => "boolean",
    Value::Number(_) => "number",
    Value::String(_) => "string",
    Value::Array(_) => "array",
    Value::Object(_) => "object",
  }
}

impl ReadError {
  pub(crate) fn mismatch(expected: &'static str, found: &Value) -> Self {
    ReadError::Mismatch {
      expected,
      found: json_kind(found),
    }
  }
}
