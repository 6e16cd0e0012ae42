use std::collections::BTreeMap;

use crate::MetalinkError;
use crate::MetalinkResult;

/// A single frontmatter value.
///
/// Wider than what page props accept: maps and tagged values can be loaded
/// into a [`MetadataRecord`](crate::MetadataRecord) but are rejected by
/// [`serialize_props`](crate::serialize_props).
#[derive(Debug, Clone, PartialEq)]
#[non_exhaustive]
pub enum MetadataValue {
	Null,
	Bool(bool),
	Integer(i64),
	Float(f64),
	String(String),
	List(Vec<MetadataValue>),
	Map(BTreeMap<String, MetadataValue>),
	/// A YAML tagged value such as `!fn renderLesson`. Tags stand in for
	/// values that only make sense inside the renderer.
	Tagged {
		tag: String,
		value: Box<MetadataValue>,
	},
}

impl MetadataValue {
	/// Returns the string slice if this is a [`MetadataValue::String`].
	pub fn as_str(&self) -> Option<&str> {
		match self {
			Self::String(value) => Some(value.as_str()),
			_ => None,
		}
	}

	/// Returns true for null, booleans, integers, finite floats and strings.
	pub fn is_scalar(&self) -> bool {
		match self {
			Self::Null | Self::Bool(_) | Self::Integer(_) | Self::String(_) => true,
			Self::Float(value) => value.is_finite(),
			Self::List(_) | Self::Map(_) | Self::Tagged { .. } => false,
		}
	}

	/// A short name for the kind of value, used in error messages.
	pub fn kind(&self) -> &'static str {
		match self {
			Self::Null => "null",
			Self::Bool(_) => "bool",
			Self::Integer(_) => "integer",
			Self::Float(_) => "float",
			Self::String(_) => "string",
			Self::List(_) => "list",
			Self::Map(_) => "map",
			Self::Tagged { .. } => "tagged value",
		}
	}
}

impl From<&str> for MetadataValue {
	fn from(value: &str) -> Self {
		Self::String(value.to_string())
	}
}

impl From<String> for MetadataValue {
	fn from(value: String) -> Self {
		Self::String(value)
	}
}

impl From<bool> for MetadataValue {
	fn from(value: bool) -> Self {
		Self::Bool(value)
	}
}

impl From<i64> for MetadataValue {
	fn from(value: i64) -> Self {
		Self::Integer(value)
	}
}

impl From<f64> for MetadataValue {
	fn from(value: f64) -> Self {
		Self::Float(value)
	}
}

impl<T: Into<MetadataValue>> From<Vec<T>> for MetadataValue {
	fn from(values: Vec<T>) -> Self {
		Self::List(values.into_iter().map(Into::into).collect())
	}
}

/// Convert a parsed YAML value. `id` is only used for error context.
pub(crate) fn from_yaml(value: serde_yaml_ng::Value, id: &str) -> MetalinkResult<MetadataValue> {
	use serde_yaml_ng::Value;

	let converted = match value {
		Value::Null => MetadataValue::Null,
		Value::Bool(b) => MetadataValue::Bool(b),
		Value::Number(number) => {
			if let Some(i) = number.as_i64() {
				MetadataValue::Integer(i)
			} else if let Some(f) = number.as_f64() {
				MetadataValue::Float(f)
			} else {
				return Err(MetalinkError::invalid_metadata(
					id,
					format!("number `{number}` is out of range"),
				));
			}
		}
		Value::String(s) => MetadataValue::String(s),
		Value::Sequence(items) => {
			let items: MetalinkResult<Vec<MetadataValue>> =
				items.into_iter().map(|item| from_yaml(item, id)).collect();
			MetadataValue::List(items?)
		}
		Value::Mapping(mapping) => MetadataValue::Map(yaml_mapping(mapping, id)?),
		Value::Tagged(tagged) => {
			let tagged = *tagged;
			MetadataValue::Tagged {
				tag: tagged.tag.to_string(),
				value: Box::new(from_yaml(tagged.value, id)?),
			}
		}
	};

	Ok(converted)
}

/// Convert a YAML mapping with string keys.
pub(crate) fn yaml_mapping(
	mapping: serde_yaml_ng::Mapping,
	id: &str,
) -> MetalinkResult<BTreeMap<String, MetadataValue>> {
	let mut map = BTreeMap::new();
	for (key, value) in mapping {
		let serde_yaml_ng::Value::String(key) = key else {
			return Err(MetalinkError::invalid_metadata(
				id,
				"frontmatter keys must be strings",
			));
		};
		map.insert(key, from_yaml(value, id)?);
	}

	Ok(map)
}

/// Convert a parsed TOML value. Datetimes become strings.
pub(crate) fn from_toml(value: toml::Value) -> MetadataValue {
	match value {
		toml::Value::String(s) => MetadataValue::String(s),
		toml::Value::Integer(i) => MetadataValue::Integer(i),
		toml::Value::Float(f) => MetadataValue::Float(f),
		toml::Value::Boolean(b) => MetadataValue::Bool(b),
		toml::Value::Datetime(dt) => MetadataValue::String(dt.to_string()),
		toml::Value::Array(items) => MetadataValue::List(items.into_iter().map(from_toml).collect()),
		toml::Value::Table(table) => MetadataValue::Map(toml_table(table)),
	}
}

pub(crate) fn toml_table(table: toml::Table) -> BTreeMap<String, MetadataValue> {
	table
		.into_iter()
		.map(|(key, value)| (key, from_toml(value)))
		.collect()
}
