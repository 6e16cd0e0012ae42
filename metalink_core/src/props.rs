use std::collections::BTreeMap;

use serde::Deserialize;
use serde::Serialize;

use crate::FrozenRegistry;
use crate::MetadataValue;
use crate::MetalinkError;
use crate::MetalinkResult;
use crate::ReferenceSummary;
use crate::ResolvedMetadata;
use crate::ResolvedSet;
use crate::resolve_unit;

/// A value that can appear in page props.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PropValue {
	Null,
	Bool(bool),
	Integer(i64),
	Float(f64),
	String(String),
	/// Lists only ever hold scalars.
	List(Vec<PropValue>),
}

/// The payload handed to a page renderer.
///
/// ```json
/// {
///   "id": "ownership",
///   "title": "Ownership",
///   "references": [{ "id": "variables", "title": "Variables" }],
///   "fields": { "duration": 15, "tags": ["memory"] }
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageProps {
	pub id: String,
	pub title: String,
	pub references: Vec<ReferenceSummary>,
	pub fields: BTreeMap<String, PropValue>,
}

/// Convert resolved metadata into page props.
///
/// Fails with [`MetalinkError::NonSerializableField`] for maps, tagged
/// values, non-finite floats and lists holding anything but scalars.
pub fn serialize_props(resolved: &ResolvedMetadata) -> MetalinkResult<PageProps> {
	let mut fields = BTreeMap::new();
	for (key, value) in &resolved.extra {
		let Some(prop) = prop_value(value) else {
			return Err(MetalinkError::NonSerializableField {
				id: resolved.id.clone(),
				field: key.clone(),
			});
		};
		fields.insert(key.clone(), prop);
	}

	Ok(PageProps {
		id: resolved.id.clone(),
		title: resolved.title.clone(),
		references: resolved.references.clone(),
		fields,
	})
}

/// Serialize every resolved unit, keyed by identifier.
pub fn serialize_all(resolved: &ResolvedSet) -> MetalinkResult<BTreeMap<String, PageProps>> {
	resolved
		.values()
		.map(|metadata| serialize_props(metadata).map(|props| (metadata.id.clone(), props)))
		.collect()
}

/// Resolve and serialize the props for one page.
pub fn build_props(registry: &FrozenRegistry, id: &str) -> MetalinkResult<PageProps> {
	serialize_props(&resolve_unit(registry, id)?)
}

fn prop_value(value: &MetadataValue) -> Option<PropValue> {
	match value {
		MetadataValue::List(items) => {
			let items: Option<Vec<PropValue>> = items.iter().map(scalar_value).collect();
			items.map(PropValue::List)
		}
		other => scalar_value(other),
	}
}

fn scalar_value(value: &MetadataValue) -> Option<PropValue> {
	let prop = match value {
		MetadataValue::Null => PropValue::Null,
		MetadataValue::Bool(b) => PropValue::Bool(*b),
		MetadataValue::Integer(i) => PropValue::Integer(*i),
		MetadataValue::Float(f) if f.is_finite() => PropValue::Float(*f),
		MetadataValue::String(s) => PropValue::String(s.clone()),
		_ => return None,
	};

	Some(prop)
}
