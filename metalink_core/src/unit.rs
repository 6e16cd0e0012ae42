use std::collections::BTreeMap;

use crate::MetadataValue;

/// The serializable description of a content unit, kept apart from its body.
#[derive(Debug, Clone, PartialEq)]
pub struct MetadataRecord {
	/// Human readable title of the unit.
	pub title: String,
	/// Identifiers of other units this one references, in declaration order.
	pub references: Vec<String>,
	/// Every other frontmatter field.
	pub extra: BTreeMap<String, MetadataValue>,
}

impl MetadataRecord {
	pub fn new(title: impl Into<String>) -> Self {
		Self {
			title: title.into(),
			references: Vec::new(),
			extra: BTreeMap::new(),
		}
	}

	#[must_use]
	pub fn with_references<I, S>(mut self, references: I) -> Self
	where
		I: IntoIterator<Item = S>,
		S: Into<String>,
	{
		self.references = references.into_iter().map(Into::into).collect();
		self
	}

	#[must_use]
	pub fn with_field(mut self, key: impl Into<String>, value: impl Into<MetadataValue>) -> Self {
		self.extra.insert(key.into(), value.into());
		self
	}
}

/// Opaque handle to the renderable body of a content unit.
///
/// The handle only names the entry in its [`ContentSource`](crate::ContentSource).
/// Nothing in the metadata path reads through it and it has no `Serialize`
/// implementation, so a body can never leak into page props.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BodyHandle {
	entry: String,
}

impl BodyHandle {
	pub(crate) fn new(entry: impl Into<String>) -> Self {
		Self {
			entry: entry.into(),
		}
	}

	/// The source entry this body belongs to.
	pub fn entry(&self) -> &str {
		&self.entry
	}
}

/// One discovered piece of content.
#[derive(Debug, Clone)]
pub struct ContentUnit {
	pub id: String,
	pub record: MetadataRecord,
	pub body: BodyHandle,
}

impl ContentUnit {
	/// Build a unit whose body lives under the same name as its identifier.
	/// Mostly useful for in-memory registries.
	pub fn new(id: impl Into<String>, record: MetadataRecord) -> Self {
		let id = id.into();
		let body = BodyHandle::new(id.clone());
		Self { id, record, body }
	}
}
