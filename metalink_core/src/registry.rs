use std::collections::BTreeMap;

use parking_lot::Mutex;

use crate::ContentUnit;
use crate::MetadataRecord;
use crate::MetalinkError;
use crate::MetalinkResult;

/// Collects content units during the discovery phase of a build.
///
/// Registration takes `&self` so independent loads can register from
/// different threads. A single writer lock serializes them; a second
/// registration of an identifier always fails with
/// [`MetalinkError::DuplicateIdentifier`] and never replaces the first.
///
/// Call [`freeze`](Self::freeze) once discovery is complete. The returned
/// [`FrozenRegistry`] cannot be mutated.
#[derive(Debug, Default)]
pub struct Registry {
	units: Mutex<BTreeMap<String, ContentUnit>>,
}

impl Registry {
	pub fn new() -> Self {
		Self::default()
	}

	/// Build a registry from already loaded units, failing on the first
	/// duplicate identifier.
	pub fn from_units<I>(units: I) -> MetalinkResult<Self>
	where
		I: IntoIterator<Item = ContentUnit>,
	{
		let registry = Self::new();
		for unit in units {
			registry.register_unit(unit)?;
		}

		Ok(registry)
	}

	/// Register a metadata record under `id`.
	pub fn register(&self, id: impl Into<String>, record: MetadataRecord) -> MetalinkResult<()> {
		self.register_unit(ContentUnit::new(id, record))
	}

	/// Register a fully loaded unit.
	pub fn register_unit(&self, unit: ContentUnit) -> MetalinkResult<()> {
		let mut units = self.units.lock();
		if let Some(existing) = units.get(&unit.id) {
			return Err(MetalinkError::DuplicateIdentifier {
				existing: existing.body.entry().to_string(),
				rejected: unit.body.entry().to_string(),
				id: unit.id,
			});
		}

		tracing::debug!(id = %unit.id, "registered unit");
		units.insert(unit.id.clone(), unit);
		Ok(())
	}

	/// Look up a record by identifier. Returns a copy since the registry is
	/// still open for writes.
	pub fn lookup(&self, id: &str) -> MetalinkResult<MetadataRecord> {
		self.units
			.lock()
			.get(id)
			.map(|unit| unit.record.clone())
			.ok_or_else(|| MetalinkError::UnknownIdentifier { id: id.to_string() })
	}

	pub fn contains(&self, id: &str) -> bool {
		self.units.lock().contains_key(id)
	}

	pub fn len(&self) -> usize {
		self.units.lock().len()
	}

	pub fn is_empty(&self) -> bool {
		self.units.lock().is_empty()
	}

	/// Close the registry for writes.
	pub fn freeze(self) -> FrozenRegistry {
		FrozenRegistry {
			units: self.units.into_inner(),
		}
	}
}

/// The read-only registry used for resolution. Iteration is in identifier
/// order.
#[derive(Debug, Clone, Default)]
pub struct FrozenRegistry {
	units: BTreeMap<String, ContentUnit>,
}

impl FrozenRegistry {
	pub fn lookup(&self, id: &str) -> MetalinkResult<&MetadataRecord> {
		self.unit(id).map(|unit| &unit.record)
	}

	pub fn unit(&self, id: &str) -> MetalinkResult<&ContentUnit> {
		self.units
			.get(id)
			.ok_or_else(|| MetalinkError::UnknownIdentifier { id: id.to_string() })
	}

	pub fn contains(&self, id: &str) -> bool {
		self.units.contains_key(id)
	}

	pub fn ids(&self) -> impl Iterator<Item = &str> {
		self.units.keys().map(String::as_str)
	}

	pub fn units(&self) -> impl Iterator<Item = &ContentUnit> {
		self.units.values()
	}

	pub fn len(&self) -> usize {
		self.units.len()
	}

	pub fn is_empty(&self) -> bool {
		self.units.is_empty()
	}
}
