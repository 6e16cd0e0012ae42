use std::collections::BTreeMap;
use std::collections::HashMap;

use derive_more::Deref;
use serde::Deserialize;
use serde::Serialize;

use crate::FrozenRegistry;
use crate::MetadataRecord;
use crate::MetadataValue;
use crate::MetalinkError;
use crate::MetalinkResult;

/// The shallow view of a referenced unit. It has no references of its own,
/// which is what caps resolution at depth 1.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReferenceSummary {
	pub id: String,
	pub title: String,
}

/// A metadata record with its references replaced by summaries.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedMetadata {
	pub id: String,
	pub title: String,
	pub references: Vec<ReferenceSummary>,
	pub extra: BTreeMap<String, MetadataValue>,
}

/// Every resolved unit of a build, keyed by identifier.
#[derive(Debug, Clone, Default, Deref)]
pub struct ResolvedSet(BTreeMap<String, ResolvedMetadata>);

impl ResolvedSet {
	pub fn into_inner(self) -> BTreeMap<String, ResolvedMetadata> {
		self.0
	}
}

/// Resolve `record` (registered as `id`) against the registry.
///
/// References are visited in declaration order and the first one without a
/// target fails with [`MetalinkError::MissingReference`].
pub fn resolve_record(
	registry: &FrozenRegistry,
	id: &str,
	record: &MetadataRecord,
) -> MetalinkResult<ResolvedMetadata> {
	let mut references = Vec::with_capacity(record.references.len());
	for reference in &record.references {
		let Ok(target) = registry.lookup(reference) else {
			return Err(MetalinkError::MissingReference {
				source_id: id.to_string(),
				missing_id: reference.clone(),
			});
		};

		references.push(ReferenceSummary {
			id: reference.clone(),
			title: target.title.clone(),
		});
	}

	Ok(ResolvedMetadata {
		id: id.to_string(),
		title: record.title.clone(),
		references,
		extra: record.extra.clone(),
	})
}

/// Resolve a single registered unit.
pub fn resolve_unit(registry: &FrozenRegistry, id: &str) -> MetalinkResult<ResolvedMetadata> {
	let record = registry.lookup(id)?;
	resolve_record(registry, id, record)
}

/// Resolve every unit in identifier order, stopping at the first missing
/// reference.
pub fn resolve_all(registry: &FrozenRegistry) -> MetalinkResult<ResolvedSet> {
	let mut resolved = BTreeMap::new();
	for unit in registry.units() {
		resolved.insert(unit.id.clone(), resolve_record(registry, &unit.id, &unit.record)?);
	}

	Ok(ResolvedSet(resolved))
}

/// Identifiers of the units that reference `id`, in identifier order.
pub fn dependents<'a>(registry: &'a FrozenRegistry, id: &str) -> Vec<&'a str> {
	registry
		.units()
		.filter(|unit| unit.record.references.iter().any(|reference| reference == id))
		.map(|unit| unit.id.as_str())
		.collect()
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Visit {
	InProgress,
	Done,
}

/// Find a reference cycle, if any.
///
/// The search starts from units in identifier order and follows references
/// in declaration order, so the reported cycle is stable between runs. The
/// returned path repeats its first identifier at the end (`a -> b -> a`).
/// References without a target are ignored here; resolution reports them.
pub fn find_cycle(registry: &FrozenRegistry) -> Option<Vec<String>> {
	let mut state = HashMap::new();
	let mut stack = Vec::new();

	for id in registry.ids() {
		if state.contains_key(id) {
			continue;
		}

		if let Some(cycle) = visit(registry, id, &mut state, &mut stack) {
			return Some(cycle);
		}
	}

	None
}

fn visit<'a>(
	registry: &'a FrozenRegistry,
	id: &'a str,
	state: &mut HashMap<&'a str, Visit>,
	stack: &mut Vec<&'a str>,
) -> Option<Vec<String>> {
	state.insert(id, Visit::InProgress);
	stack.push(id);

	if let Ok(record) = registry.lookup(id) {
		for reference in &record.references {
			let reference = reference.as_str();
			match state.get(reference) {
				Some(Visit::InProgress) => {
					let start = stack.iter().position(|entry| *entry == reference)?;
					let mut cycle: Vec<String> =
						stack[start..].iter().map(ToString::to_string).collect();
					cycle.push(reference.to_string());
					return Some(cycle);
				}
				Some(Visit::Done) => {}
				None => {
					if !registry.contains(reference) {
						continue;
					}

					if let Some(cycle) = visit(registry, reference, state, stack) {
						return Some(cycle);
					}
				}
			}
		}
	}

	stack.pop();
	state.insert(id, Visit::Done);
	None
}
