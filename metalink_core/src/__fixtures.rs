use std::path::Path;

use crate::ContentUnit;
use crate::MemorySource;
use crate::MetadataRecord;
use crate::Registry;

pub(crate) fn lesson(title: &str, references: &[&str]) -> String {
	let references = references
		.iter()
		.map(|reference| format!("\"{reference}\""))
		.collect::<Vec<_>>()
		.join(", ");
	format!("---\ntitle: {title}\nreferences: [{references}]\n---\n\n# {title}\n\nBody of {title}.\n")
}

pub(crate) fn foo_bar_source() -> MemorySource {
	MemorySource::new()
		.with_entry("foo", lesson("Foo", &[]))
		.with_entry("bar", lesson("Bar", &["foo"]))
}

pub(crate) fn unit(id: &str, title: &str, references: &[&str]) -> ContentUnit {
	ContentUnit::new(
		id,
		MetadataRecord::new(title).with_references(references.iter().copied()),
	)
}

pub(crate) fn frozen(units: Vec<ContentUnit>) -> crate::FrozenRegistry {
	Registry::from_units(units)
		.unwrap_or_else(|e| panic!("registry: {e}"))
		.freeze()
}

pub(crate) fn write_file(root: &Path, relative: &str, content: &str) {
	let path = root.join(relative);
	if let Some(parent) = path.parent() {
		std::fs::create_dir_all(parent).unwrap_or_else(|e| panic!("create dir: {e}"));
	}
	std::fs::write(path, content).unwrap_or_else(|e| panic!("write: {e}"));
}
