//! Frontmatter extraction.
//!
//! Metadata lives in a leading block delimited by `---` (YAML) or `+++`
//! (TOML):
//!
//! ```markdown
//! ---
//! title: Ownership
//! references: [basics/variables]
//! duration: 15
//! ---
//!
//! # Ownership
//! ```
//!
//! [`scan_frontmatter`] reads line by line and stops at the closing
//! delimiter, so the body of a unit is never read while collecting metadata.

use std::io::BufRead;

use crate::MetadataRecord;
use crate::MetadataValue;
use crate::MetalinkError;
use crate::MetalinkResult;
use crate::value;

/// The syntax of a frontmatter block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrontmatterFormat {
	Yaml,
	Toml,
}

impl FrontmatterFormat {
	fn from_delimiter(line: &str) -> Option<Self> {
		match line.trim_end() {
			"---" => Some(Self::Yaml),
			"+++" => Some(Self::Toml),
			_ => None,
		}
	}

	fn delimiter(self) -> &'static str {
		match self {
			Self::Yaml => "---",
			Self::Toml => "+++",
		}
	}
}

/// Outcome of scanning the start of a content file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FrontmatterScan {
	Found {
		format: FrontmatterFormat,
		text: String,
	},
	/// The first line is not a frontmatter delimiter.
	Missing,
	/// The opening delimiter was never closed.
	Unterminated,
}

/// Read a frontmatter block from `reader`, stopping at the closing
/// delimiter.
pub fn scan_frontmatter<R: BufRead>(mut reader: R) -> std::io::Result<FrontmatterScan> {
	let mut line = String::new();
	if reader.read_line(&mut line)? == 0 {
		return Ok(FrontmatterScan::Missing);
	}

	let first = line.trim_start_matches('\u{feff}');
	let Some(format) = FrontmatterFormat::from_delimiter(first) else {
		return Ok(FrontmatterScan::Missing);
	};

	let mut text = String::new();
	loop {
		line.clear();
		if reader.read_line(&mut line)? == 0 {
			return Ok(FrontmatterScan::Unterminated);
		}

		if line.trim_end() == format.delimiter() {
			return Ok(FrontmatterScan::Found { format, text });
		}

		text.push_str(line.trim_end_matches(['\r', '\n']));
		text.push('\n');
	}
}

/// Return the body of `content`: everything after the frontmatter block, or
/// the whole input when there is none.
pub fn strip_frontmatter(content: &str) -> &str {
	let content = content.trim_start_matches('\u{feff}');
	let mut lines = content.split_inclusive('\n');
	let Some(first) = lines.next() else {
		return content;
	};
	let Some(format) = FrontmatterFormat::from_delimiter(first) else {
		return content;
	};

	let mut offset = first.len();
	for line in lines {
		offset += line.len();
		if line.trim_end() == format.delimiter() {
			return &content[offset..];
		}
	}

	content
}

/// Parse frontmatter text into a [`MetadataRecord`].
///
/// `title` is required and must be a string. `references_key` is optional;
/// when present it must be a list of non-empty strings (or null).
pub fn parse_record(
	id: &str,
	format: FrontmatterFormat,
	text: &str,
	references_key: &str,
) -> MetalinkResult<MetadataRecord> {
	let mut fields = match format {
		FrontmatterFormat::Yaml => {
			let parsed: serde_yaml_ng::Value = serde_yaml_ng::from_str(text)
				.map_err(|e| MetalinkError::invalid_metadata(id, e.to_string()))?;
			match parsed {
				serde_yaml_ng::Value::Mapping(mapping) => value::yaml_mapping(mapping, id)?,
				serde_yaml_ng::Value::Null => Default::default(),
				_ => {
					return Err(MetalinkError::invalid_metadata(
						id,
						"frontmatter must be a mapping",
					));
				}
			}
		}
		FrontmatterFormat::Toml => {
			let table: toml::Table = toml::from_str(text)
				.map_err(|e| MetalinkError::invalid_metadata(id, e.to_string()))?;
			value::toml_table(table)
		}
	};

	let title = match fields.remove("title") {
		Some(MetadataValue::String(title)) => title,
		Some(other) => {
			return Err(MetalinkError::invalid_metadata(
				id,
				format!("`title` must be a string, found {}", other.kind()),
			));
		}
		None => return Err(MetalinkError::invalid_metadata(id, "missing `title`")),
	};

	let references = match fields.remove(references_key) {
		None | Some(MetadataValue::Null) => Vec::new(),
		Some(MetadataValue::List(items)) => {
			let mut references = Vec::with_capacity(items.len());
			for item in items {
				match item {
					MetadataValue::String(reference) if !reference.trim().is_empty() => {
						references.push(reference);
					}
					other => {
						return Err(MetalinkError::invalid_metadata(
							id,
							format!(
								"`{references_key}` must only contain identifiers, found {}",
								other.kind()
							),
						));
					}
				}
			}
			references
		}
		Some(other) => {
			return Err(MetalinkError::invalid_metadata(
				id,
				format!("`{references_key}` must be a list, found {}", other.kind()),
			));
		}
	};

	Ok(MetadataRecord {
		title,
		references,
		extra: fields,
	})
}

/// Scan and parse in one step. Read failures (such as non-UTF-8 text) and
/// `Missing` or `Unterminated` blocks are reported as
/// [`MetalinkError::InvalidMetadata`] for `id`.
pub fn read_record<R: BufRead>(
	id: &str,
	reader: R,
	references_key: &str,
) -> MetalinkResult<MetadataRecord> {
	let scan = scan_frontmatter(reader).map_err(|e| {
		MetalinkError::invalid_metadata(id, format!("failed to read frontmatter: {e}"))
	})?;

	match scan {
		FrontmatterScan::Found { format, text } => parse_record(id, format, &text, references_key),
		FrontmatterScan::Missing => Err(MetalinkError::invalid_metadata(
			id,
			"no frontmatter block found",
		)),
		FrontmatterScan::Unterminated => Err(MetalinkError::invalid_metadata(
			id,
			"frontmatter block is never closed",
		)),
	}
}
