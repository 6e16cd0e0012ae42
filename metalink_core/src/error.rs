use miette::Diagnostic;
use thiserror::Error;

#[derive(Debug, Diagnostic, Error)]
#[non_exhaustive]
pub enum MetalinkError {
	#[error(transparent)]
	#[diagnostic(code(metalink::io_error))]
	Io(#[from] std::io::Error),

	#[error("failed to discover content in `{path}`: {reason}")]
	#[diagnostic(
		code(metalink::discovery),
		help("check that the content directory exists and is readable")
	)]
	Discovery { path: String, reason: String },

	#[error("duplicate identifier `{id}`")]
	#[diagnostic(
		code(metalink::duplicate_identifier),
		help("`{existing}` and `{rejected}` both map to `{id}`; rename one of them")
	)]
	DuplicateIdentifier {
		id: String,
		/// Source entry of the unit that was registered first.
		existing: String,
		/// Source entry of the unit that was turned away.
		rejected: String,
	},

	#[error("unknown identifier `{id}`")]
	#[diagnostic(code(metalink::unknown_identifier))]
	UnknownIdentifier { id: String },

	#[error("`{source_id}` references `{missing_id}`, which does not exist")]
	#[diagnostic(
		code(metalink::missing_reference),
		help("add a content unit named `{missing_id}` or remove the reference from `{source_id}`")
	)]
	MissingReference {
		source_id: String,
		missing_id: String,
	},

	#[error("field `{field}` of `{id}` cannot be serialized into page props")]
	#[diagnostic(
		code(metalink::non_serializable_field),
		help("page props only support strings, numbers, booleans, null and lists of those")
	)]
	NonSerializableField { id: String, field: String },

	#[error("invalid metadata for `{id}`: {reason}")]
	#[diagnostic(
		code(metalink::invalid_metadata),
		help("content units need a frontmatter block with at least a string `title`")
	)]
	InvalidMetadata { id: String, reason: String },

	#[error("reference cycle detected: {}", cycle.join(" -> "))]
	#[diagnostic(
		code(metalink::reference_cycle),
		help("set `forbid_cycles = false` under `[resolve]` to allow cyclic references")
	)]
	ReferenceCycle { cycle: Vec<String> },

	#[error("file too large: `{path}` is {size} bytes (limit: {limit} bytes)")]
	#[diagnostic(
		code(metalink::file_too_large),
		help("increase `max_file_size` under `[content]` in metalink.toml or exclude this file")
	)]
	FileTooLarge { path: String, size: u64, limit: u64 },

	#[error("failed to parse config file: {0}")]
	#[diagnostic(
		code(metalink::config_parse),
		help("check that metalink.toml is valid TOML with [content], [metadata], [exclude] and/or [resolve] sections")
	)]
	ConfigParse(String),
}

impl MetalinkError {
	/// Shorthand for an [`MetalinkError::InvalidMetadata`] error.
	pub(crate) fn invalid_metadata(id: &str, reason: impl Into<String>) -> Self {
		Self::InvalidMetadata {
			id: id.to_string(),
			reason: reason.into(),
		}
	}
}

pub type MetalinkResult<T> = Result<T, MetalinkError>;
pub type AnyError = Box<dyn std::error::Error>;
pub type AnyEmptyResult = Result<(), AnyError>;
pub type AnyResult<T> = Result<T, AnyError>;
