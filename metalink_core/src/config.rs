use std::path::Path;
use std::path::PathBuf;

use serde::Deserialize;

use crate::MetalinkError;
use crate::MetalinkResult;

/// Default maximum content file size in bytes (10 MB).
pub const DEFAULT_MAX_FILE_SIZE: u64 = 10 * 1024 * 1024;

/// Default frontmatter key holding the list of referenced identifiers.
pub const DEFAULT_REFERENCES_KEY: &str = "references";

/// Default content directory, relative to the project root.
pub const DEFAULT_CONTENT_DIR: &str = "content";

/// Supported config file locations in discovery order (highest precedence
/// first).
pub const CONFIG_FILE_CANDIDATES: [&str; 3] = [
	"metalink.toml",
	".metalink.toml",
	".config/metalink.toml",
];

/// Configuration loaded from a `metalink.toml` file.
///
/// ```toml
/// [content]
/// dir = "lessons"
/// extensions = ["md", "mdx"]
/// max_file_size = 1048576
///
/// [metadata]
/// references_key = "prerequisites"
///
/// [exclude]
/// patterns = ["drafts/", "*.wip.md"]
///
/// [resolve]
/// forbid_cycles = true
/// ```
#[derive(Debug, Clone, Default, Deserialize)]
pub struct MetalinkConfig {
	/// Where content units live and which files count as content.
	#[serde(default)]
	pub content: ContentConfig,
	/// How frontmatter keys map onto metadata records.
	#[serde(default)]
	pub metadata: MetadataConfig,
	/// Exclusion configuration using gitignore-style patterns.
	#[serde(default)]
	pub exclude: ExcludeConfig,
	/// Reference resolution policy.
	#[serde(default)]
	pub resolve: ResolveConfig,
}

/// The `[content]` section.
#[derive(Debug, Clone, Deserialize)]
pub struct ContentConfig {
	/// Content directory relative to the project root.
	#[serde(default = "default_content_dir")]
	pub dir: PathBuf,
	/// File extensions (without the leading dot) treated as content units.
	#[serde(default = "default_extensions")]
	pub extensions: Vec<String>,
	/// Maximum size of a single content file in bytes.
	#[serde(default = "default_max_file_size")]
	pub max_file_size: u64,
}

impl Default for ContentConfig {
	fn default() -> Self {
		Self {
			dir: default_content_dir(),
			extensions: default_extensions(),
			max_file_size: DEFAULT_MAX_FILE_SIZE,
		}
	}
}

/// The `[metadata]` section.
#[derive(Debug, Clone, Deserialize)]
pub struct MetadataConfig {
	/// Frontmatter key that lists referenced identifiers, e.g.
	/// `prerequisites`.
	#[serde(default = "default_references_key")]
	pub references_key: String,
}

impl Default for MetadataConfig {
	fn default() -> Self {
		Self {
			references_key: default_references_key(),
		}
	}
}

/// Configuration for excluding files and directories from discovery.
///
/// Patterns follow gitignore syntax and are relative to the content
/// directory. Supports negation (`!pattern`) and directory markers (trailing
/// `/`).
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ExcludeConfig {
	#[serde(default)]
	pub patterns: Vec<String>,
}

/// The `[resolve]` section.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ResolveConfig {
	/// When true, any reference cycle fails the build. Cycles are allowed by
	/// default since depth-1 resolution cannot loop.
	#[serde(default)]
	pub forbid_cycles: bool,
}

fn default_content_dir() -> PathBuf {
	PathBuf::from(DEFAULT_CONTENT_DIR)
}

fn default_extensions() -> Vec<String> {
	vec!["md".to_string(), "mdx".to_string(), "markdown".to_string()]
}

fn default_max_file_size() -> u64 {
	DEFAULT_MAX_FILE_SIZE
}

fn default_references_key() -> String {
	DEFAULT_REFERENCES_KEY.to_string()
}

impl MetalinkConfig {
	/// Resolve the config path from known discovery candidates.
	#[must_use]
	pub fn resolve_path(root: &Path) -> Option<PathBuf> {
		CONFIG_FILE_CANDIDATES
			.iter()
			.map(|candidate| root.join(candidate))
			.find(|path| path.is_file())
	}

	/// Load the config from the first discovered config file at `root`.
	/// Returns `None` if no config file exists.
	pub fn load(root: &Path) -> MetalinkResult<Option<MetalinkConfig>> {
		let Some(config_path) = Self::resolve_path(root) else {
			return Ok(None);
		};

		let content = std::fs::read_to_string(&config_path)?;
		let config = Self::from_toml_str(&content)?;
		tracing::debug!(path = %config_path.display(), "loaded config");

		Ok(Some(config))
	}

	/// Parse a config from TOML source.
	pub fn from_toml_str(content: &str) -> MetalinkResult<MetalinkConfig> {
		toml::from_str(content).map_err(|e| MetalinkError::ConfigParse(e.to_string()))
	}

	/// Absolute content directory for a project rooted at `root`.
	pub fn content_dir(&self, root: &Path) -> PathBuf {
		root.join(&self.content.dir)
	}
}
