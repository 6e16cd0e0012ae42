use std::collections::BTreeMap;
use std::collections::HashSet;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use std::path::PathBuf;
use std::sync::atomic::AtomicUsize;
use std::sync::atomic::Ordering;

use ignore::gitignore::Gitignore;
use ignore::gitignore::GitignoreBuilder;
use rayon::prelude::*;

use crate::BodyHandle;
use crate::ContentUnit;
use crate::MetadataRecord;
use crate::MetalinkError;
use crate::MetalinkResult;
use crate::Registry;
use crate::config::DEFAULT_REFERENCES_KEY;
use crate::config::MetalinkConfig;
use crate::frontmatter;

/// Where content units come from.
///
/// Listing, metadata reads and body reads are separate capabilities. The
/// metadata path ([`discover_units`], [`load_into_registry`]) only ever calls
/// [`list_entries`](Self::list_entries) and
/// [`read_metadata`](Self::read_metadata).
pub trait ContentSource: Sync {
	/// Names of every entry in the source. Order is not significant.
	fn list_entries(&self) -> MetalinkResult<Vec<String>>;

	/// The unit identifier for an entry name.
	fn identifier(&self, entry: &str) -> String;

	/// Extract the metadata record of an entry without reading its body.
	fn read_metadata(&self, entry: &str) -> MetalinkResult<MetadataRecord>;

	/// Read the renderable body of an entry.
	fn read_body(&self, entry: &str) -> MetalinkResult<String>;
}

/// A content directory on disk.
#[derive(Debug, Clone)]
pub struct FsSource {
	dir: PathBuf,
	extensions: Vec<String>,
	exclude: Gitignore,
	max_file_size: u64,
	references_key: String,
}

impl FsSource {
	/// Build a source for the content directory configured for `root`.
	pub fn from_config(root: &Path, config: &MetalinkConfig) -> MetalinkResult<Self> {
		let dir = config.content_dir(root);
		let exclude = build_exclude_matcher(&dir, &config.exclude.patterns)?;

		Ok(Self {
			dir,
			extensions: config.content.extensions.clone(),
			exclude,
			max_file_size: config.content.max_file_size,
			references_key: config.metadata.references_key.clone(),
		})
	}

	/// A source for `dir` using default settings.
	pub fn new(dir: impl Into<PathBuf>) -> MetalinkResult<Self> {
		let dir = dir.into();
		let config = MetalinkConfig::default();
		let exclude = build_exclude_matcher(&dir, &[])?;

		Ok(Self {
			dir,
			extensions: config.content.extensions,
			exclude,
			max_file_size: config.content.max_file_size,
			references_key: config.metadata.references_key,
		})
	}

	pub fn dir(&self) -> &Path {
		&self.dir
	}

	fn entry_path(&self, entry: &str) -> PathBuf {
		self.dir.join(entry)
	}

	fn is_content_file(&self, path: &Path) -> bool {
		path.extension()
			.and_then(|ext| ext.to_str())
			.is_some_and(|ext| self.extensions.iter().any(|allowed| allowed == ext))
	}

	fn walk_dir(
		&self,
		dir: &Path,
		entries: &mut Vec<String>,
		visited_dirs: &mut HashSet<PathBuf>,
	) -> MetalinkResult<()> {
		// Detect symlink cycles by tracking canonical paths.
		let canonical = dir.canonicalize().unwrap_or_else(|_| dir.to_path_buf());
		if !visited_dirs.insert(canonical) {
			return Err(discovery_error(dir, "symlink cycle detected"));
		}

		let read_dir = std::fs::read_dir(dir).map_err(|e| discovery_error(dir, e))?;
		for entry in read_dir {
			let entry = entry.map_err(|e| discovery_error(dir, e))?;
			let path = entry.path();

			if path
				.file_name()
				.and_then(|name| name.to_str())
				.is_some_and(|name| name.starts_with('.'))
			{
				continue;
			}

			let is_dir = path.is_dir();
			if self.exclude.matched(&path, is_dir).is_ignore() {
				continue;
			}

			if is_dir {
				self.walk_dir(&path, entries, visited_dirs)?;
			} else if self.is_content_file(&path) {
				entries.push(relative_entry(&self.dir, &path));
			}
		}

		Ok(())
	}
}

impl ContentSource for FsSource {
	fn list_entries(&self) -> MetalinkResult<Vec<String>> {
		if !self.dir.is_dir() {
			return Err(discovery_error(&self.dir, "not a readable directory"));
		}

		let mut entries = Vec::new();
		let mut visited_dirs = HashSet::new();
		self.walk_dir(&self.dir, &mut entries, &mut visited_dirs)?;
		entries.sort();

		Ok(entries)
	}

	fn identifier(&self, entry: &str) -> String {
		match entry.rsplit_once('.') {
			Some((stem, ext)) if !stem.is_empty() && !ext.contains('/') => stem.to_string(),
			_ => entry.to_string(),
		}
	}

	fn read_metadata(&self, entry: &str) -> MetalinkResult<MetadataRecord> {
		let path = self.entry_path(entry);
		let metadata = std::fs::metadata(&path).map_err(|e| discovery_error(&path, e))?;
		if metadata.len() > self.max_file_size {
			return Err(MetalinkError::FileTooLarge {
				path: path.display().to_string(),
				size: metadata.len(),
				limit: self.max_file_size,
			});
		}

		let file = File::open(&path).map_err(|e| discovery_error(&path, e))?;
		frontmatter::read_record(
			&self.identifier(entry),
			BufReader::new(file),
			&self.references_key,
		)
	}

	fn read_body(&self, entry: &str) -> MetalinkResult<String> {
		let path = self.entry_path(entry);
		let content = std::fs::read_to_string(&path).map_err(|e| discovery_error(&path, e))?;
		Ok(frontmatter::strip_frontmatter(&content).to_string())
	}
}

/// An in-memory content directory.
///
/// Entry names double as identifiers. Body reads are counted so callers can
/// verify that collecting metadata never touched a body.
#[derive(Debug, Default)]
pub struct MemorySource {
	entries: BTreeMap<String, String>,
	references_key: Option<String>,
	body_reads: AtomicUsize,
}

impl MemorySource {
	pub fn new() -> Self {
		Self::default()
	}

	/// Add an entry with its full file content (frontmatter and body).
	#[must_use]
	pub fn with_entry(mut self, id: impl Into<String>, content: impl Into<String>) -> Self {
		self.insert(id, content);
		self
	}

	/// Use a different frontmatter key for references.
	#[must_use]
	pub fn with_references_key(mut self, key: impl Into<String>) -> Self {
		self.references_key = Some(key.into());
		self
	}

	pub fn insert(&mut self, id: impl Into<String>, content: impl Into<String>) {
		self.entries.insert(id.into(), content.into());
	}

	/// How many times [`ContentSource::read_body`] has been called.
	pub fn body_reads(&self) -> usize {
		self.body_reads.load(Ordering::SeqCst)
	}

	fn entry(&self, entry: &str) -> MetalinkResult<&str> {
		self.entries
			.get(entry)
			.map(String::as_str)
			.ok_or_else(|| MetalinkError::Discovery {
				path: entry.to_string(),
				reason: "no such entry".to_string(),
			})
	}
}

impl ContentSource for MemorySource {
	fn list_entries(&self) -> MetalinkResult<Vec<String>> {
		Ok(self.entries.keys().cloned().collect())
	}

	fn identifier(&self, entry: &str) -> String {
		entry.to_string()
	}

	fn read_metadata(&self, entry: &str) -> MetalinkResult<MetadataRecord> {
		let content = self.entry(entry)?;
		let references_key = self
			.references_key
			.as_deref()
			.unwrap_or(DEFAULT_REFERENCES_KEY);
		frontmatter::read_record(entry, content.as_bytes(), references_key)
	}

	fn read_body(&self, entry: &str) -> MetalinkResult<String> {
		self.body_reads.fetch_add(1, Ordering::SeqCst);
		let content = self.entry(entry)?;
		Ok(frontmatter::strip_frontmatter(content).to_string())
	}
}

/// Load a single entry's metadata into a [`ContentUnit`].
pub fn load_unit<S: ContentSource + ?Sized>(source: &S, entry: &str) -> MetalinkResult<ContentUnit> {
	let id = source.identifier(entry);
	let record = source.read_metadata(entry)?;
	tracing::debug!(%id, references = record.references.len(), "loaded metadata");

	Ok(ContentUnit {
		id,
		record,
		body: BodyHandle::new(entry),
	})
}

/// Discover every unit in `source`, loading metadata concurrently.
///
/// The result is ordered by identifier regardless of load order.
pub fn discover_units<S: ContentSource + ?Sized>(source: &S) -> MetalinkResult<Vec<ContentUnit>> {
	let entries = source.list_entries()?;
	let mut units = entries
		.par_iter()
		.map(|entry| load_unit(source, entry))
		.collect::<MetalinkResult<Vec<_>>>()?;
	units.sort_by(|a, b| a.id.cmp(&b.id));
	tracing::info!(units = units.len(), "discovered content units");

	Ok(units)
}

/// Discover every unit in `source` and register it as soon as it loads.
///
/// Returns the number of registered units. The first failure aborts the
/// batch.
pub fn load_into_registry<S: ContentSource + ?Sized>(
	source: &S,
	registry: &Registry,
) -> MetalinkResult<usize> {
	let entries = source.list_entries()?;
	entries
		.par_iter()
		.try_for_each(|entry| registry.register_unit(load_unit(source, entry)?))?;
	tracing::info!(units = entries.len(), "registered content units");

	Ok(entries.len())
}

/// Read the body behind a handle. This is the only way to reach a body.
pub fn load_body<S: ContentSource + ?Sized>(source: &S, body: &BodyHandle) -> MetalinkResult<String> {
	source.read_body(body.entry())
}

/// Build a `Gitignore` matcher from exclude patterns in `[exclude]`.
fn build_exclude_matcher(root: &Path, patterns: &[String]) -> MetalinkResult<Gitignore> {
	let mut builder = GitignoreBuilder::new(root);
	for pattern in patterns {
		builder.add_line(None, pattern).map_err(|e| {
			MetalinkError::ConfigParse(format!("invalid exclude pattern `{pattern}`: {e}"))
		})?;
	}
	builder
		.build()
		.map_err(|e| MetalinkError::ConfigParse(format!("failed to build exclude rules: {e}")))
}

fn relative_entry(root: &Path, path: &Path) -> String {
	path.strip_prefix(root)
		.unwrap_or(path)
		.to_string_lossy()
		.replace('\\', "/")
}

fn discovery_error(path: &Path, reason: impl ToString) -> MetalinkError {
	MetalinkError::Discovery {
		path: path.display().to_string(),
		reason: reason.to_string(),
	}
}
