use std::collections::BTreeMap;
use std::path::Path;

use crate::ContentSource;
use crate::FrozenRegistry;
use crate::FsSource;
use crate::MetalinkError;
use crate::MetalinkResult;
use crate::PageProps;
use crate::Registry;
use crate::config::MetalinkConfig;
use crate::config::ResolveConfig;
use crate::find_cycle;
use crate::load_into_registry;
use crate::resolve_all;
use crate::serialize_all;

/// Everything produced by one build pass.
#[derive(Debug)]
pub struct BuildOutput {
	/// The frozen registry the props were resolved against.
	pub registry: FrozenRegistry,
	/// Page props keyed by unit identifier.
	pub props: BTreeMap<String, PageProps>,
	/// The first reference cycle found, when cycles are allowed.
	pub cycle: Option<Vec<String>>,
}

impl BuildOutput {
	/// Props for a single page.
	pub fn page(&self, id: &str) -> MetalinkResult<&PageProps> {
		self.props
			.get(id)
			.ok_or_else(|| MetalinkError::UnknownIdentifier { id: id.to_string() })
	}
}

/// Build the project at `root`, using `metalink.toml` when present.
pub fn build(root: &Path) -> MetalinkResult<BuildOutput> {
	let config = MetalinkConfig::load(root)?.unwrap_or_default();
	build_with_config(root, &config)
}

/// Build the project at `root` with an explicit config.
pub fn build_with_config(root: &Path, config: &MetalinkConfig) -> MetalinkResult<BuildOutput> {
	let source = FsSource::from_config(root, config)?;
	tracing::debug!(dir = %source.dir().display(), "building content");
	build_from_source(&source, &config.resolve)
}

/// Run a full pass over `source`: register, freeze, resolve, serialize.
///
/// Any failure aborts the pass and no props are returned.
pub fn build_from_source<S: ContentSource + ?Sized>(
	source: &S,
	resolve: &ResolveConfig,
) -> MetalinkResult<BuildOutput> {
	let registry = Registry::new();
	load_into_registry(source, &registry)?;
	let registry = registry.freeze();

	let cycle = find_cycle(&registry);
	if let Some(cycle) = &cycle {
		if resolve.forbid_cycles {
			return Err(MetalinkError::ReferenceCycle {
				cycle: cycle.clone(),
			});
		}

		tracing::warn!(cycle = %cycle.join(" -> "), "reference cycle");
	}

	let resolved = resolve_all(&registry)?;
	let props = serialize_all(&resolved)?;
	tracing::info!(pages = props.len(), "built page props");

	Ok(BuildOutput {
		registry,
		props,
		cycle,
	})
}
