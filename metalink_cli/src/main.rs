use std::path::Path;
use std::path::PathBuf;
use std::process;

use clap::Parser;
use metalink_core::AnyResult;
use metalink_core::BuildOutput;
use metalink_core::MetalinkError;
use metalink_core::build_with_config;
use metalink_core::config::CONFIG_FILE_CANDIDATES;
use metalink_core::config::MetalinkConfig;
use metalink_core::dependents;
use metalink_cli::Commands;
use metalink_cli::MetalinkCli;
use metalink_cli::OutputFormat;
use metalink_cli::PropsFormat;
use owo_colors::OwoColorize;
use serde::Serialize;
use tracing_subscriber::EnvFilter;

static USE_COLOR: std::sync::atomic::AtomicBool = std::sync::atomic::AtomicBool::new(true);

fn color_enabled() -> bool {
	USE_COLOR.load(std::sync::atomic::Ordering::Relaxed)
}

/// Apply ANSI color codes only when color is enabled.
macro_rules! colored {
	($text:expr,red) => {
		if color_enabled() {
			format!("{}", $text.red())
		} else {
			format!("{}", $text)
		}
	};
	($text:expr,green) => {
		if color_enabled() {
			format!("{}", $text.green())
		} else {
			format!("{}", $text)
		}
	};
	($text:expr,bold) => {
		if color_enabled() {
			format!("{}", $text.bold())
		} else {
			format!("{}", $text)
		}
	};
}

fn main() {
	let args = MetalinkCli::parse();

	// Respect NO_COLOR env var and --no-color flag.
	let use_color = !args.no_color && std::env::var_os("NO_COLOR").is_none();
	if !use_color {
		USE_COLOR.store(false, std::sync::atomic::Ordering::Relaxed);
	}

	init_tracing(args.verbose, use_color);

	miette::set_hook(Box::new(move |_| {
		Box::new(
			miette::MietteHandlerOpts::new()
				.color(use_color)
				.unicode(use_color)
				.build(),
		)
	}))
	.ok();

	let result = match &args.command {
		Some(Commands::Init) => run_init(&args),
		Some(Commands::Build { out, format }) => run_build(&args, out.as_deref(), *format),
		Some(Commands::Props { id, format }) => run_props(&args, id, *format),
		Some(Commands::Check { format }) => run_check(&args, *format),
		Some(Commands::List { format }) => run_list(&args, *format),
		None => {
			eprintln!("No subcommand specified. Run `metalink --help` for usage.");
			process::exit(1);
		}
	};

	if let Err(e) = result {
		match e.downcast::<MetalinkError>() {
			Ok(err) => {
				let report: miette::Report = (*err).into();
				eprintln!("{report:?}");
			}
			Err(e) => {
				eprintln!("{} {e}", colored!("error:", red));
			}
		}
		process::exit(2);
	}
}

/// Logs go to stderr so stdout stays valid JSON. `METALINK_LOG` takes
/// precedence over `--verbose`.
fn init_tracing(verbose: bool, use_color: bool) {
	let default_level = if verbose { "debug" } else { "warn" };
	let filter = EnvFilter::try_from_env("METALINK_LOG")
		.unwrap_or_else(|_| EnvFilter::new(format!("metalink_core={default_level}")));

	let _ = tracing_subscriber::fmt()
		.with_env_filter(filter)
		.with_writer(std::io::stderr)
		.with_ansi(use_color)
		.with_target(false)
		.try_init();
}

fn resolve_root(args: &MetalinkCli) -> PathBuf {
	args.path
		.clone()
		.unwrap_or_else(|| std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")))
}

fn load_config(args: &MetalinkCli, root: &Path) -> AnyResult<MetalinkConfig> {
	let config = MetalinkConfig::load(root)?;
	if args.verbose {
		match MetalinkConfig::resolve_path(root) {
			Some(path) => eprintln!("Using config: {}", path.display()),
			None => eprintln!("No config file found, using defaults"),
		}
	}

	Ok(config.unwrap_or_default())
}

fn run_pipeline(args: &MetalinkCli) -> AnyResult<(PathBuf, BuildOutput)> {
	let root = resolve_root(args);
	let config = load_config(args, &root)?;
	let output = build_with_config(&root, &config)?;

	Ok((root, output))
}

fn run_init(args: &MetalinkCli) -> AnyResult<()> {
	let root = resolve_root(args);
	let config_path = root.join(CONFIG_FILE_CANDIDATES[0]);
	let content_dir = root.join("content");

	if let Some(existing) = MetalinkConfig::resolve_path(&root) {
		println!("Config file already exists: {}", existing.display());
	} else {
		let sample_config = "# metalink configuration\n\n[content]\n# Directory holding content \
		                     units, relative to this file.\ndir = \"content\"\n# extensions = \
		                     [\"md\", \"mdx\", \"markdown\"]\n\n[metadata]\n# Frontmatter key \
		                     listing referenced identifiers.\nreferences_key = \
		                     \"references\"\n\n# [exclude]\n# patterns = [\"drafts/\"]\n\n# \
		                     [resolve]\n# forbid_cycles = true\n";
		std::fs::write(&config_path, sample_config)?;
		println!("Created {}", CONFIG_FILE_CANDIDATES[0]);
	}

	let samples = [
		(
			"getting-started.md",
			"---\ntitle: Getting Started\nreferences: []\nduration: 5\n---\n\n# Getting \
			 Started\n\nWelcome!\n",
		),
		(
			"next-steps.md",
			"---\ntitle: Next Steps\nreferences:\n  - getting-started\nduration: 10\n---\n\n# \
			 Next Steps\n\nBuild on what you learned.\n",
		),
	];

	std::fs::create_dir_all(&content_dir)?;
	for (name, content) in samples {
		let path = content_dir.join(name);
		if path.exists() {
			println!("Content file already exists: {}", path.display());
			continue;
		}

		std::fs::write(&path, content)?;
		println!("Created content file: {}", path.display());
	}

	println!();
	println!("Next steps:");
	println!("  1. Add content units to {}", content_dir.display());
	println!("  2. Link them with a `references` list in the frontmatter");
	println!("  3. Run `metalink check` to validate references");

	Ok(())
}

fn run_build(args: &MetalinkCli, out: Option<&Path>, format: PropsFormat) -> AnyResult<()> {
	let (root, output) = run_pipeline(args)?;

	let Some(out) = out else {
		println!("{}", format.render(&output.props)?);
		return Ok(());
	};

	let out_dir = if out.is_absolute() {
		out.to_path_buf()
	} else {
		root.join(out)
	};

	for (id, props) in &output.props {
		let path = out_dir.join(format!("{id}.json"));
		if let Some(parent) = path.parent() {
			std::fs::create_dir_all(parent)?;
		}

		let mut json = format.render(props)?;
		json.push('\n');
		std::fs::write(&path, json)?;

		if args.verbose {
			println!("  wrote {}", path.display());
		}
	}

	println!(
		"{} {} page(s) to {}",
		colored!("Wrote", green),
		output.props.len(),
		out_dir.display()
	);

	Ok(())
}

fn run_props(args: &MetalinkCli, id: &str, format: PropsFormat) -> AnyResult<()> {
	let (_, output) = run_pipeline(args)?;
	let props = output.page(id)?;
	println!("{}", format.render(props)?);

	Ok(())
}

fn run_check(args: &MetalinkCli, format: OutputFormat) -> AnyResult<()> {
	let (_, output) = run_pipeline(args)?;
	let units = output.registry.len();
	let references: usize = output
		.registry
		.units()
		.map(|unit| unit.record.references.len())
		.sum();

	match format {
		OutputFormat::Json => {
			let summary = serde_json::json!({
				"ok": true,
				"units": units,
				"references": references,
				"cycle": output.cycle,
			});
			println!("{summary}");
		}
		OutputFormat::Text => {
			println!(
				"{} {units} content unit(s), {references} reference(s) resolved.",
				colored!("Check passed:", green)
			);
		}
	}

	Ok(())
}

#[derive(Serialize)]
struct ListEntry<'a> {
	id: &'a str,
	title: &'a str,
	references: &'a [String],
	dependents: Vec<&'a str>,
}

fn run_list(args: &MetalinkCli, format: OutputFormat) -> AnyResult<()> {
	let (_, output) = run_pipeline(args)?;
	let entries: Vec<ListEntry<'_>> = output
		.registry
		.units()
		.map(|unit| {
			ListEntry {
				id: &unit.id,
				title: &unit.record.title,
				references: &unit.record.references,
				dependents: dependents(&output.registry, &unit.id),
			}
		})
		.collect();

	if matches!(format, OutputFormat::Json) {
		println!("{}", serde_json::to_string_pretty(&entries)?);
		return Ok(());
	}

	if entries.is_empty() {
		println!("No content units found.");
		return Ok(());
	}

	println!("{}", colored!(format!("Content units ({}):", entries.len()), bold));
	for entry in &entries {
		println!("  {} {}", entry.id, colored!(format!("({})", entry.title), bold));
		if !entry.references.is_empty() {
			println!("    references:    {}", entry.references.join(", "));
		}
		if !entry.dependents.is_empty() {
			println!("    referenced by: {}", entry.dependents.join(", "));
		}
	}

	Ok(())
}
