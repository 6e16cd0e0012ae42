use std::path::PathBuf;

use clap::Parser;
use clap::Subcommand;
use clap::ValueEnum;

#[derive(Parser)]
#[command(
	author,
	version,
	about = "Link content metadata at build time and emit serializable page props.",
	long_about = "metalink reads the frontmatter of every content unit in a directory, \
	              resolves references between units into `{ id, title }` summaries and \
	              emits plain JSON props for pages that only need metadata. Bodies are never \
	              read while linking.\n\nQuick start:\n  metalink init   Create a sample \
	              project\n  metalink check  Validate identifiers and references\n  metalink \
	              build  Emit props for every page"
)]
pub struct MetalinkCli {
	#[command(subcommand)]
	pub command: Option<Commands>,

	/// Path to the project root directory.
	#[arg(long, short, global = true)]
	pub path: Option<PathBuf>,

	/// Enable verbose output and debug logging.
	#[arg(long, short, global = true, default_value_t = false)]
	pub verbose: bool,

	/// Disable colored output.
	#[arg(long, global = true, default_value_t = false)]
	pub no_color: bool,
}

#[derive(Subcommand)]
pub enum Commands {
	/// Initialize metalink in a project.
	///
	/// Creates `metalink.toml` and a `content/` directory with two linked
	/// sample lessons. Existing files are left untouched.
	Init,
	/// Resolve every content unit and emit its page props.
	///
	/// Without `--out` a single JSON object keyed by identifier is printed
	/// to stdout. With `--out` one `<id>.json` file is written per page;
	/// nested identifiers create nested directories.
	Build {
		/// Directory to write one JSON file per page into. Relative paths
		/// are resolved against the project root.
		#[arg(long, short)]
		out: Option<PathBuf>,

		/// JSON layout for emitted props.
		#[arg(long, value_enum, default_value_t = PropsFormat::Pretty)]
		format: PropsFormat,
	},
	/// Print the page props for a single content unit.
	Props {
		/// Identifier of the unit, e.g. `basics/ownership`.
		id: String,

		/// JSON layout for emitted props.
		#[arg(long, value_enum, default_value_t = PropsFormat::Pretty)]
		format: PropsFormat,
	},
	/// Validate the project without emitting props.
	///
	/// Runs the full pipeline: discovery, registration, reference
	/// resolution and serialization. Exits with status 2 on the first
	/// failure. Ideal for CI pipelines.
	Check {
		/// Output format for check results.
		#[arg(long, value_enum, default_value_t = OutputFormat::Text)]
		format: OutputFormat,
	},
	/// List every content unit with its references and dependents.
	List {
		/// Output format for the listing.
		#[arg(long, value_enum, default_value_t = OutputFormat::Text)]
		format: OutputFormat,
	},
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum OutputFormat {
	/// Human-readable text output with colors and formatting.
	Text,
	/// JSON output for programmatic consumption.
	Json,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum PropsFormat {
	/// Compact single-line JSON.
	Json,
	/// Indented JSON.
	Pretty,
}

impl PropsFormat {
	/// Serialize `value` using this layout.
	pub fn render<T: serde::Serialize + ?Sized>(self, value: &T) -> serde_json::Result<String> {
		match self {
			Self::Json => serde_json::to_string(value),
			Self::Pretty => serde_json::to_string_pretty(value),
		}
	}
}
