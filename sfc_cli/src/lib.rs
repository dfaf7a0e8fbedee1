use std::path::PathBuf;

use clap::Parser;
use clap::Subcommand;
use clap::ValueEnum;

#[derive(Parser)]
#[command(
	author,
	version,
	about = "Split single file components into separate template, script and style files.",
	long_about = "sfc transpiles single file components. Each top-level tag of a component \
	              file (such as <template>, <script> or <style>) is run through the processor \
	              named by its `processor` attribute and written to the path given by its `dst` \
	              attribute.\n\nQuick start:\n  sfc init        Create a sample sfc.toml\n  sfc \
	              transpile   Transpile the components matched by `src`\n  sfc parse FILE  \
	              Show the nodes found in a component"
)]
pub struct SfcCli {
	#[command(subcommand)]
	pub command: Option<Commands>,

	/// Path to the project root directory.
	#[arg(long, short, global = true)]
	pub path: Option<PathBuf>,

	/// Enable verbose output.
	#[arg(long, short, global = true, default_value_t = false)]
	pub verbose: bool,

	/// Disable colored output.
	#[arg(long, global = true, default_value_t = false)]
	pub no_color: bool,
}

#[derive(Subcommand)]
pub enum Commands {
	/// Initialize sfc in a project by creating a sample `sfc.toml`.
	///
	/// If a config file already exists, this command is a no-op and exits
	/// successfully.
	Init,
	/// Transpile component files.
	///
	/// Files given on the command line are transpiled in order. Without
	/// files, the components matched by the `src` globs of `sfc.toml` are
	/// transpiled.
	Transpile {
		/// Component files to transpile, relative to the working directory.
		files: Vec<PathBuf>,

		/// Directory that relative `dst` paths are written under. Overrides
		/// `dst_base` from `sfc.toml`. A relative value is taken from the
		/// working directory, like the component files. Without this flag or
		/// a configured `dst_base`, outputs land under the project root.
		#[arg(long)]
		dst_base: Option<PathBuf>,

		/// Suppress progress and warning output.
		#[arg(long, short, default_value_t = false)]
		quiet: bool,
	},
	/// Print the nodes found in a component file with their line spans.
	Parse {
		/// The component file to parse.
		file: PathBuf,

		/// Output format. Use `text` for a human-readable listing or `json`
		/// for programmatic consumption.
		#[arg(long, value_enum, default_value_t = OutputFormat::Text)]
		format: OutputFormat,
	},
	/// List the processor factories available to `[processors]`.
	Factories,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum OutputFormat {
	/// Human-readable text output with colors and formatting.
	Text,
	/// JSON output for programmatic consumption.
	Json,
}
