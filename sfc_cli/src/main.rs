use std::path::Path;
use std::path::PathBuf;
use std::process;

use clap::Parser;
use owo_colors::OwoColorize;
use serde::Serialize;
use sfc_cli::Commands;
use sfc_cli::OutputFormat;
use sfc_cli::SfcCli;
use sfc_core::AttrValue;
use sfc_core::FactoryCatalog;
use sfc_core::Node;
use sfc_core::SfcError;
use sfc_core::TranspileSummary;
use sfc_core::config::SfcConfig;
use sfc_core::discover::collect_sources;
use sfc_core::parse_nodes;
use sfc_core::transpile;
use tracing::debug;
use tracing_subscriber::EnvFilter;

static USE_COLOR: std::sync::atomic::AtomicBool = std::sync::atomic::AtomicBool::new(true);

/// Environment variable holding a `tracing` filter directive.
const LOG_ENV: &str = "SFC_LOG";

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
	($text:expr,yellow) => {
		if color_enabled() {
			format!("{}", $text.yellow())
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
	let args = SfcCli::parse();

	// Respect NO_COLOR env var, --no-color flag and terminal support.
	let use_color = !args.no_color
		&& std::env::var_os("NO_COLOR").is_none()
		&& supports_color::on(supports_color::Stream::Stdout).is_some();
	if !use_color {
		USE_COLOR.store(false, std::sync::atomic::Ordering::Relaxed);
	}

	// Install miette's fancy handler for rich error diagnostics.
	miette::set_hook(Box::new(move |_| {
		Box::new(
			miette::MietteHandlerOpts::new()
				.color(use_color)
				.unicode(use_color)
				.build(),
		)
	}))
	.ok();

	init_tracing(args.verbose, use_color);

	let result = match &args.command {
		Some(Commands::Init) => run_init(&args),
		Some(Commands::Transpile {
			files,
			dst_base,
			quiet,
		}) => run_transpile(&args, files, dst_base.as_deref(), *quiet),
		Some(Commands::Parse { file, format }) => run_parse(file, *format),
		Some(Commands::Factories) => {
			run_factories();
			Ok(())
		}
		None => {
			eprintln!("No subcommand specified. Run `sfc --help` for usage.");
			process::exit(1);
		}
	};

	if let Err(e) = result {
		// Try to render through miette for rich diagnostics with help text
		// and error codes.
		match e.downcast::<SfcError>() {
			Ok(sfc_err) => {
				let report: miette::Report = (*sfc_err).into();
				eprintln!("{report:?}");
			}
			Err(e) => {
				eprintln!("{} {e}", colored!("error:", red));
			}
		}
		process::exit(2);
	}
}

/// Log to stderr, filtered by `SFC_LOG` when set.
fn init_tracing(verbose: bool, use_color: bool) {
	let default_directive = if verbose { "debug" } else { "info" };
	let filter =
		EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(default_directive));

	tracing_subscriber::fmt()
		.with_env_filter(filter)
		.with_ansi(use_color)
		.with_target(false)
		.without_time()
		.with_writer(std::io::stderr)
		.try_init()
		.ok();
}

fn resolve_root(args: &SfcCli) -> PathBuf {
	args.path
		.clone()
		.unwrap_or_else(|| std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")))
}

fn make_relative(path: &Path, root: &Path) -> String {
	path.strip_prefix(root)
		.unwrap_or(path)
		.display()
		.to_string()
}

fn run_init(args: &SfcCli) -> Result<(), Box<dyn std::error::Error>> {
	let root = resolve_root(args);

	if let Some(existing) = SfcConfig::resolve_path(&root) {
		println!("Config file already exists: {}", existing.display());
		return Ok(());
	}

	let config_path = root.join("sfc.toml");
	let sample_config = "# sfc configuration\n\n# Glob patterns selecting the component files \
	                     `sfc transpile` picks up.\nsrc = [\"**/*.component\"]\n\n# Relative \
	                     `dst` attributes are written under this directory.\n# dst_base = \
	                     \"dist\"\n\n# Output extensions for `dst` attributes that name a \
	                     directory.\n# [exts]\n# template = \"html\"\n# script = \"js\"\n# style \
	                     = \"css\"\n\n# Values available in `dst` attributes as {{ vars.key \
	                     }}.\n# [vars]\n# out = \"public\"\n\n# Processors built from factories. \
	                     The table name picks the factory and `id`\n# is the name components use \
	                     in their `processor` attribute.\n[processors.copy]\nid = \"copy\"\n";

	std::fs::write(&config_path, sample_config)?;
	println!("Created {}", config_path.display());
	println!();
	println!("Next steps:");
	println!("  1. Add a component, e.g. app.component:");
	println!("     <template processor=\"copy\" dst=\"dist/\">");
	println!("     <h1>Hello</h1>");
	println!("     </template>");
	println!("  2. Run `sfc transpile` to write dist/app.html");

	Ok(())
}

fn run_transpile(
	args: &SfcCli,
	files: &[PathBuf],
	dst_base: Option<&Path>,
	quiet: bool,
) -> Result<(), Box<dyn std::error::Error>> {
	let root = resolve_root(args);
	let config = SfcConfig::load(&root)?.unwrap_or_default();
	let mut options = config.transpile_options(&root)?;

	if quiet {
		options = options.with_quiet(true);
	}

	if let Some(dst_base) = dst_base {
		options = options.with_dst_base(dst_base);
	}

	if args.verbose {
		options = options.on_transpile_start(|source: &Path, nodes: &[Node]| {
			for node in nodes {
				debug!(
					source = %source.display(),
					node = %node.name,
					lines = %format!("{}-{}", node.node_start, node.node_end),
					"found node"
				);
			}
		});
	}

	let sources = if files.is_empty() {
		collect_sources(&root, &config.src, &config.exclude)?
	} else {
		files.to_vec()
	};

	if sources.is_empty() {
		return Err(SfcError::NoInputFiles.into());
	}

	let rt = tokio::runtime::Runtime::new()?;
	let summary = rt.block_on(transpile(&sources, &options))?;

	if !options.quiet {
		print_summary(&summary, &root);
	}

	Ok(())
}

fn print_summary(summary: &TranspileSummary, root: &Path) {
	for file in &summary.files {
		println!("{}", colored!(make_relative(&file.source, root), bold));
		if file.written.is_empty() {
			println!("  {}", colored!("no files written", yellow));
		}
		for written in &file.written {
			println!("  -> {}", make_relative(written, root));
		}
	}

	let message = format!(
		"Transpiled {} component(s), wrote {} file(s).",
		summary.files.len(),
		summary.total_written()
	);
	println!("{}", colored!(message, green));
}

#[derive(Serialize)]
struct ParseReport<'a> {
	file: &'a Path,
	nodes: &'a [Node],
}

fn run_parse(file: &Path, format: OutputFormat) -> Result<(), Box<dyn std::error::Error>> {
	let content = std::fs::read_to_string(file).map_err(|e| {
		SfcError::ReadFile {
			path: file.display().to_string(),
			reason: e.to_string(),
		}
	})?;
	let nodes = parse_nodes(&content);

	match format {
		OutputFormat::Json => {
			let report = ParseReport {
				file,
				nodes: &nodes,
			};
			println!("{}", serde_json::to_string_pretty(&report)?);
		}
		OutputFormat::Text => {
			if nodes.is_empty() {
				println!("No nodes found in {}.", file.display());
				return Ok(());
			}

			for node in &nodes {
				println!(
					"{} lines {}-{} (content {}-{}){}",
					colored!(format!("<{}>", node.name), bold),
					node.node_start,
					node.node_end,
					node.content_start,
					node.content_end,
					format_attributes(node),
				);
			}
		}
	}

	Ok(())
}

fn format_attributes(node: &Node) -> String {
	node.attrs
		.iter()
		.map(|(key, value)| {
			match value {
				AttrValue::Text(text) => format!(" {key}=\"{text}\""),
				_ => format!(" {key}"),
			}
		})
		.collect()
}

fn run_factories() {
	let catalog = FactoryCatalog::with_builtins();

	println!("{}", colored!("Processor factories:", bold));
	for name in catalog.names() {
		let description = catalog
			.get(name)
			.map(|factory| factory.description())
			.unwrap_or_default();
		println!("  {name:<10} {description}");
	}
}
