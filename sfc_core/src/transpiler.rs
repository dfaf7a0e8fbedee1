use std::fmt;
use std::path::Path;
use std::path::PathBuf;
use std::sync::Arc;

use tracing::debug;
use tracing::info;
use tracing::warn;

use crate::DestinationResolver;
use crate::Expand;
use crate::ExtensionMap;
use crate::FactoryCatalog;
use crate::Hook;
use crate::Node;
use crate::ProcessorConfig;
use crate::ProcessorRef;
use crate::ProcessorRegistry;
use crate::SfcError;
use crate::SfcResult;
use crate::Verbatim;
use crate::parse_nodes;

/// Settings for a [`transpile`] run.
#[derive(Clone)]
pub struct TranspileOptions {
	/// Tag name to output extension map, defaults included.
	pub exts: ExtensionMap,
	pub processors: ProcessorConfig,
	/// Prefixed to relative destinations.
	pub dst_base: Option<PathBuf>,
	/// Suppress progress and warning output.
	pub quiet: bool,
	/// Called with every candidate node of a file before processing.
	pub on_transpile_start: Vec<Hook>,
	/// Called with the nodes of a file that were written.
	pub on_transpile_end: Vec<Hook>,
	/// Expands `dst` attributes and factory keys.
	pub expander: Arc<dyn Expand>,
	pub catalog: FactoryCatalog,
}

impl Default for TranspileOptions {
	fn default() -> Self {
		Self {
			exts: ExtensionMap::default(),
			processors: ProcessorConfig::default(),
			dst_base: None,
			quiet: false,
			on_transpile_start: Vec::new(),
			on_transpile_end: Vec::new(),
			expander: Arc::new(Verbatim),
			catalog: FactoryCatalog::with_builtins(),
		}
	}
}

impl TranspileOptions {
	pub fn new() -> Self {
		Self::default()
	}

	#[must_use]
	pub fn with_exts(mut self, exts: ExtensionMap) -> Self {
		self.exts = exts;
		self
	}

	#[must_use]
	pub fn with_processors(mut self, processors: ProcessorConfig) -> Self {
		self.processors = processors;
		self
	}

	#[must_use]
	pub fn with_dst_base(mut self, dst_base: impl Into<PathBuf>) -> Self {
		self.dst_base = Some(dst_base.into());
		self
	}

	#[must_use]
	pub fn with_quiet(mut self, quiet: bool) -> Self {
		self.quiet = quiet;
		self
	}

	#[must_use]
	pub fn on_transpile_start(mut self, hook: impl Fn(&Path, &[Node]) + Send + Sync + 'static) -> Self {
		self.on_transpile_start.push(Arc::new(hook));
		self
	}

	#[must_use]
	pub fn on_transpile_end(mut self, hook: impl Fn(&Path, &[Node]) + Send + Sync + 'static) -> Self {
		self.on_transpile_end.push(Arc::new(hook));
		self
	}

	#[must_use]
	pub fn with_expander(mut self, expander: impl Expand + 'static) -> Self {
		self.expander = Arc::new(expander);
		self
	}

	#[must_use]
	pub fn with_catalog(mut self, catalog: FactoryCatalog) -> Self {
		self.catalog = catalog;
		self
	}
}

impl fmt::Debug for TranspileOptions {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("TranspileOptions")
			.field("exts", &self.exts)
			.field("processors", &self.processors)
			.field("dst_base", &self.dst_base)
			.field("quiet", &self.quiet)
			.field("on_transpile_start", &self.on_transpile_start.len())
			.field("on_transpile_end", &self.on_transpile_end.len())
			.field("catalog", &self.catalog)
			.finish_non_exhaustive()
	}
}

/// Files written for one source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileReport {
	pub source: PathBuf,
	/// Output paths in node order.
	pub written: Vec<PathBuf>,
}

/// Outcome of a [`transpile`] run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TranspileSummary {
	/// One report per source, in input order.
	pub files: Vec<FileReport>,
}

impl TranspileSummary {
	/// Number of files written across all sources.
	pub fn total_written(&self) -> usize {
		self.files.iter().map(|file| file.written.len()).sum()
	}
}

/// Transpile every file in `sources`, in order.
///
/// Each source is parsed into nodes, every node is run through the
/// processor its `processor` (or `lang`) attribute names, and the output is
/// written to the path derived from its `dst` attribute. Nodes without a
/// processor attribute are written unchanged. The first error stops the run;
/// files already written are left in place.
pub async fn transpile<P: AsRef<Path>>(
	sources: &[P],
	options: &TranspileOptions,
) -> SfcResult<TranspileSummary> {
	let registry = ProcessorRegistry::build(
		&options.processors,
		options.expander.as_ref(),
		&options.catalog,
		options.quiet,
	)?;
	let resolver = DestinationResolver::new(options.dst_base.clone(), options.exts.clone());

	let start_hooks: Vec<&Hook> = options
		.on_transpile_start
		.iter()
		.chain(registry.start_hooks())
		.collect();
	let end_hooks: Vec<&Hook> = options
		.on_transpile_end
		.iter()
		.chain(registry.end_hooks())
		.collect();

	let run = FileRun {
		registry: &registry,
		resolver: &resolver,
		expander: options.expander.as_ref(),
		start_hooks: &start_hooks,
		end_hooks: &end_hooks,
		quiet: options.quiet,
	};

	let mut summary = TranspileSummary::default();
	for source in sources {
		summary.files.push(run.transpile_file(source.as_ref()).await?);
	}

	Ok(summary)
}

/// Everything shared by the files of one run.
struct FileRun<'a> {
	registry: &'a ProcessorRegistry,
	resolver: &'a DestinationResolver,
	expander: &'a dyn Expand,
	start_hooks: &'a [&'a Hook],
	end_hooks: &'a [&'a Hook],
	quiet: bool,
}

impl FileRun<'_> {
	async fn transpile_file(&self, source: &Path) -> SfcResult<FileReport> {
		if !self.quiet {
			info!(source = %source.display(), "processing file");
		}

		let content = std::fs::read_to_string(source).map_err(|e| {
			SfcError::ReadFile {
				path: source.display().to_string(),
				reason: e.to_string(),
			}
		})?;

		let mut candidates = Vec::new();
		for node in parse_nodes(&content) {
			if let Some(node) = self.prepare(source, node)? {
				candidates.push(node);
			}
		}

		for hook in self.start_hooks {
			hook(source, &candidates);
		}

		let mut written_nodes = Vec::new();
		let mut written = Vec::new();

		for node in candidates {
			let output = match &node.processor {
				Some(processor) => processor.process(&node.content, &node).await?,
				None => Some(node.content.clone()),
			};

			let Some(output) = output.filter(|output| !output.is_empty()) else {
				if !self.quiet {
					warn!(node = %node.name, "node has no content to be written out");
				}
				continue;
			};

			let Some(dst) = node.dst.clone() else {
				if !self.quiet {
					warn!(node = %node.name, "node has no target file (dst)");
				}
				continue;
			};

			write_output(&dst, &output)?;
			debug!(node = %node.name, dst = %dst.display(), "wrote node");

			written.push(dst);
			written_nodes.push(node);
		}

		for hook in self.end_hooks {
			hook(source, &written_nodes);
		}

		if !self.quiet {
			info!(source = %source.display(), "{} file(s) created", written.len());
		}

		Ok(FileReport {
			source: source.to_path_buf(),
			written,
		})
	}

	/// Attach the processor and destination to `node`, or return `None` when
	/// it names a processor that is not registered.
	fn prepare(&self, source: &Path, mut node: Node) -> SfcResult<Option<Node>> {
		match node.processor_ref() {
			ProcessorRef::None => {}
			ProcessorRef::Empty => {
				if !self.quiet {
					warn!(node = %node.name, "node references an unnamed processor");
				}
				return Ok(None);
			}
			ProcessorRef::Key(key) => {
				let Some(processor) = self.registry.get(key) else {
					if !self.quiet {
						warn!(node = %node.name, processor = key, "node references undefined processor");
					}
					return Ok(None);
				};
				node.processor = Some(processor.clone());
			}
		}

		node.dst = self.resolver.resolve(source, &node, self.expander)?;
		Ok(Some(node))
	}
}

fn write_output(dst: &Path, content: &str) -> SfcResult<()> {
	let to_error = |e: std::io::Error| {
		SfcError::WriteFile {
			path: dst.display().to_string(),
			reason: e.to_string(),
		}
	};

	if let Some(parent) = dst.parent() {
		if !parent.as_os_str().is_empty() {
			std::fs::create_dir_all(parent).map_err(to_error)?;
		}
	}

	std::fs::write(dst, content).map_err(to_error)
}
