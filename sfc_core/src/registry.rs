use std::collections::HashMap;
use std::fmt;

use tracing::info;

use crate::Expand;
use crate::FactoryCatalog;
use crate::Hook;
use crate::Processor;
use crate::SfcResult;

/// Factory option naming the factory to load when the configuration key is
/// the processor id instead.
pub const FACTORY_OPTION: &str = "factory";

/// How a configured processor is supplied.
#[derive(Debug, Clone)]
pub enum ProcessorEntry {
	/// A ready processor, registered under its configuration key.
	Processor(Processor),
	/// Options for the factory named by their `factory` option, or by the
	/// configuration key when that option is absent.
	Factory(serde_json::Value),
}

impl From<Processor> for ProcessorEntry {
	fn from(processor: Processor) -> Self {
		Self::Processor(processor)
	}
}

/// Processor configuration in declaration order.
#[derive(Debug, Clone, Default)]
pub struct ProcessorConfig {
	entries: Vec<(String, ProcessorEntry)>,
}

impl ProcessorConfig {
	pub fn new() -> Self {
		Self::default()
	}

	#[must_use]
	pub fn with_processor(mut self, key: impl Into<String>, processor: Processor) -> Self {
		self.insert(key, ProcessorEntry::Processor(processor));
		self
	}

	#[must_use]
	pub fn with_factory(mut self, key: impl Into<String>, options: serde_json::Value) -> Self {
		self.insert(key, ProcessorEntry::Factory(options));
		self
	}

	/// Add an entry, replacing any earlier entry with the same key in place.
	pub fn insert(&mut self, key: impl Into<String>, entry: ProcessorEntry) {
		let key = key.into();
		match self.entries.iter_mut().find(|(existing, _)| *existing == key) {
			Some((_, slot)) => *slot = entry,
			None => self.entries.push((key, entry)),
		}
	}

	pub fn iter(&self) -> impl Iterator<Item = (&str, &ProcessorEntry)> {
		self.entries.iter().map(|(key, entry)| (key.as_str(), entry))
	}

	pub fn len(&self) -> usize {
		self.entries.len()
	}

	pub fn is_empty(&self) -> bool {
		self.entries.is_empty()
	}
}

/// Resolved processors and the hooks contributed by their factories.
#[derive(Clone, Default)]
pub struct ProcessorRegistry {
	processors: HashMap<String, Processor>,
	start_hooks: Vec<Hook>,
	end_hooks: Vec<Hook>,
}

impl ProcessorRegistry {
	/// Resolve every entry of `config`.
	///
	/// Factory entries have their factory name (the `factory` option or else
	/// the key) expanded, are looked up in `catalog` and created exactly once. The created processor is stored under the `id`
	/// the factory returns, and its hooks are appended in configuration order.
	pub fn build(
		config: &ProcessorConfig,
		expander: &dyn Expand,
		catalog: &FactoryCatalog,
		quiet: bool,
	) -> SfcResult<Self> {
		let mut registry = Self::default();

		for (key, entry) in config.iter() {
			match entry {
				ProcessorEntry::Processor(processor) => {
					registry
						.processors
						.insert(key.to_string(), processor.clone());
				}
				ProcessorEntry::Factory(options) => {
					let name = options
						.get(FACTORY_OPTION)
						.and_then(serde_json::Value::as_str)
						.unwrap_or(key);
					let name = expander.expand(name)?;
					if !quiet {
						info!(factory = %name, "loading processor");
					}

					let factory = catalog.load(&name)?;
					let output = factory.create(options)?;

					registry.start_hooks.extend(output.on_transpile_start);
					registry.end_hooks.extend(output.on_transpile_end);
					registry.processors.insert(output.id, output.processor);
				}
			}
		}

		Ok(registry)
	}

	pub fn get(&self, key: &str) -> Option<&Processor> {
		self.processors.get(key)
	}

	pub fn len(&self) -> usize {
		self.processors.len()
	}

	pub fn is_empty(&self) -> bool {
		self.processors.is_empty()
	}

	pub fn start_hooks(&self) -> &[Hook] {
		&self.start_hooks
	}

	pub fn end_hooks(&self) -> &[Hook] {
		&self.end_hooks
	}
}

impl fmt::Debug for ProcessorRegistry {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		let mut keys: Vec<&str> = self.processors.keys().map(String::as_str).collect();
		keys.sort_unstable();

		f.debug_struct("ProcessorRegistry")
			.field("processors", &keys)
			.field("start_hooks", &self.start_hooks.len())
			.field("end_hooks", &self.end_hooks.len())
			.finish()
	}
}
