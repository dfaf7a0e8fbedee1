use std::collections::HashMap;
use std::fmt;
use std::future::Future;
use std::path::Path;
use std::pin::Pin;
use std::sync::Arc;

use crate::Node;
use crate::SfcError;
use crate::SfcResult;

/// The boxed future returned by every [`Transform`].
pub type ProcessFuture<'a> = Pin<Box<dyn Future<Output = SfcResult<Option<String>>> + Send + 'a>>;

/// A lifecycle hook, called once per source file with the source path and
/// the nodes relevant to that point of the pipeline.
pub type Hook = Arc<dyn Fn(&Path, &[Node]) + Send + Sync>;

/// Turns a node's content into output content.
///
/// Returning `Ok(None)` (or an empty string) means the node produced nothing
/// and nothing is written for it.
pub trait Transform: Send + Sync {
	fn transform<'a>(&'a self, content: &'a str, node: &'a Node) -> ProcessFuture<'a>;
}

struct SyncFn<F>(F);

impl<F, R> Transform for SyncFn<F>
where
	F: Fn(&str, &Node) -> R + Send + Sync,
	R: Into<Option<String>>,
{
	fn transform<'a>(&'a self, content: &'a str, node: &'a Node) -> ProcessFuture<'a> {
		let output = (self.0)(content, node).into();
		Box::pin(async move { Ok(output) })
	}
}

struct AsyncFn<F>(F);

impl<F, Fut> Transform for AsyncFn<F>
where
	F: Fn(String, Node) -> Fut + Send + Sync,
	Fut: Future<Output = SfcResult<Option<String>>> + Send + 'static,
{
	fn transform<'a>(&'a self, content: &'a str, node: &'a Node) -> ProcessFuture<'a> {
		Box::pin((self.0)(content.to_string(), node.clone()))
	}
}

/// A content processor together with the extension of the files it produces.
#[derive(Clone)]
pub struct Processor {
	transform: Arc<dyn Transform>,
	ext: Option<String>,
}

impl Processor {
	pub fn new(transform: impl Transform + 'static) -> Self {
		Self {
			transform: Arc::new(transform),
			ext: None,
		}
	}

	/// Wrap a synchronous closure.
	///
	/// ```rust
	/// use sfc_core::Processor;
	///
	/// let shout = Processor::from_fn(|content: &str, _node: &sfc_core::Node| content.to_uppercase());
	/// assert!(shout.ext().is_none());
	/// ```
	pub fn from_fn<F, R>(f: F) -> Self
	where
		F: Fn(&str, &Node) -> R + Send + Sync + 'static,
		R: Into<Option<String>> + 'static,
	{
		Self::new(SyncFn(f))
	}

	/// Wrap a closure returning a future. The closure receives owned copies
	/// of the content and node so the future can outlive the call.
	pub fn from_async_fn<F, Fut>(f: F) -> Self
	where
		F: Fn(String, Node) -> Fut + Send + Sync + 'static,
		Fut: Future<Output = SfcResult<Option<String>>> + Send + 'static,
	{
		Self::new(AsyncFn(f))
	}

	/// Set the output extension used when a node's `dst` is a directory.
	#[must_use]
	pub fn with_ext(mut self, ext: impl Into<String>) -> Self {
		self.ext = Some(ext.into());
		self
	}

	pub fn ext(&self) -> Option<&str> {
		self.ext.as_deref()
	}

	pub fn process<'a>(&'a self, content: &'a str, node: &'a Node) -> ProcessFuture<'a> {
		self.transform.transform(content, node)
	}

	/// Whether both handles share the same underlying transform.
	pub fn ptr_eq(&self, other: &Self) -> bool {
		Arc::ptr_eq(&self.transform, &other.transform)
	}
}

impl fmt::Debug for Processor {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("Processor")
			.field("ext", &self.ext)
			.finish_non_exhaustive()
	}
}

/// What a [`ProcessorFactory`] produces from its options.
#[derive(Clone)]
pub struct FactoryOutput {
	/// Key the processor is registered under.
	pub id: String,
	pub processor: Processor,
	pub on_transpile_start: Option<Hook>,
	pub on_transpile_end: Option<Hook>,
}

impl FactoryOutput {
	pub fn new(id: impl Into<String>, processor: Processor) -> Self {
		Self {
			id: id.into(),
			processor,
			on_transpile_start: None,
			on_transpile_end: None,
		}
	}

	#[must_use]
	pub fn with_start_hook(mut self, hook: Hook) -> Self {
		self.on_transpile_start = Some(hook);
		self
	}

	#[must_use]
	pub fn with_end_hook(mut self, hook: Hook) -> Self {
		self.on_transpile_end = Some(hook);
		self
	}
}

impl fmt::Debug for FactoryOutput {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("FactoryOutput")
			.field("id", &self.id)
			.field("processor", &self.processor)
			.field("on_transpile_start", &self.on_transpile_start.is_some())
			.field("on_transpile_end", &self.on_transpile_end.is_some())
			.finish()
	}
}

/// A named constructor for processors, configured with a JSON value.
pub trait ProcessorFactory: Send + Sync {
	/// The key used to select this factory in configuration.
	fn name(&self) -> &str;

	/// Build the processor. Called once per transpile run.
	fn create(&self, options: &serde_json::Value) -> SfcResult<FactoryOutput>;

	/// One line describing the factory, shown by `sfc factories`.
	fn description(&self) -> &str {
		""
	}
}

/// Lookup table of processor factories by name.
#[derive(Clone, Default)]
pub struct FactoryCatalog {
	factories: HashMap<String, Arc<dyn ProcessorFactory>>,
}

impl FactoryCatalog {
	/// An empty catalog.
	pub fn new() -> Self {
		Self::default()
	}

	/// A catalog holding every built-in factory.
	pub fn with_builtins() -> Self {
		let mut catalog = Self::new();
		crate::builtin::register_builtins(&mut catalog);
		catalog
	}

	/// Register a factory, replacing any factory of the same name.
	pub fn register(&mut self, factory: impl ProcessorFactory + 'static) {
		self.factories
			.insert(factory.name().to_string(), Arc::new(factory));
	}

	pub fn get(&self, name: &str) -> Option<&Arc<dyn ProcessorFactory>> {
		self.factories.get(name)
	}

	pub fn load(&self, name: &str) -> SfcResult<Arc<dyn ProcessorFactory>> {
		self.factories
			.get(name)
			.cloned()
			.ok_or_else(|| SfcError::UnknownFactory(name.to_string()))
	}

	/// Registered factory names in sorted order.
	pub fn names(&self) -> Vec<&str> {
		let mut names: Vec<&str> = self.factories.keys().map(String::as_str).collect();
		names.sort_unstable();
		names
	}

	pub fn len(&self) -> usize {
		self.factories.len()
	}

	pub fn is_empty(&self) -> bool {
		self.factories.is_empty()
	}
}

impl fmt::Debug for FactoryCatalog {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("FactoryCatalog")
			.field("factories", &self.names())
			.finish()
	}
}
