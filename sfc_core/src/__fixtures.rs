use std::path::Path;
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::Mutex;
use std::sync::atomic::AtomicUsize;
use std::sync::atomic::Ordering;

use crate::AttrValue;
use crate::Attributes;
use crate::FactoryOutput;
use crate::Node;
use crate::Processor;
use crate::ProcessorFactory;
use crate::SfcResult;

/// A component with an html and a css section, in the layout most
/// transpile tests use.
pub(crate) const TEST_COMPONENT: &str = r#"<!-- component -->
<template processor="html" dst="dst/">
<div>
  <b>kutya</b>
</div>
</template>
<style processor="css" dst="dst/my.css">
div{display: none;}
</style>
"#;

pub(crate) const NO_PROCESSOR_COMPONENT: &str = r#"<template dst="dst/">
<div>
  <b>kutya</b>
</div>
</template>
"#;

pub(crate) const TEMPLATE_CONTENT: &str = "<div>\n  <b>kutya</b>\n</div>";

pub(crate) fn node(name: &str, attrs: &[(&str, AttrValue)]) -> Node {
	Node {
		name: name.to_string(),
		attrs: attrs
			.iter()
			.map(|(key, value)| ((*key).to_string(), value.clone()))
			.collect::<Attributes>(),
		content: String::new(),
		start_index: 0,
		end_index: 0,
		node_start: 1,
		node_end: 1,
		content_start: 1,
		content_end: 1,
		processor: None,
		dst: None,
	}
}

pub(crate) fn text(value: &str) -> AttrValue {
	AttrValue::from(value)
}

/// An absolute directory that does not need to exist.
pub(crate) fn abs_root(name: &str) -> PathBuf {
	std::env::temp_dir().join(name)
}

pub(crate) fn write_file(root: &Path, rel: &str, content: &str) -> PathBuf {
	let path = root.join(rel);
	if let Some(parent) = path.parent() {
		std::fs::create_dir_all(parent).unwrap_or_else(|e| panic!("mkdir: {e}"));
	}
	std::fs::write(&path, content).unwrap_or_else(|e| panic!("write: {e}"));
	path
}

pub(crate) fn read_file(path: &Path) -> String {
	std::fs::read_to_string(path).unwrap_or_else(|e| panic!("read {}: {e}", path.display()))
}

pub(crate) fn prefix_processor(prefix: &'static str) -> Processor {
	Processor::from_fn(move |content: &str, _: &Node| format!("{prefix}{content}"))
}

pub(crate) fn identity_processor() -> Processor {
	Processor::from_fn(|content: &str, _: &Node| content.to_string())
}

/// A factory that records how often it was created and with which options.
#[derive(Clone, Default)]
pub(crate) struct RecordingFactory {
	pub calls: Arc<AtomicUsize>,
	pub options: Arc<Mutex<Option<serde_json::Value>>>,
	pub hook_calls: Arc<AtomicUsize>,
}

impl RecordingFactory {
	pub fn call_count(&self) -> usize {
		self.calls.load(Ordering::SeqCst)
	}

	pub fn hook_count(&self) -> usize {
		self.hook_calls.load(Ordering::SeqCst)
	}

	pub fn last_options(&self) -> Option<serde_json::Value> {
		self.options
			.lock()
			.unwrap_or_else(|e| panic!("lock: {e}"))
			.clone()
	}
}

impl ProcessorFactory for RecordingFactory {
	fn name(&self) -> &str {
		"html-processor"
	}

	fn create(&self, options: &serde_json::Value) -> SfcResult<FactoryOutput> {
		self.calls.fetch_add(1, Ordering::SeqCst);
		*self.options.lock().unwrap_or_else(|e| panic!("lock: {e}")) = Some(options.clone());

		let hook_calls = Arc::clone(&self.hook_calls);
		Ok(FactoryOutput::new("html", identity_processor()).with_start_hook(Arc::new(
			move |_: &Path, _: &[Node]| {
				hook_calls.fetch_add(1, Ordering::SeqCst);
			},
		)))
	}
}
