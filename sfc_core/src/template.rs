use std::collections::HashMap;

use serde::Serialize;

use crate::SfcError;
use crate::SfcResult;

/// Expands placeholders in configuration strings such as `dst` attributes
/// and processor factory keys.
pub trait Expand: Send + Sync {
	fn expand(&self, input: &str) -> SfcResult<String>;
}

/// An expander that returns its input unchanged.
#[derive(Debug, Clone, Copy, Default)]
pub struct Verbatim;

impl Expand for Verbatim {
	fn expand(&self, input: &str) -> SfcResult<String> {
		Ok(input.to_string())
	}
}

/// Expands `{{ namespace.key }}` placeholders with minijinja against a set of
/// data namespaces.
///
/// ```rust
/// use sfc_core::Expand;
/// use sfc_core::TemplateContext;
///
/// let context = TemplateContext::new().with_value("dirs", serde_json::json!({ "out": "dist" }));
/// assert_eq!(context.expand("{{ dirs.out }}/app").unwrap(), "dist/app");
/// ```
#[derive(Debug, Clone, Default)]
pub struct TemplateContext {
	data: HashMap<String, serde_json::Value>,
}

impl TemplateContext {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn from_data(data: HashMap<String, serde_json::Value>) -> Self {
		Self { data }
	}

	#[must_use]
	pub fn with_value(mut self, namespace: impl Into<String>, value: serde_json::Value) -> Self {
		self.data.insert(namespace.into(), value);
		self
	}

	pub fn data(&self) -> &HashMap<String, serde_json::Value> {
		&self.data
	}
}

impl Expand for TemplateContext {
	fn expand(&self, input: &str) -> SfcResult<String> {
		render_template(input, &self.data)
	}
}

/// Render `content` through minijinja with `context`. Content without
/// template syntax is returned unchanged.
pub fn render_template(content: &str, context: &impl Serialize) -> SfcResult<String> {
	if !has_template_syntax(content) {
		return Ok(content.to_string());
	}

	let mut env = minijinja::Environment::new();
	env.set_keep_trailing_newline(true);
	env.set_undefined_behavior(minijinja::UndefinedBehavior::Strict);
	env.add_template("__inline__", content)
		.map_err(|e| SfcError::TemplateRender(e.to_string()))?;

	let template = env
		.get_template("__inline__")
		.map_err(|e| SfcError::TemplateRender(e.to_string()))?;

	let ctx = minijinja::Value::from_serialize(context);
	template
		.render(ctx)
		.map_err(|e| SfcError::TemplateRender(e.to_string()))
}

/// Check whether content contains minijinja template syntax.
fn has_template_syntax(content: &str) -> bool {
	content.contains("{{") || content.contains("{%") || content.contains("{#")
}
