use std::collections::BTreeMap;
use std::path::PathBuf;

use serde::Serialize;
use serde::Serializer;

use crate::Processor;

/// Attributes of a tag, keyed by attribute name.
pub type Attributes = BTreeMap<String, AttrValue>;

/// Attribute that names the processor for a node.
pub const PROCESSOR_ATTR: &str = "processor";
/// Alias for [`PROCESSOR_ATTR`], consulted only when `processor` is absent.
pub const LANG_ATTR: &str = "lang";
/// Attribute holding the output destination of a node.
pub const DST_ATTR: &str = "dst";

/// The value of a single tag attribute.
///
/// `<style scoped>` yields [`AttrValue::Flag`] for `scoped`, while
/// `<style media="">` yields an empty [`AttrValue::Text`].
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum AttrValue {
	/// The attribute was written without a value.
	Flag,
	/// The raw text between the quotes.
	Text(String),
}

impl AttrValue {
	/// The attribute text, or `None` for a value-less attribute.
	pub fn as_str(&self) -> Option<&str> {
		match self {
			Self::Flag => None,
			Self::Text(text) => Some(text.as_str()),
		}
	}

	pub fn is_flag(&self) -> bool {
		matches!(self, Self::Flag)
	}
}

impl From<&str> for AttrValue {
	fn from(value: &str) -> Self {
		Self::Text(value.to_string())
	}
}

impl Serialize for AttrValue {
	fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
		match self {
			Self::Flag => serializer.serialize_bool(true),
			Self::Text(text) => serializer.serialize_str(text),
		}
	}
}

/// A top-level tagged region of a component file.
///
/// Produced by [`parse_nodes`](crate::parse_nodes) in document order. The
/// transpiler attaches the resolved [`processor`](Node::processor) and
/// [`dst`](Node::dst) before handing nodes to processors and hooks.
#[derive(Debug, Clone, Serialize)]
pub struct Node {
	/// Tag name as written, e.g. `template`.
	pub name: String,
	/// Attributes of the opening tag.
	pub attrs: Attributes,
	/// Inner text with one leading and one trailing line break removed.
	pub content: String,
	/// UTF-8 byte offset of the opening `<`. This is not a `char` index, so
	/// slice the source with it rather than counting characters.
	pub start_index: usize,
	/// UTF-8 byte offset one past the closing tag's `>`.
	pub end_index: usize,
	/// 1-indexed line of the opening tag.
	pub node_start: usize,
	/// 1-indexed line of the closing tag.
	pub node_end: usize,
	/// 1-indexed line where [`content`](Node::content) begins.
	pub content_start: usize,
	/// 1-indexed line where [`content`](Node::content) ends.
	pub content_end: usize,
	/// Processor resolved from the `processor` (or `lang`) attribute.
	#[serde(skip)]
	pub processor: Option<Processor>,
	/// Output path resolved from the `dst` attribute.
	pub dst: Option<PathBuf>,
}

/// How a node refers to its processor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProcessorRef<'a> {
	/// No `processor` or `lang` attribute.
	None,
	/// The attribute is present but has no value.
	Empty,
	Key(&'a str),
}

impl Node {
	pub fn attr(&self, name: &str) -> Option<&AttrValue> {
		self.attrs.get(name)
	}

	/// The processor this node asks for. `processor` takes precedence over
	/// the `lang` alias.
	pub fn processor_ref(&self) -> ProcessorRef<'_> {
		let value = self
			.attrs
			.get(PROCESSOR_ATTR)
			.or_else(|| self.attrs.get(LANG_ATTR));

		match value {
			None => ProcessorRef::None,
			Some(AttrValue::Flag) => ProcessorRef::Empty,
			Some(AttrValue::Text(key)) => ProcessorRef::Key(key.as_str()),
		}
	}

	/// Raw `dst` attribute. A value-less `dst` reads as an empty string,
	/// which resolves next to the working directory.
	pub fn dst_value(&self) -> Option<&str> {
		self.attrs.get(DST_ATTR).map(|value| value.as_str().unwrap_or(""))
	}
}
