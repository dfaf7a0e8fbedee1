use std::ops::Range;

use crate::AttrValue;
use crate::Attributes;
use crate::Node;
use crate::lines::LineTable;
use crate::lines::count_line_breaks;
use crate::lines::is_line_end;
use crate::lines::leading_line_break;
use crate::lines::trailing_line_break;

/// Parse a component document into its top-level tagged nodes.
///
/// A node is `<name attrs...>content</name>` where the closing tag ends a
/// line (or the document). Content is matched greedily: the last
/// `</name>` that ends a line wins, so same-named tags nested inside the
/// content are kept as plain text rather than parsed. Anything that does not
/// match, such as comments or unterminated tags, is skipped silently.
///
/// Tag names are read in full and never shortened to fit a closing tag:
/// `<temp-late>x</temp>` and `<a->x</a>` both produce no node.
pub fn parse_nodes(input: &str) -> Vec<Node> {
	let bytes = input.as_bytes();
	let lines = LineTable::new(input);
	let mut nodes = Vec::new();
	let mut cursor = 0;

	while let Some(found) = bytes[cursor..].iter().position(|&b| b == b'<') {
		let start = cursor + found;

		match match_node_at(input, start) {
			Some(raw) => {
				cursor = raw.end;
				nodes.push(raw.into_node(input, &lines));
			}
			None => cursor = start + 1,
		}
	}

	nodes
}

/// Parse an attribute list such as `attr="val" attr2='' attr3`.
///
/// Keys are runs of ASCII word characters and hyphens. A key directly
/// followed by `="..."` or `='...'` takes the quoted text (which may not
/// span lines); any other key is an [`AttrValue::Flag`]. Everything else in
/// the input is ignored.
pub fn parse_attributes(input: &str) -> Attributes {
	let bytes = input.as_bytes();
	let mut attrs = Attributes::new();
	let mut pos = 0;

	while pos < bytes.len() {
		if !is_name_byte(bytes[pos]) {
			pos += 1;
			continue;
		}

		let key_end = scan_name(bytes, pos);
		let key = input[pos..key_end].to_string();

		match quoted_value_after(input, key_end) {
			Some((value, end)) => {
				attrs.insert(key, AttrValue::Text(value.to_string()));
				pos = end;
			}
			None => {
				attrs.insert(key, AttrValue::Flag);
				pos = key_end;
			}
		}
	}

	attrs
}

/// Byte ranges of a single matched node.
#[derive(Debug)]
struct RawNode {
	start: usize,
	name: Range<usize>,
	attrs: Range<usize>,
	content: Range<usize>,
	end: usize,
}

impl RawNode {
	fn into_node(self, input: &str, lines: &LineTable) -> Node {
		let raw_content = &input[self.content.clone()];
		let leading = leading_line_break(raw_content);
		let trailing = trailing_line_break(&raw_content[leading..]);
		let content = &raw_content[leading..raw_content.len() - trailing];

		let node_start = lines.line_at(self.start);
		let content_start = lines.line_at(self.content.start + leading);
		let content_end = content_start + count_line_breaks(content);

		Node {
			name: input[self.name].to_string(),
			attrs: parse_attributes(&input[self.attrs]),
			content: content.to_string(),
			start_index: self.start,
			end_index: self.end,
			node_start,
			node_end: lines.line_at(self.end - 1),
			content_start,
			content_end,
			processor: None,
			dst: None,
		}
	}
}

/// Try to match a whole node whose opening `<` is at `start`.
fn match_node_at(input: &str, start: usize) -> Option<RawNode> {
	let bytes = input.as_bytes();

	let name_start = start + 1;
	let name_end = scan_name(bytes, name_start);
	// The name needs a word boundary after it, so it cannot end in `-`.
	if name_end == name_start || bytes[name_end - 1] == b'-' {
		return None;
	}

	let attrs_start = name_end;
	let mut pos = name_end;
	loop {
		let key_start = skip_blanks(bytes, pos);
		let key_end = scan_name(bytes, key_start);
		if key_end == key_start {
			break;
		}

		pos = match quoted_value_after(input, key_end) {
			Some((_, end)) => end,
			None => key_end,
		};
	}
	let attrs_end = pos;

	let close_bracket = skip_blanks(bytes, pos);
	if bytes.get(close_bracket) != Some(&b'>') {
		return None;
	}

	let content_start = close_bracket + 1;
	let name = &input[name_start..name_end];
	let closing_tag = format!("</{name}>");
	let rest = &input[content_start..];
	let mut search_end = rest.len();

	while let Some(found) = rest[..search_end].rfind(&closing_tag) {
		let content_end = content_start + found;
		let end = content_end + closing_tag.len();
		if is_line_end(input, end) {
			return Some(RawNode {
				start,
				name: name_start..name_end,
				attrs: attrs_start..attrs_end,
				content: content_start..content_end,
				end,
			});
		}
		search_end = found;
	}

	None
}

/// Match `="value"` or `='value'` starting at `pos`, returning the value and
/// the offset after the closing quote.
fn quoted_value_after(input: &str, pos: usize) -> Option<(&str, usize)> {
	let rest = input.get(pos..)?.strip_prefix('=')?;
	let quote = rest.chars().next().filter(|&c| c == '"' || c == '\'')?;
	let value_start = pos + 2;

	for (offset, c) in input[value_start..].char_indices() {
		if c == quote {
			return Some((&input[value_start..value_start + offset], value_start + offset + 1));
		}
		if matches!(c, '\n' | '\r' | '\u{2028}' | '\u{2029}') {
			return None;
		}
	}

	None
}

fn is_name_byte(byte: u8) -> bool {
	byte.is_ascii_alphanumeric() || byte == b'_' || byte == b'-'
}

fn scan_name(bytes: &[u8], from: usize) -> usize {
	let len = bytes
		.get(from..)
		.map_or(0, |rest| rest.iter().take_while(|&&b| is_name_byte(b)).count());
	from + len
}

fn skip_blanks(bytes: &[u8], from: usize) -> usize {
	let len = bytes
		.get(from..)
		.map_or(0, |rest| rest.iter().take_while(|&&b| b == b' ' || b == b'\t').count());
	from + len
}
