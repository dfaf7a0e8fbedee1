/// Pre-computed table of line-start byte offsets for offset-to-line
/// conversion. `\r\n`, `\n` and a lone `\r` each end exactly one line.
#[derive(Debug, Clone)]
pub struct LineTable {
	/// Byte offsets of the start of each line. `line_starts[0]` is always 0.
	line_starts: Vec<usize>,
}

impl LineTable {
	pub fn new(content: &str) -> Self {
		let bytes = content.as_bytes();
		let mut line_starts = vec![0];
		let mut index = 0;

		while index < bytes.len() {
			match bytes[index] {
				b'\r' if bytes.get(index + 1) == Some(&b'\n') => {
					index += 2;
					line_starts.push(index);
				}
				b'\r' | b'\n' => {
					index += 1;
					line_starts.push(index);
				}
				_ => index += 1,
			}
		}

		Self { line_starts }
	}

	/// The 1-indexed line containing the byte at `offset`. Offsets past the
	/// end of the content resolve to the last line.
	pub fn line_at(&self, offset: usize) -> usize {
		self.line_starts.partition_point(|&start| start <= offset)
	}

	/// Total number of lines, counting a trailing empty line after a final
	/// line break.
	pub fn len(&self) -> usize {
		self.line_starts.len()
	}
}

/// Count the line breaks in `content`, treating `\r\n` as a single break.
pub fn count_line_breaks(content: &str) -> usize {
	LineTable::new(content).len() - 1
}

/// Length in bytes of the line break at the start of `content`, if any.
pub(crate) fn leading_line_break(content: &str) -> usize {
	if content.starts_with("\r\n") {
		2
	} else if content.starts_with(['\n', '\r']) {
		1
	} else {
		0
	}
}

/// Length in bytes of the line break at the end of `content`, if any.
pub(crate) fn trailing_line_break(content: &str) -> usize {
	if content.ends_with("\r\n") {
		2
	} else if content.ends_with(['\n', '\r']) {
		1
	} else {
		0
	}
}

/// Whether `offset` sits at the end of a line: the end of input or right
/// before a line terminator.
pub(crate) fn is_line_end(content: &str, offset: usize) -> bool {
	content
		.get(offset..)
		.is_some_and(|rest| rest.is_empty() || rest.starts_with(['\n', '\r', '\u{2028}', '\u{2029}']))
}
