use std::collections::HashMap;

/// Output extensions used when no `exts` configuration is given.
pub const DEFAULT_EXTENSIONS: [(&str, &str); 3] =
	[("template", ".html"), ("script", ".js"), ("style", ".css")];

/// Maps lower-cased tag names to the extension of their output files.
///
/// Every stored extension begins with exactly one dot, whatever the
/// configuration wrote (`"html"`, `".html"` and `"..html"` are all `.html`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtensionMap(HashMap<String, String>);

impl ExtensionMap {
	/// A map with no entries, not even the defaults.
	pub fn empty() -> Self {
		Self(HashMap::new())
	}

	/// The default map overlaid with `overrides`.
	pub fn with_overrides<I, K, V>(overrides: I) -> Self
	where
		I: IntoIterator<Item = (K, V)>,
		K: AsRef<str>,
		V: AsRef<str>,
	{
		let mut map = Self::default();
		map.extend(overrides);
		map
	}

	pub fn insert(&mut self, name: impl AsRef<str>, ext: impl AsRef<str>) {
		self.0.insert(
			name.as_ref().to_lowercase(),
			normalize_extension(ext.as_ref()),
		);
	}

	/// Look up the extension for a tag name, ignoring case.
	pub fn get(&self, name: &str) -> Option<&str> {
		self.0.get(&name.to_lowercase()).map(String::as_str)
	}

	pub fn len(&self) -> usize {
		self.0.len()
	}

	pub fn is_empty(&self) -> bool {
		self.0.is_empty()
	}
}

impl Default for ExtensionMap {
	fn default() -> Self {
		let mut map = Self::empty();
		map.extend(DEFAULT_EXTENSIONS);
		map
	}
}

impl<K: AsRef<str>, V: AsRef<str>> Extend<(K, V)> for ExtensionMap {
	fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
		for (name, ext) in iter {
			self.insert(name, ext);
		}
	}
}

/// Strip any leading dots from `ext` and add back exactly one.
pub fn normalize_extension(ext: &str) -> String {
	format!(".{}", ext.trim_start_matches('.'))
}
