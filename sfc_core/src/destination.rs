use std::path::Path;
use std::path::PathBuf;

use crate::Expand;
use crate::ExtensionMap;
use crate::Node;
use crate::SfcError;
use crate::SfcResult;
use crate::extensions::normalize_extension;

/// Computes output paths from a node's `dst` attribute.
#[derive(Debug, Clone, Default)]
pub struct DestinationResolver {
	/// Prefixed to every relative destination.
	pub dst_base: Option<PathBuf>,
	pub exts: ExtensionMap,
}

impl DestinationResolver {
	pub fn new(dst_base: Option<PathBuf>, exts: ExtensionMap) -> Self {
		Self { dst_base, exts }
	}

	/// Resolve the output path for `node` found in `source`, or `None` when
	/// the node has no `dst` attribute.
	///
	/// A `dst` with a file extension is used as is. Any other `dst` names a
	/// directory and the file inside it takes the stem of `source` plus the
	/// extension declared by the node's processor, falling back to the
	/// extension mapped to the node's name.
	pub fn resolve(
		&self,
		source: &Path,
		node: &Node,
		expander: &dyn Expand,
	) -> SfcResult<Option<PathBuf>> {
		let Some(value) = node.dst_value() else {
			return Ok(None);
		};

		let mut dst = PathBuf::from(expander.expand(value)?);

		if dst.extension().is_none() {
			let ext = node
				.processor
				.as_ref()
				.and_then(|processor| processor.ext())
				.or_else(|| self.exts.get(&node.name))
				.map(normalize_extension)
				.ok_or_else(|| {
					SfcError::MissingExtension {
						node: node.name.clone(),
					}
				})?;

			let stem = source
				.file_stem()
				.map(|stem| stem.to_string_lossy())
				.unwrap_or_default();
			dst.push(format!("{stem}{ext}"));
		}

		if let Some(base) = &self.dst_base {
			if !dst.is_absolute() {
				dst = base.join(dst);
			}
		}

		Ok(Some(dst))
	}
}
