use std::collections::HashSet;
use std::path::Path;
use std::path::PathBuf;

use globset::Glob;
use globset::GlobSet;
use globset::GlobSetBuilder;
use ignore::gitignore::Gitignore;
use ignore::gitignore::GitignoreBuilder;

use crate::SfcError;
use crate::SfcResult;

/// Collect the component files under `root` whose root-relative path
/// matches one of the `include` globs.
///
/// Hidden directories, `node_modules` and `target` are never entered. Paths
/// matched by the root `.gitignore` or by the gitignore-style `exclude`
/// patterns are skipped. The result is sorted.
pub fn collect_sources(
	root: &Path,
	include: &[String],
	exclude: &[String],
) -> SfcResult<Vec<PathBuf>> {
	let include_set = build_glob_set(include);
	let walk = Walk {
		root,
		include: &include_set,
		gitignore: build_gitignore(root),
		exclude: build_exclude_matcher(root, exclude)?,
	};

	let mut files = Vec::new();
	let mut visited_dirs = HashSet::new();
	walk.dir(root, &mut files, &mut visited_dirs)?;

	// Sort for deterministic ordering.
	files.sort();
	Ok(files)
}

struct Walk<'a> {
	root: &'a Path,
	include: &'a GlobSet,
	gitignore: Gitignore,
	exclude: Gitignore,
}

impl Walk<'_> {
	fn dir(
		&self,
		dir: &Path,
		files: &mut Vec<PathBuf>,
		visited_dirs: &mut HashSet<PathBuf>,
	) -> SfcResult<()> {
		// Symlinked directories can lead back to an ancestor.
		let canonical = dir.canonicalize().unwrap_or_else(|_| dir.to_path_buf());
		if !visited_dirs.insert(canonical) {
			return Ok(());
		}

		for entry in std::fs::read_dir(dir)? {
			let path = entry?.path();

			if let Some(name) = path.file_name().and_then(|n| n.to_str()) {
				if is_ignored_directory_name(name) && path.is_dir() {
					continue;
				}
			}

			let is_dir = path.is_dir();
			if self.gitignore.matched(&path, is_dir).is_ignore()
				|| self.exclude.matched(&path, is_dir).is_ignore()
			{
				continue;
			}

			if is_dir {
				self.dir(&path, files, visited_dirs)?;
			} else if let Ok(rel_path) = path.strip_prefix(self.root) {
				if self.include.is_match(rel_path) {
					files.push(path);
				}
			}
		}

		Ok(())
	}
}

fn is_ignored_directory_name(name: &str) -> bool {
	name.starts_with('.') || name == "node_modules" || name == "target"
}

/// Build a `GlobSet` from a list of glob pattern strings. Invalid patterns
/// are skipped.
fn build_glob_set(patterns: &[String]) -> GlobSet {
	let mut builder = GlobSetBuilder::new();
	for pattern in patterns {
		if let Ok(glob) = Glob::new(pattern) {
			builder.add(glob);
		}
	}
	builder.build().unwrap_or_else(|_| GlobSet::empty())
}

/// Build a `Gitignore` matcher from the `exclude` patterns of `sfc.toml`.
fn build_exclude_matcher(root: &Path, patterns: &[String]) -> SfcResult<Gitignore> {
	let mut builder = GitignoreBuilder::new(root);
	for pattern in patterns {
		builder.add_line(None, pattern).map_err(|e| {
			SfcError::ConfigParse(format!("invalid exclude pattern `{pattern}`: {e}"))
		})?;
	}
	builder
		.build()
		.map_err(|e| SfcError::ConfigParse(format!("failed to build exclude rules: {e}")))
}

/// Build a `Gitignore` matcher from the project's `.gitignore` file (if any).
fn build_gitignore(root: &Path) -> Gitignore {
	let mut builder = GitignoreBuilder::new(root);
	let gitignore_path = root.join(".gitignore");
	if gitignore_path.exists() {
		let _ = builder.add(gitignore_path);
	}
	builder.build().unwrap_or_else(|_| Gitignore::empty())
}
