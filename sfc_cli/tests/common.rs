use std::path::Path;
use std::path::PathBuf;

use assert_cmd::Command;

pub const COMPONENT: &str = r#"<!-- app -->
<template processor="copy" dst="dist/">
<h1>Hello</h1>
</template>
<style dst="dist/app.css">
h1{color: red;}
</style>
"#;

pub fn sfc_cmd() -> Command {
	let mut cmd = Command::cargo_bin("sfc").unwrap_or_else(|e| panic!("sfc binary: {e}"));
	cmd.env("NO_COLOR", "1");
	cmd.env_remove("SFC_LOG");
	cmd
}

pub fn write_file(root: &Path, rel: &str, content: &str) -> PathBuf {
	let path = root.join(rel);
	if let Some(parent) = path.parent() {
		std::fs::create_dir_all(parent).unwrap_or_else(|e| panic!("mkdir: {e}"));
	}
	std::fs::write(&path, content).unwrap_or_else(|e| panic!("write: {e}"));
	path
}
