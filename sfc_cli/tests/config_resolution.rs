mod common;

use common::COMPONENT;
use common::sfc_cmd;
use common::write_file;
use sfc_core::AnyEmptyResult;

fn banner_config(header: &str) -> String {
	format!("[processors.banner]\nid = \"copy\"\nheader = \"{header}\"\n")
}

fn run_transpile(root: &std::path::Path) -> AnyEmptyResult {
	sfc_cmd()
		.current_dir(root)
		.arg("transpile")
		.arg("--quiet")
		.arg("app.component")
		.assert()
		.success();

	Ok(())
}

#[test]
fn transpile_resolves_dot_sfc_toml() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	write_file(tmp.path(), ".sfc.toml", &banner_config("dot:"));
	write_file(tmp.path(), "app.component", COMPONENT);

	run_transpile(tmp.path())?;

	let html = std::fs::read_to_string(tmp.path().join("dist/app.html"))?;
	assert_eq!(html, "dot:<h1>Hello</h1>");

	Ok(())
}

#[test]
fn transpile_resolves_dot_config_sfc_toml() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	write_file(tmp.path(), ".config/sfc.toml", &banner_config("nested:"));
	write_file(tmp.path(), "app.component", COMPONENT);

	run_transpile(tmp.path())?;

	let html = std::fs::read_to_string(tmp.path().join("dist/app.html"))?;
	assert_eq!(html, "nested:<h1>Hello</h1>");

	Ok(())
}

#[test]
fn transpile_prefers_sfc_toml_over_other_candidates() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	write_file(tmp.path(), "sfc.toml", &banner_config("root:"));
	write_file(tmp.path(), ".sfc.toml", &banner_config("dot:"));
	write_file(tmp.path(), ".config/sfc.toml", &banner_config("nested:"));
	write_file(tmp.path(), "app.component", COMPONENT);

	run_transpile(tmp.path())?;

	let html = std::fs::read_to_string(tmp.path().join("dist/app.html"))?;
	assert_eq!(html, "root:<h1>Hello</h1>");

	Ok(())
}
