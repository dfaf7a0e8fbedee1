mod common;

use common::COMPONENT;
use common::sfc_cmd;
use common::write_file;
use predicates::prelude::*;
use sfc_core::AnyEmptyResult;

#[test]
fn parse_lists_nodes() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	write_file(tmp.path(), "app.component", COMPONENT);

	sfc_cmd()
		.current_dir(tmp.path())
		.arg("parse")
		.arg("app.component")
		.assert()
		.success()
		.stdout(predicate::str::contains(
			"<template> lines 2-4 (content 3-3) dst=\"dist/\" processor=\"copy\"",
		))
		.stdout(predicate::str::contains(
			"<style> lines 5-7 (content 6-6) dst=\"dist/app.css\"",
		));

	Ok(())
}

#[test]
fn parse_outputs_json() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	write_file(tmp.path(), "app.component", COMPONENT);

	let output = sfc_cmd()
		.current_dir(tmp.path())
		.arg("parse")
		.arg("app.component")
		.arg("--format")
		.arg("json")
		.output()?;
	assert!(output.status.success());

	let report: serde_json::Value = serde_json::from_slice(&output.stdout)?;
	let nodes = report["nodes"]
		.as_array()
		.unwrap_or_else(|| panic!("nodes should be an array"));
	assert_eq!(nodes.len(), 2);
	assert_eq!(nodes[0]["name"], "template");
	assert_eq!(nodes[0]["content"], "<h1>Hello</h1>");
	assert_eq!(nodes[0]["attrs"]["processor"], "copy");
	assert_eq!(nodes[0]["node_start"], 2);
	assert_eq!(nodes[1]["name"], "style");

	Ok(())
}

#[test]
fn parse_reports_empty_file() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	write_file(tmp.path(), "empty.component", "<!-- nothing here -->\n");

	sfc_cmd()
		.current_dir(tmp.path())
		.arg("parse")
		.arg("empty.component")
		.assert()
		.success()
		.stdout(predicate::str::contains("No nodes found"));

	Ok(())
}

#[test]
fn parse_fails_for_missing_file() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;

	sfc_cmd()
		.current_dir(tmp.path())
		.arg("parse")
		.arg("missing.component")
		.assert()
		.failure()
		.code(2)
		.stderr(predicate::str::contains("failed to read source file"));

	Ok(())
}

#[test]
fn factories_lists_builtins() {
	sfc_cmd()
		.arg("factories")
		.assert()
		.success()
		.stdout(predicate::str::contains("Processor factories:"))
		.stdout(predicate::str::contains("banner"))
		.stdout(predicate::str::contains("command"))
		.stdout(predicate::str::contains("copy"))
		.stdout(predicate::str::contains("render"))
		.stdout(predicate::str::contains("trim"));
}
