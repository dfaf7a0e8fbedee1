use miette::Diagnostic;
use thiserror::Error;

#[derive(Debug, Diagnostic, Error)]
#[non_exhaustive]
pub enum SfcError {
	#[error(transparent)]
	#[diagnostic(code(sfc::io_error))]
	Io(#[from] std::io::Error),

	#[error("failed to read source file `{path}`: {reason}")]
	#[diagnostic(code(sfc::read_file))]
	ReadFile { path: String, reason: String },

	#[error("failed to write output file `{path}`: {reason}")]
	#[diagnostic(code(sfc::write_file))]
	WriteFile { path: String, reason: String },

	#[error("no extension found for node \"{node}\"")]
	#[diagnostic(
		code(sfc::missing_extension),
		help(
			"point `dst` at a file, add `{node} = \"<ext>\"` under [exts] or use a processor that \
			 declares an `ext`"
		)
	)]
	MissingExtension { node: String },

	#[error("unknown processor factory: `{0}`")]
	#[diagnostic(
		code(sfc::unknown_factory),
		help("built-in factories: copy, trim, banner, render, command")
	)]
	UnknownFactory(String),

	#[error("invalid options for processor factory `{factory}`: {reason}")]
	#[diagnostic(code(sfc::invalid_processor_options))]
	InvalidProcessorOptions { factory: String, reason: String },

	#[error("processor failed for node \"{node}\": {reason}")]
	#[diagnostic(code(sfc::processor))]
	Processor { node: String, reason: String },

	#[error("command `{command}` failed: {reason}")]
	#[diagnostic(code(sfc::command))]
	Command { command: String, reason: String },

	#[error("failed to parse config file: {0}")]
	#[diagnostic(
		code(sfc::config_parse),
		help(
			"check that sfc.toml is valid TOML with optional [exts], [data], [vars] and \
			 [processors] sections"
		)
	)]
	ConfigParse(String),

	#[error("failed to load data file `{path}`: {reason}")]
	#[diagnostic(code(sfc::data_file))]
	DataFile { path: String, reason: String },

	#[error("unsupported data file format: `{0}`")]
	#[diagnostic(
		code(sfc::unsupported_format),
		help("supported formats: text, json, toml, yaml, yml")
	)]
	UnsupportedDataFormat(String),

	#[error("template rendering failed: {0}")]
	#[diagnostic(code(sfc::template_render))]
	TemplateRender(String),

	#[error("no input files to transpile")]
	#[diagnostic(
		code(sfc::no_input_files),
		help("pass component files on the command line or add `src` globs to sfc.toml")
	)]
	NoInputFiles,
}

pub type SfcResult<T> = Result<T, SfcError>;
pub type AnyEmptyResult = Result<(), Box<dyn std::error::Error>>;
