use std::collections::BTreeMap;
use std::collections::HashMap;
use std::path::Path;
use std::path::PathBuf;
use std::process::Command;

use serde::Deserialize;

use crate::ExtensionMap;
use crate::FACTORY_OPTION;
use crate::ProcessorConfig;
use crate::SfcError;
use crate::SfcResult;
use crate::TemplateContext;
use crate::TranspileOptions;

/// Supported config file locations in discovery order (highest precedence
/// first).
pub const CONFIG_FILE_CANDIDATES: [&str; 3] = ["sfc.toml", ".sfc.toml", ".config/sfc.toml"];

/// Namespace under which `[vars]` are exposed to `{{ }}` expansion.
pub const VARS_NAMESPACE: &str = "vars";

/// Data source entry for a `[data]` namespace.
///
/// The format of a plain path entry comes from its extension:
///
/// ```toml
/// [data]
/// pkg = "package.json"
/// ```
///
/// Typed entries name the format explicitly:
///
/// ```toml
/// [data]
/// release = { path = "release-info", format = "json" }
/// ```
///
/// Command entries read the stdout of a shell command (text unless a format
/// is given):
///
/// ```toml
/// [data]
/// version = { command = "git describe --tags" }
/// ```
#[derive(Debug, Clone, Deserialize, Eq, PartialEq)]
#[serde(untagged)]
#[non_exhaustive]
pub enum DataSource {
	Path(PathBuf),
	Typed(TypedDataSource),
	Command(CommandDataSource),
}

impl DataSource {
	/// The configured relative path for file-backed sources.
	pub fn path(&self) -> Option<&Path> {
		match self {
			Self::Path(path) => Some(path.as_path()),
			Self::Typed(typed) => Some(typed.path.as_path()),
			Self::Command(_) => None,
		}
	}

	/// The explicit format override, if configured.
	pub fn format(&self) -> Option<&str> {
		match self {
			Self::Path(_) => None,
			Self::Typed(typed) => Some(typed.format.as_str()),
			Self::Command(command) => command.format.as_deref(),
		}
	}
}

#[derive(Debug, Clone, Deserialize, Eq, PartialEq)]
pub struct TypedDataSource {
	pub path: PathBuf,
	pub format: String,
}

#[derive(Debug, Clone, Deserialize, Eq, PartialEq)]
pub struct CommandDataSource {
	pub command: String,
	#[serde(default)]
	pub format: Option<String>,
}

/// Configuration loaded from an `sfc.toml` file.
///
/// ```toml
/// src = ["components/**/*.component"]
/// exclude = ["vendor/"]
/// dst_base = "dist"
///
/// [exts]
/// template = "html"
///
/// [data]
/// pkg = "package.json"
///
/// [vars]
/// out = "public"
///
/// [processors.command]
/// id = "upper"
/// command = "tr a-z A-Z"
///
/// [processors.lower]
/// factory = "command"
/// command = "tr A-Z a-z"
/// ```
#[derive(Debug, Default, Deserialize)]
pub struct SfcConfig {
	/// Glob patterns selecting the component files to transpile.
	#[serde(default)]
	pub src: Vec<String>,
	/// Gitignore-style patterns removed from discovery.
	#[serde(default)]
	pub exclude: Vec<String>,
	/// Directory relative destinations are written under, relative to the
	/// project root. Without it they are written under the project root.
	#[serde(default)]
	pub dst_base: Option<PathBuf>,
	#[serde(default)]
	pub quiet: bool,
	/// Tag name to output extension overrides.
	#[serde(default)]
	pub exts: BTreeMap<String, String>,
	/// Namespace to data source for `{{ }}` expansion.
	#[serde(default)]
	pub data: HashMap<String, DataSource>,
	/// Inline values exposed as `{{ vars.<key> }}`.
	#[serde(default)]
	pub vars: serde_json::Map<String, serde_json::Value>,
	/// Factory name (or processor id, with a `factory` option) to factory
	/// options.
	#[serde(default)]
	pub processors: BTreeMap<String, serde_json::Value>,
}

impl SfcConfig {
	/// Resolve the config path from known discovery candidates.
	#[must_use]
	pub fn resolve_path(root: &Path) -> Option<PathBuf> {
		CONFIG_FILE_CANDIDATES
			.iter()
			.map(|candidate| root.join(candidate))
			.find(|path| path.is_file())
	}

	/// Load the config from the first discovered config file at `root`.
	/// Returns `None` if the file does not exist.
	pub fn load(root: &Path) -> SfcResult<Option<SfcConfig>> {
		let Some(config_path) = Self::resolve_path(root) else {
			return Ok(None);
		};

		let content = std::fs::read_to_string(&config_path)?;
		let config = Self::parse(&content)?;

		Ok(Some(config))
	}

	pub fn parse(content: &str) -> SfcResult<SfcConfig> {
		toml::from_str(content).map_err(|e| SfcError::ConfigParse(e.to_string()))
	}

	/// Read each data source and parse it into a `serde_json::Value` keyed by
	/// namespace.
	pub fn load_data(&self, root: &Path) -> SfcResult<HashMap<String, serde_json::Value>> {
		let mut data = HashMap::new();

		for (namespace, source) in &self.data {
			let value = match source {
				DataSource::Path(rel_path) => {
					let format = rel_path
						.extension()
						.and_then(|e| e.to_str())
						.unwrap_or("")
						.to_ascii_lowercase();
					let content = read_data_file(root, rel_path)?;
					parse_data_file(&content, &format, &rel_path.display().to_string())?
				}
				DataSource::Typed(typed) => {
					let format = typed.format.trim().to_ascii_lowercase();
					let content = read_data_file(root, &typed.path)?;
					parse_data_file(&content, &format, &typed.path.display().to_string())?
				}
				DataSource::Command(command) => {
					let format = command
						.format
						.as_deref()
						.map(str::trim)
						.filter(|value| !value.is_empty())
						.map_or_else(|| "text".to_string(), str::to_ascii_lowercase);
					let stdout = execute_command(root, namespace, &command.command)?;
					parse_data_file(&stdout, &format, namespace)?
				}
			};

			data.insert(namespace.clone(), value);
		}

		Ok(data)
	}

	/// Build the expansion context: every `[data]` namespace plus `vars`.
	pub fn template_context(&self, root: &Path) -> SfcResult<TemplateContext> {
		let mut data = self.load_data(root)?;
		data.insert(
			VARS_NAMESPACE.to_string(),
			serde_json::Value::Object(self.vars.clone()),
		);

		Ok(TemplateContext::from_data(data))
	}

	/// The default extension map overlaid with `[exts]`.
	pub fn extension_map(&self) -> ExtensionMap {
		ExtensionMap::with_overrides(&self.exts)
	}

	/// `[processors]` as factory entries, in key order.
	///
	/// A table with a `factory` option is keyed by processor id, so its `id`
	/// defaults to the table name. This lets one factory back several
	/// processors.
	pub fn processor_config(&self) -> ProcessorConfig {
		self.processors
			.iter()
			.fold(ProcessorConfig::new(), |config, (key, options)| {
				config.with_factory(key.clone(), keyed_options(key, options))
			})
	}

	/// Transpile options for a project rooted at `root`.
	pub fn transpile_options(&self, root: &Path) -> SfcResult<TranspileOptions> {
		let dst_base = match &self.dst_base {
			Some(dst_base) => root.join(dst_base),
			None => root.to_path_buf(),
		};

		Ok(TranspileOptions::new()
			.with_exts(self.extension_map())
			.with_processors(self.processor_config())
			.with_quiet(self.quiet)
			.with_expander(self.template_context(root)?)
			.with_dst_base(dst_base))
	}
}

fn keyed_options(key: &str, options: &serde_json::Value) -> serde_json::Value {
	let mut options = options.clone();
	if let Some(table) = options.as_object_mut() {
		if table.contains_key(FACTORY_OPTION) && !table.contains_key("id") {
			table.insert("id".to_string(), serde_json::Value::String(key.to_string()));
		}
	}

	options
}

fn read_data_file(root: &Path, rel_path: &Path) -> SfcResult<String> {
	std::fs::read_to_string(root.join(rel_path)).map_err(|e| {
		SfcError::DataFile {
			path: rel_path.display().to_string(),
			reason: e.to_string(),
		}
	})
}

fn execute_command(root: &Path, namespace: &str, command: &str) -> SfcResult<String> {
	let output = if cfg!(windows) {
		Command::new("cmd")
			.arg("/C")
			.arg(command)
			.current_dir(root)
			.output()?
	} else {
		Command::new("sh")
			.arg("-c")
			.arg(command)
			.current_dir(root)
			.output()?
	};

	if !output.status.success() {
		let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
		let reason = if stderr.is_empty() {
			format!(
				"command exited with status {}",
				output
					.status
					.code()
					.map_or_else(|| "unknown".to_string(), |code| code.to_string())
			)
		} else {
			stderr
		};

		return Err(SfcError::DataFile {
			path: namespace.to_string(),
			reason,
		});
	}

	Ok(String::from_utf8_lossy(&output.stdout).to_string())
}

/// Parse a data file's content into a `serde_json::Value` based on its
/// format.
pub fn parse_data_file(
	content: &str,
	format: &str,
	path_display: &str,
) -> SfcResult<serde_json::Value> {
	let to_error = |reason: String| {
		SfcError::DataFile {
			path: path_display.to_string(),
			reason,
		}
	};

	match format {
		"text" | "string" | "raw" | "txt" => Ok(serde_json::Value::String(content.to_string())),
		"json" => serde_json::from_str(content).map_err(|e| to_error(e.to_string())),
		"toml" => {
			let toml_value: toml::Value =
				toml::from_str(content).map_err(|e| to_error(e.to_string()))?;
			Ok(toml_to_json(toml_value))
		}
		"yaml" | "yml" => serde_yaml_ng::from_str(content).map_err(|e| to_error(e.to_string())),
		other => Err(SfcError::UnsupportedDataFormat(other.to_string())),
	}
}

/// Convert a `toml::Value` to a `serde_json::Value`.
fn toml_to_json(value: toml::Value) -> serde_json::Value {
	match value {
		toml::Value::String(s) => serde_json::Value::String(s),
		toml::Value::Integer(i) => serde_json::Value::from(i),
		toml::Value::Float(f) => {
			serde_json::Number::from_f64(f)
				.map_or_else(|| serde_json::Value::String(f.to_string()), serde_json::Value::Number)
		}
		toml::Value::Boolean(b) => serde_json::Value::Bool(b),
		toml::Value::Datetime(dt) => serde_json::Value::String(dt.to_string()),
		toml::Value::Array(arr) => serde_json::Value::Array(arr.into_iter().map(toml_to_json).collect()),
		toml::Value::Table(table) => {
			serde_json::Value::Object(
				table
					.into_iter()
					.map(|(k, v)| (k, toml_to_json(v)))
					.collect(),
			)
		}
	}
}
