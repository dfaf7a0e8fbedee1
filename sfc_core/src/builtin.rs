use std::process::Stdio;

use serde::Deserialize;
use serde::Serialize;
use serde::de::DeserializeOwned;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;

use crate::FactoryCatalog;
use crate::FactoryOutput;
use crate::Node;
use crate::ProcessFuture;
use crate::Processor;
use crate::ProcessorFactory;
use crate::SfcError;
use crate::SfcResult;
use crate::Transform;
use crate::render_template;

pub(crate) fn register_builtins(catalog: &mut FactoryCatalog) {
	catalog.register(CopyFactory);
	catalog.register(TrimFactory);
	catalog.register(BannerFactory);
	catalog.register(RenderFactory);
	catalog.register(CommandFactory);
}

/// Options every built-in factory accepts.
#[derive(Debug, Default, Deserialize)]
struct CommonOptions {
	/// Registry key, defaults to the factory name.
	#[serde(default)]
	id: Option<String>,
	#[serde(default)]
	ext: Option<String>,
}

impl CommonOptions {
	fn output(self, factory: &str, processor: Processor) -> FactoryOutput {
		let processor = match self.ext {
			Some(ext) => processor.with_ext(ext),
			None => processor,
		};

		FactoryOutput::new(self.id.unwrap_or_else(|| factory.to_string()), processor)
	}
}

/// Deserialize factory options, treating `null` as an empty table.
fn parse_options<T: DeserializeOwned + Default>(
	factory: &str,
	options: &serde_json::Value,
) -> SfcResult<T> {
	if options.is_null() {
		return Ok(T::default());
	}

	serde_json::from_value(options.clone()).map_err(|e| {
		SfcError::InvalidProcessorOptions {
			factory: factory.to_string(),
			reason: e.to_string(),
		}
	})
}

struct CopyFactory;

impl ProcessorFactory for CopyFactory {
	fn name(&self) -> &str {
		"copy"
	}

	fn description(&self) -> &str {
		"write node content unchanged"
	}

	fn create(&self, options: &serde_json::Value) -> SfcResult<FactoryOutput> {
		let common: CommonOptions = parse_options(self.name(), options)?;
		let processor = Processor::from_fn(|content: &str, _: &Node| content.to_string());
		Ok(common.output(self.name(), processor))
	}
}

struct TrimFactory;

impl ProcessorFactory for TrimFactory {
	fn name(&self) -> &str {
		"trim"
	}

	fn description(&self) -> &str {
		"strip leading and trailing whitespace"
	}

	fn create(&self, options: &serde_json::Value) -> SfcResult<FactoryOutput> {
		let common: CommonOptions = parse_options(self.name(), options)?;
		let processor = Processor::from_fn(|content: &str, _: &Node| content.trim().to_string());
		Ok(common.output(self.name(), processor))
	}
}

#[derive(Debug, Default, Deserialize)]
struct BannerOptions {
	#[serde(flatten)]
	common: CommonOptions,
	#[serde(default)]
	header: String,
	#[serde(default)]
	footer: String,
}

struct BannerFactory;

impl ProcessorFactory for BannerFactory {
	fn name(&self) -> &str {
		"banner"
	}

	fn description(&self) -> &str {
		"wrap content between a `header` and a `footer`"
	}

	fn create(&self, options: &serde_json::Value) -> SfcResult<FactoryOutput> {
		let BannerOptions {
			common,
			header,
			footer,
		} = parse_options(self.name(), options)?;
		let processor =
			Processor::from_fn(move |content: &str, _: &Node| format!("{header}{content}{footer}"));
		Ok(common.output(self.name(), processor))
	}
}

#[derive(Debug, Default, Deserialize)]
struct RenderOptions {
	#[serde(flatten)]
	common: CommonOptions,
	#[serde(default)]
	vars: serde_json::Map<String, serde_json::Value>,
}

#[derive(Serialize)]
struct RenderContext<'a> {
	node: &'a Node,
	vars: &'a serde_json::Map<String, serde_json::Value>,
}

struct RenderTransform {
	vars: serde_json::Map<String, serde_json::Value>,
}

impl Transform for RenderTransform {
	fn transform<'a>(&'a self, content: &'a str, node: &'a Node) -> ProcessFuture<'a> {
		Box::pin(async move {
			let context = RenderContext {
				node,
				vars: &self.vars,
			};
			render_template(content, &context)
				.map(Some)
				.map_err(|e| {
					SfcError::Processor {
						node: node.name.clone(),
						reason: e.to_string(),
					}
				})
		})
	}
}

struct RenderFactory;

impl ProcessorFactory for RenderFactory {
	fn name(&self) -> &str {
		"render"
	}

	fn description(&self) -> &str {
		"render content as a minijinja template with `node` and `vars` in scope"
	}

	fn create(&self, options: &serde_json::Value) -> SfcResult<FactoryOutput> {
		let RenderOptions { common, vars } = parse_options(self.name(), options)?;
		Ok(common.output(self.name(), Processor::new(RenderTransform { vars })))
	}
}

#[derive(Debug, Deserialize)]
struct CommandOptions {
	#[serde(flatten)]
	common: CommonOptions,
	command: String,
}

struct CommandTransform {
	command: String,
}

impl CommandTransform {
	fn shell(&self) -> Command {
		let mut command = if cfg!(windows) {
			let mut command = Command::new("cmd");
			command.arg("/C");
			command
		} else {
			let mut command = Command::new("sh");
			command.arg("-c");
			command
		};
		command
			.arg(&self.command)
			.stdin(Stdio::piped())
			.stdout(Stdio::piped())
			.stderr(Stdio::piped())
			.kill_on_drop(true);
		command
	}

	async fn run(&self, content: &str) -> SfcResult<String> {
		let to_error = |reason: String| {
			SfcError::Command {
				command: self.command.clone(),
				reason,
			}
		};

		let mut child = self.shell().spawn().map_err(|e| to_error(e.to_string()))?;
		let mut stdin = child
			.stdin
			.take()
			.ok_or_else(|| to_error("stdin was not captured".to_string()))?;

		let feed = async move {
			let written = stdin.write_all(content.as_bytes()).await;
			drop(stdin);
			written
		};
		let (written, output) = tokio::join!(feed, child.wait_with_output());
		let output = output.map_err(|e| to_error(e.to_string()))?;

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
			return Err(to_error(reason));
		}

		// A command that exits successfully without reading its input closes
		// the pipe early, which is not a failure.
		if let Err(error) = written {
			if error.kind() != std::io::ErrorKind::BrokenPipe {
				return Err(to_error(error.to_string()));
			}
		}

		Ok(String::from_utf8_lossy(&output.stdout).to_string())
	}
}

impl Transform for CommandTransform {
	fn transform<'a>(&'a self, content: &'a str, _node: &'a Node) -> ProcessFuture<'a> {
		Box::pin(async move { self.run(content).await.map(Some) })
	}
}

struct CommandFactory;

impl ProcessorFactory for CommandFactory {
	fn name(&self) -> &str {
		"command"
	}

	fn description(&self) -> &str {
		"pipe content through a shell `command` and keep its stdout"
	}

	fn create(&self, options: &serde_json::Value) -> SfcResult<FactoryOutput> {
		let CommandOptions { common, command } =
			serde_json::from_value(options.clone()).map_err(|e| {
				SfcError::InvalidProcessorOptions {
					factory: self.name().to_string(),
					reason: e.to_string(),
				}
			})?;
		Ok(common.output(self.name(), Processor::new(CommandTransform { command })))
	}
}
