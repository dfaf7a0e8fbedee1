//! `sfc_core` is the core library for the `sfc` single file component transpiler. A component file holds several top-level tagged sections (a template, a script, a style) in one document. Each section is extracted, routed through a named content processor and written to its own output file.
//!
//! ## Processing Pipeline
//!
//! ```text
//! Component file
//!   → Scanner (extracts top-level <name attrs>content</name> nodes with line spans)
//!   → Registry (resolves configured processors and factory lifecycle hooks)
//!   → Destination resolver (derives output paths from `dst` attributes)
//!   → Transpiler (runs hooks and processors, writes each node's output)
//! ```
//!
//! ## Modules
//!
//! - [`config`]: Configuration loading from `sfc.toml`, covering source globs, extension overrides, data namespaces and processor factories.
//! - [`discover`]: Directory walking that finds component files matching the configured globs.
//!
//! ## Key Types
//!
//! - [`Node`]: A tagged region of a component file with its attributes, content and position.
//! - [`Processor`]: An asynchronous content transform with an optional output extension.
//! - [`FactoryCatalog`]: Named processor factories that configuration can instantiate.
//! - [`ProcessorRegistry`]: Processors and hooks resolved for one run.
//! - [`TranspileOptions`]: Everything a [`transpile`] run needs.
//!
//! ## Destinations
//!
//! A `dst` attribute with a file extension is the output path. Any other `dst` names a directory, and the output file takes the component's stem and the extension of the processor or of the tag name:
//!
//! ```text
//! <template dst="out/">   in  cica.component  →  out/cica.html
//! <style dst="out/a.css"> in  cica.component  →  out/a.css
//! ```
//!
//! `dst` values support [`minijinja`](https://docs.rs/minijinja) placeholders populated from `[data]` and `[vars]` in `sfc.toml`, e.g. `dst="{{ vars.out }}/"`.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use sfc_core::Node;
//! use sfc_core::Processor;
//! use sfc_core::ProcessorConfig;
//! use sfc_core::TranspileOptions;
//! use sfc_core::transpile;
//!
//! # async fn run() -> sfc_core::SfcResult<()> {
//! let upper = Processor::from_fn(|content: &str, _: &Node| content.to_uppercase());
//! let options = TranspileOptions::new()
//! 	.with_processors(ProcessorConfig::new().with_processor("upper", upper))
//! 	.with_dst_base("dist");
//!
//! let summary = transpile(&["app.component"], &options).await?;
//! println!("{} file(s) created", summary.total_written());
//! # Ok(())
//! # }
//! ```

pub use destination::*;
pub use error::*;
pub use extensions::*;
pub use node::*;
pub use processor::*;
pub use registry::*;
pub use scanner::*;
pub use template::*;
pub use transpiler::*;

mod builtin;
pub mod config;
mod destination;
pub mod discover;
#[allow(unused_assignments)]
mod error;
mod extensions;
mod lines;
mod node;
mod processor;
mod registry;
mod scanner;
mod template;
mod transpiler;

#[cfg(test)]
mod __fixtures;
