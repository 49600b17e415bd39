//! # tmplhate-renderer
//!
//! Assembles a variable namespace from a YAML values document and the
//! process environment, then renders a tera template against it.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use tmplhate_renderer::{RenderOptions, Renderer};
//!
//! fn render_to_stdout() -> Result<(), tmplhate_renderer::RenderError> {
//!     let renderer = Renderer::new(RenderOptions::default());
//!     renderer.run("deploy.yaml.tmpl", "values.yaml", std::io::stdout().lock())
//! }
//! ```

pub mod engine;
pub mod env;
pub mod error;
pub mod helpers;
pub mod namespace;
pub mod pipeline;

pub use engine::Template;
pub use env::{EnvSource, FixedEnv, ProcessEnv};
pub use error::RenderError;
pub use helpers::{Helper, HelperRegistry};
pub use namespace::Namespace;
pub use pipeline::{Prepared, RenderOptions, Renderer};
