//! tmplhate core library: domain types, source resolution, config file, errors.
//!
//! - [`types`]: [`CaseConvention`] and [`EnvPolicy`]
//! - [`source`]: [`LocationKind`] and stream opening
//! - [`config`]: optional `~/.tmplhate.yaml`
//! - [`error`]: [`SourceError`] and [`ConfigError`]

pub mod config;
pub mod error;
pub mod source;
pub mod types;

pub use config::{FileConfig, LoadedConfig};
pub use error::{ConfigError, SourceError};
pub use source::LocationKind;
pub use types::{CaseConvention, EnvPolicy};
