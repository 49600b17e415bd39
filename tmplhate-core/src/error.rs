//! Error types for tmplhate-core.

use std::path::PathBuf;

use thiserror::Error;

/// Failures while turning a location string into a readable stream.
#[derive(Debug, Error)]
pub enum SourceError {
    /// Filesystem open or read failure.
    #[error("unable to open file {path}")]
    File {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Connection failure or non-success HTTP status.
    #[error("unable to open http location {url}")]
    Http {
        url: String,
        #[source]
        source: Box<ureq::Error>,
    },

    /// The stream opened but could not be read to completion.
    #[error("unable to read {location}")]
    Read {
        location: String,
        #[source]
        source: std::io::Error,
    },

    /// A `~/` location was given but no home directory is known.
    #[error("cannot determine home directory to expand {location}")]
    HomeNotFound { location: String },

    /// Empty location with nothing piped on stdin.
    #[error("no template given and stdin is a terminal; use 'tmplhate --help' for usage")]
    StdinIsTerminal,
}

/// Malformed configuration: flags, environment or config file.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("case '{0}' is invalid; expected one of: lower, upper, title")]
    InvalidCase(String),

    #[error("env policy '{0}' is invalid; expected one of: duplicate-both-spellings, single-uppercased")]
    InvalidEnvPolicy(String),

    /// An explicitly requested config file could not be read.
    #[error("unable to read config file {path}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Config file exists but is not valid YAML for [`crate::config::FileConfig`].
    #[error("failed to parse config file {path}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    /// No values location from flag, environment or config file.
    #[error("a values location is required (--values, TMPLHATE_VALUES or `values:` in the config file)")]
    MissingValues,
}
