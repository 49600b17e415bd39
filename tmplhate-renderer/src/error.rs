//! Error types for tmplhate-renderer.

use thiserror::Error;

use tmplhate_core::SourceError;

/// All errors that can arise while loading inputs and rendering.
#[derive(Debug, Error)]
pub enum RenderError {
    /// Template or values location could not be opened or read.
    #[error(transparent)]
    Source(#[from] SourceError),

    /// Template text is not valid UTF-8.
    #[error("template from {location} is not valid UTF-8")]
    TemplateEncoding {
        location: String,
        #[source]
        source: std::string::FromUtf8Error,
    },

    /// Template failed to parse.
    #[error("invalid template")]
    TemplateSyntax(#[source] tera::Error),

    /// Values document is not valid YAML.
    #[error("unable to load values")]
    ValuesParse(#[source] serde_yaml::Error),

    /// Values document parsed but its root is not a mapping.
    #[error("unable to load values: document root must be a mapping, found {found}")]
    ValuesNotMapping { found: &'static str },

    /// A mapping key that has no string spelling (sequence or mapping key).
    #[error("unable to load values: unsupported {found} key")]
    UnsupportedKey { found: &'static str },

    /// Namespace could not be turned into an engine context.
    #[error("unable to build template context")]
    Context(#[source] tera::Error),

    /// Undefined variable, helper misuse, or output write failure.
    #[error("unable to render template")]
    Render(#[source] tera::Error),
}
