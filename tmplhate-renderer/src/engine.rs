//! Tera-backed template artifact: load, validate, render.

use std::io::{Read, Write};

use tera::Tera;

use crate::error::RenderError;
use crate::helpers::HelperRegistry;
use crate::namespace::Namespace;

/// Name the single template is registered under. It carries no extension,
/// so tera never autoescapes it.
const TEMPLATE_NAME: &str = "tmplhate";

fn build_tera(text: &str, helpers: &HelperRegistry) -> Result<Tera, RenderError> {
    let mut tera = Tera::default();
    tera.autoescape_on(vec![]);
    helpers.install(&mut tera);
    tera.add_raw_template(TEMPLATE_NAME, text)
        .map_err(RenderError::TemplateSyntax)?;
    Ok(tera)
}

/// Parse `text` with a throwaway engine purely to check its syntax.
pub fn validate(text: &str, helpers: &HelperRegistry) -> Result<(), RenderError> {
    build_tera(text, helpers).map(|_| ())
}

/// A validated, compiled template.
pub struct Template {
    text: String,
    tera: Tera,
}

impl Template {
    /// Validate and compile `text`.
    pub fn compile(text: impl Into<String>, helpers: &HelperRegistry) -> Result<Self, RenderError> {
        let text = text.into();
        validate(&text, helpers)?;
        let tera = build_tera(&text, helpers)?;
        Ok(Template { text, tera })
    }

    /// Read `reader` to completion, release it, then compile.
    ///
    /// `location` only labels errors.
    pub fn load(
        reader: Box<dyn Read>,
        location: &str,
        helpers: &HelperRegistry,
    ) -> Result<Self, RenderError> {
        let bytes = tmplhate_core::source::read_all(reader, location)?;
        let text = String::from_utf8(bytes).map_err(|source| RenderError::TemplateEncoding {
            location: tmplhate_core::source::display_location(location).to_string(),
            source,
        })?;
        tracing::debug!(bytes = text.len(), "template loaded");
        Self::compile(text, helpers)
    }

    /// Original template text.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Render into `out`. Bytes already written stay written on failure.
    pub fn render_to(&self, namespace: &Namespace, out: impl Write) -> Result<(), RenderError> {
        let ctx = namespace.to_tera_context()?;
        self.tera
            .render_to(TEMPLATE_NAME, &ctx, out)
            .map_err(RenderError::Render)
    }

    /// Render to a `String`.
    pub fn render(&self, namespace: &Namespace) -> Result<String, RenderError> {
        let ctx = namespace.to_tera_context()?;
        self.tera
            .render(TEMPLATE_NAME, &ctx)
            .map_err(RenderError::Render)
    }
}

impl std::fmt::Debug for Template {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Template").field("text", &self.text).finish_non_exhaustive()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
