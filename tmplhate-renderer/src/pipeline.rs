//! The render pipeline shared by the CLI and library callers.
//!
//! Order is fixed: open template → validate/compile → open values → parse
//! and normalize → inject environment → render. Everything up to rendering
//! happens in [`Renderer::prepare`], so a bad template or values document
//! fails before a single output byte is written.

use std::io::Write;

use tmplhate_core::{source, CaseConvention, EnvPolicy};

use crate::engine::Template;
use crate::env::{self, EnvSource, ProcessEnv};
use crate::error::RenderError;
use crate::helpers::HelperRegistry;
use crate::namespace::Namespace;

/// Knobs read once at startup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderOptions {
    /// Rewrite top-level value keys and environment names under `case`.
    pub normalize: bool,
    pub case: CaseConvention,
    pub env_policy: EnvPolicy,
}

impl Default for RenderOptions {
    fn default() -> Self {
        RenderOptions {
            normalize: true,
            case: CaseConvention::default(),
            env_policy: EnvPolicy::default(),
        }
    }
}

impl RenderOptions {
    /// The case transform to apply, or `None` when normalization is off.
    pub fn case_transform(&self) -> Option<CaseConvention> {
        self.normalize.then_some(self.case)
    }
}

/// A compiled template and the namespace it will be rendered against.
#[derive(Debug)]
pub struct Prepared {
    pub template: Template,
    pub namespace: Namespace,
}

impl Prepared {
    pub fn render_to(&self, out: impl Write) -> Result<(), RenderError> {
        self.template.render_to(&self.namespace, out)
    }
}

/// Loads inputs and renders them.
pub struct Renderer {
    options: RenderOptions,
    helpers: HelperRegistry,
    env: Box<dyn EnvSource>,
}

impl Renderer {
    /// Renderer over the process environment with the built-in helpers.
    pub fn new(options: RenderOptions) -> Self {
        Renderer {
            options,
            helpers: HelperRegistry::builtin(),
            env: Box::new(ProcessEnv),
        }
    }

    /// Replace the environment source.
    pub fn with_env(mut self, env: impl EnvSource + 'static) -> Self {
        self.env = Box::new(env);
        self
    }

    /// Replace the helper set.
    pub fn with_helpers(mut self, helpers: HelperRegistry) -> Self {
        self.helpers = helpers;
        self
    }

    /// Open, read and compile the template. An empty location reads stdin.
    pub fn load_template(&self, location: &str) -> Result<Template, RenderError> {
        let reader = source::open(location)?;
        Template::load(reader, location, &self.helpers)
    }

    /// Build the namespace from an already-read values document.
    pub fn namespace_from_yaml(&self, bytes: &[u8]) -> Result<Namespace, RenderError> {
        let mut namespace = Namespace::from_yaml(bytes)?;
        if let Some(case) = self.options.case_transform() {
            namespace.normalize_keys(case);
        }
        self.inject_env(&mut namespace);
        Ok(namespace)
    }

    /// Load values from `location` (empty means no values) and inject the
    /// environment on top.
    pub fn load_namespace(&self, location: &str) -> Result<Namespace, RenderError> {
        let reader = if location.is_empty() {
            None
        } else {
            Some(source::open(location)?)
        };
        let mut namespace = Namespace::load(reader, location, self.options.case_transform())?;
        self.inject_env(&mut namespace);
        Ok(namespace)
    }

    fn inject_env(&self, namespace: &mut Namespace) {
        env::inject(
            namespace,
            self.env.as_ref(),
            self.options.case_transform(),
            self.options.env_policy,
        );
    }

    /// Load and validate everything needed to render.
    pub fn prepare(
        &self,
        template_location: &str,
        values_location: &str,
    ) -> Result<Prepared, RenderError> {
        let template = self.load_template(template_location)?;
        let namespace = self.load_namespace(values_location)?;
        Ok(Prepared { template, namespace })
    }

    /// [`Renderer::prepare`] then render into `out`.
    pub fn run(
        &self,
        template_location: &str,
        values_location: &str,
        out: impl Write,
    ) -> Result<(), RenderError> {
        self.prepare(template_location, values_location)?.render_to(out)
    }
}

impl std::fmt::Debug for Renderer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Renderer")
            .field("options", &self.options)
            .field("helpers", &self.helpers)
            .finish_non_exhaustive()
    }
}
