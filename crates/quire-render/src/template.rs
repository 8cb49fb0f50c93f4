//! Template engine interface and the default minijinja implementation.

use std::path::{Component, Path, PathBuf};
use std::sync::Arc;

use minijinja::{Environment, Value};

use crate::shortcode::Shortcodes;

/// Error returned by a template engine.
#[derive(Debug, thiserror::Error)]
pub enum TemplateError {
    /// Template file could not be read.
    #[error("Failed to read template: {0}")]
    Read(#[from] std::io::Error),
    /// Engine-specific failure.
    #[error("{0}")]
    Engine(Box<dyn std::error::Error + Send + Sync>),
}

/// Turns a template file plus locals into output text.
///
/// Implementations are shared across rendering threads. Locals are a
/// minijinja value; engines that need another data model can serialize it.
pub trait TemplateEngine: Send + Sync {
    /// Render `template` with `locals`.
    fn render(&self, template: &Path, locals: &Value) -> Result<String, TemplateError>;
}

impl<F> TemplateEngine for F
where
    F: Fn(&Path, &Value) -> Result<String, TemplateError> + Send + Sync,
{
    fn render(&self, template: &Path, locals: &Value) -> Result<String, TemplateError> {
        self(template, locals)
    }
}

/// Template engine backed by minijinja.
///
/// Templates are loaded by name from the templates directory, so `extends`
/// and `include` resolve against it. Extra functions ("addons") can be
/// registered through [`environment_mut`](Self::environment_mut).
#[derive(Debug)]
pub struct MiniJinjaEngine {
    env: Environment<'static>,
    templates_dir: PathBuf,
}

impl MiniJinjaEngine {
    /// Create an engine loading templates from `templates_dir`.
    pub fn new(templates_dir: impl Into<PathBuf>) -> Self {
        let templates_dir = templates_dir.into();
        let mut env = Environment::new();
        env.set_loader(minijinja::path_loader(&templates_dir));
        Self { env, templates_dir }
    }

    /// Expose `shortcodes(text)` to templates.
    #[must_use]
    pub fn with_shortcodes(mut self, shortcodes: Arc<Shortcodes>) -> Self {
        self.env.add_function("shortcodes", move |text: String| {
            Value::from_safe_string(shortcodes.expand(&text))
        });
        self
    }

    /// Expose `basepath(url)` to templates.
    #[must_use]
    pub fn with_basepath(mut self, base: impl Into<String>) -> Self {
        let base = base.into();
        self.env.add_function("basepath", move |url: Option<String>| {
            quire_site::naming::basepath(&base, url.as_deref().unwrap_or_default())
        });
        self
    }

    /// The underlying environment, for registering addon functions, filters
    /// and globals.
    pub fn environment_mut(&mut self) -> &mut Environment<'static> {
        &mut self.env
    }

    /// Loader name of a template file, if it lives under the templates
    /// directory.
    fn template_name(&self, template: &Path) -> Option<String> {
        let relative = template.strip_prefix(&self.templates_dir).ok()?;
        let segments: Option<Vec<_>> = relative
            .components()
            .map(|component| match component {
                Component::Normal(segment) => segment.to_str(),
                _ => None,
            })
            .collect();
        Some(segments?.join("/"))
    }
}

impl TemplateEngine for MiniJinjaEngine {
    fn render(&self, template: &Path, locals: &Value) -> Result<String, TemplateError> {
        let rendered = match self.template_name(template) {
            Some(name) => self
                .env
                .get_template(&name)
                .and_then(|tmpl| tmpl.render(locals)),
            None => {
                let source = std::fs::read_to_string(template)?;
                self.env.render_str(&source, locals)
            }
        };
        rendered.map_err(|e| TemplateError::Engine(Box::new(e)))
    }
}
