//! Template rendering for stemplate.
//! Each source file is parsed as one independent MiniJinja template named
//! after the file, with the helper functions registered.
use crate::dictionary::Dictionary;
use crate::error::{Error, Result};
use crate::functions::register_functions;
use minijinja::Environment;
use std::io::Write;
use std::sync::Arc;

/// Trait for template rendering engines.
pub trait TemplateRenderer {
    /// Renders a template and streams the result into `out`.
    ///
    /// # Arguments
    /// * `name` - Template name, used in error messages
    /// * `template` - Template source
    /// * `context` - Top-level substitution context
    /// * `out` - Destination of the rendered text
    fn render_to(
        &self,
        name: &str,
        template: &str,
        context: &Dictionary,
        out: &mut dyn Write,
    ) -> Result<()>;

    /// Renders a template into a string.
    fn render(&self, name: &str, template: &str, context: &Dictionary) -> Result<String> {
        let mut buffer = Vec::new();
        self.render_to(name, template, context, &mut buffer)?;
        String::from_utf8(buffer).map_err(|e| Error::IoError(std::io::Error::other(e)))
    }
}

/// MiniJinja-based template rendering engine.
pub struct MiniJinjaRenderer {
    /// MiniJinja environment with the helper functions registered
    env: Environment<'static>,
}

impl MiniJinjaRenderer {
    /// Creates a renderer whose `substitute` function reads `dictionary`.
    pub fn new(dictionary: Arc<Dictionary>) -> Self {
        let mut env = Environment::new();
        env.set_keep_trailing_newline(true);
        register_functions(&mut env, dictionary);
        Self { env }
    }
}

impl TemplateRenderer for MiniJinjaRenderer {
    /// Renders a template using MiniJinja.
    ///
    /// # Errors
    /// * `Error::MinijinjaError` if:
    ///   - the template does not parse
    ///   - rendering fails, including failures raised by helper functions
    ///   - writing to `out` fails
    fn render_to(
        &self,
        name: &str,
        template: &str,
        context: &Dictionary,
        out: &mut dyn Write,
    ) -> Result<()> {
        let mut env = self.env.clone();
        env.add_template_owned(name.to_string(), template.to_string())
            .map_err(Error::MinijinjaError)?;

        let tmpl = env.get_template(name).map_err(Error::MinijinjaError)?;

        tmpl.render_to_write(context, out).map(|_| ()).map_err(Error::MinijinjaError)
    }
}
