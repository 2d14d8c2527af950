//! Prompt template loading and rendering via `minijinja`.
//!
//! Templates are loaded from the filesystem (default: `templates/`
//! directory) so operators can tune Ava's persona and the schema
//! contract without recompiling. Copies of the shipped templates are
//! embedded at compile time and used as fallbacks when a file is
//! missing, so the binary runs from any working directory. The
//! rendered output becomes the engine's system instruction, fixed for
//! the whole session.

use minijinja::Environment;
use tracing::debug;

use crate::error::RunnerError;

/// Shipped system template, used when `system.j2` is not on disk.
const DEFAULT_SYSTEM: &str = include_str!("../templates/system.j2");

/// Shipped intro template, used when `intro.j2` is not on disk.
const DEFAULT_INTRO: &str = include_str!("../templates/intro.j2");

/// Manages prompt template loading and rendering.
///
/// Wraps a `minijinja` [`Environment`] with the session templates
/// pre-loaded. Templates can be edited on disk and will be picked up
/// on the next call to [`PromptEngine::new`].
pub struct PromptEngine {
    env: Environment<'static>,
}

impl PromptEngine {
    /// Create a new prompt engine loading templates from the given directory.
    ///
    /// Missing files fall back to the embedded defaults; only a
    /// malformed template is an error.
    ///
    /// # Errors
    ///
    /// Returns [`RunnerError::Template`] if a template does not compile.
    pub fn new(templates_dir: &str) -> Result<Self, RunnerError> {
        let mut env = Environment::new();

        let system_tpl = load_template(templates_dir, "system.j2", DEFAULT_SYSTEM);
        let intro_tpl = load_template(templates_dir, "intro.j2", DEFAULT_INTRO);

        env.add_template_owned("system", system_tpl)
            .map_err(|e| RunnerError::Template(format!("failed to add system template: {e}")))?;
        env.add_template_owned("intro", intro_tpl)
            .map_err(|e| RunnerError::Template(format!("failed to add intro template: {e}")))?;

        Ok(Self { env })
    }

    /// Render the session's system instruction.
    ///
    /// The context carries the variant (`mode`), grid dimensions, the
    /// human flag, and Ava's starting identity.
    ///
    /// # Errors
    ///
    /// Returns [`RunnerError::Template`] if rendering fails.
    pub fn system_prompt(&self, context: &serde_json::Value) -> Result<String, RunnerError> {
        let system = self
            .env
            .get_template("system")
            .map_err(|e| RunnerError::Template(format!("missing system template: {e}")))?
            .render(context)
            .map_err(|e| RunnerError::Template(format!("system render failed: {e}")))?;

        let intro = self
            .env
            .get_template("intro")
            .map_err(|e| RunnerError::Template(format!("missing intro template: {e}")))?
            .render(context)
            .map_err(|e| RunnerError::Template(format!("intro render failed: {e}")))?;

        Ok(format!("{system}\n\n{intro}"))
    }
}

/// Read a template file from disk, falling back to the embedded copy.
fn load_template(dir: &str, filename: &str, fallback: &str) -> String {
    let path = format!("{dir}/{filename}");
    std::fs::read_to_string(&path).unwrap_or_else(|e| {
        debug!(path, error = %e, "template not on disk, using embedded default");
        fallback.to_owned()
    })
}
