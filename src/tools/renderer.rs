//! Template rendering back-ends.
//!
//! Templates receive their payload under a single context name (`res` for a
//! resource descriptor, `input` for the resource set). Two back-ends exist:
//!
//! - [`TeraRenderer`] renders in-process with Tera; a fresh instance is built
//!   per render so filters never share state.
//! - [`GomplateRenderer`] shells out to `gomplate` with the payload on stdin.

use anyhow::{Context as _, Result};
use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use std::future::Future;
use std::path::Path;
use tera::{Context, Tera};

use super::command::ToolCommand;
use crate::core::GenError;
use crate::utils::atomic_write;

/// Renders `template` with `payload` bound as `context_name` into `output`.
pub trait TemplateRenderer: Send + Sync {
    fn render(
        &self,
        template: &Path,
        context_name: &str,
        payload: &Value,
        output: &Path,
    ) -> impl Future<Output = Result<()>> + Send;
}

/// Which back-end to use, selectable from the CLI and the config file.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum RendererBackend {
    #[default]
    Tera,
    Gomplate,
}

impl std::fmt::Display for RendererBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Tera => write!(f, "tera"),
            Self::Gomplate => write!(f, "gomplate"),
        }
    }
}

/// `upper_first`: `"environment"` → `"Environment"`.
pub fn upper_first(value: &Value, _args: &HashMap<String, Value>) -> tera::Result<Value> {
    let s = tera::try_get_value!("upper_first", "value", String, value);
    let mut chars = s.chars();
    let out = match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    };
    Ok(Value::String(out))
}

/// Flatten a Tera error and its sources into one line.
fn format_tera_error(error: &tera::Error) -> String {
    let mut message = error.to_string();
    let mut source = std::error::Error::source(error);
    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }
    message
}

#[derive(Debug, Clone, Copy, Default)]
pub struct TeraRenderer;

impl TeraRenderer {
    /// Render `source` to a string. Split out so tests need no files.
    pub fn render_str(
        &self,
        template_name: &str,
        source: &str,
        context_name: &str,
        payload: &Value,
    ) -> Result<String> {
        let mut tera = Tera::default();
        // Generated code, not HTML.
        tera.autoescape_on(vec![]);
        tera.register_filter("upper_first", upper_first);

        let mut context = Context::new();
        context.insert(context_name, payload);

        tera.render_str(source, &context).map_err(|e| {
            GenError::TemplateError {
                template: template_name.to_string(),
                reason: format_tera_error(&e),
            }
            .into()
        })
    }
}

impl TemplateRenderer for TeraRenderer {
    async fn render(
        &self,
        template: &Path,
        context_name: &str,
        payload: &Value,
        output: &Path,
    ) -> Result<()> {
        let source = tokio::fs::read_to_string(template)
            .await
            .with_context(|| format!("Failed to read template: {}", template.display()))?;

        tracing::debug!(target: "render", "Rendering {} into {}", template.display(), output.display());
        let rendered =
            self.render_str(&template.display().to_string(), &source, context_name, payload)?;
        atomic_write(output, rendered.as_bytes())
    }
}

/// `gomplate --context <name>=stdin:?type=application/json -f <template> --out <output>`.
#[derive(Debug, Clone)]
pub struct GomplateRenderer {
    program: String,
}

impl GomplateRenderer {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }

    fn command(&self, template: &Path, context_name: &str, output: &Path) -> ToolCommand {
        ToolCommand::new(&self.program).args([
            "--context".to_string(),
            format!("{context_name}=stdin:?type=application/json"),
            "-f".to_string(),
            template.display().to_string(),
            "--out".to_string(),
            output.display().to_string(),
        ])
    }
}

impl Default for GomplateRenderer {
    fn default() -> Self {
        Self::new("gomplate")
    }
}

impl TemplateRenderer for GomplateRenderer {
    async fn render(
        &self,
        template: &Path,
        context_name: &str,
        payload: &Value,
        output: &Path,
    ) -> Result<()> {
        let input = serde_json::to_vec(payload)?;
        self.command(template, context_name, output)
            .stdin(input)
            .with_context(format!("render {}", output.display()))
            .execute_success()
            .await
    }
}

/// The back-end chosen at runtime.
#[derive(Debug, Clone)]
pub enum Renderer {
    Tera(TeraRenderer),
    Gomplate(GomplateRenderer),
}

impl Renderer {
    #[must_use]
    pub fn from_backend(backend: RendererBackend, program: &str) -> Self {
        match backend {
            RendererBackend::Tera => Self::Tera(TeraRenderer),
            RendererBackend::Gomplate => Self::Gomplate(GomplateRenderer::new(program)),
        }
    }
}

impl TemplateRenderer for Renderer {
    async fn render(
        &self,
        template: &Path,
        context_name: &str,
        payload: &Value,
        output: &Path,
    ) -> Result<()> {
        match self {
            Self::Tera(renderer) => renderer.render(template, context_name, payload, output).await,
            Self::Gomplate(renderer) => {
                renderer.render(template, context_name, payload, output).await
            }
        }
    }
}
