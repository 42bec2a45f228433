//! Sub-resource model generation.

use anyhow::{Context, Result};
use std::future::Future;
use std::path::Path;
use std::time::Duration;

use super::command::ToolCommand;
use crate::schema::SchemaDocument;

/// Turns one synthetic (group, version) document into model source files.
pub trait ModelGenerator: Send + Sync {
    /// Write models for `document` into `output_dir`.
    ///
    /// Must not return before every file is on disk; the resource phase probes
    /// for them right after.
    fn generate(
        &self,
        group: &str,
        version: &str,
        document: &SchemaDocument,
        output_dir: &Path,
    ) -> impl Future<Output = Result<()>> + Send;
}

/// `openapi-generator-cli generate`, fed the document on stdin.
#[derive(Debug, Clone)]
pub struct OpenApiGenerator {
    program: String,
    language: String,
    timeout: Option<Duration>,
}

impl OpenApiGenerator {
    pub fn new(program: impl Into<String>, language: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            language: language.into(),
            timeout: None,
        }
    }

    /// Kill the generator if one bucket takes longer than `timeout`.
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    fn command(&self, version: &str, output_dir: &Path) -> ToolCommand {
        ToolCommand::new(&self.program).with_timeout(self.timeout).args([
            "generate".to_string(),
            "-g".to_string(),
            self.language.clone(),
            "-i".to_string(),
            "/dev/stdin".to_string(),
            "--package-name".to_string(),
            version.to_string(),
            "--output".to_string(),
            output_dir.display().to_string(),
            "--global-property".to_string(),
            "modelDocs=false,models".to_string(),
        ])
    }
}

impl Default for OpenApiGenerator {
    fn default() -> Self {
        Self::new("openapi-generator-cli", "go")
    }
}

impl ModelGenerator for OpenApiGenerator {
    async fn generate(
        &self,
        group: &str,
        version: &str,
        document: &SchemaDocument,
        output_dir: &Path,
    ) -> Result<()> {
        let payload = serde_json::to_vec(document)
            .with_context(|| format!("Failed to serialize {group}/{version} document"))?;

        self.command(version, output_dir)
            .stdin(payload)
            .with_context(format!("generate {group}/{version}"))
            .execute_success()
            .await
    }
}
