//! Generator configuration.
//!
//! Values are layered CLI flags > environment > optional TOML file > defaults.
//! The CLI does the layering; everything below it receives one resolved
//! [`GeneratorConfig`].
//!
//! ```toml
//! duplicate_kinds = "overwrite"
//!
//! [templates]
//! resources = "templates/resources.tmpl"
//! clients = "templates/clients.tmpl"
//! set = "templates/set.tmpl"
//! extension = "go"
//!
//! [generator]
//! program = "openapi-generator-cli"
//! language = "go"
//! skip_groups = ["api"]
//!
//! [renderer]
//! backend = "tera"
//! program = "gomplate"
//! ```

use anyhow::{Context, Result};
use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use tokio::fs;

use crate::classify::DuplicateKindPolicy;
use crate::constants::{CLIENTS_DIR, MODELS_DIR, SET_FILE_STEM};
use crate::core::GenError;
use crate::tools::RendererBackend;

/// URL scheme of the API server. Anything but `http` means TLS.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Protocol {
    Http,
    Https,
}

impl fmt::Display for Protocol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Http => write!(f, "http"),
            Self::Https => write!(f, "https"),
        }
    }
}

/// The API server to read the document from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceConfig {
    pub protocol: Protocol,
    pub host: String,
    pub port: u16,
}

impl SourceConfig {
    #[must_use]
    pub fn base_url(&self) -> String {
        format!("{}://{}:{}", self.protocol, self.host, self.port)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TemplateConfig {
    pub resources: PathBuf,
    pub clients: PathBuf,
    pub set: PathBuf,
    /// Extension of every rendered artifact.
    pub extension: String,
}

impl Default for TemplateConfig {
    fn default() -> Self {
        Self {
            resources: PathBuf::from("resources.tmpl"),
            clients: PathBuf::from("clients.tmpl"),
            set: PathBuf::from("set.tmpl"),
            extension: "go".to_string(),
        }
    }
}

impl TemplateConfig {
    /// `<Kind>.<extension>`
    #[must_use]
    pub fn artifact_name(&self, kind: &str) -> String {
        format!("{kind}.{}", self.extension)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GeneratorToolConfig {
    pub program: String,
    /// openapi-generator `-g` value.
    pub language: String,
    /// Sub-resource groups never handed to the generator.
    pub skip_groups: Vec<String>,
    /// Per-bucket limit in seconds; unset means wait indefinitely.
    pub timeout_secs: Option<u64>,
}

impl Default for GeneratorToolConfig {
    fn default() -> Self {
        Self {
            program: "openapi-generator-cli".to_string(),
            language: "go".to_string(),
            // hand-maintained common types
            skip_groups: vec!["api".to_string()],
            timeout_secs: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RendererConfig {
    pub backend: RendererBackend,
    /// Only used by the gomplate back-end.
    pub program: String,
}

impl Default for RendererConfig {
    fn default() -> Self {
        Self {
            backend: RendererBackend::Tera,
            program: "gomplate".to_string(),
        }
    }
}

/// Everything the pipeline needs besides the document itself.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GeneratorConfig {
    /// Base of `models/` and `clients/`. Always comes from the CLI or `OUTDIR`.
    #[serde(skip)]
    pub output_root: PathBuf,

    pub templates: TemplateConfig,

    pub generator: GeneratorToolConfig,

    pub renderer: RendererConfig,

    pub duplicate_kinds: DuplicateKindPolicy,

    /// Write `sub-resources.json` and `main-resources.json` next to the outputs.
    pub dump_partitions: bool,
}

impl GeneratorConfig {
    /// Defaults rooted at `output_root`.
    pub fn new(output_root: impl Into<PathBuf>) -> Self {
        Self {
            output_root: output_root.into(),
            ..Self::default()
        }
    }

    /// Read a TOML file. `output_root` is left empty for the caller to set.
    pub async fn load_from(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .await
            .with_context(|| format!("Failed to read config from {}", path.display()))?;

        toml::from_str(&content)
            .with_context(|| format!("Failed to parse config from {}", path.display()))
    }

    /// Like [`Self::load_from`], but `None` yields the defaults.
    pub async fn load_with_optional(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::load_from(path).await,
            None => Ok(Self::default()),
        }
    }

    /// Reject values that would only fail halfway through a run.
    pub fn validate(&self) -> Result<()> {
        let fail = |message: String| -> Result<()> {
            Err(GenError::ConfigError {
                message,
            }
            .into())
        };

        if self.output_root.as_os_str().is_empty() {
            return fail("output root is not set (pass --output-root or set OUTDIR)".to_string());
        }
        if self.templates.extension.is_empty() || self.templates.extension.contains('/') {
            return fail(format!("invalid artifact extension '{}'", self.templates.extension));
        }
        if self.generator.program.trim().is_empty() {
            return fail("generator program is empty".to_string());
        }
        if self.renderer.backend == RendererBackend::Gomplate
            && self.renderer.program.trim().is_empty()
        {
            return fail("renderer program is empty".to_string());
        }
        Ok(())
    }

    #[must_use]
    pub fn models_root(&self) -> PathBuf {
        self.output_root.join(MODELS_DIR)
    }

    #[must_use]
    pub fn clients_root(&self) -> PathBuf {
        self.output_root.join(CLIENTS_DIR)
    }

    /// `<output>/clients/set.<extension>`
    #[must_use]
    pub fn set_output(&self) -> PathBuf {
        self.clients_root().join(format!("{SET_FILE_STEM}.{}", self.templates.extension))
    }

    #[must_use]
    pub fn skips_group(&self, group: &str) -> bool {
        self.generator.skip_groups.iter().any(|g| g == group)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_defaults() {
        let config = GeneratorConfig::new("/out");
        assert_eq!(config.templates.resources, PathBuf::from("resources.tmpl"));
        assert_eq!(config.templates.extension, "go");
        assert_eq!(config.generator.program, "openapi-generator-cli");
        assert!(config.skips_group("api"));
        assert!(!config.skips_group("management"));
        assert_eq!(config.renderer.backend, RendererBackend::Tera);
        assert_eq!(config.duplicate_kinds, DuplicateKindPolicy::Overwrite);
        assert!(!config.dump_partitions);
        config.validate().unwrap();
    }

    #[test]
    fn test_output_layout() {
        let config = GeneratorConfig::new("/out");
        assert_eq!(config.models_root(), PathBuf::from("/out/models"));
        assert_eq!(config.clients_root(), PathBuf::from("/out/clients"));
        assert_eq!(config.set_output(), PathBuf::from("/out/clients/set.go"));
        assert_eq!(config.templates.artifact_name("Environment"), "Environment.go");
    }

    #[test]
    fn test_base_url() {
        let source = SourceConfig {
            protocol: Protocol::Http,
            host: "localhost".to_string(),
            port: 8080,
        };
        assert_eq!(source.base_url(), "http://localhost:8080");
    }

    #[tokio::test]
    async fn test_load_partial_file_keeps_other_defaults() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("apiserver-gen.toml");
        std::fs::write(
            &path,
            r#"
duplicate_kinds = "reject"

[generator]
skip_groups = []
timeout_secs = 600

[renderer]
backend = "gomplate"
"#,
        )
        .unwrap();

        let config = GeneratorConfig::load_from(&path).await.unwrap();
        assert_eq!(config.duplicate_kinds, DuplicateKindPolicy::Reject);
        assert!(config.generator.skip_groups.is_empty());
        assert_eq!(config.generator.timeout_secs, Some(600));
        assert_eq!(config.generator.language, "go");
        assert_eq!(config.renderer.backend, RendererBackend::Gomplate);
        assert_eq!(config.renderer.program, "gomplate");
        assert_eq!(config.templates, TemplateConfig::default());
        assert!(config.output_root.as_os_str().is_empty());
    }

    #[tokio::test]
    async fn test_unknown_key_is_rejected() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("bad.toml");
        std::fs::write(&path, "[templates]\nresource = \"x.tmpl\"\n").unwrap();

        let err = GeneratorConfig::load_from(&path).await.unwrap_err();
        assert!(err.to_string().contains("Failed to parse config"));
    }

    #[tokio::test]
    async fn test_load_with_optional() {
        assert_eq!(
            GeneratorConfig::load_with_optional(None).await.unwrap(),
            GeneratorConfig::default()
        );
        assert!(
            GeneratorConfig::load_with_optional(Some(Path::new("/nonexistent/x.toml")))
                .await
                .is_err()
        );
    }

    #[test]
    fn test_validate() {
        let err = GeneratorConfig::default().validate().unwrap_err();
        assert!(matches!(err.downcast_ref::<GenError>(), Some(GenError::ConfigError { .. })));

        let mut config = GeneratorConfig::new("/out");
        config.templates.extension = String::new();
        assert!(config.validate().is_err());

        let mut config = GeneratorConfig::new("/out");
        config.renderer.backend = RendererBackend::Gomplate;
        config.renderer.program = " ".to_string();
        assert!(config.validate().is_err());
    }
}
