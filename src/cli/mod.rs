//! Command-line interface for apiserver-gen.
//!
//! ```text
//! apiserver-gen <PROTOCOL> <HOST> <PORT> --output-root <DIR> [OPTIONS]
//! ```
//!
//! The three positionals locate the API server. `--output-root` (or `OUTDIR`)
//! is where `models/` and `clients/` are written. Everything else has a
//! default that an optional `--config` TOML file can change, and the flags
//! below override the file.
//!
//! # Examples
//!
//! ```bash
//! # Generate from a local server with the built-in Tera renderer
//! OUTDIR=./pkg/apic apiserver-gen http localhost 8080 --config apiserver-gen.toml
//!
//! # Fail on duplicate kinds, render with gomplate, keep the partition dumps
//! apiserver-gen https apicentral.axway.com 443 --output-root ./pkg/apic \
//!     --renderer gomplate --strict --dump-partitions
//! ```

use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

use crate::classify::DuplicateKindPolicy;
use crate::config::{GeneratorConfig, Protocol, SourceConfig};
use crate::pipeline::{GenerationSummary, Pipeline};
use crate::schema::SchemaDocument;
use crate::source::DocumentSource;
use crate::tools::{OpenApiGenerator, Renderer, RendererBackend};

#[derive(Parser, Debug)]
#[command(
    name = "apiserver-gen",
    about = "Generate models and clients from an API server's OpenAPI document",
    version,
    long_about = "Fetches the OpenAPI document served at /apis/docs, generates sub-resource models \
                  per group and version with an external model generator, then renders a model, \
                  a client and the aggregate client set for every main resource."
)]
pub struct Cli {
    /// Scheme of the API server.
    #[arg(value_enum)]
    protocol: Protocol,

    /// API server host name.
    host: String,

    /// API server port.
    port: u16,

    /// Directory receiving `models/` and `clients/`.
    #[arg(long, env = "OUTDIR", value_name = "DIR")]
    output_root: PathBuf,

    /// TOML file with template, generator and renderer settings.
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Template back-end, overriding the config file.
    #[arg(long, value_enum)]
    renderer: Option<RendererBackend>,

    /// Fail when two entries map to the same (group, version, kind).
    #[arg(long)]
    strict: bool,

    /// Write sub-resources.json and main-resources.json to the output root.
    #[arg(long)]
    dump_partitions: bool,

    /// Debug logging.
    #[arg(short, long, conflicts_with = "quiet")]
    verbose: bool,

    /// Errors only.
    #[arg(short, long)]
    quiet: bool,
}

impl Cli {
    pub async fn execute(self) -> Result<()> {
        self.init_logging();

        let source = self.source_config();
        let config = self.build_config().await?;
        config.validate()?;

        let document = DocumentSource::from_config(&source).fetch().await?;
        let summary = run_pipeline(config, &document).await?;
        tracing::debug!("Run summary: {:?}", summary);
        Ok(())
    }

    /// `-v`/`-q` win over `RUST_LOG`, which wins over `info`.
    fn log_filter(&self) -> EnvFilter {
        if self.verbose {
            EnvFilter::new("debug")
        } else if self.quiet {
            EnvFilter::new("error")
        } else {
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
        }
    }

    fn init_logging(&self) {
        // A subscriber may already be installed when embedded; keep it.
        let _ = tracing_subscriber::fmt()
            .with_env_filter(self.log_filter())
            .with_writer(std::io::stderr)
            .with_target(false)
            .try_init();
    }

    #[must_use]
    pub fn source_config(&self) -> SourceConfig {
        SourceConfig {
            protocol: self.protocol,
            host: self.host.clone(),
            port: self.port,
        }
    }

    /// Load the optional file and lay the flags over it.
    pub async fn build_config(&self) -> Result<GeneratorConfig> {
        let mut config = GeneratorConfig::load_with_optional(self.config.as_deref()).await?;

        config.output_root.clone_from(&self.output_root);
        if let Some(backend) = self.renderer {
            config.renderer.backend = backend;
        }
        if self.strict {
            config.duplicate_kinds = DuplicateKindPolicy::Reject;
        }
        if self.dump_partitions {
            config.dump_partitions = true;
        }

        Ok(config)
    }
}

/// Build the real generator and renderer from `config` and run.
pub async fn run_pipeline(
    config: GeneratorConfig,
    document: &SchemaDocument,
) -> Result<GenerationSummary> {
    let generator = OpenApiGenerator::new(&config.generator.program, &config.generator.language)
        .with_timeout(config.generator.timeout_secs.map(Duration::from_secs));
    let renderer = Renderer::from_backend(config.renderer.backend, &config.renderer.program);
    Pipeline::new(config, generator, renderer).run(document).await
}
