//! The generation run, from a parsed document to files on disk.
//!
//! A run has two phases separated by a barrier:
//!
//! 1. every sub-resource (group, version) bucket goes through the
//!    [`ModelGenerator`], which writes the sub-type models;
//! 2. every main resource is projected against those models, turned into a
//!    [`ResourceDescriptor`] and rendered into a model and a client artifact.
//!
//! Phase 2 decides `fields` by probing the files phase 1 wrote, so it must not
//! start before phase 1 returned for every bucket. Both phases await one step
//! at a time; the first failure aborts the run.

use anyhow::{Context, Result};
use serde::Serialize;
use std::path::Path;

use crate::classify::{Partition, ResourceBuckets, classify};
use crate::config::GeneratorConfig;
use crate::constants::{MAIN_RESOURCES_DUMP, RESOURCE_CONTEXT, SET_CONTEXT, SUB_RESOURCES_DUMP};
use crate::resource::{
    FieldProjector, GoModelNaming, ModelNaming, ResourceDescriptor, ResourceSet,
    build_resource_set,
};
use crate::schema::SchemaDocument;
use crate::tools::{ModelGenerator, TemplateRenderer};
use crate::utils::{ensure_dir, write_json_pretty};

/// What a run produced.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct GenerationSummary {
    /// Sub-resource buckets handed to the model generator.
    pub generated_buckets: usize,
    /// Sub-resource groups left out by configuration and actually present.
    pub skipped_groups: Vec<String>,
    /// Rendered resource model artifacts.
    pub models: usize,
    /// Rendered client artifacts, not counting the set.
    pub clients: usize,
    /// Kinds listed in the client set.
    pub set_kinds: usize,
}

/// One configured generation run.
pub struct Pipeline<G, R> {
    config: GeneratorConfig,
    generator: G,
    renderer: R,
    naming: Box<dyn ModelNaming>,
}

impl<G, R> Pipeline<G, R>
where
    G: ModelGenerator,
    R: TemplateRenderer,
{
    /// Uses openapi-generator's Go file naming for the model probe.
    pub fn new(config: GeneratorConfig, generator: G, renderer: R) -> Self {
        Self {
            config,
            generator,
            renderer,
            naming: Box::new(GoModelNaming),
        }
    }

    /// Replace the naming used to find generated models.
    #[must_use]
    pub fn with_naming(mut self, naming: Box<dyn ModelNaming>) -> Self {
        self.naming = naming;
        self
    }

    /// Generate everything for `document`.
    pub async fn run(&self, document: &SchemaDocument) -> Result<GenerationSummary> {
        let mut partition = classify(document, self.config.duplicate_kinds)?;
        tracing::info!(
            "Classified {} entries: {} main in {} buckets, {} sub in {} buckets",
            document.schemas().len(),
            partition.main.entry_count(),
            partition.main.bucket_count(),
            partition.sub.entry_count(),
            partition.sub.bucket_count()
        );

        if self.config.dump_partitions {
            self.dump_partitions(&partition)?;
        }

        let mut summary = GenerationSummary {
            skipped_groups: self.drop_skipped_groups(&mut partition.sub),
            ..GenerationSummary::default()
        };

        summary.generated_buckets = self.generate_models(&partition.sub).await?;

        // Barrier: every sub-type model is on disk from here on.
        tracing::debug!("Model generation finished for {} buckets", summary.generated_buckets);

        let rendered = self.render_resources(&partition.main).await?;
        summary.models = rendered;
        summary.clients = rendered;

        summary.set_kinds = self.render_set(&partition.main).await?.kind_count();

        tracing::info!(
            "Generated {} model buckets, {} resource models, {} clients, {} kinds in client set",
            summary.generated_buckets,
            summary.models,
            summary.clients,
            summary.set_kinds
        );
        Ok(summary)
    }

    fn dump_partitions(&self, partition: &Partition) -> Result<()> {
        let root = &self.config.output_root;
        ensure_dir(root)?;
        write_json_pretty(&root.join(SUB_RESOURCES_DUMP), &partition.sub)?;
        write_json_pretty(&root.join(MAIN_RESOURCES_DUMP), &partition.main)?;
        tracing::info!("Wrote partition dumps to {}", root.display());
        Ok(())
    }

    fn drop_skipped_groups(&self, sub: &mut ResourceBuckets) -> Vec<String> {
        let skipped: Vec<String> = sub
            .groups()
            .filter(|group| self.config.skips_group(group))
            .map(str::to_string)
            .collect();

        for group in &skipped {
            tracing::debug!("Skipping sub-resource group {}", group);
            sub.remove_group(group);
        }
        skipped
    }

    /// Phase 1.
    async fn generate_models(&self, sub: &ResourceBuckets) -> Result<usize> {
        let models_root = self.config.models_root();
        let mut count = 0;

        for (group, version, document) in sub.iter() {
            let output_dir = models_root.join(group).join(version);
            ensure_dir(&output_dir)?;

            tracing::info!(
                "Generating {} models for {}/{} into {}",
                document.schemas().len(),
                group,
                version,
                output_dir.display()
            );
            self.generator
                .generate(group, version, document, &output_dir)
                .await
                .with_context(|| format!("Failed to generate models for {group}/{version}"))?;
            count += 1;
        }

        Ok(count)
    }

    /// Phase 2. Returns the number of resources rendered.
    async fn render_resources(&self, main: &ResourceBuckets) -> Result<usize> {
        let projector = FieldProjector::new(self.config.models_root(), &*self.naming);
        let mut count = 0;

        for (group, version, document) in main.iter() {
            for (kind, entry) in document.schemas() {
                let entry_name = format!("{group}.{version}.{kind}");

                let fields = projector
                    .resolve(&entry.properties())
                    .await
                    .with_context(|| format!("Failed to resolve fields of {entry_name}"))?;
                let descriptor = ResourceDescriptor::new(entry, fields);
                self.render_resource(&entry_name, &descriptor).await?;
                count += 1;
            }
        }

        Ok(count)
    }

    async fn render_resource(&self, entry_name: &str, descriptor: &ResourceDescriptor) -> Result<()> {
        let coordinates = descriptor.coordinates(entry_name)?;
        let payload = serde_json::to_value(descriptor)?;
        let artifact = self.config.templates.artifact_name(&coordinates.kind);

        let model_dir = self.config.models_root().join(&coordinates.group).join(&coordinates.version);
        let client_dir =
            self.config.clients_root().join(&coordinates.group).join(&coordinates.version);
        ensure_dir(&model_dir)?;
        ensure_dir(&client_dir)?;

        self.render(&self.config.templates.resources, RESOURCE_CONTEXT, &payload, &model_dir.join(&artifact))
            .await?;
        self.render(&self.config.templates.clients, RESOURCE_CONTEXT, &payload, &client_dir.join(&artifact))
            .await
    }

    async fn render_set(&self, main: &ResourceBuckets) -> Result<ResourceSet> {
        let set = build_resource_set(main);
        let payload = serde_json::to_value(&set)?;
        self.render(&self.config.templates.set, SET_CONTEXT, &payload, &self.config.set_output())
            .await?;
        Ok(set)
    }

    async fn render(
        &self,
        template: &Path,
        context_name: &str,
        payload: &serde_json::Value,
        output: &Path,
    ) -> Result<()> {
        self.renderer
            .render(template, context_name, payload, output)
            .await
            .with_context(|| format!("Failed to render {}", output.display()))?;
        tracing::info!("Created {}", output.display());
        Ok(())
    }
}
