//! In-process stand-ins for the external tools.

use anyhow::Result;
use serde_json::Value;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use crate::resource::{GoModelNaming, ModelNaming};
use crate::schema::SchemaDocument;
use crate::tools::{ModelGenerator, TemplateRenderer};

#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    Generated {
        group: String,
        version: String,
        document: SchemaDocument,
        output_dir: PathBuf,
    },
    Rendered {
        template: PathBuf,
        context_name: String,
        payload: Value,
        output: PathBuf,
    },
}

/// Calls from both fakes in the order they happened.
#[derive(Debug, Clone, Default)]
pub struct EventLog {
    events: Arc<Mutex<Vec<Event>>>,
}

impl EventLog {
    pub fn push(&self, event: Event) {
        if let Ok(mut events) = self.events.lock() {
            events.push(event);
        }
    }

    #[must_use]
    pub fn events(&self) -> Vec<Event> {
        self.events.lock().map(|events| events.clone()).unwrap_or_default()
    }

    /// Every `Rendered` event.
    #[must_use]
    pub fn renders(&self) -> Vec<(PathBuf, String, Value, PathBuf)> {
        self.events()
            .into_iter()
            .filter_map(|event| match event {
                Event::Rendered {
                    template,
                    context_name,
                    payload,
                    output,
                } => Some((template, context_name, payload, output)),
                Event::Generated {
                    ..
                } => None,
            })
            .collect()
    }

    /// (group, version) of every `Generated` event.
    #[must_use]
    pub fn generated(&self) -> Vec<(String, String)> {
        self.events()
            .into_iter()
            .filter_map(|event| match event {
                Event::Generated {
                    group,
                    version,
                    ..
                } => Some((group, version)),
                Event::Rendered {
                    ..
                } => None,
            })
            .collect()
    }
}

/// Writes a model file for every schema with properties, like openapi-generator,
/// and skips empty ones.
#[derive(Debug, Clone, Default)]
pub struct FakeGenerator {
    log: EventLog,
}

impl FakeGenerator {
    #[must_use]
    pub const fn new(log: EventLog) -> Self {
        Self {
            log,
        }
    }
}

impl ModelGenerator for FakeGenerator {
    async fn generate(
        &self,
        group: &str,
        version: &str,
        document: &SchemaDocument,
        output_dir: &Path,
    ) -> Result<()> {
        for (kind, entry) in document.schemas() {
            if !entry.properties().is_empty() {
                let file = GoModelNaming.model_file_name(kind)?;
                tokio::fs::write(output_dir.join(file), format!("package {version}\n")).await?;
            }
        }
        self.log.push(Event::Generated {
            group: group.to_string(),
            version: version.to_string(),
            document: document.clone(),
            output_dir: output_dir.to_path_buf(),
        });
        Ok(())
    }
}

/// Records every call and writes nothing.
#[derive(Debug, Clone, Default)]
pub struct RecordingRenderer {
    log: EventLog,
}

impl RecordingRenderer {
    #[must_use]
    pub const fn new(log: EventLog) -> Self {
        Self {
            log,
        }
    }
}

impl TemplateRenderer for RecordingRenderer {
    async fn render(
        &self,
        template: &Path,
        context_name: &str,
        payload: &Value,
        output: &Path,
    ) -> Result<()> {
        self.log.push(Event::Rendered {
            template: template.to_path_buf(),
            context_name: context_name.to_string(),
            payload: payload.clone(),
            output: output.to_path_buf(),
        });
        Ok(())
    }
}
