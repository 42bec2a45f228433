//! Resource-specific fields and the generated-model presence check.
//!
//! The model generator writes nothing for an empty schema (a `MeshSpec` with
//! no properties, say) and does not complain about it. The only reliable way
//! to know whether a referenced sub-type exists is to look for its file, so
//! every `$ref` field ends up as `true` (file present) or `false` (absent) and
//! the resource template leaves the absent ones out.

use anyhow::Result;
use indexmap::IndexMap;
use serde_json::{Map, Value};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::fs;

use super::naming::ModelNaming;
use crate::constants::COMMON_FIELDS;
use crate::core::GenError;
use crate::schema::{QualifiedName, field_reference};

/// Drop the fields every resource shares, keeping only resource-specific ones.
#[must_use]
pub fn project_fields(properties: &Map<String, Value>) -> Map<String, Value> {
    properties
        .iter()
        .filter(|(name, _)| !COMMON_FIELDS.contains(&name.as_str()))
        .map(|(name, schema)| (name.clone(), schema.clone()))
        .collect()
}

/// Resolves projected fields against the generated models tree.
pub struct FieldProjector<'a> {
    models_root: PathBuf,
    naming: &'a dyn ModelNaming,
}

impl<'a> FieldProjector<'a> {
    pub fn new(models_root: impl Into<PathBuf>, naming: &'a dyn ModelNaming) -> Self {
        Self {
            models_root: models_root.into(),
            naming,
        }
    }

    #[must_use]
    pub fn models_root(&self) -> &Path {
        &self.models_root
    }

    /// Where the model for `name` would have been generated.
    pub fn model_path(&self, name: &QualifiedName) -> Result<PathBuf> {
        Ok(self
            .models_root
            .join(&name.group)
            .join(&name.version)
            .join(self.naming.model_file_name(&name.kind)?))
    }

    /// Project `properties` and resolve every field to a presence flag.
    ///
    /// Only a top-level `$ref` is probed. Inline fields, including arrays of
    /// references and `allOf` wrappers, are always `true`.
    pub async fn resolve(&self, properties: &Map<String, Value>) -> Result<IndexMap<String, bool>> {
        let mut fields = IndexMap::new();

        for (field, schema) in project_fields(properties) {
            let present = match field_reference(&schema) {
                Some(reference) => {
                    let target = QualifiedName::from_reference(&field, reference)?;
                    self.probe(&target).await?
                }
                None => true,
            };
            tracing::debug!("Field {} resolved to {}", field, present);
            fields.insert(field, present);
        }

        Ok(fields)
    }

    /// `Ok(false)` only when the model file is not found; other IO errors fail.
    pub async fn probe(&self, target: &QualifiedName) -> Result<bool> {
        let path = self.model_path(target)?;
        match fs::metadata(&path).await {
            Ok(_) => Ok(true),
            Err(e) if e.kind() == ErrorKind::NotFound => {
                tracing::debug!("No generated model for {} at {}", target, path.display());
                Ok(false)
            }
            Err(e) => Err(GenError::ModelProbe {
                path: path.display().to_string(),
                reason: e.to_string(),
            }
            .into()),
        }
    }
}
