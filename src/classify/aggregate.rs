//! Group → version → synthetic document buckets.

use anyhow::Result;
use indexmap::IndexMap;
use indexmap::map::Entry;
use serde::{Deserialize, Serialize};

use crate::core::GenError;
use crate::schema::{QualifiedName, SchemaDocument, SchemaEntry};

/// What to do when two entries in one (group, version) share a kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DuplicateKindPolicy {
    /// Last write wins.
    #[default]
    Overwrite,
    /// Fail with [`GenError::DuplicateKind`].
    Reject,
}

/// Entries bucketed by group, then version, each bucket a synthetic document.
///
/// Groups and versions keep the order in which they were first seen.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
#[serde(transparent)]
pub struct ResourceBuckets {
    groups: IndexMap<String, IndexMap<String, SchemaDocument>>,
}

impl ResourceBuckets {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `entry` under `name.group / name.version` keyed by `name.kind`.
    pub fn insert(
        &mut self,
        openapi: &str,
        name: &QualifiedName,
        entry: SchemaEntry,
        policy: DuplicateKindPolicy,
    ) -> Result<()> {
        let versions = self.groups.entry(name.group.clone()).or_default();

        let document = match versions.entry(name.version.clone()) {
            Entry::Vacant(slot) => {
                let mut schemas = IndexMap::new();
                schemas.insert(name.kind.clone(), entry);
                slot.insert(SchemaDocument::synthetic(openapi, schemas));
                return Ok(());
            }
            Entry::Occupied(slot) => slot.into_mut(),
        };

        if document.schemas().contains_key(&name.kind) {
            match policy {
                DuplicateKindPolicy::Reject => {
                    return Err(GenError::DuplicateKind {
                        group: name.group.clone(),
                        version: name.version.clone(),
                        kind: name.kind.clone(),
                    }
                    .into());
                }
                DuplicateKindPolicy::Overwrite => {
                    tracing::warn!(
                        "Duplicate kind {} in {}/{}, keeping the last definition",
                        name.kind,
                        name.group,
                        name.version
                    );
                }
            }
        }

        // IndexMap::insert keeps the original slot of an existing key
        document.schemas_mut().insert(name.kind.clone(), entry);
        Ok(())
    }

    #[must_use]
    pub fn get(&self, group: &str, version: &str) -> Option<&SchemaDocument> {
        self.groups.get(group).and_then(|versions| versions.get(version))
    }

    /// Drop a whole group. Returns whether it was present.
    pub fn remove_group(&mut self, group: &str) -> bool {
        self.groups.shift_remove(group).is_some()
    }

    /// Every (group, version, document) in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str, &SchemaDocument)> {
        self.groups.iter().flat_map(|(group, versions)| {
            versions
                .iter()
                .map(move |(version, document)| (group.as_str(), version.as_str(), document))
        })
    }

    pub fn groups(&self) -> impl Iterator<Item = &str> {
        self.groups.keys().map(String::as_str)
    }

    /// Number of (group, version) buckets.
    #[must_use]
    pub fn bucket_count(&self) -> usize {
        self.groups.values().map(IndexMap::len).sum()
    }

    /// Number of entries across all buckets.
    #[must_use]
    pub fn entry_count(&self) -> usize {
        self.iter().map(|(_, _, document)| document.schemas().len()).sum()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }
}
