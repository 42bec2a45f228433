//! Split the source document into main and sub resources.
//!
//! Classification looks at each entry on its own: a truthy `x-axway-group`
//! makes it a main resource, anything else is a sub resource. Both sides are
//! then bucketed by the `group.version.kind` of the schema key (see
//! [`ResourceBuckets`]).

pub mod aggregate;

pub use aggregate::{DuplicateKindPolicy, ResourceBuckets};

use anyhow::{Context, Result};
use serde::Serialize;

use crate::schema::{QualifiedName, SchemaDocument};

/// The two halves of a classified document.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct Partition {
    /// Dependent types, handed to the model generator per (group, version).
    pub sub: ResourceBuckets,
    /// Top-level resource kinds, rendered through the resource templates.
    pub main: ResourceBuckets,
}

/// Classify every schema entry of `document` into exactly one side of a [`Partition`].
pub fn classify(document: &SchemaDocument, policy: DuplicateKindPolicy) -> Result<Partition> {
    let mut partition = Partition::default();

    for (key, entry) in document.schemas() {
        let name = QualifiedName::parse(key)?;
        let main = entry.is_main_resource();
        tracing::debug!("Classified {} as {} resource", key, if main { "main" } else { "sub" });

        let target = if main {
            &mut partition.main
        } else {
            &mut partition.sub
        };
        target
            .insert(&document.openapi, &name, entry.clone(), policy)
            .with_context(|| format!("Failed to group schema entry {key}"))?;
    }

    Ok(partition)
}
