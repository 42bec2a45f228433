//! Template payload for one main resource.

use anyhow::Result;
use indexmap::IndexMap;
use serde::Serialize;

use crate::core::GenError;
use crate::schema::{QualifiedName, SchemaEntry};

/// Flat view of a main resource, bound as `res` in the resource and client templates.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResourceDescriptor {
    pub group: Option<String>,
    pub kind: Option<String>,
    pub version: Option<String>,
    pub scoped: bool,
    /// First of the sorted scopes; the templates only handle one scope for now.
    pub scope: Option<String>,
    pub scopes: Option<Vec<String>>,
    /// Plural resource name.
    pub resource: Option<String>,
    /// Resource-specific field → whether its sub-type model exists.
    pub fields: IndexMap<String, bool>,
}

impl ResourceDescriptor {
    /// Build from the entry's extensions and its already-resolved fields.
    #[must_use]
    pub fn new(entry: &SchemaEntry, fields: IndexMap<String, bool>) -> Self {
        let ext = entry.extensions();

        let scopes = ext.scopes.map(|mut scopes| {
            scopes.sort();
            scopes
        });
        let scope = scopes.as_ref().and_then(|scopes| scopes.first().cloned());

        Self {
            group: ext.group,
            kind: ext.kind,
            version: ext.version,
            scoped: ext.scoped,
            scope,
            scopes,
            resource: ext.plural,
            fields,
        }
    }

    /// Group, version and kind, required to place the rendered artifacts.
    ///
    /// `entry_name` only feeds the error message.
    pub fn coordinates(&self, entry_name: &str) -> Result<QualifiedName> {
        let require = |value: &Option<String>, attribute: &str| {
            value.clone().ok_or_else(|| GenError::MalformedResource {
                name: entry_name.to_string(),
                attribute: attribute.to_string(),
            })
        };

        Ok(QualifiedName {
            group: require(&self.group, "group")?,
            version: require(&self.version, "version")?,
            kind: require(&self.kind, "kind")?,
        })
    }
}
