//! In-memory model of the API server's OpenAPI document.
//!
//! Only the parts the generator looks at are typed: the `openapi` version and
//! `components.schemas`. Each schema entry keeps its raw JSON (see
//! [`SchemaEntry`]) so that the synthetic per-(group, version) documents handed
//! to the model generator carry the entries exactly as the server sent them.
//!
//! Key order matters for reproducible output, so schemas are stored in an
//! [`IndexMap`] and `serde_json` is built with `preserve_order`.

mod entry;
mod name;

pub use entry::{ResourceExtensions, SchemaEntry, is_truthy};
pub use name::{QualifiedName, field_reference};

use anyhow::Result;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::constants::{SYNTHETIC_TITLE, SYNTHETIC_VERSION};
use crate::core::GenError;

/// An OpenAPI-shaped document: the fetched source, or one synthetic bucket.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SchemaDocument {
    pub openapi: String,

    #[serde(default)]
    pub paths: Map<String, Value>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub info: Option<Info>,

    pub components: Components,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Info {
    pub title: String,
    pub version: String,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Components {
    pub schemas: IndexMap<String, SchemaEntry>,
}

impl SchemaDocument {
    /// Parse a document body.
    ///
    /// Any shape mismatch is reported as [`GenError::MalformedDocument`].
    pub fn from_slice(body: &[u8]) -> Result<Self> {
        serde_json::from_slice(body).map_err(|e| {
            GenError::MalformedDocument {
                reason: e.to_string(),
            }
            .into()
        })
    }

    /// Build a synthetic document holding only a schema mapping.
    #[must_use]
    pub fn synthetic(openapi: impl Into<String>, schemas: IndexMap<String, SchemaEntry>) -> Self {
        Self {
            openapi: openapi.into(),
            paths: Map::new(),
            info: Some(Info {
                title: SYNTHETIC_TITLE.to_string(),
                version: SYNTHETIC_VERSION.to_string(),
            }),
            components: Components {
                schemas,
            },
        }
    }

    #[must_use]
    pub const fn schemas(&self) -> &IndexMap<String, SchemaEntry> {
        &self.components.schemas
    }

    pub fn schemas_mut(&mut self) -> &mut IndexMap<String, SchemaEntry> {
        &mut self.components.schemas
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_keeps_schema_order() {
        let body = json!({
            "openapi": "3.0.2",
            "paths": { "/apis": {} },
            "components": {
                "schemas": {
                    "management.v1alpha1.Zeta": { "type": "object" },
                    "management.v1alpha1.Alpha": { "type": "object" },
                    "catalog.v1alpha1.Middle": { "type": "object" }
                }
            }
        })
        .to_string();

        let doc = SchemaDocument::from_slice(body.as_bytes()).unwrap();
        let keys: Vec<&str> = doc.schemas().keys().map(String::as_str).collect();
        assert_eq!(
            keys,
            ["management.v1alpha1.Zeta", "management.v1alpha1.Alpha", "catalog.v1alpha1.Middle"]
        );
    }

    #[test]
    fn test_missing_components_is_malformed() {
        let err = SchemaDocument::from_slice(br#"{"openapi": "3.0.2"}"#).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<GenError>(),
            Some(GenError::MalformedDocument { .. })
        ));
    }

    #[test]
    fn test_non_json_is_malformed() {
        let err = SchemaDocument::from_slice(b"<html>oops</html>").unwrap_err();
        assert!(matches!(
            err.downcast_ref::<GenError>(),
            Some(GenError::MalformedDocument { .. })
        ));
    }

    #[test]
    fn test_synthetic_document_shape() {
        let mut schemas = IndexMap::new();
        schemas.insert(
            "APIServiceSpec".to_string(),
            serde_json::from_value::<SchemaEntry>(json!({"type": "object"})).unwrap(),
        );
        let doc = SchemaDocument::synthetic("3.0.2", schemas);

        let value = serde_json::to_value(&doc).unwrap();
        assert_eq!(
            value,
            json!({
                "openapi": "3.0.2",
                "paths": {},
                "info": { "title": "API Server specification.", "version": "SNAPSHOT" },
                "components": { "schemas": { "APIServiceSpec": { "type": "object" } } }
            })
        );
    }
}
