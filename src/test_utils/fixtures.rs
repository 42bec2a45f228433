//! Schema fixtures.

use serde_json::{Value, json};

use crate::schema::SchemaDocument;

/// A main-resource entry with all extension attributes set.
#[must_use]
pub fn main_entry(group: &str, version: &str, kind: &str, properties: Value) -> Value {
    json!({
        "type": "object",
        "x-axway-group": group,
        "x-axway-version": version,
        "x-axway-kind": kind,
        "x-axway-plural": format!("{}s", kind.to_lowercase()),
        "properties": properties
    })
}

/// Properties every main resource carries, plus `extra`.
#[must_use]
pub fn with_common_fields(extra: Value) -> Value {
    let mut properties = json!({
        "group": {"type": "string"},
        "apiVersion": {"type": "string"},
        "kind": {"type": "string"},
        "name": {"type": "string"},
        "title": {"type": "string"},
        "metadata": {"$ref": "#/components/schemas/api.v1.Metadata"},
        "attributes": {"type": "object"},
        "finalizers": {"type": "array"},
        "tags": {"type": "array"}
    });
    if let (Some(target), Some(extra)) = (properties.as_object_mut(), extra.as_object()) {
        target.extend(extra.clone());
    }
    properties
}

/// `{openapi: "3.0.2", components: {schemas}}`
#[must_use]
pub fn document(schemas: Value) -> SchemaDocument {
    serde_json::from_value(json!({
        "openapi": "3.0.2",
        "paths": {},
        "components": {"schemas": schemas}
    }))
    .unwrap()
}

/// Two management kinds, one catalog kind and their sub-types.
///
/// - `APIService.spec` refers to an empty `APIServiceSpec` (no model)
/// - `Environment.spec` refers to a populated `EnvironmentSpec`
/// - `Secret` is scoped to `Environment`
/// - `api.v1.Metadata` belongs to the hand-maintained `api` group
#[must_use]
pub fn sample_document() -> SchemaDocument {
    document(json!({
        "api.v1.Metadata": {
            "type": "object",
            "properties": {"id": {"type": "string"}}
        },
        "management.v1alpha1.APIService": main_entry(
            "management",
            "v1alpha1",
            "APIService",
            with_common_fields(json!({
                "spec": {"$ref": "#/components/schemas/management.v1alpha1.APIServiceSpec"}
            }))
        ),
        "management.v1alpha1.APIServiceSpec": {"type": "object"},
        "management.v1alpha1.Environment": main_entry(
            "management",
            "v1alpha1",
            "Environment",
            with_common_fields(json!({
                "spec": {"$ref": "#/components/schemas/management.v1alpha1.EnvironmentSpec"},
                "owner": {"type": "object"}
            }))
        ),
        "management.v1alpha1.EnvironmentSpec": {
            "type": "object",
            "properties": {"description": {"type": "string"}}
        },
        "management.v1alpha1.Secret": {
            "type": "object",
            "x-axway-group": "management",
            "x-axway-version": "v1alpha1",
            "x-axway-kind": "Secret",
            "x-axway-plural": "secrets",
            "x-axway-scoped": true,
            "x-axway-scopes": [{"kind": "Environment"}],
            "properties": with_common_fields(json!({
                "spec": {"$ref": "#/components/schemas/management.v1alpha1.SecretSpec"}
            }))
        },
        "management.v1alpha1.SecretSpec": {
            "type": "object",
            "properties": {"data": {"type": "object"}}
        },
        "catalog.v1alpha1.Asset": main_entry(
            "catalog",
            "v1alpha1",
            "Asset",
            with_common_fields(json!({
                "spec": {"$ref": "#/components/schemas/catalog.v1alpha1.AssetSpec"}
            }))
        ),
        "catalog.v1alpha1.AssetSpec": {
            "type": "object",
            "properties": {"type": {"type": "string"}}
        }
    }))
}
