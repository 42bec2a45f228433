//! `group.version.kind` names and `$ref` parsing.

use anyhow::Result;
use serde_json::Value;
use std::fmt;

use crate::core::GenError;

/// The three-part coordinate of a schema entry.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct QualifiedName {
    pub group: String,
    pub version: String,
    pub kind: String,
}

impl QualifiedName {
    /// Split a schema key such as `management.v1alpha1.APIService`.
    ///
    /// Segments past the third are ignored. Fewer than three non-empty
    /// segments is an [`GenError::InvalidSchemaName`].
    pub fn parse(name: &str) -> Result<Self> {
        let mut parts = name.split('.');
        match (parts.next(), parts.next(), parts.next()) {
            (Some(group), Some(version), Some(kind))
                if !group.is_empty() && !version.is_empty() && !kind.is_empty() =>
            {
                Ok(Self {
                    group: group.to_string(),
                    version: version.to_string(),
                    kind: kind.to_string(),
                })
            }
            _ => Err(GenError::InvalidSchemaName {
                name: name.to_string(),
            }
            .into()),
        }
    }

    /// Resolve a `#/components/schemas/<group>.<version>.<kind>` reference.
    pub fn from_reference(field: &str, reference: &str) -> Result<Self> {
        let invalid = || GenError::InvalidReference {
            field: field.to_string(),
            reference: reference.to_string(),
        };

        // "#", "components", "schemas", "<gvk>"
        let target = reference.split('/').nth(3).ok_or_else(invalid)?;
        Self::parse(target).map_err(|_| invalid().into())
    }
}

impl fmt::Display for QualifiedName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.group, self.version, self.kind)
    }
}

/// The `$ref` of a field schema, if the field is a reference rather than inline.
#[must_use]
pub fn field_reference(field_schema: &Value) -> Option<&str> {
    field_schema.get("$ref").and_then(Value::as_str)
}
