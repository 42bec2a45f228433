//! A single schema entry and its resource extension attributes.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::constants::{X_GROUP, X_KIND, X_PLURAL, X_SCOPED, X_SCOPES, X_VERSION};

/// One named type definition from `components.schemas`.
///
/// The raw JSON object is kept untouched; typed views are computed on demand.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SchemaEntry {
    raw: Map<String, Value>,
}

/// The `x-axway-*` attributes of an entry, as far as they are present.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ResourceExtensions {
    pub group: Option<String>,
    pub version: Option<String>,
    pub kind: Option<String>,
    pub scoped: bool,
    /// Kinds of the declared scopes, in document order.
    pub scopes: Option<Vec<String>>,
    pub plural: Option<String>,
}

impl From<Map<String, Value>> for SchemaEntry {
    fn from(raw: Map<String, Value>) -> Self {
        Self {
            raw,
        }
    }
}

impl SchemaEntry {
    #[must_use]
    pub fn attribute(&self, key: &str) -> Option<&Value> {
        self.raw.get(key)
    }

    /// Main resources carry a truthy group extension; everything else is a sub resource.
    #[must_use]
    pub fn is_main_resource(&self) -> bool {
        self.attribute(X_GROUP).is_some_and(is_truthy)
    }

    /// `x-axway-scoped`, read straight off the entry. Absent means unscoped.
    #[must_use]
    pub fn scoped(&self) -> bool {
        self.attribute(X_SCOPED).is_some_and(is_truthy)
    }

    /// The entry's property map, empty when it declares none.
    #[must_use]
    pub fn properties(&self) -> Map<String, Value> {
        self.attribute("properties").and_then(Value::as_object).cloned().unwrap_or_default()
    }

    #[must_use]
    pub fn extensions(&self) -> ResourceExtensions {
        let text = |key: &str| self.attribute(key).and_then(Value::as_str).map(str::to_string);

        let scopes = self.attribute(X_SCOPES).and_then(Value::as_array).map(|scopes| {
            scopes
                .iter()
                .filter_map(|scope| scope.get("kind").and_then(Value::as_str))
                .map(str::to_string)
                .collect()
        });

        ResourceExtensions {
            group: text(X_GROUP),
            version: text(X_VERSION),
            kind: text(X_KIND),
            scoped: self.scoped(),
            scopes,
            plural: text(X_PLURAL),
        }
    }
}

/// JSON truthiness: null, `false`, zero and `""` are falsy; arrays and objects are truthy.
#[must_use]
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0 && !f.is_nan()),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}
