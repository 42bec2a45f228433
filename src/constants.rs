//! Constants shared across the generator.
//!
//! Extension attribute names, fixed paths and the common-field list live here
//! so the classifier, projector and pipeline agree on them.

/// Path on the API server that serves the OpenAPI document.
pub const DOCS_PATH: &str = "/apis/docs";

/// Extension attribute marking an entry as a main resource.
pub const X_GROUP: &str = "x-axway-group";
pub const X_VERSION: &str = "x-axway-version";
pub const X_KIND: &str = "x-axway-kind";
pub const X_SCOPED: &str = "x-axway-scoped";
pub const X_SCOPES: &str = "x-axway-scopes";
pub const X_PLURAL: &str = "x-axway-plural";

/// Fields every main resource carries; never part of a descriptor.
pub const COMMON_FIELDS: [&str; 9] = [
    "group",
    "apiVersion",
    "kind",
    "name",
    "title",
    "metadata",
    "finalizers",
    "attributes",
    "tags",
];

/// Prefix of a local schema reference.
pub const SCHEMA_REF_PREFIX: &str = "#/components/schemas/";

/// `info` block stamped on every synthetic per-(group, version) document.
pub const SYNTHETIC_TITLE: &str = "API Server specification.";
pub const SYNTHETIC_VERSION: &str = "SNAPSHOT";

/// Output subdirectories under the output root.
pub const MODELS_DIR: &str = "models";
pub const CLIENTS_DIR: &str = "clients";

/// Stem of the aggregate client-set artifact.
pub const SET_FILE_STEM: &str = "set";

/// Template context names.
pub const RESOURCE_CONTEXT: &str = "res";
pub const SET_CONTEXT: &str = "input";

/// Partition dumps written with `--dump-partitions`.
pub const SUB_RESOURCES_DUMP: &str = "sub-resources.json";
pub const MAIN_RESOURCES_DUMP: &str = "main-resources.json";
