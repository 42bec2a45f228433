//! apiserver-gen - models and clients from an API server's OpenAPI document
//!
//! The API server publishes one OpenAPI document at `/apis/docs` describing
//! every resource it serves. Entries carrying an `x-axway-group` extension are
//! *main resources* (top-level kinds such as `Environment`); everything else is
//! a *sub resource* (dependent types such as `EnvironmentSpec`). This crate
//! turns that document into source code in two phases:
//!
//! 1. Sub resources are grouped per (group, version) into synthetic OpenAPI
//!    documents and fed to an external model generator.
//! 2. Each main resource becomes a [`resource::ResourceDescriptor`] whose
//!    `fields` record which referenced sub-type models phase 1 actually
//!    produced; the descriptor is rendered through the resource and client
//!    templates. Finally the catalog of all kinds is rendered into the
//!    aggregate client set.
//!
//! # Modules
//!
//! - [`schema`] - typed view of the document, schema names and references
//! - [`classify`] - main/sub partition and (group, version) buckets
//! - [`resource`] - field projection, model naming, descriptors, resource set
//! - [`pipeline`] - the two-phase run
//! - [`source`] - fetching the document over HTTP
//! - [`tools`] - subprocess builder, model generator and template renderers
//! - [`config`] - layered configuration
//! - [`cli`] - command-line front-end
//! - [`core`] - error types and user-facing error reporting
//! - [`utils`] - filesystem helpers
//!
//! # Output layout
//!
//! ```text
//! <output-root>/
//! ├── models/<group>/<version>/model_<snake_kind>.go   (model generator)
//! ├── models/<group>/<version>/<Kind>.go               (resources template)
//! ├── clients/<group>/<version>/<Kind>.go              (clients template)
//! └── clients/set.go                                   (set template)
//! ```

pub mod classify;
pub mod cli;
pub mod config;
pub mod constants;
pub mod core;
pub mod pipeline;
pub mod resource;
pub mod schema;
pub mod source;
pub mod tools;
pub mod utils;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;
