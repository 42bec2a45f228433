//! Metadata derivation for main resources.
//!
//! - [`fields`] - drops common fields and checks generated sub-type models
//! - [`naming`] - the model generator's file naming convention
//! - [`descriptor`] - per-resource template payload
//! - [`set`] - catalog of every main resource kind

pub mod descriptor;
pub mod fields;
pub mod naming;
pub mod set;

pub use descriptor::ResourceDescriptor;
pub use fields::{FieldProjector, project_fields};
pub use naming::{GoModelNaming, ModelNaming, snake_case_kind};
pub use set::{KindEntry, ResourceSet, ResourceSetEntry, build_resource_set};
