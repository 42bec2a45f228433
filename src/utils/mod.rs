//! Filesystem helpers shared by the pipeline and the renderers.

pub mod fs;

pub use fs::{atomic_write, ensure_dir, write_json_pretty};
