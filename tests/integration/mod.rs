//! Integration test suite for apiserver-gen
//!
//! ```bash
//! cargo test --test integration
//! ```
//!
//! - **pipeline**: full runs through the library with fake tools and the real templates
//! - **cli**: the binary against a mock API server, argument errors and exit codes

mod cli;
mod pipeline;

use std::path::PathBuf;

/// Path of a template shipped in `templates/`.
pub fn template(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("templates").join(name)
}
