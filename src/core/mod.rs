//! Core types shared by every stage of the generator.
//!
//! Right now this is the error layer:
//! - [`GenError`] - enumerated failure modes
//! - [`ErrorContext`] - error plus suggestion/details for the CLI
//! - [`user_friendly_error`] - converts an `anyhow::Error` for display

pub mod error;

pub use error::{ErrorContext, GenError, user_friendly_error};
