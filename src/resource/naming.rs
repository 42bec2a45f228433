//! File naming of the external model generator.
//!
//! The field projector has to guess which file the generator wrote for a
//! referenced kind. That guess depends entirely on the generator's own
//! convention, so it sits behind [`ModelNaming`] and can be swapped.

use anyhow::Result;
use regex::Regex;

/// Maps a kind to the file name the model generator produces for it.
pub trait ModelNaming: Send + Sync {
    /// Bare file name, no directory.
    fn model_file_name(&self, kind: &str) -> Result<String>;
}

/// openapi-generator's Go convention: `APIServiceSpec` → `model_api_service_spec.go`.
#[derive(Debug, Clone, Copy, Default)]
pub struct GoModelNaming;

impl ModelNaming for GoModelNaming {
    fn model_file_name(&self, kind: &str) -> Result<String> {
        Ok(format!("model_{}.go", snake_case_kind(kind)?))
    }
}

/// Lowercase-underscore form of a kind as openapi-generator spells it.
///
/// Only the first `API` and the first `AWS` are folded to `Api`/`Aws`;
/// every other uppercase letter starts a new word.
pub fn snake_case_kind(kind: &str) -> Result<String> {
    let folded = kind.replacen("API", "Api", 1).replacen("AWS", "Aws", 1);

    let upper = Regex::new(r"([A-Z])")?;
    let spaced = upper.replace_all(&folded, " ${1}");

    let non_word = Regex::new(r"[^A-Za-z0-9_]")?;
    Ok(non_word.replace_all(spaced.trim(), "_").to_lowercase())
}
