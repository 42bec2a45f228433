//! Error handling for apiserver-gen
//!
//! Two layers, in the same shape the rest of the crate uses them:
//! - [`GenError`] enumerates every failure the generator can hit
//! - [`ErrorContext`] wraps an error with a user-facing suggestion and details
//!
//! Library code returns `anyhow::Result` and attaches context with
//! `.context(...)`; [`user_friendly_error`] downcasts back to [`GenError`] at the
//! top level so the CLI can print something actionable.
//!
//! ```rust,no_run
//! use apiserver_gen::core::{GenError, user_friendly_error};
//!
//! let err = anyhow::Error::from(GenError::EmptyDocument {
//!     url: "https://localhost:8443/apis/docs".to_string(),
//! });
//! user_friendly_error(err).display();
//! ```

use colored::Colorize;
use std::fmt;
use thiserror::Error;

/// Every failure the generator can report.
#[derive(Error, Debug)]
pub enum GenError {
    #[error("Failed to fetch schema document from {url}: {reason}")]
    FetchFailed {
        url: String,
        reason: String,
    },

    #[error("Schema document fetched from {url} is empty")]
    EmptyDocument {
        url: String,
    },

    #[error("Malformed schema document: {reason}")]
    MalformedDocument {
        reason: String,
    },

    /// Schema key that does not split into `group.version.kind`.
    #[error("Schema name '{name}' is not of the form group.version.kind")]
    InvalidSchemaName {
        name: String,
    },

    #[error("Field '{field}' has an unresolvable reference '{reference}'")]
    InvalidReference {
        field: String,
        reference: String,
    },

    #[error("Duplicate kind '{kind}' in {group}/{version}")]
    DuplicateKind {
        group: String,
        version: String,
        kind: String,
    },

    #[error("Resource '{name}' is missing required attribute '{attribute}'")]
    MalformedResource {
        name: String,
        attribute: String,
    },

    #[error("Failed to check generated model {path}: {reason}")]
    ModelProbe {
        path: String,
        reason: String,
    },

    #[error("External tool '{program}' is not installed or not found in PATH")]
    ToolNotFound {
        program: String,
    },

    #[error("External tool '{program}' failed: {operation}")]
    ToolFailed {
        program: String,
        operation: String,
        stderr: String,
    },

    #[error("Failed to render template {template}: {reason}")]
    TemplateError {
        template: String,
        reason: String,
    },

    #[error("Configuration error: {message}")]
    ConfigError {
        message: String,
    },

    #[error("{message}")]
    Other {
        message: String,
    },
}

/// A [`GenError`] plus optional hints for the person running the tool.
#[derive(Debug)]
pub struct ErrorContext {
    pub error: GenError,
    pub suggestion: Option<String>,
    pub details: Option<String>,
}

impl ErrorContext {
    #[must_use]
    pub const fn new(error: GenError) -> Self {
        Self {
            error,
            suggestion: None,
            details: None,
        }
    }

    #[must_use]
    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }

    #[must_use]
    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    /// Print to stderr with the `ERROR:` prefix.
    pub fn display(&self) {
        eprintln!("{} {}", "ERROR:".red().bold(), self.error);

        if let Some(details) = &self.details {
            eprintln!("{}: {}", "details".yellow(), details);
        }

        if let Some(suggestion) = &self.suggestion {
            eprintln!("{}: {}", "suggestion".green(), suggestion);
        }
    }
}

impl fmt::Display for ErrorContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ERROR: {}", self.error)?;

        if let Some(details) = &self.details {
            write!(f, "\nDetails: {details}")?;
        }

        if let Some(suggestion) = &self.suggestion {
            write!(f, "\nSuggestion: {suggestion}")?;
        }

        Ok(())
    }
}

impl std::error::Error for ErrorContext {}

/// Turn any error from the pipeline into something printable.
///
/// Known [`GenError`]s get a tailored suggestion; everything else is reported
/// with its full cause chain.
#[must_use]
pub fn user_friendly_error(error: anyhow::Error) -> ErrorContext {
    if let Some(gen_error) = error.downcast_ref::<GenError>() {
        let ctx = create_error_context(gen_error);
        return attach_chain(ctx, &error);
    }

    if let Some(io_error) = error.downcast_ref::<std::io::Error>() {
        if io_error.kind() == std::io::ErrorKind::PermissionDenied {
            return ErrorContext::new(GenError::Other {
                message: error.to_string(),
            })
            .with_suggestion("Check that the output root is writable by the current user");
        }
    }

    ErrorContext::new(GenError::Other {
        message: format_chain(&error),
    })
}

fn create_error_context(error: &GenError) -> ErrorContext {
    match error {
        GenError::FetchFailed {
            url,
            reason,
        } => ErrorContext::new(GenError::FetchFailed {
            url: url.clone(),
            reason: reason.clone(),
        })
        .with_suggestion("Verify the protocol, host and port arguments and that the API server is reachable"),

        GenError::EmptyDocument {
            url,
        } => ErrorContext::new(GenError::EmptyDocument {
            url: url.clone(),
        })
        .with_details("The API server answered without a body, so there is nothing to generate"),

        GenError::MalformedDocument {
            reason,
        } => ErrorContext::new(GenError::MalformedDocument {
            reason: reason.clone(),
        })
        .with_details("Expected a JSON document shaped like { openapi, components: { schemas } }"),

        GenError::DuplicateKind {
            group,
            version,
            kind,
        } => ErrorContext::new(GenError::DuplicateKind {
            group: group.clone(),
            version: version.clone(),
            kind: kind.clone(),
        })
        .with_suggestion("Run without --strict to let the last definition win"),

        GenError::ModelProbe {
            path,
            reason,
        } => ErrorContext::new(GenError::ModelProbe {
            path: path.clone(),
            reason: reason.clone(),
        })
        .with_suggestion("Check permissions on the models directory under the output root"),

        GenError::ToolNotFound {
            program,
        } => ErrorContext::new(GenError::ToolNotFound {
            program: program.clone(),
        })
        .with_suggestion(format!(
            "Install '{program}' or point the configuration at the right executable"
        )),

        GenError::ToolFailed {
            program,
            operation,
            stderr,
        } => {
            let ctx = ErrorContext::new(GenError::ToolFailed {
                program: program.clone(),
                operation: operation.clone(),
                stderr: stderr.clone(),
            });
            if stderr.trim().is_empty() {
                ctx
            } else {
                ctx.with_details(stderr.trim().to_string())
            }
        }

        GenError::TemplateError {
            template,
            reason,
        } => ErrorContext::new(GenError::TemplateError {
            template: template.clone(),
            reason: reason.clone(),
        })
        .with_suggestion("Resource templates see the descriptor as `res`, the set template sees `input`"),

        GenError::ConfigError {
            message,
        } => ErrorContext::new(GenError::ConfigError {
            message: message.clone(),
        }),

        GenError::InvalidSchemaName {
            name,
        } => ErrorContext::new(GenError::InvalidSchemaName {
            name: name.clone(),
        }),

        GenError::InvalidReference {
            field,
            reference,
        } => ErrorContext::new(GenError::InvalidReference {
            field: field.clone(),
            reference: reference.clone(),
        })
        .with_details("References must look like #/components/schemas/<group>.<version>.<kind>"),

        GenError::MalformedResource {
            name,
            attribute,
        } => ErrorContext::new(GenError::MalformedResource {
            name: name.clone(),
            attribute: attribute.clone(),
        }),

        GenError::Other {
            message,
        } => ErrorContext::new(GenError::Other {
            message: message.clone(),
        }),
    }
}

// Context added with `.context(...)` sits above the GenError in the chain.
fn attach_chain(ctx: ErrorContext, error: &anyhow::Error) -> ErrorContext {
    let outer: Vec<String> = error
        .chain()
        .take_while(|cause| cause.downcast_ref::<GenError>().is_none())
        .map(std::string::ToString::to_string)
        .collect();

    if outer.is_empty() || ctx.details.is_some() {
        return ctx;
    }
    ctx.with_details(outer.join(": "))
}

fn format_chain(error: &anyhow::Error) -> String {
    let mut message = error.to_string();
    let chain: Vec<String> =
        error.chain().skip(1).map(std::string::ToString::to_string).collect();

    if !chain.is_empty() {
        message.push_str("\n\nCaused by:");
        for (i, cause) in chain.iter().enumerate() {
            message.push_str(&format!("\n  {}: {}", i + 1, cause));
        }
    }
    message
}
