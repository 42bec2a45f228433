//! Builder for invoking external tools (model generator, gomplate).
//!
//! Every invocation goes through [`ToolCommand`] so that command lines are
//! logged the same way, stdin payloads are fed without deadlocking on full
//! pipes, and failures turn into [`GenError::ToolFailed`] carrying stderr.

use anyhow::{Context, Result};
use std::process::Stdio;
use std::time::Duration;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;
use tokio::time::timeout;

use crate::core::GenError;

/// Fluent builder around [`tokio::process::Command`].
///
/// ```rust,ignore
/// use apiserver_gen::tools::ToolCommand;
///
/// # async fn example() -> anyhow::Result<()> {
/// ToolCommand::new("gomplate")
///     .args(["-f", "set.tmpl", "--out", "out/clients/set.go"])
///     .stdin(br#"{"set": []}"#.to_vec())
///     .with_context("render set")
///     .execute_success()
///     .await?;
/// # Ok(())
/// # }
/// ```
///
/// Defaults: output captured, no stdin, no timeout.
pub struct ToolCommand {
    program: String,

    args: Vec<String>,

    /// Bytes written to the child's stdin, which is then closed
    stdin: Option<Vec<u8>>,

    timeout_duration: Option<Duration>,

    /// Short label used in logs and error messages
    context: Option<String>,
}

/// Captured output of a successful invocation.
#[derive(Debug)]
pub struct ToolOutput {
    pub stdout: String,
    pub stderr: String,
}

impl ToolCommand {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            stdin: None,
            timeout_duration: None,
            context: None,
        }
    }

    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    pub fn stdin(mut self, input: Vec<u8>) -> Self {
        self.stdin = Some(input);
        self
    }

    pub const fn with_timeout(mut self, duration: Option<Duration>) -> Self {
        self.timeout_duration = duration;
        self
    }

    pub fn with_context(mut self, context: impl Into<String>) -> Self {
        self.context = Some(context.into());
        self
    }

    #[must_use]
    pub fn program(&self) -> &str {
        &self.program
    }

    #[must_use]
    pub fn get_args(&self) -> &[String] {
        &self.args
    }

    fn label(&self) -> String {
        self.context.clone().unwrap_or_else(|| {
            self.args.first().cloned().unwrap_or_else(|| "invocation".to_string())
        })
    }

    /// Run to completion; non-zero exit is an error.
    pub async fn execute(self) -> Result<ToolOutput> {
        let start = std::time::Instant::now();
        let label = self.label();

        let resolved = which::which(&self.program).map_err(|_| GenError::ToolNotFound {
            program: self.program.clone(),
        })?;

        let mut cmd = Command::new(&resolved);
        cmd.args(&self.args);

        tracing::debug!(
            target: "tools",
            "({}) Executing command: {} {}",
            label,
            self.program,
            self.args.join(" ")
        );

        cmd.stdin(if self.stdin.is_some() {
            Stdio::piped()
        } else {
            Stdio::null()
        });
        cmd.stdout(Stdio::piped());
        cmd.stderr(Stdio::piped());
        cmd.kill_on_drop(true);

        let mut child =
            cmd.spawn().with_context(|| format!("Failed to start {}", self.program))?;

        // Feed stdin from a separate task so a chatty child cannot block on a full stdout pipe.
        let writer = match (self.stdin, child.stdin.take()) {
            (Some(input), Some(mut pipe)) => Some(tokio::spawn(async move {
                let result = pipe.write_all(&input).await;
                drop(pipe);
                result
            })),
            _ => None,
        };

        let output_future = child.wait_with_output();
        let output = if let Some(duration) = self.timeout_duration {
            if let Ok(result) = timeout(duration, output_future).await {
                result.with_context(|| format!("Failed to wait for {}", self.program))?
            } else {
                tracing::warn!(
                    target: "tools",
                    "({}) {} timed out after {} seconds",
                    label,
                    self.program,
                    duration.as_secs()
                );
                return Err(GenError::ToolFailed {
                    program: self.program.clone(),
                    operation: label,
                    stderr: format!("timed out after {} seconds", duration.as_secs()),
                }
                .into());
            }
        } else {
            output_future.await.with_context(|| format!("Failed to wait for {}", self.program))?
        };

        if let Some(writer) = writer {
            match writer.await {
                Ok(Ok(())) => {}
                // The child may exit without reading all of stdin; its exit status decides.
                Ok(Err(e)) if e.kind() == std::io::ErrorKind::BrokenPipe => {
                    tracing::debug!(target: "tools", "({}) stdin closed early by {}", label, self.program);
                }
                Ok(Err(e)) => {
                    return Err(e).with_context(|| format!("Failed to write stdin of {}", self.program));
                }
                Err(e) => {
                    return Err(anyhow::anyhow!("stdin writer for {} panicked: {e}", self.program));
                }
            }
        }

        let stdout = String::from_utf8_lossy(&output.stdout).to_string();
        let stderr = String::from_utf8_lossy(&output.stderr).to_string();

        if !output.status.success() {
            tracing::debug!(
                target: "tools",
                "({}) {} failed with exit code: {:?}",
                label,
                self.program,
                output.status.code()
            );
            return Err(GenError::ToolFailed {
                program: self.program,
                operation: label,
                stderr: if stderr.is_empty() {
                    stdout
                } else {
                    stderr
                },
            }
            .into());
        }

        if !stdout.is_empty() {
            tracing::debug!(target: "tools", "({}) {}", label, stdout.trim());
        }
        if !stderr.is_empty() {
            tracing::debug!(target: "tools", "({}) {}", label, stderr.trim());
        }

        let elapsed = start.elapsed();
        if elapsed.as_secs() > 1 {
            tracing::info!(target: "tools::perf", "({}) {} took {:.2}s", label, self.program, elapsed.as_secs_f64());
        }

        Ok(ToolOutput {
            stdout,
            stderr,
        })
    }

    pub async fn execute_success(self) -> Result<()> {
        self.execute().await?;
        Ok(())
    }
}
