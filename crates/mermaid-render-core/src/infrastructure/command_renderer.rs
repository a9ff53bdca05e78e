//! `Renderer` backed by the Mermaid CLI (`mmdc`).
//!
//! Each render writes the source to a private temp directory, runs
//! `<command> <args..> -i diagram.mmd -o diagram.svg`, and reads the SVG back.
//! The wait is bounded by `timeout`; the child is killed when it is exceeded.

#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]

use std::{process::Stdio, time::Duration};

use async_trait::async_trait;
use tokio::process::Command;
use tracing::debug;

use crate::domain::{RenderError, Renderer};

pub const DEFAULT_COMMAND: &str = "mmdc";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, Clone)]
pub struct CommandRenderer {
    command: String,
    args: Vec<String>,
    timeout: Duration,
}

impl Default for CommandRenderer {
    fn default() -> Self {
        Self::new(DEFAULT_COMMAND, Vec::new(), DEFAULT_TIMEOUT)
    }
}

impl CommandRenderer {
    #[must_use]
    pub fn new(command: impl Into<String>, args: Vec<String>, timeout: Duration) -> Self {
        Self {
            command: command.into(),
            args,
            timeout,
        }
    }

    /// Whether the configured command resolves on `PATH`.
    #[must_use]
    pub fn is_available(&self) -> bool {
        which::which(&self.command).is_ok()
    }

    async fn run(&self, mermaid_code: &str) -> Result<String, RenderError> {
        let program = which::which(&self.command).map_err(|_| {
            RenderError::new(format!("Mermaid CLI '{}' not found on PATH", self.command))
        })?;

        let workdir = tempfile::tempdir().map_err(|e| io_failure("create temp directory", &e))?;
        let input = workdir.path().join("diagram.mmd");
        let output = workdir.path().join("diagram.svg");
        tokio::fs::write(&input, mermaid_code)
            .await
            .map_err(|e| io_failure("write diagram source", &e))?;

        let mut command = Command::new(program);
        command
            .args(&self.args)
            .arg("-i")
            .arg(&input)
            .arg("-o")
            .arg(&output)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        debug!(command = %self.command, "Running Mermaid CLI");
        let finished = tokio::time::timeout(self.timeout, command.output())
            .await
            .map_err(|_| {
                RenderError::new(format!(
                    "Rendering timed out after {}s",
                    self.timeout.as_secs()
                ))
            })?
            .map_err(|e| io_failure("run Mermaid CLI", &e))?;

        if !finished.status.success() {
            let stderr = String::from_utf8_lossy(&finished.stderr);
            return Err(parse_failure(&stderr, finished.status.code()));
        }

        let svg = tokio::fs::read_to_string(&output)
            .await
            .map_err(|e| io_failure("read rendered SVG", &e))?;
        if svg.trim().is_empty() {
            return Err(RenderError::new("Mermaid CLI produced empty SVG"));
        }
        Ok(svg)
    }
}

#[async_trait]
impl Renderer for CommandRenderer {
    async fn render(&self, mermaid_code: &str) -> Result<String, RenderError> {
        self.run(mermaid_code).await
    }
}

fn io_failure(action: &str, err: &std::io::Error) -> RenderError {
    RenderError::new(format!("Failed to {action}: {err}"))
}

/// Turn CLI stderr into a `RenderError`, picking up `... on line N` when present.
fn parse_failure(stderr: &str, status: Option<i32>) -> RenderError {
    let lines: Vec<&str> = stderr
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect();

    let message = lines
        .iter()
        .find(|line| line.contains("error") || line.contains("Error"))
        .or_else(|| lines.first())
        .map_or_else(
            || {
                status.map_or_else(
                    || "Mermaid CLI was terminated".to_string(),
                    |code| format!("Mermaid CLI exited with status {code}"),
                )
            },
            |line| line.trim_start_matches("Error:").trim().to_string(),
        );

    let line = stderr.find("on line ").and_then(|index| {
        stderr[index + "on line ".len()..]
            .chars()
            .take_while(char::is_ascii_digit)
            .collect::<String>()
            .parse::<u32>()
            .ok()
    });

    RenderError::new(message).at(line, None)
}
