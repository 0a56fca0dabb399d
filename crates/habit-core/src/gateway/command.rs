//! Command-backed gateway.
//!
//! Runs a local model command (for example `ollama run llama3.2`) once per
//! generation. The prompt is written to the child's stdin unless an
//! argument carries the `{prompt}` placeholder, and stdout is returned as
//! the generated text.

use std::process::Stdio;
use std::time::Duration;

use async_trait::async_trait;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;
use tracing::{debug, warn};

use super::trait_def::{GenerationResult, ModelError, ModelGateway};

/// Placeholder substituted with the token budget in arguments.
pub const MAX_TOKENS_PLACEHOLDER: &str = "{max_tokens}";

/// Placeholder substituted with the prompt in arguments.
pub const PROMPT_PLACEHOLDER: &str = "{prompt}";

/// Gateway that shells out to a model command.
#[derive(Debug, Clone)]
pub struct CommandModel {
    program: String,
    args: Vec<String>,
    timeout: Option<Duration>,
}

impl CommandModel {
    /// Create a gateway for `program` with no arguments and no timeout.
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            timeout: None,
        }
    }

    /// Set the argument list. `{max_tokens}` and `{prompt}` are substituted
    /// per call.
    pub fn args(mut self, args: Vec<String>) -> Self {
        self.args = args;
        self
    }

    /// Fail calls that run longer than `limit`.
    pub fn timeout(mut self, limit: Duration) -> Self {
        self.timeout = Some(limit);
        self
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    fn prompt_in_args(&self) -> bool {
        self.args.iter().any(|a| a.contains(PROMPT_PLACEHOLDER))
    }

    fn resolved_args(&self, prompt: &str, max_tokens: u32) -> Vec<String> {
        let budget = max_tokens.to_string();
        self.args
            .iter()
            .map(|a| {
                a.replace(MAX_TOKENS_PLACEHOLDER, &budget)
                    .replace(PROMPT_PLACEHOLDER, prompt)
            })
            .collect()
    }

    async fn run(&self, prompt: &str, max_tokens: u32) -> GenerationResult {
        let via_stdin = !self.prompt_in_args();
        let mut cmd = Command::new(&self.program);
        cmd.args(self.resolved_args(prompt, max_tokens))
            .stdin(if via_stdin { Stdio::piped() } else { Stdio::null() })
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        let mut child = cmd.spawn().map_err(|e| {
            ModelError::Unavailable(format!("failed to start {:?}: {e}", self.program))
        })?;

        let stdin = child.stdin.take();
        let feed = async move {
            if let Some(mut stdin) = stdin {
                // The child may exit without reading stdin; that is its call.
                if let Err(e) = stdin.write_all(prompt.as_bytes()).await {
                    debug!(error = %e, "model command did not consume the prompt");
                }
            }
        };
        let ((), output) = tokio::join!(feed, child.wait_with_output());
        let output = output
            .map_err(|e| ModelError::Runtime(format!("failed to wait for {:?}: {e}", self.program)))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(ModelError::Runtime(format!(
                "{:?} exited with {}: {}",
                self.program,
                output.status,
                stderr.trim()
            )));
        }

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

#[async_trait]
impl ModelGateway for CommandModel {
    fn name(&self) -> &str {
        "command"
    }

    async fn generate(&self, prompt: &str, max_tokens: u32) -> GenerationResult {
        debug!(program = %self.program, prompt_len = prompt.len(), max_tokens, "running model command");
        let result = match self.timeout {
            Some(limit) => tokio::time::timeout(limit, self.run(prompt, max_tokens))
                .await
                .unwrap_or(Err(ModelError::Timeout(limit))),
            None => self.run(prompt, max_tokens).await,
        };
        if let Err(e) = &result {
            warn!(program = %self.program, error = %e, "model command failed");
        }
        result
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
