//! Shell out to the AI CLI tool to read one statement page image.
//!
//! The tool is a black box: prompt and image in, free text out, seconds of
//! latency, occasionally non-conformant output. Everything downstream of
//! the returned text lives in spendscan-core and parses defensively, so
//! this module only has to run the process and enforce the timeout.

use std::future::Future;
use std::path::Path;
use std::process::Stdio;
use std::time::Duration;

use thiserror::Error;
use tokio::process::Command;

/// Extraction failure for a single page. Callers degrade any of these to
/// "zero transactions on this page" and keep going; none of them abort a
/// batch run.
#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("extraction timed out after {0:?}")]
    Timeout(Duration),
    #[error("spawning `{command}`: {source}")]
    Spawn {
        command: String,
        #[source]
        source: std::io::Error,
    },
    #[error("extractor exited with {status}: {stderr}")]
    Failed {
        status: std::process::ExitStatus,
        stderr: String,
    },
}

/// Narrow seam around the extraction tool so the pipeline can be driven
/// from canned text in tests.
pub trait PageExtractor {
    fn extract(
        &self,
        prompt: &str,
        image: &Path,
    ) -> impl Future<Output = Result<String, ExtractError>> + Send;
}

/// Extractor backed by the `opencode` CLI (or any tool with a compatible
/// `run <prompt> -m <model> -f <image>` invocation).
pub struct OpencodeExtractor {
    pub command: String,
    /// Extra args inserted before the image flag, e.g. a provider profile.
    pub extra_args: Vec<String>,
    pub model: String,
    pub timeout: Duration,
}

impl OpencodeExtractor {
    pub fn new(command: &str, model: &str, timeout: Duration) -> Self {
        Self {
            command: command.to_string(),
            extra_args: Vec::new(),
            model: model.to_string(),
            timeout,
        }
    }

    fn build_args(&self, prompt: &str, image: &Path) -> Vec<String> {
        let mut args = vec!["run".to_string(), prompt.to_string()];
        args.push("-m".to_string());
        args.push(self.model.clone());
        args.extend(self.extra_args.iter().cloned());
        args.push("-f".to_string());
        args.push(image.display().to_string());
        args
    }
}

impl PageExtractor for OpencodeExtractor {
    async fn extract(&self, prompt: &str, image: &Path) -> Result<String, ExtractError> {
        let args = self.build_args(prompt, image);

        let mut cmd = Command::new(&self.command);
        cmd.args(&args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        let output = tokio::time::timeout(self.timeout, cmd.output())
            .await
            .map_err(|_| ExtractError::Timeout(self.timeout))?
            .map_err(|e| ExtractError::Spawn {
                command: self.command.clone(),
                source: e,
            })?;

        if !output.status.success() {
            return Err(ExtractError::Failed {
                status: output.status,
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
    }
}
