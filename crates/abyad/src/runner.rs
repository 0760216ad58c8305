//! Workflow runner - spawns the external agent pipeline and captures output.
//!
//! One process per analyze call. The course content goes to the child's
//! stdin; the child prints its pipeline events to stdout, which is captured
//! whole for the extractor. No streaming, no retries.

use std::process::Stdio;
use std::time::{Duration, Instant};
use thiserror::Error;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;
use tokio::time::timeout;
use tracing::{debug, warn};

use crate::config::RunnerConfig;

/// Failure of one pipeline run.
#[derive(Debug, Error)]
pub enum RunnerError {
    #[error("runner command is not configured")]
    EmptyCommand,

    #[error("failed to execute runner: {0}")]
    Exec(#[source] std::io::Error),

    #[error("runner timed out after {0}s")]
    Timeout(u64),

    #[error("runner exited with {code:?}: {stderr}")]
    NonZeroExit { code: Option<i32>, stderr: String },
}

/// Captured output of one successful run.
#[derive(Debug)]
pub struct RunOutput {
    pub stdout: String,
    pub stderr: String,
    pub elapsed_ms: u64,
}

/// Runs the configured agent pipeline command.
#[derive(Debug, Clone)]
pub struct WorkflowRunner {
    cmd: Vec<String>,
    timeout_secs: u64,
}

impl WorkflowRunner {
    pub fn new(config: &RunnerConfig) -> Self {
        Self {
            cmd: config.cmd.clone(),
            timeout_secs: config.timeout_secs,
        }
    }

    /// Spawn the pipeline once, feed it `content` on stdin, and wait for
    /// exit within the configured timeout.
    pub async fn run(&self, content: &str) -> Result<RunOutput, RunnerError> {
        let (program, args) = self.cmd.split_first().ok_or(RunnerError::EmptyCommand)?;

        debug!("  Executing: {} {:?}", program, args);
        let started = Instant::now();

        let mut child = Command::new(program)
            .args(args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(RunnerError::Exec)?;

        let stdin = child.stdin.take();
        // Feed stdin while the output pipes drain; writing first would
        // stall once the child echoes more than a pipe buffer back.
        // The handle drops after the write so the child sees EOF, and the
        // deadline covers both; kill_on_drop reaps the child if it passes.
        let feed = async move {
            if let Some(mut stdin) = stdin {
                if let Err(e) = stdin.write_all(content.as_bytes()).await {
                    // A child that never reads stdin closes the pipe early;
                    // its output still decides the outcome.
                    warn!("  Runner stdin write failed: {}", e);
                }
            }
        };
        let feed_and_wait = async move { tokio::join!(feed, child.wait_with_output()).1 };

        let output = match timeout(Duration::from_secs(self.timeout_secs), feed_and_wait).await {
            Ok(Ok(output)) => output,
            Ok(Err(e)) => return Err(RunnerError::Exec(e)),
            Err(_) => {
                warn!("  Runner timed out after {}s", self.timeout_secs);
                return Err(RunnerError::Timeout(self.timeout_secs));
            }
        };

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
            warn!("  Runner failed ({}): {}", output.status, stderr);
            return Err(RunnerError::NonZeroExit {
                code: output.status.code(),
                stderr,
            });
        }

        Ok(RunOutput {
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
            elapsed_ms: started.elapsed().as_millis() as u64,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn runner(cmd: &[&str], timeout_secs: u64) -> WorkflowRunner {
        WorkflowRunner::new(&RunnerConfig {
            cmd: cmd.iter().map(|s| s.to_string()).collect(),
            timeout_secs,
        })
    }

    #[tokio::test]
    async fn test_run_echo() {
        let output = runner(&["echo", "hello"], 5).run("").await.unwrap();
        assert_eq!(output.stdout.trim(), "hello");
    }

    #[tokio::test]
    async fn test_content_reaches_stdin() {
        let output = runner(&["cat"], 5).run("course content here").await.unwrap();
        assert_eq!(output.stdout, "course content here");
    }

    #[tokio::test]
    async fn test_large_content_round_trips() {
        // cat echoes while it reads; both pipes fill unless the write
        // and the drain overlap.
        let content = "x".repeat(1024 * 1024);
        let output = runner(&["cat"], 5).run(&content).await.unwrap();
        assert_eq!(output.stdout.len(), content.len());
        assert!(output.stdout == content);
    }

    #[tokio::test]
    async fn test_empty_command_fails_before_spawn() {
        let err = runner(&[], 5).run("x").await.unwrap_err();
        assert!(matches!(err, RunnerError::EmptyCommand));
    }

    #[tokio::test]
    async fn test_missing_program_is_an_exec_error() {
        let err = runner(&["/nonexistent-program-xyz"], 5).run("").await.unwrap_err();
        assert!(matches!(err, RunnerError::Exec(_)));
    }

    #[tokio::test]
    async fn test_nonzero_exit_carries_stderr() {
        let err = runner(&["sh", "-c", "echo boom >&2; exit 3"], 5)
            .run("")
            .await
            .unwrap_err();
        match err {
            RunnerError::NonZeroExit { code, stderr } => {
                assert_eq!(code, Some(3));
                assert_eq!(stderr, "boom");
            }
            other => panic!("expected NonZeroExit, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_slow_runner_times_out() {
        let err = runner(&["sleep", "5"], 1).run("").await.unwrap_err();
        assert!(matches!(err, RunnerError::Timeout(1)));
    }
}
