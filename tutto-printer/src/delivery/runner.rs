//! External print command execution
//!
//! Print commands are run to completion and reported as a structured
//! [`ExitReport`] instead of raw process handles.

use std::fmt;
use std::process::Stdio;
use std::time::Duration;

use async_trait::async_trait;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;
use tracing::{debug, instrument};

use crate::error::{PrintError, PrintResult};

/// A program plus its arguments
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandSpec {
    pub program: String,
    pub args: Vec<String>,
}

impl CommandSpec {
    pub fn new<I, S>(program: impl Into<String>, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            program: program.into(),
            args: args.into_iter().map(Into::into).collect(),
        }
    }
}

impl fmt::Display for CommandSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.program)?;
        for arg in &self.args {
            write!(f, " {}", arg)?;
        }
        Ok(())
    }
}

/// Exit status of a finished print command
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExitReport {
    /// Exit code, `None` when terminated by a signal
    pub code: Option<i32>,
    /// Captured standard error, trimmed
    pub stderr: String,
}

impl ExitReport {
    pub fn success() -> Self {
        Self {
            code: Some(0),
            stderr: String::new(),
        }
    }

    pub fn failure(code: i32, stderr: impl Into<String>) -> Self {
        Self {
            code: Some(code),
            stderr: stderr.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        self.code == Some(0)
    }

    /// Turn a non-zero exit into [`PrintError::CommandFailed`]
    pub fn into_result(self, program: &str) -> PrintResult<()> {
        if self.is_success() {
            Ok(())
        } else {
            Err(PrintError::CommandFailed {
                program: program.to_string(),
                code: self.code,
                stderr: self.stderr,
            })
        }
    }
}

/// Runs print commands on behalf of the driver
#[async_trait]
pub trait CommandRunner: Send + Sync {
    /// Run `command` to completion, feeding `stdin` when given
    async fn run(&self, command: &CommandSpec, stdin: Option<&[u8]>) -> PrintResult<ExitReport>;
}

/// Runs commands as child processes with a bounded wait
///
/// The child is killed when the wait expires.
#[derive(Debug, Clone)]
pub struct ProcessRunner {
    timeout: Duration,
}

impl ProcessRunner {
    pub fn new(timeout: Duration) -> Self {
        Self { timeout }
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }
}

impl Default for ProcessRunner {
    fn default() -> Self {
        Self::new(Duration::from_secs(15))
    }
}

#[async_trait]
impl CommandRunner for ProcessRunner {
    #[instrument(skip(self, stdin), fields(command = %command))]
    async fn run(&self, command: &CommandSpec, stdin: Option<&[u8]>) -> PrintResult<ExitReport> {
        let mut child = Command::new(&command.program)
            .args(&command.args)
            .stdin(if stdin.is_some() {
                Stdio::piped()
            } else {
                Stdio::null()
            })
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|source| PrintError::Spawn {
                program: command.program.clone(),
                source,
            })?;

        let finished = async move {
            if let Some(data) = stdin {
                let mut pipe = child
                    .stdin
                    .take()
                    .ok_or_else(|| std::io::Error::other("stdin not captured"))?;
                match pipe.write_all(data).await {
                    Ok(()) => {}
                    // The command exited without reading; its exit status says why
                    Err(e) if e.kind() == std::io::ErrorKind::BrokenPipe => {
                        debug!("Command closed stdin early");
                    }
                    Err(e) => return Err(e),
                }
                // Close stdin so the command sees EOF
                drop(pipe);
            }
            child.wait_with_output().await
        };

        let output = tokio::time::timeout(self.timeout, finished)
            .await
            .map_err(|_| {
                PrintError::Timeout(format!(
                    "`{}` did not finish within {:?}",
                    command.program, self.timeout
                ))
            })??;

        let report = ExitReport {
            code: output.status.code(),
            stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
        };
        debug!(code = ?report.code, stdout = %String::from_utf8_lossy(&output.stdout).trim(), "Command finished");
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_command_display() {
        let cmd = CommandSpec::new("lp", ["-d", "printer", "-o", "raw", "-"]);
        assert_eq!(cmd.to_string(), "lp -d printer -o raw -");
    }

    #[test]
    fn test_exit_report_into_result() {
        assert!(ExitReport::success().into_result("lp").is_ok());

        let err = ExitReport::failure(2, "no such printer")
            .into_result("lp")
            .unwrap_err();
        match err {
            PrintError::CommandFailed {
                program,
                code,
                stderr,
            } => {
                assert_eq!(program, "lp");
                assert_eq!(code, Some(2));
                assert_eq!(stderr, "no such printer");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn test_spawn_failure() {
        let runner = ProcessRunner::default();
        let cmd = CommandSpec::new("tutto-printer-no-such-binary", Vec::<String>::new());
        let err = runner.run(&cmd, None).await.unwrap_err();
        assert!(matches!(err, PrintError::Spawn { .. }));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_exit_code_and_stderr_captured() {
        let runner = ProcessRunner::default();
        let cmd = CommandSpec::new("sh", ["-c", "echo 'printer jammed' >&2; exit 3"]);
        let report = runner.run(&cmd, None).await.unwrap();
        assert_eq!(report, ExitReport::failure(3, "printer jammed"));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_stdin_is_streamed() {
        let runner = ProcessRunner::default();
        // Fails unless stdin carries exactly the expected bytes
        let cmd = CommandSpec::new("sh", ["-c", "test \"$(cat)\" = 'TOTAL: $1300'"]);
        let report = runner.run(&cmd, Some(b"TOTAL: $1300")).await.unwrap();
        assert!(report.is_success());
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_early_exit_keeps_diagnostic() {
        let runner = ProcessRunner::default();
        let cmd = CommandSpec::new(
            "sh",
            ["-c", "exec 0<&-; echo 'lp: unknown destination' >&2; exit 2"],
        );
        let data = vec![b'x'; 200 * 1024];
        let report = runner.run(&cmd, Some(&data)).await.unwrap();
        assert_eq!(report, ExitReport::failure(2, "lp: unknown destination"));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_timeout_expires() {
        let runner = ProcessRunner::new(Duration::from_millis(100));
        let cmd = CommandSpec::new("sleep", ["5"]);
        let err = runner.run(&cmd, None).await.unwrap_err();
        assert!(matches!(err, PrintError::Timeout(_)));
    }
}
