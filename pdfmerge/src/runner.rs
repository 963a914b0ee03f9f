//! External process execution.
//!
//! [`ProcessRunner`] is the seam between a [`MergeJob`](crate::MergeJob) and
//! the operating system. [`TokioRunner`] is the real implementation; tests
//! substitute their own to simulate tool failures without Ghostscript.

use async_trait::async_trait;
use std::ffi::OsStr;
use std::io;
use std::process::{ExitStatus, Stdio};
use std::time::Duration;
use tokio::io::{AsyncRead, AsyncReadExt};
use tokio::process::Command;
use tracing::{debug, warn};

use crate::command::CommandLine;
use crate::error::Result;

/// How long to keep reading pipes after a timed-out child is killed.
const DRAIN_GRACE: Duration = Duration::from_secs(1);

/// Captured outcome of a finished (or killed) child process.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProcessOutput {
    /// Exit code, when the process exited on its own.
    pub exit_code: Option<i32>,
    /// Whether the process reported success.
    pub success: bool,
    /// Whether the process was killed because the timeout elapsed.
    pub timed_out: bool,
    /// Captured standard output.
    pub stdout: String,
    /// Captured standard error.
    pub stderr: String,
}

impl ProcessOutput {
    /// Output for a process that exited with `code`.
    pub fn exited(code: i32) -> Self {
        Self {
            exit_code: Some(code),
            success: code == 0,
            ..Default::default()
        }
    }

    /// Output for a process killed after its timeout elapsed.
    pub fn timed_out() -> Self {
        Self {
            timed_out: true,
            ..Default::default()
        }
    }

    /// Attach captured standard error.
    pub fn with_stderr(mut self, stderr: impl Into<String>) -> Self {
        self.stderr = stderr.into();
        self
    }

    /// Attach captured standard output.
    pub fn with_stdout(mut self, stdout: impl Into<String>) -> Self {
        self.stdout = stdout.into();
        self
    }
}

impl ProcessOutput {
    fn finished(status: ExitStatus, stdout: &[u8], stderr: &[u8]) -> Self {
        Self {
            exit_code: status.code(),
            success: status.success(),
            timed_out: false,
            stdout: String::from_utf8_lossy(stdout).into_owned(),
            stderr: String::from_utf8_lossy(stderr).into_owned(),
        }
    }

    /// Output for a program that could not be started.
    ///
    /// Mirrors a shell: 127 when the program does not exist, 126 when it
    /// exists but cannot be executed.
    fn not_started(program: &OsStr, err: &io::Error) -> Self {
        let code = match err.kind() {
            io::ErrorKind::NotFound => 127,
            _ => 126,
        };
        Self::exited(code).with_stderr(format!("{}: {err}", program.to_string_lossy()))
    }
}

/// Runs a command line to completion.
#[async_trait]
pub trait ProcessRunner: Send + Sync {
    /// Run `command`, killing it if it outlives `timeout`.
    ///
    /// `None` and a zero duration both mean "no timeout". A process that
    /// fails, times out or cannot be started is reported through
    /// [`ProcessOutput`], not as an error; errors are reserved for I/O
    /// failures while talking to a running child.
    async fn run(&self, command: &CommandLine, timeout: Option<Duration>) -> Result<ProcessOutput>;
}

/// Spawns real child processes with `tokio::process`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioRunner;

impl TokioRunner {
    /// Create a new runner.
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl ProcessRunner for TokioRunner {
    async fn run(&self, command: &CommandLine, timeout: Option<Duration>) -> Result<ProcessOutput> {
        debug!(%command, ?timeout, "spawning process");

        let spawned = Command::new(command.program())
            .args(command.args())
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn();

        let mut child = match spawned {
            Ok(child) => child,
            Err(err) => {
                warn!(%command, error = %err, "process could not be started");
                return Ok(ProcessOutput::not_started(command.program(), &err));
            }
        };

        let mut stdout = child.stdout.take();
        let mut stderr = child.stderr.take();
        let mut out = Vec::new();
        let mut err = Vec::new();

        let finished = {
            let collect = async {
                let (status, out_read, err_read) = tokio::join!(
                    child.wait(),
                    drain(&mut stdout, &mut out),
                    drain(&mut stderr, &mut err),
                );
                out_read.and(err_read).and(status)
            };

            match timeout.filter(|limit| !limit.is_zero()) {
                Some(limit) => tokio::time::timeout(limit, collect).await.ok(),
                None => Some(collect.await),
            }
        };

        let Some(status) = finished else {
            warn!(%command, ?timeout, "process timed out and was killed");
            if let Err(kill_err) = child.kill().await {
                debug!(error = %kill_err, "failed to kill timed-out process");
            }

            // Whatever the child wrote before it was killed is still buffered.
            let _ = tokio::time::timeout(DRAIN_GRACE, async {
                tokio::join!(drain(&mut stdout, &mut out), drain(&mut stderr, &mut err))
            })
            .await;

            return Ok(ProcessOutput::timed_out()
                .with_stdout(String::from_utf8_lossy(&out))
                .with_stderr(String::from_utf8_lossy(&err)));
        };

        let output = ProcessOutput::finished(status?, &out, &err);
        debug!(exit_code = ?output.exit_code, success = output.success, "process finished");

        Ok(output)
    }
}

/// Read `pipe` to its end, appending to `buf` chunk by chunk.
///
/// Bytes already appended survive if the future is dropped mid-read.
async fn drain<R>(pipe: &mut Option<R>, buf: &mut Vec<u8>) -> io::Result<()>
where
    R: AsyncRead + Unpin,
{
    let Some(reader) = pipe.as_mut() else {
        return Ok(());
    };

    let mut chunk = [0u8; 4096];
    loop {
        let read = reader.read(&mut chunk).await?;
        if read == 0 {
            return Ok(());
        }
        buf.extend_from_slice(&chunk[..read]);
    }
}
