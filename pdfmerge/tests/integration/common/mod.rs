//! Shared helpers for pdfmerge integration tests.
//!
//! Tests never need Ghostscript: [`FakeRunner`] stands in for it and records
//! every command it is asked to run.

#![allow(dead_code)]

use async_trait::async_trait;
use chrono::{NaiveDate, NaiveDateTime};
use pdfmerge::{CommandLine, ProcessOutput, ProcessRunner, Result};
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tempfile::TempDir;

/// What the fake tool does when run.
#[derive(Debug, Clone)]
pub enum Behavior {
    /// Write the file named by `-sOutputFile=` and exit 0.
    CreateOutput,
    /// Return this output without touching the filesystem.
    Respond(ProcessOutput),
}

/// A [`ProcessRunner`] that records calls instead of spawning processes.
#[derive(Debug)]
pub struct FakeRunner {
    behavior: Behavior,
    calls: Mutex<Vec<(CommandLine, Option<Duration>)>>,
}

impl FakeRunner {
    /// A runner that behaves like a successful Ghostscript run.
    pub fn succeeding() -> Arc<Self> {
        Self::with_behavior(Behavior::CreateOutput)
    }

    /// A runner that returns `output` verbatim.
    pub fn responding(output: ProcessOutput) -> Arc<Self> {
        Self::with_behavior(Behavior::Respond(output))
    }

    fn with_behavior(behavior: Behavior) -> Arc<Self> {
        Arc::new(Self {
            behavior,
            calls: Mutex::new(Vec::new()),
        })
    }

    /// Number of commands run so far.
    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    /// The most recent command and timeout.
    pub fn last_call(&self) -> (CommandLine, Option<Duration>) {
        self.calls
            .lock()
            .unwrap()
            .last()
            .cloned()
            .expect("runner was never called")
    }
}

#[async_trait]
impl ProcessRunner for FakeRunner {
    async fn run(&self, command: &CommandLine, timeout: Option<Duration>) -> Result<ProcessOutput> {
        self.calls.lock().unwrap().push((command.clone(), timeout));

        match &self.behavior {
            Behavior::CreateOutput => {
                let output = output_arg(command).expect("command has no -sOutputFile=");
                std::fs::write(&output, b"%PDF-1.4\n%merged\n")?;
                Ok(ProcessOutput::exited(0))
            }
            Behavior::Respond(output) => Ok(output.clone()),
        }
    }
}

/// Extract the path from the `-sOutputFile=` argument.
pub fn output_arg(command: &CommandLine) -> Option<PathBuf> {
    command.args().iter().find_map(|arg| {
        arg.to_str()
            .and_then(|s| s.strip_prefix("-sOutputFile="))
            .map(PathBuf::from)
    })
}

/// Input paths at the tail of the command, after `-sOutputFile=`.
pub fn input_args(command: &CommandLine) -> Vec<PathBuf> {
    let args = command.args();
    let position = args
        .iter()
        .position(|arg| arg.to_string_lossy().starts_with("-sOutputFile="))
        .expect("command has no -sOutputFile=");
    args[position + 1..].iter().map(PathBuf::from).collect()
}

/// Whether any argument equals `expected`.
pub fn has_arg(command: &CommandLine, expected: &str) -> bool {
    command.args().iter().any(|arg| arg == &OsString::from(expected))
}

/// Create placeholder input files in `dir`.
///
/// The contents only need to exist; the fake runner never reads them.
pub fn create_inputs(dir: &TempDir, names: &[&str]) -> Vec<PathBuf> {
    names
        .iter()
        .map(|name| {
            let path = dir.path().join(name);
            std::fs::write(&path, b"%PDF-1.4\n%%EOF\n").expect("Failed to create input file");
            path
        })
        .collect()
}

/// The instant used by [`fixed_clock`]: 2024-06-01 08:09:10.
pub fn fixed_instant() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2024, 6, 1)
        .and_then(|d| d.and_hms_opt(8, 9, 10))
        .expect("valid date")
}

/// A clock frozen at [`fixed_instant`].
pub fn fixed_clock() -> Arc<pdfmerge::clock::FixedClock> {
    Arc::new(pdfmerge::clock::FixedClock(fixed_instant()))
}

/// Whether `path` is inside `dir` (directly).
pub fn is_direct_child(path: &Path, dir: &Path) -> bool {
    path.parent() == Some(dir)
}
