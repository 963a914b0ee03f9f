//! Error types for pdfmerge.
//!
//! Errors fall into two groups:
//!
//! - **Configuration errors** are raised synchronously by the [`MergeJob`]
//!   setters, before any process is spawned: unknown presets, missing input
//!   files, missing output folders.
//! - **Execution errors** are raised by [`MergeJob::merge`]: too few inputs,
//!   a tool that could not be started, failed or timed out, or a tool that
//!   reported success without producing the output file.
//!
//! [`MergeJob`]: crate::MergeJob
//! [`MergeJob::merge`]: crate::MergeJob::merge

use std::io;
use std::path::PathBuf;

/// Result type alias for pdfmerge operations.
pub type Result<T> = std::result::Result<T, PdfMergeError>;

/// Main error type for pdfmerge operations.
#[derive(Debug, thiserror::Error)]
pub enum PdfMergeError {
    /// A caller-supplied value is outside its domain.
    #[error("Invalid argument: {message}")]
    InvalidArgument {
        /// What was wrong with the value.
        message: String,
    },

    /// An input file did not exist when it was added.
    #[error("File not found: {}", path.display())]
    FileNotFound {
        /// Path that was not found.
        path: PathBuf,
    },

    /// The output folder does not exist or is not a directory.
    #[error("Folder does not exist: {}", path.display())]
    FolderNotFound {
        /// Path that was not a directory.
        path: PathBuf,
    },

    /// The job is not in a state that allows merging.
    #[error("{message}")]
    PreconditionFailed {
        /// Description of the unmet precondition.
        message: String,
    },

    /// The external tool exited unsuccessfully, ran past its timeout, or
    /// could not be started (reported with exit code 127 or 126, the way a
    /// shell reports it).
    #[error(
        "Ghostscript failed ({}): {command}{}",
        describe_status(*exit_code, *timed_out),
        describe_output(stderr, stdout)
    )]
    ProcessFailure {
        /// The rendered command line.
        command: String,
        /// Exit code, when the process exited normally.
        exit_code: Option<i32>,
        /// Whether the process was killed because the timeout elapsed.
        timed_out: bool,
        /// Captured standard output.
        stdout: String,
        /// Captured standard error.
        stderr: String,
    },

    /// The tool exited successfully but the output file is missing.
    #[error("Merging failed: output file not created: {}", path.display())]
    ArtifactMissing {
        /// The output path that was expected to exist.
        path: PathBuf,
    },

    /// Generic I/O error.
    #[error("I/O error: {source}")]
    Io {
        /// Underlying I/O error.
        #[from]
        source: io::Error,
    },
}

fn describe_status(exit_code: Option<i32>, timed_out: bool) -> String {
    match (timed_out, exit_code) {
        (true, _) => "timed out".to_string(),
        (false, Some(code)) => format!("exit code {code}"),
        (false, None) => "terminated by signal".to_string(),
    }
}

fn describe_output(stderr: &str, stdout: &str) -> String {
    let text = if stderr.trim().is_empty() { stdout } else { stderr };
    let text = text.trim();
    if text.is_empty() {
        String::new()
    } else {
        format!("\n  Output: {text}")
    }
}

impl PdfMergeError {
    /// Create an InvalidArgument error.
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::InvalidArgument {
            message: message.into(),
        }
    }

    /// Create a FileNotFound error.
    pub fn file_not_found(path: impl Into<PathBuf>) -> Self {
        Self::FileNotFound { path: path.into() }
    }

    /// Create a FolderNotFound error.
    pub fn folder_not_found(path: impl Into<PathBuf>) -> Self {
        Self::FolderNotFound { path: path.into() }
    }

    /// Create a PreconditionFailed error.
    pub fn precondition_failed(message: impl Into<String>) -> Self {
        Self::PreconditionFailed {
            message: message.into(),
        }
    }

    /// Create an ArtifactMissing error.
    pub fn artifact_missing(path: impl Into<PathBuf>) -> Self {
        Self::ArtifactMissing { path: path.into() }
    }

    /// Whether this error rejects a caller-supplied configuration value.
    ///
    /// Unknown presets, missing input files and missing output folders all
    /// count, since they are detected before any process is spawned.
    pub fn is_invalid_argument(&self) -> bool {
        matches!(
            self,
            Self::InvalidArgument { .. } | Self::FileNotFound { .. } | Self::FolderNotFound { .. }
        )
    }

    /// Exit code of the failed tool, if it exited normally.
    pub fn tool_exit_code(&self) -> Option<i32> {
        match self {
            Self::ProcessFailure { exit_code, .. } => *exit_code,
            _ => None,
        }
    }

    /// Get the process exit code for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::InvalidArgument { .. } => 1,
            Self::FileNotFound { .. } => 2,
            Self::FolderNotFound { .. } => 2,
            Self::PreconditionFailed { .. } => 1,
            Self::ProcessFailure {
                timed_out: true, ..
            } => 124,
            Self::ProcessFailure { .. } => 3,
            Self::ArtifactMissing { .. } => 4,
            Self::Io { .. } => 5,
        }
    }
}
