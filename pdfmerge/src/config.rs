//! Configuration module for pdfmerge.
//!
//! [`Config`] is the serializable form of a merge job's settings. The CLI
//! builds one from its arguments (optionally layered over a JSON file),
//! validates it, and turns it into a [`MergeJob`](crate::MergeJob) through
//! [`MergeJob::from_config`](crate::MergeJob::from_config). It handles:
//! - Validation of argument combinations
//! - Application of defaults
//! - Conversion of the timeout from seconds

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::{PdfMergeError, Result};
use crate::job::{DEFAULT_TIMEOUT, MIN_INPUTS};
use crate::preset::CompressionPreset;

/// Complete configuration for a merge operation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Ghostscript binary (`None` = look up `gs` on `PATH`).
    pub tool_path: Option<PathBuf>,

    /// Compression preset.
    pub preset: CompressionPreset,

    /// Input PDF file paths (in merge order).
    pub inputs: Vec<PathBuf>,

    /// Explicit output path; overrides folder and filename.
    pub output_file: Option<PathBuf>,

    /// Output folder (`None` = system temp directory).
    pub output_folder: Option<PathBuf>,

    /// Output filename (`None` = generated from the current time).
    pub output_filename: Option<String>,

    /// Timeout in seconds. `None` or `0` disables the timeout.
    pub timeout_secs: Option<f64>,

    /// Print the plan instead of running Ghostscript.
    pub dry_run: bool,

    /// Verbose output mode.
    pub verbose: bool,

    /// Quiet mode - suppress non-error output.
    pub quiet: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            tool_path: None,
            preset: CompressionPreset::default(),
            inputs: Vec::new(),
            output_file: None,
            output_folder: None,
            output_filename: None,
            timeout_secs: Some(DEFAULT_TIMEOUT.as_secs_f64()),
            dry_run: false,
            verbose: false,
            quiet: false,
        }
    }
}

impl Config {
    /// Load a configuration from a JSON file.
    ///
    /// Missing fields take their default values.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or is not valid JSON for
    /// this structure.
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        serde_json::from_str(&contents).map_err(|err| {
            PdfMergeError::invalid_argument(format!(
                "Invalid config file {}: {err}",
                path.display()
            ))
        })
    }

    /// The timeout as a duration; `None` when disabled.
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs
            .filter(|secs| *secs > 0.0)
            .and_then(|secs| Duration::try_from_secs_f64(secs).ok())
    }

    /// Validate the configuration.
    ///
    /// Checks for logical inconsistencies and invalid combinations. File
    /// existence is left to the job's setters.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Fewer than two input files are specified
    /// - Verbose and quiet modes are both enabled
    /// - The timeout is negative or not a number
    /// - An output file is combined with an output folder or filename
    /// - The output file is also an input
    pub fn validate(&self) -> Result<()> {
        if self.inputs.len() < MIN_INPUTS {
            return Err(PdfMergeError::precondition_failed(format!(
                "At least two PDF files are required for merging ({} given)",
                self.inputs.len()
            )));
        }

        if self.verbose && self.quiet {
            return Err(PdfMergeError::invalid_argument(
                "Cannot use both --verbose and --quiet",
            ));
        }

        if let Some(secs) = self.timeout_secs
            && (!secs.is_finite() || secs < 0.0)
        {
            return Err(PdfMergeError::invalid_argument(format!(
                "Invalid timeout: {secs}. Must be a non-negative number of seconds"
            )));
        }

        if let Some(ref output) = self.output_file {
            if self.output_folder.is_some() || self.output_filename.is_some() {
                return Err(PdfMergeError::invalid_argument(
                    "An output file cannot be combined with an output folder or filename",
                ));
            }

            if self.inputs.contains(output) {
                return Err(PdfMergeError::invalid_argument(format!(
                    "Output file cannot be the same as an input file: {}",
                    output.display()
                )));
            }
        }

        Ok(())
    }
}
