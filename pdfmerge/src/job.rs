//! Merge job configuration and execution.
//!
//! A [`MergeJob`] accumulates merge parameters through chained setters and
//! performs the merge by running Ghostscript once:
//!
//! 1. require at least two inputs
//! 2. resolve the output path
//! 3. build the argument vector
//! 4. run it under the configured timeout
//! 5. check the exit status, then check the output file exists
//!
//! # Examples
//!
//! ```no_run
//! use pdfmerge::{CompressionPreset, MergeJob};
//!
//! # async fn example() -> pdfmerge::Result<()> {
//! let mut job = MergeJob::new();
//! job.add_file("chapter1.pdf")?
//!     .add_file("chapter2.pdf")?
//!     .set_preset(CompressionPreset::Ebook)
//!     .set_output_filename("book.pdf");
//!
//! let output = job.merge().await?;
//! println!("Wrote {}", output.display());
//! # Ok(())
//! # }
//! ```

use serde::Serialize;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

use crate::clock::{Clock, SystemClock};
use crate::command::CommandLine;
use crate::config::Config;
use crate::error::{PdfMergeError, Result};
use crate::preset::CompressionPreset;
use crate::runner::{ProcessRunner, TokioRunner};
use crate::utils::{default_output_filename, strip_trailing_separators};

/// Ghostscript binary looked up on `PATH` when no tool path is set.
#[cfg(windows)]
pub const DEFAULT_TOOL: &str = "gswin64c";

/// Ghostscript binary looked up on `PATH` when no tool path is set.
#[cfg(not(windows))]
pub const DEFAULT_TOOL: &str = "gs";

/// Timeout applied to the Ghostscript process unless overridden.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

/// Minimum number of inputs a merge accepts.
pub const MIN_INPUTS: usize = 2;

/// What a merge would do, without doing it.
#[derive(Debug, Clone, Serialize)]
pub struct MergePlan {
    /// Resolved output path.
    pub output: PathBuf,
    /// Ghostscript invocation.
    pub command: CommandLine,
    /// Timeout in seconds, if any.
    pub timeout_secs: Option<f64>,
}

/// Configuration and execution context for one Ghostscript merge.
///
/// Setters return `&mut Self` so calls chain; setters that validate return
/// `Result<&mut Self>` and chain with `?`.
#[derive(Clone)]
pub struct MergeJob {
    tool_path: PathBuf,
    preset: CompressionPreset,
    inputs: Vec<PathBuf>,
    output_file: Option<PathBuf>,
    output_folder: PathBuf,
    output_filename: Option<String>,
    timeout: Option<Duration>,
    runner: Arc<dyn ProcessRunner>,
    clock: Arc<dyn Clock>,
}

impl MergeJob {
    /// Create a job with default settings.
    ///
    /// Defaults: the `gs` binary from `PATH`, the `default` preset, no
    /// inputs, the system temp directory as output folder, a generated
    /// filename, and a 60 second timeout.
    pub fn new() -> Self {
        Self {
            tool_path: PathBuf::from(DEFAULT_TOOL),
            preset: CompressionPreset::default(),
            inputs: Vec::new(),
            output_file: None,
            output_folder: std::env::temp_dir(),
            output_filename: None,
            timeout: Some(DEFAULT_TIMEOUT),
            runner: Arc::new(TokioRunner::new()),
            clock: Arc::new(SystemClock),
        }
    }

    /// Build a job from a [`Config`], running every setter's validation.
    ///
    /// # Errors
    ///
    /// Returns the first validation error raised by the setters, e.g. a
    /// missing input file or output folder.
    pub fn from_config(config: &Config) -> Result<Self> {
        let mut job = Self::new();

        if let Some(ref tool) = config.tool_path {
            job.set_tool_path(tool);
        }

        job.set_preset(config.preset)
            .set_timeout(config.timeout())
            .add_files(&config.inputs)?;

        if let Some(ref folder) = config.output_folder {
            job.set_output_folder(folder)?;
        }
        if let Some(ref filename) = config.output_filename {
            job.set_output_filename(filename.clone());
        }
        if let Some(ref file) = config.output_file {
            job.set_output_file(file);
        }

        Ok(job)
    }

    /// Replace the process runner.
    pub fn with_runner(mut self, runner: Arc<dyn ProcessRunner>) -> Self {
        self.runner = runner;
        self
    }

    /// Replace the clock used for generated filenames.
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Set the Ghostscript binary.
    ///
    /// The path is not checked; a bad path fails when the merge runs.
    pub fn set_tool_path(&mut self, path: impl Into<PathBuf>) -> &mut Self {
        self.tool_path = path.into();
        self
    }

    /// Set the maximum runtime of the Ghostscript process.
    ///
    /// `None` disables the timeout. Values are passed to the runner as is.
    pub fn set_timeout(&mut self, timeout: Option<Duration>) -> &mut Self {
        self.timeout = timeout;
        self
    }

    /// Set the compression preset from its name.
    ///
    /// # Errors
    ///
    /// Returns [`PdfMergeError::InvalidArgument`] if `level` is not one of
    /// `none`, `screen`, `ebook`, `printer`, `prepress` or `default`. The
    /// configured preset is unchanged on error.
    pub fn set_compression_level(&mut self, level: &str) -> Result<&mut Self> {
        let preset = level.parse::<CompressionPreset>()?;
        Ok(self.set_preset(preset))
    }

    /// Set the compression preset.
    pub fn set_preset(&mut self, preset: CompressionPreset) -> &mut Self {
        debug!(%preset, "compression preset set");
        self.preset = preset;
        self
    }

    /// Append an input file.
    ///
    /// The file must exist now. It is not checked again at merge time, so a
    /// file removed in between surfaces as a Ghostscript failure.
    ///
    /// # Errors
    ///
    /// Returns [`PdfMergeError::FileNotFound`] if the path does not exist.
    pub fn add_file(&mut self, path: impl AsRef<Path>) -> Result<&mut Self> {
        let path = path.as_ref();

        if !path.exists() {
            return Err(PdfMergeError::file_not_found(path));
        }

        debug!(path = %path.display(), position = self.inputs.len() + 1, "input added");
        self.inputs.push(path.to_path_buf());
        Ok(self)
    }

    /// Append several input files, in order.
    ///
    /// Stops at the first missing file. Files before it stay appended.
    ///
    /// # Errors
    ///
    /// Returns [`PdfMergeError::FileNotFound`] for the first missing path.
    pub fn add_files<I, P>(&mut self, paths: I) -> Result<&mut Self>
    where
        I: IntoIterator<Item = P>,
        P: AsRef<Path>,
    {
        for path in paths {
            self.add_file(path)?;
        }
        Ok(self)
    }

    /// Set the full output path, overriding folder and filename.
    ///
    /// An empty path clears the override.
    pub fn set_output_file(&mut self, path: impl Into<PathBuf>) -> &mut Self {
        let path = path.into();
        self.output_file = (!path.as_os_str().is_empty()).then_some(path);
        self
    }

    /// Set the folder the merged file is written to.
    ///
    /// Trailing separators are stripped.
    ///
    /// # Errors
    ///
    /// Returns [`PdfMergeError::FolderNotFound`] if `path` is not an
    /// existing directory.
    pub fn set_output_folder(&mut self, path: impl AsRef<Path>) -> Result<&mut Self> {
        let path = path.as_ref();

        if !path.is_dir() {
            return Err(PdfMergeError::folder_not_found(path));
        }

        self.output_folder = strip_trailing_separators(path);
        Ok(self)
    }

    /// Set the output filename, used with the output folder.
    ///
    /// An empty name falls back to the generated name.
    pub fn set_output_filename(&mut self, name: impl Into<String>) -> &mut Self {
        let name = name.into();
        self.output_filename = (!name.is_empty()).then_some(name);
        self
    }

    /// Restore preset, inputs, output settings and timeout to their defaults.
    ///
    /// The tool path, runner and clock are kept.
    pub fn reset(&mut self) -> &mut Self {
        self.preset = CompressionPreset::default();
        self.inputs.clear();
        self.output_file = None;
        self.output_folder = std::env::temp_dir();
        self.output_filename = None;
        self.timeout = Some(DEFAULT_TIMEOUT);
        self
    }

    /// The Ghostscript binary.
    pub fn tool_path(&self) -> &Path {
        &self.tool_path
    }

    /// The compression preset.
    pub fn preset(&self) -> CompressionPreset {
        self.preset
    }

    /// Input files, in merge order.
    pub fn inputs(&self) -> &[PathBuf] {
        &self.inputs
    }

    /// The explicit output path, if set.
    pub fn output_file(&self) -> Option<&Path> {
        self.output_file.as_deref()
    }

    /// The output folder.
    pub fn output_folder(&self) -> &Path {
        &self.output_folder
    }

    /// The explicit output filename, if set.
    pub fn output_filename(&self) -> Option<&str> {
        self.output_filename.as_deref()
    }

    /// The process timeout.
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout
    }

    /// Resolve where the merged file will be written.
    ///
    /// Uses the explicit output file if set; otherwise joins the output
    /// folder with the output filename, or with a name generated from the
    /// current time.
    pub fn resolve_output_path(&self) -> PathBuf {
        if let Some(ref file) = self.output_file {
            return file.clone();
        }

        let filename = self
            .output_filename
            .clone()
            .unwrap_or_else(|| default_output_filename(self.clock.now()));

        self.output_folder.join(filename)
    }

    /// Build the Ghostscript command writing to `output`.
    pub fn command_for(&self, output: &Path) -> CommandLine {
        CommandLine::ghostscript(&self.tool_path, self.preset, output, &self.inputs)
    }

    /// Describe the merge without running it.
    ///
    /// # Errors
    ///
    /// Returns [`PdfMergeError::PreconditionFailed`] if fewer than two
    /// inputs are configured.
    pub fn plan(&self) -> Result<MergePlan> {
        self.ensure_enough_inputs()?;

        let output = self.resolve_output_path();
        let command = self.command_for(&output);

        Ok(MergePlan {
            output,
            command,
            timeout_secs: self.timeout.map(|t| t.as_secs_f64()),
        })
    }

    /// Merge the input files into one PDF.
    ///
    /// Returns the path of the merged file.
    ///
    /// # Errors
    ///
    /// - [`PdfMergeError::PreconditionFailed`] if fewer than two inputs are
    ///   configured; no process is spawned.
    /// - [`PdfMergeError::ProcessFailure`] if Ghostscript cannot be started,
    ///   exits unsuccessfully or is killed after the timeout.
    /// - [`PdfMergeError::ArtifactMissing`] if Ghostscript succeeds but the
    ///   output file does not exist.
    pub async fn merge(&self) -> Result<PathBuf> {
        let MergePlan {
            output, command, ..
        } = self.plan()?;

        info!(
            inputs = self.inputs.len(),
            preset = %self.preset,
            output = %output.display(),
            "merging PDF files"
        );

        let result = self.runner.run(&command, self.timeout).await?;

        if !result.success {
            warn!(
                exit_code = ?result.exit_code,
                timed_out = result.timed_out,
                "ghostscript failed"
            );
            return Err(PdfMergeError::ProcessFailure {
                command: command.to_string(),
                exit_code: result.exit_code,
                timed_out: result.timed_out,
                stdout: result.stdout,
                stderr: result.stderr,
            });
        }

        if !output.exists() {
            return Err(PdfMergeError::artifact_missing(output));
        }

        info!(output = %output.display(), "merge complete");
        Ok(output)
    }

    fn ensure_enough_inputs(&self) -> Result<()> {
        if self.inputs.len() < MIN_INPUTS {
            return Err(PdfMergeError::precondition_failed(format!(
                "At least two PDF files are required for merging ({} given)",
                self.inputs.len()
            )));
        }
        Ok(())
    }
}

impl Default for MergeJob {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for MergeJob {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MergeJob")
            .field("tool_path", &self.tool_path)
            .field("preset", &self.preset)
            .field("inputs", &self.inputs)
            .field("output_file", &self.output_file)
            .field("output_folder", &self.output_folder)
            .field("output_filename", &self.output_filename)
            .field("timeout", &self.timeout)
            .finish_non_exhaustive()
    }
}
