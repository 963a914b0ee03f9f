//! CLI argument parsing for pdfmerge.
//!
//! This module defines the command-line interface structure using `clap`.
//! It handles argument parsing, validation, and help text generation.

use clap::Parser;
use std::path::{Path, PathBuf};

use pdfmerge::config::Config;
use pdfmerge::error::{PdfMergeError, Result};
use pdfmerge::utils::collect_paths_for_patterns;

/// Merge PDF files into a single document with Ghostscript.
///
/// pdfmerge runs Ghostscript's pdfwrite device over the input files, in
/// order, optionally applying one of its compression presets.
#[derive(Parser, Debug)]
#[command(name = "pdfmerge")]
#[command(version)]
#[command(about = "Merge PDF files into a single document with Ghostscript", long_about = None)]
#[command(author)]
#[command(arg_required_else_help = true)]
pub struct Cli {
    /// Input PDF files to merge (in order)
    ///
    /// Specify multiple files or use glob patterns.
    /// Files are merged in the order provided.
    ///
    /// Examples:
    ///   pdfmerge a.pdf b.pdf -o merged.pdf
    ///   pdfmerge 'chapter*.pdf' -d out/ -N book.pdf
    #[arg(value_name = "FILE")]
    pub inputs: Vec<String>,

    /// Output PDF file path
    ///
    /// Overrides --output-dir and --output-name.
    #[arg(short, long, value_name = "FILE", conflicts_with_all = ["output_dir", "output_name"])]
    pub output: Option<PathBuf>,

    /// Folder the merged PDF is written to
    ///
    /// Defaults to the system temporary directory.
    #[arg(short = 'd', long, value_name = "DIR")]
    pub output_dir: Option<PathBuf>,

    /// File name of the merged PDF inside the output folder
    ///
    /// Defaults to merged_<YYYYMMDD>_<HHMMSS>.pdf.
    #[arg(short = 'N', long, value_name = "NAME")]
    pub output_name: Option<String>,

    /// Compression preset passed to Ghostscript
    ///
    /// - none: no -dPDFSETTINGS switch
    /// - screen: low resolution, smallest files
    /// - ebook: medium resolution
    /// - printer: high resolution
    /// - prepress: color preserving, highest resolution
    /// - default: Ghostscript's general-purpose preset
    #[arg(short, long, value_name = "LEVEL")]
    #[arg(value_parser = ["none", "screen", "ebook", "printer", "prepress", "default"])]
    pub compression: Option<String>,

    /// Ghostscript binary to run
    #[arg(long = "gs", value_name = "PATH", env = "PDFMERGE_GS")]
    pub gs_path: Option<PathBuf>,

    /// Maximum Ghostscript runtime in seconds (0 disables)
    #[arg(short, long, value_name = "SECS", conflicts_with = "no_timeout")]
    pub timeout: Option<f64>,

    /// Let Ghostscript run without a time limit
    #[arg(long)]
    pub no_timeout: bool,

    /// Read settings from a JSON file
    ///
    /// Command-line arguments override values from the file.
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Read input file list from a file (one path per line)
    ///
    /// Lines starting with '#' and empty lines are ignored.
    /// Paths from the file are appended after direct inputs.
    #[arg(long, value_name = "FILE")]
    pub input_list: Option<PathBuf>,

    /// Dry run - show the Ghostscript command without running it
    #[arg(short = 'n', long)]
    pub dry_run: bool,

    /// Print the dry-run plan as JSON
    #[arg(long, requires = "dry_run")]
    pub json: bool,

    /// Verbose output - show the command and timing details
    #[arg(short, long)]
    pub verbose: bool,

    /// Suppress all non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,
}

impl Cli {
    /// Convert CLI arguments into a validated Config.
    ///
    /// Values from `--config` form the base; every flag given on the
    /// command line overrides the corresponding field. Inputs from the
    /// command line and `--input-list` are appended to those from the file.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The config file or input list cannot be read
    /// - A glob pattern is malformed
    /// - Configuration validation fails
    pub async fn to_config(&self) -> Result<Config> {
        let mut config = match self.config {
            Some(ref path) => Config::from_json_file(path)?,
            None => Config::default(),
        };

        config.inputs.extend(self.get_all_inputs().await?);

        if let Some(ref gs) = self.gs_path {
            config.tool_path = Some(gs.clone());
        }
        if let Some(ref level) = self.compression {
            config.preset = level.parse()?;
        }
        if let Some(ref output) = self.output {
            config.output_file = Some(output.clone());
            config.output_folder = None;
            config.output_filename = None;
        }
        if let Some(ref dir) = self.output_dir {
            config.output_folder = Some(dir.clone());
            config.output_file = None;
        }
        if let Some(ref name) = self.output_name {
            config.output_filename = Some(name.clone());
            config.output_file = None;
        }
        if self.no_timeout {
            config.timeout_secs = None;
        } else if let Some(secs) = self.timeout {
            config.timeout_secs = Some(secs);
        }

        config.dry_run |= self.dry_run;
        config.verbose |= self.verbose;
        config.quiet |= self.quiet;

        config.validate()?;

        Ok(config)
    }

    /// Get all input paths including those from input-list file.
    ///
    /// Direct inputs are glob-expanded first; paths from the list file are
    /// appended after them, verbatim.
    ///
    /// # Errors
    ///
    /// Returns an error if the input list file cannot be read or a pattern
    /// is malformed.
    pub async fn get_all_inputs(&self) -> Result<Vec<PathBuf>> {
        let mut all_inputs = collect_paths_for_patterns(&self.inputs)?;

        if let Some(ref input_list_path) = self.input_list {
            let additional_inputs = read_input_list(input_list_path).await?;
            all_inputs.extend(additional_inputs);
        }

        Ok(all_inputs)
    }
}

/// Read input paths from a file.
///
/// Reads a file containing one path per line. Lines starting with '#'
/// are treated as comments and ignored. Empty lines are skipped.
async fn read_input_list(path: &Path) -> Result<Vec<PathBuf>> {
    use tokio::fs::File;
    use tokio::io::{AsyncBufReadExt, BufReader};

    let file = File::open(path).await.map_err(|err| {
        PdfMergeError::invalid_argument(format!(
            "Failed to read input list file {}: {err}",
            path.display()
        ))
    })?;

    let mut lines = BufReader::new(file).lines();
    let mut paths = Vec::new();

    while let Some(line) = lines.next_line().await? {
        let line = line.trim();

        // Skip empty lines and comments
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        paths.push(PathBuf::from(line));
    }

    Ok(paths)
}
