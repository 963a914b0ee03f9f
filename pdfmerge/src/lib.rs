//! pdfmerge - Merge PDF files into a single document with Ghostscript.
//!
//! This library does not parse PDFs. It builds a Ghostscript `pdfwrite`
//! invocation from a fluent job configuration, runs it under a timeout and
//! checks the result. It provides:
//!
//! - Ordered input collection with eager existence checks
//! - Ghostscript compression presets (`-dPDFSETTINGS`)
//! - Output path resolution with timestamped default names
//! - Process execution with timeout and captured diagnostics
//!
//! # Examples
//!
//! ## Basic Merge
//!
//! ```no_run
//! use pdfmerge::MergeJob;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let mut job = MergeJob::new();
//! job.add_files(["a.pdf", "b.pdf"])?
//!     .set_compression_level("ebook")?
//!     .set_output_file("merged.pdf");
//!
//! let output = job.merge().await?;
//! println!("Created {}", output.display());
//! # Ok(())
//! # }
//! ```
//!
//! ## Inspecting the Command
//!
//! ```no_run
//! use pdfmerge::{CompressionPreset, MergeJob};
//!
//! # fn example() -> pdfmerge::Result<()> {
//! let mut job = MergeJob::new();
//! job.add_files(["a.pdf", "b.pdf"])?
//!     .set_preset(CompressionPreset::None);
//!
//! let plan = job.plan()?;
//! println!("{}", plan.command);
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod clock;
pub mod command;
pub mod config;
pub mod error;
pub mod job;
pub mod preset;
pub mod runner;
pub mod utils;

// Re-export commonly used types
pub use command::CommandLine;
pub use config::Config;
pub use error::{PdfMergeError, Result};
pub use job::{MergePlan, MergeJob};
pub use preset::CompressionPreset;
pub use runner::{ProcessOutput, ProcessRunner, TokioRunner};

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name.
pub const NAME: &str = env!("CARGO_PKG_NAME");
