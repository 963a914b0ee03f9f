//! Terminal output for the pdfmerge binary.
//!
//! Results (the merged path, dry-run plans) go to stdout and are printed in
//! every mode so scripts can capture them. Decorated messages follow the
//! quiet/verbose settings; warnings go to stderr.

use pdfmerge::{Config, MergePlan};
use std::io::{self, IsTerminal};
use std::path::Path;
use std::time::Duration;

/// Kind of decorated message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tone {
    /// Completed step.
    Success,
    /// Something the user should know about; shown even when quiet.
    Warning,
    /// Verbose-only detail.
    Debug,
}

impl Tone {
    fn prefix(self) -> &'static str {
        match self {
            Tone::Success => "✓ ",
            Tone::Warning => "⚠ ",
            Tone::Debug => "→ ",
        }
    }

    fn ansi(self) -> &'static str {
        match self {
            Tone::Success => "\x1b[32m",
            Tone::Warning => "\x1b[33m",
            Tone::Debug => "\x1b[36m",
        }
    }
}

/// Prints results and messages according to the configured verbosity.
pub struct OutputFormatter {
    quiet: bool,
    verbose: bool,
    colored: bool,
}

impl OutputFormatter {
    /// Formatter for the quiet/verbose flags of `config`.
    pub fn from_config(config: &Config) -> Self {
        Self {
            quiet: config.quiet,
            verbose: config.verbose,
            colored: io::stdout().is_terminal() && std::env::var_os("TERM").is_some(),
        }
    }

    /// Whether verbose details are printed.
    pub fn is_verbose(&self) -> bool {
        self.verbose
    }

    /// Warn on stderr, regardless of quiet mode.
    pub fn warning(&self, message: &str) {
        eprintln!("{}", self.render(Tone::Warning, message));
    }

    /// Print a message in verbose mode only.
    pub fn debug(&self, message: &str) {
        if self.verbose {
            println!("{}", self.render(Tone::Debug, message));
        }
    }

    /// Print an indented `label: value` line in verbose mode only.
    pub fn detail(&self, label: &str, value: &str) {
        if self.verbose {
            println!("  {label}: {value}");
        }
    }

    /// Print a heading unless quiet.
    pub fn section(&self, title: &str) {
        if !self.quiet {
            println!("\n{title}");
        }
    }

    /// Print a dry-run plan as text.
    ///
    /// The command line itself is printed even in quiet mode.
    pub fn plan(&self, plan: &MergePlan) {
        if !self.quiet {
            println!("Output:  {}", plan.output.display());
            println!("Timeout: {}", format_timeout(plan.timeout_secs));
        }
        println!("{}", plan.command);
    }

    /// Report a finished merge. The path itself is always printed.
    pub fn merged(&self, path: &Path, inputs: usize, elapsed: Duration) {
        if self.verbose {
            let summary = format!(
                "Merged {inputs} files in {:.2}s",
                elapsed.as_secs_f64()
            );
            println!("{}", self.render(Tone::Success, &summary));
        }
        println!("{}", path.display());
    }

    /// Apply the tone's prefix and, on a color terminal, its color.
    pub fn render(&self, tone: Tone, message: &str) -> String {
        if self.colored {
            format!("{}{}{message}\x1b[0m", tone.ansi(), tone.prefix())
        } else {
            format!("{}{message}", tone.prefix())
        }
    }
}

/// Human-readable timeout, `"none"` when disabled.
pub fn format_timeout(timeout_secs: Option<f64>) -> String {
    match timeout_secs {
        Some(secs) if secs > 0.0 => format!("{secs}s"),
        _ => "none".to_string(),
    }
}
