//! pdfmerge - Merge PDF files into a single document with Ghostscript.

mod cli;
mod output;

use clap::Parser;
use std::process;
use std::time::Instant;
use tracing_subscriber::EnvFilter;

use crate::cli::Cli;
use crate::output::{OutputFormatter, format_timeout};
use pdfmerge::config::Config;
use pdfmerge::error::{PdfMergeError, Result};
use pdfmerge::job::{MergeJob, MergePlan};

#[tokio::main]
async fn main() {
    // Parse CLI arguments
    let cli = Cli::parse();

    init_logging(cli.verbose);

    // Run the application and handle errors
    if let Err(err) = run(cli).await {
        eprintln!("Error: {err}");
        process::exit(err.exit_code());
    }
}

/// Install the stderr log subscriber.
///
/// `RUST_LOG` wins when set; otherwise only warnings are shown, or debug
/// events from pdfmerge under `--verbose`.
fn init_logging(verbose: bool) {
    let default = if verbose { "warn,pdfmerge=debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

/// Main application logic.
async fn run(cli: Cli) -> Result<()> {
    let json = cli.json;
    let config = cli.to_config().await?;
    let formatter = OutputFormatter::from_config(&config);

    let mut job = MergeJob::from_config(&config)?;
    let plan = pin_plan(&mut job)?;

    if config.dry_run {
        return print_plan(&plan, &formatter, json);
    }

    if formatter.is_verbose() {
        formatter.section(&format!("{} v{}", pdfmerge::NAME, pdfmerge::VERSION));
        describe_job(&job, &config, &formatter);
    }

    if plan.output.exists() {
        formatter.warning(&format!(
            "Overwriting existing file: {}",
            plan.output.display()
        ));
    }

    formatter.debug(&format!("Running: {}", plan.command));

    let started = Instant::now();
    let merged = job.merge().await?;

    formatter.merged(&merged, job.inputs().len(), started.elapsed());

    Ok(())
}

/// Plan the merge and fix its output path on the job.
///
/// A generated name reads the clock; pinning it makes the merge write the
/// path that was reported, even if the second changes in between.
fn pin_plan(job: &mut MergeJob) -> Result<MergePlan> {
    let plan = job.plan()?;
    job.set_output_file(&plan.output);
    Ok(plan)
}

/// Print the planned invocation without running it.
fn print_plan(plan: &MergePlan, formatter: &OutputFormatter, json: bool) -> Result<()> {
    if json {
        let rendered = serde_json::to_string_pretty(plan)
            .map_err(|err| PdfMergeError::from(std::io::Error::other(err)))?;
        println!("{rendered}");
    } else {
        formatter.plan(plan);
    }

    Ok(())
}

/// Verbose summary of the resolved job.
fn describe_job(job: &MergeJob, config: &Config, formatter: &OutputFormatter) {
    formatter.detail("Ghostscript", &job.tool_path().display().to_string());
    formatter.detail("Compression", job.preset().name());
    formatter.detail("Timeout", &format_timeout(config.timeout().map(|t| t.as_secs_f64())));
    formatter.detail("Inputs", &job.inputs().len().to_string());
    for (index, input) in job.inputs().iter().enumerate() {
        formatter.detail(&format!("  {}", index + 1), &input.display().to_string());
    }
}
