//! Integration tests for error handling and edge cases.

use pdfmerge::{CompressionPreset, MergeJob, PdfMergeError, ProcessOutput, Result};
use rstest::rstest;
use serial_test::serial;
use std::path::PathBuf;
use tempfile::tempdir;

use crate::common::{FakeRunner, create_inputs};

#[rstest]
#[case(0)]
#[case(1)]
#[tokio::test]
async fn test_too_few_inputs_spawns_nothing(#[case] count: usize) -> Result<()> {
    let dir = tempdir()?;
    let inputs = create_inputs(&dir, &["a.pdf", "b.pdf"]);
    let runner = FakeRunner::succeeding();

    let mut job = MergeJob::new().with_runner(runner.clone());
    job.add_files(&inputs[..count])?
        .set_output_folder(dir.path())?;

    let err = job.merge().await.unwrap_err();

    assert!(matches!(err, PdfMergeError::PreconditionFailed { .. }));
    assert!(err.to_string().contains("At least two PDF files"));
    assert_eq!(runner.call_count(), 0);
    Ok(())
}

#[tokio::test]
async fn test_duplicate_single_file_counts_twice() -> Result<()> {
    let dir = tempdir()?;
    let inputs = create_inputs(&dir, &["same.pdf"]);

    let mut job = MergeJob::new().with_runner(FakeRunner::succeeding());
    job.add_file(&inputs[0])?
        .add_file(&inputs[0])?
        .set_output_folder(dir.path())?;

    assert!(job.merge().await.is_ok());
    Ok(())
}

#[rstest]
#[case("maximum", None)]
#[case("standard", None)]
#[case("/", None)]
#[case("Screen ", Some(CompressionPreset::Screen))]
#[case("/default", Some(CompressionPreset::Default))]
#[case("PREPRESS", Some(CompressionPreset::Prepress))]
#[case("", Some(CompressionPreset::None))]
fn test_set_compression_level_boundary(
    #[case] level: &str,
    #[case] expected: Option<CompressionPreset>,
) {
    let mut job = MergeJob::new();
    job.set_preset(CompressionPreset::Ebook);
    let result = job.set_compression_level(level).map(|job| job.preset());

    match expected {
        Some(preset) => assert_eq!(result.unwrap(), preset),
        None => {
            assert!(result.unwrap_err().is_invalid_argument());
            assert_eq!(job.preset(), CompressionPreset::Ebook);
        }
    }
}

#[test]
fn test_add_files_keeps_entries_before_missing_one() -> Result<()> {
    let dir = tempdir()?;
    let valid = create_inputs(&dir, &["a.pdf", "b.pdf", "d.pdf"]);
    let missing = dir.path().join("c.pdf");

    let mut job = MergeJob::new();
    let batch = vec![valid[0].clone(), valid[1].clone(), missing.clone(), valid[2].clone()];
    let err = job.add_files(&batch).unwrap_err();

    assert!(err.is_invalid_argument());
    match err {
        PdfMergeError::FileNotFound { path } => assert_eq!(path, missing),
        other => panic!("expected FileNotFound, got {other:?}"),
    }
    assert_eq!(job.inputs(), &valid[..2]);
    Ok(())
}

#[test]
fn test_missing_output_folder() {
    let mut job = MergeJob::new();
    let err = job.set_output_folder("/definitely/not/a/folder").unwrap_err();

    assert!(err.is_invalid_argument());
    assert!(err.to_string().contains("Folder does not exist"));
    assert_eq!(job.output_folder(), std::env::temp_dir());
}

#[rstest]
#[case(1)]
#[case(2)]
#[case(127)]
#[tokio::test]
async fn test_nonzero_exit_is_process_failure(#[case] code: i32) -> Result<()> {
    let dir = tempdir()?;
    let inputs = create_inputs(&dir, &["a.pdf", "b.pdf"]);
    let runner = FakeRunner::responding(
        ProcessOutput::exited(code)
            .with_stderr("GPL Ghostscript: Unrecoverable error")
            .with_stdout("Error: /undefined in --run--"),
    );

    let mut job = MergeJob::new().with_runner(runner);
    job.add_files(&inputs)?.set_output_folder(dir.path())?;

    let err = job.merge().await.unwrap_err();

    assert_eq!(err.tool_exit_code(), Some(code));
    match err {
        PdfMergeError::ProcessFailure {
            exit_code,
            timed_out,
            stdout,
            stderr,
            command,
        } => {
            assert_eq!(exit_code, Some(code));
            assert!(!timed_out);
            assert!(stderr.contains("Unrecoverable error"));
            assert!(stdout.contains("/undefined"));
            assert!(command.starts_with("gs") || command.starts_with("gswin64c"));
        }
        other => panic!("expected ProcessFailure, got {other:?}"),
    }
    Ok(())
}

#[tokio::test]
async fn test_timeout_is_process_failure() -> Result<()> {
    let dir = tempdir()?;
    let inputs = create_inputs(&dir, &["a.pdf", "b.pdf"]);

    let mut job = MergeJob::new().with_runner(FakeRunner::responding(ProcessOutput::timed_out()));
    job.add_files(&inputs)?.set_output_folder(dir.path())?;

    let err = job.merge().await.unwrap_err();

    assert!(matches!(
        err,
        PdfMergeError::ProcessFailure {
            timed_out: true,
            exit_code: None,
            ..
        }
    ));
    assert_eq!(err.exit_code(), 124);
    Ok(())
}

#[tokio::test]
async fn test_success_without_output_is_artifact_missing() -> Result<()> {
    let dir = tempdir()?;
    let inputs = create_inputs(&dir, &["a.pdf", "b.pdf"]);
    let target = dir.path().join("never-written.pdf");

    let mut job = MergeJob::new().with_runner(FakeRunner::responding(ProcessOutput::exited(0)));
    job.add_files(&inputs)?.set_output_file(&target);

    let err = job.merge().await.unwrap_err();

    match err {
        PdfMergeError::ArtifactMissing { path } => assert_eq!(path, target),
        other => panic!("expected ArtifactMissing, got {other:?}"),
    }
    assert!(!target.exists());
    Ok(())
}

#[tokio::test]
async fn test_input_removed_after_add_is_not_revalidated() -> Result<()> {
    let dir = tempdir()?;
    let inputs = create_inputs(&dir, &["a.pdf", "b.pdf"]);
    let runner = FakeRunner::responding(ProcessOutput::exited(1).with_stderr("No such file"));

    let mut job = MergeJob::new().with_runner(runner.clone());
    job.add_files(&inputs)?.set_output_folder(dir.path())?;
    std::fs::remove_file(&inputs[1])?;

    let err = job.merge().await.unwrap_err();

    // The tool is still run with the vanished file and its failure is reported.
    assert!(matches!(err, PdfMergeError::ProcessFailure { .. }));
    assert_eq!(runner.call_count(), 1);
    assert_eq!(job.inputs()[1], inputs[1]);
    Ok(())
}

#[tokio::test]
#[serial]
async fn test_missing_tool_is_process_failure() -> Result<()> {
    let dir = tempdir()?;
    let inputs = create_inputs(&dir, &["a.pdf", "b.pdf"]);

    let mut job = MergeJob::new();
    job.set_tool_path(PathBuf::from("/definitely/not/ghostscript"))
        .add_files(&inputs)?
        .set_output_folder(dir.path())?;

    let err = job.merge().await.unwrap_err();

    match err {
        PdfMergeError::ProcessFailure {
            exit_code,
            timed_out,
            ref stderr,
            ..
        } => {
            assert_eq!(exit_code, Some(127));
            assert!(!timed_out);
            assert!(stderr.contains("/definitely/not/ghostscript"));
        }
        ref other => panic!("expected ProcessFailure, got {other:?}"),
    }
    assert!(!err.is_invalid_argument());
    assert_eq!(err.exit_code(), 3);
    Ok(())
}
