//! Batch driver tests: directory validation, fan-out, failure isolation

mod common;

use common::{write_corrupt_workbook, write_keyless_workbook, write_labels_workbook, LABELS_IMPEX};
use impex_forge::{BatchConverter, ConvertOutcome, ImpexConfig, ImpexError};
use pretty_assertions::assert_eq;
use std::fs;
use tempfile::TempDir;

// ═══════════════════════════════════════════════════════════════════════════
// SETUP ERRORS
// ═══════════════════════════════════════════════════════════════════════════

#[test]
fn test_non_directory_fails_before_any_work() {
    let temp_dir = TempDir::new().unwrap();
    let source = write_labels_workbook(temp_dir.path(), "labels.xlsx");

    let result = BatchConverter::new(&source, ImpexConfig::default());

    assert!(matches!(result, Err(ImpexError::InvalidPath { .. })));
    assert!(!temp_dir.path().join("impexes").exists());
    assert!(!temp_dir.path().join("labels.impex").exists());
}

#[tokio::test]
async fn test_existing_target_directory_is_setup_conflict() {
    let temp_dir = TempDir::new().unwrap();
    write_labels_workbook(temp_dir.path(), "labels.xlsx");
    fs::create_dir(temp_dir.path().join("impexes")).unwrap();

    let batch = BatchConverter::new(temp_dir.path(), ImpexConfig::default()).unwrap();
    match batch.run().await {
        Err(ImpexError::SetupConflict(path)) => assert_eq!(path, temp_dir.path().join("impexes")),
        other => panic!("expected SetupConflict, got {other:?}"),
    }
    assert!(fs::read_dir(temp_dir.path().join("impexes")).unwrap().next().is_none());
}

// ═══════════════════════════════════════════════════════════════════════════
// FAN-OUT
// ═══════════════════════════════════════════════════════════════════════════

#[tokio::test]
async fn test_good_and_corrupt_files_are_isolated() {
    let temp_dir = TempDir::new().unwrap();
    write_labels_workbook(temp_dir.path(), "good.xlsx");
    write_corrupt_workbook(temp_dir.path(), "corrupt.xlsx");

    let batch = BatchConverter::new(temp_dir.path(), ImpexConfig::default()).unwrap();
    let report = batch.run().await.unwrap();

    assert_eq!(report.files.len(), 2);
    assert_eq!(report.converted(), 1);
    assert_eq!(report.failed(), 1);

    let failed: Vec<String> = report.failures().map(|(f, _)| f.file_name()).collect();
    assert_eq!(failed, vec!["corrupt.xlsx"]);
    let (_, err) = report.failures().next().unwrap();
    assert!(matches!(err, ImpexError::Workbook { .. }));

    let impexes = temp_dir.path().join("impexes");
    assert_eq!(fs::read_to_string(impexes.join("good.impex")).unwrap(), LABELS_IMPEX);
    assert!(!impexes.join("corrupt.impex").exists());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_many_files_with_single_worker() {
    let temp_dir = TempDir::new().unwrap();
    for i in 0..6 {
        write_labels_workbook(temp_dir.path(), &format!("labels_{i}.xlsx"));
    }
    write_keyless_workbook(temp_dir.path(), "readme.xlsx");
    fs::write(temp_dir.path().join("notes.txt"), "not a spreadsheet").unwrap();

    let config = ImpexConfig {
        workers: Some(1),
        ..ImpexConfig::default()
    };
    let report = BatchConverter::new(temp_dir.path(), config)
        .unwrap()
        .run()
        .await
        .unwrap();

    assert_eq!(report.files.len(), 7);
    assert_eq!(report.converted(), 6);
    assert_eq!(report.skipped(), 1);
    assert_eq!(report.failed(), 0);

    // Reports come back sorted by source path
    let names: Vec<String> = report.files.iter().map(|f| f.file_name()).collect();
    let mut sorted = names.clone();
    sorted.sort();
    assert_eq!(names, sorted);

    let mut outputs: Vec<String> = fs::read_dir(&report.target_dir)
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    outputs.sort();
    assert_eq!(
        outputs,
        (0..6).map(|i| format!("labels_{i}.impex")).collect::<Vec<_>>()
    );
}

#[tokio::test]
async fn test_empty_directory_completes() {
    let temp_dir = TempDir::new().unwrap();
    let report = BatchConverter::new(temp_dir.path(), ImpexConfig::default())
        .unwrap()
        .run()
        .await
        .unwrap();

    assert!(report.files.is_empty());
    assert!(report.target_dir.is_dir());
}

#[tokio::test]
async fn test_custom_target_directory_name() {
    let temp_dir = TempDir::new().unwrap();
    write_labels_workbook(temp_dir.path(), "labels.xlsx");
    let config = ImpexConfig {
        target_dir_name: "out".to_string(),
        ..ImpexConfig::default()
    };

    let report = BatchConverter::new(temp_dir.path(), config)
        .unwrap()
        .run()
        .await
        .unwrap();

    let output = temp_dir.path().join("out").join("labels.impex");
    assert_eq!(
        report.files[0].result.as_ref().unwrap(),
        &ConvertOutcome::Written { output, entries: 2 }
    );
}

#[test]
fn test_run_blocking_from_sync_code() {
    let temp_dir = TempDir::new().unwrap();
    write_labels_workbook(temp_dir.path(), "labels.xlsx");

    let report = BatchConverter::new(temp_dir.path(), ImpexConfig::default())
        .unwrap()
        .run_blocking()
        .unwrap();

    assert_eq!(report.converted(), 1);
    assert!(temp_dir.path().join("impexes/labels.impex").exists());
}
