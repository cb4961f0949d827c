//! Batch pipeline integration tests against a scripted backend

mod common;

use common::{named_records, record, FakeApi};
use serde_json::json;
use sff_common::{
    run_batch, BatchEvent, BatchJob, BatchState, DirectorySink, FileSelectionTab, LogLevel,
    LogStore, PdfSink, Result, SelectedFile,
};
use std::path::PathBuf;
use tempfile::tempdir;

#[derive(Default)]
struct MemorySink {
    files: Vec<(String, Vec<u8>)>,
}

impl PdfSink for MemorySink {
    fn save(&mut self, file_name: &str, bytes: &[u8]) -> Result<PathBuf> {
        self.files.push((file_name.to_string(), bytes.to_vec()));
        Ok(PathBuf::from("/memory").join(file_name))
    }
}

fn job(output: &str) -> BatchJob {
    BatchJob {
        input_file: SelectedFile::from_path("data.csv"),
        template_file: SelectedFile::from_path("form.pdf"),
        output_path: output.to_string(),
    }
}

fn ready_tab(log: &LogStore, output: &str) -> FileSelectionTab {
    let mut tab = FileSelectionTab::new(log.clone());
    assert!(tab.select_input_file(SelectedFile::from_path("data.csv")));
    assert!(tab.select_template_file(SelectedFile::from_path("form.pdf")));
    tab.set_output_path(output);
    tab
}

#[tokio::test]
async fn test_one_pdf_per_record_in_order() {
    let api = FakeApi::with_records(named_records(3));
    let log = LogStore::new();
    let mut sink = MemorySink::default();

    let summary = run_batch(&job("/out"), &api, &mut sink, &log, &mut |_event: BatchEvent| {})
        .await
        .expect("batch should succeed");

    assert_eq!(api.uploads(), 1);
    assert_eq!(api.generated(), 3);
    assert_eq!(summary.total, 3);
    assert_eq!(summary.failed, 0);
    let names: Vec<&str> = sink.files.iter().map(|(name, _)| name.as_str()).collect();
    assert_eq!(names, ["Business 1.pdf", "Business 2.pdf", "Business 3.pdf"]);
    // Template name, not its path, goes to the backend
    assert!(api.templates.lock().unwrap().iter().all(|t| t == "form.pdf"));
}

#[tokio::test]
async fn test_failing_record_does_not_stop_batch() {
    let api = FakeApi {
        records: named_records(3),
        failing_records: vec![1],
        ..Default::default()
    };
    let log = LogStore::new();
    let mut sink = MemorySink::default();

    let summary = run_batch(&job("/out"), &api, &mut sink, &log, &mut |_event: BatchEvent| {})
        .await
        .expect("batch should succeed");

    assert_eq!(api.generated(), 3);
    assert_eq!(summary.saved.len(), 2);
    assert_eq!(summary.failed, 1);

    let errors: Vec<String> = log
        .entries()
        .into_iter()
        .filter(|e| e.level == LogLevel::Error)
        .map(|e| e.message)
        .collect();
    assert_eq!(errors.len(), 1);
    assert!(errors[0].starts_with("Failed to generate PDF for Business 2"));
    assert_eq!(
        log.last().map(|e| e.message),
        Some("PDF generated and downloaded successfully".to_string())
    );
}

#[tokio::test]
async fn test_progress_sequence_for_single_record() {
    let api = FakeApi::with_records(vec![record(json!({ "client": "Solo" }))]);
    let log = LogStore::new();
    let mut sink = MemorySink::default();
    let mut progress = vec![0u8];

    run_batch(&job("/out"), &api, &mut sink, &log, &mut |event: BatchEvent| {
        if let Some(p) = event.progress() {
            progress.push(p);
        }
    })
    .await
    .expect("batch should succeed");

    assert_eq!(progress, [0, 10, 50, 90, 100]);
}

#[tokio::test]
async fn test_progress_is_monotonic_with_failures() {
    let api = FakeApi {
        records: named_records(7),
        failing_records: vec![0, 4],
        ..Default::default()
    };
    let log = LogStore::new();
    let mut sink = MemorySink::default();
    let mut progress = Vec::new();

    run_batch(&job("/out"), &api, &mut sink, &log, &mut |event: BatchEvent| {
        if let Some(p) = event.progress() {
            progress.push(p);
        }
    })
    .await
    .expect("batch should succeed");

    assert!(progress.windows(2).all(|w| w[0] <= w[1]), "{progress:?}");
    assert_eq!(progress.last(), Some(&100));
    // Record progress tops out at 90 before completion
    assert_eq!(progress[progress.len() - 2], 90);
}

#[tokio::test]
async fn test_unnamed_record_uses_index_file_name() {
    let api = FakeApi::with_records(vec![record(json!({ "accountNumber": "1" }))]);
    let log = LogStore::new();
    let mut tab = ready_tab(&log, "/out");
    let mut sink = MemorySink::default();

    let summary = tab.submit(&api, &mut sink).await.expect("batch should succeed");

    assert_eq!(summary.saved, [PathBuf::from("/memory/record_1.pdf")]);
    assert_eq!(tab.progress(), 100);
    assert_eq!(tab.state(), BatchState::Done);
    assert!(!tab.is_processing());
}

#[tokio::test]
async fn test_missing_inputs_never_upload() {
    let api = FakeApi::with_records(named_records(2));
    let log = LogStore::new();
    let mut sink = MemorySink::default();

    let mut tab = FileSelectionTab::new(log.clone());
    assert!(tab.select_input_file(SelectedFile::from_path("data.csv")));
    tab.set_output_path("/out");
    assert!(!tab.can_submit());

    let err = tab.submit(&api, &mut sink).await.unwrap_err();
    assert!(err.is_validation());
    assert_eq!(api.uploads(), 0);
    assert_eq!(tab.progress(), 0);
    assert_eq!(
        log.last().map(|e| e.message),
        Some("Please select all required files and specify output path".to_string())
    );
}

#[tokio::test]
async fn test_empty_output_path_never_uploads() {
    let api = FakeApi::with_records(named_records(1));
    let log = LogStore::new();
    let mut tab = ready_tab(&log, "");
    let mut sink = MemorySink::default();

    assert!(tab.submit(&api, &mut sink).await.is_err());
    assert_eq!(api.uploads(), 0);
}

#[tokio::test]
async fn test_upload_failure_keeps_selection() {
    let api = FakeApi {
        records: named_records(2),
        fail_upload: true,
        ..Default::default()
    };
    let log = LogStore::new();
    let mut tab = ready_tab(&log, "/out");
    let mut sink = MemorySink::default();

    let err = tab.submit(&api, &mut sink).await.unwrap_err();

    assert!(err.to_string().contains("connection refused"));
    assert_eq!(api.generated(), 0);
    assert!(sink.files.is_empty());
    assert!(!tab.is_processing());
    assert_eq!(tab.state(), BatchState::FilesSelected);
    assert_eq!(tab.input_file().map(|f| f.name.as_str()), Some("data.csv"));
    assert_eq!(tab.template_file().map(|f| f.name.as_str()), Some("form.pdf"));
    assert!(tab.can_submit());

    let last = log.last().expect("an error entry");
    assert_eq!(last.level, LogLevel::Error);
    assert!(last.message.starts_with("Error processing files:"));
}

#[tokio::test]
async fn test_rejected_upload_is_an_error() {
    let api = FakeApi {
        records: named_records(2),
        reject_upload: true,
        ..Default::default()
    };
    let log = LogStore::new();
    let mut sink = MemorySink::default();

    let err = run_batch(&job("/out"), &api, &mut sink, &log, &mut |_event: BatchEvent| {})
        .await
        .unwrap_err();

    assert!(err.to_string().contains("bad sheet"));
    assert_eq!(api.generated(), 0);
}

#[tokio::test]
async fn test_directory_sink_writes_into_output_folder() {
    let dir = tempdir().expect("Failed to create temp dir");
    let output = dir.path().join("nested").join("out");
    let api = FakeApi::with_records(vec![
        record(json!({ "BUSINESS_NAME": "Acme/West" })),
        record(json!({ "client": "no name" })),
    ]);
    let log = LogStore::new();
    let mut sink = DirectorySink::new(&output);

    let summary = run_batch(
        &job(&output.display().to_string()),
        &api,
        &mut sink,
        &log,
        &mut |_event: BatchEvent| {},
    )
    .await
    .expect("batch should succeed");

    assert_eq!(summary.saved.len(), 2);
    assert!(output.join("Acme_West.pdf").exists());
    assert!(output.join("record_2.pdf").exists());
    for path in &summary.saved {
        assert!(path.starts_with(&output));
    }
}

#[tokio::test]
async fn test_zero_records_completes() {
    let api = FakeApi::default();
    let log = LogStore::new();
    let mut sink = MemorySink::default();
    let mut events = Vec::new();

    let summary = run_batch(&job("/out"), &api, &mut sink, &log, &mut |event: BatchEvent| {
        events.push(event);
    })
    .await
    .expect("batch should succeed");

    assert_eq!(summary.total, 0);
    assert_eq!(api.generated(), 0);
    assert_eq!(
        events,
        [BatchEvent::Uploading, BatchEvent::Uploaded { total: 0 }, BatchEvent::Completed]
    );
}

#[tokio::test]
async fn test_duplicate_business_names_keep_every_pdf() {
    let dir = tempdir().expect("Failed to create temp dir");
    let api = FakeApi::with_records(vec![
        record(json!({ "BUSINESS_NAME": "Joe's Deli" })),
        record(json!({ "BUSINESS_NAME": "Joe's Deli" })),
    ]);
    let log = LogStore::new();
    let mut sink = DirectorySink::new(dir.path());

    let summary = run_batch(
        &job(&dir.path().display().to_string()),
        &api,
        &mut sink,
        &log,
        &mut |_event: BatchEvent| {},
    )
    .await
    .expect("batch should succeed");

    assert_eq!(summary.failed, 0);
    assert_eq!(summary.saved.len(), 2);
    assert_ne!(summary.saved[0], summary.saved[1]);
    let on_disk = std::fs::read_dir(dir.path()).unwrap().count();
    assert_eq!(on_disk, 2);
    assert!(dir.path().join("Joe's Deli.pdf").exists());
    assert!(dir.path().join("Joe's Deli (1).pdf").exists());
}

#[tokio::test]
async fn test_dot_business_name_still_gets_pdf_extension() {
    let dir = tempdir().expect("Failed to create temp dir");
    let api = FakeApi::with_records(vec![record(json!({ "BUSINESS_NAME": "." }))]);
    let log = LogStore::new();
    let mut sink = DirectorySink::new(dir.path());

    let summary = run_batch(
        &job(&dir.path().display().to_string()),
        &api,
        &mut sink,
        &log,
        &mut |_event: BatchEvent| {},
    )
    .await
    .expect("batch should succeed");

    assert_eq!(summary.saved, [dir.path().join("_.pdf")]);
}
