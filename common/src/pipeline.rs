//! File Selection tab and the batch pipeline behind it
//!
//! upload -> for each returned record, in order: generate PDF -> hand it
//! to the sink. A failing record is logged and skipped; a failing upload
//! aborts the batch. Progress: 10 before upload, 50 after it,
//! `50 + floor((i+1)/N * 40)` after record i, 100 at the end.

use std::path::PathBuf;

use crate::api::FormFillerApi;
use crate::error::{Error, Result};
use crate::files::{validate_input_file, validate_template_file, PdfSink, SelectedFile};
use crate::log::LogStore;
use crate::types::Record;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum BatchState {
    #[default]
    Idle,
    FilesSelected,
    Uploading,
    GeneratingPdfs { current: usize, total: usize },
    Done,
}

impl BatchState {
    pub fn is_processing(&self) -> bool {
        matches!(self, BatchState::Uploading | BatchState::GeneratingPdfs { .. })
    }
}

/// Progress notifications emitted while a batch runs
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BatchEvent {
    Uploading,
    Uploaded { total: usize },
    RecordFinished { index: usize, total: usize, saved: Option<PathBuf> },
    Completed,
    Failed(String),
}

impl BatchEvent {
    pub fn progress(&self) -> Option<u8> {
        match self {
            BatchEvent::Uploading => Some(10),
            BatchEvent::Uploaded { .. } => Some(50),
            BatchEvent::RecordFinished { index, total, .. } => Some(record_progress(*index, *total)),
            BatchEvent::Completed => Some(100),
            BatchEvent::Failed(_) => None,
        }
    }
}

pub fn record_progress(index: usize, total: usize) -> u8 {
    if total == 0 {
        return 90;
    }
    let step = ((index + 1).min(total) * 40) / total;
    50 + step as u8
}

fn business_name(record: &Record) -> Option<String> {
    match record.get("BUSINESS_NAME")? {
        serde_json::Value::Null => None,
        serde_json::Value::String(s) if s.is_empty() => None,
        serde_json::Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

/// `<BUSINESS_NAME>.pdf`, or `record_<n>.pdf` with a 1-based index
pub fn record_file_name(record: &Record, index: usize) -> String {
    match business_name(record) {
        Some(name) => format!("{name}.pdf"),
        None => format!("record_{}.pdf", index + 1),
    }
}

fn record_label(record: &Record, index: usize) -> String {
    business_name(record).unwrap_or_else(|| format!("record {}", index + 1))
}

/// Everything a batch needs once validation passed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchJob {
    pub input_file: SelectedFile,
    pub template_file: SelectedFile,
    pub output_path: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BatchSummary {
    pub total: usize,
    pub saved: Vec<PathBuf>,
    pub failed: usize,
}

pub async fn run_batch(
    job: &BatchJob,
    api: &dyn FormFillerApi,
    sink: &mut dyn PdfSink,
    log: &LogStore,
    on_event: &mut dyn FnMut(BatchEvent),
) -> Result<BatchSummary> {
    on_event(BatchEvent::Uploading);
    let upload = api
        .upload_files(&job.input_file, &job.template_file, &job.output_path)
        .await
        .and_then(|response| {
            if response.success {
                Ok(response)
            } else {
                Err(Error::Transport(format!("Upload rejected: {}", response.message)))
            }
        });
    let upload = match upload {
        Ok(response) => response,
        Err(err) => {
            log.error(format!("Error processing files: {err}"));
            on_event(BatchEvent::Failed(err.to_string()));
            return Err(err);
        }
    };

    let total = upload.data.len();
    on_event(BatchEvent::Uploaded { total });
    log.success("Files uploaded successfully");

    let mut summary = BatchSummary { total, ..Default::default() };
    for (index, record) in upload.data.iter().enumerate() {
        let label = record_label(record, index);
        let outcome = match api.generate_pdf(&job.template_file.name, record).await {
            Ok(bytes) => sink.save(&record_file_name(record, index), &bytes),
            Err(err) => Err(err),
        };
        let saved = match outcome {
            Ok(path) => {
                log.success(format!("Generated PDF for {label}"));
                summary.saved.push(path.clone());
                Some(path)
            }
            Err(err) => {
                log.error(format!("Failed to generate PDF for {label}: {err}"));
                summary.failed += 1;
                None
            }
        };
        on_event(BatchEvent::RecordFinished { index, total, saved });
    }

    on_event(BatchEvent::Completed);
    log.success("PDF generated and downloaded successfully");
    Ok(summary)
}

/// Controlled state of the File Selection tab
pub struct FileSelectionTab {
    input_file: Option<SelectedFile>,
    template_file: Option<SelectedFile>,
    output_path: String,
    progress: u8,
    state: BatchState,
    log: LogStore,
}

impl FileSelectionTab {
    pub fn new(log: LogStore) -> Self {
        Self {
            input_file: None,
            template_file: None,
            output_path: String::new(),
            progress: 0,
            state: BatchState::Idle,
            log,
        }
    }

    pub fn input_file(&self) -> Option<&SelectedFile> {
        self.input_file.as_ref()
    }

    pub fn template_file(&self) -> Option<&SelectedFile> {
        self.template_file.as_ref()
    }

    pub fn output_path(&self) -> &str {
        &self.output_path
    }

    pub fn progress(&self) -> u8 {
        self.progress
    }

    pub fn state(&self) -> BatchState {
        self.state
    }

    pub fn is_processing(&self) -> bool {
        self.state.is_processing()
    }

    pub fn can_submit(&self) -> bool {
        !self.is_processing()
            && self.input_file.is_some()
            && self.template_file.is_some()
            && !self.output_path.is_empty()
    }

    /// Rejected files leave the slot untouched
    pub fn select_input_file(&mut self, file: SelectedFile) -> bool {
        if self.is_processing() {
            return false;
        }
        if let Err(err) = validate_input_file(&file.name) {
            self.log.error(err.to_string());
            return false;
        }
        self.log.info(format!("Selected input file: {}", file.name));
        self.input_file = Some(file);
        self.mark_selected();
        true
    }

    pub fn select_template_file(&mut self, file: SelectedFile) -> bool {
        if self.is_processing() {
            return false;
        }
        if let Err(err) = validate_template_file(&file.name) {
            self.log.error(err.to_string());
            return false;
        }
        self.log.info(format!("Selected template file: {}", file.name));
        self.template_file = Some(file);
        self.mark_selected();
        true
    }

    pub fn set_output_path(&mut self, path: impl Into<String>) {
        if !self.is_processing() {
            self.output_path = path.into();
        }
    }

    fn mark_selected(&mut self) {
        if matches!(self.state, BatchState::Idle) {
            self.state = BatchState::FilesSelected;
        }
    }

    fn resting_state(&self) -> BatchState {
        if self.input_file.is_some() || self.template_file.is_some() {
            BatchState::FilesSelected
        } else {
            BatchState::Idle
        }
    }

    /// Validates the slots and moves to `Uploading`
    pub fn begin_submit(&mut self) -> Result<BatchJob> {
        if self.is_processing() {
            return Err(Error::Validation("A batch is already running".to_string()));
        }
        let (Some(input_file), Some(template_file)) = (&self.input_file, &self.template_file) else {
            return Err(self.missing_inputs());
        };
        if self.output_path.is_empty() {
            return Err(self.missing_inputs());
        }
        let job = BatchJob {
            input_file: input_file.clone(),
            template_file: template_file.clone(),
            output_path: self.output_path.clone(),
        };
        self.state = BatchState::Uploading;
        Ok(job)
    }

    fn missing_inputs(&self) -> Error {
        let message = "Please select all required files and specify output path";
        self.log.error(message);
        Error::Validation(message.to_string())
    }

    pub fn apply_event(&mut self, event: &BatchEvent) {
        if let Some(progress) = event.progress() {
            self.progress = progress;
        }
        self.state = match event {
            BatchEvent::Uploading => BatchState::Uploading,
            BatchEvent::Uploaded { total } => BatchState::GeneratingPdfs { current: 0, total: *total },
            BatchEvent::RecordFinished { index, total, .. } => BatchState::GeneratingPdfs {
                current: index + 1,
                total: *total,
            },
            BatchEvent::Completed => BatchState::Done,
            BatchEvent::Failed(_) => self.resting_state(),
        };
    }

    /// Always leaves the processing state, whatever the outcome
    pub fn finish(&mut self, result: &Result<BatchSummary>) {
        self.state = match result {
            Ok(_) => BatchState::Done,
            Err(_) => self.resting_state(),
        };
    }

    pub async fn submit(
        &mut self,
        api: &dyn FormFillerApi,
        sink: &mut dyn PdfSink,
    ) -> Result<BatchSummary> {
        let job = self.begin_submit()?;
        let log = self.log.clone();
        let mut events = Vec::new();
        let result = run_batch(&job, api, sink, &log, &mut |event: BatchEvent| {
            events.push(event);
        })
        .await;
        for event in &events {
            self.apply_event(event);
        }
        self.finish(&result);
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::MockApiClient;
    use crate::types::LogLevel;
    use serde_json::json;

    #[derive(Default)]
    struct MemorySink {
        files: Vec<(String, Vec<u8>)>,
    }

    impl PdfSink for MemorySink {
        fn save(&mut self, file_name: &str, bytes: &[u8]) -> Result<PathBuf> {
            self.files.push((file_name.to_string(), bytes.to_vec()));
            Ok(PathBuf::from(file_name))
        }
    }

    fn ready_tab(log: &LogStore) -> FileSelectionTab {
        let mut tab = FileSelectionTab::new(log.clone());
        assert!(tab.select_input_file(SelectedFile::from_path("data.csv")));
        assert!(tab.select_template_file(SelectedFile::from_path("form.pdf")));
        tab.set_output_path("/out");
        tab
    }

    #[test]
    fn test_record_progress_values() {
        assert_eq!(record_progress(0, 1), 90);
        assert_eq!(record_progress(0, 3), 63);
        assert_eq!(record_progress(1, 3), 76);
        assert_eq!(record_progress(2, 3), 90);
    }

    #[test]
    fn test_record_file_name() {
        let named = json!({"BUSINESS_NAME": "Joe's Deli"}).as_object().cloned().unwrap();
        let unnamed = json!({"client": "Mock Business"}).as_object().cloned().unwrap();
        let empty = json!({"BUSINESS_NAME": ""}).as_object().cloned().unwrap();
        assert_eq!(record_file_name(&named, 0), "Joe's Deli.pdf");
        assert_eq!(record_file_name(&unnamed, 0), "record_1.pdf");
        assert_eq!(record_file_name(&empty, 4), "record_5.pdf");
    }

    #[test]
    fn test_rejected_input_keeps_slot() {
        let log = LogStore::new();
        let mut tab = FileSelectionTab::new(log.clone());
        assert!(tab.select_input_file(SelectedFile::from_path("data.csv")));
        assert!(!tab.select_input_file(SelectedFile::from_path("photo.png")));
        assert_eq!(tab.input_file().unwrap().name, "data.csv");
        assert_eq!(log.last().unwrap().level, LogLevel::Error);
    }

    #[test]
    fn test_selection_moves_to_files_selected() {
        let mut tab = FileSelectionTab::new(LogStore::new());
        assert_eq!(tab.state(), BatchState::Idle);
        assert!(!tab.select_template_file(SelectedFile::from_path("form.docx")));
        assert_eq!(tab.state(), BatchState::Idle);
        tab.select_template_file(SelectedFile::from_path("form.pdf"));
        assert_eq!(tab.state(), BatchState::FilesSelected);
    }

    #[test]
    fn test_begin_submit_requires_output_path() {
        let log = LogStore::new();
        let mut tab = ready_tab(&log);
        tab.set_output_path("");
        assert!(!tab.can_submit());
        let err = tab.begin_submit().unwrap_err();
        assert!(err.is_validation());
        assert!(!tab.is_processing());
    }

    #[tokio::test]
    async fn test_submit_with_mock_completes() {
        let log = LogStore::new();
        let mut tab = ready_tab(&log);
        let mut sink = MemorySink::default();

        let summary = tab.submit(&MockApiClient::instant(), &mut sink).await.unwrap();

        assert_eq!(summary.total, 1);
        assert_eq!(summary.failed, 0);
        assert_eq!(sink.files[0].0, "record_1.pdf");
        assert_eq!(tab.progress(), 100);
        assert_eq!(tab.state(), BatchState::Done);
        assert!(!tab.is_processing());
        assert_eq!(tab.input_file().unwrap().name, "data.csv");
    }
}
