//! `sff process`: the File Selection tab without a window

use std::path::Path;

use indicatif::{ProgressBar, ProgressStyle};
use sff_common::{
    run_batch, BatchEvent, BatchSummary, DirectorySink, Error, FileSelectionTab, FormFillerApi,
    LogStore, SelectedFile,
};

use crate::error::{FormFillerError, Result};

fn rejected(log: &LogStore) -> FormFillerError {
    let message = log
        .last()
        .map(|entry| entry.message)
        .unwrap_or_else(|| "Invalid file".to_string());
    Error::Validation(message).into()
}

pub async fn run_process(
    api: &dyn FormFillerApi,
    log: &LogStore,
    input: &Path,
    template: &Path,
    output: &Path,
) -> Result<BatchSummary> {
    for path in [input, template] {
        if !path.exists() {
            return Err(FormFillerError::FileNotFound(path.display().to_string()));
        }
    }

    let mut tab = FileSelectionTab::new(log.clone());
    if !tab.select_input_file(SelectedFile::from_path(input)) {
        return Err(rejected(log));
    }
    if !tab.select_template_file(SelectedFile::from_path(template)) {
        return Err(rejected(log));
    }
    tab.set_output_path(output.display().to_string());

    let job = tab.begin_submit()?;
    let mut sink = DirectorySink::new(&job.output_path);

    let bar = ProgressBar::new(100);
    bar.set_style(
        ProgressStyle::with_template("{bar:40.cyan/blue} {pos:>3}% {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar()),
    );

    let result = run_batch(&job, api, &mut sink, log, &mut |event: BatchEvent| {
        tab.apply_event(&event);
        if let Some(progress) = event.progress() {
            bar.set_position(u64::from(progress));
        }
        match &event {
            BatchEvent::Uploading => bar.set_message("uploading"),
            BatchEvent::Uploaded { total } => bar.set_message(format!("{total} records")),
            BatchEvent::RecordFinished { index, total, .. } => {
                bar.set_message(format!("record {}/{}", index + 1, total))
            }
            BatchEvent::Completed => bar.set_message("done"),
            BatchEvent::Failed(reason) => bar.set_message(format!("failed: {reason}")),
        }
    })
    .await;
    bar.finish();
    tab.finish(&result);

    Ok(result?)
}
