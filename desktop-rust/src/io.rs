use std::any::Any;
use std::future::Future;
use std::panic::{self, AssertUnwindSafe};
use std::path::PathBuf;
use std::sync::mpsc::Sender;

use sff_common::files::INPUT_EXTENSIONS;
use sff_common::SelectedFile;

use crate::model::UiMessage;

pub fn pick_input_file() -> Option<SelectedFile> {
    let extensions: Vec<&str> = INPUT_EXTENSIONS.iter().map(|e| e.trim_start_matches('.')).collect();
    rfd::FileDialog::new()
        .add_filter("Input data", extensions.as_slice())
        .add_filter("All files", &["*"])
        .pick_file()
        .map(SelectedFile::from_path)
}

pub fn pick_template_file() -> Option<SelectedFile> {
    rfd::FileDialog::new()
        .add_filter("PDF", &["pdf"])
        .add_filter("All files", &["*"])
        .pick_file()
        .map(SelectedFile::from_path)
}

pub fn pick_output_dir() -> Option<PathBuf> {
    rfd::FileDialog::new().pick_folder()
}

/// Runs an async task on its own thread with a single-threaded runtime
/// and sends the message it resolves to. The future is built on that
/// thread, so it does not have to be `Send`. If the runtime cannot start
/// or the task panics, `on_abort` builds the message instead, so the UI
/// always hears back.
pub fn spawn_task<F, Fut, A>(tx: Sender<UiMessage>, on_abort: A, make_task: F)
where
    F: FnOnce() -> Fut + Send + 'static,
    Fut: Future<Output = UiMessage>,
    A: FnOnce(String) -> UiMessage + Send + 'static,
{
    std::thread::spawn(move || {
        let message = run_to_message(make_task).unwrap_or_else(|reason| {
            tracing::error!(%reason, "worker task aborted");
            on_abort(reason)
        });
        let _ = tx.send(message);
    });
}

fn run_to_message<F, Fut>(make_task: F) -> Result<UiMessage, String>
where
    F: FnOnce() -> Fut,
    Fut: Future<Output = UiMessage>,
{
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(|err| format!("worker runtime failed to start: {err}"))?;
    panic::catch_unwind(AssertUnwindSafe(|| runtime.block_on(make_task()))).map_err(panic_reason)
}

fn panic_reason(payload: Box<dyn Any + Send>) -> String {
    let detail = payload
        .downcast_ref::<&str>()
        .map(|s| s.to_string())
        .or_else(|| payload.downcast_ref::<String>().cloned())
        .unwrap_or_else(|| "unknown panic".to_string());
    format!("worker task panicked: {detail}")
}
