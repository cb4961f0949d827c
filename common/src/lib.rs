//! Saccani Form Filler common library
//!
//! Tab state, the API seam and the batch pipeline shared by the CLI and
//! the desktop app.

pub mod additional_info;
pub mod api;
pub mod config;
pub mod error;
pub mod files;
pub mod form;
pub mod log;
pub mod log_view;
pub mod manual_entry;
pub mod pdf;
pub mod pipeline;
pub mod types;

pub use additional_info::AdditionalInfoTab;
pub use api::{client_from_config, FormFillerApi, MockApiClient, MockLatency};
pub use config::Config;
pub use error::{Error, Result};
pub use files::{DirectorySink, PdfSink, SelectedFile};
pub use form::{Form, FormModel, ManualField};
pub use log::LogStore;
pub use manual_entry::ManualEntryTab;
pub use pipeline::{run_batch, BatchEvent, BatchJob, BatchState, BatchSummary, FileSelectionTab};
pub use types::{BusinessInfo, FieldValue, FormState, LogEntry, LogLevel, Record};

/// The four panels, in display order
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Tab {
    #[default]
    FileSelection,
    ManualEntry,
    AdditionalInfo,
    Log,
}

impl Tab {
    pub const ALL: [Tab; 4] = [Tab::FileSelection, Tab::ManualEntry, Tab::AdditionalInfo, Tab::Log];

    pub fn title(&self) -> &'static str {
        match self {
            Tab::FileSelection => "File Selection",
            Tab::ManualEntry => "Manual Entry",
            Tab::AdditionalInfo => "Additional Info",
            Tab::Log => "Log",
        }
    }
}

/// Application root: one log shared by all tabs
pub struct FormFillerSession {
    pub log: LogStore,
    pub files: FileSelectionTab,
    pub manual: ManualEntryTab,
    pub additional_info: AdditionalInfoTab,
}

impl Default for FormFillerSession {
    fn default() -> Self {
        Self::new(LogStore::new())
    }
}

impl FormFillerSession {
    pub fn new(log: LogStore) -> Self {
        Self {
            files: FileSelectionTab::new(log.clone()),
            manual: ManualEntryTab::new(log.clone()),
            additional_info: AdditionalInfoTab::new(log.clone()),
            log,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tabs_share_one_log() {
        let session = FormFillerSession::default();
        session.additional_info.save();
        assert_eq!(session.log.len(), 1);
    }

    #[test]
    fn test_tab_titles_in_order() {
        let titles: Vec<_> = Tab::ALL.iter().map(Tab::title).collect();
        assert_eq!(titles, ["File Selection", "Manual Entry", "Additional Info", "Log"]);
    }
}
