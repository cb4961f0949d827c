use sff_common::types::{ManualEntryResponse, ScrapeResponse};
use sff_common::{BatchEvent, BatchSummary, FormState, Result};

/// Worker thread -> UI thread
pub enum UiMessage {
    Batch(BatchEvent),
    BatchDone(Result<BatchSummary>),
    AddDone { entry: FormState, response: Result<ManualEntryResponse> },
    ScrapeDone(Result<ScrapeResponse>),
}
