//! API seam between the tabs and the backend
//!
//! Callers only see `FormFillerApi`; the mock and the HTTP client are
//! interchangeable behind it.

mod mock;
#[cfg(feature = "http")]
mod http;

pub use mock::{MockApiClient, MockLatency};
#[cfg(feature = "http")]
pub use http::HttpApiClient;

use std::sync::Arc;

use async_trait::async_trait;

use crate::config::Config;
use crate::error::Result;
use crate::files::SelectedFile;
use crate::types::{FileUploadResponse, FormState, ManualEntryResponse, Record, ScrapeResponse};

#[async_trait]
pub trait FormFillerApi: Send + Sync {
    /// Sends the input and template files; returns the parsed records
    async fn upload_files(
        &self,
        input_file: &SelectedFile,
        template_file: &SelectedFile,
        output_path: &str,
    ) -> Result<FileUploadResponse>;

    /// Echoes the entry back on success
    async fn submit_manual_entry(&self, entry: &FormState) -> Result<ManualEntryResponse>;

    /// An empty result list is a valid answer
    async fn scrape_business(&self, business_name: &str, city: &str) -> Result<ScrapeResponse>;

    /// Raw PDF bytes for one record
    async fn generate_pdf(&self, template: &str, record: &Record) -> Result<Vec<u8>>;
}

/// HTTP client when a base URL is configured, otherwise the mock
pub fn client_from_config(config: &Config) -> Result<Arc<dyn FormFillerApi>> {
    #[cfg(feature = "http")]
    if let Some(base_url) = config.api_base_url() {
        tracing::info!(%base_url, "using HTTP backend");
        return Ok(Arc::new(HttpApiClient::new(&base_url, config.timeout_seconds)?));
    }

    let latency = if config.mock_latency {
        MockLatency::default()
    } else {
        MockLatency::none()
    };
    tracing::info!("using mock backend");
    Ok(Arc::new(MockApiClient::new(latency)))
}
