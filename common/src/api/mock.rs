use std::time::Duration;

use async_trait::async_trait;

use super::FormFillerApi;
use crate::error::Result;
use crate::files::SelectedFile;
use crate::pdf::render_placeholder_pdf;
use crate::types::{
    BusinessInfo, FileUploadResponse, FormState, ManualEntryResponse, Record, ScrapeResponse,
};

/// Artificial delay per operation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MockLatency {
    pub upload: Duration,
    pub submit: Duration,
    pub scrape: Duration,
    pub generate_pdf: Duration,
}

impl Default for MockLatency {
    fn default() -> Self {
        Self {
            upload: Duration::from_millis(1000),
            submit: Duration::from_millis(500),
            scrape: Duration::from_millis(1000),
            generate_pdf: Duration::from_millis(1500),
        }
    }
}

impl MockLatency {
    pub fn none() -> Self {
        Self {
            upload: Duration::ZERO,
            submit: Duration::ZERO,
            scrape: Duration::ZERO,
            generate_pdf: Duration::ZERO,
        }
    }
}

/// Canned backend for development and tests
#[derive(Debug, Clone, Default)]
pub struct MockApiClient {
    latency: MockLatency,
}

impl MockApiClient {
    pub fn new(latency: MockLatency) -> Self {
        Self { latency }
    }

    pub fn instant() -> Self {
        Self::new(MockLatency::none())
    }
}

async fn pause(delay: Duration) {
    if !delay.is_zero() {
        tokio::time::sleep(delay).await;
    }
}

fn mock_record() -> Record {
    let mut record = Record::new();
    record.insert("accountNumber".to_string(), "12345".into());
    record.insert("client".to_string(), "Mock Business".into());
    record.insert("city".to_string(), "Mock City".into());
    record
}

#[async_trait]
impl FormFillerApi for MockApiClient {
    async fn upload_files(
        &self,
        _input_file: &SelectedFile,
        _template_file: &SelectedFile,
        _output_path: &str,
    ) -> Result<FileUploadResponse> {
        pause(self.latency.upload).await;
        Ok(FileUploadResponse {
            success: true,
            message: "Files processed successfully".to_string(),
            data: vec![mock_record()],
        })
    }

    async fn submit_manual_entry(&self, entry: &FormState) -> Result<ManualEntryResponse> {
        pause(self.latency.submit).await;
        tracing::debug!(?entry, "mock manual entry");
        Ok(ManualEntryResponse {
            success: true,
            data: Some(entry.clone()),
        })
    }

    async fn scrape_business(&self, business_name: &str, city: &str) -> Result<ScrapeResponse> {
        pause(self.latency.scrape).await;
        Ok(ScrapeResponse {
            results: vec![BusinessInfo {
                license_number: "12345".to_string(),
                business_name: business_name.to_string(),
                address: "123 Main St".to_string(),
                city: city.to_string(),
                state: "CA".to_string(),
                zip: "95814".to_string(),
                status: "Active".to_string(),
            }],
        })
    }

    async fn generate_pdf(&self, template: &str, record: &Record) -> Result<Vec<u8>> {
        pause(self.latency.generate_pdf).await;
        render_placeholder_pdf(template, record)
    }
}
