//! Scripted backend shared by the integration tests

#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use serde_json::json;
use sff_common::types::{FileUploadResponse, ManualEntryResponse, ScrapeResponse};
use sff_common::{
    BusinessInfo, Error, FormFillerApi, FormState, Record, Result, SelectedFile,
};

#[derive(Default)]
pub struct FakeApi {
    pub records: Vec<Record>,
    pub reject_upload: bool,
    pub fail_upload: bool,
    /// Zero-based record indexes whose PDF generation fails
    pub failing_records: Vec<usize>,
    pub licenses: Vec<String>,
    pub uploads: AtomicUsize,
    pub generated: AtomicUsize,
    pub submitted: AtomicUsize,
    pub scraped: AtomicUsize,
    pub templates: Mutex<Vec<String>>,
}

impl FakeApi {
    pub fn with_records(records: Vec<Record>) -> Self {
        Self { records, ..Default::default() }
    }

    pub fn uploads(&self) -> usize {
        self.uploads.load(Ordering::SeqCst)
    }

    pub fn generated(&self) -> usize {
        self.generated.load(Ordering::SeqCst)
    }

    pub fn submitted(&self) -> usize {
        self.submitted.load(Ordering::SeqCst)
    }

    pub fn scraped(&self) -> usize {
        self.scraped.load(Ordering::SeqCst)
    }
}

pub fn record(value: serde_json::Value) -> Record {
    match value {
        serde_json::Value::Object(map) => map,
        other => panic!("not an object: {other}"),
    }
}

/// `n` records named `Business 1..=n`
pub fn named_records(n: usize) -> Vec<Record> {
    (1..=n)
        .map(|i| record(json!({ "BUSINESS_NAME": format!("Business {i}"), "city": "Napa" })))
        .collect()
}

#[async_trait]
impl FormFillerApi for FakeApi {
    async fn upload_files(
        &self,
        _input_file: &SelectedFile,
        _template_file: &SelectedFile,
        _output_path: &str,
    ) -> Result<FileUploadResponse> {
        self.uploads.fetch_add(1, Ordering::SeqCst);
        if self.fail_upload {
            return Err(Error::Transport("connection refused".to_string()));
        }
        Ok(FileUploadResponse {
            success: !self.reject_upload,
            message: if self.reject_upload { "bad sheet".to_string() } else { String::new() },
            data: self.records.clone(),
        })
    }

    async fn submit_manual_entry(&self, entry: &FormState) -> Result<ManualEntryResponse> {
        self.submitted.fetch_add(1, Ordering::SeqCst);
        Ok(ManualEntryResponse { success: true, data: Some(entry.clone()) })
    }

    async fn scrape_business(&self, business_name: &str, city: &str) -> Result<ScrapeResponse> {
        self.scraped.fetch_add(1, Ordering::SeqCst);
        let results = self
            .licenses
            .iter()
            .map(|license| BusinessInfo {
                license_number: license.clone(),
                business_name: business_name.to_string(),
                city: city.to_string(),
                ..Default::default()
            })
            .collect();
        Ok(ScrapeResponse { results })
    }

    async fn generate_pdf(&self, template: &str, _record: &Record) -> Result<Vec<u8>> {
        let index = self.generated.fetch_add(1, Ordering::SeqCst);
        self.templates.lock().unwrap().push(template.to_string());
        if self.failing_records.contains(&index) {
            return Err(Error::Transport(format!("render failed for {index}")));
        }
        Ok(b"%PDF-1.4 fake".to_vec())
    }
}
