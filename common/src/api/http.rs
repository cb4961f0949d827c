use std::time::Duration;

use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::{Client, Response};
use serde_json::{json, Value};

use super::FormFillerApi;
use crate::error::{Error, Result};
use crate::files::SelectedFile;
use crate::types::{FileUploadResponse, FormState, ManualEntryResponse, Record, ScrapeResponse};

/// Client for the form-filler backend service
#[derive(Debug, Clone)]
pub struct HttpApiClient {
    base_url: String,
    client: Client,
}

impl HttpApiClient {
    pub fn new(base_url: &str, timeout_seconds: u64) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_seconds))
            .build()?;
        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// `GET /healthz`
    pub async fn health_check(&self) -> Result<bool> {
        let response = self.client.get(self.url("/healthz")).send().await?;
        let response = ensure_success(response).await?;
        let body: Value = response.json().await?;
        Ok(body.get("status").and_then(Value::as_str) == Some("ok"))
    }
}

/// Non-2xx becomes a transport error carrying the status and the
/// backend's `detail` message when it sends one
async fn ensure_success(response: Response) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    let detail = serde_json::from_str::<Value>(&body)
        .ok()
        .and_then(|v| v.get("detail").and_then(Value::as_str).map(str::to_string))
        .unwrap_or(body);
    Err(Error::Transport(format!("{status}: {detail}")))
}

fn file_part(file: &SelectedFile, bytes: Vec<u8>) -> Part {
    Part::bytes(bytes).file_name(file.name.clone())
}

/// The backend answers either `{success: true}` or `{status: "success"}`
fn parse_manual_entry(body: Value) -> Result<ManualEntryResponse> {
    let success = body.get("success").and_then(Value::as_bool).unwrap_or(false)
        || body.get("status").and_then(Value::as_str) == Some("success");
    let data = match body.get("data") {
        Some(Value::Null) | None => None,
        Some(data) => Some(serde_json::from_value::<FormState>(data.clone())?),
    };
    Ok(ManualEntryResponse { success, data })
}

#[async_trait]
impl FormFillerApi for HttpApiClient {
    async fn upload_files(
        &self,
        input_file: &SelectedFile,
        template_file: &SelectedFile,
        output_path: &str,
    ) -> Result<FileUploadResponse> {
        let input_bytes = input_file.read().await?;
        let template_bytes = template_file.read().await?;
        let form = Form::new()
            .part("input_file", file_part(input_file, input_bytes))
            .part("template_file", file_part(template_file, template_bytes))
            .text("output_path", output_path.to_string());

        let response = self
            .client
            .post(self.url("/api/upload"))
            .multipart(form)
            .send()
            .await?;
        let response = ensure_success(response).await?;
        Ok(response.json().await?)
    }

    async fn submit_manual_entry(&self, entry: &FormState) -> Result<ManualEntryResponse> {
        let response = self
            .client
            .post(self.url("/api/manual-entry"))
            .json(entry)
            .send()
            .await?;
        let response = ensure_success(response).await?;
        parse_manual_entry(response.json().await?)
    }

    async fn scrape_business(&self, business_name: &str, city: &str) -> Result<ScrapeResponse> {
        let response = self
            .client
            .post(self.url("/api/scrape"))
            .json(&json!({ "business_name": business_name, "city": city }))
            .send()
            .await?;
        let response = ensure_success(response).await?;
        Ok(response.json().await?)
    }

    async fn generate_pdf(&self, template: &str, record: &Record) -> Result<Vec<u8>> {
        let data = serde_json::to_string(record)?;
        let response = self
            .client
            .post(self.url("/api/generate-pdf"))
            .form(&[("template_path", template), ("data", data.as_str())])
            .send()
            .await?;
        let response = ensure_success(response).await?;
        Ok(response.bytes().await?.to_vec())
    }
}
