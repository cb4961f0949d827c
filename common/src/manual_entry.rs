//! Manual Entry tab
//!
//! One-record form with add/remove against a local accounts list and a
//! business-license lookup that fills the account number. Each async
//! action is split into `begin_*` / `finish_*` so a UI can run the API
//! call elsewhere; the `async fn`s chain both halves.

use crate::api::FormFillerApi;
use crate::error::{Error, Result};
use crate::form::{Form, ManualField};
use crate::log::LogStore;
use crate::types::{FormState, ManualEntryResponse, ScrapeResponse};

pub struct ManualEntryTab {
    form: Form<FormState>,
    accounts: Vec<FormState>,
    selected: Option<usize>,
    is_submitting: bool,
    is_scraping: bool,
    log: LogStore,
}

impl ManualEntryTab {
    pub fn new(log: LogStore) -> Self {
        Self {
            form: Form::default(),
            accounts: Vec::new(),
            selected: None,
            is_submitting: false,
            is_scraping: false,
            log,
        }
    }

    pub fn form(&self) -> &Form<FormState> {
        &self.form
    }

    pub fn value(&self, field: ManualField) -> &str {
        self.form.value(field)
    }

    pub fn accounts(&self) -> &[FormState] {
        &self.accounts
    }

    pub fn selected(&self) -> Option<usize> {
        self.selected
    }

    pub fn is_submitting(&self) -> bool {
        self.is_submitting
    }

    pub fn is_scraping(&self) -> bool {
        self.is_scraping
    }

    pub fn is_busy(&self) -> bool {
        self.is_submitting || self.is_scraping
    }

    pub fn can_scrape(&self) -> bool {
        !self.is_busy()
            && !self.value(ManualField::Client).is_empty()
            && !self.value(ManualField::City).is_empty()
    }

    pub fn handle_change(&mut self, field: ManualField, value: impl Into<String>) {
        if !self.is_busy() {
            self.form.handle_change(field, value);
        }
    }

    /// Re-selecting the current row keeps it selected
    pub fn select(&mut self, index: usize) {
        if index < self.accounts.len() {
            self.selected = Some(index);
        }
    }

    /// No-op without a selection
    pub fn remove_selected(&mut self) -> Option<FormState> {
        let index = self.selected.take()?;
        if index >= self.accounts.len() {
            return None;
        }
        let removed = self.accounts.remove(index);
        self.log
            .info(format!("Removed account: {}", removed.account_number_or("Unknown")));
        Some(removed)
    }

    /// Validated, normalized entry to submit
    pub fn begin_add(&mut self) -> Result<FormState> {
        if self.is_busy() {
            return Err(Error::Validation("Another request is in progress".to_string()));
        }
        let data = self.form.data();
        if !data.has_any_field() {
            let message = "Please fill in at least one field";
            self.log.error(message);
            return Err(Error::Validation(message.to_string()));
        }
        self.is_submitting = true;
        Ok(data.normalized())
    }

    pub fn finish_add(&mut self, entry: FormState, response: Result<ManualEntryResponse>) -> Result<()> {
        self.is_submitting = false;
        let outcome = response.and_then(|response| {
            if response.success {
                Ok(())
            } else {
                Err(Error::Transport("Failed to add account".to_string()))
            }
        });
        match outcome {
            Ok(()) => {
                self.log
                    .success(format!("Added account: {}", entry.account_number_or("Unknown")));
                self.accounts.push(entry);
                self.form.reset();
                Ok(())
            }
            Err(err) => {
                self.log.error(format!("Failed to add account: {err}"));
                Err(err)
            }
        }
    }

    pub async fn add_account(&mut self, api: &dyn FormFillerApi) -> Result<()> {
        let entry = self.begin_add()?;
        let response = api.submit_manual_entry(&entry).await;
        self.finish_add(entry, response)
    }

    /// Business name and city to look up
    pub fn begin_scrape(&mut self) -> Result<(String, String)> {
        if self.is_busy() {
            return Err(Error::Validation("Another request is in progress".to_string()));
        }
        let client = self.value(ManualField::Client).to_string();
        let city = self.value(ManualField::City).to_string();
        if client.is_empty() || city.is_empty() {
            let message = "Please provide business name and city for scraping";
            self.log.error(message);
            return Err(Error::Validation(message.to_string()));
        }
        self.is_scraping = true;
        Ok((client, city))
    }

    /// Copies the first license number into the account number through
    /// the same change handler as typing
    pub fn finish_scrape(&mut self, response: Result<ScrapeResponse>) -> Result<Option<String>> {
        self.is_scraping = false;
        match response {
            Ok(response) => match response.results.into_iter().next() {
                Some(info) => {
                    self.handle_change(ManualField::AccountNumber, info.license_number.clone());
                    self.log
                        .success(format!("Found business license: {}", info.license_number));
                    Ok(Some(info.license_number))
                }
                None => {
                    self.log.info("No business license found");
                    Ok(None)
                }
            },
            Err(err) => {
                self.log.error(format!("Scraping failed: {err}"));
                Err(err)
            }
        }
    }

    pub async fn scrape(&mut self, api: &dyn FormFillerApi) -> Result<Option<String>> {
        let (client, city) = self.begin_scrape()?;
        let response = api.scrape_business(&client, &city).await;
        self.finish_scrape(response)
    }
}
