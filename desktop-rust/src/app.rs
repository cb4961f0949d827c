use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::Arc;

use eframe::egui::{self, Color32, RichText};
use sff_common::additional_info::{CHECKBOX_GROUPS, TEXT_FIELDS};
use sff_common::{
    log_view, run_batch, BatchEvent, BatchState, Config, DirectorySink, Error, FormFillerApi,
    FormFillerSession, LogLevel, ManualField, Tab,
};

use crate::io::{pick_input_file, pick_output_dir, pick_template_file, spawn_task};
use crate::model::UiMessage;

pub struct FormFillerApp {
    session: FormFillerSession,
    api: Arc<dyn FormFillerApi>,
    active_tab: Tab,
    tx: Sender<UiMessage>,
    rx: Receiver<UiMessage>,
}

impl FormFillerApp {
    pub fn new(api: Arc<dyn FormFillerApi>, config: Config) -> Self {
        let (tx, rx) = mpsc::channel();
        let mut session = FormFillerSession::default();
        if let Some(dir) = &config.default_output_dir {
            session.files.set_output_path(dir.display().to_string());
        }
        Self {
            session,
            api,
            active_tab: Tab::default(),
            tx,
            rx,
        }
    }

    fn is_busy(&self) -> bool {
        self.session.files.is_processing() || self.session.manual.is_busy()
    }

    fn poll_messages(&mut self) {
        while let Ok(msg) = self.rx.try_recv() {
            match msg {
                UiMessage::Batch(event) => self.session.files.apply_event(&event),
                UiMessage::BatchDone(result) => self.session.files.finish(&result),
                UiMessage::AddDone { entry, response } => {
                    // Outcome is already in the session log
                    let _ = self.session.manual.finish_add(entry, response);
                }
                UiMessage::ScrapeDone(response) => {
                    let _ = self.session.manual.finish_scrape(response);
                }
            }
        }
    }

    fn start_batch(&mut self) {
        let Ok(job) = self.session.files.begin_submit() else {
            return;
        };
        let api = Arc::clone(&self.api);
        let log = self.session.log.clone();
        let abort_log = log.clone();
        let events = self.tx.clone();

        spawn_task(
            self.tx.clone(),
            move |reason| {
                abort_log.error(format!("Error processing files: {reason}"));
                UiMessage::BatchDone(Err(Error::Transport(reason)))
            },
            move || async move {
                let mut sink = DirectorySink::new(&job.output_path);
                let result = run_batch(&job, api.as_ref(), &mut sink, &log, &mut |event: BatchEvent| {
                    let _ = events.send(UiMessage::Batch(event));
                })
                .await;
                UiMessage::BatchDone(result)
            },
        );
    }

    fn start_add(&mut self) {
        let Ok(entry) = self.session.manual.begin_add() else {
            return;
        };
        let api = Arc::clone(&self.api);
        let pending = entry.clone();

        spawn_task(
            self.tx.clone(),
            move |reason| UiMessage::AddDone {
                entry: pending,
                response: Err(Error::Transport(reason)),
            },
            move || async move {
                let response = api.submit_manual_entry(&entry).await;
                UiMessage::AddDone { entry, response }
            },
        );
    }

    fn start_scrape(&mut self) {
        let Ok((client, city)) = self.session.manual.begin_scrape() else {
            return;
        };
        let api = Arc::clone(&self.api);

        spawn_task(
            self.tx.clone(),
            |reason| UiMessage::ScrapeDone(Err(Error::Transport(reason))),
            move || async move { UiMessage::ScrapeDone(api.scrape_business(&client, &city).await) },
        );
    }

    fn render_file_selection(&mut self, ui: &mut egui::Ui) {
        let processing = self.session.files.is_processing();

        egui::Grid::new("file_selection")
            .num_columns(3)
            .spacing([12.0, 10.0])
            .show(ui, |ui| {
                ui.label(RichText::new("Input File:").strong());
                let name = self.session.files.input_file().map(|f| f.name.as_str()).unwrap_or("");
                ui.label(if name.is_empty() { "Select input file (CSV, XLSX, DOCX, TXT)" } else { name });
                if ui.add_enabled(!processing, egui::Button::new("Browse")).clicked() {
                    if let Some(file) = pick_input_file() {
                        self.session.files.select_input_file(file);
                    }
                }
                ui.end_row();

                ui.label(RichText::new("PDF Template:").strong());
                let name = self.session.files.template_file().map(|f| f.name.as_str()).unwrap_or("");
                ui.label(if name.is_empty() { "Select PDF template" } else { name });
                if ui.add_enabled(!processing, egui::Button::new("Browse")).clicked() {
                    if let Some(file) = pick_template_file() {
                        self.session.files.select_template_file(file);
                    }
                }
                ui.end_row();

                ui.label(RichText::new("Output Path:").strong());
                let mut output = self.session.files.output_path().to_string();
                let edit = egui::TextEdit::singleline(&mut output)
                    .hint_text("Specify output folder path")
                    .desired_width(420.0);
                if ui.add_enabled(!processing, edit).changed() {
                    self.session.files.set_output_path(output);
                }
                if ui.add_enabled(!processing, egui::Button::new("Browse")).clicked() {
                    if let Some(dir) = pick_output_dir() {
                        self.session.files.set_output_path(dir.display().to_string());
                    }
                }
                ui.end_row();
            });

        let progress = self.session.files.progress();
        if progress > 0 {
            ui.add_space(12.0);
            let text = match self.session.files.state() {
                BatchState::GeneratingPdfs { current, total } => {
                    format!("Generating PDFs {current}/{total} - {progress}%")
                }
                _ => format!("Upload Progress {progress}%"),
            };
            ui.add(egui::ProgressBar::new(f32::from(progress) / 100.0).text(text));
        }

        ui.add_space(16.0);
        ui.vertical_centered(|ui| {
            let label = if processing { "Processing..." } else { "Process Files" };
            if ui
                .add_enabled(self.session.files.can_submit(), egui::Button::new(label))
                .clicked()
            {
                self.start_batch();
            }
        });
    }

    fn render_manual_entry(&mut self, ui: &mut egui::Ui) {
        let busy = self.session.manual.is_busy();

        egui::Grid::new("manual_entry")
            .num_columns(2)
            .spacing([12.0, 8.0])
            .show(ui, |ui| {
                for field in ManualField::ALL {
                    ui.label(RichText::new(format!("{}:", field.label())).strong());
                    let mut value = self.session.manual.value(field).to_string();
                    let edit = egui::TextEdit::singleline(&mut value).desired_width(360.0);
                    if ui.add_enabled(!busy, edit).changed() {
                        self.session.manual.handle_change(field, value);
                    }
                    ui.end_row();
                }
            });

        ui.add_space(12.0);
        ui.horizontal(|ui| {
            let add_label = if self.session.manual.is_submitting() { "Adding..." } else { "Add Account" };
            if ui.add_enabled(!busy, egui::Button::new(add_label)).clicked() {
                self.start_add();
            }
            let scrape_label = if self.session.manual.is_scraping() { "Scraping..." } else { "Scrape Business" };
            if ui
                .add_enabled(self.session.manual.can_scrape(), egui::Button::new(scrape_label))
                .clicked()
            {
                self.start_scrape();
            }
            let can_remove = self.session.manual.selected().is_some() && !busy;
            if ui.add_enabled(can_remove, egui::Button::new("Remove Selected")).clicked() {
                self.session.manual.remove_selected();
            }
        });

        ui.add_space(12.0);
        ui.separator();
        egui::ScrollArea::vertical()
            .id_source("accounts")
            .max_height(280.0)
            .auto_shrink([false, true])
            .show(ui, |ui| {
                if self.session.manual.accounts().is_empty() {
                    ui.vertical_centered(|ui| {
                        ui.label(RichText::new("No accounts added yet").color(Color32::from_gray(150)));
                    });
                    return;
                }
                let selected = self.session.manual.selected();
                let mut clicked = None;
                for (index, account) in self.session.manual.accounts().iter().enumerate() {
                    let text = format!(
                        "Account: {}\nBusiness: {}\nCity: {}",
                        account.account_number.as_deref().unwrap_or("N/A"),
                        account.client.as_deref().unwrap_or("N/A"),
                        account.city.as_deref().unwrap_or("N/A"),
                    );
                    if ui.selectable_label(selected == Some(index), text).clicked() {
                        clicked = Some(index);
                    }
                }
                if let Some(index) = clicked {
                    self.session.manual.select(index);
                }
            });
    }

    fn render_additional_info(&mut self, ui: &mut egui::Ui) {
        egui::ScrollArea::vertical().id_source("additional_info").show(ui, |ui| {
            egui::Grid::new("additional_text")
                .num_columns(4)
                .spacing([12.0, 8.0])
                .show(ui, |ui| {
                    for (i, field) in TEXT_FIELDS.iter().enumerate() {
                        ui.label(RichText::new(format!("{field}:")).strong());
                        let mut value = self.session.additional_info.text(field).to_string();
                        if ui
                            .add(egui::TextEdit::singleline(&mut value).desired_width(200.0))
                            .changed()
                        {
                            self.session.additional_info.set_text(field, value);
                        }
                        if i % 2 == 1 {
                            ui.end_row();
                        }
                    }
                });

            ui.add_space(12.0);
            for (group, options) in CHECKBOX_GROUPS {
                ui.label(RichText::new(*group).strong().size(16.0));
                ui.horizontal_wrapped(|ui| {
                    for option in options.iter() {
                        let mut checked = self.session.additional_info.is_checked(group, option);
                        if ui.checkbox(&mut checked, *option).changed() {
                            self.session.additional_info.set_checked(group, option, checked);
                        }
                    }
                });
                ui.add_space(6.0);
            }

            ui.add_space(12.0);
            ui.vertical_centered(|ui| {
                if ui.button("Save Information").clicked() {
                    self.session.additional_info.save();
                }
            });
        });
    }

    fn render_log(&self, ui: &mut egui::Ui) {
        let entries = self.session.log.entries();
        egui::ScrollArea::vertical()
            .id_source("log")
            .auto_shrink([false, false])
            .stick_to_bottom(true)
            .show(ui, |ui| {
                if entries.is_empty() {
                    ui.vertical_centered(|ui| {
                        ui.label(RichText::new(log_view::EMPTY_PLACEHOLDER).color(Color32::from_gray(150)));
                    });
                    return;
                }
                for entry in &entries {
                    let color = match entry.level {
                        LogLevel::Error => Color32::from_rgb(220, 80, 80),
                        LogLevel::Success => Color32::from_rgb(90, 180, 100),
                        LogLevel::Info => Color32::from_gray(200),
                    };
                    ui.label(RichText::new(log_view::format_entry(entry)).monospace().color(color));
                }
            });
    }
}

impl eframe::App for FormFillerApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.poll_messages();
        if self.is_busy() {
            ctx.request_repaint_after(std::time::Duration::from_millis(100));
        }

        egui::TopBottomPanel::top("tabs").show(ctx, |ui| {
            ui.add_space(6.0);
            ui.heading("Saccani Form Filler");
            ui.horizontal(|ui| {
                for tab in Tab::ALL {
                    ui.selectable_value(&mut self.active_tab, tab, tab.title());
                }
            });
            ui.add_space(4.0);
        });

        egui::CentralPanel::default().show(ctx, |ui| match self.active_tab {
            Tab::FileSelection => self.render_file_selection(ui),
            Tab::ManualEntry => self.render_manual_entry(ui),
            Tab::AdditionalInfo => self.render_additional_info(ui),
            Tab::Log => self.render_log(ui),
        });
    }
}
