//! Placeholder PDF rendering used by the mock API
//!
//! Writes the record as pretty JSON onto US Letter pages. No template
//! fields are filled.

use printpdf::{BuiltinFont, Mm, PdfDocument};

use crate::error::{Error, Result};
use crate::types::Record;

const LETTER_WIDTH_MM: f32 = 215.9;
const LETTER_HEIGHT_MM: f32 = 279.4;
const MARGIN_MM: f32 = 20.0;
const LINE_HEIGHT_MM: f32 = 6.0;
const TITLE_SIZE: f32 = 16.0;
const BODY_SIZE: f32 = 10.0;

/// `client` value of the record, or "Unknown"
pub fn record_client(record: &Record) -> String {
    match record.get("client") {
        Some(serde_json::Value::String(s)) if !s.is_empty() => s.clone(),
        Some(serde_json::Value::Null) | None => "Unknown".to_string(),
        Some(serde_json::Value::String(_)) => "Unknown".to_string(),
        Some(other) => other.to_string(),
    }
}

pub fn render_placeholder_pdf(template: &str, record: &Record) -> Result<Vec<u8>> {
    let title = format!("Mock PDF for {}", record_client(record));
    let body = serde_json::to_string_pretty(record)?;

    let mut lines = vec![format!("Template: {template}"), "Data:".to_string()];
    lines.extend(body.lines().map(str::to_string));

    let (doc, first_page, first_layer) =
        PdfDocument::new(&title, Mm(LETTER_WIDTH_MM), Mm(LETTER_HEIGHT_MM), "Layer 1");
    let font = doc
        .add_builtin_font(BuiltinFont::Helvetica)
        .map_err(|e| Error::Pdf(format!("font: {e:?}")))?;

    let mut layer = doc.get_page(first_page).get_layer(first_layer);
    let mut y = LETTER_HEIGHT_MM - MARGIN_MM;
    layer.use_text(title.as_str(), TITLE_SIZE, Mm(MARGIN_MM), Mm(y), &font);
    y -= LINE_HEIGHT_MM * 2.0;

    for line in &lines {
        if y < MARGIN_MM {
            let (page, page_layer) =
                doc.add_page(Mm(LETTER_WIDTH_MM), Mm(LETTER_HEIGHT_MM), "Layer 1");
            layer = doc.get_page(page).get_layer(page_layer);
            y = LETTER_HEIGHT_MM - MARGIN_MM;
        }
        layer.use_text(line.as_str(), BODY_SIZE, Mm(MARGIN_MM), Mm(y), &font);
        y -= LINE_HEIGHT_MM;
    }

    doc.save_to_bytes()
        .map_err(|e| Error::Pdf(format!("save: {e:?}")))
}
