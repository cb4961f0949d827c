//! File slots of the File Selection tab and where generated PDFs go

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};

/// Accepted input data extensions (lowercase, with dot)
pub const INPUT_EXTENSIONS: &[&str] = &[".csv", ".xlsx", ".xls", ".docx", ".txt"];
pub const TEMPLATE_EXTENSION: &str = ".pdf";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectedFile {
    pub name: String,
    pub path: PathBuf,
}

impl SelectedFile {
    pub fn from_path(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| path.display().to_string());
        Self { name, path }
    }

    pub async fn read(&self) -> Result<Vec<u8>> {
        Ok(tokio::fs::read(&self.path).await?)
    }
}

/// Lowercased extension including the dot; empty when there is none
fn extension_of(name: &str) -> String {
    name.rfind('.')
        .map(|idx| name[idx..].to_lowercase())
        .unwrap_or_default()
}

pub fn validate_input_file(name: &str) -> Result<()> {
    let ext = extension_of(name);
    if INPUT_EXTENSIONS.contains(&ext.as_str()) {
        Ok(())
    } else {
        Err(Error::Validation(format!(
            "Invalid file type. Please select: {}",
            INPUT_EXTENSIONS.join(", ")
        )))
    }
}

pub fn validate_template_file(name: &str) -> Result<()> {
    if name.to_lowercase().ends_with(TEMPLATE_EXTENSION) {
        Ok(())
    } else {
        Err(Error::Validation("Template must be a PDF file".to_string()))
    }
}

/// Destination for generated PDFs
pub trait PdfSink {
    fn save(&mut self, file_name: &str, bytes: &[u8]) -> Result<PathBuf>;
}

/// Writes each PDF into one directory, created on first use.
/// A name already written by this sink gets a ` (n)` suffix instead of
/// overwriting the earlier file.
#[derive(Debug, Clone)]
pub struct DirectorySink {
    dir: PathBuf,
    written: HashSet<PathBuf>,
}

impl DirectorySink {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            written: HashSet::new(),
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Next name not yet written by this sink
    fn free_path(&self, file_name: &str) -> PathBuf {
        let path = self.dir.join(file_name);
        if !self.written.contains(&path) {
            return path;
        }
        let (stem, ext) = split_extension(file_name);
        (1..)
            .map(|n| match ext {
                Some(ext) => self.dir.join(format!("{stem} ({n}).{ext}")),
                None => self.dir.join(format!("{stem} ({n})")),
            })
            .find(|candidate| !self.written.contains(candidate))
            .unwrap_or(path)
    }
}

impl PdfSink for DirectorySink {
    fn save(&mut self, file_name: &str, bytes: &[u8]) -> Result<PathBuf> {
        std::fs::create_dir_all(&self.dir)?;
        let path = self.free_path(&sanitize_file_name(file_name));
        std::fs::write(&path, bytes)?;
        self.written.insert(path.clone());
        tracing::debug!(path = %path.display(), size = bytes.len(), "pdf written");
        Ok(path)
    }
}

fn split_extension(name: &str) -> (&str, Option<&str>) {
    match name.rsplit_once('.') {
        Some((stem, ext)) if !ext.is_empty() => (stem, Some(ext)),
        _ => (name, None),
    }
}

fn clean_part(part: &str) -> String {
    let cleaned: String = part
        .chars()
        .map(|c| match c {
            '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '_',
            c if c.is_control() => '_',
            c => c,
        })
        .collect();
    let trimmed = cleaned.trim_start_matches('.');
    if trimmed.is_empty() {
        "_".to_string()
    } else {
        trimmed.to_string()
    }
}

/// Keeps a record's business name from escaping the output directory.
/// The extension survives even when the stem is nothing but dots.
pub fn sanitize_file_name(name: &str) -> String {
    match split_extension(name) {
        (stem, Some(ext)) => format!("{}.{}", clean_part(stem), clean_part(ext)),
        (stem, None) => clean_part(stem),
    }
}
