use thiserror::Error;

#[derive(Error, Debug)]
pub enum FormFillerError {
    #[error(transparent)]
    Common(#[from] sff_common::Error),

    #[error("File not found: {0}")]
    FileNotFound(String),

    #[error("Batch finished with {failed} of {total} records failing")]
    PartialFailure { failed: usize, total: usize },

    #[error("Interactive input failed: {0}")]
    Prompt(String),

    #[error("JSON error: {0}")]
    JsonParse(#[from] serde_json::Error),
}

impl From<dialoguer::Error> for FormFillerError {
    fn from(err: dialoguer::Error) -> Self {
        FormFillerError::Prompt(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, FormFillerError>;
