use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum CompareError {
    #[error("missing data file: {}", .0.display())]
    MissingFile(PathBuf),

    #[error("malformed data in {file}: {detail}")]
    DataFormat { file: String, detail: String },

    #[error("club not found: {0}")]
    NotFound(String),

    #[error("{0}")]
    Validation(String),

    #[error("export failed: {0}")]
    Export(String),
}

impl CompareError {
    pub fn data_format(file: impl Into<String>, detail: impl Into<String>) -> Self {
        Self::DataFormat {
            file: file.into(),
            detail: detail.into(),
        }
    }

    // Load failures abort startup; everything else only aborts the triggering action.
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::MissingFile(_) | Self::DataFormat { .. })
    }
}

pub type Result<T> = std::result::Result<T, CompareError>;
