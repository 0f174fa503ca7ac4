use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum TenkenError {
    #[error("PDF extraction failed: {0}")]
    Extraction(String),

    #[error("pdftotext not found. Install poppler: brew install poppler (macOS) or apt install poppler-utils (Linux)")]
    PdftotextNotFound,

    #[error("pdftotext failed with exit code {code}: {stderr}")]
    PdftotextFailed { code: i32, stderr: String },

    #[error("failed to parse ticket file: {0}")]
    TicketParse(String),

    #[error("ticket file is missing the required '{0}' column")]
    MissingColumn(String),

    #[error("unsupported file format: {0}. Expected .csv, .xlsx, .xls or .ods")]
    UnsupportedFormat(String),

    #[error("failed to load keyword lexicon from {path}: {reason}")]
    LexiconLoad { path: PathBuf, reason: String },

    #[error("invalid keyword lexicon: {0}")]
    LexiconInvalid(String),

    #[error("model '{model}' is unavailable: {message}")]
    ModelUnavailable { model: String, message: String },

    #[error("API authentication failed: {0}")]
    Authentication(String),

    #[error("API rate limit exceeded: {0}")]
    RateLimit(String),

    #[error("network error: {0}")]
    Network(String),

    #[error("analysis response did not match the expected schema: {0}")]
    InvalidResponse(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl TenkenError {
    /// True for errors where the AI analyzer should give way to keyword rules.
    pub fn is_service_failure(&self) -> bool {
        matches!(
            self,
            TenkenError::Authentication(_)
                | TenkenError::RateLimit(_)
                | TenkenError::Network(_)
                | TenkenError::ModelUnavailable { .. }
        )
    }

    /// True for errors caused by bad user input rather than the runtime.
    pub fn is_input_error(&self) -> bool {
        matches!(
            self,
            TenkenError::TicketParse(_)
                | TenkenError::MissingColumn(_)
                | TenkenError::UnsupportedFormat(_)
                | TenkenError::LexiconLoad { .. }
                | TenkenError::LexiconInvalid(_)
        )
    }
}
