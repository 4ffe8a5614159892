use thiserror::Error;

/// Failures while turning an upload into canonical rows. The whole table is rejected.
#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("could not read the spreadsheet: {0}")]
    UnreadableSource(String),
    #[error("the spreadsheet must have exactly {expected} columns, found {found}")]
    ColumnCountMismatch { expected: usize, found: usize },
    #[error("row {row}, column '{column}': {reason}")]
    InvalidCell {
        row: usize,
        column: &'static str,
        reason: String,
    },
}

impl ValidationError {
    pub fn unreadable(cause: impl std::fmt::Display) -> Self {
        Self::UnreadableSource(cause.to_string())
    }

    pub fn invalid_cell(row: usize, column: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidCell {
            row,
            column,
            reason: reason.into(),
        }
    }
}

/// Failures while validating the six batch inputs.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParameterError {
    #[error("field '{0}' is required")]
    MissingRequiredField(&'static str),
    #[error("unknown operation type '{0}'")]
    UnknownOperation(String),
    #[error("field '{field}' must contain at most {max} digits, got '{value}'")]
    NotDigits {
        field: &'static str,
        max: usize,
        value: String,
    },
    #[error("document must have at most {max} characters, got {len}")]
    DocumentTooLong { max: usize, len: usize },
}

/// Failures while writing the fixed-width lines. No partial file is produced.
#[derive(Debug, Error, PartialEq)]
pub enum EncodingError {
    #[error("row {row}: invalid value: {reason}")]
    InvalidValue { row: usize, reason: String },
}

/// Everything the batch endpoints can report back to the user.
#[derive(Debug, Error)]
pub enum BatchError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Parameters(#[from] ParameterError),
    #[error(transparent)]
    Encoding(#[from] EncodingError),
    #[error("upload failed: {0}")]
    Upload(String),
    #[error("missing multipart field '{0}'")]
    MissingPart(&'static str),
    #[error("invalid form data: {0}")]
    Form(String),
    #[error("upload exceeds the limit of {0} bytes")]
    TooLarge(usize),
}
