use crate::model::batch::ValueMode;
use crate::model::row::CanonicalRow;
use serde::{Deserialize, Serialize};

/// The six batch inputs exactly as the form submits them.
///
/// Sent as the `json` part of `POST /api/batch/generate`. The backend validates and
/// pads these values before any line is written; optional fields may be omitted or
/// left blank.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchForm {
    /// Operation code or label, e.g. `"I"` or `"I - Inclusão"`.
    pub operation: String,
    /// Start of the right period, `AAAAMM`.
    pub right_start: String,
    #[serde(default)]
    pub right_end: String,
    #[serde(default)]
    pub installment_count: String,
    pub value_mode: ValueMode,
    pub document: String,
}

/// Normalized rows returned by `POST /api/batch/preview`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PreviewResponse {
    pub total_rows: usize,
    pub rows: Vec<CanonicalRow>,
}
