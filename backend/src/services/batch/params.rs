use crate::services::batch::error::ParameterError;
use crate::services::batch::pad::{blank, ljust, zfill};
use common::model::batch::{OperationCode, ValueMode};
use common::requests::BatchForm;

const PERIOD_WIDTH: usize = 6;
const INSTALLMENTS_WIDTH: usize = 2;
const DOCUMENT_WIDTH: usize = 15;

/// Validated batch inputs, with every fixed-width field already rendered.
///
/// Only constructible through [`BatchParameters::new`] or `TryFrom<BatchForm>`, so an
/// instance always carries a non-empty start period and a document of at most 15
/// characters.
#[derive(Debug, Clone, PartialEq)]
pub struct BatchParameters {
    operation: OperationCode,
    right_start: String,
    right_end: String,
    installment_count: String,
    value_mode: ValueMode,
    document: String,
}

impl BatchParameters {
    pub fn new(
        operation: OperationCode,
        right_start: &str,
        right_end: &str,
        installment_count: &str,
        value_mode: ValueMode,
        document: &str,
    ) -> Result<Self, ParameterError> {
        let right_start = right_start.trim();
        if right_start.is_empty() {
            return Err(ParameterError::MissingRequiredField("right_start"));
        }
        let right_start = padded_digits("right_start", right_start, PERIOD_WIDTH)?;
        let right_end = optional_digits("right_end", right_end, PERIOD_WIDTH)?;
        let installment_count =
            optional_digits("installment_count", installment_count, INSTALLMENTS_WIDTH)?;

        let document = document.trim();
        if document.is_empty() {
            return Err(ParameterError::MissingRequiredField("document"));
        }
        let len = document.chars().count();
        if len > DOCUMENT_WIDTH {
            return Err(ParameterError::DocumentTooLong {
                max: DOCUMENT_WIDTH,
                len,
            });
        }

        Ok(Self {
            operation,
            right_start,
            right_end,
            installment_count,
            value_mode,
            document: ljust(document, DOCUMENT_WIDTH),
        })
    }

    pub fn operation(&self) -> OperationCode {
        self.operation
    }

    /// Six characters, zero-padded.
    pub fn right_start(&self) -> &str {
        &self.right_start
    }

    /// Six characters, zero-padded, or six spaces when not informed.
    pub fn right_end(&self) -> &str {
        &self.right_end
    }

    /// Two characters, zero-padded, or two spaces when not informed.
    pub fn installment_count(&self) -> &str {
        &self.installment_count
    }

    pub fn value_mode(&self) -> ValueMode {
        self.value_mode
    }

    /// Fifteen characters, left-justified.
    pub fn document(&self) -> &str {
        &self.document
    }
}

impl TryFrom<BatchForm> for BatchParameters {
    type Error = ParameterError;

    fn try_from(form: BatchForm) -> Result<Self, Self::Error> {
        let operation = form
            .operation
            .parse::<OperationCode>()
            .map_err(|e| ParameterError::UnknownOperation(e.0))?;
        Self::new(
            operation,
            &form.right_start,
            &form.right_end,
            &form.installment_count,
            form.value_mode,
            &form.document,
        )
    }
}

fn padded_digits(field: &'static str, value: &str, width: usize) -> Result<String, ParameterError> {
    if value.len() > width || !value.bytes().all(|b| b.is_ascii_digit()) {
        return Err(ParameterError::NotDigits {
            field,
            max: width,
            value: value.to_string(),
        });
    }
    Ok(zfill(value, width))
}

fn optional_digits(field: &'static str, value: &str, width: usize) -> Result<String, ParameterError> {
    let value = value.trim();
    if value.is_empty() {
        Ok(blank(width))
    } else {
        padded_digits(field, value, width)
    }
}
