use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The transaction type applied to every line of a batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OperationCode {
    /// `I - Inclusão`
    Inclusion,
    /// `A - Alteração`
    Alteration,
    /// `E - Exclusão`
    Exclusion,
    /// `F - Finalização`
    Finalization,
}

impl OperationCode {
    pub const ALL: [OperationCode; 4] = [
        OperationCode::Inclusion,
        OperationCode::Alteration,
        OperationCode::Exclusion,
        OperationCode::Finalization,
    ];

    /// The single character written at the start of each output line.
    pub fn code(self) -> char {
        match self {
            OperationCode::Inclusion => 'I',
            OperationCode::Alteration => 'A',
            OperationCode::Exclusion => 'E',
            OperationCode::Finalization => 'F',
        }
    }

    /// The label shown in the operation selector of the form.
    pub fn label(self) -> &'static str {
        match self {
            OperationCode::Inclusion => "I - Inclusão",
            OperationCode::Alteration => "A - Alteração",
            OperationCode::Exclusion => "E - Exclusão",
            OperationCode::Finalization => "F - Finalização",
        }
    }
}

impl fmt::Display for OperationCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Error returned when a string names none of the four operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownOperation(pub String);

impl fmt::Display for UnknownOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown operation type '{}'", self.0)
    }
}

impl std::error::Error for UnknownOperation {}

impl FromStr for OperationCode {
    type Err = UnknownOperation;

    /// Accepts the bare code (`"I"`) or a form label starting with it (`"I - Inclusão"`).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let code = trimmed.split_whitespace().next().unwrap_or_default();
        OperationCode::ALL
            .into_iter()
            .find(|op| code.eq_ignore_ascii_case(&op.code().to_string()))
            .ok_or_else(|| UnknownOperation(trimmed.to_string()))
    }
}

/// How the numeric column of the sheet is interpreted for the whole batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ValueMode {
    /// A multiplier written with four decimal places into the index field.
    #[serde(alias = "index", alias = "Índice", alias = "Indice")]
    Index,
    /// A monetary amount written with two decimal places into the amount field.
    #[serde(alias = "amount", alias = "Valor", alias = "valor")]
    Amount,
}
