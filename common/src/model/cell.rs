use serde::{Deserialize, Serialize};
use std::fmt;

/// A single spreadsheet cell after typed extraction.
///
/// The backend converts whatever the spreadsheet reader produced into one of these
/// variants before normalization, so the rest of the pipeline never has to guess
/// what a cell holds. Date cells arrive as their serial number (`Float`) and error
/// cells arrive as `Empty`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(tag = "type", content = "value")]
pub enum Cell {
    #[default]
    Empty,
    Int(i64),
    Float(f64),
    Text(String),
    Bool(bool),
}

impl Cell {
    /// Builds a cell from raw text, treating blank text as an empty cell.
    pub fn from_text(text: &str) -> Self {
        if text.trim().is_empty() {
            Cell::Empty
        } else {
            Cell::Text(text.to_string())
        }
    }

    /// `true` for empty cells and text cells that only contain whitespace.
    pub fn is_null(&self) -> bool {
        match self {
            Cell::Empty => true,
            Cell::Text(text) => text.trim().is_empty(),
            _ => false,
        }
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cell::Empty => Ok(()),
            Cell::Int(n) => write!(f, "{}", n),
            // Integral floats print without a fractional part so that numeric
            // identifiers read from a sheet keep their digits intact.
            Cell::Float(x) if x.is_finite() && x.fract() == 0.0 => write!(f, "{:.0}", x),
            Cell::Float(x) => write!(f, "{}", x),
            Cell::Text(text) => f.write_str(text),
            Cell::Bool(b) => write!(f, "{}", b),
        }
    }
}

impl From<&str> for Cell {
    fn from(text: &str) -> Self {
        Cell::from_text(text)
    }
}

impl From<i64> for Cell {
    fn from(n: i64) -> Self {
        Cell::Int(n)
    }
}

impl From<f64> for Cell {
    fn from(x: f64) -> Self {
        Cell::Float(x)
    }
}
