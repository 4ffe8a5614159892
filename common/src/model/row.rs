use crate::model::cell::Cell;
use serde::{Deserialize, Serialize};

/// A rectangular block of cells read from the first worksheet of an upload.
///
/// There is no header row: the first row is data. Rows shorter than the widest
/// row are right-filled with `Cell::Empty`, so every row has exactly `width` cells.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RawTable {
    width: usize,
    rows: Vec<Vec<Cell>>,
}

impl RawTable {
    pub fn new(mut rows: Vec<Vec<Cell>>) -> Self {
        let width = rows.iter().map(Vec::len).max().unwrap_or(0);
        for row in &mut rows {
            row.resize(width, Cell::Empty);
        }
        Self { width, rows }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn rows(&self) -> &[Vec<Cell>] {
        &self.rows
    }

    pub fn into_rows(self) -> Vec<Vec<Cell>> {
        self.rows
    }
}

/// One spreadsheet row in positional order, before any normalization.
#[derive(Debug, Clone, PartialEq)]
pub struct RawRow {
    pub identifier: Cell,
    pub tax_id: Cell,
    pub rubric: Cell,
    pub value: Cell,
    pub free_text: Cell,
}

impl RawRow {
    /// Splits a row of exactly five cells into its named columns.
    pub fn from_cells(cells: Vec<Cell>) -> Option<Self> {
        let [identifier, tax_id, rubric, value, free_text]: [Cell; 5] = cells.try_into().ok()?;
        Some(Self {
            identifier,
            tax_id,
            rubric,
            value,
            free_text,
        })
    }
}

/// A row ready for the fixed-width encoder.
///
/// `identifier` is 10 digits (or empty), `tax_id` is at least 11 digits and
/// `rubric` is 6 digits (or empty). `value` keeps the source cell untouched: it is
/// only coerced to a number when the line is encoded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CanonicalRow {
    pub identifier: String,
    pub tax_id: String,
    pub rubric: String,
    pub value: Cell,
    pub free_text: String,
}
