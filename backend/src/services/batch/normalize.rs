//! Turns a raw 5-column table into canonical, zero-padded rows.
//!
//! Each row is handled on its own; the only table-level rule is the column count.
//! Any bad cell rejects the whole table so no partial file can be produced later.

use crate::services::batch::error::ValidationError;
use crate::services::batch::pad::zfill;
use common::model::cell::Cell;
use common::model::row::{CanonicalRow, RawRow, RawTable};
use regex::Regex;
use std::sync::LazyLock;

pub const COLUMN_COUNT: usize = 5;

const IDENTIFIER_WIDTH: usize = 10;
const TAX_ID_WIDTH: usize = 11;
const RUBRIC_WIDTH: usize = 6;

static NON_DIGIT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\D").expect("constant pattern compiles"));

/// Validates the table shape and canonicalizes every row, keeping input order.
pub fn normalize(table: RawTable) -> Result<Vec<CanonicalRow>, ValidationError> {
    if table.width() != COLUMN_COUNT {
        return Err(ValidationError::ColumnCountMismatch {
            expected: COLUMN_COUNT,
            found: table.width(),
        });
    }

    table
        .into_rows()
        .into_iter()
        .enumerate()
        .map(|(idx, cells)| {
            let found = cells.len();
            let raw = RawRow::from_cells(cells).ok_or(ValidationError::ColumnCountMismatch {
                expected: COLUMN_COUNT,
                found,
            })?;
            canonicalize(idx + 1, raw)
        })
        .collect()
}

fn canonicalize(row: usize, raw: RawRow) -> Result<CanonicalRow, ValidationError> {
    Ok(CanonicalRow {
        identifier: identifier(row, &raw.identifier)?,
        tax_id: tax_id(&raw.tax_id),
        rubric: rubric(row, &raw.rubric)?,
        free_text: free_text(&raw.free_text),
        value: raw.value,
    })
}

/// Integer part of `x` as decimal text, or `None` when `x` is not finite.
fn truncated(x: f64) -> Option<String> {
    if !x.is_finite() {
        return None;
    }
    // `+ 0.0` turns a negative zero into a plain zero.
    Some(format!("{:.0}", x.trunc() + 0.0))
}

fn identifier(row: usize, cell: &Cell) -> Result<String, ValidationError> {
    const COLUMN: &str = "identifier";
    if cell.is_null() {
        return Ok(String::new());
    }
    let digits = match cell {
        Cell::Int(n) => n.to_string(),
        Cell::Float(x) => truncated(*x).ok_or_else(|| {
            ValidationError::invalid_cell(row, COLUMN, format!("{} is not a finite number", x))
        })?,
        Cell::Text(text) => text.trim().parse::<i64>().map(|n| n.to_string()).map_err(|_| {
            ValidationError::invalid_cell(
                row,
                COLUMN,
                format!("'{}' is not an integer", text.trim()),
            )
        })?,
        Cell::Bool(b) => {
            return Err(ValidationError::invalid_cell(
                row,
                COLUMN,
                format!("'{}' is not an integer", b),
            ))
        }
        Cell::Empty => return Ok(String::new()),
    };
    Ok(zfill(&digits, IDENTIFIER_WIDTH))
}

fn tax_id(cell: &Cell) -> String {
    let text = cell.to_string();
    let digits = NON_DIGIT.replace_all(&text, "");
    zfill(&digits, TAX_ID_WIDTH)
}

fn rubric(row: usize, cell: &Cell) -> Result<String, ValidationError> {
    const COLUMN: &str = "rubric";
    if cell.is_null() {
        return Ok(String::new());
    }
    let number = match cell {
        Cell::Int(n) => *n as f64,
        Cell::Float(x) => *x,
        Cell::Text(text) => text.trim().parse::<f64>().map_err(|_| {
            ValidationError::invalid_cell(row, COLUMN, format!("'{}' is not a number", text.trim()))
        })?,
        Cell::Bool(b) => {
            return Err(ValidationError::invalid_cell(
                row,
                COLUMN,
                format!("'{}' is not a number", b),
            ))
        }
        Cell::Empty => return Ok(String::new()),
    };
    let digits = truncated(number).ok_or_else(|| {
        ValidationError::invalid_cell(row, COLUMN, format!("{} is not a finite number", number))
    })?;
    Ok(zfill(&digits, RUBRIC_WIDTH))
}

fn free_text(cell: &Cell) -> String {
    match cell {
        Cell::Text(text) => text.clone(),
        other => other.to_string(),
    }
}
