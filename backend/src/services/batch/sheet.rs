//! Reads an uploaded spreadsheet into a `RawTable`.
//!
//! Workbooks (`.xlsx`, `.xlsm`, `.xls`, `.xlsb`, `.ods`) are opened with `calamine`
//! and only the first worksheet is read. `.csv` files are read with the `csv` crate,
//! guessing the delimiter from the first line. In both cases the first row is data.

use crate::services::batch::error::ValidationError;
use calamine::{open_workbook_auto_from_rs, Data, Reader};
use common::model::cell::Cell;
use common::model::row::RawTable;
use std::io::Cursor;
use std::path::Path;

const WORKBOOK_EXTENSIONS: [&str; 5] = ["xlsx", "xlsm", "xls", "xlsb", "ods"];

/// Parses `bytes` according to the extension of `file_name`.
pub fn read_table(file_name: &str, bytes: Vec<u8>) -> Result<RawTable, ValidationError> {
    let extension = Path::new(file_name)
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_ascii_lowercase())
        .unwrap_or_default();

    if WORKBOOK_EXTENSIONS.contains(&extension.as_str()) {
        read_workbook(bytes)
    } else if extension == "csv" {
        read_csv(&bytes)
    } else {
        Err(ValidationError::unreadable(format!(
            "unsupported file type '{}', expected one of: {}, csv",
            file_name,
            WORKBOOK_EXTENSIONS.join(", ")
        )))
    }
}

fn read_workbook(bytes: Vec<u8>) -> Result<RawTable, ValidationError> {
    let mut workbook =
        open_workbook_auto_from_rs(Cursor::new(bytes)).map_err(ValidationError::unreadable)?;
    let range = workbook
        .worksheet_range_at(0)
        .ok_or_else(|| ValidationError::unreadable("the workbook has no worksheets"))?
        .map_err(ValidationError::unreadable)?;

    // The used range may start after column A; anchor it so leading empty columns
    // still count towards the table width.
    let column_offset = range.start().map(|(_, col)| col as usize).unwrap_or(0);

    let rows = range
        .rows()
        .map(|row| {
            let mut cells = vec![Cell::Empty; column_offset];
            cells.extend(row.iter().map(cell_from_data));
            cells
        })
        .collect();

    Ok(RawTable::new(rows))
}

fn cell_from_data(data: &Data) -> Cell {
    match data {
        Data::Int(n) => Cell::Int(*n),
        Data::Float(x) => Cell::Float(*x),
        Data::String(text) => Cell::from_text(text),
        Data::Bool(b) => Cell::Bool(*b),
        Data::DateTime(dt) => Cell::Float(dt.as_f64()),
        Data::DateTimeIso(text) | Data::DurationIso(text) => Cell::from_text(text),
        Data::Error(_) | Data::Empty => Cell::Empty,
    }
}

/// Picks the delimiter that appears most often in the first line.
fn detect_delimiter(first_line: &str) -> u8 {
    [',', ';', '\t', '|']
        .iter()
        .max_by_key(|&&d| first_line.matches(d).count())
        .filter(|&&d| first_line.contains(d))
        .map(|&d| d as u8)
        .unwrap_or(b',')
}

fn read_csv(bytes: &[u8]) -> Result<RawTable, ValidationError> {
    let text = std::str::from_utf8(bytes)
        .map_err(|_| ValidationError::unreadable("the CSV file is not valid UTF-8"))?;
    let text = text.strip_prefix('\u{feff}').unwrap_or(text);
    let first_line = text.lines().next().unwrap_or_default();

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .delimiter(detect_delimiter(first_line))
        .from_reader(text.as_bytes());

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record.map_err(ValidationError::unreadable)?;
        rows.push(record.iter().map(Cell::from_text).collect());
    }
    Ok(RawTable::new(rows))
}
