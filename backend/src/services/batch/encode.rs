//! Fixed-width line encoder.
//!
//! Every canonical row becomes one line laid out as
//!
//! ```text
//! [op 1][1010 4][start 6][end 6][identifier 10][tax id 11][rubric 6][seq 2]
//! [installments 2][index 10][amount 9][document 15][free text ...]\n
//! ```
//!
//! 82 fixed characters followed by the free text of the row. Exactly one of the index
//! and amount fields carries data, chosen once for the whole batch; the other is
//! filled with spaces.

use crate::services::batch::error::EncodingError;
use crate::services::batch::pad::{blank, zfill};
use crate::services::batch::params::BatchParameters;
use common::model::batch::ValueMode;
use common::model::cell::Cell;
use common::model::row::CanonicalRow;
use log::debug;
use std::collections::HashMap;

/// Transaction family marker written on every line.
pub const BATCH_MARKER: &str = "1010";
/// Characters before the free text on every line.
pub const FIXED_WIDTH: usize = 82;

const SEQUENCE_WIDTH: usize = 2;
const INDEX_WIDTH: usize = 10;
const AMOUNT_WIDTH: usize = 9;
const LINE_TERMINATOR: char = '\n';

/// Running count of rows seen per tax id within one encoding run.
#[derive(Debug, Default)]
struct TaxIdCounter {
    counts: HashMap<String, u32>,
}

impl TaxIdCounter {
    /// Records one more occurrence of `tax_id` and returns its sequence number.
    fn next(&mut self, tax_id: &str) -> String {
        let count = self.counts.entry(tax_id.to_string()).or_insert(0);
        *count += 1;
        zfill(&count.to_string(), SEQUENCE_WIDTH)
    }

    fn distinct(&self) -> usize {
        self.counts.len()
    }
}

/// Encodes all rows into the text of the download, in input order.
///
/// `BatchParameters` can only be built with a non-empty start period, so the
/// encoder does not check it again.
pub fn encode(rows: &[CanonicalRow], params: &BatchParameters) -> Result<Vec<u8>, EncodingError> {
    let mut counter = TaxIdCounter::default();
    let mut out = String::with_capacity(rows.len() * (FIXED_WIDTH + 32));

    for (idx, row) in rows.iter().enumerate() {
        let sequence = counter.next(&row.tax_id);
        let value = numeric_value(idx + 1, &row.value)?;
        let (index_field, amount_field) = value_fields(value, params.value_mode());

        out.push(params.operation().code());
        out.push_str(BATCH_MARKER);
        out.push_str(params.right_start());
        out.push_str(params.right_end());
        out.push_str(&row.identifier);
        out.push_str(&row.tax_id);
        out.push_str(&row.rubric);
        out.push_str(&sequence);
        out.push_str(params.installment_count());
        out.push_str(&index_field);
        out.push_str(&amount_field);
        out.push_str(params.document());
        out.push_str(&row.free_text);
        out.push(LINE_TERMINATOR);
    }

    debug!(
        "Encoded {} rows for {} distinct tax ids ({:?} mode)",
        rows.len(),
        counter.distinct(),
        params.value_mode()
    );
    Ok(out.into_bytes())
}

fn numeric_value(row: usize, cell: &Cell) -> Result<f64, EncodingError> {
    let invalid = |reason: String| EncodingError::InvalidValue { row, reason };
    let value = match cell {
        Cell::Int(n) => *n as f64,
        Cell::Float(x) => *x,
        Cell::Text(text) => text
            .trim()
            .parse::<f64>()
            .map_err(|_| invalid(format!("'{}' is not a number", text.trim())))?,
        Cell::Empty => return Err(invalid("the cell is empty".to_string())),
        Cell::Bool(b) => return Err(invalid(format!("'{}' is not a number", b))),
    };
    if !value.is_finite() {
        return Err(invalid(format!("{} is not a finite number", value)));
    }
    Ok(value)
}

/// Returns `(index_field, amount_field)` for one value.
fn value_fields(value: f64, mode: ValueMode) -> (String, String) {
    match mode {
        ValueMode::Index => {
            let digits = format!("{:.4}", value).replace('.', "");
            (zfill(&digits, INDEX_WIDTH), blank(AMOUNT_WIDTH))
        }
        ValueMode::Amount => {
            let digits = format!("{:.2}", value).replace('.', "");
            (blank(INDEX_WIDTH), zfill(&digits, AMOUNT_WIDTH))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use common::model::batch::OperationCode;

    fn params(mode: ValueMode) -> BatchParameters {
        BatchParameters::new(OperationCode::Inclusion, "202401", "", "", mode, "DOC1").unwrap()
    }

    fn canonical(tax_id: &str, value: Cell, free_text: &str) -> CanonicalRow {
        CanonicalRow {
            identifier: "0001234567".to_string(),
            tax_id: tax_id.to_string(),
            rubric: "000012".to_string(),
            value,
            free_text: free_text.to_string(),
        }
    }

    fn lines(bytes: Vec<u8>) -> Vec<String> {
        String::from_utf8(bytes)
            .unwrap()
            .lines()
            .map(str::to_string)
            .collect()
    }

    #[test]
    fn encodes_amount_line() {
        let rows = [canonical("12345678900", Cell::from("150.5"), "NOTE")];
        let out = lines(encode(&rows, &params(ValueMode::Amount)).unwrap());

        let expected = concat!(
            "I",
            "1010",
            "202401",
            "      ",
            "0001234567",
            "12345678900",
            "000012",
            "01",
            "  ",
            "          ",
            "000015050",
            "DOC1           ",
            "NOTE"
        );
        assert_eq!(out, vec![expected.to_string()]);
        assert!(out[0].starts_with("I1010202401      "));
        assert!(out[0].ends_with("NOTE"));
        assert_eq!(out[0].len(), FIXED_WIDTH + 4);
    }

    #[test]
    fn field_positions_in_amount_mode() {
        let rows = [canonical("12345678900", Cell::Float(150.5), "NOTE")];
        let out = lines(encode(&rows, &params(ValueMode::Amount)).unwrap());
        let line = &out[0];

        assert_eq!(&line[0..1], "I");
        assert_eq!(&line[1..5], "1010");
        assert_eq!(&line[5..11], "202401");
        assert_eq!(&line[11..17], "      ");
        assert_eq!(&line[17..27], "0001234567");
        assert_eq!(&line[27..38], "12345678900");
        assert_eq!(&line[38..44], "000012");
        assert_eq!(&line[44..46], "01");
        assert_eq!(&line[46..48], "  ");
        assert_eq!(&line[48..58], " ".repeat(10));
        assert_eq!(&line[58..67], "000015050");
        assert_eq!(&line[67..82], "DOC1           ");
        assert_eq!(&line[82..], "NOTE");
    }

    #[test]
    fn index_mode_fills_index_and_blanks_amount() {
        let rows = [
            canonical("11111111111", Cell::Float(1.5), ""),
            canonical("22222222222", Cell::Int(12), "X"),
        ];
        let out = lines(encode(&rows, &params(ValueMode::Index)).unwrap());

        assert_eq!(&out[0][48..58], "0000015000");
        assert_eq!(&out[0][58..67], " ".repeat(9));
        assert_eq!(&out[1][48..58], "0000120000");
        assert_eq!(&out[1][58..67], " ".repeat(9));
    }

    #[test]
    fn sequence_counts_per_tax_id() {
        let rows = [
            canonical("12345678900", Cell::Int(1), ""),
            canonical("98765432100", Cell::Int(1), ""),
            canonical("12345678900", Cell::Int(1), ""),
            canonical("12345678900", Cell::Int(1), ""),
        ];
        let out = lines(encode(&rows, &params(ValueMode::Amount)).unwrap());
        let sequences: Vec<&str> = out.iter().map(|l| &l[44..46]).collect();
        assert_eq!(sequences, ["01", "01", "02", "03"]);
    }

    #[test]
    fn counter_restarts_on_each_run() {
        let rows = [canonical("12345678900", Cell::Int(1), "")];
        let p = params(ValueMode::Amount);
        let first = encode(&rows, &p).unwrap();
        let second = encode(&rows, &p).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn line_length_is_fixed_plus_free_text() {
        let rows = [
            canonical("12345678900", Cell::Float(3.25), ""),
            canonical("12345678900", Cell::Float(3.25), "texto livre"),
        ];
        let out = lines(encode(&rows, &params(ValueMode::Index)).unwrap());
        assert_eq!(out[0].len(), FIXED_WIDTH);
        assert_eq!(out[1].len(), FIXED_WIDTH + "texto livre".len());
    }

    #[test]
    fn fixed_prefix_is_the_sum_of_field_widths() {
        let widths = [1, 4, 6, 6, 10, 11, 6, 2, 2, 10, 9, 15];
        assert_eq!(FIXED_WIDTH, widths.iter().sum::<usize>());
        assert_eq!(FIXED_WIDTH, 82);

        let rows = [canonical("12345678900", Cell::Int(7), "")];
        for mode in [ValueMode::Index, ValueMode::Amount] {
            let out = lines(encode(&rows, &params(mode)).unwrap());
            assert_eq!(out[0].len(), 82);
        }
    }

    #[test]
    fn optional_fields_render_when_informed() {
        let p = BatchParameters::new(
            OperationCode::Alteration,
            "202401",
            "202406",
            "6",
            ValueMode::Amount,
            "OF123",
        )
        .unwrap();
        let rows = [canonical("12345678900", Cell::Float(10.0), "")];
        let out = lines(encode(&rows, &p).unwrap());
        assert_eq!(&out[0][0..1], "A");
        assert_eq!(&out[0][11..17], "202406");
        assert_eq!(&out[0][46..48], "06");
    }

    #[test]
    fn negative_amount_keeps_sign_first() {
        let rows = [canonical("12345678900", Cell::Float(-150.5), "")];
        let out = lines(encode(&rows, &params(ValueMode::Amount)).unwrap());
        assert_eq!(&out[0][58..67], "-00015050");
    }

    #[test]
    fn invalid_value_aborts_whole_run() {
        let rows = [
            canonical("12345678900", Cell::Int(1), ""),
            canonical("12345678900", Cell::from("abc"), ""),
        ];
        let err = encode(&rows, &params(ValueMode::Amount)).unwrap_err();
        assert_eq!(
            err,
            EncodingError::InvalidValue {
                row: 2,
                reason: "'abc' is not a number".to_string()
            }
        );

        let rows = [canonical("12345678900", Cell::Empty, "")];
        assert!(matches!(
            encode(&rows, &params(ValueMode::Index)),
            Err(EncodingError::InvalidValue { row: 1, .. })
        ));

        let rows = [canonical("12345678900", Cell::from("NaN"), "")];
        assert!(matches!(
            encode(&rows, &params(ValueMode::Index)),
            Err(EncodingError::InvalidValue { row: 1, .. })
        ));
    }

    #[test]
    fn empty_input_yields_empty_output() {
        let out = encode(&[], &params(ValueMode::Amount)).unwrap();
        assert!(out.is_empty());
    }
}
