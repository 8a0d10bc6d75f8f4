//! Ordered row records and the flat-file (CSV) serializer.

use std::io::Write;

use csv::{QuoteStyle, WriterBuilder};
use thiserror::Error;

/// Export failure.
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("csv serialization failed: {0}")]
    Csv(#[from] csv::Error),

    #[error("csv output was not valid utf-8")]
    Encoding,
}

/// One uniform row: ordered (column name, value) pairs.
///
/// Column order matters: the header line is derived from the first row's
/// columns, in this order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Row {
    columns: Vec<(String, String)>,
}

impl Row {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, column: impl Into<String>, value: impl ToString) -> Self {
        self.columns.push((column.into(), value.to_string()));
        self
    }

    pub fn headers(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(|(name, _)| name.as_str())
    }

    pub fn values(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(|(_, value)| value.as_str())
    }
}

/// Serialize rows as a CSV table into `out`.
///
/// The first line is the comma-joined column names of the first row; every
/// field (numbers included) is double-quoted, with embedded quotes doubled —
/// standard CSV quoting, so the file opens correctly in spreadsheet tools.
/// An empty row sequence writes nothing at all.
pub fn write_csv<W: Write>(rows: &[Row], out: W) -> Result<(), ExportError> {
    let Some(first) = rows.first() else {
        return Ok(());
    };

    let mut writer = WriterBuilder::new()
        .quote_style(QuoteStyle::Always)
        .from_writer(out);

    writer.write_record(first.headers())?;
    for row in rows {
        writer.write_record(row.values())?;
    }
    writer.flush().map_err(csv::Error::from)?;
    Ok(())
}

/// Serialize rows to an in-memory CSV string.
pub fn to_csv_string(rows: &[Row]) -> Result<String, ExportError> {
    let mut buf = Vec::new();
    write_csv(rows, &mut buf)?;
    String::from_utf8(buf).map_err(|_| ExportError::Encoding)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn header_comes_from_first_row_in_key_order() {
        let rows = vec![Row::new().with("A", 1).with("B", "x,y")];
        let csv = to_csv_string(&rows).unwrap();
        assert_eq!(csv, "\"A\",\"B\"\n\"1\",\"x,y\"\n");
    }

    #[test]
    fn embedded_quotes_are_doubled() {
        let rows = vec![Row::new().with("Note", "say \"hi\"")];
        let csv = to_csv_string(&rows).unwrap();
        assert_eq!(csv, "\"Note\"\n\"say \"\"hi\"\"\"\n");
    }

    #[test]
    fn empty_row_set_produces_no_output() {
        let csv = to_csv_string(&[]).unwrap();
        assert_eq!(csv, "");
    }

    #[test]
    fn output_round_trips_through_a_standard_csv_reader() {
        let rows = vec![
            Row::new().with("A", 1).with("B", "x,y"),
            Row::new().with("A", 2).with("B", "plain"),
        ];
        let csv = to_csv_string(&rows).unwrap();

        let mut reader = csv::Reader::from_reader(csv.as_bytes());
        let headers = reader.headers().unwrap().clone();
        assert_eq!(headers, vec!["A", "B"]);

        let records: Vec<csv::StringRecord> =
            reader.records().map(|r| r.unwrap()).collect();
        assert_eq!(records[0], vec!["1", "x,y"]);
        assert_eq!(records[1], vec!["2", "plain"]);
    }
}
