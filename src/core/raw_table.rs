//! Uploaded tabular data before any cleaning.

use crate::error::{PlannerError, Result};
use chrono::{NaiveDate, NaiveDateTime};
use std::collections::HashMap;
use std::io::Read;

/// A single cell as produced by an upload parser.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum CellValue {
    #[default]
    Empty,
    Number(f64),
    Text(String),
    Date(NaiveDate),
    DateTime(NaiveDateTime),
}

impl CellValue {
    /// Classify a raw text field: blank → `Empty`, numeric → `Number`, else `Text`.
    pub fn from_field(field: &str) -> Self {
        let trimmed = field.trim();
        if trimmed.is_empty() {
            return CellValue::Empty;
        }
        match trimmed.parse::<f64>() {
            Ok(n) => CellValue::Number(n),
            Err(_) => CellValue::Text(trimmed.to_string()),
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, CellValue::Empty)
    }
}

impl From<f64> for CellValue {
    fn from(value: f64) -> Self {
        CellValue::Number(value)
    }
}

impl From<&str> for CellValue {
    fn from(value: &str) -> Self {
        CellValue::Text(value.to_string())
    }
}

impl From<NaiveDate> for CellValue {
    fn from(value: NaiveDate) -> Self {
        CellValue::Date(value)
    }
}

/// One row: column name to cell.
pub type Row = HashMap<String, CellValue>;

/// Ordered rows of column-name → value mappings.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawTable {
    columns: Vec<String>,
    rows: Vec<Row>,
}

impl RawTable {
    /// Create an empty table with the given columns.
    pub fn new<S: Into<String>>(columns: impl IntoIterator<Item = S>) -> Self {
        Self {
            columns: columns.into_iter().map(Into::into).collect(),
            rows: Vec::new(),
        }
    }

    /// Append a row given as cells in column order.
    ///
    /// Missing trailing cells are stored as [`CellValue::Empty`].
    pub fn push_row<C: Into<CellValue>>(&mut self, cells: impl IntoIterator<Item = C>) -> Result<()> {
        let mut cells: Vec<CellValue> = cells.into_iter().map(Into::into).collect();
        if cells.len() > self.columns.len() {
            return Err(PlannerError::Validation(format!(
                "row {} has {} cells but the table has {} columns",
                self.rows.len(),
                cells.len(),
                self.columns.len()
            )));
        }
        cells.resize(self.columns.len(), CellValue::Empty);
        let row = self.columns.iter().cloned().zip(cells).collect();
        self.rows.push(row);
        Ok(())
    }

    /// Load a table from delimited text with a header row.
    pub fn from_csv_reader<R: Read>(reader: R) -> Result<Self> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .trim(csv::Trim::All)
            .from_reader(reader);

        let headers = csv_reader
            .headers()
            .map_err(|e| PlannerError::Validation(format!("failed to read CSV header: {}", e)))?
            .clone();
        let mut table = RawTable::new(headers.iter());

        for (line_num, record) in csv_reader.records().enumerate() {
            let record = record.map_err(|e| {
                PlannerError::Validation(format!("CSV parse error at line {}: {}", line_num + 2, e))
            })?;
            table.push_row(record.iter().map(CellValue::from_field))?;
        }

        tracing::debug!(
            rows = table.len(),
            columns = table.columns().len(),
            "loaded delimited table"
        );
        Ok(table)
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.columns.iter().any(|c| c == name)
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn field_classification() {
        assert_eq!(CellValue::from_field("  "), CellValue::Empty);
        assert_eq!(CellValue::from_field("12.5"), CellValue::Number(12.5));
        assert_eq!(
            CellValue::from_field("2025-01-01"),
            CellValue::Text("2025-01-01".to_string())
        );
    }

    #[test]
    fn push_row_pads_missing_cells() {
        let mut table = RawTable::new(["date", "demand", "site"]);
        table.push_row(["2025-01-01", "10"]).unwrap();
        assert_eq!(table.len(), 1);
        assert_eq!(table.rows()[0]["site"], CellValue::Empty);
        assert_eq!(
            table.rows()[0]["demand"],
            CellValue::Text("10".to_string())
        );
    }

    #[test]
    fn push_row_rejects_extra_cells() {
        let mut table = RawTable::new(["date"]);
        assert!(matches!(
            table.push_row([1.0, 2.0]),
            Err(PlannerError::Validation(_))
        ));
    }

    #[test]
    fn csv_loading_types_cells() {
        let data = "date,demand,note\n2025-01-01,10,\n2025-01-02,12.5,rush order\n";
        let table = RawTable::from_csv_reader(data.as_bytes()).unwrap();

        assert_eq!(table.columns(), &["date", "demand", "note"]);
        assert_eq!(table.len(), 2);
        assert!(table.has_column("demand"));
        assert!(!table.has_column("qty"));
        assert_eq!(table.rows()[1]["demand"], CellValue::Number(12.5));
        assert_eq!(table.rows()[0]["note"], CellValue::Empty);
        assert_eq!(
            table.rows()[1]["note"],
            CellValue::Text("rush order".to_string())
        );
    }

    #[test]
    fn csv_rows_longer_than_header_are_rejected() {
        let data = "date,demand\n2025-01-01,10,extra\n";
        assert!(RawTable::from_csv_reader(data.as_bytes()).is_err());
    }
}
