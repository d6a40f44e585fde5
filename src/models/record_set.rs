use crate::error::{AppError, Result};
use crate::models::issue::{is_null, IssueField};
use serde::{Deserialize, Serialize};

/// Raw cell values of one issue, aligned with the header
pub type Record = Vec<String>;

/// Table-shaped set of issue records.
///
/// Every row holds exactly one raw cell per column, in header order. Cells are kept verbatim
/// so that unrecognized columns and null markers survive an export unchanged. Header names
/// may repeat; lookups by name resolve to the first occurrence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordSet {
    /// Header names, in input order
    columns: Vec<String>,

    /// Raw cell values per row
    rows: Vec<Record>,
}

impl RecordSet {
    /// Create an empty record set with the given header
    pub fn new(columns: Vec<String>) -> Result<Self> {
        if columns.is_empty() {
            return Err(AppError::InvalidInput(
                "input has no header row".to_string(),
            ));
        }

        Ok(Self {
            columns,
            rows: Vec::new(),
        })
    }

    /// Create a record set from a header and rows
    pub fn from_rows(columns: Vec<String>, rows: Vec<Record>) -> Result<Self> {
        let mut records = Self::new(columns)?;
        for row in rows {
            records.push_row(row)?;
        }
        Ok(records)
    }

    /// Append a row; its width must match the header
    pub fn push_row(&mut self, row: Record) -> Result<()> {
        if row.len() != self.columns.len() {
            return Err(AppError::InvalidInput(format!(
                "row {} has {} fields, header has {}",
                self.rows.len() + 1,
                row.len(),
                self.columns.len()
            )));
        }
        self.rows.push(row);
        Ok(())
    }

    /// Header names
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// All rows
    pub fn rows(&self) -> &[Record] {
        &self.rows
    }

    /// Number of records
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Check if there are no records
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Position of the first column with this name
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    /// Check whether a column is present
    pub fn has_column(&self, name: &str) -> bool {
        self.column_index(name).is_some()
    }

    /// Check whether a recognized field is present
    pub fn has_field(&self, field: IssueField) -> bool {
        self.has_column(field.column_name())
    }

    /// Raw cell value
    pub fn value(&self, row: usize, column: &str) -> Option<&str> {
        let idx = self.column_index(column)?;
        self.rows.get(row).map(|r| r[idx].as_str())
    }

    /// Non-null cell value of a recognized field
    pub fn field(&self, row: usize, field: IssueField) -> Option<&str> {
        self.value(row, field.column_name()).filter(|v| !is_null(v))
    }

    /// Non-null values of a column for every row (`None` for null cells).
    /// An absent column yields `None` for every row.
    pub fn column_values(&self, column: &str) -> Vec<Option<&str>> {
        match self.column_index(column) {
            Some(idx) => self
                .rows
                .iter()
                .map(|r| Some(r[idx].as_str()).filter(|v| !is_null(v)))
                .collect(),
            None => vec![None; self.rows.len()],
        }
    }

    /// Set a column's values, replacing an existing column of the same name or appending a new one
    pub fn set_column(&mut self, name: &str, values: Vec<String>) -> Result<()> {
        if values.len() != self.rows.len() {
            return Err(AppError::Internal(format!(
                "column '{}' has {} values for {} rows",
                name,
                values.len(),
                self.rows.len()
            )));
        }

        match self.column_index(name) {
            Some(idx) => {
                for (row, value) in self.rows.iter_mut().zip(values) {
                    row[idx] = value;
                }
            }
            None => {
                self.columns.push(name.to_string());
                for (row, value) in self.rows.iter_mut().zip(values) {
                    row.push(value);
                }
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> RecordSet {
        RecordSet::from_rows(
            vec!["id".to_string(), "title".to_string(), "assignee".to_string()],
            vec![
                vec!["1".to_string(), "Login fails".to_string(), "ana".to_string()],
                vec!["2".to_string(), "NaN".to_string(), "".to_string()],
            ],
        )
        .unwrap()
    }

    #[test]
    fn test_rejects_empty_header() {
        let err = RecordSet::new(vec![]).unwrap_err();
        assert!(err.is_input_error());
    }

    #[test]
    fn test_duplicate_columns_are_kept() {
        let mut records = RecordSet::from_rows(
            vec!["id".to_string(), "Labels".to_string(), "Labels".to_string()],
            vec![vec!["1".to_string(), "auth".to_string(), "web".to_string()]],
        )
        .unwrap();

        assert_eq!(records.columns().len(), 3);
        assert_eq!(records.column_index("Labels"), Some(1));
        assert_eq!(records.value(0, "Labels"), Some("auth"));
        assert_eq!(records.rows()[0][2], "web");

        records.set_column("Labels", vec!["ui".to_string()]).unwrap();
        assert_eq!(records.rows()[0], vec!["1", "ui", "web"]);
    }

    #[test]
    fn test_rejects_ragged_row() {
        let mut records = RecordSet::new(vec!["id".to_string(), "title".to_string()]).unwrap();
        let err = records.push_row(vec!["1".to_string()]).unwrap_err();
        assert!(err.is_input_error());
        assert!(records.is_empty());
    }

    #[test]
    fn test_field_access_treats_null_tokens_as_missing() {
        let records = sample();
        assert_eq!(records.field(0, IssueField::Title), Some("Login fails"));
        assert_eq!(records.field(1, IssueField::Title), None);
        assert_eq!(records.value(1, "title"), Some("NaN"));
        assert_eq!(records.field(0, IssueField::Status), None);
        assert_eq!(records.column_values("assignee"), vec![Some("ana"), None]);
        assert_eq!(records.column_values("status"), vec![None, None]);
    }

    #[test]
    fn test_set_column_appends_then_replaces() {
        let mut records = sample();
        records
            .set_column("cluster", vec!["0".to_string(), "1".to_string()])
            .unwrap();
        assert_eq!(records.columns().last().unwrap(), "cluster");

        records
            .set_column("cluster", vec!["1".to_string(), "1".to_string()])
            .unwrap();
        assert_eq!(records.columns().len(), 4);
        assert_eq!(records.value(0, "cluster"), Some("1"));
    }

    #[test]
    fn test_set_column_length_mismatch() {
        let mut records = sample();
        assert!(records.set_column("RICE", vec!["1.0".to_string()]).is_err());
    }
}
