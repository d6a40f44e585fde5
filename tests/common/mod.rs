//! Shared fixtures for integration tests

#![allow(dead_code)]

use backlog_insights::{CsvReader, RecordSet};

/// A small backlog with three themes: login, invoices, and CSV export
pub const BACKLOG_CSV: &str = "\
id,title,description,priority,status,story_points,created_at,assignee
PROJ-1,Login timeout,Login session expires during checkout,High,Open,3,2024-01-05,alice
PROJ-2,Login redirect loop,OAuth login redirect never completes,High,In Progress,5,2024-01-09,bob
PROJ-3,Password reset login,Reset token rejected during login,Medium,Open,2,2024-01-12,
PROJ-4,Invoice totals wrong,Invoice totals ignore discount codes,High,Open,8,2024-02-01,carol
PROJ-5,Invoice currency,Invoice currency rounding drops cents,Low,Done,1,2024-02-03,carol
PROJ-6,Duplicate invoice emails,Customers receive duplicate invoice emails,Medium,Open,,2024-02-10,dave
PROJ-7,Export timestamps,CSV export writes timestamps without timezone,Low,Open,2,2024-03-01,erin
PROJ-8,Export encoding,CSV export breaks unicode characters,Medium,Done,3,2024-03-04,erin
";

/// Parse CSV text into a record set
pub fn parse(csv: &str) -> RecordSet {
    CsvReader::from_bytes(csv.as_bytes()).expect("fixture CSV parses")
}

/// The standard backlog fixture
pub fn backlog() -> RecordSet {
    parse(BACKLOG_CSV)
}

/// Column values for assertions
pub fn column(records: &RecordSet, name: &str) -> Vec<String> {
    records
        .column_values(name)
        .into_iter()
        .map(|v| v.unwrap_or_default().to_string())
        .collect()
}
