use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString, IntoStaticStr};

/// Column added by the clustering stage
pub const CLUSTER_COLUMN: &str = "cluster";

/// Column added by the scoring stage
pub const RICE_COLUMN: &str = "RICE";

/// Cell values treated as missing: the default NA tokens of common dataframe CSV readers
const NULL_TOKENS: &[&str] = &[
    "#N/A", "#N/A N/A", "#NA", "-1.#IND", "-1.#QNAN", "-NaN", "-nan", "1.#IND", "1.#QNAN",
    "<NA>", "N/A", "NA", "NULL", "NaN", "None", "n/a", "nan", "null",
];

/// Issue fields recognized in JIRA/Linear style exports
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    EnumString,
    Display,
    EnumIter,
    IntoStaticStr,
)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum IssueField {
    Id,
    Title,
    Description,
    Priority,
    Status,
    StoryPoints,
    CreatedAt,
}

impl IssueField {
    /// Column name as it appears in the CSV header
    pub fn column_name(&self) -> &'static str {
        (*self).into()
    }

    /// Check whether a header name is a recognized issue field
    pub fn is_recognized(name: &str) -> bool {
        name.parse::<IssueField>().is_ok()
    }
}

/// Check whether a raw cell value counts as missing
pub fn is_null(value: &str) -> bool {
    let trimmed = value.trim();
    trimmed.is_empty() || NULL_TOKENS.contains(&trimmed)
}

/// Parse a story-point cell. Missing, non-numeric and non-finite values yield `None`.
pub fn parse_story_points(value: &str) -> Option<f64> {
    if is_null(value) {
        return None;
    }

    value
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|points| points.is_finite())
}
