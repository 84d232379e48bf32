use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Serialize, Serializer};

use crate::dates::serialize_date;

// ---------------------------------------------------------------------------
// Input
// ---------------------------------------------------------------------------

/// One raw session-log row, as read from the source.
#[derive(Debug, Clone, Default)]
pub struct SessionRow {
    pub student_id: String,
    pub first_name: String,
    pub last_name: String,
    pub date_text: String,
}

/// One raw directory row, as read from the source.
#[derive(Debug, Clone, Default)]
pub struct DirectoryRow {
    pub directory_id: String,
    pub first_name: String,
    pub last_name: String,
    pub start_date_text: String,
}

/// Pre-loaded rows for both sources.
#[derive(Debug, Clone, Default)]
pub struct ReconInput {
    pub sessions: Vec<SessionRow>,
    pub directory: Vec<DirectoryRow>,
}

// ---------------------------------------------------------------------------
// Records
// ---------------------------------------------------------------------------

/// A session-log student after merging every row sharing the same id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SessionRecord {
    pub student_id: String,
    pub first_name: String,
    pub last_name: String,
    #[serde(serialize_with = "serialize_date")]
    pub earliest_date: Option<NaiveDate>,
}

/// A directory student. The last row wins when an id repeats.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DirectoryRecord {
    pub directory_id: String,
    pub first_name: String,
    pub last_name: String,
    #[serde(serialize_with = "serialize_date")]
    pub start_date: Option<NaiveDate>,
}

// ---------------------------------------------------------------------------
// Outcomes
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Confidence {
    #[serde(rename = "HIGH")]
    High,
    #[serde(rename = "HIGH - duplicate name resolved by date")]
    HighDuplicateResolved,
}

impl Confidence {
    pub fn label(&self) -> &'static str {
        match self {
            Self::High => "HIGH",
            Self::HighDuplicateResolved => "HIGH - duplicate name resolved by date",
        }
    }
}

impl std::fmt::Display for Confidence {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ReviewReason {
    NoNameMatch,
    DateMismatch,
    MissingDate,
    DuplicateNameUnresolved,
}

impl ReviewReason {
    pub fn code(&self) -> &'static str {
        match self {
            Self::NoNameMatch => "NO_NAME_MATCH",
            Self::DateMismatch => "DATE_MISMATCH",
            Self::MissingDate => "MISSING_DATE",
            Self::DuplicateNameUnresolved => "DUPLICATE_NAME_UNRESOLVED",
        }
    }

    /// Instruction shown to the operator resolving the row.
    pub fn suggested_action(&self) -> &'static str {
        match self {
            Self::NoNameMatch => {
                "Find this student manually in the directory and record their session id"
            }
            Self::DateMismatch => {
                "Verify this is the same person; if so, add the pair to the matched list manually"
            }
            Self::MissingDate => {
                "Likely correct; verify and move to the matched list if confirmed"
            }
            Self::DuplicateNameUnresolved => {
                "Pick the correct directory record and add one row to the matched list"
            }
        }
    }
}

impl std::fmt::Display for ReviewReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.code())
    }
}

/// A session student joined to exactly one directory record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MatchedRecord {
    pub directory_id: String,
    pub session_id: String,
    pub first_name: String,
    pub last_name: String,
    #[serde(serialize_with = "serialize_date")]
    pub session_date: Option<NaiveDate>,
    #[serde(serialize_with = "serialize_date")]
    pub directory_date: Option<NaiveDate>,
    pub date_diff_days: Option<i64>,
    pub confidence: Confidence,
}

/// A session student that needs a human decision.
///
/// Directory fields are empty for `NoNameMatch`. `date_diff_days` is only
/// present when both dates are known.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReviewItem {
    pub reason: ReviewReason,
    pub session_id: String,
    pub first_name: String,
    pub last_name: String,
    pub session_date: Option<NaiveDate>,
    pub directory_id: Option<String>,
    pub directory_first_name: Option<String>,
    pub directory_last_name: Option<String>,
    pub directory_date: Option<NaiveDate>,
    pub date_diff_days: Option<i64>,
}

impl ReviewItem {
    pub fn suggested_action(&self) -> &'static str {
        self.reason.suggested_action()
    }
}

// Same shape as the review CSV: the action travels with the reason.
impl Serialize for ReviewItem {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        #[derive(Serialize)]
        struct Row<'a> {
            reason: ReviewReason,
            suggested_action: &'static str,
            session_id: &'a str,
            first_name: &'a str,
            last_name: &'a str,
            #[serde(serialize_with = "serialize_date")]
            session_date: Option<NaiveDate>,
            directory_id: Option<&'a str>,
            directory_first_name: Option<&'a str>,
            directory_last_name: Option<&'a str>,
            #[serde(serialize_with = "serialize_date")]
            directory_date: Option<NaiveDate>,
            date_diff_days: Option<i64>,
        }

        Row {
            reason: self.reason,
            suggested_action: self.suggested_action(),
            session_id: &self.session_id,
            first_name: &self.first_name,
            last_name: &self.last_name,
            session_date: self.session_date,
            directory_id: self.directory_id.as_deref(),
            directory_first_name: self.directory_first_name.as_deref(),
            directory_last_name: self.directory_last_name.as_deref(),
            directory_date: self.directory_date,
            date_diff_days: self.date_diff_days,
        }
        .serialize(serializer)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum MatchOutcome {
    Matched(MatchedRecord),
    Review(ReviewItem),
}

impl MatchOutcome {
    pub fn session_id(&self) -> &str {
        match self {
            Self::Matched(m) => &m.session_id,
            Self::Review(r) => &r.session_id,
        }
    }
}

// ---------------------------------------------------------------------------
// Summary + Output
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize)]
pub struct ReconSummary {
    pub session_students: usize,
    pub directory_students: usize,
    pub matched: usize,
    pub review_items: usize,
    /// Percent of session students auto-matched, one decimal place.
    /// Absent when there are no session students.
    pub match_rate: Option<f64>,
    pub review_counts: BTreeMap<String, usize>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ReconResult {
    pub meta: ReconMeta,
    pub summary: ReconSummary,
    pub matched: Vec<MatchedRecord>,
    pub review: Vec<ReviewItem>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ReconMeta {
    pub config_name: String,
    pub date_window_days: u32,
    pub engine_version: String,
    pub run_at: String,
}
