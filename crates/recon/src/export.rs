use std::io::Write;

use crate::dates::format_date;
use crate::error::ReconError;
use crate::model::{MatchedRecord, ReviewItem};

pub const MATCHED_HEADER: [&str; 8] = [
    "directory_id",
    "session_id",
    "first",
    "last",
    "session_date",
    "directory_date",
    "date_diff_days",
    "confidence",
];

pub const REVIEW_HEADER: [&str; 11] = [
    "reason",
    "session_id",
    "first",
    "last",
    "session_date",
    "directory_id",
    "directory_first",
    "directory_last",
    "directory_date",
    "date_diff_days",
    "action",
];

/// Write matched records as CSV (header always present).
pub fn write_matched_csv(matched: &[MatchedRecord], writer: impl Write) -> Result<(), ReconError> {
    let mut csv = csv::WriterBuilder::new()
        .terminator(csv::Terminator::Any(b'\n'))
        .from_writer(writer);

    csv.write_record(MATCHED_HEADER)?;
    for m in matched {
        csv.write_record([
            m.directory_id.as_str(),
            m.session_id.as_str(),
            m.first_name.as_str(),
            m.last_name.as_str(),
            format_date(m.session_date).as_str(),
            format_date(m.directory_date).as_str(),
            format_diff(m.date_diff_days).as_str(),
            m.confidence.label(),
        ])?;
    }

    csv.flush().map_err(|e| ReconError::Io(e.to_string()))?;
    Ok(())
}

/// Write review items as CSV (header always present).
pub fn write_review_csv(review: &[ReviewItem], writer: impl Write) -> Result<(), ReconError> {
    let mut csv = csv::WriterBuilder::new()
        .terminator(csv::Terminator::Any(b'\n'))
        .from_writer(writer);

    csv.write_record(REVIEW_HEADER)?;
    for r in review {
        csv.write_record([
            r.reason.code(),
            r.session_id.as_str(),
            r.first_name.as_str(),
            r.last_name.as_str(),
            format_date(r.session_date).as_str(),
            r.directory_id.as_deref().unwrap_or(""),
            r.directory_first_name.as_deref().unwrap_or(""),
            r.directory_last_name.as_deref().unwrap_or(""),
            format_date(r.directory_date).as_str(),
            format_diff(r.date_diff_days).as_str(),
            r.suggested_action(),
        ])?;
    }

    csv.flush().map_err(|e| ReconError::Io(e.to_string()))?;
    Ok(())
}

fn format_diff(days: Option<i64>) -> String {
    days.map(|d| d.to_string()).unwrap_or_default()
}
