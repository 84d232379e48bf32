//! Resolution policy for one session student against the directory.
//!
//! | Name candidates | Dates                         | Outcome                               |
//! |-----------------|-------------------------------|---------------------------------------|
//! | 0               | -                             | review `NO_NAME_MATCH`                |
//! | 1               | both known, within window     | matched `HIGH`                        |
//! | 1               | both known, outside window    | review `DATE_MISMATCH`                |
//! | 1               | either unknown                | review `MISSING_DATE`                 |
//! | many            | exactly one within window     | matched, duplicate resolved by date   |
//! | many            | zero or several within window | review `DUPLICATE_NAME_UNRESOLVED` × candidates |

use chrono::NaiveDate;

use crate::config::ToleranceConfig;
use crate::index::NameIndex;
use crate::model::{
    Confidence, DirectoryRecord, MatchOutcome, MatchedRecord, ReviewItem, ReviewReason,
    SessionRecord,
};
use crate::names::NameKey;

/// Absolute whole-day distance between two dates, if both are known.
pub fn date_diff_days(a: Option<NaiveDate>, b: Option<NaiveDate>) -> Option<i64> {
    match (a, b) {
        (Some(a), Some(b)) => Some((a - b).num_days().abs()),
        _ => None,
    }
}

/// `Some(true)` when both dates are known and within the window (inclusive),
/// `Some(false)` when both are known and farther apart, `None` otherwise.
pub fn within_tolerance(
    a: Option<NaiveDate>,
    b: Option<NaiveDate>,
    tolerance: &ToleranceConfig,
) -> Option<bool> {
    date_diff_days(a, b).map(|diff| diff <= i64::from(tolerance.date_window_days))
}

/// Classify one session student. Always returns at least one outcome.
pub fn match_session(
    session: &SessionRecord,
    index: &NameIndex,
    tolerance: &ToleranceConfig,
) -> Vec<MatchOutcome> {
    let key = NameKey::new(&session.first_name, &session.last_name);
    let candidates = index.candidates(&key);
    let session_date = session.earliest_date;

    match candidates {
        [] => vec![MatchOutcome::Review(review(
            ReviewReason::NoNameMatch,
            session,
            None,
        ))],
        [only] => {
            let outcome = match within_tolerance(session_date, only.start_date, tolerance) {
                Some(true) => MatchOutcome::Matched(matched(session, only, Confidence::High)),
                Some(false) => {
                    MatchOutcome::Review(review(ReviewReason::DateMismatch, session, Some(only)))
                }
                None => MatchOutcome::Review(review(ReviewReason::MissingDate, session, Some(only))),
            };
            vec![outcome]
        }
        _ => {
            let in_window: Vec<&DirectoryRecord> = candidates
                .iter()
                .filter(|c| within_tolerance(session_date, c.start_date, tolerance) == Some(true))
                .collect();

            if let [resolved] = in_window.as_slice() {
                return vec![MatchOutcome::Matched(matched(
                    session,
                    resolved,
                    Confidence::HighDuplicateResolved,
                ))];
            }

            log::debug!(
                "session '{}': {} candidates named '{key}', {} within window",
                session.student_id,
                candidates.len(),
                in_window.len(),
            );
            candidates
                .iter()
                .map(|c| {
                    MatchOutcome::Review(review(
                        ReviewReason::DuplicateNameUnresolved,
                        session,
                        Some(c),
                    ))
                })
                .collect()
        }
    }
}

/// Classify every session student in order.
pub fn match_all(
    sessions: &[SessionRecord],
    index: &NameIndex,
    tolerance: &ToleranceConfig,
) -> Vec<MatchOutcome> {
    sessions
        .iter()
        .flat_map(|s| match_session(s, index, tolerance))
        .collect()
}

fn matched(
    session: &SessionRecord,
    candidate: &DirectoryRecord,
    confidence: Confidence,
) -> MatchedRecord {
    MatchedRecord {
        directory_id: candidate.directory_id.clone(),
        session_id: session.student_id.clone(),
        first_name: session.first_name.clone(),
        last_name: session.last_name.clone(),
        session_date: session.earliest_date,
        directory_date: candidate.start_date,
        date_diff_days: date_diff_days(session.earliest_date, candidate.start_date),
        confidence,
    }
}

fn review(
    reason: ReviewReason,
    session: &SessionRecord,
    candidate: Option<&DirectoryRecord>,
) -> ReviewItem {
    ReviewItem {
        reason,
        session_id: session.student_id.clone(),
        first_name: session.first_name.clone(),
        last_name: session.last_name.clone(),
        session_date: session.earliest_date,
        directory_id: candidate.map(|c| c.directory_id.clone()),
        directory_first_name: candidate.map(|c| c.first_name.clone()),
        directory_last_name: candidate.map(|c| c.last_name.clone()),
        directory_date: candidate.and_then(|c| c.start_date),
        date_diff_days: candidate.and_then(|c| date_diff_days(session.earliest_date, c.start_date)),
    }
}
