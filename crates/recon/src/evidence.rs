use std::collections::BTreeMap;

use crate::model::{MatchedRecord, ReconSummary, ReviewItem};

/// Compute summary statistics for a finished run.
pub fn compute_summary(
    session_students: usize,
    directory_students: usize,
    matched: &[MatchedRecord],
    review: &[ReviewItem],
) -> ReconSummary {
    let mut review_counts: BTreeMap<String, usize> = BTreeMap::new();
    for r in review {
        *review_counts.entry(r.reason.to_string()).or_insert(0) += 1;
    }

    ReconSummary {
        session_students,
        directory_students,
        matched: matched.len(),
        review_items: review.len(),
        match_rate: match_rate(matched.len(), session_students),
        review_counts,
    }
}

/// Percent matched, rounded to one decimal. `None` for an empty session log.
pub fn match_rate(matched: usize, total: usize) -> Option<f64> {
    if total == 0 {
        return None;
    }
    let pct = matched as f64 / total as f64 * 100.0;
    Some((pct * 10.0).round() / 10.0)
}
