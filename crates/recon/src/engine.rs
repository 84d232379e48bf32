use crate::config::ReconConfig;
use crate::dedup::{collect_directory, dedupe_sessions};
use crate::error::ReconError;
use crate::evidence::compute_summary;
use crate::index::NameIndex;
use crate::load::{load_directory_rows, load_session_rows};
use crate::matcher::match_all;
use crate::model::{MatchOutcome, ReconInput, ReconMeta, ReconResult};

/// Run reconciliation per config. Returns matched + review lists and summary.
///
/// Data-quality problems never fail the run; they become review items.
pub fn run(config: &ReconConfig, input: &ReconInput) -> ReconResult {
    let sessions = dedupe_sessions(&input.sessions);
    let directory = collect_directory(&input.directory);
    let index = NameIndex::build(&directory);

    log::info!(
        "matching {} session student(s) against {} directory record(s) ({} distinct names, {} shared)",
        sessions.len(),
        directory.len(),
        index.len(),
        index.duplicate_names(),
    );

    let mut matched = Vec::new();
    let mut review = Vec::new();
    for outcome in match_all(&sessions, &index, &config.tolerance) {
        match outcome {
            MatchOutcome::Matched(m) => matched.push(m),
            MatchOutcome::Review(r) => review.push(r),
        }
    }

    let summary = compute_summary(sessions.len(), directory.len(), &matched, &review);

    ReconResult {
        meta: ReconMeta {
            config_name: config.name.clone(),
            date_window_days: config.tolerance.date_window_days,
            engine_version: env!("CARGO_PKG_VERSION").to_string(),
            run_at: chrono::Utc::now().to_rfc3339(),
        },
        summary,
        matched,
        review,
    }
}

/// Load both sources from CSV text using the config's column mapping.
///
/// Fails with `MissingColumn` before any row is matched.
pub fn load_input(
    config: &ReconConfig,
    session_csv: &str,
    directory_csv: &str,
) -> Result<ReconInput, ReconError> {
    Ok(ReconInput {
        sessions: load_session_rows(session_csv, &config.session.columns)?,
        directory: load_directory_rows(directory_csv, &config.directory.columns)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ReviewReason;

    const SESSIONS: &str = "\
StudentID,FirstName,LastName,ClassDate
1,Jane,Doe,01/01/2020
1,Jane,Doe,03/15/2020
2,John,Smith,
3,Amy,Lee,2020-01-01
4,Zed,Zulu,2020-01-01
,Ghost,Row,2020-01-01
";

    const DIRECTORY: &str = "\
StudentID,FirstName,LastName,start_date
A,jane,DOE,2020-02-01
B,John,Smith,01/01/2020
C1,Amy,Lee,2020-01-15
C2,Amy,Lee,2025-06-01
";

    #[test]
    fn integration_mixed_outcomes() {
        let config = ReconConfig::default();
        let input = load_input(&config, SESSIONS, DIRECTORY).unwrap();
        let result = run(&config, &input);

        assert_eq!(result.summary.session_students, 4);
        assert_eq!(result.summary.directory_students, 4);
        assert_eq!(result.summary.matched, 2);
        assert_eq!(result.summary.review_items, 2);
        assert_eq!(result.summary.match_rate, Some(50.0));

        let ids: Vec<(&str, &str)> = result
            .matched
            .iter()
            .map(|m| (m.session_id.as_str(), m.directory_id.as_str()))
            .collect();
        assert_eq!(ids, vec![("1", "A"), ("3", "C1")]);
        assert_eq!(result.matched[0].date_diff_days, Some(31));

        let reasons: Vec<ReviewReason> = result.review.iter().map(|r| r.reason).collect();
        assert_eq!(reasons, vec![ReviewReason::MissingDate, ReviewReason::NoNameMatch]);
        assert_eq!(result.meta.date_window_days, 60);
    }

    #[test]
    fn missing_directory_column_stops_before_matching() {
        let config = ReconConfig::default();
        let err = load_input(&config, SESSIONS, "StudentID,FirstName,LastName\n").unwrap_err();
        assert!(err.to_string().contains("'start_date'"));
    }

    #[test]
    fn empty_inputs() {
        let result = run(&ReconConfig::default(), &ReconInput::default());
        assert_eq!(result.summary.session_students, 0);
        assert_eq!(result.summary.match_rate, None);
        assert!(result.matched.is_empty() && result.review.is_empty());
    }
}
