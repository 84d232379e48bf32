use std::collections::HashMap;

use crate::dates::parse_date;
use crate::model::{DirectoryRecord, DirectoryRow, SessionRecord, SessionRow};

/// Merge session rows by student id, keeping the earliest parseable date.
///
/// Names come from the first row seen for an id. Rows with a blank id are
/// dropped. Output follows first-seen order of ids.
pub fn dedupe_sessions(rows: &[SessionRow]) -> Vec<SessionRecord> {
    let mut records: Vec<SessionRecord> = Vec::new();
    let mut by_id: HashMap<String, usize> = HashMap::new();
    let mut skipped = 0usize;

    for row in rows {
        let id = row.student_id.trim();
        if id.is_empty() {
            skipped += 1;
            continue;
        }
        let date = parse_date(&row.date_text);

        match by_id.get(id) {
            Some(&i) => {
                let rec = &mut records[i];
                if let Some(d) = date {
                    if rec.earliest_date.map_or(true, |cur| d < cur) {
                        rec.earliest_date = Some(d);
                    }
                }
            }
            None => {
                by_id.insert(id.to_string(), records.len());
                records.push(SessionRecord {
                    student_id: id.to_string(),
                    first_name: row.first_name.trim().to_string(),
                    last_name: row.last_name.trim().to_string(),
                    earliest_date: date,
                });
            }
        }
    }

    if skipped > 0 {
        log::debug!("skipped {skipped} session row(s) with a blank id");
    }
    records
}

/// Build directory records, one per id. A repeated id keeps its first
/// position but takes the values of its last row.
pub fn collect_directory(rows: &[DirectoryRow]) -> Vec<DirectoryRecord> {
    let mut records: Vec<DirectoryRecord> = Vec::new();
    let mut by_id: HashMap<String, usize> = HashMap::new();

    for row in rows {
        let id = row.directory_id.trim();
        if id.is_empty() {
            continue;
        }
        let rec = DirectoryRecord {
            directory_id: id.to_string(),
            first_name: row.first_name.trim().to_string(),
            last_name: row.last_name.trim().to_string(),
            start_date: parse_date(&row.start_date_text),
        };
        match by_id.get(id) {
            Some(&i) => records[i] = rec,
            None => {
                by_id.insert(id.to_string(), records.len());
                records.push(rec);
            }
        }
    }

    records
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn srow(id: &str, first: &str, last: &str, date: &str) -> SessionRow {
        SessionRow {
            student_id: id.into(),
            first_name: first.into(),
            last_name: last.into(),
            date_text: date.into(),
        }
    }

    fn drow(id: &str, first: &str, last: &str, date: &str) -> DirectoryRow {
        DirectoryRow {
            directory_id: id.into(),
            first_name: first.into(),
            last_name: last.into(),
            start_date_text: date.into(),
        }
    }

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn earliest_date_kept() {
        let rows = vec![
            srow("1", "Jane", "Doe", "2020-03-01"),
            srow("1", "Jane", "Doe", "2020-01-15"),
        ];
        let recs = dedupe_sessions(&rows);
        assert_eq!(recs.len(), 1);
        assert_eq!(recs[0].earliest_date, Some(ymd(2020, 1, 15)));
    }

    #[test]
    fn mixed_formats_compare_as_dates() {
        let rows = vec![
            srow("1", "Jane", "Doe", "March 1, 2020"),
            srow("1", "Jane", "Doe", "02/10/2020"),
            srow("1", "Jane", "Doe", "2020-02-11"),
        ];
        let recs = dedupe_sessions(&rows);
        assert_eq!(recs[0].earliest_date, Some(ymd(2020, 2, 10)));
    }

    #[test]
    fn unparseable_rows_do_not_erase_known_date() {
        let rows = vec![
            srow("1", "Jane", "Doe", "garbage"),
            srow("1", "Jane", "Doe", "2020-05-05"),
            srow("1", "Jane", "Doe", ""),
        ];
        let recs = dedupe_sessions(&rows);
        assert_eq!(recs[0].earliest_date, Some(ymd(2020, 5, 5)));
    }

    #[test]
    fn all_unparseable_stays_unknown() {
        let rows = vec![srow("1", "Jane", "Doe", "n/a"), srow("1", "Jane", "Doe", "")];
        let recs = dedupe_sessions(&rows);
        assert_eq!(recs[0].earliest_date, None);
    }

    #[test]
    fn names_from_first_row_and_trimmed() {
        let rows = vec![
            srow(" 7 ", "  Amy ", " Lee", "2020-01-01"),
            srow("7", "Amelia", "Lee-Smith", "2019-01-01"),
        ];
        let recs = dedupe_sessions(&rows);
        assert_eq!(recs.len(), 1);
        assert_eq!(recs[0].student_id, "7");
        assert_eq!(recs[0].first_name, "Amy");
        assert_eq!(recs[0].last_name, "Lee");
        assert_eq!(recs[0].earliest_date, Some(ymd(2019, 1, 1)));
    }

    #[test]
    fn blank_ids_dropped_and_order_preserved() {
        let rows = vec![
            srow("b", "B", "B", ""),
            srow("  ", "X", "X", "2020-01-01"),
            srow("a", "A", "A", ""),
            srow("b", "B", "B", ""),
        ];
        let recs = dedupe_sessions(&rows);
        let ids: Vec<&str> = recs.iter().map(|r| r.student_id.as_str()).collect();
        assert_eq!(ids, vec!["b", "a"]);
    }

    #[test]
    fn directory_last_row_wins_in_first_position() {
        let rows = vec![
            drow("A", "Jane", "Doe", "2020-01-01"),
            drow("B", "John", "Smith", "2020-01-01"),
            drow("A", "Janet", "Doe", "2021-06-01"),
            drow("", "Ghost", "Row", "2020-01-01"),
        ];
        let recs = collect_directory(&rows);
        assert_eq!(recs.len(), 2);
        assert_eq!(recs[0].directory_id, "A");
        assert_eq!(recs[0].first_name, "Janet");
        assert_eq!(recs[0].start_date, Some(ymd(2021, 6, 1)));
        assert_eq!(recs[1].directory_id, "B");
    }
}
