//! CSV loading for both sources.
//!
//! Header validation is the only fatal data check: a missing column stops the
//! run before any matching happens. Everything else (blank ids, odd dates,
//! short rows) is carried through and degrades to a review outcome later.

use crate::config::{DirectoryColumns, SessionColumns};
use crate::error::ReconError;
use crate::model::{DirectoryRow, SessionRow};

/// Load session-log rows from CSV text.
pub fn load_session_rows(
    csv_data: &str,
    columns: &SessionColumns,
) -> Result<Vec<SessionRow>, ReconError> {
    load_rows("session", csv_data, columns.required(), |f| SessionRow {
        student_id: f[0].into(),
        first_name: f[1].into(),
        last_name: f[2].into(),
        date_text: f[3].into(),
    })
}

/// Load directory rows from CSV text.
pub fn load_directory_rows(
    csv_data: &str,
    columns: &DirectoryColumns,
) -> Result<Vec<DirectoryRow>, ReconError> {
    load_rows("directory", csv_data, columns.required(), |f| DirectoryRow {
        directory_id: f[0].into(),
        first_name: f[1].into(),
        last_name: f[2].into(),
        start_date_text: f[3].into(),
    })
}

fn load_rows<T>(
    source: &str,
    csv_data: &str,
    wanted: [&str; 4],
    build: impl Fn([&str; 4]) -> T,
) -> Result<Vec<T>, ReconError> {
    // Spreadsheet exports often lead with a UTF-8 BOM.
    let csv_data = csv_data.trim_start_matches('\u{feff}');

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(csv_data.as_bytes());

    let headers: Vec<String> = reader.headers()?.iter().map(|h| h.to_string()).collect();

    let idx = |name: &str| -> Result<usize, ReconError> {
        headers
            .iter()
            .position(|h| h == name)
            .ok_or_else(|| ReconError::MissingColumn {
                source: source.into(),
                column: name.into(),
                found: headers.clone(),
            })
    };
    let positions = [idx(wanted[0])?, idx(wanted[1])?, idx(wanted[2])?, idx(wanted[3])?];

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record?;
        let fields = positions.map(|i| record.get(i).unwrap_or(""));
        rows.push(build(fields));
    }

    log::info!("loaded {} {source} row(s)", rows.len());
    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn load_session_basic() {
        let csv = "\
StudentID,FirstName,LastName,ClassDate,Room
1,Jane,Doe,01/15/2020,A
1,Jane,Doe,01/10/2020,B
2, John ,Smith,,A
";
        let rows = load_session_rows(csv, &SessionColumns::default()).unwrap();
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0].student_id, "1");
        assert_eq!(rows[1].date_text, "01/10/2020");
        assert_eq!(rows[2].first_name, " John ");
        assert_eq!(rows[2].date_text, "");
    }

    #[test]
    fn load_directory_with_custom_columns_any_order() {
        let csv = "\
Start,Last,First,ContactID
2020-02-01,Doe,Jane,A
";
        let columns = DirectoryColumns {
            id: "ContactID".into(),
            first: "First".into(),
            last: "Last".into(),
            start_date: "Start".into(),
        };
        let rows = load_directory_rows(csv, &columns).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].directory_id, "A");
        assert_eq!(rows[0].first_name, "Jane");
        assert_eq!(rows[0].last_name, "Doe");
        assert_eq!(rows[0].start_date_text, "2020-02-01");
    }

    #[test]
    fn missing_column_is_fatal() {
        let csv = "StudentID,FirstName,LastName\n1,Jane,Doe\n";
        let err = load_session_rows(csv, &SessionColumns::default()).unwrap_err();
        match err {
            ReconError::MissingColumn { source, column, found } => {
                assert_eq!(source, "session");
                assert_eq!(column, "ClassDate");
                assert_eq!(found, vec!["StudentID", "FirstName", "LastName"]);
            }
            other => panic!("expected MissingColumn, got {other:?}"),
        }
    }

    #[test]
    fn bom_stripped_from_first_header() {
        let csv = "\u{feff}StudentID,FirstName,LastName,start_date\nA,Jane,Doe,2020-01-01\n";
        let rows = load_directory_rows(csv, &DirectoryColumns::default()).unwrap();
        assert_eq!(rows[0].directory_id, "A");
    }

    #[test]
    fn short_rows_read_as_blank() {
        let csv = "StudentID,FirstName,LastName,ClassDate\n3,Amy\n";
        let rows = load_session_rows(csv, &SessionColumns::default()).unwrap();
        assert_eq!(rows[0].first_name, "Amy");
        assert_eq!(rows[0].last_name, "");
        assert_eq!(rows[0].date_text, "");
    }

    #[test]
    fn header_only_file_yields_no_rows() {
        let csv = "StudentID,FirstName,LastName,ClassDate\n";
        assert!(load_session_rows(csv, &SessionColumns::default()).unwrap().is_empty());
    }
}
