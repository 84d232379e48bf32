//! Free-form date parsing for source exports.
//!
//! Exports from different tools disagree on date layout, so parsing walks a
//! fixed list of formats and takes the first that fits. Ambiguous numeric
//! dates (`01/02/2020`) resolve month-first because the month/day/year
//! patterns are tried before day/month/year.

use chrono::{Datelike, NaiveDate};
use serde::Serializer;

/// Output layout for every rendered date.
pub const OUTPUT_FORMAT: &str = "%m/%d/%Y";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum YearField {
    /// Four-digit year at the start of the string.
    Leading,
    /// Four-digit year at the end of the string.
    Trailing,
    /// Two-digit year; chrono enforces the width. 69 reads as 1969.
    Short,
}

/// Accepted input formats, in priority order.
const DATE_FORMATS: [(&str, YearField); 6] = [
    ("%m/%d/%Y", YearField::Trailing), // 01/15/2020
    ("%m-%d-%Y", YearField::Trailing), // 01-15-2020
    ("%Y-%m-%d", YearField::Leading),  // 2020-01-15
    ("%m/%d/%y", YearField::Short),    // 01/15/20
    ("%d/%m/%Y", YearField::Trailing), // 15/01/2020
    ("%B %d, %Y", YearField::Trailing), // January 15, 2020
];

/// Parse a date string, returning `None` when it is blank or fits no format.
pub fn parse_date(text: &str) -> Option<NaiveDate> {
    let text = text.trim();
    if text.is_empty() {
        return None;
    }

    DATE_FORMATS.iter().find_map(|(fmt, year)| {
        if !year_width_ok(text, *year) {
            return None;
        }
        let date = NaiveDate::parse_from_str(text, fmt).ok()?;
        match year {
            YearField::Short if date.year() == 2069 => date.with_year(1969),
            _ => Some(date),
        }
    })
}

/// Render a date as `MM/DD/YYYY`, or the empty string when unknown.
pub fn format_date(date: Option<NaiveDate>) -> String {
    date.map(|d| d.format(OUTPUT_FORMAT).to_string())
        .unwrap_or_default()
}

/// Serialize an optional date as `MM/DD/YYYY`, or `null` when unknown.
pub fn serialize_date<S: Serializer>(
    date: &Option<NaiveDate>,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    match date {
        Some(d) => serializer.collect_str(&d.format(OUTPUT_FORMAT)),
        None => serializer.serialize_none(),
    }
}

// chrono's %Y accepts any number of digits; "01/15/20" must not become year 20.
fn year_width_ok(text: &str, year: YearField) -> bool {
    match year {
        YearField::Leading => text.bytes().take_while(u8::is_ascii_digit).count() == 4,
        YearField::Trailing => text.bytes().rev().take_while(u8::is_ascii_digit).count() == 4,
        YearField::Short => true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn parses_each_supported_format() {
        assert_eq!(parse_date("01/15/2020"), Some(ymd(2020, 1, 15)));
        assert_eq!(parse_date("01-15-2020"), Some(ymd(2020, 1, 15)));
        assert_eq!(parse_date("2020-01-15"), Some(ymd(2020, 1, 15)));
        assert_eq!(parse_date("01/15/20"), Some(ymd(2020, 1, 15)));
        assert_eq!(parse_date("15/01/2020"), Some(ymd(2020, 1, 15)));
        assert_eq!(parse_date("January 15, 2020"), Some(ymd(2020, 1, 15)));
    }

    #[test]
    fn ambiguous_numeric_is_month_first() {
        assert_eq!(parse_date("01/02/2020"), Some(ymd(2020, 1, 2)));
        assert_eq!(parse_date("13/02/2020"), Some(ymd(2020, 2, 13)));
    }

    #[test]
    fn short_year_pivot() {
        assert_eq!(parse_date("03/04/45"), Some(ymd(2045, 3, 4)));
        assert_eq!(parse_date("03/04/99"), Some(ymd(1999, 3, 4)));
        assert_eq!(parse_date("01/15/68"), Some(ymd(2068, 1, 15)));
        assert_eq!(parse_date("01/15/69"), Some(ymd(1969, 1, 15)));
        assert_eq!(parse_date("01/15/70"), Some(ymd(1970, 1, 15)));
    }

    #[test]
    fn four_digit_2069_is_not_shifted() {
        assert_eq!(parse_date("01/15/2069"), Some(ymd(2069, 1, 15)));
        assert_eq!(parse_date("2069-01-15"), Some(ymd(2069, 1, 15)));
    }

    #[test]
    fn month_names_full_or_abbreviated() {
        assert_eq!(parse_date("March 4, 2020"), Some(ymd(2020, 3, 4)));
        assert_eq!(parse_date("Jan 5, 2020"), Some(ymd(2020, 1, 5)));
        assert_eq!(parse_date("Janu 5, 2020"), None);
    }

    #[test]
    fn unpadded_fields_accepted() {
        assert_eq!(parse_date("1/5/2021"), Some(ymd(2021, 1, 5)));
        assert_eq!(parse_date("1/5/21"), Some(ymd(2021, 1, 5)));
    }

    #[test]
    fn surrounding_whitespace_trimmed() {
        assert_eq!(parse_date("  2020-03-01\t"), Some(ymd(2020, 3, 1)));
    }

    #[test]
    fn unknown_inputs() {
        assert_eq!(parse_date(""), None);
        assert_eq!(parse_date("   "), None);
        assert_eq!(parse_date("not a date"), None);
        assert_eq!(parse_date("2020/01/15"), None);
        assert_eq!(parse_date("13/13/2020"), None);
        assert_eq!(parse_date("02/30/2020"), None);
        assert_eq!(parse_date("01/15/20201"), None);
        assert_eq!(parse_date("2020-01-15T09:30:00"), None);
    }

    #[test]
    fn format_round_trip_layout() {
        assert_eq!(format_date(Some(ymd(2020, 1, 5))), "01/05/2020");
        assert_eq!(format_date(None), "");
    }

    #[test]
    fn serialized_dates_use_output_layout() {
        #[derive(serde::Serialize)]
        struct Row {
            #[serde(serialize_with = "serialize_date")]
            known: Option<NaiveDate>,
            #[serde(serialize_with = "serialize_date")]
            unknown: Option<NaiveDate>,
        }
        let json = serde_json::to_value(Row { known: Some(ymd(2020, 1, 5)), unknown: None }).unwrap();
        assert_eq!(json["known"], "01/05/2020");
        assert!(json["unknown"].is_null());
    }
}
