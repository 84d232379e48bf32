use std::fmt;

#[derive(Debug)]
pub enum ReconError {
    /// TOML parse / deserialization error.
    ConfigParse(String),
    /// Config validation error (blank column name, zero-length file path, etc.).
    ConfigValidation(String),
    /// Required column absent from a source's header row.
    MissingColumn {
        source: String,
        column: String,
        found: Vec<String>,
    },
    /// Malformed CSV input.
    Csv(String),
    /// IO error (file read/write).
    Io(String),
}

impl fmt::Display for ReconError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ConfigParse(msg) => write!(f, "config parse error: {msg}"),
            Self::ConfigValidation(msg) => write!(f, "config validation error: {msg}"),
            Self::MissingColumn { source, column, found } => {
                write!(
                    f,
                    "source '{source}': missing column '{column}' (columns found: {})",
                    found
                        .iter()
                        .map(|c| format!("'{c}'"))
                        .collect::<Vec<_>>()
                        .join(", ")
                )
            }
            Self::Csv(msg) => write!(f, "CSV error: {msg}"),
            Self::Io(msg) => write!(f, "IO error: {msg}"),
        }
    }
}

impl std::error::Error for ReconError {}

impl From<csv::Error> for ReconError {
    fn from(e: csv::Error) -> Self {
        Self::Csv(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_column_lists_found_headers() {
        let err = ReconError::MissingColumn {
            source: "session".into(),
            column: "ClassDate".into(),
            found: vec!["StudentID".into(), "FirstName".into()],
        };
        let msg = err.to_string();
        assert!(msg.contains("'ClassDate'"));
        assert!(msg.contains("'StudentID', 'FirstName'"));
    }
}
