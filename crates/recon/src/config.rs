use serde::Deserialize;

use crate::error::ReconError;

pub const DEFAULT_DATE_WINDOW_DAYS: u32 = 60;

// ---------------------------------------------------------------------------
// Top-level config
// ---------------------------------------------------------------------------

/// Run configuration, usually read from a `*.recon.toml` file.
///
/// Every section is optional. The defaults describe a session log and a
/// directory export sitting next to the config with their stock headers.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ReconConfig {
    #[serde(default = "default_name")]
    pub name: String,
    #[serde(default)]
    pub session: SessionSource,
    #[serde(default)]
    pub directory: DirectorySource,
    #[serde(default)]
    pub tolerance: ToleranceConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

fn default_name() -> String {
    "student reconciliation".into()
}

impl Default for ReconConfig {
    fn default() -> Self {
        Self {
            name: default_name(),
            session: SessionSource::default(),
            directory: DirectorySource::default(),
            tolerance: ToleranceConfig::default(),
            output: OutputConfig::default(),
        }
    }
}

// ---------------------------------------------------------------------------
// Sources
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SessionSource {
    #[serde(default = "default_session_file")]
    pub file: String,
    #[serde(default)]
    pub columns: SessionColumns,
}

fn default_session_file() -> String {
    "session_log.csv".into()
}

impl Default for SessionSource {
    fn default() -> Self {
        Self {
            file: default_session_file(),
            columns: SessionColumns::default(),
        }
    }
}

/// Header names in the session-log export.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SessionColumns {
    pub id: String,
    pub first: String,
    pub last: String,
    pub date: String,
}

impl Default for SessionColumns {
    fn default() -> Self {
        Self {
            id: "StudentID".into(),
            first: "FirstName".into(),
            last: "LastName".into(),
            date: "ClassDate".into(),
        }
    }
}

impl SessionColumns {
    pub fn required(&self) -> [&str; 4] {
        [&self.id, &self.first, &self.last, &self.date]
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DirectorySource {
    #[serde(default = "default_directory_file")]
    pub file: String,
    #[serde(default)]
    pub columns: DirectoryColumns,
}

fn default_directory_file() -> String {
    "directory.csv".into()
}

impl Default for DirectorySource {
    fn default() -> Self {
        Self {
            file: default_directory_file(),
            columns: DirectoryColumns::default(),
        }
    }
}

/// Header names in the directory export.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DirectoryColumns {
    pub id: String,
    pub first: String,
    pub last: String,
    pub start_date: String,
}

impl Default for DirectoryColumns {
    fn default() -> Self {
        Self {
            id: "StudentID".into(),
            first: "FirstName".into(),
            last: "LastName".into(),
            start_date: "start_date".into(),
        }
    }
}

impl DirectoryColumns {
    pub fn required(&self) -> [&str; 4] {
        [&self.id, &self.first, &self.last, &self.start_date]
    }
}

// ---------------------------------------------------------------------------
// Tolerance + Output
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ToleranceConfig {
    /// Largest absolute day difference still treated as the same
    /// enrollment. Inclusive.
    #[serde(default = "default_window")]
    pub date_window_days: u32,
}

fn default_window() -> u32 {
    DEFAULT_DATE_WINDOW_DAYS
}

impl Default for ToleranceConfig {
    fn default() -> Self {
        Self {
            date_window_days: DEFAULT_DATE_WINDOW_DAYS,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct OutputConfig {
    #[serde(default = "default_matched_out")]
    pub matched: String,
    #[serde(default = "default_review_out")]
    pub review: String,
    #[serde(default)]
    pub json: Option<String>,
}

fn default_matched_out() -> String {
    "matched_students.csv".into()
}

fn default_review_out() -> String {
    "review_needed.csv".into()
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            matched: default_matched_out(),
            review: default_review_out(),
            json: None,
        }
    }
}

// ---------------------------------------------------------------------------
// Parse + Validate
// ---------------------------------------------------------------------------

impl ReconConfig {
    pub fn from_toml(input: &str) -> Result<Self, ReconError> {
        let config: ReconConfig =
            toml::from_str(input).map_err(|e| ReconError::ConfigParse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ReconError> {
        if self.session.file.trim().is_empty() {
            return Err(ReconError::ConfigValidation("session.file is empty".into()));
        }
        if self.directory.file.trim().is_empty() {
            return Err(ReconError::ConfigValidation("directory.file is empty".into()));
        }

        check_columns("session", &self.session.columns.required())?;
        check_columns("directory", &self.directory.columns.required())?;

        if self.output.matched.trim().is_empty() || self.output.review.trim().is_empty() {
            return Err(ReconError::ConfigValidation(
                "output.matched and output.review must be non-empty".into(),
            ));
        }
        if self.output.json.as_deref().is_some_and(|p| p.trim().is_empty()) {
            return Err(ReconError::ConfigValidation("output.json is empty".into()));
        }

        // Every file the run touches must be distinct, or one silently clobbers another.
        let mut paths = vec![
            ("session.file", self.session.file.as_str()),
            ("directory.file", self.directory.file.as_str()),
            ("output.matched", self.output.matched.as_str()),
            ("output.review", self.output.review.as_str()),
        ];
        if let Some(json) = &self.output.json {
            paths.push(("output.json", json.as_str()));
        }
        for (i, (key, path)) in paths.iter().enumerate() {
            if let Some((other, _)) = paths[..i].iter().find(|(_, p)| p.trim() == path.trim()) {
                return Err(ReconError::ConfigValidation(format!(
                    "{other} and {key} both point at '{}'",
                    path.trim()
                )));
            }
        }

        Ok(())
    }
}

fn check_columns(source: &str, columns: &[&str]) -> Result<(), ReconError> {
    for (i, col) in columns.iter().enumerate() {
        if col.trim().is_empty() {
            return Err(ReconError::ConfigValidation(format!(
                "{source}.columns: blank column name"
            )));
        }
        if columns[..i].contains(col) {
            return Err(ReconError::ConfigValidation(format!(
                "{source}.columns: '{col}' mapped to more than one field"
            )));
        }
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
