//! `rollmatch run` / `rollmatch validate`: config-driven student reconciliation.

use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};

use clap::Subcommand;

use rollmatch_recon::export::{write_matched_csv, write_review_csv};
use rollmatch_recon::{ReconConfig, ReconError, ReconResult};

use crate::exit_codes::{
    EXIT_ERROR, EXIT_RECON_INVALID_CONFIG, EXIT_RECON_REVIEW, EXIT_RECON_RUNTIME,
};
use crate::CliError;

#[derive(Subcommand)]
pub enum ReconCommands {
    /// Match the session log against the directory and write both result files
    #[command(after_help = "\
Examples:
  rollmatch run
  rollmatch run enrollment.recon.toml
  rollmatch run --session keiko_export.csv --directory contacts.csv
  rollmatch run enrollment.recon.toml --json --strict")]
    Run {
        /// Path to a .recon.toml config file (built-in defaults when omitted)
        config: Option<PathBuf>,

        /// Session-log CSV, overriding the config's session.file
        #[arg(long)]
        session: Option<PathBuf>,

        /// Directory CSV, overriding the config's directory.file
        #[arg(long)]
        directory: Option<PathBuf>,

        /// Output JSON to stdout in addition to the CSV files
        #[arg(long)]
        json: bool,

        /// Write JSON output to file
        #[arg(long)]
        output: Option<PathBuf>,

        /// Exit non-zero when any student needs manual review
        #[arg(long)]
        strict: bool,

        /// Suppress the summary and next steps on stderr
        #[arg(long, short = 'q')]
        quiet: bool,
    },

    /// Validate a recon config without running
    #[command(after_help = "\
Examples:
  rollmatch validate enrollment.recon.toml")]
    Validate {
        /// Path to the .recon.toml config file
        config: PathBuf,
    },
}

pub fn cmd_recon(cmd: ReconCommands) -> Result<(), CliError> {
    match cmd {
        ReconCommands::Run { config, session, directory, json, output, strict, quiet } => {
            let opts = RunOptions { session, directory, json, output, strict, quiet };
            cmd_recon_run(config, opts)
        }
        ReconCommands::Validate { config } => cmd_recon_validate(config),
    }
}

struct RunOptions {
    session: Option<PathBuf>,
    directory: Option<PathBuf>,
    json: bool,
    output: Option<PathBuf>,
    strict: bool,
    quiet: bool,
}

fn recon_err(code: u8, msg: impl Into<String>) -> CliError {
    CliError::new(code, msg)
}

/// Read and validate a config. Returns it with the directory its relative
/// paths resolve against.
fn load_config(path: Option<&Path>) -> Result<(ReconConfig, PathBuf), CliError> {
    let Some(path) = path else {
        log::info!("no config given, using defaults");
        return Ok((ReconConfig::default(), PathBuf::from(".")));
    };

    let config_str = std::fs::read_to_string(path).map_err(|e| {
        recon_err(EXIT_RECON_RUNTIME, format!("cannot read config {}: {e}", path.display()))
    })?;
    let config = ReconConfig::from_toml(&config_str)
        .map_err(|e| recon_err(EXIT_RECON_INVALID_CONFIG, e.to_string()))?;

    let base_dir = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."))
        .to_path_buf();
    log::info!("config '{}' from {}", config.name, path.display());
    Ok((config, base_dir))
}

fn read_source(label: &str, flag: &str, path: &Path) -> Result<String, CliError> {
    std::fs::read_to_string(path).map_err(|e| {
        recon_err(EXIT_RECON_RUNTIME, format!("cannot read {label} file {}: {e}", path.display()))
            .with_hint(format!("check the path, or pass --{flag} <PATH>"))
    })
}

fn cmd_recon_run(config_path: Option<PathBuf>, opts: RunOptions) -> Result<(), CliError> {
    let (config, base_dir) = load_config(config_path.as_deref())?;

    let session_path = opts.session.unwrap_or_else(|| base_dir.join(&config.session.file));
    let directory_path = opts.directory.unwrap_or_else(|| base_dir.join(&config.directory.file));

    let session_csv = read_source("session", "session", &session_path)?;
    let directory_csv = read_source("directory", "directory", &directory_path)?;

    // Header problems stop the run here, before any output file is touched.
    let input = rollmatch_recon::load_input(&config, &session_csv, &directory_csv)
        .map_err(|e| match e {
            ReconError::MissingColumn { ref source, .. } => {
                let hint = format!("update [{source}.columns] in the config to match the file's headers");
                recon_err(EXIT_RECON_INVALID_CONFIG, e.to_string()).with_hint(hint)
            }
            other => recon_err(EXIT_RECON_RUNTIME, other.to_string()),
        })?;

    let result = rollmatch_recon::run(&config, &input);

    let matched_path = base_dir.join(&config.output.matched);
    let review_path = base_dir.join(&config.output.review);
    write_csv(&matched_path, |w| write_matched_csv(&result.matched, w))?;
    write_csv(&review_path, |w| write_review_csv(&result.review, w))?;

    let json_path = opts
        .output
        .or_else(|| config.output.json.as_ref().map(|p| base_dir.join(p)));

    if opts.json || json_path.is_some() {
        let json_str = serde_json::to_string_pretty(&result)
            .map_err(|e| recon_err(EXIT_ERROR, format!("JSON serialization error: {e}")))?;

        if let Some(ref path) = json_path {
            ensure_parent(path)?;
            std::fs::write(path, &json_str).map_err(|e| {
                recon_err(EXIT_RECON_RUNTIME, format!("cannot write {}: {e}", path.display()))
            })?;
        }

        if opts.json {
            println!("{json_str}");
        }
    }

    if !opts.quiet {
        print_summary(&result, &matched_path, &review_path, json_path.as_deref());
    }

    let s = &result.summary;
    if opts.strict && s.review_items > 0 {
        return Err(recon_err(
            EXIT_RECON_REVIEW,
            format!("{} review item(s) need attention", s.review_items),
        ));
    }

    Ok(())
}

fn ensure_parent(path: &Path) -> Result<(), CliError> {
    match path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => std::fs::create_dir_all(dir).map_err(|e| {
            recon_err(EXIT_RECON_RUNTIME, format!("cannot create {}: {e}", dir.display()))
        }),
        _ => Ok(()),
    }
}

fn write_csv(
    path: &Path,
    write: impl FnOnce(BufWriter<File>) -> Result<(), ReconError>,
) -> Result<(), CliError> {
    ensure_parent(path)?;
    let file = File::create(path).map_err(|e| {
        recon_err(EXIT_RECON_RUNTIME, format!("cannot write {}: {e}", path.display()))
    })?;
    write(BufWriter::new(file)).map_err(|e| {
        recon_err(EXIT_RECON_RUNTIME, format!("cannot write {}: {e}", path.display()))
    })
}

// Human summary goes to stderr so `--json` keeps stdout clean.
fn print_summary(result: &ReconResult, matched: &Path, review: &Path, json: Option<&Path>) {
    let s = &result.summary;
    let rate = match s.match_rate {
        Some(r) => format!("{r:.1}%"),
        None => "n/a".into(),
    };

    eprintln!(
        "{} session student(s) against {} directory record(s): {} matched, {} review item(s), match rate {}",
        s.session_students, s.directory_students, s.matched, s.review_items, rate,
    );
    for (reason, count) in &s.review_counts {
        eprintln!("  {reason}: {count}");
    }

    eprintln!("wrote {}", matched.display());
    eprintln!("wrote {}", review.display());
    if let Some(path) = json {
        eprintln!("wrote {}", path.display());
    }

    if s.review_items > 0 {
        eprintln!(
            "next: resolve each row in {}, then add confirmed pairs to {}",
            review.display(),
            matched.display(),
        );
    }
}

fn cmd_recon_validate(config_path: PathBuf) -> Result<(), CliError> {
    let (config, base_dir) = load_config(Some(config_path.as_path()))?;
    eprintln!(
        "valid: recon '{}' (session: {}, directory: {}, window: {} days)",
        config.name,
        base_dir.join(&config.session.file).display(),
        base_dir.join(&config.directory.file).display(),
        config.tolerance.date_window_days,
    );
    Ok(())
}
