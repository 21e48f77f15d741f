//! Locklint CLI
//!
//! # Usage
//!
//! ```bash
//! # Check the current directory tree
//! locklint
//!
//! # Check specific directories with only the usage checker
//! locklint --checker usage ./internal ./pkg
//!
//! # Machine-readable output
//! locklint --format json .
//! ```
//!
//! Exits 0 when every package is clean, 1 when any report was produced
//! or a package failed to parse, 2 on configuration or I/O failure.

use clap::{Parser, ValueEnum};
use serde::Serialize;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::info;

use locklint::{analyze_dirs, AnalyzerConfig, CheckerKind, Report};

#[derive(Parser)]
#[command(name = "locklint")]
#[command(about = "Lock discipline analyzer for Go packages", long_about = None)]
struct Cli {
    /// Directories to scan recursively for Go packages
    #[arg(default_value = ".")]
    dirs: Vec<PathBuf>,

    /// JSON configuration file; flags below override its values
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Checker to run (repeatable; defaults to all)
    #[arg(long = "checker", value_enum)]
    checkers: Vec<CheckerKind>,

    /// Qualified type name treated as a lock (repeatable; defaults to
    /// sync.Mutex and sync.RWMutex)
    #[arg(long = "lock-type")]
    lock_types: Vec<String>,

    /// Also analyze *_test.go files
    #[arg(long)]
    include_tests: bool,

    /// Only check the function or method with this exact name
    #[arg(long)]
    filter: Option<String>,

    /// Output format
    #[arg(long, value_enum, default_value_t = Format::Text)]
    format: Format,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Format {
    Text,
    Json,
}

#[derive(Serialize)]
struct JsonReport<'a> {
    message: String,
    file: &'a std::path::Path,
    line: u32,
    column: u32,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let cfg = match build_config(&cli) {
        Ok(cfg) => cfg,
        Err(err) => {
            eprintln!("locklint: {err}");
            return ExitCode::from(2);
        }
    };

    let outcome = match analyze_dirs(&cli.dirs, &cfg) {
        Ok(outcome) => outcome,
        Err(err) => {
            eprintln!("locklint: {err}");
            return ExitCode::from(2);
        }
    };
    info!(
        packages = outcome.packages_checked,
        files = outcome.files_checked,
        reports = outcome.reports.len(),
        "analysis complete"
    );

    for (dir, err) in &outcome.failures {
        eprintln!("locklint: {}: {err}", dir.display());
    }
    print_reports(&outcome.reports, cli.format);

    if outcome.reports.is_empty() && outcome.failures.is_empty() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}

fn build_config(cli: &Cli) -> locklint::Result<AnalyzerConfig> {
    let mut cfg = match &cli.config {
        Some(path) => AnalyzerConfig::from_file(path)?,
        None => AnalyzerConfig::default(),
    };
    if !cli.checkers.is_empty() {
        cfg.checkers = cli.checkers.clone();
    }
    if !cli.lock_types.is_empty() {
        cfg.lock_types = cli.lock_types.clone();
    }
    if cli.include_tests {
        cfg.include_tests = true;
    }
    if cli.filter.is_some() {
        cfg.filter = cli.filter.clone();
    }
    Ok(cfg)
}

fn print_reports(reports: &[Report], format: Format) {
    match format {
        Format::Text => {
            for report in reports {
                println!("{report}");
            }
        }
        Format::Json => {
            for report in reports {
                let row = JsonReport {
                    message: report.error.to_string(),
                    file: &report.file,
                    line: report.line(),
                    column: report.column(),
                };
                match serde_json::to_string(&row) {
                    Ok(line) => println!("{line}"),
                    Err(err) => eprintln!("locklint: serializing report: {err}"),
                }
            }
        }
    }
}

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let cli = Cli::try_parse_from(["locklint"]).unwrap();
        assert_eq!(cli.dirs, vec![PathBuf::from(".")]);
        assert!(cli.checkers.is_empty());
        assert!(cli.lock_types.is_empty());
        assert!(!cli.include_tests);
        assert!(matches!(cli.format, Format::Text));
        assert_eq!(cli.verbose, 0);
    }

    #[test]
    fn test_repeatable_flags_and_format() {
        let cli = Cli::try_parse_from([
            "locklint",
            "--checker",
            "usage",
            "--checker",
            "contracts",
            "--lock-type",
            "mypkg.SpinLock",
            "--format",
            "json",
            "-vv",
            "./a",
            "./b",
        ])
        .unwrap();
        assert_eq!(cli.checkers, vec![CheckerKind::Usage, CheckerKind::Contracts]);
        assert_eq!(cli.lock_types, vec!["mypkg.SpinLock".to_string()]);
        assert!(matches!(cli.format, Format::Json));
        assert_eq!(cli.verbose, 2);
        assert_eq!(cli.dirs, vec![PathBuf::from("./a"), PathBuf::from("./b")]);
    }

    #[test]
    fn test_unknown_checker_is_rejected() {
        assert!(Cli::try_parse_from(["locklint", "--checker", "races"]).is_err());
    }

    #[test]
    fn test_flags_override_config_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{"checkers": ["usage"], "lock_types": ["x.T"], "filter": "fromFile"}}"#
        )
        .unwrap();
        let path = file.path().to_str().unwrap().to_string();

        let cli = Cli::try_parse_from([
            "locklint",
            "--config",
            &path,
            "--checker",
            "contracts",
            "--include-tests",
        ])
        .unwrap();
        let cfg = build_config(&cli).unwrap();

        // Flag wins where given; file values survive everywhere else.
        assert_eq!(cfg.checkers, vec![CheckerKind::Contracts]);
        assert_eq!(cfg.lock_types, vec!["x.T".to_string()]);
        assert_eq!(cfg.filter.as_deref(), Some("fromFile"));
        assert!(cfg.include_tests);
    }

    #[test]
    fn test_missing_config_file_is_an_error() {
        let cli =
            Cli::try_parse_from(["locklint", "--config", "/nonexistent/locklint.json"]).unwrap();
        assert!(build_config(&cli).is_err());
    }
}
