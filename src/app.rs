//! Top-level application orchestration.
//!
//! `src/main.rs` is intentionally tiny; this module is the "real main" that:
//! - parses CLI arguments
//! - resolves configuration and sets up logging
//! - mounts the dashboard against the right source
//! - hands off to the TUI or prints text/JSON output

use std::sync::Arc;

use chrono::Utc;
use clap::Parser;

use crate::cli::{Command, ExportArgs, ShowArgs, SourceArgs};
use crate::config::DashboardConfig;
use crate::dashboard::Dashboard;
use crate::data::{CowinClient, VaccinationSource};
use crate::domain::LoadStatus;
use crate::error::AppError;
use crate::io::{SnapshotFile, SnapshotSource, write_snapshot_json};
use crate::logging::{LogMode, init_tracing};

/// Entry point for the `cowin` binary.
pub fn run() -> Result<(), AppError> {
    // `cowin` and `cowin --url X` behave like `cowin tui ...`.
    let argv = rewrite_args(std::env::args().collect());
    let cli = crate::cli::Cli::parse_from(argv);

    match cli.command {
        Command::Tui(args) => handle_tui(args),
        Command::Show(args) => handle_show(args),
        Command::Export(args) => handle_export(args),
    }
}

fn handle_tui(args: SourceArgs) -> Result<(), AppError> {
    init_tracing(LogMode::Tui);
    let config = DashboardConfig::from_args(&args)?;
    let source: Arc<dyn VaccinationSource> = Arc::new(CowinClient::new(&config)?);
    crate::tui::run(source)
}

fn handle_show(args: ShowArgs) -> Result<(), AppError> {
    init_tracing(LogMode::Cli);

    let source: Arc<dyn VaccinationSource> = match &args.snapshot {
        Some(path) => Arc::new(SnapshotSource::new(path)),
        None => {
            let config = DashboardConfig::from_args(&args.source)?;
            Arc::new(CowinClient::new(&config)?)
        }
    };

    let mut dashboard = Dashboard::mount(source);
    let status = dashboard.wait();
    print!("{}", crate::report::format_view(&dashboard.view(), args.width));

    show_outcome(status, dashboard.last_error())
}

/// Exit status of `cowin show`. Every failed load maps to `EXIT_DATA`,
/// snapshot read errors included.
fn show_outcome(status: LoadStatus, last_error: Option<&AppError>) -> Result<(), AppError> {
    match status {
        LoadStatus::Success => Ok(()),
        _ => Err(AppError::data(
            last_error.map_or("Vaccination data did not load.", AppError::message),
        )),
    }
}

fn handle_export(args: ExportArgs) -> Result<(), AppError> {
    init_tracing(LogMode::Cli);
    let config = DashboardConfig::from_args(&args.source)?;
    let client = CowinClient::new(&config)?;

    let data = client.fetch()?;
    let snapshot = SnapshotFile::new(client.endpoint(), Utc::now(), &data);
    write_snapshot_json(&args.out, &snapshot)?;

    tracing::info!(path = %args.out.display(), "snapshot written");
    println!("Wrote {}", args.out.display());
    Ok(())
}

/// Rewrite argv so `cowin` defaults to `cowin tui`.
///
/// Rules:
/// - `cowin`                       -> `cowin tui`
/// - `cowin --url URL ...`         -> `cowin tui --url URL ...`
/// - `cowin --help/--version/-h`   -> unchanged (show top-level help/version)
fn rewrite_args(mut argv: Vec<String>) -> Vec<String> {
    let Some(arg1) = argv.get(1).cloned() else {
        argv.push("tui".to_string());
        return argv;
    };

    let is_top_level_help_or_version = matches!(
        arg1.as_str(),
        "-h" | "--help" | "-V" | "--version" | "help"
    );
    if is_top_level_help_or_version {
        return argv;
    }

    let is_subcommand = matches!(arg1.as_str(), "tui" | "show" | "export");
    if is_subcommand {
        return argv;
    }

    // If the first token is a flag, treat it as "tui flags".
    if arg1.starts_with('-') {
        argv.insert(1, "tui".to_string());
        return argv;
    }

    // Otherwise, leave as-is and let clap report the error.
    argv
}

#[cfg(test)]
mod tests {
    use super::*;

    fn argv(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn bare_invocation_opens_tui() {
        assert_eq!(rewrite_args(argv(&["cowin"])), argv(&["cowin", "tui"]));
    }

    #[test]
    fn leading_flags_go_to_tui() {
        assert_eq!(
            rewrite_args(argv(&["cowin", "--url", "http://x/y"])),
            argv(&["cowin", "tui", "--url", "http://x/y"])
        );
    }

    #[test]
    fn subcommands_and_help_are_untouched() {
        for args in [
            argv(&["cowin", "show", "--width", "20"]),
            argv(&["cowin", "export", "-o", "out.json"]),
            argv(&["cowin", "--help"]),
            argv(&["cowin", "-V"]),
        ] {
            assert_eq!(rewrite_args(args.clone()), args);
        }
    }

    #[test]
    fn failed_show_exits_with_data_code() {
        let missing = AppError::config("Failed to read snapshot missing.json.");
        let err = show_outcome(LoadStatus::Failure, Some(&missing)).unwrap_err();
        assert_eq!(err.exit_code(), crate::error::EXIT_DATA);
        assert_eq!(err.message(), missing.message());

        let err = show_outcome(LoadStatus::Failure, None).unwrap_err();
        assert_eq!(err.exit_code(), crate::error::EXIT_DATA);

        assert!(show_outcome(LoadStatus::Success, None).is_ok());
    }

    #[test]
    fn rewritten_args_parse() {
        let cli = crate::cli::Cli::parse_from(rewrite_args(argv(&["cowin", "--timeout", "5"])));
        let Command::Tui(source) = cli.command else {
            panic!("expected tui");
        };
        assert_eq!(source.timeout, Some(5));

        let cli = crate::cli::Cli::parse_from(argv(&["cowin", "show", "--snapshot", "s.json"]));
        let Command::Show(show) = cli.command else {
            panic!("expected show");
        };
        assert_eq!(show.width, 40);
        assert!(show.snapshot.is_some());
    }
}
