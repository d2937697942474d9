//! `tracing` subscriber setup.
//!
//! The TUI owns the terminal, so in TUI mode logs go to a file only when
//! `COWIN_LOG` names one. Text commands log to stderr. `RUST_LOG` overrides
//! the default filter in both cases.

use tracing_subscriber::EnvFilter;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt};

const ENV_LOG_FILE: &str = "COWIN_LOG";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogMode {
    Tui,
    Cli,
}

pub fn init_tracing(mode: LogMode) {
    match (mode, std::env::var(ENV_LOG_FILE).ok()) {
        (_, Some(path)) => init_file(&path),
        (LogMode::Tui, None) => {}
        (LogMode::Cli, None) => init_stderr(),
    }
}

fn init_stderr() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

/// Log to `{path}.{pid}` so concurrent instances don't interleave.
fn init_file(path: &str) {
    let unique_path = format!("{path}.{}", std::process::id());

    let Ok(file) = std::fs::File::create(&unique_path) else {
        eprintln!("Warning: failed to create log file: {unique_path}");
        return;
    };

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let file_layer = fmt::layer()
        .with_writer(std::sync::Mutex::new(file))
        .with_ansi(false)
        .with_target(true)
        .with_level(true);

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(file_layer)
        .try_init();
}
