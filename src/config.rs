//! Runtime configuration.
//!
//! Values resolve in this order: CLI flag, environment (a `.env` file is
//! honoured through `dotenvy`), built-in default.

use std::time::Duration;

use reqwest::Url;

use crate::cli::SourceArgs;
use crate::error::AppError;

pub const DEFAULT_ENDPOINT: &str = "https://apis.ccbp.in/covid-vaccination-data";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

const ENV_ENDPOINT: &str = "COWIN_API_URL";
const ENV_TIMEOUT: &str = "COWIN_TIMEOUT_SECS";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DashboardConfig {
    pub endpoint: String,
    pub timeout: Duration,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }
}

impl DashboardConfig {
    /// Resolve configuration from CLI flags and the process environment.
    pub fn from_args(args: &SourceArgs) -> Result<Self, AppError> {
        dotenvy::dotenv().ok();
        Self::resolve(args, |key| std::env::var(key).ok())
    }

    /// Resolve with an explicit environment lookup (used by tests).
    pub fn resolve(
        args: &SourceArgs,
        env: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, AppError> {
        let endpoint = args
            .url
            .clone()
            .or_else(|| env(ENV_ENDPOINT))
            .unwrap_or_else(|| DEFAULT_ENDPOINT.to_string());
        validate_endpoint(&endpoint)?;

        let timeout_secs = match args.timeout {
            Some(secs) => secs,
            None => match env(ENV_TIMEOUT) {
                Some(raw) => raw.trim().parse::<u64>().map_err(|e| {
                    AppError::config(format!("Invalid {ENV_TIMEOUT} '{raw}': {e}"))
                })?,
                None => DEFAULT_TIMEOUT_SECS,
            },
        };
        if timeout_secs == 0 {
            return Err(AppError::config("Timeout must be at least 1 second."));
        }

        Ok(Self {
            endpoint,
            timeout: Duration::from_secs(timeout_secs),
        })
    }
}

fn validate_endpoint(raw: &str) -> Result<(), AppError> {
    let url = Url::parse(raw).map_err(|e| AppError::config(format!("Invalid endpoint '{raw}': {e}")))?;
    match url.scheme() {
        "http" | "https" => Ok(()),
        other => Err(AppError::config(format!(
            "Unsupported endpoint scheme '{other}' (expected http or https)."
        ))),
    }
}
