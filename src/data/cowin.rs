//! CoWIN vaccination API integration.

use std::time::Duration;

use reqwest::blocking::Client;
use serde::Deserialize;

use crate::config::DashboardConfig;
use crate::domain::{AgeBucketCount, DailyDosePoint, Gender, GenderCount, VaccinationData};
use crate::error::AppError;

/// Anything that can produce one vaccination snapshot.
///
/// The loader calls `fetch` on a worker thread, hence `Send + Sync`.
pub trait VaccinationSource: Send + Sync {
    fn fetch(&self) -> Result<VaccinationData, AppError>;
}

pub struct CowinClient {
    client: Client,
    endpoint: String,
}

impl CowinClient {
    pub fn new(config: &DashboardConfig) -> Result<Self, AppError> {
        Self::with_timeout(config.endpoint.clone(), config.timeout)
    }

    pub fn with_timeout(endpoint: impl Into<String>, timeout: Duration) -> Result<Self, AppError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| AppError::config(format!("Failed to build HTTP client: {e}")))?;
        Ok(Self {
            client,
            endpoint: endpoint.into(),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

impl VaccinationSource for CowinClient {
    fn fetch(&self) -> Result<VaccinationData, AppError> {
        tracing::debug!(endpoint = %self.endpoint, "requesting vaccination data");

        let resp = self
            .client
            .get(&self.endpoint)
            .send()
            .map_err(|e| AppError::data(format!("CoWIN request failed: {e}")))?;

        let status = resp.status().as_u16();
        let body = resp
            .text()
            .map_err(|e| AppError::data(format!("Failed to read CoWIN response: {e}")))?;

        tracing::debug!(status, bytes = body.len(), "vaccination response received");
        interpret_response(status, &body)
    }
}

/// Classify an HTTP response and, for 2xx, parse and validate the body.
///
/// Any status outside `200..=299` is a failure regardless of the body.
pub fn interpret_response(status: u16, body: &str) -> Result<VaccinationData, AppError> {
    if !(200..=299).contains(&status) {
        return Err(AppError::data(format!(
            "CoWIN request failed with status {status}."
        )));
    }

    let raw: RawPayload = serde_json::from_str(body)
        .map_err(|e| AppError::data(format!("Failed to parse CoWIN response: {e}")))?;
    raw.into_data()
}

#[derive(Debug, Deserialize)]
struct RawPayload {
    last_7_days_vaccination: Vec<RawDailyDose>,
    vaccination_by_age: Vec<RawAgeBucket>,
    vaccination_by_gender: Vec<RawGender>,
}

#[derive(Debug, Deserialize)]
struct RawDailyDose {
    vaccine_date: String,
    dose_1: u64,
    dose_2: u64,
}

#[derive(Debug, Deserialize)]
struct RawAgeBucket {
    age: String,
    count: u64,
}

#[derive(Debug, Deserialize)]
struct RawGender {
    count: u64,
    #[serde(default)]
    gender: Option<String>,
}

impl RawPayload {
    fn into_data(self) -> Result<VaccinationData, AppError> {
        let daily_doses = self
            .last_7_days_vaccination
            .into_iter()
            .map(|d| DailyDosePoint {
                date: d.vaccine_date,
                dose1_count: d.dose_1,
                dose2_count: d.dose_2,
            })
            .collect();

        let age_buckets = self
            .vaccination_by_age
            .into_iter()
            .map(|a| AgeBucketCount {
                age_range: a.age,
                count: a.count,
            })
            .collect();

        let gender_counts = bind_genders(self.vaccination_by_gender)?;

        VaccinationData::new(daily_doses, age_buckets, gender_counts)
    }
}

/// Attach a `Gender` to each raw entry.
///
/// Labelled entries are bound by label. Unlabelled entries fall back to the
/// legacy positional order (Male, Female, Other). Mixing the two is rejected.
fn bind_genders(raw: Vec<RawGender>) -> Result<Vec<GenderCount>, AppError> {
    let labelled = raw.iter().filter(|g| g.gender.is_some()).count();

    if labelled == 0 {
        if raw.len() != Gender::ALL.len() {
            return Err(AppError::data(format!(
                "Expected {} unlabelled gender counts, got {}.",
                Gender::ALL.len(),
                raw.len()
            )));
        }
        return Ok(Gender::ALL
            .iter()
            .zip(raw)
            .map(|(&gender, g)| GenderCount {
                gender,
                count: g.count,
            })
            .collect());
    }

    if labelled != raw.len() {
        return Err(AppError::data(
            "Gender counts mix labelled and unlabelled entries.",
        ));
    }

    raw.into_iter()
        .map(|g| {
            let label = g.gender.unwrap_or_default();
            let gender = Gender::from_label(&label)
                .ok_or_else(|| AppError::data(format!("Unknown gender label '{label}'.")))?;
            Ok(GenderCount {
                gender,
                count: g.count,
            })
        })
        .collect()
}
