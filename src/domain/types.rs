//! Shared domain types.
//!
//! These types are kept small and serializable so they can be:
//!
//! - held in the dashboard's view state
//! - exported to a JSON snapshot
//! - compared directly in tests

use serde::{Deserialize, Serialize};

use crate::error::AppError;

/// Number of age buckets the dashboard expects from the source.
pub const AGE_BUCKETS: usize = 3;

/// Lifecycle stage of the single data fetch.
///
/// Transitions within one load cycle are monotonic:
/// `Initial -> InProgress -> {Success | Failure}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LoadStatus {
    #[default]
    Initial,
    InProgress,
    Success,
    Failure,
}

impl LoadStatus {
    pub fn display_name(self) -> &'static str {
        match self {
            LoadStatus::Initial => "initial",
            LoadStatus::InProgress => "loading",
            LoadStatus::Success => "ok",
            LoadStatus::Failure => "failed",
        }
    }
}

/// One day's two-dose vaccination counts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyDosePoint {
    pub date: String,
    pub dose1_count: u64,
    pub dose2_count: u64,
}

/// Vaccinations within one age range.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgeBucketCount {
    pub age_range: String,
    pub count: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Gender {
    Male,
    Female,
    Other,
}

impl Gender {
    /// Display (and legacy positional) order.
    pub const ALL: [Gender; 3] = [Gender::Male, Gender::Female, Gender::Other];

    pub fn display_name(self) -> &'static str {
        match self {
            Gender::Male => "Male",
            Gender::Female => "Female",
            Gender::Other => "Others",
        }
    }

    /// Parse a source label. Accepts both "Other" and "Others", any case.
    pub fn from_label(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "male" => Some(Gender::Male),
            "female" => Some(Gender::Female),
            "other" | "others" => Some(Gender::Other),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenderCount {
    pub gender: Gender,
    pub count: u64,
}

/// The three sequences committed together on a successful load.
///
/// Construction goes through [`VaccinationData::new`], which enforces the
/// shape the renderer relies on: exactly [`AGE_BUCKETS`] age buckets and
/// exactly one count per gender.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VaccinationData {
    daily_doses: Vec<DailyDosePoint>,
    age_buckets: Vec<AgeBucketCount>,
    gender_counts: Vec<GenderCount>,
}

impl VaccinationData {
    pub fn new(
        daily_doses: Vec<DailyDosePoint>,
        age_buckets: Vec<AgeBucketCount>,
        gender_counts: Vec<GenderCount>,
    ) -> Result<Self, AppError> {
        if age_buckets.len() != AGE_BUCKETS {
            return Err(AppError::data(format!(
                "Expected {AGE_BUCKETS} age buckets, got {}.",
                age_buckets.len()
            )));
        }
        if let Some(bucket) = age_buckets.iter().find(|b| b.age_range.trim().is_empty()) {
            return Err(AppError::data(format!(
                "Age bucket with count {} has an empty age range.",
                bucket.count
            )));
        }

        if gender_counts.len() != Gender::ALL.len() {
            return Err(AppError::data(format!(
                "Expected {} gender counts, got {}.",
                Gender::ALL.len(),
                gender_counts.len()
            )));
        }
        for gender in Gender::ALL {
            let n = gender_counts.iter().filter(|g| g.gender == gender).count();
            if n != 1 {
                return Err(AppError::data(format!(
                    "Expected exactly one count for {}, got {n}.",
                    gender.display_name()
                )));
            }
        }

        checked_total("age bucket", age_buckets.iter().map(|b| b.count))?;
        checked_total("gender", gender_counts.iter().map(|g| g.count))?;

        Ok(Self {
            daily_doses,
            age_buckets,
            gender_counts,
        })
    }

    pub fn daily_doses(&self) -> &[DailyDosePoint] {
        &self.daily_doses
    }

    pub fn age_buckets(&self) -> &[AgeBucketCount] {
        &self.age_buckets
    }

    pub fn gender_counts(&self) -> &[GenderCount] {
        &self.gender_counts
    }

    pub fn into_parts(self) -> (Vec<DailyDosePoint>, Vec<AgeBucketCount>, Vec<GenderCount>) {
        (self.daily_doses, self.age_buckets, self.gender_counts)
    }
}

/// Sum of a pie's counts, or an error when it does not fit in a `u64`.
fn checked_total(what: &str, mut counts: impl Iterator<Item = u64>) -> Result<u64, AppError> {
    counts
        .try_fold(0u64, |acc, n| acc.checked_add(n))
        .ok_or_else(|| AppError::data(format!("Total of {what} counts overflows.")))
}

/// The dashboard's view record.
///
/// Owned by exactly one dashboard instance. The only mutators are
/// [`ViewState::begin`], [`ViewState::commit`] and [`ViewState::fail`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ViewState {
    status: LoadStatus,
    daily_doses: Vec<DailyDosePoint>,
    age_buckets: Vec<AgeBucketCount>,
    gender_counts: Vec<GenderCount>,
}

impl ViewState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn status(&self) -> LoadStatus {
        self.status
    }

    pub fn daily_doses(&self) -> &[DailyDosePoint] {
        &self.daily_doses
    }

    pub fn age_buckets(&self) -> &[AgeBucketCount] {
        &self.age_buckets
    }

    pub fn gender_counts(&self) -> &[GenderCount] {
        &self.gender_counts
    }

    /// Mark the load as started.
    pub(crate) fn begin(&mut self) {
        self.status = LoadStatus::InProgress;
    }

    /// Replace all three sequences and flip to `Success` in one step.
    pub(crate) fn commit(&mut self, data: VaccinationData) {
        let (daily_doses, age_buckets, gender_counts) = data.into_parts();
        self.daily_doses = daily_doses;
        self.age_buckets = age_buckets;
        self.gender_counts = gender_counts;
        self.status = LoadStatus::Success;
    }

    /// Flip to `Failure`. Previously committed sequences are kept.
    pub(crate) fn fail(&mut self) {
        self.status = LoadStatus::Failure;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ages(n: usize) -> Vec<AgeBucketCount> {
        (0..n)
            .map(|i| AgeBucketCount {
                age_range: format!("bucket-{i}"),
                count: 10,
            })
            .collect()
    }

    fn genders() -> Vec<GenderCount> {
        Gender::ALL
            .iter()
            .map(|&gender| GenderCount { gender, count: 5 })
            .collect()
    }

    #[test]
    fn rejects_wrong_number_of_age_buckets() {
        for n in [0, 1, 2, 4] {
            let err = VaccinationData::new(Vec::new(), ages(n), genders()).unwrap_err();
            assert!(err.message().contains("age buckets"), "{err}");
        }
        assert!(VaccinationData::new(Vec::new(), ages(3), genders()).is_ok());
    }

    #[test]
    fn rejects_duplicate_gender() {
        let mut g = genders();
        g[2].gender = Gender::Male;
        let err = VaccinationData::new(Vec::new(), ages(3), g).unwrap_err();
        assert!(err.message().contains("Male"), "{err}");
    }

    #[test]
    fn rejects_counts_whose_total_overflows() {
        let mut g = genders();
        g[0].count = u64::MAX;
        let err = VaccinationData::new(Vec::new(), ages(3), g).unwrap_err();
        assert!(err.message().contains("overflows"), "{err}");

        let mut a = ages(3);
        a[1].count = u64::MAX;
        assert!(VaccinationData::new(Vec::new(), a, genders()).is_err());

        let mut g = genders();
        g[0].count = u64::MAX - 10;
        assert!(VaccinationData::new(Vec::new(), ages(3), g).is_ok());
    }

    #[test]
    fn gender_labels_parse_loosely() {
        assert_eq!(Gender::from_label("Male"), Some(Gender::Male));
        assert_eq!(Gender::from_label(" FEMALE "), Some(Gender::Female));
        assert_eq!(Gender::from_label("Others"), Some(Gender::Other));
        assert_eq!(Gender::from_label("other"), Some(Gender::Other));
        assert_eq!(Gender::from_label("unknown"), None);
    }

    #[test]
    fn failure_keeps_previous_sequences() {
        let data = VaccinationData::new(
            vec![DailyDosePoint {
                date: "2021-09-10".to_string(),
                dose1_count: 1,
                dose2_count: 2,
            }],
            ages(3),
            genders(),
        )
        .unwrap();

        let mut state = ViewState::new();
        assert_eq!(state.status(), LoadStatus::Initial);
        state.begin();
        state.commit(data);
        assert_eq!(state.status(), LoadStatus::Success);

        state.fail();
        assert_eq!(state.status(), LoadStatus::Failure);
        assert_eq!(state.daily_doses().len(), 1);
        assert_eq!(state.age_buckets().len(), 3);
    }
}
