//! Domain types used throughout the dashboard.
//!
//! This module defines:
//!
//! - the load lifecycle (`LoadStatus`)
//! - the typed vaccination sequences (`DailyDosePoint`, `AgeBucketCount`, `GenderCount`)
//! - the validated bundle committed on success (`VaccinationData`)
//! - the dashboard's view record (`ViewState`)

pub mod types;

pub use types::*;
