//! Data sources.
//!
//! - `cowin`: HTTP client for the CoWIN vaccination endpoint plus payload validation

pub mod cowin;

pub use cowin::{CowinClient, VaccinationSource, interpret_response};
