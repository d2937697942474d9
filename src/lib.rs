//! `cowin-dashboard` library crate.
//!
//! The binary (`cowin`) is a thin wrapper around this library so that:
//!
//! - the load lifecycle and view mapping are testable without a terminal
//! - the TUI and the text commands share one dashboard component

pub mod app;
pub mod cli;
pub mod config;
pub mod dashboard;
pub mod data;
pub mod domain;
pub mod error;
pub mod io;
pub mod loader;
pub mod logging;
pub mod render;
pub mod report;
pub mod tui;
