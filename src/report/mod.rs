//! Plain-text output for the non-interactive commands.

pub mod format;

pub use format::format_view;
