//! Input/output helpers.
//!
//! - snapshot JSON read/write, and a source that replays a snapshot (`snapshot`)

pub mod snapshot;

pub use snapshot::*;
