//! Shared types for keystats.
//!
//! Holds the log record and frequency-table models, the error types,
//! CLI/config-file settings and percentage formatting used by the data
//! crate and the binary.

pub mod error;
pub mod formatting;
pub mod models;
pub mod settings;
