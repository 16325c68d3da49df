//! Data layer for keystats.
//!
//! Responsible for discovering and reading key log files, parsing their
//! lines, aggregating counts into frequency tables and rendering the ranked
//! report.

pub mod aggregator;
pub mod parser;
pub mod reader;
pub mod report;

pub use keystats_core as core;
