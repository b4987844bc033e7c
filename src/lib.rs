//! Analysis of service timing artifacts: run-time histograms with
//! per-service summary statistics, and a release timing diagram
//! extracted from a free-text log. Used by the `service-timing`
//! binary; the modules are independent enough to be driven from tests
//! directly.

pub mod config;
pub mod release_log;
pub mod render;
pub mod report;
pub mod samples;
pub mod stats;
pub mod utillib;
