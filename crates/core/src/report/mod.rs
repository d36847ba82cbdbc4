//! Reducing a run report to summary statistics

pub mod summary;

pub use summary::{RunSummary, StepStats, aggregate};
