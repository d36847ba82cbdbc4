//! pluginforge - validate, build and package a directory of plugins
//!
//! A run has three phases that never interleave:
//! - validation: probe the global tools once, then check every selected unit
//!   for its required files and interpreter constraint
//! - build: run each compatible unit's steps in order, tolerating failures
//!   only in steps the policy table marks as tolerated
//! - report: collect everything into a `RunReport` and summarize it
pub mod builder;
pub mod config;
pub mod error;
pub mod orchestrator;
pub mod process;
pub mod report;
pub mod runners;
pub mod types;
pub mod validation;

// Re-export commonly used types and traits
pub use error::{Error, Result};
pub use types::*;

// Re-export main API components
pub use builder::UnitBuilder;
pub use config::{BuildConfig, StepPolicy, StepPolicyTable, StepSpec};
pub use orchestrator::Orchestrator;
pub use process::{ConsoleSink, NullSink, OutputSink, StderrSink};
pub use report::{RunSummary, aggregate};
pub use runners::{ProcessStepRunner, StepRunner};
pub use validation::{PrerequisiteValidator, ShellToolProbe, ToolProbe, Version};
