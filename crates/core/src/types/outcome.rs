use chrono::{DateTime, Local};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Result of running one step command.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StepOutcome {
    pub command: String,
    pub description: String,
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
    pub output: String,
    pub error_output: String,
    pub start_time: DateTime<Local>,
    pub end_time: DateTime<Local>,
    pub duration_seconds: u64,
}

impl StepOutcome {
    /// Outcome for a command that never produced a process.
    pub fn launch_failure(
        command: &str,
        description: &str,
        start_time: DateTime<Local>,
        message: String,
    ) -> Self {
        let end_time = Local::now();
        Self {
            command: command.to_string(),
            description: description.to_string(),
            success: false,
            error_message: Some(message),
            output: String::new(),
            error_output: String::new(),
            start_time,
            end_time,
            duration_seconds: rounded_seconds(start_time, end_time),
        }
    }
}

/// Result of building one unit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnitBuildOutcome {
    pub unit_name: String,
    pub path: PathBuf,
    pub start_time: DateTime<Local>,
    pub end_time: DateTime<Local>,
    pub total_duration_seconds: u64,
    /// Executed steps in execution order.
    pub steps: IndexMap<String, StepOutcome>,
    /// Configured steps that were marked `skip`.
    #[serde(default)]
    pub skipped_steps: Vec<String>,
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub produced_artifact_path: Option<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(default)]
    pub warnings: Vec<String>,
}

impl UnitBuildOutcome {
    /// Steps that ran and failed, in execution order.
    pub fn failed_steps(&self) -> impl Iterator<Item = (&String, &StepOutcome)> {
        self.steps.iter().filter(|(_, step)| !step.success)
    }
}

/// Wall-clock seconds between two instants, rounded to the nearest second.
pub fn rounded_seconds(start: DateTime<Local>, end: DateTime<Local>) -> u64 {
    let millis = (end - start).num_milliseconds().max(0) as u64;
    (millis + 500) / 1000
}
