use super::outcome::{UnitBuildOutcome, rounded_seconds};
use crate::validation::Version;
use chrono::{DateTime, Local};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolStatus {
    pub available: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
}

/// Availability of the tools every build depends on, probed once per run.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct GlobalToolStatus {
    pub tools: IndexMap<String, ToolStatus>,
    pub interpreter_version: Option<Version>,
}

impl GlobalToolStatus {
    pub fn all_available(&self) -> bool {
        self.tools.values().all(|status| status.available)
    }

    pub fn missing_tools(&self) -> Vec<&str> {
        self.tools
            .iter()
            .filter(|(_, status)| !status.available)
            .map(|(id, _)| id.as_str())
            .collect()
    }
}

/// Interpreter requirement declared by a unit's manifest.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VersionRequirement {
    /// Constraint text as written, e.g. `^8.1`.
    pub raw: String,
    /// Dotted path of the manifest field it came from, e.g. `require.php`.
    pub source_field: String,
    /// Normalized minimum version; `None` when the constraint is unparsable.
    pub minimum: Option<Version>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnitCompatibility {
    pub required_files: IndexMap<String, bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version_requirement: Option<VersionRequirement>,
    pub version_satisfied: bool,
    pub is_compatible: bool,
    /// One line per failed check.
    #[serde(default)]
    pub reasons: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ValidationReport {
    pub global: GlobalToolStatus,
    pub units: IndexMap<String, UnitCompatibility>,
    pub incompatible: Vec<String>,
}

impl ValidationReport {
    /// Compatible unit names in resolution order.
    pub fn compatible(&self) -> Vec<&str> {
        self.units
            .iter()
            .filter(|(_, compat)| compat.is_compatible)
            .map(|(name, _)| name.as_str())
            .collect()
    }

    pub fn is_compatible(&self, name: &str) -> bool {
        self.units
            .get(name)
            .is_some_and(|compat| compat.is_compatible)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct BuildTotals {
    pub total: usize,
    pub successful: usize,
    pub failed: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BuildResults {
    pub outcomes: Vec<UnitBuildOutcome>,
    pub totals: BuildTotals,
    pub start_time: DateTime<Local>,
    pub end_time: DateTime<Local>,
    pub duration_seconds: u64,
}

impl BuildResults {
    pub fn from_outcomes(
        outcomes: Vec<UnitBuildOutcome>,
        start_time: DateTime<Local>,
        end_time: DateTime<Local>,
    ) -> Self {
        let successful = outcomes.iter().filter(|outcome| outcome.success).count();
        let totals = BuildTotals {
            total: outcomes.len(),
            successful,
            failed: outcomes.len() - successful,
        };

        Self {
            outcomes,
            totals,
            start_time,
            end_time,
            duration_seconds: rounded_seconds(start_time, end_time),
        }
    }
}

/// Everything a run produced. Read-only once built.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunReport {
    pub validation: ValidationReport,
    pub build: BuildResults,
}

impl RunReport {
    /// A run fails only when at least one compatible unit failed to build.
    pub fn succeeded(&self) -> bool {
        self.build.totals.failed == 0
    }

    pub fn to_json_pretty(&self) -> crate::error::Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn outcome(name: &str, success: bool) -> UnitBuildOutcome {
        let now = Local::now();
        UnitBuildOutcome {
            unit_name: name.to_string(),
            path: PathBuf::from(name),
            start_time: now,
            end_time: now,
            total_duration_seconds: 0,
            steps: IndexMap::new(),
            skipped_steps: vec![],
            success,
            produced_artifact_path: None,
            error: None,
            warnings: vec![],
        }
    }

    #[test]
    fn test_totals_from_outcomes() {
        let now = Local::now();
        let results = BuildResults::from_outcomes(
            vec![outcome("wp-a", true), outcome("wp-b", false), outcome("wp-c", true)],
            now,
            now,
        );
        assert_eq!(
            results.totals,
            BuildTotals {
                total: 3,
                successful: 2,
                failed: 1
            }
        );
    }

    #[test]
    fn test_missing_tools() {
        let mut global = GlobalToolStatus::default();
        global.tools.insert(
            "composer".to_string(),
            ToolStatus {
                available: true,
                version: Some("2.6.5".to_string()),
            },
        );
        global.tools.insert(
            "grunt".to_string(),
            ToolStatus {
                available: false,
                version: None,
            },
        );
        assert!(!global.all_available());
        assert_eq!(global.missing_tools(), vec!["grunt"]);
    }
}
