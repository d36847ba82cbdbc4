use super::artifact::{find_artifact, relocate_artifact};
use crate::config::{BuildConfig, StepPolicy, StepPolicyTable, StepSpec};
use crate::runners::StepRunner;
use crate::types::outcome::rounded_seconds;
use crate::types::{Unit, UnitBuildOutcome};
use chrono::Local;
use indexmap::IndexMap;
use std::path::PathBuf;
use tracing::{error, info, warn};

/// Runs a unit's steps in order and applies the step failure policy.
///
/// A failing `Tolerated` step is recorded as the unit's error and the
/// sequence continues; a failing `Fatal` step ends the sequence and fails
/// the unit.
pub struct UnitBuilder<'a> {
    runner: &'a dyn StepRunner,
    policies: StepPolicyTable,
    package_step: String,
    output_dir: PathBuf,
}

impl<'a> UnitBuilder<'a> {
    pub fn new(config: &BuildConfig, runner: &'a dyn StepRunner) -> Self {
        Self {
            runner,
            policies: config.policy_table(),
            package_step: config.package_step.clone(),
            output_dir: config.output_dir.clone(),
        }
    }

    pub fn with_policies(mut self, policies: StepPolicyTable) -> Self {
        self.policies = policies;
        self
    }

    pub async fn build(&self, unit: &Unit, steps: &[StepSpec]) -> UnitBuildOutcome {
        let start_time = Local::now();
        let mut executed = IndexMap::new();
        let mut skipped_steps = Vec::new();
        let mut unit_error = None;
        let mut fatal = false;

        info!(unit = %unit.name, "Building");

        for step in steps {
            if step.skip {
                info!(unit = %unit.name, step = %step.key, "Skipped");
                skipped_steps.push(step.key.clone());
                continue;
            }

            info!(unit = %unit.name, step = %step.key, "{}", step.label());
            let outcome = self
                .runner
                .run(&step.command, &unit.path, step.label())
                .await;
            let failure = (!outcome.success).then(|| {
                outcome
                    .error_message
                    .clone()
                    .unwrap_or_else(|| "step failed".to_string())
            });
            executed.insert(step.key.clone(), outcome);

            let Some(message) = failure else {
                continue;
            };

            match self.policies.policy_for(&step.key) {
                StepPolicy::Tolerated => {
                    warn!(unit = %unit.name, step = %step.key, "Failed, continuing: {}", message);
                    unit_error = Some(message);
                }
                StepPolicy::Fatal => {
                    error!(unit = %unit.name, step = %step.key, "Failed: {}", message);
                    unit_error = Some(message);
                    fatal = true;
                    break;
                }
            }
        }

        let mut warnings = Vec::new();
        let mut produced_artifact_path = None;
        if !fatal && executed.contains_key(&self.package_step) {
            match find_artifact(unit) {
                Some(source) => match relocate_artifact(&source, &self.output_dir) {
                    Ok(destination) => produced_artifact_path = Some(destination),
                    Err(e) => {
                        let warning = format!("could not move {}: {}", source.display(), e);
                        warn!(unit = %unit.name, "{}", warning);
                        warnings.push(warning);
                    }
                },
                None => {
                    let warning = format!(
                        "no {}.zip found after step '{}'",
                        unit.name, self.package_step
                    );
                    warn!(unit = %unit.name, "{}", warning);
                    warnings.push(warning);
                }
            }
        }

        let total_duration_seconds = match (executed.first(), executed.last()) {
            (Some((_, first)), Some((_, last))) => rounded_seconds(first.start_time, last.end_time),
            _ => 0,
        };

        let outcome = UnitBuildOutcome {
            unit_name: unit.name.clone(),
            path: unit.path.clone(),
            start_time,
            end_time: Local::now(),
            total_duration_seconds,
            steps: executed,
            skipped_steps,
            success: !fatal,
            produced_artifact_path,
            error: unit_error,
            warnings,
        };

        info!(unit = %unit.name, success = outcome.success, "Build finished");
        outcome
    }
}
