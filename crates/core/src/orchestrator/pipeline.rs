use super::selection;
use crate::builder::UnitBuilder;
use crate::config::BuildConfig;
use crate::error::Result;
use crate::runners::StepRunner;
use crate::types::{BuildResults, RunReport, Unit, ValidationReport};
use crate::validation::{PrerequisiteValidator, ToolProbe};
use chrono::Local;
use tracing::info;

/// Drives a whole run: select, validate everything, then build.
///
/// Validation of every selected unit finishes before the first build step
/// starts. Units are built one at a time, in resolution order, and a failed
/// unit never stops the next one.
pub struct Orchestrator<'a> {
    config: &'a BuildConfig,
    runner: &'a dyn StepRunner,
    probe: &'a dyn ToolProbe,
}

impl<'a> Orchestrator<'a> {
    pub fn new(config: &'a BuildConfig, runner: &'a dyn StepRunner, probe: &'a dyn ToolProbe) -> Self {
        Self {
            config,
            runner,
            probe,
        }
    }

    /// The units this run covers. Fails on any configuration error.
    pub fn resolve_units(&self) -> Result<Vec<Unit>> {
        selection::resolve_units(self.config)
    }

    /// Phase 1 only.
    pub async fn validate(&self) -> Result<(Vec<Unit>, ValidationReport)> {
        let units = self.resolve_units()?;
        let validator = PrerequisiteValidator::new(self.config, self.probe);
        let validation = validator.validate(&units).await;
        Ok((units, validation))
    }

    /// Validate without building; the build section of the report is empty.
    pub async fn dry_run(&self) -> Result<RunReport> {
        let (_, validation) = self.validate().await?;
        let now = Local::now();
        Ok(RunReport {
            validation,
            build: BuildResults::from_outcomes(Vec::new(), now, now),
        })
    }

    /// Validate every selected unit, then build the compatible ones.
    pub async fn run(&self) -> Result<RunReport> {
        let (units, validation) = self.validate().await?;

        let steps = self.config.step_specs();
        let builder = UnitBuilder::new(self.config, self.runner);
        let compatible: Vec<&Unit> = units
            .iter()
            .filter(|unit| validation.is_compatible(&unit.name))
            .collect();

        info!(
            "Building {} of {} unit(s)",
            compatible.len(),
            units.len()
        );

        let start_time = Local::now();
        let mut outcomes = Vec::with_capacity(compatible.len());
        for unit in compatible {
            outcomes.push(builder.build(unit, &steps).await);
        }
        let build = BuildResults::from_outcomes(outcomes, start_time, Local::now());

        info!(
            successful = build.totals.successful,
            failed = build.totals.failed,
            "Run finished"
        );

        Ok(RunReport { validation, build })
    }
}
