use crate::types::RunReport;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Timing and success counts for one step key across all built units.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StepStats {
    pub runs: usize,
    pub successes: usize,
    pub failures: usize,
    pub average_seconds: f64,
    pub min_seconds: u64,
    pub max_seconds: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunSummary {
    pub total_units: usize,
    pub compatible: usize,
    pub incompatible: usize,
    pub successful: usize,
    pub failed: usize,
    /// Successful builds over compatible units, as a whole percentage.
    pub success_rate: u32,
    pub total_duration_seconds: u64,
    pub average_duration_seconds: f64,
    /// Keyed by step, in order of first execution.
    pub step_stats: IndexMap<String, StepStats>,
}

/// Summarize a finished run. Pure.
pub fn aggregate(report: &RunReport) -> RunSummary {
    let total_units = report.validation.units.len();
    let incompatible = report.validation.incompatible.len();
    // A deserialized report may list incompatible names absent from `units`.
    let compatible = total_units.saturating_sub(incompatible);
    let outcomes = &report.build.outcomes;

    let success_rate = if compatible == 0 {
        0
    } else {
        (report.build.totals.successful as f64 * 100.0 / compatible as f64).round() as u32
    };

    let total_duration_seconds: u64 = outcomes
        .iter()
        .map(|outcome| outcome.total_duration_seconds)
        .sum();
    let average_duration_seconds = if outcomes.is_empty() {
        0.0
    } else {
        total_duration_seconds as f64 / outcomes.len() as f64
    };

    let mut durations: IndexMap<String, Vec<(u64, bool)>> = IndexMap::new();
    for outcome in outcomes {
        for (key, step) in &outcome.steps {
            durations
                .entry(key.clone())
                .or_default()
                .push((step.duration_seconds, step.success));
        }
    }

    let step_stats = durations
        .into_iter()
        .map(|(key, runs)| {
            let total: u64 = runs.iter().map(|(secs, _)| secs).sum();
            let successes = runs.iter().filter(|(_, ok)| *ok).count();
            let stats = StepStats {
                runs: runs.len(),
                successes,
                failures: runs.len() - successes,
                average_seconds: total as f64 / runs.len() as f64,
                min_seconds: runs.iter().map(|(secs, _)| *secs).min().unwrap_or(0),
                max_seconds: runs.iter().map(|(secs, _)| *secs).max().unwrap_or(0),
            };
            (key, stats)
        })
        .collect();

    RunSummary {
        total_units,
        compatible,
        incompatible,
        successful: report.build.totals.successful,
        failed: report.build.totals.failed,
        success_rate,
        total_duration_seconds,
        average_duration_seconds,
        step_stats,
    }
}
