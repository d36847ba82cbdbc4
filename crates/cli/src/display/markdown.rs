use pluginforge_core::{RunReport, RunSummary};
use std::fmt::Write;

use super::format_duration;

/// Render the persisted `BUILD_REPORT.md`.
pub fn render_markdown(report: &RunReport, summary: &RunSummary) -> String {
    let mut md = String::new();
    // Writing into a String cannot fail.
    let _ = write_report(&mut md, report, summary);
    md
}

fn write_report(md: &mut String, report: &RunReport, summary: &RunSummary) -> std::fmt::Result {
    writeln!(md, "# Plugin Build Report")?;
    writeln!(md)?;
    writeln!(
        md,
        "Generated {}",
        report.build.end_time.format("%Y-%m-%d %H:%M:%S")
    )?;
    writeln!(md)?;

    writeln!(md, "## Summary")?;
    writeln!(md)?;
    writeln!(md, "| Metric | Value |")?;
    writeln!(md, "|---|---|")?;
    writeln!(md, "| Plugins | {} |", summary.total_units)?;
    writeln!(md, "| Compatible | {} |", summary.compatible)?;
    writeln!(md, "| Incompatible | {} |", summary.incompatible)?;
    writeln!(md, "| Built | {} |", summary.successful)?;
    writeln!(md, "| Failed | {} |", summary.failed)?;
    writeln!(md, "| Success rate | {}% |", summary.success_rate)?;
    writeln!(
        md,
        "| Total time | {} |",
        format_duration(summary.total_duration_seconds)
    )?;
    writeln!(
        md,
        "| Average per plugin | {} |",
        format_duration(summary.average_duration_seconds.round() as u64)
    )?;
    writeln!(md)?;

    writeln!(md, "## Tools")?;
    writeln!(md)?;
    writeln!(md, "| Tool | Available | Version |")?;
    writeln!(md, "|---|---|---|")?;
    for (tool, status) in &report.validation.global.tools {
        writeln!(
            md,
            "| {} | {} | {} |",
            tool,
            if status.available { "yes" } else { "no" },
            status.version.as_deref().unwrap_or("-")
        )?;
    }
    writeln!(md)?;

    if !report.validation.incompatible.is_empty() {
        writeln!(md, "## Incompatible Plugins")?;
        writeln!(md)?;
        for name in &report.validation.incompatible {
            writeln!(md, "- **{name}**")?;
            if let Some(compat) = report.validation.units.get(name) {
                for reason in &compat.reasons {
                    writeln!(md, "  - {reason}")?;
                }
            }
        }
        writeln!(md)?;
    }

    if !report.build.outcomes.is_empty() {
        writeln!(md, "## Builds")?;
        writeln!(md)?;
    }
    for outcome in &report.build.outcomes {
        writeln!(
            md,
            "### {} {}",
            if outcome.success { "✅" } else { "❌" },
            outcome.unit_name
        )?;
        writeln!(md)?;
        writeln!(md, "| Step | Status | Duration | Error |")?;
        writeln!(md, "|---|---|---|---|")?;
        for (key, step) in &outcome.steps {
            writeln!(
                md,
                "| {} | {} | {} | {} |",
                key,
                if step.success { "ok" } else { "failed" },
                format_duration(step.duration_seconds),
                step.error_message.as_deref().unwrap_or("")
            )?;
        }
        for key in &outcome.skipped_steps {
            writeln!(md, "| {key} | skipped | - | |")?;
        }
        writeln!(md)?;

        if let Some(artifact) = &outcome.produced_artifact_path {
            writeln!(md, "Artifact: `{}`", artifact.display())?;
            writeln!(md)?;
        }
        if let Some(error) = &outcome.error {
            writeln!(md, "Error: {error}")?;
            writeln!(md)?;
        }
        for warning in &outcome.warnings {
            writeln!(md, "Warning: {warning}")?;
            writeln!(md)?;
        }
    }

    if !summary.step_stats.is_empty() {
        writeln!(md, "## Step Timing")?;
        writeln!(md)?;
        writeln!(md, "| Step | Runs | Failures | Average | Min | Max |")?;
        writeln!(md, "|---|---|---|---|---|---|")?;
        for (key, stats) in &summary.step_stats {
            writeln!(
                md,
                "| {} | {} | {} | {:.1}s | {}s | {}s |",
                key,
                stats.runs,
                stats.failures,
                stats.average_seconds,
                stats.min_seconds,
                stats.max_seconds
            )?;
        }
    }

    Ok(())
}
