use pluginforge_core::{RunReport, RunSummary, Unit, ValidationReport};

use super::format_duration;

pub fn print_units(units: &[Unit]) {
    if units.is_empty() {
        println!("❌ No plugins selected.");
        return;
    }

    println!("📦 {} plugin(s):", units.len());
    for unit in units {
        println!("   • {} ({})", unit.name, unit.path.display());
    }
}

pub fn print_validation(validation: &ValidationReport) {
    println!("🔍 Tools");
    for (tool, status) in &validation.global.tools {
        let mark = if status.available { "✅" } else { "❌" };
        let version = status.version.as_deref().unwrap_or("-");
        println!("   {mark} {tool} {version}");
    }

    println!("\n🔍 Plugins");
    for (name, compat) in &validation.units {
        if compat.is_compatible {
            println!("   ✅ {name}");
        } else {
            println!("   ❌ {name}");
            for reason in &compat.reasons {
                println!("      • {reason}");
            }
        }
    }
}

pub fn print_summary(report: &RunReport, summary: &RunSummary) {
    println!("\n{}", "=".repeat(80));
    println!("📊 Build summary");
    println!("{}", "=".repeat(80));
    println!(
        "   Plugins: {} total, {} compatible, {} incompatible",
        summary.total_units, summary.compatible, summary.incompatible
    );
    println!(
        "   Builds:  {} succeeded, {} failed ({}% success)",
        summary.successful, summary.failed, summary.success_rate
    );
    println!(
        "   Time:    {} total, {} average per plugin",
        format_duration(summary.total_duration_seconds),
        format_duration(summary.average_duration_seconds.round() as u64)
    );

    for outcome in &report.build.outcomes {
        let mark = if outcome.success { "✅" } else { "❌" };
        println!(
            "\n{mark} {} ({})",
            outcome.unit_name,
            format_duration(outcome.total_duration_seconds)
        );
        for (key, step) in &outcome.steps {
            let step_mark = if step.success { "✓" } else { "✗" };
            println!(
                "   {step_mark} {key}: {} ({})",
                step.description,
                format_duration(step.duration_seconds)
            );
        }
        for key in &outcome.skipped_steps {
            println!("   - {key}: skipped");
        }
        if let Some(artifact) = &outcome.produced_artifact_path {
            println!("   📦 {}", artifact.display());
        }
        if let Some(error) = &outcome.error {
            println!("   ⚠️  {error}");
        }
        for warning in &outcome.warnings {
            println!("   ⚠️  {warning}");
        }
    }

    if !report.validation.incompatible.is_empty() {
        println!(
            "\n⏭️  Not built (incompatible): {}",
            report.validation.incompatible.join(", ")
        );
    }
}
