use anyhow::{Context, Result};
use pluginforge_core::{
    ConsoleSink, Orchestrator, OutputSink, ProcessStepRunner, RunReport, RunSummary,
    ShellToolProbe, StderrSink, aggregate,
};
use std::fs;
use std::path::Path;
use std::sync::Arc;
use tracing::info;

use crate::cli::SelectionArgs;
use crate::config::load_config;
use crate::display::{print_summary, print_validation, render_markdown};

pub const JSON_REPORT_FILE: &str = "build-report.json";
pub const MARKDOWN_REPORT_FILE: &str = "BUILD_REPORT.md";

#[derive(Debug, Clone, Default)]
pub struct BuildOptions {
    pub selection: SelectionArgs,
    pub skip: Vec<String>,
    pub timeout: Option<u64>,
    pub dry_run: bool,
    pub json: bool,
    pub no_report: bool,
}

/// Run the full pipeline. `Ok(false)` when at least one plugin failed to build.
pub async fn build_command(options: BuildOptions) -> Result<bool> {
    let mut config = load_config(&options.selection)?;
    config.skip_steps(&options.skip)?;
    if options.timeout.is_some() {
        config.step_timeout_secs = options.timeout;
    }
    // Frozen from here on.
    let config = config;

    // Keep stdout clean for the JSON document.
    let sink: Arc<dyn OutputSink> = if options.json {
        Arc::new(StderrSink)
    } else {
        Arc::new(ConsoleSink)
    };
    let runner = ProcessStepRunner::new(sink).with_timeout(config.step_timeout());
    let probe = ShellToolProbe;
    let orchestrator = Orchestrator::new(&config, &runner, &probe);

    let report = if options.dry_run {
        orchestrator.dry_run().await?
    } else {
        orchestrator.run().await?
    };
    let summary = aggregate(&report);

    if !options.no_report && !options.dry_run {
        write_reports(&config.output_dir, &report, &summary)?;
    }

    if options.json {
        println!("{}", report.to_json_pretty()?);
    } else if options.dry_run {
        print_validation(&report.validation);
    } else {
        print_summary(&report, &summary);
    }

    Ok(report.succeeded())
}

/// Persist `build-report.json` and `BUILD_REPORT.md` into `output_dir`.
pub fn write_reports(output_dir: &Path, report: &RunReport, summary: &RunSummary) -> Result<()> {
    fs::create_dir_all(output_dir)
        .with_context(|| format!("Failed to create {}", output_dir.display()))?;

    let json_path = output_dir.join(JSON_REPORT_FILE);
    fs::write(&json_path, report.to_json_pretty()?)
        .with_context(|| format!("Failed to write {}", json_path.display()))?;

    let md_path = output_dir.join(MARKDOWN_REPORT_FILE);
    fs::write(&md_path, render_markdown(report, summary))
        .with_context(|| format!("Failed to write {}", md_path.display()))?;

    info!("Wrote reports to {}", output_dir.display());
    Ok(())
}
