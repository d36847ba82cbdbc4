use anyhow::Result;
use pluginforge_core::orchestrator::resolve_units;
use pluginforge_core::{PrerequisiteValidator, ShellToolProbe};
use tracing::debug;

use crate::cli::SelectionArgs;
use crate::config::load_config;
use crate::display::print_validation;

/// Phase 1 only. Fails when any selected plugin is incompatible.
pub async fn validate_command(selection: &SelectionArgs, json: bool) -> Result<bool> {
    let config = load_config(selection)?;
    debug!("Validating plugins in {}", config.plugins_dir.display());

    let units = resolve_units(&config)?;
    let probe = ShellToolProbe;
    let validation = PrerequisiteValidator::new(&config, &probe)
        .validate(&units)
        .await;

    if json {
        println!("{}", serde_json::to_string_pretty(&validation)?);
    } else {
        print_validation(&validation);
    }

    Ok(validation.incompatible.is_empty())
}
