use anyhow::Result;
use pluginforge_core::orchestrator::resolve_units;

use crate::cli::SelectionArgs;
use crate::config::load_config;
use crate::display::print_units;

pub fn list_command(selection: &SelectionArgs) -> Result<()> {
    let config = load_config(selection)?;
    let units = resolve_units(&config)?;
    print_units(&units);
    Ok(())
}
