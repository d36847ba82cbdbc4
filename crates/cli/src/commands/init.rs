use anyhow::{Context, Result};
use pluginforge_core::BuildConfig;
use pluginforge_core::orchestrator::discover_units;
use std::{env, fs, path::PathBuf};
use tracing::info;

use crate::config::create_default_config;

pub fn init_command(cwd: Option<&str>, force: bool) -> Result<()> {
    let project_root = if let Some(cwd) = cwd {
        PathBuf::from(cwd)
    } else {
        env::current_dir().context("Failed to get current directory")?
    };

    let project_root = project_root
        .canonicalize()
        .context("Failed to canonicalize project root")?;

    let config_path = project_root.join(".pluginforge.json");
    if config_path.exists() && !force {
        println!("❌ Config already exists at: {}", config_path.display());
        println!("   Use --force to overwrite");
        return Ok(());
    }

    let config = create_default_config();
    fs::write(&config_path, config)
        .with_context(|| format!("Failed to write config to {}", config_path.display()))?;
    info!("Created config: {}", config_path.display());

    println!("✅ Created config: {}", config_path.display());

    let defaults = BuildConfig::default();
    let found = discover_units(&project_root, &defaults.name_prefix)
        .map(|units| units.len())
        .unwrap_or(0);
    println!(
        "📦 Found {} plugin(s) named '{}*' in {}",
        found,
        defaults.name_prefix,
        project_root.display()
    );
    println!("\n📌 Edit name_prefix, steps and tolerated_steps to match your plugins.");

    Ok(())
}
