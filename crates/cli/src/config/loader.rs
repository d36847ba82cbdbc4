use anyhow::{Context, Result};
use pluginforge_core::BuildConfig;
use std::env;
use tracing::debug;

use crate::cli::SelectionArgs;

/// Resolve the run configuration: explicit file, nearest config file, or
/// defaults rooted at the working directory; then apply command-line overrides.
pub fn load_config(selection: &SelectionArgs) -> Result<BuildConfig> {
    let cwd = env::current_dir().context("Failed to get current directory")?;

    let config_path = match &selection.config {
        Some(path) => Some(path.clone()),
        None => BuildConfig::find_config_file(&cwd),
    };

    let mut config = match config_path {
        Some(path) => {
            debug!("Loading config from {}", path.display());
            BuildConfig::load_from_file(&path)
                .with_context(|| format!("Failed to load config from {}", path.display()))?
        }
        None => {
            debug!("No config file found, using defaults");
            BuildConfig::default().resolve_relative_to(&cwd)
        }
    };

    if let Some(dir) = &selection.plugins_dir {
        config.plugins_dir = cwd.join(dir);
    }
    if let Some(dir) = &selection.output_dir {
        config.output_dir = cwd.join(dir);
    }
    if !selection.include.is_empty() {
        config.include = selection.include.clone();
    }
    if !selection.exclude.is_empty() {
        config.exclude = selection.exclude.clone();
    }

    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;
    use tempfile::TempDir;

    #[test]
    fn test_explicit_config_and_overrides() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("custom.json");
        std::fs::write(
            &path,
            r#"{"plugins_dir": "plugins", "exclude": ["wp-old"], "include": ["wp-a"]}"#,
        )
        .unwrap();

        let selection = SelectionArgs {
            config: Some(path),
            output_dir: Some(PathBuf::from("/tmp/pluginforge-cli-out")),
            include: vec!["wp-b".to_string()],
            ..Default::default()
        };
        let config = load_config(&selection).unwrap();

        assert_eq!(config.plugins_dir, temp.path().join("plugins"));
        assert_eq!(config.output_dir, PathBuf::from("/tmp/pluginforge-cli-out"));
        assert_eq!(config.include, vec!["wp-b".to_string()]);
        assert_eq!(config.exclude, vec!["wp-old".to_string()]);
    }

    #[test]
    fn test_missing_explicit_config_is_an_error() {
        let selection = SelectionArgs {
            config: Some(PathBuf::from("/no/such/pluginforge.json")),
            ..Default::default()
        };
        assert!(load_config(&selection).is_err());
    }
}
