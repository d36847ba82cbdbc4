use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use super::steps::{
    DEFAULT_PACKAGE_STEP, DEFAULT_TOLERATED_STEPS, StepPolicyTable, StepSpec, default_steps,
    ensure_unique_keys,
};
use super::tools::{ToolCheck, default_interpreter, default_tools};

/// File names searched for, in order, in each directory while walking up.
pub const CONFIG_FILE_NAMES: [&str; 2] = [".pluginforge.json", "pluginforge.json"];

/// The three declarative files every unit must carry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RequiredFiles {
    /// Manifest of the Node package manager.
    pub package_manifest: String,
    /// Manifest of the PHP dependency manager; also declares the interpreter requirement.
    pub dependency_manifest: String,
    /// Task runner configuration.
    pub build_config: String,
}

impl Default for RequiredFiles {
    fn default() -> Self {
        Self {
            package_manifest: "package.json".to_string(),
            dependency_manifest: "composer.json".to_string(),
            build_config: "Gruntfile.js".to_string(),
        }
    }
}

impl RequiredFiles {
    pub fn names(&self) -> [&str; 3] {
        [
            &self.package_manifest,
            &self.dependency_manifest,
            &self.build_config,
        ]
    }
}

/// Run configuration. Built once, then shared read-only by every phase.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", default)]
pub struct BuildConfig {
    /// Directory whose subdirectories are the candidate units.
    pub plugins_dir: PathBuf,
    /// Where packaged archives and reports are written.
    pub output_dir: PathBuf,
    /// Every unit name must start with this.
    pub name_prefix: String,
    pub include: Vec<String>,
    pub exclude: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub steps: Option<Vec<StepSpec>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tolerated_steps: Option<Vec<String>>,
    pub package_step: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub step_timeout_secs: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tools: Option<Vec<ToolCheck>>,
    pub interpreter: ToolCheck,
    pub required_files: RequiredFiles,
}

impl Default for BuildConfig {
    fn default() -> Self {
        Self {
            plugins_dir: PathBuf::from("."),
            output_dir: PathBuf::from("build"),
            name_prefix: "wp-".to_string(),
            include: Vec::new(),
            exclude: Vec::new(),
            steps: None,
            tolerated_steps: None,
            package_step: DEFAULT_PACKAGE_STEP.to_string(),
            step_timeout_secs: None,
            tools: None,
            interpreter: default_interpreter(),
            required_files: RequiredFiles::default(),
        }
    }
}

impl BuildConfig {
    /// Load a config file; relative directories resolve against its parent.
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&contents).map_err(|e| {
            Error::ConfigError(format!("Failed to parse {}: {e}", path.display()))
        })?;

        let base = path.parent().unwrap_or_else(|| Path::new("."));
        Ok(config.resolve_relative_to(base))
    }

    pub fn save_to_file(&self, path: &Path) -> Result<()> {
        let contents = serde_json::to_string_pretty(self)
            .map_err(|e| Error::ConfigError(format!("Failed to serialize config: {e}")))?;
        std::fs::write(path, contents)?;
        Ok(())
    }

    pub fn find_config_file(start_path: &Path) -> Option<PathBuf> {
        let mut current = start_path;

        loop {
            for name in CONFIG_FILE_NAMES {
                let config_path = current.join(name);
                if config_path.exists() {
                    return Some(config_path);
                }
            }

            current = current.parent()?;
        }
    }

    pub fn resolve_relative_to(mut self, base: &Path) -> Self {
        if self.plugins_dir.is_relative() {
            self.plugins_dir = base.join(&self.plugins_dir);
        }
        if self.output_dir.is_relative() {
            self.output_dir = base.join(&self.output_dir);
        }
        self
    }

    /// Checks that must pass before any phase runs.
    pub fn validate(&self) -> Result<()> {
        if self.name_prefix.is_empty() {
            return Err(Error::ConfigError("name_prefix must not be empty".into()));
        }

        let steps = self.step_specs();
        ensure_unique_keys(&steps)?;

        if let Some(step) = steps.iter().find(|step| step.command.trim().is_empty()) {
            return Err(Error::ConfigError(format!(
                "Step '{}' has an empty command",
                step.key
            )));
        }

        if self.step_timeout_secs == Some(0) {
            return Err(Error::ConfigError(
                "step_timeout_secs must be greater than zero".into(),
            ));
        }

        Ok(())
    }

    /// Configured steps, or the built-in sequence.
    pub fn step_specs(&self) -> Vec<StepSpec> {
        self.steps.clone().unwrap_or_else(default_steps)
    }

    pub fn policy_table(&self) -> StepPolicyTable {
        match &self.tolerated_steps {
            Some(keys) => StepPolicyTable::tolerating(keys.iter().cloned()),
            None => StepPolicyTable::tolerating(DEFAULT_TOLERATED_STEPS),
        }
    }

    pub fn tool_checks(&self) -> Vec<ToolCheck> {
        self.tools.clone().unwrap_or_else(default_tools)
    }

    pub fn step_timeout(&self) -> Option<Duration> {
        self.step_timeout_secs.map(Duration::from_secs)
    }

    /// Mark `keys` as skipped, materializing the default steps if needed.
    pub fn skip_steps(&mut self, keys: &[String]) -> Result<()> {
        if keys.is_empty() {
            return Ok(());
        }

        let mut steps = self.step_specs();
        for key in keys {
            let step = steps
                .iter_mut()
                .find(|step| &step.key == key)
                .ok_or_else(|| Error::ConfigError(format!("Unknown step '{key}'")))?;
            step.skip = true;
        }
        self.steps = Some(steps);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_defaults_from_empty_object() {
        let config: BuildConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config, BuildConfig::default());
        assert_eq!(config.step_specs().len(), 6);
        assert!(config.policy_table().is_tolerated("grunt_css"));
        assert!(!config.policy_table().is_tolerated("grunt_build"));
        assert_eq!(config.tool_checks().len(), 3);
        assert!(config.step_timeout().is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_load_resolves_relative_dirs() {
        let temp = TempDir::new().unwrap();
        let config_path = temp.path().join(".pluginforge.json");
        let json = serde_json::json!({
            "plugins_dir": "plugins",
            "output_dir": "/tmp/pluginforge-out",
            "name_prefix": "acme-",
            "exclude": ["acme-legacy"],
            "tolerated_steps": ["grunt_css"]
        });
        std::fs::write(&config_path, serde_json::to_string_pretty(&json).unwrap()).unwrap();

        let config = BuildConfig::load_from_file(&config_path).unwrap();
        assert_eq!(config.plugins_dir, temp.path().join("plugins"));
        assert_eq!(config.output_dir, PathBuf::from("/tmp/pluginforge-out"));
        assert_eq!(config.name_prefix, "acme-");
        assert_eq!(config.exclude, vec!["acme-legacy".to_string()]);
        assert!(!config.policy_table().is_tolerated("grunt_js"));
    }

    #[test]
    fn test_load_reports_parse_errors_as_config_errors() {
        let temp = TempDir::new().unwrap();
        let config_path = temp.path().join("pluginforge.json");
        std::fs::write(&config_path, "{ not json").unwrap();

        let err = BuildConfig::load_from_file(&config_path).unwrap_err();
        assert!(matches!(err, Error::ConfigError(_)));
    }

    #[test]
    fn test_find_config_file_walks_up() {
        let temp = TempDir::new().unwrap();
        let nested = temp.path().join("a").join("b");
        std::fs::create_dir_all(&nested).unwrap();
        std::fs::write(temp.path().join("pluginforge.json"), "{}").unwrap();

        let found = BuildConfig::find_config_file(&nested).unwrap();
        assert_eq!(found, temp.path().join("pluginforge.json"));
    }

    #[test]
    fn test_save_then_load_keeps_steps() {
        let temp = TempDir::new().unwrap();
        let config_path = temp.path().join(".pluginforge.json");
        let config = BuildConfig {
            plugins_dir: temp.path().to_path_buf(),
            output_dir: temp.path().join("build"),
            steps: Some(vec![StepSpec::new("npm_install", "npm ci", "Install").skipped()]),
            ..Default::default()
        };
        config.save_to_file(&config_path).unwrap();

        let loaded = BuildConfig::load_from_file(&config_path).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let config = BuildConfig {
            name_prefix: String::new(),
            ..Default::default()
        };
        assert!(matches!(config.validate(), Err(Error::ConfigError(_))));

        let config = BuildConfig {
            steps: Some(vec![
                StepSpec::new("build", "make", ""),
                StepSpec::new("build", "make dist", ""),
            ]),
            ..Default::default()
        };
        assert!(matches!(config.validate(), Err(Error::DuplicateStepKey(_))));

        let config = BuildConfig {
            step_timeout_secs: Some(0),
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_skip_steps() {
        let mut config = BuildConfig::default();
        config
            .skip_steps(&["grunt_zip".to_string(), "grunt_css".to_string()])
            .unwrap();
        let skipped: Vec<_> = config
            .step_specs()
            .into_iter()
            .filter(|s| s.skip)
            .map(|s| s.key)
            .collect();
        assert_eq!(skipped, vec!["grunt_css", "grunt_zip"]);

        let err = config.skip_steps(&["deploy".to_string()]).unwrap_err();
        assert!(matches!(err, Error::ConfigError(_)));
    }
}
