//! Build step definitions and the failure policy applied to them

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

/// Key of the built-in step that produces the distributable archive.
pub const DEFAULT_PACKAGE_STEP: &str = "grunt_zip";

/// Keys of the built-in asset compilation steps.
pub const DEFAULT_TOLERATED_STEPS: [&str; 2] = ["grunt_css", "grunt_js"];

/// One external command in a unit's build sequence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StepSpec {
    pub key: String,
    pub command: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub skip: bool,
}

impl StepSpec {
    pub fn new(
        key: impl Into<String>,
        command: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            key: key.into(),
            command: command.into(),
            description: description.into(),
            skip: false,
        }
    }

    pub fn skipped(mut self) -> Self {
        self.skip = true;
        self
    }

    /// Description, falling back to the key when none was configured.
    pub fn label(&self) -> &str {
        if self.description.is_empty() {
            &self.key
        } else {
            &self.description
        }
    }
}

/// The six steps run when the configuration names none.
pub fn default_steps() -> Vec<StepSpec> {
    vec![
        StepSpec::new(
            "composer_install",
            "composer install --no-dev --optimize-autoloader",
            "Install PHP dependencies",
        ),
        StepSpec::new("npm_install", "npm install", "Install Node dependencies"),
        StepSpec::new("grunt_css", "grunt css", "Compile CSS assets"),
        StepSpec::new("grunt_js", "grunt js", "Compile JavaScript assets"),
        StepSpec::new("grunt_build", "grunt build", "Build plugin"),
        StepSpec::new(DEFAULT_PACKAGE_STEP, "grunt zip", "Package plugin archive"),
    ]
}

/// Reject step lists that reuse a key.
pub fn ensure_unique_keys(steps: &[StepSpec]) -> Result<()> {
    let mut seen = HashSet::new();
    for step in steps {
        if !seen.insert(step.key.as_str()) {
            return Err(Error::DuplicateStepKey(step.key.clone()));
        }
    }
    Ok(())
}

/// What a failing step does to the rest of its unit's build.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StepPolicy {
    /// Stop the unit and mark its build failed.
    Fatal,
    /// Record the failure and keep going.
    Tolerated,
}

/// Per-key failure policy. Keys not in the table are fatal.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct StepPolicyTable {
    policies: HashMap<String, StepPolicy>,
}

impl StepPolicyTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Table where exactly `keys` are tolerated.
    pub fn tolerating<I, S>(keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut table = Self::new();
        for key in keys {
            table.set(key, StepPolicy::Tolerated);
        }
        table
    }

    pub fn set(&mut self, key: impl Into<String>, policy: StepPolicy) {
        self.policies.insert(key.into(), policy);
    }

    pub fn policy_for(&self, key: &str) -> StepPolicy {
        self.policies.get(key).copied().unwrap_or(StepPolicy::Fatal)
    }

    pub fn is_tolerated(&self, key: &str) -> bool {
        self.policy_for(key) == StepPolicy::Tolerated
    }
}
