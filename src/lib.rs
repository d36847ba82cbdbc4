//! Shared fixtures for the pluginforge integration tests

use async_trait::async_trait;
use chrono::Local;
use pluginforge_core::{StepOutcome, StepRunner, ToolProbe};
use std::collections::{HashMap, HashSet};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use tempfile::TempDir;

/// Ordered record of every probe and step, shared by the fakes of one test.
#[derive(Debug, Clone, Default)]
pub struct EventLog(Arc<Mutex<Vec<String>>>);

impl EventLog {
    pub fn push(&self, event: String) {
        self.0.lock().unwrap().push(event);
    }

    pub fn events(&self) -> Vec<String> {
        self.0.lock().unwrap().clone()
    }
}

/// Probe answering from a command table; unknown commands are unavailable.
pub struct TableProbe {
    answers: HashMap<String, String>,
    log: EventLog,
}

impl TableProbe {
    /// Every default tool present and the given interpreter version.
    pub fn with_php(php: &str, log: EventLog) -> Self {
        let mut answers = HashMap::new();
        answers.insert("composer --version".to_string(), "Composer version 2.7.1".to_string());
        answers.insert("npm --version".to_string(), "10.2.4".to_string());
        answers.insert("grunt --version".to_string(), "grunt-cli v1.4.3".to_string());
        answers.insert("php -v".to_string(), format!("PHP {php} (cli)"));
        Self { answers, log }
    }

    pub fn without(mut self, command: &str) -> Self {
        self.answers.remove(command);
        self
    }
}

#[async_trait]
impl ToolProbe for TableProbe {
    async fn probe(&self, command: &str) -> Option<String> {
        self.log.push(format!("probe {command}"));
        self.answers.get(command).cloned()
    }
}

/// Runner that never spawns anything.
///
/// Fails the `(unit, command)` pairs it is told to and, for the packaging
/// command, drops `<unit>/dist/<unit>.zip` the way the real task does.
pub struct ScriptedRunner {
    failing: HashSet<(String, String)>,
    package_command: String,
    log: EventLog,
}

impl ScriptedRunner {
    pub fn new(log: EventLog) -> Self {
        Self {
            failing: HashSet::new(),
            package_command: "grunt zip".to_string(),
            log,
        }
    }

    pub fn failing(mut self, unit: &str, command: &str) -> Self {
        self.failing.insert((unit.to_string(), command.to_string()));
        self
    }
}

#[async_trait]
impl StepRunner for ScriptedRunner {
    async fn run(&self, command: &str, working_dir: &Path, description: &str) -> StepOutcome {
        let unit = unit_name(working_dir);
        self.log.push(format!("run {unit}: {command}"));

        let success = !self.failing.contains(&(unit.clone(), command.to_string()));
        if success && command == self.package_command {
            let dist = working_dir.join("dist");
            fs::create_dir_all(&dist).unwrap();
            fs::write(dist.join(format!("{unit}.zip")), b"PK").unwrap();
        }

        let now = Local::now();
        StepOutcome {
            command: command.to_string(),
            description: description.to_string(),
            success,
            error_message: (!success).then(|| "exit code 1".to_string()),
            output: format!("{command}\n"),
            error_output: String::new(),
            start_time: now,
            end_time: now,
            duration_seconds: 0,
        }
    }
}

fn unit_name(dir: &Path) -> String {
    dir.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// A scratch plugins directory plus an output directory next to it.
pub struct Workspace {
    pub temp: TempDir,
}

impl Workspace {
    pub fn new() -> Self {
        let temp = TempDir::new().unwrap();
        fs::create_dir_all(temp.path().join("plugins")).unwrap();
        Self { temp }
    }

    pub fn plugins_dir(&self) -> PathBuf {
        self.temp.path().join("plugins")
    }

    pub fn output_dir(&self) -> PathBuf {
        self.temp.path().join("build")
    }

    /// Plugin with every required file and an optional interpreter requirement.
    pub fn plugin(&self, name: &str, php: Option<&str>) -> PathBuf {
        let dir = self.plugins_dir().join(name);
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join("package.json"), r#"{"name": "plugin"}"#).unwrap();
        let composer = match php {
            Some(req) => serde_json::json!({ "require": { "php": req } }),
            None => serde_json::json!({ "require": {} }),
        };
        fs::write(dir.join("composer.json"), composer.to_string()).unwrap();
        fs::write(dir.join("Gruntfile.js"), "module.exports = () => {};").unwrap();
        dir
    }

    /// Plugin missing one required file.
    pub fn plugin_without(&self, name: &str, file: &str) -> PathBuf {
        let dir = self.plugin(name, None);
        fs::remove_file(dir.join(file)).unwrap();
        dir
    }
}

impl Default for Workspace {
    fn default() -> Self {
        Self::new()
    }
}
