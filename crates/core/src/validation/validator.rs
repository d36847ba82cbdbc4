use super::manifest::{find_requirement, read_manifest};
use super::probe::ToolProbe;
use super::version::{Version, find_tool_version};
use crate::config::{BuildConfig, RequiredFiles, ToolCheck};
use crate::types::{GlobalToolStatus, ToolStatus, Unit, UnitCompatibility, ValidationReport};
use indexmap::IndexMap;
use tracing::{debug, info, warn};

/// Decides, without touching any build target, which units can be built.
pub struct PrerequisiteValidator<'a> {
    probe: &'a dyn ToolProbe,
    tools: Vec<ToolCheck>,
    interpreter: ToolCheck,
    required_files: RequiredFiles,
}

impl<'a> PrerequisiteValidator<'a> {
    pub fn new(config: &BuildConfig, probe: &'a dyn ToolProbe) -> Self {
        Self {
            probe,
            tools: config.tool_checks(),
            interpreter: config.interpreter.clone(),
            required_files: config.required_files.clone(),
        }
    }

    /// Run every probe once.
    pub async fn probe_tools(&self) -> GlobalToolStatus {
        let mut status = GlobalToolStatus::default();

        for tool in &self.tools {
            let output = self.probe.probe(&tool.command).await;
            let tool_status = ToolStatus {
                available: output.is_some(),
                version: output.as_deref().and_then(find_tool_version),
            };
            if tool_status.available {
                debug!(tool = %tool.id, version = ?tool_status.version, "Tool available");
            } else {
                warn!(tool = %tool.id, "Tool not available: {}", tool.command);
            }
            status.tools.insert(tool.id.clone(), tool_status);
        }

        let interpreter_version = self
            .probe
            .probe(&self.interpreter.command)
            .await
            .as_deref()
            .and_then(Version::find_in);
        match interpreter_version {
            Some(version) => debug!(interpreter = %self.interpreter.id, %version, "Interpreter detected"),
            None => warn!(interpreter = %self.interpreter.id, "Interpreter version not detected"),
        }

        status.tools.insert(
            self.interpreter.id.clone(),
            ToolStatus {
                available: interpreter_version.is_some(),
                version: interpreter_version.map(|v| v.to_string()),
            },
        );
        status.interpreter_version = interpreter_version;
        status
    }

    /// Compatibility verdict for one unit against already probed tools.
    pub fn check_unit(&self, unit: &Unit, global: &GlobalToolStatus) -> UnitCompatibility {
        let mut reasons = Vec::new();

        let required_files: IndexMap<String, bool> = self
            .required_files
            .names()
            .iter()
            .map(|name| (name.to_string(), unit.path.join(name).is_file()))
            .collect();
        for (name, present) in &required_files {
            if !present {
                reasons.push(format!("missing {name}"));
            }
        }

        let manifest_path = unit.path.join(&self.required_files.dependency_manifest);
        let version_requirement = read_manifest(&manifest_path)
            .and_then(|manifest| find_requirement(&manifest, &self.interpreter.id));

        let version_satisfied = match &version_requirement {
            None => true,
            Some(requirement) => match (&requirement.minimum, &global.interpreter_version) {
                (Some(minimum), Some(detected)) => {
                    let satisfied = detected.satisfies(minimum);
                    if !satisfied {
                        reasons.push(format!(
                            "requires {} >= {} ({}: {}), found {}",
                            self.interpreter.id,
                            minimum,
                            requirement.source_field,
                            requirement.raw,
                            detected
                        ));
                    }
                    satisfied
                }
                (None, _) => {
                    reasons.push(format!(
                        "cannot read {} requirement '{}' in {}",
                        self.interpreter.id, requirement.raw, requirement.source_field
                    ));
                    false
                }
                // Reported once below as an undetected interpreter.
                (Some(_), None) => false,
            },
        };

        for tool in global.missing_tools() {
            if tool == self.interpreter.id {
                reasons.push(format!("{tool} version not detected"));
            } else {
                reasons.push(format!("tool unavailable: {tool}"));
            }
        }

        let is_compatible = required_files.values().all(|present| *present)
            && version_satisfied
            && global.all_available()
            && global.interpreter_version.is_some();

        UnitCompatibility {
            required_files,
            version_requirement,
            version_satisfied,
            is_compatible,
            reasons,
        }
    }

    /// Probe tools, then check every unit in order.
    pub async fn validate(&self, units: &[Unit]) -> ValidationReport {
        info!("Validating {} unit(s)", units.len());
        let global = self.probe_tools().await;

        let mut report = ValidationReport {
            global,
            ..Default::default()
        };

        for unit in units {
            let compatibility = self.check_unit(unit, &report.global);
            if compatibility.is_compatible {
                debug!(unit = %unit.name, "Compatible");
            } else {
                info!(unit = %unit.name, reasons = ?compatibility.reasons, "Incompatible");
                report.incompatible.push(unit.name.clone());
            }
            report.units.insert(unit.name.clone(), compatibility);
        }

        report
    }
}
