//! Reading the interpreter requirement out of a dependency manifest

use crate::types::VersionRequirement;
use serde_json::Value;
use std::path::Path;
use tracing::warn;

use super::version::normalize_requirement;

/// Parse a JSON manifest. Missing or malformed files yield `None`.
pub fn read_manifest(path: &Path) -> Option<Value> {
    let contents = std::fs::read_to_string(path).ok()?;
    match serde_json::from_str(&contents) {
        Ok(value) => Some(value),
        Err(e) => {
            warn!("Ignoring malformed manifest {}: {}", path.display(), e);
            None
        }
    }
}

/// Fields that may declare the interpreter requirement, highest priority first:
/// the direct requirement, the platform override and the nested platform config.
pub fn requirement_fields(interpreter: &str) -> [Vec<String>; 3] {
    [
        vec!["require".to_string(), interpreter.to_string()],
        vec!["platform".to_string(), interpreter.to_string()],
        vec![
            "config".to_string(),
            "platform".to_string(),
            interpreter.to_string(),
        ],
    ]
}

/// Locate and normalize the interpreter requirement; the first present field wins.
pub fn find_requirement(manifest: &Value, interpreter: &str) -> Option<VersionRequirement> {
    requirement_fields(interpreter).into_iter().find_map(|path| {
        let raw = path
            .iter()
            .try_fold(manifest, |value, key| value.get(key))?
            .as_str()?;

        Some(VersionRequirement {
            raw: raw.to_string(),
            source_field: path.join("."),
            minimum: normalize_requirement(raw),
        })
    })
}
