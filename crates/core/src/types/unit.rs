use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// One buildable plugin directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Unit {
    pub name: String,
    pub path: PathBuf,
}

impl Unit {
    /// Create a unit, rejecting names that do not carry the required prefix.
    pub fn new(name: impl Into<String>, path: impl Into<PathBuf>, prefix: &str) -> Result<Self> {
        let name = name.into();
        validate_unit_name(&name, prefix)?;
        Ok(Self {
            name,
            path: path.into(),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// A unit name must start with `prefix`, have something after it and be a
/// single path component.
pub fn validate_unit_name(name: &str, prefix: &str) -> Result<()> {
    let valid = name.starts_with(prefix)
        && name.len() > prefix.len()
        && !name.contains(['/', '\\'])
        && name != "."
        && name != "..";

    if valid {
        Ok(())
    } else {
        Err(Error::InvalidUnitName {
            name: name.to_string(),
            prefix: prefix.to_string(),
        })
    }
}
