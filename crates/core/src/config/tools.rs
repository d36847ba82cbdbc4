use serde::{Deserialize, Serialize};

/// A tool probed before any build starts, and the command that proves it works.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolCheck {
    pub id: String,
    pub command: String,
}

impl ToolCheck {
    pub fn new(id: impl Into<String>, command: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            command: command.into(),
        }
    }
}

/// Tools every default build step relies on.
pub fn default_tools() -> Vec<ToolCheck> {
    vec![
        ToolCheck::new("composer", "composer --version"),
        ToolCheck::new("npm", "npm --version"),
        ToolCheck::new("grunt", "grunt --version"),
    ]
}

pub fn default_interpreter() -> ToolCheck {
    ToolCheck::new("php", "php -v")
}
