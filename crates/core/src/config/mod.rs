//! Configuration management for pluginforge

mod settings;
pub mod steps;
pub mod tools;

// Re-export main types
pub use settings::{BuildConfig, CONFIG_FILE_NAMES, RequiredFiles};
pub use steps::{StepPolicy, StepPolicyTable, StepSpec, default_steps};
pub use tools::{ToolCheck, default_interpreter, default_tools};
