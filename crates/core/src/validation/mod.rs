//! Prerequisite validation: tool probes, required files and interpreter constraints

pub mod manifest;
pub mod probe;
pub mod validator;
pub mod version;

pub use probe::{ShellToolProbe, ToolProbe};
pub use validator::PrerequisiteValidator;
pub use version::{Version, find_tool_version, normalize_requirement};
