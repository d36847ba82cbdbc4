pub mod outcome;
pub mod report;
pub mod unit;

// Re-export commonly used types
pub use outcome::{StepOutcome, UnitBuildOutcome};
pub use report::{
    BuildResults, BuildTotals, GlobalToolStatus, RunReport, ToolStatus, UnitCompatibility,
    ValidationReport, VersionRequirement,
};
pub use unit::Unit;
