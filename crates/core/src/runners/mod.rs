//! Step execution: one external command in, one `StepOutcome` out

pub mod process_runner;
pub mod traits;

// Re-export main types
pub use process_runner::ProcessStepRunner;
pub use traits::StepRunner;
