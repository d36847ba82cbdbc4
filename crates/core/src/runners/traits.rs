//! Core traits for step execution

use crate::types::StepOutcome;
use async_trait::async_trait;
use std::path::Path;

/// Runs a single build step to completion.
///
/// Implementations never fail: launch errors, nonzero exits and timeouts
/// are all reported through `StepOutcome::success` and `error_message`.
/// Retrying is left to the caller.
#[async_trait]
pub trait StepRunner: Send + Sync {
    async fn run(&self, command: &str, working_dir: &Path, description: &str) -> StepOutcome;
}
