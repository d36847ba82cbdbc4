//! Building one compatible unit: steps, failure policy and artifact relocation

pub mod artifact;
pub mod unit_builder;

pub use artifact::{find_artifact, relocate_artifact};
pub use unit_builder::UnitBuilder;
