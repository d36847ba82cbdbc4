//! Run-level sequencing: select units, validate them all, then build the compatible ones

pub mod pipeline;
pub mod selection;

pub use pipeline::Orchestrator;
pub use selection::{discover_units, resolve_units, select_units};
