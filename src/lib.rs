pub mod artifact;
pub mod build_check;
pub mod config;
pub mod digest;
pub mod error;
pub mod freshness;
pub mod orchestrator;
pub mod report;
pub mod sources;
pub mod stages;
pub mod structure;

pub use error::{DocguardError, Result};
