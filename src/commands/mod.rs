// src/commands/mod.rs
pub mod get_pods;
pub mod populate;
pub mod serve;
pub mod status;

pub use status::StatusReporter;
