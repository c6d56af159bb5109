pub mod error_tracker;
pub mod orchestrator;
