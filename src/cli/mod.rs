//! Command-line surface: argument handling and the update workflow.

pub mod args;
pub mod orchestration;

pub use args::Args;
pub use orchestration::{run_update, UpdateArgs, UpdateReport};
