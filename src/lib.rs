pub mod cli;
pub mod clock;
pub mod config;
pub mod debian_dir;
pub mod domain;
pub mod error;
pub mod ui;
pub mod warning;

pub use error::{Result, UpdateCommitError};
