pub mod cli;
pub mod config;
pub mod deploy;
pub mod domain;
pub mod error;
pub mod exec;
pub mod git;
pub mod runner;
pub mod ui;
pub mod warning;

pub use error::{DeployError, Result};
