//! Relay - command-line front-end
//!
//! Wires the file-backed storage, the reqwest transport and configuration
//! into the workbench and exposes it as a `clap` command tree.

pub mod cli;
pub mod commands;
pub mod logger;

pub use cli::Cli;
pub use commands::{execute, run};
