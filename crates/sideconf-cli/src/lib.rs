//! # sideconf-cli
//!
//! Command-line interface for sideconf config files.
//!
//! ## Commands
//!
//! - `sideconf check`: Load the demo configs and print what was read
//! - `sideconf defaults`: Print the default file contents for a role
//! - `sideconf watch`: Like `check`, then hot-reload until Ctrl-C

pub mod commands;
pub mod demo;

pub use commands::Cli;
