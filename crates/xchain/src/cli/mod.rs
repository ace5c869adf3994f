//! # CLI
//!
//! Command-line interface for xchain.
//!
//! - [`args`] - clap definitions
//! - [`commands`] - command handlers
//!
//! ## Commands
//!
//! - `xchain protocols` - print the capability matrix
//! - `xchain address --chain <SYMBOL> --public-key <HEX> [--all]` - derive addresses
//! - `xchain config [path|init [--force]]` - show, locate or create `chains.toml`

pub mod args;
pub mod commands;

pub use args::{Cli, Commands, ConfigAction};
