//! # xchain
//!
//! Command-line front end for the xchain cross-chain custody layer.
//!
//! The library half exposes the CLI definitions and command handlers so they
//! can be driven from tests, plus the logging setup shared by the binary.
//!
//! ## Modules
//!
//! - [`cli`] - Argument parsing and command handlers
//! - [`logging`] - `tracing` subscriber initialisation
//!
//! ## Usage
//!
//! ```no_run
//! use clap::Parser;
//! use xchain::cli::Cli;
//!
//! let cli = Cli::parse();
//! println!("verbosity: {}", cli.verbose);
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod cli;
pub mod logging;

pub use logging::{init_logging, verbosity_to_level, LogConfig, LogError, LogFormat, LogGuard, LogLevel};
