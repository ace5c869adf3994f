//! # CLI Argument Definitions
//!
//! - `xchain protocols`
//! - `xchain address --chain <SYMBOL> --public-key <HEX> [--all]`
//! - `xchain config [path|init]`
//!
//! ## Global Options
//!
//! - `-v, --verbose` - increase verbosity
//! - `--home <DIR>` - directory holding `chains.toml`
//! - `--log-format <FORMAT>` and `--log-file <PATH>`

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use xchain_core::asset::NativeAsset;
use xchain_core::error::ConfigError;

use crate::logging::LogFormat;

/// Cross-chain address derivation and transaction building.
#[derive(Debug, Parser)]
#[command(name = "xchain")]
#[command(author, version, about = "Cross-chain custody toolkit")]
#[command(propagate_version = true)]
#[command(arg_required_else_help = true)]
pub struct Cli {
    /// Increase verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Directory holding chains.toml (defaults to ~/.xchain)
    #[arg(long, global = true, value_name = "DIR")]
    pub home: Option<PathBuf>,

    /// Log line format
    #[arg(long, global = true, value_enum, default_value_t = LogFormat::Compact)]
    pub log_format: LogFormat,

    /// Also write logs to this file, rolled daily
    #[arg(long, global = true, value_name = "PATH")]
    pub log_file: Option<PathBuf>,

    /// The command to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Print every supported protocol with its signature algorithm and
    /// public key format
    Protocols,

    /// Derive the address of a public key on a chain
    ///
    /// The chain's entry in chains.toml is used when present, otherwise the
    /// built-in default entry.
    Address {
        /// Chain symbol, e.g. BTC, ATOM, ETH
        #[arg(long, value_name = "SYMBOL", value_parser = parse_chain)]
        chain: NativeAsset,

        /// Public key, hex (0x prefix optional)
        #[arg(long, value_name = "HEX")]
        public_key: String,

        /// List every address form instead of the preferred one
        #[arg(long)]
        all: bool,
    },

    /// Show, locate or create the chain configuration
    Config {
        /// Configuration action; shows the configuration when omitted
        #[command(subcommand)]
        action: Option<ConfigAction>,
    },
}

/// Configuration actions.
#[derive(Debug, Clone, Subcommand)]
pub enum ConfigAction {
    /// Print the configuration file path
    Path,

    /// Write the default configuration
    Init {
        /// Overwrite an existing file
        #[arg(short, long)]
        force: bool,
    },
}

/// Parse a chain symbol case-insensitively.
///
/// # Errors
///
/// Returns [`ConfigError::InvalidValue`] for an unknown symbol.
pub fn parse_chain(value: &str) -> Result<NativeAsset, ConfigError> {
    value.to_ascii_uppercase().parse()
}
