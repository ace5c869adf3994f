//! # xchain
//!
//! Cross-chain address derivation and chain configuration from the command
//! line.
//!
//! ## Usage
//!
//! ```bash
//! # List protocols with their signature algorithm and key format
//! xchain protocols
//!
//! # Derive an address
//! xchain address --chain ETH --public-key 0x04...
//!
//! # Every address form of a bitcoin key
//! xchain address --chain BTC --public-key 02... --all
//!
//! # Write ~/.xchain/chains.toml
//! xchain config init
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

use std::io::Write;
use std::path::PathBuf;

use clap::Parser;
use xchain::cli::commands::exit_codes::{EXIT_ERROR, EXIT_SUCCESS};
use xchain::cli::commands::{
    chain_config, config_loader, AddressCommand, CommandError, ConfigCommand, ProtocolsCommand,
};
use xchain::cli::{Cli, Commands};
use xchain::logging::{init_logging, verbosity_to_level, LogConfig, LogError, LogFormat, LogGuard};
use xchain_chain::ProtocolRegistry;

/// Set up logging from the global flags.
///
/// # Errors
///
/// Returns [`LogError`] if logging initialization fails.
fn setup_logging(
    verbose: u8,
    format: LogFormat,
    file_path: Option<PathBuf>,
) -> Result<LogGuard, LogError> {
    let config = LogConfig {
        level: verbosity_to_level(verbose),
        format,
        file_path,
    };
    init_logging(&config)
}

fn run(cli: Cli, out: &mut impl Write) -> Result<(), CommandError> {
    match cli.command {
        Commands::Protocols => ProtocolsCommand::new().run(out),
        Commands::Address {
            chain,
            public_key,
            all,
        } => {
            let loader = config_loader(cli.home)?;
            let cmd = AddressCommand {
                config: chain_config(&loader, chain)?,
                public_key,
                all,
            };
            cmd.run(&ProtocolRegistry::new(), out)
        }
        Commands::Config { action } => {
            let cmd = ConfigCommand::new(config_loader(cli.home)?, action);
            cmd.run(out)
        }
    }
}

/// Main entry point for the `xchain` binary.
fn main() {
    let cli = Cli::parse();

    let guard = match setup_logging(cli.verbose, cli.log_format, cli.log_file.clone()) {
        Ok(guard) => guard,
        Err(e) => {
            eprintln!("Failed to initialize logging: {e}");
            std::process::exit(EXIT_ERROR);
        }
    };

    let code = match run(cli, &mut std::io::stdout().lock()) {
        Ok(()) => EXIT_SUCCESS,
        Err(e) => {
            tracing::debug!(error = ?e, "command failed");
            eprintln!("Error: {e}");
            EXIT_ERROR
        }
    };

    // Flush the file writer before exiting.
    drop(guard);
    std::process::exit(code);
}
