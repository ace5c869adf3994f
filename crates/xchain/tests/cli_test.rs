//! Command-line tests: parse real argument vectors and run the handlers
//! against a temporary `--home`.

#![allow(clippy::expect_used, clippy::unwrap_used, clippy::panic)]

use std::path::Path;

use clap::Parser;
use tempfile::TempDir;
use xchain::cli::commands::{
    chain_config, config_loader, AddressCommand, CommandError, ConfigCommand, ProtocolsCommand,
};
use xchain::cli::{Cli, Commands};
use xchain_chain::ProtocolRegistry;

/// Compressed public key of secret key 1.
const PUBKEY_ONE: &str = "0279be667ef9dcbbac55a06295ce870b07029bfcdb2dce28d959f2815b16f81798";

fn run(args: &[&str], home: &Path) -> Result<String, CommandError> {
    let home = home.to_str().unwrap();
    let mut argv = vec!["xchain", "--home", home];
    argv.extend_from_slice(args);
    let cli = Cli::try_parse_from(argv).expect("should parse");

    let mut out = Vec::new();
    match cli.command {
        Commands::Protocols => ProtocolsCommand::new().run(&mut out)?,
        Commands::Address {
            chain,
            public_key,
            all,
        } => {
            let loader = config_loader(cli.home)?;
            AddressCommand {
                config: chain_config(&loader, chain)?,
                public_key,
                all,
            }
            .run(&ProtocolRegistry::new(), &mut out)?;
        }
        Commands::Config { action } => {
            ConfigCommand::new(config_loader(cli.home)?, action).run(&mut out)?;
        }
    }
    Ok(String::from_utf8(out).unwrap())
}

#[test]
fn test_protocols_lists_every_protocol() {
    let home = TempDir::new().unwrap();
    let out = run(&["protocols"], home.path()).unwrap();
    for protocol in [
        "btc", "btc-cash", "btc-legacy", "cosmos", "evm", "evm-legacy", "evmos", "solana",
        "ton", "tron",
    ] {
        assert!(
            out.lines().any(|line| line.split_whitespace().next() == Some(protocol)),
            "{protocol} missing from:\n{out}"
        );
    }
}

#[test]
fn test_address_uses_built_in_defaults() {
    let home = TempDir::new().unwrap();
    let out = run(
        &["address", "--chain", "atom", "--public-key", PUBKEY_ONE],
        home.path(),
    )
    .unwrap();
    assert_eq!(out.trim(), "cosmos1w508d6qejxtdg4y5r3zarvary0c5xw7k6ah60c");
}

#[test]
fn test_address_follows_configured_prefix() {
    let home = TempDir::new().unwrap();
    run(&["config", "init"], home.path()).unwrap();

    let path = home.path().join("chains.toml");
    let text = std::fs::read_to_string(&path).unwrap();
    std::fs::write(
        &path,
        text.replace("chain_prefix = \"cosmos\"", "chain_prefix = \"cosmostest\""),
    )
    .unwrap();

    let out = run(
        &["address", "--chain", "ATOM", "--public-key", PUBKEY_ONE],
        home.path(),
    )
    .unwrap();
    assert!(out.trim().starts_with("cosmostest1"), "{out}");
}

#[test]
fn test_address_all_for_bitcoin() {
    let home = TempDir::new().unwrap();
    let out = run(
        &["address", "--chain", "BTC", "--public-key", PUBKEY_ONE, "--all"],
        home.path(),
    )
    .unwrap();
    let lines: Vec<&str> = out.lines().collect();
    assert_eq!(lines.len(), 2);
    assert!(lines[0].ends_with("bc1qw508d6qejxtdg4y5r3zarvary0c5xw7kv8f3t4"));
    assert!(lines[1].ends_with("1BgGZ9tcN4rm9KBzDn7KprQz87SZ26SAMH"));
}

#[test]
fn test_address_rejects_wrong_key_type() {
    let home = TempDir::new().unwrap();
    // 32-byte key where a secp256k1 point is expected.
    let err = run(
        &["address", "--chain", "ETH", "--public-key", &"11".repeat(32)],
        home.path(),
    )
    .unwrap_err();
    assert!(matches!(err, CommandError::Address(_)), "{err}");
}

#[test]
fn test_unknown_chain_is_a_parse_error() {
    let err = Cli::try_parse_from(["xchain", "address", "--chain", "NOPE", "--public-key", "00"])
        .unwrap_err();
    assert_eq!(err.kind(), clap::error::ErrorKind::ValueValidation);
}

#[test]
fn test_config_init_and_path() {
    let home = TempDir::new().unwrap();
    let path = run(&["config", "path"], home.path()).unwrap();
    assert_eq!(
        path.trim(),
        home.path().join("chains.toml").display().to_string()
    );

    run(&["config", "init"], home.path()).unwrap();
    let err = run(&["config", "init"], home.path()).unwrap_err();
    assert!(err.to_string().contains("--force"));
    run(&["config", "init", "--force"], home.path()).unwrap();

    let shown = run(&["config"], home.path()).unwrap();
    assert!(shown.contains("protocol = \"ton\""));
}
