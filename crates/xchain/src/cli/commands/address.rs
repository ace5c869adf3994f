//! `xchain address`: derive the address of a public key.

use std::io::Write;

use xchain_chain::ProtocolRegistry;
use xchain_core::config::ChainConfig;

use super::CommandError;

/// Resolves the chain's address builder and prints the preferred address,
/// or every address form with its type.
#[derive(Debug, Clone)]
pub struct AddressCommand {
    /// Chain configuration to derive for.
    pub config: ChainConfig,
    /// Public key, hex with optional `0x`.
    pub public_key: String,
    /// Print every form.
    pub all: bool,
}

impl AddressCommand {
    /// Decode the public key argument.
    ///
    /// # Errors
    ///
    /// Returns [`CommandError::PublicKeyHex`] if it is not hex.
    pub fn public_key_bytes(&self) -> Result<Vec<u8>, CommandError> {
        let trimmed = self.public_key.trim();
        let hex_str = trimmed.strip_prefix("0x").unwrap_or(trimmed);
        hex::decode(hex_str).map_err(|e| CommandError::PublicKeyHex(e.to_string()))
    }

    /// Derive with `registry` and write to `out`.
    ///
    /// # Errors
    ///
    /// Returns [`CommandError`] if the key is malformed, the protocol has no
    /// address builder, derivation fails or writing fails.
    pub fn run(&self, registry: &ProtocolRegistry, out: &mut impl Write) -> Result<(), CommandError> {
        let public_key = self.public_key_bytes()?;
        let builder = registry.resolve_address_builder(&self.config)?;
        tracing::info!(
            chain = self.config.id(),
            protocol = %self.config.protocol,
            "deriving address"
        );

        if self.all {
            for possible in builder.all_possible_addresses_from_public_key(&public_key)? {
                writeln!(out, "{:<16} {}", possible.address_type, possible.address)?;
            }
        } else {
            writeln!(out, "{}", builder.address_from_public_key(&public_key)?)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used)]

    use super::*;
    use xchain_core::asset::NativeAsset;

    const KEY: &str = "0279be667ef9dcbbac55a06295ce870b07029bfcdb2dce28d959f2815b16f81798";

    fn run(config: ChainConfig, public_key: &str, all: bool) -> Result<String, CommandError> {
        let cmd = AddressCommand {
            config,
            public_key: public_key.to_string(),
            all,
        };
        let mut out = Vec::new();
        cmd.run(&ProtocolRegistry::new(), &mut out)?;
        Ok(String::from_utf8(out).unwrap())
    }

    #[test]
    fn test_preferred_address() {
        let out = run(ChainConfig::new(NativeAsset::Eth), &format!("0x{KEY}"), false).unwrap();
        assert_eq!(out, "0x7E5F4552091A69125d5DfCb7b8C2659029395Bdf\n");
    }

    #[test]
    fn test_all_forms() {
        let out = run(ChainConfig::new(NativeAsset::Btc), KEY, true).unwrap();
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].starts_with("segwit"));
        assert!(lines[0].ends_with("bc1qw508d6qejxtdg4y5r3zarvary0c5xw7kv8f3t4"));
        assert!(lines[1].starts_with("legacy"));
        assert!(lines[1].ends_with("1BgGZ9tcN4rm9KBzDn7KprQz87SZ26SAMH"));
    }

    #[test]
    fn test_bad_key() {
        let err = run(ChainConfig::new(NativeAsset::Eth), "zz", false).unwrap_err();
        assert!(matches!(err, CommandError::PublicKeyHex(_)));

        let err = run(ChainConfig::new(NativeAsset::Eth), "02ab", false).unwrap_err();
        assert!(matches!(err, CommandError::Address(_)));
    }

    #[test]
    fn test_unregistered_protocol() {
        let cmd = AddressCommand {
            config: ChainConfig::new(NativeAsset::Eth),
            public_key: KEY.to_string(),
            all: false,
        };
        let err = cmd.run(&ProtocolRegistry::empty(), &mut Vec::new()).unwrap_err();
        assert_eq!(err.to_string(), "no address builder defined for: ETH");
    }
}
