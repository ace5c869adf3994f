//! Address and signing parameters of the bitcoin-family chains.

use xchain_core::asset::NativeAsset;
use xchain_core::config::{ChainConfig, Network};
use xchain_core::error::ConfigError;
use xchain_core::protocol::Protocol;

/// BCH sighash fork id.
pub const BCH_FORK_ID: u32 = 0;

/// Per-chain encoding parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChainParams {
    /// Base58 version byte of pay-to-pubkey-hash addresses.
    pub pubkey_hash_prefix: u8,
    /// Base58 version byte of pay-to-script-hash addresses.
    pub script_hash_prefix: u8,
    /// Bech32 HRP of native segwit addresses; `None` disables segwit.
    pub segwit_hrp: Option<String>,
    /// CashAddr prefix.
    pub cash_prefix: String,
    /// Replay-protection fork id mixed into the sighash type.
    pub fork_id: Option<u32>,
}

impl ChainParams {
    /// Parameters for `config`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidValue`] if the chain is not a
    /// bitcoin-family chain.
    pub fn from_config(config: &ChainConfig) -> Result<Self, ConfigError> {
        let testnet = config.network == Network::Testnet;
        let (pubkey_hash_prefix, script_hash_prefix) = match (config.chain, testnet) {
            (NativeAsset::Btc | NativeAsset::Bch, false) => (0x00, 0x05),
            (NativeAsset::Btc | NativeAsset::Bch, true) => (0x6f, 0xc4),
            (NativeAsset::Doge, false) => (0x1e, 0x16),
            (NativeAsset::Doge, true) => (0x71, 0xc4),
            (NativeAsset::Ltc, false) => (0x30, 0x32),
            (NativeAsset::Ltc, true) => (0x6f, 0x3a),
            (other, _) => {
                return Err(ConfigError::invalid_value(
                    "chain",
                    format!("{other} is not a bitcoin-family chain"),
                ))
            }
        };

        let segwit_hrp = (config.protocol == Protocol::BTC && config.chain == NativeAsset::Btc)
            .then(|| (if testnet { "tb" } else { "bc" }).to_string());

        let cash_prefix = if config.chain_prefix.is_empty() {
            let prefix = if testnet { "bchtest" } else { "bitcoincash" };
            prefix.to_string()
        } else {
            config.chain_prefix.clone()
        };

        let fork_id = (config.protocol == Protocol::BTC_CASH).then_some(BCH_FORK_ID);

        Ok(Self {
            pubkey_hash_prefix,
            script_hash_prefix,
            segwit_hrp,
            cash_prefix,
            fork_id,
        })
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;

    #[test]
    fn test_btc_mainnet_has_segwit() {
        let params = ChainParams::from_config(&ChainConfig::new(NativeAsset::Btc)).unwrap();
        assert_eq!(params.pubkey_hash_prefix, 0x00);
        assert_eq!(params.segwit_hrp.as_deref(), Some("bc"));
        assert_eq!(params.fork_id, None);
    }

    #[test]
    fn test_legacy_chains_have_no_segwit() {
        let doge = ChainParams::from_config(&ChainConfig::new(NativeAsset::Doge)).unwrap();
        assert_eq!(doge.pubkey_hash_prefix, 0x1e);
        assert!(doge.segwit_hrp.is_none());

        let ltc = ChainParams::from_config(
            &ChainConfig::new(NativeAsset::Ltc).with_network(Network::Testnet),
        )
        .unwrap();
        assert_eq!(ltc.script_hash_prefix, 0x3a);
    }

    #[test]
    fn test_bch_has_fork_id_and_cash_prefix() {
        let params = ChainParams::from_config(&ChainConfig::new(NativeAsset::Bch)).unwrap();
        assert_eq!(params.fork_id, Some(BCH_FORK_ID));
        assert_eq!(params.cash_prefix, "bitcoincash");
        assert!(params.segwit_hrp.is_none());
    }

    #[test]
    fn test_non_bitcoin_chain_is_rejected() {
        let config = ChainConfig::new(NativeAsset::Eth).with_protocol(Protocol::BTC);
        assert!(ChainParams::from_config(&config).is_err());
    }
}
