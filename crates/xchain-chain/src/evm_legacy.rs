//! evm-legacy: EVM chains without EIP-1559.
//!
//! No new types: the registry entry builds the evm types with the legacy
//! fee mode and a lower default tip cap. The address builder is the one
//! registered for evm.

use xchain_core::config::ChainConfig;
use xchain_core::error::XChainError;
use xchain_core::protocol::Protocol;

use crate::address::AddressBuilder;
use crate::evm::{EvmTxBuilder, FeeMode};
use crate::registry::ProtocolRegistry;

/// Default tip cap for evm-legacy chains.
pub const DEFAULT_MAX_TIP_CAP_GWEI: u64 = 5;

/// The evm transaction builder configured for EIP-155 transactions.
#[must_use]
pub fn tx_builder(config: &ChainConfig) -> EvmTxBuilder {
    EvmTxBuilder::new(config)
        .with_fee_mode(FeeMode::Legacy)
        .with_default_max_tip_cap_gwei(DEFAULT_MAX_TIP_CAP_GWEI)
}

/// Resolve the evm address builder for an evm-legacy chain.
///
/// # Errors
///
/// Returns the registry error if evm has no address builder.
pub fn address_builder(
    config: &ChainConfig,
    registry: &ProtocolRegistry,
) -> Result<Box<dyn AddressBuilder>, XChainError> {
    let base = config.clone().with_protocol(Protocol::EVM);
    registry.resolve_address_builder(&base)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used)]

    use super::*;
    use crate::builder::TxBuilder;
    use crate::evm::{gwei_to_wei, EvmInput};
    use crate::input::{ChainInput, TxInput};
    use xchain_core::asset::NativeAsset;
    use xchain_core::types::{Address, TransferArgs};
    use xchain_core::U256;

    fn bnb() -> ChainConfig {
        ChainConfig::new(NativeAsset::Bnb).with_chain_id("56")
    }

    #[test]
    fn test_tx_builder_is_legacy() {
        let builder = tx_builder(&bnb());
        assert_eq!(builder.fee_mode(), FeeMode::Legacy);
        assert_eq!(builder.max_tip_cap(), gwei_to_wei(DEFAULT_MAX_TIP_CAP_GWEI));
    }

    #[test]
    fn test_transfer_below_tip_cap() {
        let builder = tx_builder(&bnb());
        let args = TransferArgs::new(
            Address::new("0x724435CC1B2821362c2CD425F2744Bd7347bf299"),
            Address::new("0x3ad57b83B2E3dC5648F32e98e386935A9B10bb9F"),
            U256::from(100u64),
        );
        let input = TxInput::new(ChainInput::Evm(EvmInput {
            gas_limit: 21_000,
            gas_tip_cap: gwei_to_wei(DEFAULT_MAX_TIP_CAP_GWEI - 1),
            ..EvmInput::default()
        }));
        let tx = builder.new_transfer(&args, &input).unwrap();
        // Untyped RLP list.
        assert!(tx.serialize().unwrap()[0] >= 0xc0);
        assert!(builder.new_native_transfer(&args, &input).is_ok());
    }

    #[test]
    fn test_address_builder_matches_evm() {
        let registry = ProtocolRegistry::new();
        let legacy = address_builder(&bnb(), &registry).unwrap();
        let key = hex::decode("0279be667ef9dcbbac55a06295ce870b07029bfcdb2dce28d959f2815b16f81798")
            .unwrap();
        assert_eq!(
            legacy.address_from_public_key(&key).unwrap().as_str(),
            "0x7E5F4552091A69125d5DfCb7b8C2659029395Bdf"
        );
    }

    #[test]
    fn test_address_builder_needs_evm_entry() {
        let registry = ProtocolRegistry::empty();
        assert_eq!(
            address_builder(&bnb(), &registry).unwrap_err().to_string(),
            "no address builder defined for: BNB"
        );
    }
}
