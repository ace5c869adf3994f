//! EVM transaction builder.
//!
//! The priority tip is capped at the chain's `max_tip_cap_gwei` (or the
//! builder default); the fee cap never drops below the tip.

use std::sync::Arc;

use alloy_primitives::{Bytes, U256};
use serde::{Deserialize, Serialize};
use xchain_core::config::ChainConfig;
use xchain_core::error::BuildError;
use xchain_core::types::TransferArgs;
use xchain_core::variant::Operation;

use super::address::parse_address;
use super::tx::{EvmTx, EvmTxFields, FeeMode};
use crate::builder::{check_input_kind, require_token, Tx, TxBuilder};
use crate::input::TxInput;

/// Default tip cap for EIP-1559 chains.
pub const DEFAULT_MAX_TIP_CAP_GWEI: u64 = 100;

/// Wei per gwei.
pub const GWEI: u128 = 1_000_000_000;

/// Largest chain id whose EIP-155 `v` (`35 + 2 * chain_id + parity`) fits
/// in a `u64`.
pub const MAX_EIP155_CHAIN_ID: u64 = (u64::MAX - 36) / 2;

/// `transfer(address,uint256)`.
pub const ERC20_TRANSFER_SELECTOR: [u8; 4] = [0xa9, 0x05, 0x9c, 0xbb];

/// Convert gwei to wei.
#[must_use]
pub const fn gwei_to_wei(gwei: u64) -> u128 {
    gwei as u128 * GWEI
}

/// Sender account and fee state.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EvmInput {
    /// Sender nonce.
    pub nonce: u64,
    /// Gas limit.
    pub gas_limit: u64,
    /// Max fee per gas in wei; the gas price on legacy chains.
    pub gas_fee_cap: u128,
    /// Priority fee per gas in wei.
    pub gas_tip_cap: u128,
    /// Chain id override; the configured chain id is used when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chain_id: Option<u64>,
}

/// Transaction builder for evm and evm-legacy chains.
#[derive(Debug, Clone)]
pub struct EvmTxBuilder {
    config: Arc<ChainConfig>,
    fee_mode: FeeMode,
    default_max_tip_cap_gwei: u64,
}

impl EvmTxBuilder {
    /// EIP-1559 builder for `config`.
    #[must_use]
    pub fn new(config: &ChainConfig) -> Self {
        Self {
            config: Arc::new(config.clone()),
            fee_mode: FeeMode::Eip1559,
            default_max_tip_cap_gwei: DEFAULT_MAX_TIP_CAP_GWEI,
        }
    }

    /// Use `fee_mode` on the wire.
    #[must_use]
    pub const fn with_fee_mode(mut self, fee_mode: FeeMode) -> Self {
        self.fee_mode = fee_mode;
        self
    }

    /// Tip cap used when the chain configures none.
    #[must_use]
    pub const fn with_default_max_tip_cap_gwei(mut self, gwei: u64) -> Self {
        self.default_max_tip_cap_gwei = gwei;
        self
    }

    /// Wire format in use.
    #[must_use]
    pub const fn fee_mode(&self) -> FeeMode {
        self.fee_mode
    }

    /// Effective tip cap in wei.
    #[must_use]
    pub fn max_tip_cap(&self) -> u128 {
        gwei_to_wei(
            self.config
                .max_tip_cap_gwei
                .unwrap_or(self.default_max_tip_cap_gwei),
        )
    }

    fn chain_id(&self, input: &EvmInput) -> Result<u64, BuildError> {
        let chain_id = match input.chain_id {
            Some(chain_id) => chain_id,
            None => self.config.chain_id.parse().map_err(|_| {
                BuildError::invalid_input(format!(
                    "{} has no numeric chain id ({:?})",
                    self.config.id(),
                    self.config.chain_id
                ))
            })?,
        };
        if self.fee_mode == FeeMode::Legacy && chain_id > MAX_EIP155_CHAIN_ID {
            return Err(BuildError::invalid_input(format!(
                "chain id {chain_id} is too large for an EIP-155 signature"
            )));
        }
        Ok(chain_id)
    }

    fn fees(&self, input: &EvmInput) -> (u128, u128) {
        let cap = self.max_tip_cap();
        let tip = if input.gas_tip_cap > cap {
            tracing::warn!(
                chain = self.config.id(),
                requested = input.gas_tip_cap,
                cap,
                "priority tip clamped to cap"
            );
            cap
        } else {
            input.gas_tip_cap
        };
        (input.gas_fee_cap.max(tip), tip)
    }

    fn build(
        &self,
        args: &TransferArgs,
        input: &TxInput,
        to: alloy_primitives::Address,
        value: U256,
        data: Bytes,
    ) -> Result<Box<dyn Tx>, BuildError> {
        check_input_kind(input, Operation::Transfer)?;
        let evm = input.as_evm()?;
        parse_address(args.from().as_str())?;
        if evm.gas_limit == 0 {
            return Err(BuildError::invalid_input("gas_limit must be set"));
        }
        let (max_fee_per_gas, max_priority_fee_per_gas) = self.fees(evm);
        let fields = EvmTxFields {
            fee_mode: self.fee_mode,
            chain_id: self.chain_id(evm)?,
            nonce: evm.nonce,
            gas_limit: evm.gas_limit,
            max_fee_per_gas,
            max_priority_fee_per_gas,
            to,
            value,
            data,
        };
        tracing::debug!(
            chain = self.config.id(),
            nonce = fields.nonce,
            fee_mode = ?fields.fee_mode,
            "built evm transaction"
        );
        Ok(Box::new(EvmTx::new(fields)))
    }
}

/// ABI calldata of `transfer(to, amount)`.
#[must_use]
pub fn erc20_transfer_data(to: alloy_primitives::Address, amount: U256) -> Bytes {
    let mut data = Vec::with_capacity(4 + 32 + 32);
    data.extend_from_slice(&ERC20_TRANSFER_SELECTOR);
    data.extend_from_slice(&[0u8; 12]);
    data.extend_from_slice(to.as_slice());
    data.extend_from_slice(&amount.to_be_bytes::<32>());
    Bytes::from(data)
}

impl TxBuilder for EvmTxBuilder {
    fn new_native_transfer(
        &self,
        args: &TransferArgs,
        input: &TxInput,
    ) -> Result<Box<dyn Tx>, BuildError> {
        let to = parse_address(args.to().as_str())?;
        self.build(args, input, to, args.amount(), Bytes::new())
    }

    fn new_token_transfer(
        &self,
        args: &TransferArgs,
        input: &TxInput,
    ) -> Result<Box<dyn Tx>, BuildError> {
        let token = require_token(args)?;
        let contract = parse_address(&token.contract)?;
        let to = parse_address(args.to().as_str())?;
        let data = erc20_transfer_data(to, args.amount());
        self.build(args, input, contract, U256::ZERO, data)
    }
}
