//! Bitcoin-family transaction builder.
//!
//! Outputs are selected largest first until they cover the amount plus the
//! fee at the input's fee rate. Change below the dust limit is left to the
//! miner.

use std::str::FromStr;
use std::sync::Arc;

use bitcoin::absolute::LockTime;
use bitcoin::hashes::{hash160, Hash};
use bitcoin::transaction::Version;
use bitcoin::{Amount, OutPoint, ScriptBuf, Sequence, Transaction, TxIn, TxOut, Txid, Witness};
use xchain_core::config::ChainConfig;
use xchain_core::error::{BuildError, ConfigError};
use xchain_core::types::TransferArgs;
use xchain_core::variant::Operation;

use super::address::{AddressCodec, BtcAddressBuilder};
use super::input::{BtcInput, Utxo};
use super::params::ChainParams;
use super::tx::{BtcTx, SpendKind};
use crate::builder::{amount_u64, check_input_kind, Tx, TxBuilder};
use crate::input::TxInput;

/// Outputs below this value are not created.
pub const DUST_LIMIT: u64 = 546;

const TX_OVERHEAD_VBYTES: u64 = 10;
const LEGACY_INPUT_VBYTES: u64 = 148;
const SEGWIT_INPUT_VBYTES: u64 = 68;

/// Transaction builder for btc and btc-legacy chains.
#[derive(Debug, Clone)]
pub struct BtcTxBuilder {
    config: Arc<ChainConfig>,
    addresses: BtcAddressBuilder,
}

impl BtcTxBuilder {
    /// Builder for `config`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidValue`] if the chain is not a
    /// bitcoin-family chain.
    pub fn new(config: &ChainConfig) -> Result<Self, ConfigError> {
        Ok(Self {
            config: Arc::new(config.clone()),
            addresses: BtcAddressBuilder::new(config)?,
        })
    }

    /// Replace the codec used to decode sender and recipient addresses.
    #[must_use]
    pub fn with_codec(mut self, codec: Arc<dyn AddressCodec>) -> Self {
        self.addresses = self.addresses.with_codec(codec);
        self
    }

    /// Chain parameters.
    #[must_use]
    pub const fn params(&self) -> &ChainParams {
        self.addresses.params()
    }

    fn spend_kind(&self, from: &ScriptBuf) -> Result<SpendKind, BuildError> {
        if from.is_p2pkh() {
            Ok(SpendKind::Legacy)
        } else if from.is_p2wpkh() {
            Ok(SpendKind::SegWit)
        } else {
            Err(BuildError::unsupported(
                "spending from a script-hash address",
                self.config.id(),
            ))
        }
    }

    fn sender_key(input: &BtcInput, from: &ScriptBuf) -> Result<Vec<u8>, BuildError> {
        let key = hex::decode(input.from_public_key.trim_start_matches("0x"))
            .map_err(|e| BuildError::invalid_input(format!("from_public_key: {e}")))?;
        let hash = hash160::Hash::hash(&key).to_byte_array();
        // P2PKH scripts carry the hash at 3..23, P2WPKH at 2..22.
        let expected = if from.is_p2pkh() {
            from.as_bytes().get(3..23)
        } else {
            from.as_bytes().get(2..22)
        };
        if expected == Some(hash.as_slice()) {
            Ok(key)
        } else {
            Err(BuildError::invalid_input(
                "from_public_key does not match the sender address",
            ))
        }
    }
}

/// Virtual size estimate of a transaction.
fn estimate_vbytes(spend: SpendKind, inputs: usize, outputs: &[&ScriptBuf]) -> u64 {
    let per_input = match spend {
        SpendKind::Legacy => LEGACY_INPUT_VBYTES,
        SpendKind::SegWit => SEGWIT_INPUT_VBYTES,
    };
    // value (8) + script length (1) + script
    let output_vbytes: u64 = outputs.iter().map(|s| 9 + s.len() as u64).sum();
    TX_OVERHEAD_VBYTES + per_input * inputs as u64 + output_vbytes
}

#[derive(Debug)]
struct Selection {
    utxos: Vec<Utxo>,
    change: Option<u64>,
}

/// `fee_rate` times the estimated size, rejecting overflow.
fn estimate_fee(
    fee_rate: u64,
    spend: SpendKind,
    inputs: usize,
    outputs: &[&ScriptBuf],
) -> Result<u64, BuildError> {
    fee_rate
        .checked_mul(estimate_vbytes(spend, inputs, outputs))
        .ok_or_else(|| BuildError::invalid_input(format!("fee rate {fee_rate} overflows the fee")))
}

/// `amount + fee`, rejecting overflow.
fn amount_with_fee(amount: u64, fee: u64) -> Result<u64, BuildError> {
    amount
        .checked_add(fee)
        .ok_or_else(|| BuildError::invalid_input(format!("amount {amount} plus fee {fee} overflows")))
}

fn select_utxos(
    utxos: &[Utxo],
    amount: u64,
    fee_rate: u64,
    spend: SpendKind,
    to: &ScriptBuf,
    change_script: &ScriptBuf,
) -> Result<Selection, BuildError> {
    let mut sorted = utxos.to_vec();
    sorted.sort_by(|a, b| b.value.cmp(&a.value));

    let mut selected = Vec::new();
    let mut total: u64 = 0;
    for utxo in sorted {
        total = total
            .checked_add(utxo.value)
            .ok_or_else(|| BuildError::invalid_input("utxo values overflow"))?;
        selected.push(utxo);

        let fee_with_change =
            estimate_fee(fee_rate, spend, selected.len(), &[to, change_script])?;
        if let Some(change) = total.checked_sub(amount_with_fee(amount, fee_with_change)?) {
            if change >= DUST_LIMIT {
                return Ok(Selection {
                    utxos: selected,
                    change: Some(change),
                });
            }
        }

        let fee = estimate_fee(fee_rate, spend, selected.len(), &[to])?;
        if let Some(dust) = total.checked_sub(amount_with_fee(amount, fee)?) {
            if dust > 0 {
                tracing::warn!(dust, "change below dust limit added to fee");
            }
            return Ok(Selection {
                utxos: selected,
                change: None,
            });
        }
    }

    let fee = estimate_fee(fee_rate, spend, selected.len().max(1), &[to])?;
    Err(BuildError::insufficient_funds(amount_with_fee(amount, fee)?, total))
}

impl TxBuilder for BtcTxBuilder {
    fn new_native_transfer(
        &self,
        args: &TransferArgs,
        input: &TxInput,
    ) -> Result<Box<dyn Tx>, BuildError> {
        check_input_kind(input, Operation::Transfer)?;
        let btc = input.as_btc()?;

        let amount = amount_u64(args.amount())?;
        if amount < DUST_LIMIT {
            return Err(BuildError::invalid_input(format!(
                "amount {amount} is below the dust limit {DUST_LIMIT}"
            )));
        }

        let from = self.addresses.decode(args.from().as_str())?;
        let to = self.addresses.decode(args.to().as_str())?;
        let spend = self.spend_kind(&from)?;
        let public_key = Self::sender_key(btc, &from)?;

        let selection = select_utxos(&btc.utxos, amount, btc.fee_rate, spend, &to, &from)?;

        let mut tx_inputs = Vec::with_capacity(selection.utxos.len());
        let mut prevouts = Vec::with_capacity(selection.utxos.len());
        for utxo in &selection.utxos {
            let txid = Txid::from_str(&utxo.txid)
                .map_err(|e| BuildError::invalid_input(format!("utxo txid {}: {e}", utxo.txid)))?;
            tx_inputs.push(TxIn {
                previous_output: OutPoint::new(txid, utxo.vout),
                script_sig: ScriptBuf::new(),
                sequence: Sequence::MAX,
                witness: Witness::new(),
            });
            prevouts.push(TxOut {
                value: Amount::from_sat(utxo.value),
                script_pubkey: from.clone(),
            });
        }

        let mut outputs = vec![TxOut {
            value: Amount::from_sat(amount),
            script_pubkey: to,
        }];
        if let Some(change) = selection.change {
            outputs.push(TxOut {
                value: Amount::from_sat(change),
                script_pubkey: from,
            });
        }

        let transaction = Transaction {
            version: Version::TWO,
            lock_time: LockTime::ZERO,
            input: tx_inputs,
            output: outputs,
        };

        tracing::debug!(
            chain = self.config.id(),
            inputs = transaction.input.len(),
            outputs = transaction.output.len(),
            "built bitcoin transfer"
        );

        Ok(Box::new(BtcTx::new(
            transaction,
            prevouts,
            spend,
            self.params().fork_id,
            public_key,
        )))
    }

    fn new_token_transfer(
        &self,
        _args: &TransferArgs,
        _input: &TxInput,
    ) -> Result<Box<dyn Tx>, BuildError> {
        Err(BuildError::unsupported("token transfer", self.config.id()))
    }
}
