//! Chain state for bitcoin-family transfers.

use serde::{Deserialize, Serialize};

/// An unspent output owned by the sender.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Utxo {
    /// Funding transaction id, display (big-endian) hex.
    pub txid: String,
    /// Output index.
    pub vout: u32,
    /// Value in satoshis.
    pub value: u64,
}

impl Utxo {
    /// Create an unspent output.
    #[must_use]
    pub fn new(txid: impl Into<String>, vout: u32, value: u64) -> Self {
        Self {
            txid: txid.into(),
            vout,
            value,
        }
    }
}

/// Sender state fetched before building a transfer.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BtcInput {
    /// Spendable outputs of the sender.
    pub utxos: Vec<Utxo>,
    /// Fee rate in satoshis per virtual byte.
    pub fee_rate: u64,
    /// Sender public key, hex; placed in the unlocking script.
    pub from_public_key: String,
}
