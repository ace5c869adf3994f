//! Internal messages and their bodies.

use std::sync::Arc;

use xchain_core::error::BuildError;

use super::address::TonAddress;
use super::cell::{Cell, CellBuilder};

/// `transfer` op of the jetton wallet standard.
pub const JETTON_TRANSFER_OP: u32 = 0x0f8a_7ea5;

const COMMENT_OP: u32 = 0;

/// A text comment, continued in a chain of references when long.
///
/// # Errors
///
/// Returns [`BuildError::Encoding`] only on cell overflow.
pub fn comment_body(text: &str) -> Result<Cell, BuildError> {
    const FIRST_CHUNK: usize = 123;
    const NEXT_CHUNK: usize = 127;

    let bytes = text.as_bytes();
    let (head, rest) = bytes.split_at(bytes.len().min(FIRST_CHUNK));

    let mut tail: Option<Cell> = None;
    for chunk in rest.chunks(NEXT_CHUNK).rev() {
        let mut builder = CellBuilder::new();
        builder.store_bytes(chunk)?;
        if let Some(next) = tail.take() {
            builder.store_ref(Arc::new(next))?;
        }
        tail = Some(builder.build()?);
    }

    let mut builder = CellBuilder::new();
    builder.store_uint(u128::from(COMMENT_OP), 32)?.store_bytes(head)?;
    if let Some(next) = tail {
        builder.store_ref(Arc::new(next))?;
    }
    builder.build()
}

/// Jetton `transfer` request sent to the sender's jetton wallet.
#[derive(Debug, Clone)]
pub struct JettonTransfer {
    /// Request id echoed in notifications.
    pub query_id: u64,
    /// Jetton amount in base units.
    pub amount: u128,
    /// Owner of the receiving jetton wallet.
    pub destination: TonAddress,
    /// Where excess TON is returned.
    pub response_destination: TonAddress,
    /// TON forwarded to the destination with the notification.
    pub forward_ton_amount: u128,
    /// Optional forwarded payload, e.g. a comment.
    pub forward_payload: Option<Cell>,
}

impl JettonTransfer {
    /// Encode the message body.
    ///
    /// # Errors
    ///
    /// Returns [`BuildError::Encoding`] only on cell overflow.
    pub fn body(&self) -> Result<Cell, BuildError> {
        let mut builder = CellBuilder::new();
        builder
            .store_uint(u128::from(JETTON_TRANSFER_OP), 32)?
            .store_uint(u128::from(self.query_id), 64)?
            .store_coins(self.amount)?;
        self.destination.store(&mut builder)?;
        self.response_destination.store(&mut builder)?;
        // no custom payload
        builder.store_bit(false)?.store_coins(self.forward_ton_amount)?;
        match &self.forward_payload {
            Some(payload) => {
                builder.store_bit(true)?.store_ref(Arc::new(payload.clone()))?;
            }
            None => {
                builder.store_bit(false)?;
            }
        }
        builder.build()
    }
}

/// Internal message carrying `value` nanotons and an optional body.
///
/// # Errors
///
/// Returns [`BuildError::Encoding`] only on cell overflow.
pub fn internal_message(
    destination: &TonAddress,
    bounce: bool,
    value: u128,
    body: Option<Cell>,
) -> Result<Cell, BuildError> {
    let mut builder = CellBuilder::new();
    // int_msg_info$0 ihr_disabled bounce bounced=0, src addr_none$00
    builder
        .store_bit(false)?
        .store_bit(true)?
        .store_bit(bounce)?
        .store_bit(false)?
        .store_uint(0b00, 2)?;
    destination.store(&mut builder)?;
    // value, empty extra currencies, ihr_fee, fwd_fee, created_lt, created_at
    builder
        .store_coins(value)?
        .store_bit(false)?
        .store_coins(0)?
        .store_coins(0)?
        .store_uint(0, 64)?
        .store_uint(0, 32)?;
    // no state init
    builder.store_bit(false)?;
    match body {
        Some(body) => {
            builder.store_bit(true)?.store_ref(Arc::new(body))?;
        }
        None => {
            builder.store_bit(false)?;
        }
    }
    builder.build()
}
