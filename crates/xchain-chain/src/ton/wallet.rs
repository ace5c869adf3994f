//! Wallet v4r2 state and message layout.
//!
//! The contract code is referenced by its representation hash and depth
//! only: addresses can be derived, deployment messages cannot be built.

use std::sync::Arc;

use xchain_core::error::BuildError;

use super::address::TonAddress;
use super::cell::{Cell, CellBuilder};

/// Representation hash of the wallet v4r2 code cell.
pub const WALLET_V4R2_CODE_HASH: [u8; 32] = [
    0xfe, 0xb5, 0xff, 0x68, 0x20, 0xe2, 0xff, 0x0d, 0x94, 0x83, 0xe7, 0xe0, 0xd6, 0x2c, 0x81, 0x7d,
    0x84, 0x67, 0x89, 0xfb, 0x4a, 0xe5, 0x80, 0xc8, 0x78, 0x86, 0x6d, 0x95, 0x9d, 0xab, 0xd5, 0xc0,
];

/// Depth of the wallet v4r2 code cell.
pub const WALLET_V4R2_CODE_DEPTH: u16 = 7;

/// Subwallet id of the basechain; other workchains add their id.
pub const DEFAULT_WALLET_ID: u32 = 698_983_191;

/// Send mode: pay forwarding fees from the wallet balance and ignore
/// action errors.
pub const SEND_MODE_DEFAULT: u8 = 3;

const OP_SIMPLE_SEND: u8 = 0;

/// Initial persistent data: seqno, wallet id, public key, empty plugin
/// dictionary.
///
/// # Errors
///
/// Returns [`BuildError::Encoding`] only on cell overflow.
pub fn wallet_data(public_key: &[u8; 32], wallet_id: u32) -> Result<Cell, BuildError> {
    let mut builder = CellBuilder::new();
    builder
        .store_uint(0, 32)?
        .store_uint(u128::from(wallet_id), 32)?
        .store_bytes(public_key)?
        .store_bit(false)?;
    builder.build()
}

/// `StateInit` with code and data.
///
/// # Errors
///
/// Returns [`BuildError::Encoding`] only on cell overflow.
pub fn wallet_state_init(public_key: &[u8; 32], wallet_id: u32) -> Result<Cell, BuildError> {
    let code = Cell::opaque(WALLET_V4R2_CODE_HASH, WALLET_V4R2_CODE_DEPTH);
    let data = wallet_data(public_key, wallet_id)?;
    let mut builder = CellBuilder::new();
    // split_depth, special: absent; code, data: present; library: empty
    builder
        .store_bit(false)?
        .store_bit(false)?
        .store_bit(true)?
        .store_bit(true)?
        .store_bit(false)?
        .store_ref(Arc::new(code))?
        .store_ref(Arc::new(data))?;
    builder.build()
}

/// The body the wallet owner signs.
///
/// # Errors
///
/// Returns [`BuildError::Encoding`] if more than four messages are given.
pub fn signing_body(
    wallet_id: u32,
    valid_until: u32,
    seqno: u32,
    messages: &[(u8, Arc<Cell>)],
) -> Result<Cell, BuildError> {
    let mut builder = CellBuilder::new();
    builder
        .store_uint(u128::from(wallet_id), 32)?
        .store_uint(u128::from(valid_until), 32)?
        .store_uint(u128::from(seqno), 32)?
        .store_uint(u128::from(OP_SIMPLE_SEND), 8)?;
    for (mode, message) in messages {
        builder
            .store_uint(u128::from(*mode), 8)?
            .store_ref(Arc::clone(message))?;
    }
    builder.build()
}

/// `signature || body`.
///
/// # Errors
///
/// Returns [`BuildError::Encoding`] only on cell overflow.
pub fn signed_body(signature: &[u8; 64], body: &Cell) -> Result<Cell, BuildError> {
    let mut builder = CellBuilder::new();
    builder.store_bytes(signature)?.store_cell_contents(body)?;
    builder.build()
}

/// Inbound external message carrying `body` to `wallet`.
///
/// # Errors
///
/// Returns [`BuildError::Encoding`] only on cell overflow.
pub fn external_message(wallet: &TonAddress, body: Cell) -> Result<Cell, BuildError> {
    let mut builder = CellBuilder::new();
    // ext_in_msg_info$10, src addr_none$00
    builder.store_uint(0b10, 2)?.store_uint(0b00, 2)?;
    wallet.store(&mut builder)?;
    // import_fee, no state init, body in a reference
    builder
        .store_coins(0)?
        .store_bit(false)?
        .store_bit(true)?
        .store_ref(Arc::new(body))?;
    builder.build()
}
