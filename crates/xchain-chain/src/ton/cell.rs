//! Ordinary cells and bag-of-cells serialisation.
//!
//! # Example
//!
//! ```
//! use xchain_chain::ton::cell::{to_boc, CellBuilder};
//!
//! let cell = CellBuilder::new().build().expect("empty cell");
//! assert_eq!(
//!     hex::encode(cell.hash()),
//!     "96a296d224f285c67bee93c30f8a309157f0daa35dc5b87e410b78630a09cfc7"
//! );
//! assert_eq!(hex::encode(to_boc(&cell).expect("boc")), "b5ee9c724101010100020000004cacb9cd");
//! ```

use std::collections::{HashMap, HashSet};
use std::fmt;
use std::sync::Arc;

use sha2::{Digest, Sha256};
use xchain_core::error::BuildError;

/// Maximum data bits of a cell.
pub const MAX_BITS: usize = 1023;
/// Maximum references of a cell.
pub const MAX_REFS: usize = 4;

const BOC_MAGIC: [u8; 4] = [0xb5, 0xee, 0x9c, 0x72];
const BOC_HAS_CRC32C: u8 = 0x40;

/// An immutable ordinary cell.
#[derive(Clone, PartialEq, Eq)]
pub struct Cell {
    data: Vec<u8>,
    bit_len: usize,
    refs: Vec<Arc<Cell>>,
    hash: [u8; 32],
    depth: u16,
    opaque: bool,
}

impl Cell {
    /// A cell known only by its hash and depth. It can be referenced for
    /// hashing but not serialised.
    #[must_use]
    pub const fn opaque(hash: [u8; 32], depth: u16) -> Self {
        Self {
            data: Vec::new(),
            bit_len: 0,
            refs: Vec::new(),
            hash,
            depth,
            opaque: true,
        }
    }

    /// Representation hash.
    #[must_use]
    pub const fn hash(&self) -> [u8; 32] {
        self.hash
    }

    /// Depth of the reference tree.
    #[must_use]
    pub const fn depth(&self) -> u16 {
        self.depth
    }

    /// Number of data bits.
    #[must_use]
    pub const fn bit_len(&self) -> usize {
        self.bit_len
    }

    /// Child cells.
    #[must_use]
    pub fn refs(&self) -> &[Arc<Cell>] {
        &self.refs
    }

    fn descriptors(&self) -> [u8; 2] {
        // Both values are bounded by MAX_REFS and MAX_BITS.
        let refs = self.refs.len() as u8;
        let bytes = (self.bit_len / 8 + self.bit_len.div_ceil(8)) as u8;
        [refs, bytes]
    }

    /// Data bytes with the completion tag appended to a partial last byte.
    fn padded_data(&self) -> Vec<u8> {
        let mut data = self.data[..self.bit_len.div_ceil(8)].to_vec();
        if self.bit_len % 8 != 0 {
            if let Some(last) = data.last_mut() {
                *last |= 0x80 >> (self.bit_len % 8);
            }
        }
        data
    }

    fn compute(data: Vec<u8>, bit_len: usize, refs: Vec<Arc<Cell>>) -> Self {
        let mut cell = Self {
            data,
            bit_len,
            refs,
            hash: [0; 32],
            depth: 0,
            opaque: false,
        };
        let mut hasher = Sha256::new();
        hasher.update(cell.descriptors());
        hasher.update(cell.padded_data());
        for r in &cell.refs {
            hasher.update(r.depth.to_be_bytes());
        }
        for r in &cell.refs {
            hasher.update(r.hash);
        }
        cell.hash = hasher.finalize().into();
        cell.depth = cell
            .refs
            .iter()
            .map(|r| r.depth.saturating_add(1))
            .max()
            .unwrap_or(0);
        cell
    }
}

impl fmt::Debug for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Cell")
            .field("bits", &self.bit_len)
            .field("refs", &self.refs.len())
            .field("hash", &hex::encode(self.hash))
            .finish()
    }
}

/// Builds a [`Cell`] bit by bit.
#[derive(Debug, Clone, Default)]
pub struct CellBuilder {
    data: Vec<u8>,
    bit_len: usize,
    refs: Vec<Arc<Cell>>,
}

impl CellBuilder {
    /// An empty builder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Bits written so far.
    #[must_use]
    pub const fn bit_len(&self) -> usize {
        self.bit_len
    }

    /// Bits still available.
    #[must_use]
    pub const fn remaining_bits(&self) -> usize {
        MAX_BITS - self.bit_len
    }

    /// Append one bit.
    ///
    /// # Errors
    ///
    /// Returns [`BuildError::Encoding`] if the cell is full.
    pub fn store_bit(&mut self, bit: bool) -> Result<&mut Self, BuildError> {
        if self.bit_len >= MAX_BITS {
            return Err(BuildError::encoding("cell data overflow"));
        }
        if self.bit_len % 8 == 0 {
            self.data.push(0);
        }
        if bit {
            if let Some(byte) = self.data.last_mut() {
                *byte |= 0x80 >> (self.bit_len % 8);
            }
        }
        self.bit_len += 1;
        Ok(self)
    }

    /// Append the low `bits` bits of `value`, most significant first.
    ///
    /// # Errors
    ///
    /// Returns [`BuildError::Encoding`] if `value` does not fit in `bits`
    /// or the cell is full.
    pub fn store_uint(&mut self, value: u128, bits: usize) -> Result<&mut Self, BuildError> {
        if bits > 128 || (bits < 128 && value >> bits != 0) {
            return Err(BuildError::encoding(format!("{value} does not fit in {bits} bits")));
        }
        if bits > self.remaining_bits() {
            return Err(BuildError::encoding("cell data overflow"));
        }
        for i in (0..bits).rev() {
            self.store_bit((value >> i) & 1 == 1)?;
        }
        Ok(self)
    }

    /// Append a signed 8-bit integer.
    ///
    /// # Errors
    ///
    /// Returns [`BuildError::Encoding`] if the cell is full.
    pub fn store_i8(&mut self, value: i8) -> Result<&mut Self, BuildError> {
        self.store_uint(u128::from(value as u8), 8)
    }

    /// Append whole bytes.
    ///
    /// # Errors
    ///
    /// Returns [`BuildError::Encoding`] if the cell is full.
    pub fn store_bytes(&mut self, bytes: &[u8]) -> Result<&mut Self, BuildError> {
        if bytes.len() * 8 > self.remaining_bits() {
            return Err(BuildError::encoding("cell data overflow"));
        }
        for byte in bytes {
            self.store_uint(u128::from(*byte), 8)?;
        }
        Ok(self)
    }

    /// Append a `VarUInteger 16` amount.
    ///
    /// # Errors
    ///
    /// Returns [`BuildError::Encoding`] if the cell is full.
    pub fn store_coins(&mut self, amount: u128) -> Result<&mut Self, BuildError> {
        let len = (128 - amount.leading_zeros() as usize).div_ceil(8);
        if len > 15 {
            return Err(BuildError::encoding(format!("amount {amount} exceeds 120 bits")));
        }
        self.store_uint(len as u128, 4)?;
        self.store_uint(amount, len * 8)
    }

    /// Append a reference.
    ///
    /// # Errors
    ///
    /// Returns [`BuildError::Encoding`] if the cell already has four.
    pub fn store_ref(&mut self, cell: Arc<Cell>) -> Result<&mut Self, BuildError> {
        if self.refs.len() >= MAX_REFS {
            return Err(BuildError::encoding("cell reference overflow"));
        }
        self.refs.push(cell);
        Ok(self)
    }

    /// Append the bits and references of `cell`.
    ///
    /// # Errors
    ///
    /// Returns [`BuildError::Encoding`] on overflow.
    pub fn store_cell_contents(&mut self, cell: &Cell) -> Result<&mut Self, BuildError> {
        for i in 0..cell.bit_len {
            let bit = cell.data[i / 8] & (0x80 >> (i % 8)) != 0;
            self.store_bit(bit)?;
        }
        for r in &cell.refs {
            self.store_ref(Arc::clone(r))?;
        }
        Ok(self)
    }

    /// Finish the cell.
    ///
    /// # Errors
    ///
    /// Infallible today; kept fallible so callers chain with `?`.
    pub fn build(&self) -> Result<Cell, BuildError> {
        Ok(Cell::compute(self.data.clone(), self.bit_len, self.refs.clone()))
    }
}

// ============================================================================
// Bag of cells
// ============================================================================

/// CRC-32C (Castagnoli).
fn crc32c(data: &[u8]) -> u32 {
    let mut crc = !0u32;
    for byte in data {
        crc ^= u32::from(*byte);
        for _ in 0..8 {
            crc = if crc & 1 == 1 { (crc >> 1) ^ 0x82f6_3b78 } else { crc >> 1 };
        }
    }
    !crc
}

fn push_sized(out: &mut Vec<u8>, value: usize, size: usize) {
    let bytes = value.to_be_bytes();
    out.extend_from_slice(&bytes[bytes.len() - size..]);
}

fn bytes_needed(value: usize) -> usize {
    ((usize::BITS - value.leading_zeros()) as usize).div_ceil(8).max(1)
}

/// Cells in parent-before-child order, deduplicated by hash.
fn topological_order(root: &Arc<Cell>) -> Vec<Arc<Cell>> {
    fn visit(cell: &Arc<Cell>, seen: &mut HashSet<[u8; 32]>, post: &mut Vec<Arc<Cell>>) {
        if !seen.insert(cell.hash) {
            return;
        }
        for r in &cell.refs {
            visit(r, seen, post);
        }
        post.push(Arc::clone(cell));
    }
    let mut seen = HashSet::new();
    let mut post = Vec::new();
    visit(root, &mut seen, &mut post);
    post.reverse();
    post
}

/// Serialise `root` as a single-root bag of cells with a CRC-32C trailer.
///
/// # Errors
///
/// Returns [`BuildError::Encoding`] if the tree contains an opaque cell.
pub fn to_boc(root: &Cell) -> Result<Vec<u8>, BuildError> {
    let root = Arc::new(root.clone());
    let cells = topological_order(&root);
    if cells.iter().any(|c| c.opaque) {
        return Err(BuildError::encoding("cannot serialise an opaque cell"));
    }
    let index: HashMap<[u8; 32], usize> =
        cells.iter().enumerate().map(|(i, c)| (c.hash, i)).collect();
    let size_bytes = bytes_needed(cells.len());

    let mut body = Vec::new();
    for cell in &cells {
        body.extend_from_slice(&cell.descriptors());
        body.extend(cell.padded_data());
        for r in &cell.refs {
            let position = index
                .get(&r.hash)
                .copied()
                .ok_or_else(|| BuildError::encoding("dangling cell reference"))?;
            push_sized(&mut body, position, size_bytes);
        }
    }
    let offset_bytes = bytes_needed(body.len());

    let mut out = Vec::with_capacity(body.len() + 32);
    out.extend_from_slice(&BOC_MAGIC);
    // size_bytes is at most 8, so it fits the 3-bit field.
    out.push(BOC_HAS_CRC32C | size_bytes as u8);
    out.push(offset_bytes as u8);
    push_sized(&mut out, cells.len(), size_bytes);
    push_sized(&mut out, 1, size_bytes);
    push_sized(&mut out, 0, size_bytes);
    push_sized(&mut out, body.len(), offset_bytes);
    push_sized(&mut out, 0, size_bytes);
    out.extend(body);
    let crc = crc32c(&out);
    out.extend_from_slice(&crc.to_le_bytes());
    Ok(out)
}
