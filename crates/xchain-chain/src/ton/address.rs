//! TON account addresses.
//!
//! User-friendly form: base64url of `tag || workchain || hash || crc16`,
//! where the tag is `0x11` (bounceable) or `0x51` (non-bounceable), plus
//! `0x80` on testnet. Raw form: `workchain:hex`.

use std::fmt;
use std::str::FromStr;

use base64::engine::general_purpose::{STANDARD, URL_SAFE};
use base64::Engine;
use xchain_core::config::ChainConfig;
use xchain_core::error::{AddressError, BuildError, ConfigError};
use xchain_core::protocol::PublicKeyFormat;
use xchain_core::types::{Address, AddressType, PossibleAddress};

use super::cell::CellBuilder;
use super::wallet::{wallet_state_init, DEFAULT_WALLET_ID};
use crate::address::{extract_public_key, AddressBuilder};

const TAG_BOUNCEABLE: u8 = 0x11;
const TAG_NON_BOUNCEABLE: u8 = 0x51;
const TAG_TESTNET: u8 = 0x80;

/// Chain parameter selecting the preferred address form.
pub const ADDRESS_FORMAT_PARAM: &str = "address_format";

/// CRC-16/XMODEM.
fn crc16(data: &[u8]) -> u16 {
    let mut crc: u16 = 0;
    for byte in data {
        crc ^= u16::from(*byte) << 8;
        for _ in 0..8 {
            crc = if crc & 0x8000 != 0 { (crc << 1) ^ 0x1021 } else { crc << 1 };
        }
    }
    crc
}

/// A standard internal address with its user-friendly flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TonAddress {
    /// Workchain id.
    pub workchain: i8,
    /// Account id.
    pub hash: [u8; 32],
    /// Bounce flag of the user-friendly form.
    pub bounceable: bool,
    /// Testnet flag of the user-friendly form.
    pub testnet: bool,
}

impl TonAddress {
    /// Bounceable mainnet address.
    #[must_use]
    pub const fn new(workchain: i8, hash: [u8; 32]) -> Self {
        Self {
            workchain,
            hash,
            bounceable: true,
            testnet: false,
        }
    }

    /// User-friendly form with the given flags.
    #[must_use]
    pub fn to_user_friendly(&self, bounceable: bool, testnet: bool) -> String {
        let mut tag = if bounceable { TAG_BOUNCEABLE } else { TAG_NON_BOUNCEABLE };
        if testnet {
            tag |= TAG_TESTNET;
        }
        let mut bytes = Vec::with_capacity(36);
        bytes.push(tag);
        bytes.push(self.workchain as u8);
        bytes.extend_from_slice(&self.hash);
        let crc = crc16(&bytes);
        bytes.extend_from_slice(&crc.to_be_bytes());
        URL_SAFE.encode(bytes)
    }

    /// Raw `workchain:hex` form.
    #[must_use]
    pub fn to_raw(&self) -> String {
        format!("{}:{}", self.workchain, hex::encode(self.hash))
    }

    /// Address in the form named by `address_type`.
    ///
    /// # Errors
    ///
    /// Returns [`AddressError::Encoding`] for types TON does not have.
    pub fn format(&self, address_type: AddressType) -> Result<String, AddressError> {
        match address_type {
            AddressType::Bounceable => Ok(self.to_user_friendly(true, self.testnet)),
            AddressType::NonBounceable => Ok(self.to_user_friendly(false, self.testnet)),
            AddressType::Raw => Ok(self.to_raw()),
            other => Err(AddressError::encoding(format!("no {other} address form on ton"))),
        }
    }

    /// Append as `addr_std` without anycast.
    ///
    /// # Errors
    ///
    /// Returns [`BuildError::Encoding`] if the cell is full.
    pub fn store(&self, builder: &mut CellBuilder) -> Result<(), BuildError> {
        builder
            .store_uint(0b10, 2)?
            .store_bit(false)?
            .store_i8(self.workchain)?
            .store_bytes(&self.hash)?;
        Ok(())
    }

    fn parse_raw(address: &str, workchain: &str, hash: &str) -> Result<Self, AddressError> {
        let workchain: i8 = workchain
            .parse()
            .map_err(|_| AddressError::invalid_format(address, "bad workchain"))?;
        let hash: [u8; 32] = hex::decode(hash)
            .ok()
            .and_then(|h| h.try_into().ok())
            .ok_or_else(|| AddressError::invalid_format(address, "expected 32-byte hex account"))?;
        Ok(Self::new(workchain, hash))
    }

    fn parse_user_friendly(address: &str) -> Result<Self, AddressError> {
        let bytes = URL_SAFE
            .decode(address)
            .or_else(|_| STANDARD.decode(address))
            .map_err(|e| AddressError::invalid_format(address, e.to_string()))?;
        if bytes.len() != 36 {
            return Err(AddressError::invalid_format(
                address,
                format!("expected 36 bytes, got {}", bytes.len()),
            ));
        }
        let crc = u16::from_be_bytes([bytes[34], bytes[35]]);
        if crc16(&bytes[..34]) != crc {
            return Err(AddressError::invalid_format(address, "checksum mismatch"));
        }
        let testnet = bytes[0] & TAG_TESTNET != 0;
        let bounceable = match bytes[0] & !TAG_TESTNET {
            TAG_BOUNCEABLE => true,
            TAG_NON_BOUNCEABLE => false,
            tag => {
                return Err(AddressError::invalid_format(
                    address,
                    format!("unknown tag {tag:#04x}"),
                ))
            }
        };
        let mut hash = [0u8; 32];
        hash.copy_from_slice(&bytes[2..34]);
        Ok(Self {
            workchain: bytes[1] as i8,
            hash,
            bounceable,
            testnet,
        })
    }
}

impl FromStr for TonAddress {
    type Err = AddressError;

    /// Parse either form. Raw addresses are treated as bounceable.
    fn from_str(address: &str) -> Result<Self, Self::Err> {
        match address.split_once(':') {
            Some((workchain, hash)) => Self::parse_raw(address, workchain, hash),
            None => Self::parse_user_friendly(address),
        }
    }
}

impl fmt::Display for TonAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_user_friendly(self.bounceable, self.testnet))
    }
}

/// Address builder for ton: the wallet v4r2 contract address of the key.
#[derive(Debug, Clone)]
pub struct TonAddressBuilder {
    workchain: i8,
    testnet: bool,
    wallet_id: u32,
    preferred: AddressType,
}

/// Workchain configured as the chain id; empty means the basechain.
pub(crate) fn workchain(config: &ChainConfig) -> Result<i8, ConfigError> {
    if config.chain_id.is_empty() {
        return Ok(0);
    }
    config.chain_id.parse().map_err(|_| {
        ConfigError::invalid_value(
            "chain_id",
            format!("{} workchain must be an i8, got {:?}", config.id(), config.chain_id),
        )
    })
}

impl TonAddressBuilder {
    /// Builder for `config`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidValue`] on a malformed workchain or
    /// address format.
    pub fn new(config: &ChainConfig) -> Result<Self, ConfigError> {
        let workchain = workchain(config)?;
        let preferred = match config.param(ADDRESS_FORMAT_PARAM) {
            None | Some("bounceable") => AddressType::Bounceable,
            Some("non_bounceable") => AddressType::NonBounceable,
            Some("raw") => AddressType::Raw,
            Some(other) => {
                return Err(ConfigError::invalid_value(
                    ADDRESS_FORMAT_PARAM,
                    format!("unknown format {other:?}"),
                ))
            }
        };
        Ok(Self {
            workchain,
            testnet: !config.network.is_mainnet(),
            wallet_id: DEFAULT_WALLET_ID.wrapping_add(workchain as u32),
            preferred,
        })
    }

    /// The wallet address of `public_key`.
    ///
    /// # Errors
    ///
    /// Returns [`AddressError::InvalidPublicKey`] unless the key is 32 bytes.
    pub fn wallet_address(&self, public_key: &[u8]) -> Result<TonAddress, AddressError> {
        let raw = extract_public_key(PublicKeyFormat::Raw, public_key)?;
        let mut key = [0u8; 32];
        key.copy_from_slice(&raw);
        let state_init = wallet_state_init(&key, self.wallet_id)
            .map_err(|e| AddressError::encoding(e.to_string()))?;
        Ok(TonAddress {
            testnet: self.testnet,
            ..TonAddress::new(self.workchain, state_init.hash())
        })
    }
}

impl AddressBuilder for TonAddressBuilder {
    fn address_from_public_key(&self, public_key: &[u8]) -> Result<Address, AddressError> {
        let wallet = self.wallet_address(public_key)?;
        Ok(Address::new(wallet.format(self.preferred)?))
    }

    fn all_possible_addresses_from_public_key(
        &self,
        public_key: &[u8],
    ) -> Result<Vec<PossibleAddress>, AddressError> {
        let wallet = self.wallet_address(public_key)?;
        let mut types = vec![self.preferred];
        for t in [AddressType::Bounceable, AddressType::NonBounceable, AddressType::Raw] {
            if t != self.preferred {
                types.push(t);
            }
        }
        types
            .into_iter()
            .map(|t| Ok(PossibleAddress::new(Address::new(wallet.format(t)?), t)))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used)]

    use super::*;
    use xchain_core::asset::NativeAsset;
    use xchain_core::config::Network;

    #[test]
    fn test_user_friendly_vectors() {
        let zero = TonAddress::new(0, [0; 32]);
        assert_eq!(
            zero.to_user_friendly(true, false),
            "EQAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAM9c"
        );
        assert_eq!(
            zero.to_user_friendly(false, false),
            "UQAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAJKZ"
        );
        let master = TonAddress::new(-1, [0x33; 32]);
        assert_eq!(
            master.to_string(),
            "Ef8zMzMzMzMzMzMzMzMzMzMzMzMzMzMzMzMzMzMzMzMzM0vF"
        );
    }

    #[test]
    fn test_parse_forms() {
        let parsed: TonAddress = "UQAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAJKZ".parse().unwrap();
        assert!(!parsed.bounceable);
        assert_eq!(parsed.workchain, 0);

        let raw: TonAddress = format!("-1:{}", "33".repeat(32)).parse().unwrap();
        assert_eq!(raw.workchain, -1);
        assert!(raw.bounceable);
        assert_eq!(raw.to_raw(), format!("-1:{}", "33".repeat(32)));

        let testnet: TonAddress = "kQAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAHTW".parse().unwrap();
        assert!(testnet.testnet);
    }

    #[test]
    fn test_parse_rejects_bad_checksum() {
        assert!("EQAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAM9d"
            .parse::<TonAddress>()
            .is_err());
        assert!("0:abcd".parse::<TonAddress>().is_err());
    }

    #[test]
    fn test_builder_lists_all_forms() {
        let builder = TonAddressBuilder::new(&ChainConfig::new(NativeAsset::Ton)).unwrap();
        let all = builder.all_possible_addresses_from_public_key(&[7u8; 32]).unwrap();
        let types: Vec<AddressType> = all.iter().map(|a| a.address_type).collect();
        assert_eq!(
            types,
            [AddressType::Bounceable, AddressType::NonBounceable, AddressType::Raw]
        );
        assert!(all[0].address.as_str().starts_with("EQ"));
        assert!(all[1].address.as_str().starts_with("UQ"));
        assert!(all[2].address.as_str().starts_with("0:"));

        let preferred = builder.address_from_public_key(&[7u8; 32]).unwrap();
        assert_eq!(preferred, all[0].address);
    }

    #[test]
    fn test_builder_options() {
        let config = ChainConfig::new(NativeAsset::Ton)
            .with_network(Network::Testnet)
            .with_param(ADDRESS_FORMAT_PARAM, "non_bounceable");
        let builder = TonAddressBuilder::new(&config).unwrap();
        let address = builder.address_from_public_key(&[7u8; 32]).unwrap();
        assert!(address.as_str().starts_with('0'));

        let bad = ChainConfig::new(NativeAsset::Ton).with_chain_id("basechain");
        assert!(TonAddressBuilder::new(&bad).is_err());
        assert!(builder.address_from_public_key(&[7u8; 33]).is_err());
    }
}
