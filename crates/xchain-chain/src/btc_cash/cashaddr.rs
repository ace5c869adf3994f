//! CashAddr encoding of bitcoin cash addresses.

use bitcoin::hashes::Hash;
use bitcoin::{PubkeyHash, ScriptBuf, ScriptHash};
use xchain_core::error::AddressError;
use xchain_core::types::{Address, AddressType, PossibleAddress};

use crate::btc::{AddressCodec, Base58Codec, ChainParams};

const CHARSET: &[u8; 32] = b"qpzry9x8gf2tvdw0s3jn54khce6mua7l";
const GENERATORS: [u64; 5] = [
    0x98_f2bc_8e61,
    0x79_b76d_99e2,
    0xf3_3e5f_b3c4,
    0xae_2eab_e2a8,
    0x1e_4f43_e470,
];
const CHECKSUM_LEN: usize = 8;

const VERSION_P2PKH: u8 = 0;
const VERSION_P2SH: u8 = 8;

fn polymod(values: &[u8]) -> u64 {
    let mut c: u64 = 1;
    for value in values {
        let c0 = c >> 35;
        c = ((c & 0x07_ffff_ffff) << 5) ^ u64::from(*value);
        for (bit, generator) in GENERATORS.iter().enumerate() {
            if (c0 >> bit) & 1 == 1 {
                c ^= generator;
            }
        }
    }
    c ^ 1
}

fn prefix_values(prefix: &str) -> Vec<u8> {
    let mut values: Vec<u8> = prefix.bytes().map(|b| b & 0x1f).collect();
    values.push(0);
    values
}

fn convert_bits(data: &[u8], from: u32, to: u32, pad: bool) -> Option<Vec<u8>> {
    let mut acc: u32 = 0;
    let mut bits: u32 = 0;
    let max = (1u32 << to) - 1;
    let mut out = Vec::with_capacity(data.len() * from as usize / to as usize + 1);
    for value in data {
        let value = u32::from(*value);
        if value >> from != 0 {
            return None;
        }
        acc = (acc << from) | value;
        bits += from;
        while bits >= to {
            bits -= to;
            out.push(((acc >> bits) & max) as u8);
        }
    }
    if pad {
        if bits > 0 {
            out.push(((acc << (to - bits)) & max) as u8);
        }
    } else if bits >= from || ((acc << (to - bits)) & max) != 0 {
        return None;
    }
    Some(out)
}

/// Encode `hash` with `version` under `prefix`.
///
/// # Errors
///
/// Returns [`AddressError::Encoding`] if the bit conversion fails.
pub fn encode(prefix: &str, version: u8, hash: &[u8; 20]) -> Result<String, AddressError> {
    let mut payload = Vec::with_capacity(21);
    payload.push(version);
    payload.extend_from_slice(hash);
    let data = convert_bits(&payload, 8, 5, true)
        .ok_or_else(|| AddressError::encoding("cashaddr payload conversion"))?;

    let mut checked = prefix_values(prefix);
    checked.extend_from_slice(&data);
    checked.extend_from_slice(&[0u8; CHECKSUM_LEN]);
    let checksum = polymod(&checked);

    let mut out = String::with_capacity(prefix.len() + 1 + data.len() + CHECKSUM_LEN);
    out.push_str(prefix);
    out.push(':');
    for value in &data {
        out.push(char::from(CHARSET[usize::from(*value)]));
    }
    for i in 0..CHECKSUM_LEN {
        let value = (checksum >> (5 * (CHECKSUM_LEN - 1 - i))) & 0x1f;
        out.push(char::from(CHARSET[value as usize]));
    }
    Ok(out)
}

/// Decode a CashAddr string into its version byte and hash.
///
/// The prefix may be omitted, in which case `default_prefix` is assumed.
///
/// # Errors
///
/// Returns [`AddressError::InvalidFormat`] on mixed case, a foreign prefix,
/// an unknown character, a bad checksum or an unsupported hash size.
pub fn decode(address: &str, default_prefix: &str) -> Result<(u8, [u8; 20]), AddressError> {
    let invalid = |reason: &str| AddressError::invalid_format(address, reason);

    let lower = address.to_ascii_lowercase();
    if lower != address && address.to_ascii_uppercase() != address {
        return Err(invalid("mixed case"));
    }
    let (prefix, body) = match lower.split_once(':') {
        Some((prefix, body)) => (prefix.to_string(), body.to_string()),
        None => (default_prefix.to_string(), lower.clone()),
    };
    if prefix != default_prefix {
        return Err(invalid(&format!("expected prefix {default_prefix}")));
    }

    let values = body
        .bytes()
        .map(|b| CHARSET.iter().position(|c| *c == b).map(|p| p as u8))
        .collect::<Option<Vec<u8>>>()
        .ok_or_else(|| invalid("invalid character"))?;
    if values.len() <= CHECKSUM_LEN {
        return Err(invalid("too short"));
    }

    let mut checked = prefix_values(&prefix);
    checked.extend_from_slice(&values);
    if polymod(&checked) != 0 {
        return Err(invalid("checksum mismatch"));
    }

    let data = &values[..values.len() - CHECKSUM_LEN];
    let payload = convert_bits(data, 5, 8, false).ok_or_else(|| invalid("invalid padding"))?;
    let [version, hash @ ..] = payload.as_slice() else {
        return Err(invalid("empty payload"));
    };
    if version & 0x07 != 0 {
        return Err(invalid("only 160-bit hashes are supported"));
    }
    let hash: [u8; 20] = hash.try_into().map_err(|_| invalid("hash is not 20 bytes"))?;
    Ok((*version, hash))
}

/// CashAddr first, legacy base58 as the secondary representation.
///
/// Decoding accepts both forms.
#[derive(Debug, Clone, Copy, Default)]
pub struct CashAddrCodec;

impl AddressCodec for CashAddrCodec {
    fn encode(
        &self,
        pubkey_hash: &[u8; 20],
        params: &ChainParams,
    ) -> Result<Vec<PossibleAddress>, AddressError> {
        let cash = encode(&params.cash_prefix, VERSION_P2PKH, pubkey_hash)?;
        let mut all = vec![PossibleAddress::new(Address::new(cash), AddressType::Default)];
        for legacy in Base58Codec.encode(pubkey_hash, params)? {
            all.push(PossibleAddress::new(legacy.address, AddressType::Legacy));
        }
        Ok(all)
    }

    fn decode(&self, address: &str, params: &ChainParams) -> Result<ScriptBuf, AddressError> {
        match decode(address, &params.cash_prefix) {
            Ok((VERSION_P2PKH, hash)) => Ok(ScriptBuf::new_p2pkh(&PubkeyHash::from_byte_array(hash))),
            Ok((VERSION_P2SH, hash)) => Ok(ScriptBuf::new_p2sh(&ScriptHash::from_byte_array(hash))),
            Ok((version, _)) => Err(AddressError::invalid_format(
                address,
                format!("unknown cashaddr type {}", version >> 3),
            )),
            Err(cash_err) => Base58Codec.decode(address, params).map_err(|_| cash_err),
        }
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used)]

    use super::*;
    use xchain_core::asset::NativeAsset;
    use xchain_core::config::ChainConfig;

    const LEGACY: &str = "1BpEi6DfDAUFd7GtittLSdBeYJvcoaVggu";
    const CASH: &str = "bitcoincash:qpm2qsznhks23z7629mms6s4cwef74vcwvy22gdx6a";

    fn params() -> ChainParams {
        ChainParams::from_config(&ChainConfig::new(NativeAsset::Bch)).unwrap()
    }

    fn legacy_hash() -> [u8; 20] {
        let payload = bs58::decode(LEGACY).with_check(None).into_vec().unwrap();
        payload[1..].try_into().unwrap()
    }

    #[test]
    fn test_encode_known_vector() {
        assert_eq!(encode("bitcoincash", VERSION_P2PKH, &legacy_hash()).unwrap(), CASH);
    }

    #[test]
    fn test_decode_known_vector() {
        let (version, hash) = decode(CASH, "bitcoincash").unwrap();
        assert_eq!(version, VERSION_P2PKH);
        assert_eq!(hash, legacy_hash());

        let without_prefix = CASH.trim_start_matches("bitcoincash:");
        assert_eq!(decode(without_prefix, "bitcoincash").unwrap().1, legacy_hash());
        assert_eq!(decode(&CASH.to_uppercase(), "bitcoincash").unwrap().1, legacy_hash());
    }

    #[test]
    fn test_decode_rejects_corruption() {
        let mut corrupted = CASH.to_string();
        corrupted.pop();
        corrupted.push('q');
        assert!(decode(&corrupted, "bitcoincash").is_err());
        assert!(decode(CASH, "bchtest").is_err());
        assert!(decode("bitcoincash:QPm2qsznhks23z7629mms6s4cwef74vcwvy22gdx6a", "bitcoincash").is_err());
    }

    #[test]
    fn test_codec_accepts_both_forms() {
        let codec = CashAddrCodec;
        let from_cash = codec.decode(CASH, &params()).unwrap();
        let from_legacy = codec.decode(LEGACY, &params()).unwrap();
        assert_eq!(from_cash, from_legacy);
        assert!(from_cash.is_p2pkh());
    }

    #[test]
    fn test_codec_encode_order() {
        let all = CashAddrCodec.encode(&legacy_hash(), &params()).unwrap();
        assert_eq!(all[0].address.as_str(), CASH);
        assert_eq!(all[0].address_type, AddressType::Default);
        assert_eq!(all[1].address.as_str(), LEGACY);
        assert_eq!(all[1].address_type, AddressType::Legacy);
    }
}
