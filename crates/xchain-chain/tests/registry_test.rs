//! End-to-end flows through the protocol registry: resolve, derive, build,
//! sign, attach, serialize.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use ed25519_dalek::{Signature, Verifier, VerifyingKey};
use proptest::prelude::*;
use xchain_chain::btc::{BtcInput, Utxo};
use xchain_chain::cosmos::CosmosInput;
use xchain_chain::evm::EvmInput;
use xchain_chain::solana::{encode_pubkey, SolanaInput};
use xchain_chain::ton::TonInput;
use xchain_chain::{AddressBuilder, ChainInput, Client, ProtocolRegistry, Signer, Tx, TxInput};
use xchain_core::{
    Address, AddressType, AssetConfig, ChainConfig, ClientConfig, NativeAsset, Protocol,
    TaskConfig, TransferArgs, TxSignature, SUPPORTED_PROTOCOLS, U256,
};

const SECRET: &str = "8da4ef21b864d2cc526dbdb2a120bd2874c36c9d0a1fb7f8c63d7f7a8b41de8f";

fn with_auth(config: ChainConfig) -> ChainConfig {
    config.with_client(ClientConfig {
        provider: "blockchair".to_string(),
        auth: "1234".to_string(),
        url: String::new(),
    })
}

fn config_for(protocol: &Protocol) -> ChainConfig {
    match protocol.as_str() {
        "btc" => with_auth(ChainConfig::new(NativeAsset::Btc)),
        "btc-cash" => with_auth(ChainConfig::new(NativeAsset::Bch)),
        "btc-legacy" => with_auth(ChainConfig::new(NativeAsset::Doge)),
        "cosmos" => ChainConfig::new(NativeAsset::Atom)
            .with_chain_prefix("cosmos")
            .with_chain_id("cosmoshub-4")
            .with_chain_coin("uatom"),
        "evmos" => ChainConfig::new(NativeAsset::Evmos)
            .with_chain_prefix("evmos")
            .with_chain_id("evmos_9001-2")
            .with_chain_coin("aevmos"),
        "evm" => ChainConfig::new(NativeAsset::Eth).with_chain_id("1"),
        "evm-legacy" => ChainConfig::new(NativeAsset::Bnb).with_chain_id("56"),
        "solana" => ChainConfig::new(NativeAsset::Sol),
        "tron" => ChainConfig::new(NativeAsset::Trx),
        "ton" => ChainConfig::new(NativeAsset::Ton),
        other => panic!("no test config for {other}"),
    }
}

/// Sign every sighash of `tx` with `signer` and attach the signatures.
fn sign(tx: &mut dyn Tx, signer: &dyn Signer) {
    let signatures: Vec<TxSignature> = tx
        .sighashes()
        .unwrap()
        .iter()
        .map(|payload| signer.sign(payload.as_bytes()).unwrap())
        .collect();
    tx.add_signatures(&signatures).unwrap();
}

fn sender(registry: &ProtocolRegistry, config: &ChainConfig) -> (Box<dyn Signer>, Address) {
    let signer = registry.resolve_signer(config, SECRET).unwrap();
    let address = registry
        .resolve_address_builder(config)
        .unwrap()
        .address_from_public_key(&signer.public_key().unwrap())
        .unwrap();
    (signer, address)
}

// ============================================================================
// Resolution
// ============================================================================

#[test]
fn every_supported_protocol_resolves_all_capabilities() {
    let registry = ProtocolRegistry::new();
    for protocol in &SUPPORTED_PROTOCOLS {
        let config = config_for(protocol);
        let client = registry.resolve_client(&config).unwrap();
        assert_eq!(client.protocol(), protocol);
        registry.resolve_address_builder(&config).unwrap();
        registry.resolve_tx_builder(&config).unwrap();
        let signer = registry.resolve_signer(&config, SECRET).unwrap();
        assert_eq!(Some(signer.algorithm()), protocol.signature_algorithm(), "{protocol}");
    }
}

#[test]
fn unknown_protocol_is_not_found() {
    let registry = ProtocolRegistry::new();
    let config = ChainConfig::new(NativeAsset::Eth).with_protocol(Protocol::from("unknown"));
    assert_eq!(
        registry.resolve_client(&config).unwrap_err().to_string(),
        "creator unknown not found"
    );
}

#[test]
fn btc_client_requires_api_key() {
    let registry = ProtocolRegistry::new();
    let err = registry.resolve_client(&ChainConfig::new(NativeAsset::Btc)).unwrap_err();
    assert!(err.to_string().contains("requires an api key"));
}

// ============================================================================
// Address derivation
// ============================================================================

#[test]
fn bitcoin_cash_overrides_bitcoin_addresses() {
    let registry = ProtocolRegistry::new();
    let btc = config_for(&Protocol::BTC);
    let bch = config_for(&Protocol::BTC_CASH);
    let (_, btc_address) = sender(&registry, &btc);
    let (_, bch_address) = sender(&registry, &bch);

    assert!(btc_address.as_str().starts_with("bc1q"));
    assert!(bch_address.as_str().starts_with("bitcoincash:q"));
    assert_ne!(btc_address, bch_address);
}

#[test]
fn evm_legacy_reuses_evm_addresses() {
    let registry = ProtocolRegistry::new();
    let (_, eth) = sender(&registry, &config_for(&Protocol::EVM));
    let (_, bnb) = sender(&registry, &config_for(&Protocol::EVM_LEGACY));
    assert_eq!(eth, bnb);
}

#[test]
fn ton_lists_every_address_form() {
    let registry = ProtocolRegistry::new();
    let config = config_for(&Protocol::TON);
    let signer = registry.resolve_signer(&config, SECRET).unwrap();
    let all = registry
        .resolve_address_builder(&config)
        .unwrap()
        .all_possible_addresses_from_public_key(&signer.public_key().unwrap())
        .unwrap();
    let types: Vec<AddressType> = all.iter().map(|a| a.address_type).collect();
    assert_eq!(types, [AddressType::Bounceable, AddressType::NonBounceable, AddressType::Raw]);
}

proptest! {
    #[test]
    fn preferred_address_is_listed_first(seed in any::<[u8; 32]>()) {
        let registry = ProtocolRegistry::new();
        let secret = hex::encode(seed);
        for protocol in &SUPPORTED_PROTOCOLS {
            let config = config_for(protocol);
            let Ok(signer) = registry.resolve_signer(&config, &secret) else {
                continue;
            };
            let key = signer.public_key().unwrap();
            let builder = registry.resolve_address_builder(&config).unwrap();
            let preferred = builder.address_from_public_key(&key).unwrap();
            let all = builder.all_possible_addresses_from_public_key(&key).unwrap();
            prop_assert_eq!(&all[0].address, &preferred);
        }
    }
}

// ============================================================================
// Build, sign, serialize
// ============================================================================

#[test]
fn bitcoin_transfer_signs_every_input() {
    let registry = ProtocolRegistry::new();
    let config = config_for(&Protocol::BTC);
    let (signer, from) = sender(&registry, &config);
    let input = TxInput::new(ChainInput::Btc(BtcInput {
        utxos: vec![
            Utxo::new("aa".repeat(32), 0, 40_000),
            Utxo::new("bb".repeat(32), 1, 40_000),
        ],
        fee_rate: 2,
        from_public_key: hex::encode(signer.public_key().unwrap()),
    }));
    let args = TransferArgs::new(from.clone(), from, U256::from(60_000u64));

    let mut tx = registry.resolve_tx_builder(&config).unwrap().new_transfer(&args, &input).unwrap();
    assert_eq!(tx.sighashes().unwrap().len(), 2);
    sign(tx.as_mut(), signer.as_ref());
    assert_eq!(tx.hash().as_str().len(), 64);
    assert!(!tx.serialize().unwrap().is_empty());
}

#[test]
fn evm_legacy_transfer_under_default_tip_cap() {
    let registry = ProtocolRegistry::new();
    let config = config_for(&Protocol::EVM_LEGACY);
    let (signer, from) = sender(&registry, &config);
    let input = TxInput::new(ChainInput::Evm(EvmInput {
        nonce: 7,
        gas_limit: 21_000,
        gas_fee_cap: 5_000_000_000,
        gas_tip_cap: 4_000_000_000,
        ..EvmInput::default()
    }));
    let args = TransferArgs::new(
        from,
        Address::new("0x3ad57b83B2E3dC5648F32e98e386935A9B10bb9F"),
        U256::from(100u64),
    );

    let mut tx = registry.resolve_tx_builder(&config).unwrap().new_transfer(&args, &input).unwrap();
    assert!(tx.hash().is_empty());
    sign(tx.as_mut(), signer.as_ref());

    let raw = tx.serialize().unwrap();
    assert!(raw[0] >= 0xc0, "legacy transactions are untyped");
    assert!(tx.hash().as_str().starts_with("0x"));
    assert_eq!(tx.hash().as_str().len(), 66);
}

#[test]
fn evm_rejects_unknown_task() {
    let registry = ProtocolRegistry::new();
    let config = config_for(&Protocol::EVM);
    let task = TaskConfig::new("SomeUnknownTask", NativeAsset::Eth);
    let args = TransferArgs::new(
        Address::new("0x3ad57b83B2E3dC5648F32e98e386935A9B10bb9F"),
        Address::new("0x3ad57b83B2E3dC5648F32e98e386935A9B10bb9F"),
        U256::from(1u64),
    )
    .with_asset(AssetConfig::Task(task));
    let input = TxInput::new(ChainInput::Evm(EvmInput {
        gas_limit: 21_000,
        ..EvmInput::default()
    }));
    let err = registry
        .resolve_tx_builder(&config)
        .unwrap()
        .new_transfer(&args, &input)
        .unwrap_err();
    assert_eq!(err.to_string(), "not implemented task: 'SomeUnknownTask'");
}

#[test]
fn cosmos_undelegate_needs_validator() {
    let registry = ProtocolRegistry::new();
    let config = config_for(&Protocol::COSMOS);
    let (signer, from) = sender(&registry, &config);
    let task = TaskConfig::new("CosmosUndelegateOperator", NativeAsset::Atom);
    let args = TransferArgs::new(from.clone(), from, U256::from(1u64))
        .with_asset(AssetConfig::Task(task));
    let input = TxInput::new(ChainInput::Cosmos(CosmosInput {
        account_number: 1,
        sequence: 0,
        gas_limit: 200_000,
        gas_price: "0.025".to_string(),
        from_public_key: hex::encode(signer.public_key().unwrap()),
        memo: None,
    }));
    let err = registry
        .resolve_tx_builder(&config)
        .unwrap()
        .new_transfer(&args, &input)
        .unwrap_err();
    assert_eq!(
        err.to_string(),
        "must provide validator_address in task 'CosmosUndelegateOperator'"
    );
}

#[test]
fn solana_transfer_hash_is_first_signature() {
    let registry = ProtocolRegistry::new();
    let config = config_for(&Protocol::SOLANA);
    let (signer, from) = sender(&registry, &config);
    let args = TransferArgs::new(from, Address::new(encode_pubkey(&[9u8; 32])), U256::from(5u64));
    let input = TxInput::new(ChainInput::Solana(SolanaInput {
        recent_blockhash: encode_pubkey(&[3u8; 32]),
        token_program: None,
    }));

    let mut tx = registry.resolve_tx_builder(&config).unwrap().new_transfer(&args, &input).unwrap();
    sign(tx.as_mut(), signer.as_ref());

    let raw = tx.serialize().unwrap();
    assert_eq!(raw[0], 1);
    assert_eq!(tx.hash().as_str(), bs58::encode(&raw[1..65]).into_string());
}

#[test]
fn ton_signature_verifies_over_body_hash() {
    let registry = ProtocolRegistry::new();
    let config = config_for(&Protocol::TON);
    let (signer, from) = sender(&registry, &config);
    let args = TransferArgs::new(
        from,
        Address::new("UQAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAJKZ"),
        U256::from(1_000_000u64),
    )
    .with_memo("deposit");
    let input = TxInput::new(ChainInput::Ton(TonInput {
        seqno: 1,
        valid_until: 1_900_000_000,
        ..TonInput::default()
    }));

    let mut tx = registry.resolve_tx_builder(&config).unwrap().new_transfer(&args, &input).unwrap();
    let sighash = tx.sighashes().unwrap().remove(0);
    sign(tx.as_mut(), signer.as_ref());

    let key: [u8; 32] = signer.public_key().unwrap().try_into().unwrap();
    let verifying = VerifyingKey::from_bytes(&key).unwrap();
    let signature = signer.sign(sighash.as_bytes()).unwrap();
    let signature = Signature::from_slice(signature.as_bytes()).unwrap();
    verifying.verify(sighash.as_bytes(), &signature).unwrap();
    assert_eq!(tx.hash().as_str().len(), 64);
}
