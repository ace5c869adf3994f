//! Error types for the xchain abstraction layer.
//!
//! Errors are organised by domain:
//!
//! - [`RegistryError`] - A protocol has no registered capability
//! - [`VariantError`] - A transaction-input variant tag is malformed
//! - [`TaskError`] - Staking task dispatch failures
//! - [`BuildError`] - Transaction construction failures
//! - [`AddressError`] - Address derivation and decoding failures
//! - [`SignError`] - Signing operation failures
//! - [`ConfigError`] - Configuration failures
//! - [`DefectError`] - Coverage or wiring bugs that must fail loudly
//! - [`XChainError`] - Top-level error that wraps all error types
//!
//! The `Display` text of several variants is relied upon by callers, so the
//! top-level error forwards it unchanged (`#[error(transparent)]`).
//!
//! # Example
//!
//! ```rust
//! use xchain_core::error::{RegistryError, XChainError};
//!
//! let err: XChainError = RegistryError::client_not_found("unknown").into();
//! assert_eq!(err.to_string(), "creator unknown not found");
//! ```

/// Top-level error type for the xchain layer.
///
/// Wraps every domain-specific error. Messages are forwarded verbatim so that
/// an error surfaced through the registry reads exactly like the domain error
/// it came from.
#[derive(Debug, thiserror::Error)]
pub enum XChainError {
    /// No capability registered for a protocol.
    #[error(transparent)]
    Registry(#[from] RegistryError),

    /// Malformed variant tag.
    #[error(transparent)]
    Variant(#[from] VariantError),

    /// Task dispatch failed.
    #[error(transparent)]
    Task(#[from] TaskError),

    /// Transaction construction failed.
    #[error(transparent)]
    Build(#[from] BuildError),

    /// Address derivation failed.
    #[error(transparent)]
    Address(#[from] AddressError),

    /// Signing failed.
    #[error(transparent)]
    Sign(#[from] SignError),

    /// Configuration failed.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Internal defect.
    #[error(transparent)]
    Defect(#[from] DefectError),
}

/// Result type alias using [`XChainError`].
pub type Result<T> = std::result::Result<T, XChainError>;

// ============================================================================
// RegistryError
// ============================================================================

/// Errors raised when a protocol has no registered capability.
///
/// Resolving never falls back to a default implementation; the protocol or
/// chain identifier is always embedded in the message.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RegistryError {
    /// No client constructor for the protocol.
    #[error("creator {protocol} not found")]
    ClientNotFound {
        /// The protocol that was requested.
        protocol: String,
    },

    /// No address builder constructor for the chain's protocol.
    #[error("no address builder defined for: {chain}")]
    AddressBuilderNotFound {
        /// The chain identifier from the configuration.
        chain: String,
    },

    /// No transaction builder constructor for the chain's protocol.
    #[error("no tx-builder defined for: {chain}")]
    TxBuilderNotFound {
        /// The chain identifier from the configuration.
        chain: String,
    },

    /// No signer constructor for the chain's protocol.
    #[error("no signer defined for: {chain}")]
    SignerNotFound {
        /// The chain identifier from the configuration.
        chain: String,
    },

    /// A capability was registered twice for the same protocol.
    #[error("{capability} already registered for protocol {protocol}")]
    AlreadyRegistered {
        /// The protocol being registered.
        protocol: String,
        /// The capability that was already present.
        capability: String,
    },
}

impl RegistryError {
    /// Create a [`RegistryError::ClientNotFound`] error.
    #[must_use]
    pub fn client_not_found(protocol: impl Into<String>) -> Self {
        Self::ClientNotFound {
            protocol: protocol.into(),
        }
    }

    /// Create a [`RegistryError::AddressBuilderNotFound`] error.
    #[must_use]
    pub fn address_builder_not_found(chain: impl Into<String>) -> Self {
        Self::AddressBuilderNotFound {
            chain: chain.into(),
        }
    }

    /// Create a [`RegistryError::TxBuilderNotFound`] error.
    #[must_use]
    pub fn tx_builder_not_found(chain: impl Into<String>) -> Self {
        Self::TxBuilderNotFound {
            chain: chain.into(),
        }
    }

    /// Create a [`RegistryError::SignerNotFound`] error.
    #[must_use]
    pub fn signer_not_found(chain: impl Into<String>) -> Self {
        Self::SignerNotFound {
            chain: chain.into(),
        }
    }

    /// Create a [`RegistryError::AlreadyRegistered`] error.
    #[must_use]
    pub fn already_registered(protocol: impl Into<String>, capability: impl Into<String>) -> Self {
        Self::AlreadyRegistered {
            protocol: protocol.into(),
            capability: capability.into(),
        }
    }
}

// ============================================================================
// VariantError
// ============================================================================

/// A transaction-input variant tag failed validation.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum VariantError {
    /// The tag does not have the `protocols/<protocol>/<operation>/<provider>` shape.
    #[error("invalid input variant type: {tag}")]
    InvalidVariant {
        /// The offending tag, verbatim.
        tag: String,
    },
}

impl VariantError {
    /// Create a [`VariantError::InvalidVariant`] error.
    #[must_use]
    pub fn invalid_variant(tag: impl Into<String>) -> Self {
        Self::InvalidVariant { tag: tag.into() }
    }
}

// ============================================================================
// TaskError
// ============================================================================

/// Errors raised while dispatching a non-transfer task.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TaskError {
    /// The task was matched but a required parameter is absent.
    #[error("must provide {param} in task '{asset_id}'")]
    MissingParameter {
        /// The missing parameter name.
        param: String,
        /// The task asset identifier.
        asset_id: String,
    },

    /// The task code matches no known operation.
    #[error("not implemented task: '{asset_id}'")]
    NotImplemented {
        /// The task asset identifier.
        asset_id: String,
    },

    /// The task code matches more than one known operation.
    #[error("ambiguous task '{asset_id}': matches {candidates}")]
    Ambiguous {
        /// The task asset identifier.
        asset_id: String,
        /// Comma separated list of matched operations.
        candidates: String,
    },
}

impl TaskError {
    /// Create a [`TaskError::MissingParameter`] error.
    #[must_use]
    pub fn missing_parameter(param: impl Into<String>, asset_id: impl Into<String>) -> Self {
        Self::MissingParameter {
            param: param.into(),
            asset_id: asset_id.into(),
        }
    }

    /// Create a [`TaskError::NotImplemented`] error.
    #[must_use]
    pub fn not_implemented(asset_id: impl Into<String>) -> Self {
        Self::NotImplemented {
            asset_id: asset_id.into(),
        }
    }

    /// Create a [`TaskError::Ambiguous`] error.
    #[must_use]
    pub fn ambiguous(asset_id: impl Into<String>, candidates: impl Into<String>) -> Self {
        Self::Ambiguous {
            asset_id: asset_id.into(),
            candidates: candidates.into(),
        }
    }
}

// ============================================================================
// DefectError
// ============================================================================

/// Registration or coverage bugs.
///
/// These never describe bad user input. They indicate that a supposedly
/// supported protocol is missing a capability, or that a builder was handed an
/// input it was never wired to accept.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DefectError {
    /// The capability matrix has no entry for a protocol that requires one.
    #[error("defect: protocol {protocol} has no {capability} defined")]
    MissingCapability {
        /// The protocol that was queried.
        protocol: String,
        /// The missing capability (signature algorithm, public key format).
        capability: String,
    },

    /// A transaction input of the wrong family or operation was supplied.
    #[error("defect: unexpected tx input: expected {expected}, got {actual}")]
    UnexpectedInput {
        /// What the builder expected.
        expected: String,
        /// What it was given.
        actual: String,
    },
}

impl DefectError {
    /// Create a [`DefectError::MissingCapability`] error.
    #[must_use]
    pub fn missing_capability(protocol: impl Into<String>, capability: impl Into<String>) -> Self {
        Self::MissingCapability {
            protocol: protocol.into(),
            capability: capability.into(),
        }
    }

    /// Create a [`DefectError::UnexpectedInput`] error.
    #[must_use]
    pub fn unexpected_input(expected: impl Into<String>, actual: impl Into<String>) -> Self {
        Self::UnexpectedInput {
            expected: expected.into(),
            actual: actual.into(),
        }
    }
}

// ============================================================================
// AddressError
// ============================================================================

/// Errors that can occur while deriving or decoding addresses.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AddressError {
    /// The public key has the wrong length or is not a valid curve point.
    #[error("invalid public key: {context}")]
    InvalidPublicKey {
        /// Description of the problem.
        context: String,
    },

    /// The address does not pass the chain's format check.
    #[error("invalid address {address}: {reason}")]
    InvalidFormat {
        /// The rejected address.
        address: String,
        /// Why it was rejected.
        reason: String,
    },

    /// Encoding the address failed.
    #[error("address encoding failed: {context}")]
    Encoding {
        /// Description of the problem.
        context: String,
    },

    /// Capability matrix defect.
    #[error(transparent)]
    Defect(#[from] DefectError),
}

impl AddressError {
    /// Create an [`AddressError::InvalidPublicKey`] error.
    #[must_use]
    pub fn invalid_public_key(context: impl Into<String>) -> Self {
        Self::InvalidPublicKey {
            context: context.into(),
        }
    }

    /// Create an [`AddressError::InvalidFormat`] error.
    #[must_use]
    pub fn invalid_format(address: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidFormat {
            address: address.into(),
            reason: reason.into(),
        }
    }

    /// Create an [`AddressError::Encoding`] error.
    #[must_use]
    pub fn encoding(context: impl Into<String>) -> Self {
        Self::Encoding {
            context: context.into(),
        }
    }
}

// ============================================================================
// BuildError
// ============================================================================

/// Errors that can occur while constructing a transaction.
#[derive(Debug, thiserror::Error)]
pub enum BuildError {
    /// A required argument or input field is missing or malformed.
    #[error("invalid input: {context}")]
    InvalidInput {
        /// Description of the problem.
        context: String,
    },

    /// The chain has no way to express the requested operation.
    #[error("{operation} is not supported on {chain}")]
    Unsupported {
        /// The requested operation.
        operation: String,
        /// The chain identifier.
        chain: String,
    },

    /// The supplied inputs cannot cover the amount plus fees.
    #[error("insufficient funds: required {required}, available {available}")]
    InsufficientFunds {
        /// Total required in the smallest unit.
        required: String,
        /// Total available in the smallest unit.
        available: String,
    },

    /// The transaction has not been built yet.
    #[error("transaction not initialized")]
    NotInitialized,

    /// A signature does not fit the transaction.
    #[error("invalid signature: {context}")]
    InvalidSignature {
        /// Description of the problem.
        context: String,
    },

    /// Serialising the transaction failed.
    #[error("encoding failed: {context}")]
    Encoding {
        /// Description of the problem.
        context: String,
    },

    /// Task dispatch failed.
    #[error(transparent)]
    Task(#[from] TaskError),

    /// An address in the arguments could not be decoded.
    #[error(transparent)]
    Address(#[from] AddressError),

    /// The input carries a malformed variant tag.
    #[error(transparent)]
    Variant(#[from] VariantError),

    /// Wiring defect.
    #[error(transparent)]
    Defect(#[from] DefectError),
}

impl BuildError {
    /// Create a [`BuildError::InvalidInput`] error.
    #[must_use]
    pub fn invalid_input(context: impl Into<String>) -> Self {
        Self::InvalidInput {
            context: context.into(),
        }
    }

    /// Create a [`BuildError::Unsupported`] error.
    #[must_use]
    pub fn unsupported(operation: impl Into<String>, chain: impl Into<String>) -> Self {
        Self::Unsupported {
            operation: operation.into(),
            chain: chain.into(),
        }
    }

    /// Create a [`BuildError::InsufficientFunds`] error.
    #[must_use]
    pub fn insufficient_funds(required: impl ToString, available: impl ToString) -> Self {
        Self::InsufficientFunds {
            required: required.to_string(),
            available: available.to_string(),
        }
    }

    /// Create a [`BuildError::InvalidSignature`] error.
    #[must_use]
    pub fn invalid_signature(context: impl Into<String>) -> Self {
        Self::InvalidSignature {
            context: context.into(),
        }
    }

    /// Create a [`BuildError::Encoding`] error.
    #[must_use]
    pub fn encoding(context: impl Into<String>) -> Self {
        Self::Encoding {
            context: context.into(),
        }
    }
}

// ============================================================================
// SignError
// ============================================================================

/// Errors that can occur during signing operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SignError {
    /// The secret could not be decoded or is not a valid scalar.
    #[error("invalid key material")]
    InvalidKey,

    /// The payload is not acceptable for the algorithm.
    #[error("invalid payload: {context}")]
    InvalidPayload {
        /// Description of the problem.
        context: String,
    },

    /// The signature computation failed.
    #[error("signature failed: {context}")]
    SignatureFailed {
        /// Description of the problem.
        context: String,
    },

    /// The counterparty key is not usable for key agreement.
    #[error("invalid counterparty key: {context}")]
    InvalidCounterpartyKey {
        /// Description of the problem.
        context: String,
    },

    /// Capability matrix defect.
    #[error(transparent)]
    Defect(#[from] DefectError),
}

impl SignError {
    /// Create a [`SignError::InvalidPayload`] error.
    #[must_use]
    pub fn invalid_payload(context: impl Into<String>) -> Self {
        Self::InvalidPayload {
            context: context.into(),
        }
    }

    /// Create a [`SignError::SignatureFailed`] error.
    #[must_use]
    pub fn signature_failed(context: impl Into<String>) -> Self {
        Self::SignatureFailed {
            context: context.into(),
        }
    }

    /// Create a [`SignError::InvalidCounterpartyKey`] error.
    #[must_use]
    pub fn invalid_counterparty_key(context: impl Into<String>) -> Self {
        Self::InvalidCounterpartyKey {
            context: context.into(),
        }
    }
}

// ============================================================================
// ConfigError
// ============================================================================

/// Errors that can occur while loading or validating configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Configuration file not found.
    #[error("configuration file not found: {path}")]
    FileNotFound {
        /// Path that was looked up.
        path: String,
    },

    /// Configuration could not be parsed or serialised.
    #[error("failed to parse configuration: {context}")]
    ParseFailed {
        /// Description of the problem.
        context: String,
    },

    /// A field holds an unusable value.
    #[error("invalid value for {field}: {reason}")]
    InvalidValue {
        /// Field name.
        field: String,
        /// Why it was rejected.
        reason: String,
    },

    /// No chain with the given identifier is configured.
    #[error("chain not configured: {chain}")]
    ChainNotConfigured {
        /// The chain identifier.
        chain: String,
    },

    /// The home directory cannot be determined.
    #[error("could not determine home directory")]
    NoHomeDirectory,

    /// I/O failure.
    #[error("{context}: {source}")]
    Io {
        /// What was being attempted.
        context: String,
        /// Underlying error.
        #[source]
        source: std::io::Error,
    },
}

impl ConfigError {
    /// Create a [`ConfigError::FileNotFound`] error.
    #[must_use]
    pub fn file_not_found(path: impl Into<String>) -> Self {
        Self::FileNotFound { path: path.into() }
    }

    /// Create a [`ConfigError::ParseFailed`] error.
    #[must_use]
    pub fn parse_failed(context: impl Into<String>) -> Self {
        Self::ParseFailed {
            context: context.into(),
        }
    }

    /// Create a [`ConfigError::InvalidValue`] error.
    #[must_use]
    pub fn invalid_value(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidValue {
            field: field.into(),
            reason: reason.into(),
        }
    }

    /// Create a [`ConfigError::ChainNotConfigured`] error.
    #[must_use]
    pub fn chain_not_configured(chain: impl Into<String>) -> Self {
        Self::ChainNotConfigured {
            chain: chain.into(),
        }
    }

    /// Create a [`ConfigError::NoHomeDirectory`] error.
    #[must_use]
    pub const fn no_home_directory() -> Self {
        Self::NoHomeDirectory
    }

    /// Create a [`ConfigError::Io`] error.
    #[must_use]
    pub fn io(context: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            context: context.into(),
            source,
        }
    }
}
