//! The transaction construction contract and staking task dispatch.
//!
//! A [`TxBuilder`] turns [`TransferArgs`] plus chain state ([`TxInput`]) into
//! an unsigned [`Tx`]. The caller then collects [`Tx::sighashes`], has them
//! signed, attaches the signatures with [`Tx::add_signatures`] and finally
//! [`Tx::serialize`]s the result for broadcast.
//!
//! # Task dispatch
//!
//! A transfer whose asset is a [`TaskConfig`] is a staking task. The task's
//! operation is its explicit [`TaskConfig::operation`] if set, otherwise the
//! one [`TaskRoute`] whose prefix the task code starts with:
//!
//! ```rust
//! use xchain_chain::builder::{dispatch_task, TaskRoute};
//! use xchain_core::{NativeAsset, Operation, TaskConfig};
//!
//! const ROUTES: &[TaskRoute] = &[
//!     TaskRoute::new("CosmosDelegateOperator", Operation::Staking),
//!     TaskRoute::new("CosmosUndelegateOperator", Operation::Unstaking),
//! ];
//!
//! let task = TaskConfig::new("CosmosUndelegateOperatorKiln", NativeAsset::Atom);
//! assert_eq!(dispatch_task(&task, ROUTES).expect("routed"), Operation::Unstaking);
//!
//! let unknown = TaskConfig::new("SomeUnknownTask", NativeAsset::Atom);
//! assert_eq!(
//!     dispatch_task(&unknown, ROUTES).unwrap_err().to_string(),
//!     "not implemented task: 'SomeUnknownTask'"
//! );
//! ```

use std::fmt;

use alloy_primitives::U256;
use xchain_core::asset::{AssetConfig, TaskConfig, TokenAssetConfig};
use xchain_core::config::ChainConfig;
use xchain_core::error::{BuildError, TaskError};
use xchain_core::types::{SighashPayload, TransferArgs, TxHash, TxSignature};
use xchain_core::variant::{InputKind, Operation};

use crate::input::TxInput;

// ============================================================================
// Contracts
// ============================================================================

/// A transaction under construction.
pub trait Tx: Send + Sync + fmt::Debug {
    /// The transaction hash in the chain's display encoding.
    ///
    /// Empty while the chain cannot compute it yet.
    fn hash(&self) -> TxHash;

    /// Payloads to sign, one per required signature.
    ///
    /// # Errors
    ///
    /// Returns [`BuildError::NotInitialized`] on an empty transaction.
    fn sighashes(&self) -> Result<Vec<SighashPayload>, BuildError>;

    /// Attach signatures in [`sighashes`](Self::sighashes) order.
    ///
    /// # Errors
    ///
    /// Returns [`BuildError::NotInitialized`] on an empty transaction or
    /// [`BuildError::InvalidSignature`] if the count or format is wrong.
    fn add_signatures(&mut self, signatures: &[TxSignature]) -> Result<(), BuildError>;

    /// Wire bytes ready for broadcast.
    ///
    /// # Errors
    ///
    /// Returns [`BuildError::NotInitialized`] on an empty transaction or
    /// [`BuildError::Encoding`] if serialisation fails.
    fn serialize(&self) -> Result<Vec<u8>, BuildError>;
}

/// Builds transactions for one chain.
///
/// Builders never mutate their arguments. Implementations hold only an
/// immutable [`ChainConfig`] and are shared across threads.
pub trait TxBuilder: Send + Sync + fmt::Debug {
    /// Route on the asset: tokens to [`new_token_transfer`](Self::new_token_transfer),
    /// tasks to [`new_task`](Self::new_task), everything else to
    /// [`new_native_transfer`](Self::new_native_transfer).
    ///
    /// # Errors
    ///
    /// Whatever the selected operation returns.
    fn new_transfer(&self, args: &TransferArgs, input: &TxInput) -> Result<Box<dyn Tx>, BuildError> {
        match args.asset() {
            Some(AssetConfig::Token(_)) => self.new_token_transfer(args, input),
            Some(AssetConfig::Task(_)) => self.new_task(args, input),
            Some(AssetConfig::Native) | None => self.new_native_transfer(args, input),
        }
    }

    /// Transfer of the chain's native coin.
    ///
    /// # Errors
    ///
    /// Returns a [`BuildError`] if the arguments or input are unusable.
    fn new_native_transfer(
        &self,
        args: &TransferArgs,
        input: &TxInput,
    ) -> Result<Box<dyn Tx>, BuildError>;

    /// Transfer of a token.
    ///
    /// # Errors
    ///
    /// Returns a [`BuildError`] if the arguments or input are unusable.
    fn new_token_transfer(
        &self,
        args: &TransferArgs,
        input: &TxInput,
    ) -> Result<Box<dyn Tx>, BuildError>;

    /// Staking task.
    ///
    /// # Errors
    ///
    /// The default rejects every task with [`TaskError::NotImplemented`].
    fn new_task(&self, args: &TransferArgs, _input: &TxInput) -> Result<Box<dyn Tx>, BuildError> {
        let id = args.asset().map_or("", AssetConfig::id);
        Err(TaskError::not_implemented(id).into())
    }
}

// ============================================================================
// Task dispatch
// ============================================================================

/// Maps a task-code prefix to the operation it performs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TaskRoute {
    /// Task code prefix.
    pub prefix: &'static str,
    /// Operation performed by matching tasks.
    pub operation: Operation,
}

impl TaskRoute {
    /// Route `prefix` to `operation`.
    #[must_use]
    pub const fn new(prefix: &'static str, operation: Operation) -> Self {
        Self { prefix, operation }
    }
}

/// Select the operation a task performs.
///
/// # Errors
///
/// - [`TaskError::NotImplemented`] if nothing matches, or the explicit
///   operation has no route on this chain
/// - [`TaskError::Ambiguous`] if prefixes of different operations match
pub fn dispatch_task(task: &TaskConfig, routes: &[TaskRoute]) -> Result<Operation, TaskError> {
    if let Some(explicit) = task.operation {
        let operation = explicit.operation();
        return if routes.iter().any(|r| r.operation == operation) {
            Ok(operation)
        } else {
            Err(TaskError::not_implemented(&task.code))
        };
    }

    let mut matched: Vec<&TaskRoute> = routes
        .iter()
        .filter(|r| task.code.starts_with(r.prefix))
        .collect();

    match matched.as_slice() {
        [] => Err(TaskError::not_implemented(&task.code)),
        [route] => Ok(route.operation),
        many => {
            let mut operations: Vec<&str> = many.iter().map(|r| r.operation.as_str()).collect();
            operations.sort_unstable();
            operations.dedup();
            if operations.len() == 1 {
                Ok(many[0].operation)
            } else {
                Err(TaskError::ambiguous(&task.code, operations.join(", ")))
            }
        }
    }
}

/// Read a task parameter from the task's own defaults, then the chain's.
///
/// # Errors
///
/// Returns [`TaskError::MissingParameter`] naming `key` and the task if
/// neither defines it.
pub fn task_param<'a>(
    task: &'a TaskConfig,
    chain: &'a ChainConfig,
    key: &str,
) -> Result<&'a str, TaskError> {
    task.param(key)
        .or_else(|| chain.param(key))
        .ok_or_else(|| TaskError::missing_parameter(key, &task.code))
}

/// The task configuration of `args`.
///
/// # Errors
///
/// Returns [`BuildError::InvalidInput`] if the asset is not a task.
pub fn require_task(args: &TransferArgs) -> Result<&TaskConfig, BuildError> {
    args.asset()
        .and_then(AssetConfig::as_task)
        .ok_or_else(|| BuildError::invalid_input("transfer asset is not a task"))
}

/// The token configuration of `args`.
///
/// # Errors
///
/// Returns [`BuildError::InvalidInput`] if the asset is not a token.
pub fn require_token(args: &TransferArgs) -> Result<&TokenAssetConfig, BuildError> {
    args.asset()
        .and_then(AssetConfig::as_token)
        .ok_or_else(|| BuildError::invalid_input("transfer asset is not a token"))
}

/// Check that `input` can carry `operation`.
///
/// Plain inputs are accepted for every operation; a staking-family input
/// must carry a valid tag for the same operation.
///
/// # Errors
///
/// Returns [`BuildError::Variant`] on a malformed tag or
/// [`BuildError::Defect`] if the input kind belongs to another operation.
pub fn check_input_kind(input: &TxInput, operation: Operation) -> Result<(), BuildError> {
    if input.kind == InputKind::Transfer {
        return Ok(());
    }
    input.kind.validate()?;
    if input.kind.operation() == operation {
        Ok(())
    } else {
        Err(xchain_core::DefectError::unexpected_input(
            format!("{} input", operation.as_str()),
            format!("{} input", input.kind.operation().as_str()),
        )
        .into())
    }
}

/// Narrow an amount to `u64`.
///
/// # Errors
///
/// Returns [`BuildError::InvalidInput`] if the amount does not fit.
pub fn amount_u64(amount: U256) -> Result<u64, BuildError> {
    u64::try_from(amount)
        .map_err(|_| BuildError::invalid_input(format!("amount {amount} exceeds u64")))
}
