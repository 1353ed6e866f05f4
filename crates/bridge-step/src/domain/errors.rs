//! # Domain Errors
//!
//! Error types for route step execution.
//!
//! Sequencing and validation failures are caller bugs or policy rejections
//! and are fatal to the step. Remote failures are passed through untouched.

use thiserror::Error;

use super::value_objects::{Address, ChainId, TxHash, UserTxType};

/// A decimal token amount that did not parse.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Invalid token amount: {0:?}")]
pub struct AmountParseError(pub String);

/// An operation was invoked out of the required order.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SequenceError {
    /// The send transaction was requested before the approval check.
    #[error("Approval not checked. Check `get_approve_transaction` before attempting to send")]
    ApprovalNotChecked,

    /// `submit` was called on a step that already has a hash.
    #[error("The transaction step {user_tx_index}: {user_tx_type} has hash already set to {hash}")]
    HashAlreadySet {
        /// Position of the step in the route
        user_tx_index: u32,
        /// Category of the step
        user_tx_type: UserTxType,
        /// Hash recorded by the first submission
        hash: TxHash,
    },
}

/// A constructed transaction failed destination validation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// Routed-funds destination is not a known registry contract.
    #[error("{address} is not a recognised bridge address on chain {chain_id}")]
    UnknownDestination {
        /// Offending destination
        address: Address,
        /// Chain the step executes on
        chain_id: ChainId,
    },
}

/// Failure reported by the remote bridge API client.
///
/// Produced by the external client adapter; the step never inspects or
/// rewrites it.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RemoteError {
    /// Request never produced a response.
    #[error("Transport error: {0}")]
    Transport(String),

    /// Remote answered with an error status.
    #[error("API error {status}: {message}")]
    Api {
        /// HTTP-like status code
        status: u16,
        /// Error body
        message: String,
    },

    /// Response could not be decoded.
    #[error("Decode error: {0}")]
    Decode(String),
}

/// Route step error types.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StepError {
    /// Operation invoked out of order.
    #[error(transparent)]
    Sequence(#[from] SequenceError),

    /// Destination validation failed.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// Remote bridge API failure, unmodified.
    #[error(transparent)]
    Remote(#[from] RemoteError),

    /// Wallet failed to broadcast a transaction.
    #[error("Transaction sender failed: {0}")]
    Sender(RemoteError),

    /// Polling aborted by the caller.
    #[error("Status polling cancelled")]
    Cancelled,
}

impl StepError {
    /// Whether the error is a caller ordering bug.
    pub fn is_sequence(&self) -> bool {
        matches!(self, Self::Sequence(_))
    }

    /// Whether the error is a destination validation failure.
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }
}
