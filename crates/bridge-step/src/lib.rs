//! # Bridge Route Step
//!
//! One transaction of a multi-step bridge route: approval, send, and
//! status tracking against the remote bridge API.
//!
//! **Architecture:** Hexagonal (DDD + Ports/Adapters)
//!
//! ## Purpose
//!
//! Drive a single user transaction of a bridge route to a terminal status:
//! - Decide whether an ERC-20 approval is needed (U256 allowance check)
//! - Build the approval and send payloads for the user's wallet
//! - Refuse routed-funds sends to contracts outside the allow-list
//! - Report the mined hash and poll until the route leaves `PENDING`
//!
//! ## Step Ordering
//!
//! | Operation | Requires |
//! |-----------|----------|
//! | `approval_required` | - |
//! | `get_approve_transaction` | - |
//! | `get_send_transaction` | approval evaluated |
//! | `submit` | no hash recorded yet |
//!
//! ## Module Structure
//!
//! ```text
//! bridge-step/
//! ├── domain/          # NextTx, StepProgress, TokenAmount, errors
//! ├── ports/           # TransactionStepApi, RemoteBridgeApi, TransactionSender
//! ├── adapters/        # StaticAllowlist
//! ├── application/     # TransactionStep, RouteExecutor
//! └── config.rs        # StepConfig
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;

// Re-exports
pub use adapters::{AllowlistError, StaticAllowlist};
pub use application::{RouteExecutor, RouteOutcome, TransactionStep};
pub use config::StepConfig;
pub use domain::{
    invariant_allowance_insufficient, invariant_approval_checked, invariant_known_destination,
    Address, AmountParseError, ApprovalData, ApprovalTxPayload, ChainId, NextTx, RemoteError,
    RouteStatus, SendTxPayload, SequenceError, StepError, StepProgress, StepState,
    TokenAllowance, TokenAmount, TxHash, TxPayload, UserTxType, ValidationError,
    DEFAULT_STATUS_CHECK_INTERVAL_MS,
};
pub use ports::{
    AddressAllowlist, MockBridgeApi, MockTransactionSender, RecordedReport, RemoteBridgeApi,
    TransactionSender, TransactionStepApi,
};
pub use tokio_util::sync::CancellationToken;

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
