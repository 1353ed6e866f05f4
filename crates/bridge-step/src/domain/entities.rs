//! # Domain Entities
//!
//! Planning data for one user transaction and the mutable lifecycle record
//! that tracks it.

use serde::{Deserialize, Serialize};

use super::errors::{SequenceError, StepError};
use super::value_objects::{Address, ChainId, RouteStatus, StepState, TokenAmount, TxHash, UserTxType};

/// ERC-20 approval that may be needed before the send transaction.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApprovalData {
    /// Token owner (the user's wallet).
    pub owner: Address,
    /// Spender that must hold the allowance.
    pub allowance_target: Address,
    /// Token contract.
    pub approval_token_address: Address,
    /// Smallest allowance that lets the send transaction succeed.
    pub minimum_approval_amount: TokenAmount,
}

/// Next user transaction of an active route, as returned by the planning API.
///
/// Immutable once received; a step keeps it as a snapshot.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NextTx {
    /// Chain the transaction executes on.
    pub chain_id: ChainId,
    /// Transaction category.
    pub user_tx_type: UserTxType,
    /// Wallet method to use, e.g. `eth_sendTransaction`.
    #[serde(default)]
    pub tx_type: Option<String>,
    /// Call target.
    pub tx_target: Address,
    /// Call data.
    pub tx_data: String,
    /// Native value, hex encoded.
    pub value: String,
    /// Approval requirement, if the step spends an ERC-20.
    #[serde(default)]
    pub approval_data: Option<ApprovalData>,
    /// Active route on the remote service.
    pub active_route_id: u64,
    /// Position of this transaction within the route.
    pub user_tx_index: u32,
    /// Number of user transactions in the route.
    #[serde(default)]
    pub total_user_tx: Option<u32>,
}

/// Unsigned transaction the caller executes through their wallet.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TxPayload {
    /// Destination contract.
    pub to: Address,
    /// Call data.
    pub data: String,
    /// Native value, hex encoded.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
    /// Expected signer, when the remote API includes it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub from: Option<Address>,
}

/// Approval transaction built by the remote API.
pub type ApprovalTxPayload = TxPayload;

/// Send transaction built from the planning data.
pub type SendTxPayload = TxPayload;

/// Allowance granted by an owner to a spender.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenAllowance {
    /// Current allowance.
    pub value: TokenAmount,
}

/// Mutable lifecycle of a step.
///
/// Holds the approval gate, the write-once hash and the polling state.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct StepProgress {
    approval_checked: bool,
    hash: Option<TxHash>,
    state: StepState,
}

impl StepProgress {
    /// Fresh, unsubmitted progress.
    pub fn new() -> Self {
        Self::default()
    }

    /// Open the gate for building the send transaction.
    pub fn mark_approval_checked(&mut self) {
        self.approval_checked = true;
    }

    /// Whether the approval requirement has been evaluated.
    pub fn approval_checked(&self) -> bool {
        self.approval_checked
    }

    /// Recorded hash, if submitted.
    pub fn hash(&self) -> Option<&TxHash> {
        self.hash.as_ref()
    }

    /// Current lifecycle state.
    pub fn state(&self) -> StepState {
        self.state.clone()
    }

    /// Whether a terminal status was observed.
    pub fn is_done(&self) -> bool {
        self.state.is_terminal()
    }

    /// Record the hash and enter `Pending`.
    ///
    /// Fails if a hash is already recorded; the stored hash is untouched.
    pub fn record_hash(
        &mut self,
        hash: TxHash,
        user_tx_index: u32,
        user_tx_type: UserTxType,
    ) -> Result<(), StepError> {
        if let Some(existing) = &self.hash {
            return Err(SequenceError::HashAlreadySet {
                user_tx_index,
                user_tx_type,
                hash: existing.clone(),
            }
            .into());
        }
        self.hash = Some(hash);
        self.state = StepState::Pending;
        Ok(())
    }

    /// Enter `Done(status)`. Ignored unless currently pending.
    pub fn finish(&mut self, status: RouteStatus) {
        let next = StepState::Done(status);
        if self.state.can_transition_to(&next) {
            self.state = next;
        }
    }
}
