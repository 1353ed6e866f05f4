//! # Domain Invariants
//!
//! Business rules for route step execution.

use super::errors::{SequenceError, StepError, ValidationError};
use super::value_objects::{Address, ChainId, TokenAmount, UserTxType};

/// Default status poll period in milliseconds.
pub const DEFAULT_STATUS_CHECK_INTERVAL_MS: u64 = 10_000;

/// Invariant: Approval precedes send.
///
/// The send transaction may only be built once the approval requirement
/// has been evaluated, whether or not an approval was needed.
pub fn invariant_approval_checked(approval_checked: bool) -> Result<(), StepError> {
    if !approval_checked {
        return Err(SequenceError::ApprovalNotChecked.into());
    }
    Ok(())
}

/// Invariant: Allowance sufficiency.
///
/// Approval is required iff the current allowance is strictly below the
/// minimum. Compared as unsigned 256-bit integers.
pub fn invariant_allowance_insufficient(allowance: &TokenAmount, minimum: &TokenAmount) -> bool {
    allowance < minimum
}

/// Invariant: Known destination.
///
/// Routed-funds transactions must target an allow-listed contract on their
/// chain. Other categories pass unchecked.
pub fn invariant_known_destination(
    user_tx_type: UserTxType,
    chain_id: ChainId,
    destination: &Address,
    is_known: impl FnOnce(ChainId, &Address) -> bool,
) -> Result<(), StepError> {
    if !user_tx_type.is_routed_funds() {
        return Ok(());
    }
    if !is_known(chain_id, destination) {
        return Err(ValidationError::UnknownDestination {
            address: destination.clone(),
            chain_id,
        }
        .into());
    }
    Ok(())
}
