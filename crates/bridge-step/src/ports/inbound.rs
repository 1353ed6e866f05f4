//! # Inbound Ports
//!
//! API trait defining what a route step can do.

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

use crate::domain::{ApprovalTxPayload, RouteStatus, SendTxPayload, StepError, TxHash};

/// Route step API - inbound port.
///
/// All operations are driven sequentially by the single caller that owns
/// the step.
#[async_trait]
pub trait TransactionStepApi: Send {
    /// Whether an approval transaction must be executed first.
    ///
    /// Always opens the gate for [`Self::get_send_transaction`].
    async fn approval_required(&mut self) -> Result<bool, StepError>;

    /// Approval transaction to execute, if one is required.
    async fn get_approve_transaction(&mut self) -> Result<Option<ApprovalTxPayload>, StepError>;

    /// Validated send transaction.
    fn get_send_transaction(&self) -> Result<SendTxPayload, StepError>;

    /// Record the on-chain hash and poll until the step is terminal.
    async fn submit(
        &mut self,
        hash: TxHash,
        cancel: &CancellationToken,
    ) -> Result<RouteStatus, StepError>;
}
