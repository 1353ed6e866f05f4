//! # Transaction Step
//!
//! One on-chain transaction of a route: approval check, approval/send
//! building, hash submission and status polling.
//!
//! ```text
//! Unsubmitted ──submit(hash)──▶ Pending ──status != PENDING──▶ Done(status)
//!                                  │  ▲
//!                                  └──┘ wait status_check_interval
//! ```

use async_trait::async_trait;
use bridge_telemetry::{log_step_event, log_tx_event, metric_inc};
use bridge_telemetry::{APPROVAL_CHECKS, DESTINATIONS_REJECTED, STATUS_REPORTS, STEPS_FINISHED};
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

use crate::config::StepConfig;
use crate::domain::{
    invariant_allowance_insufficient, invariant_approval_checked, invariant_known_destination,
    ApprovalTxPayload, ChainId, NextTx, RouteStatus, SendTxPayload, StepError, StepProgress,
    StepState, TxHash, TxPayload, UserTxType,
};
use crate::ports::{AddressAllowlist, RemoteBridgeApi, TransactionStepApi};

/// A single user transaction of an active route.
///
/// Holds an immutable snapshot of the planning data next to its own
/// lifecycle record. Not meant to be shared between callers: every mutating
/// operation takes `&mut self`.
pub struct TransactionStep<A: ?Sized, L: ?Sized> {
    /// Planning data, never modified.
    next_tx: NextTx,
    /// Poll period and friends.
    config: StepConfig,
    /// Approval gate, hash and polling state.
    progress: StepProgress,
    /// Remote bridge API.
    api: Arc<A>,
    /// Known bridge contracts.
    allowlist: Arc<L>,
}

impl<A, L> TransactionStep<A, L>
where
    A: RemoteBridgeApi + ?Sized,
    L: AddressAllowlist + ?Sized,
{
    /// Create a step with the default 10s poll period.
    pub fn new(next_tx: NextTx, api: Arc<A>, allowlist: Arc<L>) -> Self {
        Self::with_config(next_tx, StepConfig::default(), api, allowlist)
    }

    /// Create a step with an explicit configuration.
    pub fn with_config(next_tx: NextTx, config: StepConfig, api: Arc<A>, allowlist: Arc<L>) -> Self {
        Self {
            next_tx,
            config,
            progress: StepProgress::new(),
            api,
            allowlist,
        }
    }

    /// Planning data this step was built from.
    pub fn next_tx(&self) -> &NextTx {
        &self.next_tx
    }

    /// Chain the step executes on.
    pub fn chain_id(&self) -> ChainId {
        self.next_tx.chain_id
    }

    /// Transaction category.
    pub fn user_tx_type(&self) -> UserTxType {
        self.next_tx.user_tx_type
    }

    /// Position of the step within its route.
    pub fn user_tx_index(&self) -> u32 {
        self.next_tx.user_tx_index
    }

    /// Active route on the remote service.
    pub fn active_route_id(&self) -> u64 {
        self.next_tx.active_route_id
    }

    /// Poll period while pending.
    pub fn status_check_interval(&self) -> Duration {
        self.config.status_check_interval()
    }

    /// Whether the approval requirement has been evaluated.
    pub fn approval_checked(&self) -> bool {
        self.progress.approval_checked()
    }

    /// Submitted hash, if any.
    pub fn hash(&self) -> Option<&TxHash> {
        self.progress.hash()
    }

    /// Whether a terminal status was observed.
    pub fn is_done(&self) -> bool {
        self.progress.is_done()
    }

    /// Current lifecycle state.
    pub fn state(&self) -> StepState {
        self.progress.state()
    }

    /// Reject routed-funds transactions whose destination is not a known
    /// bridge contract on this chain.
    pub fn validate_send(&self, candidate: &TxPayload) -> Result<(), StepError> {
        let result = invariant_known_destination(
            self.next_tx.user_tx_type,
            self.next_tx.chain_id,
            &candidate.to,
            |chain_id, address| self.allowlist.is_known(chain_id, address),
        );
        if result.is_err() {
            metric_inc!(DESTINATIONS_REJECTED);
        }
        result
    }

    /// Report the hash and read back the step status.
    async fn report_status(&self, hash: &TxHash) -> Result<RouteStatus, StepError> {
        metric_inc!(STATUS_REPORTS);
        let status = self
            .api
            .report_tx_hash(self.next_tx.active_route_id, self.next_tx.user_tx_index, hash)
            .await?;
        Ok(status)
    }
}

#[async_trait]
impl<A, L> TransactionStepApi for TransactionStep<A, L>
where
    A: RemoteBridgeApi + ?Sized,
    L: AddressAllowlist + ?Sized,
{
    async fn approval_required(&mut self) -> Result<bool, StepError> {
        self.progress.mark_approval_checked();

        let Some(approval) = &self.next_tx.approval_data else {
            metric_inc!(APPROVAL_CHECKS, &["not_applicable"]);
            return Ok(false);
        };

        let allowance = self
            .api
            .fetch_allowance(
                self.next_tx.chain_id,
                &approval.owner,
                &approval.allowance_target,
                &approval.approval_token_address,
            )
            .await?;

        let required =
            invariant_allowance_insufficient(&allowance.value, &approval.minimum_approval_amount);

        metric_inc!(
            APPROVAL_CHECKS,
            &[if required { "required" } else { "sufficient" }]
        );
        log_step_event!(
            debug,
            "[bridge-step] Approval evaluated",
            self.next_tx.active_route_id,
            self.next_tx.user_tx_index,
            allowance = %allowance.value,
            minimum = %approval.minimum_approval_amount,
            required = required
        );

        Ok(required)
    }

    async fn get_approve_transaction(&mut self) -> Result<Option<ApprovalTxPayload>, StepError> {
        if !self.approval_required().await? {
            return Ok(None);
        }

        let Some(approval) = &self.next_tx.approval_data else {
            return Ok(None);
        };

        let payload = self
            .api
            .fetch_approval_calldata(
                self.next_tx.chain_id,
                &approval.allowance_target,
                &approval.minimum_approval_amount,
                &approval.owner,
                &approval.approval_token_address,
            )
            .await?;

        Ok(Some(payload))
    }

    fn get_send_transaction(&self) -> Result<SendTxPayload, StepError> {
        invariant_approval_checked(self.progress.approval_checked())?;

        let tx = TxPayload {
            to: self.next_tx.tx_target.clone(),
            data: self.next_tx.tx_data.clone(),
            value: Some(self.next_tx.value.clone()),
            from: None,
        };

        self.validate_send(&tx)?;

        Ok(tx)
    }

    async fn submit(
        &mut self,
        hash: TxHash,
        cancel: &CancellationToken,
    ) -> Result<RouteStatus, StepError> {
        self.progress.record_hash(
            hash.clone(),
            self.next_tx.user_tx_index,
            self.next_tx.user_tx_type,
        )?;

        log_tx_event!(
            info,
            "[bridge-step] Hash submitted, polling route status",
            hash,
            route_id = self.next_tx.active_route_id,
            user_tx_index = self.next_tx.user_tx_index
        );

        let interval = self.config.status_check_interval();

        loop {
            let status = tokio::select! {
                biased;
                _ = cancel.cancelled() => return Err(StepError::Cancelled),
                status = self.report_status(&hash) => status?,
            };

            if status.is_terminal() {
                self.progress.finish(status.clone());
                metric_inc!(STEPS_FINISHED, &[status.as_str()]);
                log_step_event!(
                    info,
                    "[bridge-step] Step reached terminal status",
                    self.next_tx.active_route_id,
                    self.next_tx.user_tx_index,
                    status = %status
                );
                return Ok(status);
            }

            log_step_event!(
                debug,
                "[bridge-step] Step pending, waiting",
                self.next_tx.active_route_id,
                self.next_tx.user_tx_index,
                wait_ms = self.config.status_check_interval_ms
            );

            tokio::select! {
                biased;
                _ = cancel.cancelled() => return Err(StepError::Cancelled),
                _ = tokio::time::sleep(interval) => {}
            }
        }
    }
}
