//! # Route Executor
//!
//! Drives the steps of a route one after another through the user's wallet.

use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use super::step::TransactionStep;
use crate::config::StepConfig;
use crate::domain::{ChainId, NextTx, RouteStatus, StepError, TxHash, TxPayload};
use crate::ports::{AddressAllowlist, RemoteBridgeApi, TransactionSender, TransactionStepApi};

/// Result of executing a route.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RouteOutcome {
    /// Every step completed.
    Completed {
        /// Terminal status of each step, in route order.
        statuses: Vec<RouteStatus>,
    },
    /// A step ended in a non-completed terminal status; later steps were
    /// not attempted.
    Halted {
        /// Step that stopped the route.
        user_tx_index: u32,
        /// Status it ended with.
        status: RouteStatus,
    },
}

/// Route executor - sequential driver for route steps.
pub struct RouteExecutor<A: ?Sized, L: ?Sized, S: ?Sized> {
    api: Arc<A>,
    allowlist: Arc<L>,
    sender: Arc<S>,
    config: StepConfig,
}

impl<A, L, S> RouteExecutor<A, L, S>
where
    A: RemoteBridgeApi + ?Sized,
    L: AddressAllowlist + ?Sized,
    S: TransactionSender + ?Sized,
{
    /// Create a new executor.
    pub fn new(api: Arc<A>, allowlist: Arc<L>, sender: Arc<S>, config: StepConfig) -> Self {
        Self {
            api,
            allowlist,
            sender,
            config,
        }
    }

    /// Build a step sharing this executor's collaborators.
    pub fn step(&self, next_tx: NextTx) -> TransactionStep<A, L> {
        TransactionStep::with_config(
            next_tx,
            self.config.clone(),
            Arc::clone(&self.api),
            Arc::clone(&self.allowlist),
        )
    }

    /// Execute one step: approve if needed, send, then poll to a terminal
    /// status.
    pub async fn execute_step(
        &self,
        next_tx: NextTx,
        cancel: &CancellationToken,
    ) -> Result<RouteStatus, StepError> {
        let mut step = self.step(next_tx);
        let chain_id = step.chain_id();

        if let Some(approval) = step.get_approve_transaction().await? {
            debug!(
                "[bridge-step] Sending approval for step {} on chain {}",
                step.user_tx_index(),
                chain_id
            );
            self.send(chain_id, &approval, cancel).await?;
        }

        let send = step.get_send_transaction()?;
        let hash = self.send(chain_id, &send, cancel).await?;

        step.submit(hash, cancel).await
    }

    /// Hand a payload to the wallet, giving up if the route is cancelled
    /// before it is mined.
    async fn send(
        &self,
        chain_id: ChainId,
        payload: &TxPayload,
        cancel: &CancellationToken,
    ) -> Result<TxHash, StepError> {
        tokio::select! {
            biased;
            _ = cancel.cancelled() => Err(StepError::Cancelled),
            sent = self.sender.send_transaction(chain_id, payload) => sent.map_err(StepError::Sender),
        }
    }

    /// Execute every step in order, stopping at the first step that does not
    /// complete.
    pub async fn execute<I>(
        &self,
        steps: I,
        cancel: &CancellationToken,
    ) -> Result<RouteOutcome, StepError>
    where
        I: IntoIterator<Item = NextTx>,
    {
        let mut statuses = Vec::new();

        for next_tx in steps {
            if cancel.is_cancelled() {
                return Err(StepError::Cancelled);
            }

            let user_tx_index = next_tx.user_tx_index;
            let status = self.execute_step(next_tx, cancel).await?;

            if status != RouteStatus::Completed {
                info!(
                    "[bridge-step] Route halted at step {} with status {}",
                    user_tx_index, status
                );
                return Ok(RouteOutcome::Halted {
                    user_tx_index,
                    status,
                });
            }
            statuses.push(status);
        }

        info!("[bridge-step] Route completed ({} steps)", statuses.len());
        Ok(RouteOutcome::Completed { statuses })
    }
}
