//! # Outbound Ports
//!
//! Traits for external dependencies (remote bridge API, address registry,
//! wallet).

use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use crate::domain::{
    Address, ApprovalTxPayload, ChainId, RemoteError, RouteStatus, TokenAllowance, TokenAmount,
    TxHash, TxPayload,
};

/// Remote bridge API - outbound port.
///
/// Implemented by the generated HTTP client; transport, auth and request
/// retries live behind this trait.
#[async_trait]
pub trait RemoteBridgeApi: Send + Sync {
    /// Allowance of `token_address` granted by `owner` to `allowance_target`.
    async fn fetch_allowance(
        &self,
        chain_id: ChainId,
        owner: &Address,
        allowance_target: &Address,
        token_address: &Address,
    ) -> Result<TokenAllowance, RemoteError>;

    /// Build the approval call data for `amount`.
    async fn fetch_approval_calldata(
        &self,
        chain_id: ChainId,
        allowance_target: &Address,
        amount: &TokenAmount,
        owner: &Address,
        token_address: &Address,
    ) -> Result<ApprovalTxPayload, RemoteError>;

    /// Associate `tx_hash` with a route step and read back its status.
    async fn report_tx_hash(
        &self,
        active_route_id: u64,
        user_tx_index: u32,
        tx_hash: &TxHash,
    ) -> Result<RouteStatus, RemoteError>;
}

/// Registry of known bridge contracts - outbound port.
pub trait AddressAllowlist: Send + Sync {
    /// Whether `address` is a known contract on `chain_id`.
    fn is_known(&self, chain_id: ChainId, address: &Address) -> bool;
}

/// User wallet - outbound port.
///
/// Signs and broadcasts a payload, resolving once the transaction is mined.
#[async_trait]
pub trait TransactionSender: Send + Sync {
    /// Send `payload` on `chain_id` and return its hash.
    async fn send_transaction(
        &self,
        chain_id: ChainId,
        payload: &TxPayload,
    ) -> Result<TxHash, RemoteError>;
}

// =============================================================================
// Mock Implementations for Testing
// =============================================================================

/// A status report received by [`MockBridgeApi`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RecordedReport {
    /// Route the report was for.
    pub active_route_id: u64,
    /// Step index the report was for.
    pub user_tx_index: u32,
    /// Reported hash.
    pub tx_hash: TxHash,
    /// Time of the report.
    pub at: tokio::time::Instant,
}

/// Scriptable remote bridge API for testing.
///
/// Status reports are answered from a queue; an exhausted queue answers
/// with a transport error.
#[derive(Default)]
pub struct MockBridgeApi {
    allowance: Mutex<Option<Result<TokenAmount, RemoteError>>>,
    statuses: Mutex<VecDeque<Result<RouteStatus, RemoteError>>>,
    report_delay: Option<Duration>,
    reports: Mutex<Vec<RecordedReport>>,
    allowance_calls: AtomicUsize,
    calldata_calls: AtomicUsize,
}

impl MockBridgeApi {
    /// Create a mock with zero allowance and no scripted statuses.
    pub fn new() -> Self {
        Self::default()
    }

    /// Answer allowance queries with `amount`.
    pub fn with_allowance(self, amount: impl Into<TokenAmount>) -> Self {
        *self.allowance.lock() = Some(Ok(amount.into()));
        self
    }

    /// Fail allowance queries with `error`.
    pub fn with_allowance_error(self, error: RemoteError) -> Self {
        *self.allowance.lock() = Some(Err(error));
        self
    }

    /// Queue status answers, in order.
    pub fn with_statuses<I>(self, statuses: I) -> Self
    where
        I: IntoIterator<Item = Result<RouteStatus, RemoteError>>,
    {
        self.statuses.lock().extend(statuses);
        self
    }

    /// Delay every status answer by `delay`.
    pub fn with_report_delay(mut self, delay: Duration) -> Self {
        self.report_delay = Some(delay);
        self
    }

    /// Number of allowance queries received.
    pub fn allowance_calls(&self) -> usize {
        self.allowance_calls.load(Ordering::SeqCst)
    }

    /// Number of approval calldata requests received.
    pub fn calldata_calls(&self) -> usize {
        self.calldata_calls.load(Ordering::SeqCst)
    }

    /// Status reports received so far.
    pub fn reports(&self) -> Vec<RecordedReport> {
        self.reports.lock().clone()
    }
}

#[async_trait]
impl RemoteBridgeApi for MockBridgeApi {
    async fn fetch_allowance(
        &self,
        _chain_id: ChainId,
        _owner: &Address,
        _allowance_target: &Address,
        _token_address: &Address,
    ) -> Result<TokenAllowance, RemoteError> {
        self.allowance_calls.fetch_add(1, Ordering::SeqCst);
        match self.allowance.lock().clone() {
            Some(Ok(value)) => Ok(TokenAllowance { value }),
            Some(Err(e)) => Err(e),
            None => Ok(TokenAllowance {
                value: TokenAmount::zero(),
            }),
        }
    }

    async fn fetch_approval_calldata(
        &self,
        _chain_id: ChainId,
        allowance_target: &Address,
        amount: &TokenAmount,
        owner: &Address,
        token_address: &Address,
    ) -> Result<ApprovalTxPayload, RemoteError> {
        self.calldata_calls.fetch_add(1, Ordering::SeqCst);
        Ok(TxPayload {
            to: token_address.clone(),
            data: format!("approve({},{})", allowance_target, amount),
            value: None,
            from: Some(owner.clone()),
        })
    }

    async fn report_tx_hash(
        &self,
        active_route_id: u64,
        user_tx_index: u32,
        tx_hash: &TxHash,
    ) -> Result<RouteStatus, RemoteError> {
        self.reports.lock().push(RecordedReport {
            active_route_id,
            user_tx_index,
            tx_hash: tx_hash.clone(),
            at: tokio::time::Instant::now(),
        });

        if let Some(delay) = self.report_delay {
            tokio::time::sleep(delay).await;
        }

        self.statuses
            .lock()
            .pop_front()
            .unwrap_or_else(|| Err(RemoteError::Transport("no scripted status".to_string())))
    }
}

/// Wallet mock that hands out sequential hashes and records every payload.
#[derive(Default)]
pub struct MockTransactionSender {
    sent: Mutex<Vec<(ChainId, TxPayload)>>,
    fail_with: Option<RemoteError>,
    mining_delay: Option<Duration>,
}

impl MockTransactionSender {
    /// Create a sender that always succeeds.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a sender that always fails with `error`.
    pub fn failing(error: RemoteError) -> Self {
        Self {
            fail_with: Some(error),
            ..Self::default()
        }
    }

    /// Take `delay` to mine every transaction.
    pub fn with_mining_delay(mut self, delay: Duration) -> Self {
        self.mining_delay = Some(delay);
        self
    }

    /// Payloads sent so far.
    pub fn sent(&self) -> Vec<(ChainId, TxPayload)> {
        self.sent.lock().clone()
    }
}

#[async_trait]
impl TransactionSender for MockTransactionSender {
    async fn send_transaction(
        &self,
        chain_id: ChainId,
        payload: &TxPayload,
    ) -> Result<TxHash, RemoteError> {
        if let Some(delay) = self.mining_delay {
            tokio::time::sleep(delay).await;
        }
        if let Some(e) = &self.fail_with {
            return Err(e.clone());
        }
        let mut sent = self.sent.lock();
        sent.push((chain_id, payload.clone()));
        Ok(TxHash::new(format!("0x{:064x}", sent.len())))
    }
}
