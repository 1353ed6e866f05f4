//! # Route Execution Flows
//!
//! Drives `bridge-step` end to end against a scripted bridge API and a
//! recording wallet:
//!
//! 1. **Approval → Send → Submit**: approval goes out first, polling stops at
//!    the first terminal status
//! 2. **Concurrent steps**: two steps poll independently on the same clock
//! 3. **Cancellation**: an external token stops a route while it is polling
//! 4. **Metrics**: counters exported after a run

#[cfg(test)]
mod tests {
    use async_trait::async_trait;
    use parking_lot::Mutex;
    use std::sync::Arc;
    use std::time::Duration;
    use tokio::time::Instant;
    use tokio_util::sync::CancellationToken;

    use bridge_step::{
        Address, ApprovalData, ChainId, MockBridgeApi, MockTransactionSender, NextTx,
        RemoteError, RouteExecutor, RouteOutcome, RouteStatus, StaticAllowlist, StepConfig,
        StepError, TokenAmount, TransactionSender, TransactionStep, TransactionStepApi, TxHash,
        TxPayload, UserTxType,
    };

    use crate::integration::init_test_telemetry;

    // =============================================================================
    // TEST FIXTURES
    // =============================================================================

    const REGISTRY: &str = "0xc30141b657f4216252dc59af2e7cdb9d8792e1b0";
    const USDC: &str = "0xa0b86991c6218b36c1d19d4a2e9eb0ce3606eb48";
    const OWNER: &str = "0x3e8cb4bd04d81498ab4b94a392c334f5328b237b";

    fn approval(minimum: &str) -> ApprovalData {
        ApprovalData {
            owner: Address::new(OWNER),
            allowance_target: Address::new(REGISTRY),
            approval_token_address: Address::new(USDC),
            minimum_approval_amount: TokenAmount::from_dec_str(minimum).unwrap(),
        }
    }

    fn next_tx(route_id: u64, index: u32, approval_data: Option<ApprovalData>) -> NextTx {
        NextTx {
            chain_id: ChainId(137),
            user_tx_type: UserTxType::FundMovr,
            tx_type: Some("eth_sendTransaction".to_string()),
            tx_target: Address::new(REGISTRY),
            tx_data: "0x0000000a".to_string(),
            value: "0x00".to_string(),
            approval_data,
            active_route_id: route_id,
            user_tx_index: index,
            total_user_tx: Some(2),
        }
    }

    fn allowlist() -> Arc<StaticAllowlist> {
        Arc::new(StaticAllowlist::new().with_chain(ChainId(137), [REGISTRY]))
    }

    /// Wallet that records what it signed and when.
    #[derive(Default)]
    struct RecordingWallet {
        signed: Mutex<Vec<(Instant, TxPayload)>>,
    }

    #[async_trait]
    impl TransactionSender for RecordingWallet {
        async fn send_transaction(
            &self,
            _chain_id: ChainId,
            payload: &TxPayload,
        ) -> Result<TxHash, RemoteError> {
            // Mining takes a block
            tokio::time::sleep(Duration::from_secs(2)).await;
            let mut signed = self.signed.lock();
            signed.push((Instant::now(), payload.clone()));
            Ok(TxHash::new(format!("0x{:064x}", 0xb0 + signed.len())))
        }
    }

    // =============================================================================
    // INTEGRATION TESTS: APPROVAL → SEND → SUBMIT
    // =============================================================================

    /// Full route: approval needed on step 0, step 1 needs none.
    #[tokio::test(start_paused = true)]
    async fn test_route_with_approval_runs_to_completion() {
        init_test_telemetry();

        let api = Arc::new(
            MockBridgeApi::new()
                .with_allowance(0u128)
                .with_statuses([
                    Ok(RouteStatus::Pending),
                    Ok(RouteStatus::Completed),
                    Ok(RouteStatus::Completed),
                ]),
        );
        let wallet = Arc::new(RecordingWallet::default());
        let executor = RouteExecutor::new(
            api.clone(),
            allowlist(),
            wallet.clone(),
            StepConfig::with_status_check_interval_ms(1_000),
        );

        let outcome = executor
            .execute(
                [
                    next_tx(42, 0, Some(approval("1000000000000000000000000"))),
                    next_tx(42, 1, None),
                ],
                &CancellationToken::new(),
            )
            .await
            .unwrap();

        assert_eq!(
            outcome,
            RouteOutcome::Completed {
                statuses: vec![RouteStatus::Completed, RouteStatus::Completed]
            }
        );

        // Approval, send for step 0, send for step 1
        let signed = wallet.signed.lock();
        assert_eq!(signed.len(), 3);
        assert_eq!(signed[0].1.to, Address::new(USDC));
        assert_eq!(signed[1].1.to, Address::new(REGISTRY));
        assert!(signed[0].0 < signed[1].0);

        let reports = api.reports();
        assert_eq!(reports.len(), 3);
        assert!(reports.iter().all(|r| r.active_route_id == 42));
        assert_eq!(reports[1].at - reports[0].at, Duration::from_secs(1));
        assert_eq!(reports[2].user_tx_index, 1);
    }

    /// Driving a step by hand through the inbound port.
    #[tokio::test(start_paused = true)]
    async fn test_manual_step_lifecycle() {
        init_test_telemetry();

        let api = Arc::new(
            MockBridgeApi::new()
                .with_allowance(TokenAmount::from_dec_str("999").unwrap())
                .with_statuses([Ok(RouteStatus::Pending), Ok(RouteStatus::Failed)]),
        );
        let mut step = TransactionStep::with_config(
            next_tx(7, 0, Some(approval("1000"))),
            StepConfig::for_testing(),
            api.clone(),
            allowlist(),
        );

        let err = step.get_send_transaction().unwrap_err();
        assert!(err.is_sequence());

        let approve = step.get_approve_transaction().await.unwrap().unwrap();
        assert_eq!(approve.to, Address::new(USDC));

        let send = step.get_send_transaction().unwrap();
        assert_eq!(send.data, "0x0000000a");

        let status = step
            .submit(TxHash::from("0xfeed"), &CancellationToken::new())
            .await
            .unwrap();
        assert_eq!(status, RouteStatus::Failed);
        assert!(step.is_done());
        assert_eq!(step.hash(), Some(&TxHash::from("0xfeed")));
    }

    /// A failed step halts the route; later steps never reach the wallet.
    #[tokio::test(start_paused = true)]
    async fn test_reverted_step_halts_route() {
        init_test_telemetry();

        let api = Arc::new(MockBridgeApi::new().with_statuses([Ok(RouteStatus::Reverted)]));
        let sender = Arc::new(MockTransactionSender::new());
        let executor = RouteExecutor::new(api, allowlist(), sender.clone(), StepConfig::default());

        let outcome = executor
            .execute(
                [next_tx(5, 0, None), next_tx(5, 1, None)],
                &CancellationToken::new(),
            )
            .await
            .unwrap();

        assert_eq!(
            outcome,
            RouteOutcome::Halted {
                user_tx_index: 0,
                status: RouteStatus::Reverted
            }
        );
        assert_eq!(sender.sent().len(), 1);
    }

    // =============================================================================
    // INTEGRATION TESTS: CONCURRENCY AND CANCELLATION
    // =============================================================================

    /// Two steps on separate routes poll at their own intervals.
    #[tokio::test(start_paused = true)]
    async fn test_concurrent_steps_poll_independently() {
        init_test_telemetry();

        let fast_api = Arc::new(MockBridgeApi::new().with_statuses([
            Ok(RouteStatus::Pending),
            Ok(RouteStatus::Pending),
            Ok(RouteStatus::Completed),
        ]));
        let slow_api = Arc::new(
            MockBridgeApi::new()
                .with_statuses([Ok(RouteStatus::Pending), Ok(RouteStatus::Completed)]),
        );

        let mut fast = TransactionStep::with_config(
            next_tx(1, 0, None),
            StepConfig::with_status_check_interval_ms(100),
            fast_api.clone(),
            allowlist(),
        );
        let mut slow = TransactionStep::with_config(
            next_tx(2, 0, None),
            StepConfig::with_status_check_interval_ms(1_000),
            slow_api.clone(),
            allowlist(),
        );

        let cancel = CancellationToken::new();
        let start = Instant::now();
        let (fast_status, slow_status) = tokio::join!(
            fast.submit(TxHash::from("0x01"), &cancel),
            slow.submit(TxHash::from("0x02"), &cancel),
        );

        assert_eq!(fast_status.unwrap(), RouteStatus::Completed);
        assert_eq!(slow_status.unwrap(), RouteStatus::Completed);

        let fast_reports = fast_api.reports();
        assert_eq!(fast_reports.len(), 3);
        assert_eq!(fast_reports[2].at - start, Duration::from_millis(200));

        let slow_reports = slow_api.reports();
        assert_eq!(slow_reports.len(), 2);
        assert_eq!(slow_reports[1].at - start, Duration::from_millis(1_000));
    }

    /// Cancelling from another task stops polling and leaves the step pending.
    #[tokio::test(start_paused = true)]
    async fn test_external_cancellation_stops_route() {
        init_test_telemetry();

        let api = Arc::new(MockBridgeApi::new().with_statuses(
            std::iter::repeat_with(|| Ok(RouteStatus::Pending)).take(100),
        ));
        let sender = Arc::new(MockTransactionSender::new());
        let executor = Arc::new(RouteExecutor::new(
            api.clone(),
            allowlist(),
            sender,
            StepConfig::with_status_check_interval_ms(10_000),
        ));

        let cancel = CancellationToken::new();
        let task = {
            let executor = executor.clone();
            let cancel = cancel.clone();
            tokio::spawn(async move {
                executor
                    .execute([next_tx(3, 0, None)], &cancel)
                    .await
            })
        };

        tokio::time::sleep(Duration::from_secs(25)).await;
        cancel.cancel();

        let result = task.await.unwrap();
        assert_eq!(result, Err(StepError::Cancelled));
        // Reports at t=0, 10s and 20s
        assert_eq!(api.reports().len(), 3);
    }

    /// A remote failure while polling ends the route with that error.
    #[tokio::test(start_paused = true)]
    async fn test_remote_failure_while_polling_surfaces() {
        init_test_telemetry();

        let api = Arc::new(MockBridgeApi::new().with_statuses([
            Ok(RouteStatus::Pending),
            Err(RemoteError::Api {
                status: 503,
                message: "route service unavailable".to_string(),
            }),
        ]));
        let executor = RouteExecutor::new(
            api.clone(),
            allowlist(),
            Arc::new(MockTransactionSender::new()),
            StepConfig::for_testing(),
        );

        let err = executor
            .execute([next_tx(8, 0, None)], &CancellationToken::new())
            .await
            .unwrap_err();

        assert!(matches!(err, StepError::Remote(RemoteError::Api { status: 503, .. })));
        assert_eq!(api.reports().len(), 2);
    }

    // =============================================================================
    // INTEGRATION TESTS: METRICS
    // =============================================================================

    #[tokio::test(start_paused = true)]
    async fn test_metrics_exported_after_run() {
        init_test_telemetry();

        let api = Arc::new(MockBridgeApi::new().with_statuses([Ok(RouteStatus::Completed)]));
        let executor = RouteExecutor::new(
            api,
            allowlist(),
            Arc::new(MockTransactionSender::new()),
            StepConfig::for_testing(),
        );
        executor
            .execute([next_tx(11, 0, None)], &CancellationToken::new())
            .await
            .unwrap();

        let text = bridge_telemetry::encode_metrics().unwrap();
        assert!(text.contains("bridge_step_status_reports_total"));
        assert!(text.contains("bridge_step_finished_total"));
    }
}
