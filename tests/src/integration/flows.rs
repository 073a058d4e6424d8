//! # Integration Test Flows
//!
//! Drives the gateway accounting core end-to-end through its public
//! `GatewayApi` port: outbound debits, inbound credits, overrides, fee
//! withdrawal, and pause, with the in-memory settlement ledger and a
//! controllable clock.

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use gateway_core::{
        BufferedEventPublisher, EdgeId, FixedTimeSource, GatewayApi, GatewayConfig, GatewayError,
        GatewayEvent, GatewayService, Identity, InMemorySettlement, RateLimitConfig,
    };

    // =============================================================================
    // TEST FIXTURES
    // =============================================================================

    const ADMIN: Identity = [0xAAu8; 20];
    const CUSTODY: Identity = [0xFEu8; 20];
    const TREASURY: Identity = [0xDDu8; 20];
    const ALICE: Identity = [0x01u8; 20];
    const BOB: Identity = [0x02u8; 20];
    const CHARLIE: Identity = [0x03u8; 20];

    const EDGE_A: EdgeId = EdgeId(101);
    const EDGE_B: EdgeId = EdgeId(202);

    struct Gateway {
        service: GatewayService,
        settlement: Arc<InMemorySettlement>,
        time: Arc<FixedTimeSource>,
        publisher: Arc<BufferedEventPublisher>,
    }

    /// Gateway with granularity 10, a 1% default fee, 2.5% on EDGE_B,
    /// and buckets 1000/1000s on EDGE_A, 500/2000s on EDGE_B.
    fn build_gateway() -> Gateway {
        let settlement = Arc::new(InMemorySettlement::new());
        let time = Arc::new(FixedTimeSource::new(1_700_000_000));
        let publisher = Arc::new(BufferedEventPublisher::new());

        let mut config = GatewayConfig::new(ADMIN, CUSTODY);
        config.granularity = 10;
        config.default_fee_bps = 100;
        config.fee_bps_by_edge.insert(EDGE_B, 250);

        let service = GatewayService::new(
            config,
            settlement.clone(),
            time.clone(),
            publisher.clone(),
        );
        service
            .set_rate_limits(
                ADMIN,
                vec![
                    RateLimitConfig {
                        edge: EDGE_A,
                        capacity: 1000,
                        window_secs: 1000,
                    },
                    RateLimitConfig {
                        edge: EDGE_B,
                        capacity: 500,
                        window_secs: 2000,
                    },
                ],
            )
            .unwrap();

        Gateway {
            service,
            settlement,
            time,
            publisher,
        }
    }

    fn transfer_id(n: u8) -> [u8; 32] {
        [n; 32]
    }

    // =============================================================================
    // FLOW: OUTBOUND DEBIT → INBOUND CREDIT
    // =============================================================================

    #[tokio::test]
    async fn test_debit_then_credit_lifecycle() {
        let gw = build_gateway();
        gw.settlement.seed(ALICE, 2000);

        // outbound: 1060 at 1% fee → fee 10, received 1050, settled 1060
        let outcome = gw.service.debit(ALICE, 1060, 1000, EDGE_A).await.unwrap();
        assert_eq!(outcome.amount_settled, 1060);
        assert_eq!(outcome.amount_received, 1050);
        assert_eq!(gw.settlement.balance_of(&ALICE), 940);
        assert_eq!(gw.settlement.balance_of(&CUSTODY), 10);
        assert_eq!(gw.service.fee_accrued(), 10);

        // supply dropped by the receivable: burned 1060, fee re-minted
        assert_eq!(gw.settlement.total_supply(), 950);

        // inbound: delivery consumes quota and mints to the recipient
        let settled = gw
            .service
            .credit_overridable(transfer_id(1), BOB, 600, EDGE_A)
            .await
            .unwrap();
        assert_eq!(settled, 600);
        assert_eq!(gw.settlement.balance_of(&BOB), 600);
        assert_eq!(gw.service.bucket_state(EDGE_A).unwrap().level, 400);
    }

    #[tokio::test]
    async fn test_outbound_replenish_caps_at_capacity() {
        let gw = build_gateway();
        gw.settlement.seed(ALICE, 2000);

        // the bucket starts full; the replenish from a debit is discarded
        gw.service.debit(ALICE, 1060, 0, EDGE_A).await.unwrap();
        assert_eq!(gw.service.bucket_state(EDGE_A).unwrap().level, 1000);
    }

    #[tokio::test]
    async fn test_quota_recovers_linearly_with_time() {
        let gw = build_gateway();

        gw.service
            .credit_overridable(transfer_id(1), BOB, 1000, EDGE_A)
            .await
            .unwrap();
        let err = gw
            .service
            .credit_overridable(transfer_id(2), BOB, 250, EDGE_A)
            .await
            .unwrap_err();
        assert_eq!(
            err,
            GatewayError::RateLimitExceeded {
                requested: 250,
                available: 0,
            }
        );

        // a quarter of the window restores a quarter of the capacity
        gw.time.advance(250);
        gw.service
            .credit_overridable(transfer_id(3), BOB, 250, EDGE_A)
            .await
            .unwrap();
    }

    // =============================================================================
    // FLOW: OVERRIDES
    // =============================================================================

    #[tokio::test]
    async fn test_rejected_delivery_readmitted_by_override() {
        let gw = build_gateway();
        let stuck = transfer_id(9);

        // exhaust the edge, then fail a delivery
        gw.service
            .credit_overridable(transfer_id(1), CHARLIE, 1000, EDGE_A)
            .await
            .unwrap();
        let err = gw
            .service
            .credit_overridable(stuck, BOB, 500, EDGE_A)
            .await
            .unwrap_err();
        assert!(matches!(err, GatewayError::RateLimitExceeded { .. }));

        // administrator reviews and grants the one-shot escape valve
        gw.service
            .modify_overridable_transfer_ids(ADMIN, &[stuck], &[true])
            .unwrap();
        assert!(gw.service.can_override(&stuck));

        // the same delivery now settles without touching the bucket
        gw.service
            .credit_overridable(stuck, BOB, 500, EDGE_A)
            .await
            .unwrap();
        assert_eq!(gw.settlement.balance_of(&BOB), 500);
        assert_eq!(gw.service.bucket_state(EDGE_A).unwrap().level, 0);

        // revoked afterwards, the id is limited again
        gw.service
            .modify_overridable_transfer_ids(ADMIN, &[stuck], &[false])
            .unwrap();
        assert!(!gw.service.can_override(&stuck));
        assert!(gw
            .service
            .credit_overridable(stuck, BOB, 500, EDGE_A)
            .await
            .is_err());
    }

    #[tokio::test]
    async fn test_standing_exemption_for_rebalancer() {
        let gw = build_gateway();
        let rebalancer = [0x77u8; 20];
        gw.service
            .modify_exempt_identities(ADMIN, &[rebalancer], &[true])
            .unwrap();

        // far past the edge capacity, across repeated deliveries
        for n in 0..5 {
            gw.service
                .credit_overridable(transfer_id(n), rebalancer, 1000, EDGE_A)
                .await
                .unwrap();
        }
        assert_eq!(gw.settlement.balance_of(&rebalancer), 5000);
        // quota untouched throughout
        assert_eq!(gw.service.bucket_state(EDGE_A).unwrap().level, 1000);
    }

    // =============================================================================
    // FLOW: FEES
    // =============================================================================

    #[tokio::test]
    async fn test_per_edge_fee_schedule() {
        let gw = build_gateway();
        gw.settlement.seed(ALICE, 5000);

        // EDGE_B carries 2.5%: 1000 → fee 25, received 970, dust 5
        let outcome = gw.service.debit(ALICE, 1000, 0, EDGE_B).await.unwrap();
        assert_eq!(outcome.amount_received, 970);
        assert_eq!(outcome.amount_settled, 995);

        // EDGE_A falls back to the 1% default
        let outcome = gw.service.debit(ALICE, 1000, 0, EDGE_A).await.unwrap();
        assert_eq!(outcome.amount_received, 990);
        assert_eq!(outcome.amount_settled, 1000);

        assert_eq!(gw.service.fee_accrued(), 35);
    }

    #[tokio::test]
    async fn test_fee_accrual_and_withdrawal() {
        let gw = build_gateway();
        gw.settlement.seed(ALICE, 5000);

        gw.service.debit(ALICE, 1060, 0, EDGE_A).await.unwrap();
        gw.service.debit(ALICE, 1060, 0, EDGE_A).await.unwrap();
        assert_eq!(gw.service.fee_accrued(), 20);

        gw.service.withdraw_fee(ADMIN, TREASURY, 15).await.unwrap();
        assert_eq!(gw.settlement.balance_of(&TREASURY), 15);
        assert_eq!(gw.settlement.balance_of(&CUSTODY), 5);
        assert_eq!(gw.service.fee_accrued(), 5);

        // cannot overdraw what remains
        let err = gw
            .service
            .withdraw_fee(ADMIN, TREASURY, 6)
            .await
            .unwrap_err();
        assert_eq!(
            err,
            GatewayError::ExceedsFeeAccrued {
                requested: 6,
                available: 5,
            }
        );
    }

    // =============================================================================
    // FLOW: ADMINISTRATION
    // =============================================================================

    #[tokio::test]
    async fn test_reconfiguration_carries_usage() {
        let gw = build_gateway();
        gw.service
            .credit_overridable(transfer_id(1), BOB, 600, EDGE_A)
            .await
            .unwrap();

        // raising the capacity keeps the 600 in-flight usage
        gw.service
            .set_rate_limits(
                ADMIN,
                vec![RateLimitConfig {
                    edge: EDGE_A,
                    capacity: 2000,
                    window_secs: 1000,
                }],
            )
            .unwrap();
        assert_eq!(gw.service.bucket_state(EDGE_A).unwrap().level, 1400);

        // shrinking below the usage floors the level at zero
        gw.service
            .set_rate_limits(
                ADMIN,
                vec![RateLimitConfig {
                    edge: EDGE_A,
                    capacity: 500,
                    window_secs: 1000,
                }],
            )
            .unwrap();
        assert_eq!(gw.service.bucket_state(EDGE_A).unwrap().level, 0);
    }

    #[tokio::test]
    async fn test_non_admin_cannot_configure() {
        let gw = build_gateway();
        assert_eq!(
            gw.service.set_rate_limits(ALICE, vec![]).unwrap_err(),
            GatewayError::Unauthorized
        );
        assert_eq!(
            gw.service
                .modify_exempt_identities(ALICE, &[BOB], &[true])
                .unwrap_err(),
            GatewayError::Unauthorized
        );
        assert_eq!(
            gw.service
                .withdraw_fee(ALICE, TREASURY, 1)
                .await
                .unwrap_err(),
            GatewayError::Unauthorized
        );
    }

    #[tokio::test]
    async fn test_pause_lifecycle() {
        let gw = build_gateway();
        gw.settlement.seed(ALICE, 1000);

        gw.service.set_pause(ADMIN, true).unwrap();
        assert_eq!(
            gw.service.debit(ALICE, 100, 0, EDGE_A).await.unwrap_err(),
            GatewayError::Paused
        );
        assert_eq!(
            gw.service
                .credit_overridable(transfer_id(1), BOB, 100, EDGE_A)
                .await
                .unwrap_err(),
            GatewayError::Paused
        );

        gw.service.set_pause(ADMIN, false).unwrap();
        gw.service.debit(ALICE, 100, 0, EDGE_A).await.unwrap();
    }

    // =============================================================================
    // FLOW: EVENT STREAM
    // =============================================================================

    #[tokio::test]
    async fn test_event_stream_reconstructs_accounting() {
        let gw = build_gateway();
        gw.settlement.seed(ALICE, 5000);

        gw.service.debit(ALICE, 1060, 0, EDGE_A).await.unwrap();
        gw.service
            .credit_overridable(transfer_id(1), BOB, 600, EDGE_A)
            .await
            .unwrap();
        gw.service.withdraw_fee(ADMIN, TREASURY, 10).await.unwrap();

        let mut sent_total = 0u64;
        let mut received_total = 0u64;
        let mut withdrawn_total = 0u64;
        for event in gw.publisher.events() {
            match event {
                GatewayEvent::TransferSent {
                    amount_settled, ..
                } => sent_total += amount_settled,
                GatewayEvent::TransferReceived { amount, .. } => received_total += amount,
                GatewayEvent::FeeWithdrawn { amount, .. } => withdrawn_total += amount,
                _ => {}
            }
        }
        assert_eq!(sent_total, 1060);
        assert_eq!(received_total, 600);
        assert_eq!(withdrawn_total, 10);
    }

    #[tokio::test]
    async fn test_registry_updates_emit_per_entry() {
        let gw = build_gateway();
        gw.publisher.drain();

        gw.service
            .modify_exempt_identities(ADMIN, &[ALICE, BOB], &[true, false])
            .unwrap();

        let events = gw.publisher.events();
        assert_eq!(events.len(), 2);
        assert_eq!(
            events[0],
            GatewayEvent::ExemptIdentityUpdated {
                identity: ALICE,
                is_exempt: true,
            }
        );
        assert_eq!(
            events[1],
            GatewayEvent::ExemptIdentityUpdated {
                identity: BOB,
                is_exempt: false,
            }
        );
    }

    // =============================================================================
    // FLOW: EDGE INDEPENDENCE
    // =============================================================================

    #[tokio::test]
    async fn test_edges_rate_limit_independently() {
        let gw = build_gateway();

        gw.service
            .credit_overridable(transfer_id(1), BOB, 1000, EDGE_A)
            .await
            .unwrap();
        // EDGE_A exhausted; EDGE_B still admits up to its own capacity
        assert!(gw
            .service
            .credit_overridable(transfer_id(2), BOB, 100, EDGE_A)
            .await
            .is_err());
        gw.service
            .credit_overridable(transfer_id(3), BOB, 500, EDGE_B)
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_unconfigured_edge_is_disabled() {
        let gw = build_gateway();
        let err = gw
            .service
            .credit_overridable(transfer_id(1), BOB, 1, EdgeId(999))
            .await
            .unwrap_err();
        assert_eq!(
            err,
            GatewayError::RateLimitExceeded {
                requested: 1,
                available: 0,
            }
        );
    }
}
