//! # Gateway Service
//!
//! High-level service implementing the `GatewayApi` port over the domain
//! state. It wraps the directional limiter, the override registry, and the
//! administrator configuration behind one lock, and reaches settlement,
//! time, and event delivery through the outbound ports.
//!
//! Each call validates fully before mutating: the only mutation that can
//! precede a fallible settlement call is the credit path's consume, which
//! is compensated exactly if settlement rejects the mint. The state lock is
//! never held across an `await`.

use crate::domain::{
    invariant_fee_conservation, split_debit, BucketState, DebitOutcome, DirectionalLimiter, EdgeId,
    GatewayConfig, GatewayError, Identity, OverridePolicy, OverrideRegistry, RateLimitConfig,
    TransferId, EMPTY_IDENTITY,
};
use crate::events::GatewayEvent;
use crate::ports::inbound::GatewayApi;
use crate::ports::outbound::{GatewayEventPublisher, SettlementLedger, TimeSource};
use async_trait::async_trait;
use parking_lot::RwLock;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Mutable state owned exclusively by the service.
struct GatewayState {
    config: GatewayConfig,
    limiter: DirectionalLimiter,
    overrides: OverrideRegistry,
    fee_accrued: u64,
}

/// Gateway accounting service implementing the driving port.
pub struct GatewayService {
    state: RwLock<GatewayState>,
    settlement: Arc<dyn SettlementLedger>,
    time_source: Arc<dyn TimeSource>,
    publisher: Arc<dyn GatewayEventPublisher>,
}

impl GatewayService {
    /// Create a service around the given configuration and ports.
    pub fn new(
        config: GatewayConfig,
        settlement: Arc<dyn SettlementLedger>,
        time_source: Arc<dyn TimeSource>,
        publisher: Arc<dyn GatewayEventPublisher>,
    ) -> Self {
        Self {
            state: RwLock::new(GatewayState {
                config,
                limiter: DirectionalLimiter::new(),
                overrides: OverrideRegistry::new(),
                fee_accrued: 0,
            }),
            settlement,
            time_source,
            publisher,
        }
    }

    fn now(&self) -> u64 {
        self.time_source.now()
    }

    fn ensure_admin(state: &GatewayState, caller: &Identity) -> Result<(), GatewayError> {
        if *caller != state.config.admin {
            return Err(GatewayError::Unauthorized);
        }
        Ok(())
    }
}

#[async_trait]
impl GatewayApi for GatewayService {
    async fn credit_overridable(
        &self,
        transfer_id: TransferId,
        recipient: Identity,
        amount: u64,
        source_edge: EdgeId,
    ) -> Result<u64, GatewayError> {
        let now = self.now();

        let policy = {
            let mut state = self.state.write();
            if state.config.paused {
                return Err(GatewayError::Paused);
            }
            let policy = state.overrides.resolve(&recipient, &transfer_id);
            if policy == OverridePolicy::None {
                state.limiter.inbound(source_edge, amount, now)?;
            }
            policy
        };

        if let Err(err) = self.settlement.mint(recipient, amount).await {
            // discard the consume so the failed call leaves no trace;
            // same timestamp, so re-adding the amount restores the level
            if policy == OverridePolicy::None {
                self.state.write().limiter.outbound(source_edge, amount, now);
            }
            warn!(
                transfer_id = %hex::encode(transfer_id),
                edge = %source_edge,
                %err,
                "credit settlement failed"
            );
            return Err(err.into());
        }

        match policy {
            OverridePolicy::ExemptIdentity => {
                self.publisher.publish(GatewayEvent::RateLimitOverridden {
                    recipient,
                    amount,
                });
            }
            OverridePolicy::ExemptTransfer => {
                self.publisher
                    .publish(GatewayEvent::RateLimitOverriddenByTransfer {
                        transfer_id,
                        amount,
                    });
            }
            OverridePolicy::None => {}
        }

        debug!(
            transfer_id = %hex::encode(transfer_id),
            edge = %source_edge,
            amount,
            "inbound transfer credited"
        );
        self.publisher.publish(GatewayEvent::TransferReceived {
            transfer_id,
            source_edge,
            recipient,
            amount,
        });

        Ok(amount)
    }

    async fn debit(
        &self,
        sender: Identity,
        amount: u64,
        min_amount_out: u64,
        destination_edge: EdgeId,
    ) -> Result<DebitOutcome, GatewayError> {
        let now = self.now();

        let (breakdown, sender_exempt, custody) = {
            let state = self.state.read();
            if state.config.paused {
                return Err(GatewayError::Paused);
            }
            let bps = state.config.fee_bps(destination_edge);
            let breakdown = split_debit(amount, bps, state.config.granularity);
            (
                breakdown,
                state.overrides.is_exempt(&sender),
                state.config.fee_custody,
            )
        };
        debug_assert!(invariant_fee_conservation(&breakdown));

        if breakdown.amount_received < min_amount_out {
            return Err(GatewayError::SlippageExceeded {
                received: breakdown.amount_received,
                min_amount_out,
            });
        }

        // nothing has been mutated up to here: a rejected burn aborts clean
        self.settlement.burn(sender, breakdown.amount_settled).await?;
        if breakdown.fee > 0 {
            self.settlement.mint(custody, breakdown.fee).await?;
        }

        {
            let mut state = self.state.write();
            if breakdown.fee > 0 {
                state.fee_accrued = state.fee_accrued.saturating_add(breakdown.fee);
            }
            if !sender_exempt {
                // the fee never enters rate accounting
                state
                    .limiter
                    .outbound(destination_edge, breakdown.amount_received, now);
            }
        }

        debug!(
            edge = %destination_edge,
            amount_settled = breakdown.amount_settled,
            amount_received = breakdown.amount_received,
            fee = breakdown.fee,
            "outbound transfer debited"
        );
        self.publisher.publish(GatewayEvent::TransferSent {
            destination_edge,
            sender,
            amount_settled: breakdown.amount_settled,
            amount_received: breakdown.amount_received,
        });

        Ok(DebitOutcome {
            amount_settled: breakdown.amount_settled,
            amount_received: breakdown.amount_received,
        })
    }

    async fn withdraw_fee(
        &self,
        caller: Identity,
        to: Identity,
        amount: u64,
    ) -> Result<(), GatewayError> {
        let custody = {
            let state = self.state.read();
            Self::ensure_admin(&state, &caller)?;
            if to == EMPTY_IDENTITY {
                return Err(GatewayError::ZeroAddress);
            }
            if amount == 0 {
                return Err(GatewayError::ZeroAmount);
            }
            if amount > state.fee_accrued {
                return Err(GatewayError::ExceedsFeeAccrued {
                    requested: amount,
                    available: state.fee_accrued,
                });
            }
            state.config.fee_custody
        };

        self.settlement.transfer(custody, to, amount).await?;
        {
            let mut state = self.state.write();
            state.fee_accrued = state.fee_accrued.saturating_sub(amount);
        }

        info!(to = %hex::encode(to), amount, "fee withdrawn");
        self.publisher
            .publish(GatewayEvent::FeeWithdrawn { to, amount });
        Ok(())
    }

    fn set_rate_limits(
        &self,
        caller: Identity,
        configs: Vec<RateLimitConfig>,
    ) -> Result<(), GatewayError> {
        let now = self.now();
        {
            let mut state = self.state.write();
            Self::ensure_admin(&state, &caller)?;
            state.limiter.configure(&configs, now);
        }

        info!(edges = configs.len(), "rate limits configured");
        self.publisher
            .publish(GatewayEvent::RateLimitsConfigured { configs });
        Ok(())
    }

    fn modify_exempt_identities(
        &self,
        caller: Identity,
        identities: &[Identity],
        flags: &[bool],
    ) -> Result<(), GatewayError> {
        {
            let mut state = self.state.write();
            Self::ensure_admin(&state, &caller)?;
            if identities.len() != flags.len() {
                return Err(GatewayError::InputLengthMismatch {
                    left: identities.len(),
                    right: flags.len(),
                });
            }
            for (identity, is_exempt) in identities.iter().zip(flags) {
                state.overrides.set_identity(*identity, *is_exempt);
            }
        }

        for (identity, is_exempt) in identities.iter().zip(flags) {
            self.publisher.publish(GatewayEvent::ExemptIdentityUpdated {
                identity: *identity,
                is_exempt: *is_exempt,
            });
        }
        Ok(())
    }

    fn modify_overridable_transfer_ids(
        &self,
        caller: Identity,
        ids: &[TransferId],
        flags: &[bool],
    ) -> Result<(), GatewayError> {
        {
            let mut state = self.state.write();
            Self::ensure_admin(&state, &caller)?;
            if ids.len() != flags.len() {
                return Err(GatewayError::InputLengthMismatch {
                    left: ids.len(),
                    right: flags.len(),
                });
            }
            for (id, can_override) in ids.iter().zip(flags) {
                state.overrides.set_transfer(*id, *can_override);
            }
        }

        for (id, can_override) in ids.iter().zip(flags) {
            self.publisher
                .publish(GatewayEvent::TransferOverrideUpdated {
                    id: *id,
                    can_override: *can_override,
                });
        }
        Ok(())
    }

    fn set_pause(&self, caller: Identity, paused: bool) -> Result<(), GatewayError> {
        {
            let mut state = self.state.write();
            let allowed = if paused {
                state.config.may_pause(&caller)
            } else {
                state.config.may_unpause(&caller)
            };
            if !allowed {
                return Err(GatewayError::Unauthorized);
            }
            state.config.paused = paused;
        }

        info!(paused, "pause switch updated");
        self.publisher.publish(GatewayEvent::PauseUpdated { paused });
        Ok(())
    }

    fn is_exempt(&self, identity: &Identity) -> bool {
        self.state.read().overrides.is_exempt(identity)
    }

    fn can_override(&self, id: &TransferId) -> bool {
        self.state.read().overrides.can_override(id)
    }

    fn bucket_state(&self, edge: EdgeId) -> Option<BucketState> {
        self.state.read().limiter.state(edge)
    }

    fn fee_accrued(&self) -> u64 {
        self.state.read().fee_accrued
    }

    fn is_paused(&self) -> bool {
        self.state.read().config.paused
    }
}
