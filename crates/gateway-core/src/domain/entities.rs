//! # Domain Entities
//!
//! Stateful core types: the token bucket, the directional limiter wrapping
//! the per-edge bucket store, the override registry, and the
//! administrator-owned configuration.

use super::errors::GatewayError;
use super::invariants::invariant_bucket_bounds;
use super::value_objects::{
    BucketState, EdgeId, Identity, OverridePolicy, RateLimitConfig, TransferId,
};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

/// Token bucket bounding flow across one edge.
///
/// Refill is linear: elapsed seconds scaled by `capacity / window_secs`,
/// applied before any consume/replenish math and capped at capacity.
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub struct TokenBucket {
    capacity: u64,
    window_secs: u64,
    level: u64,
    last_refill: u64,
}

impl TokenBucket {
    /// Create a bucket with a full level.
    pub fn new(capacity: u64, window_secs: u64, now: u64) -> Self {
        Self {
            capacity,
            window_secs,
            level: capacity,
            last_refill: now,
        }
    }

    /// Level after applying the pending linear refill at `now`.
    fn refilled_level(&self, now: u64) -> u64 {
        if self.window_secs == 0 || self.capacity == 0 {
            return self.level.min(self.capacity);
        }
        let elapsed = now.saturating_sub(self.last_refill);
        let refill = u128::from(elapsed) * u128::from(self.capacity) / u128::from(self.window_secs);
        (u128::from(self.level) + refill).min(u128::from(self.capacity)) as u64
    }

    /// Subtract `amount` from the level after refill.
    ///
    /// On failure the bucket is left untouched, including `last_refill`.
    pub fn consume(&mut self, amount: u64, now: u64) -> Result<(), GatewayError> {
        let available = self.refilled_level(now);
        if amount > available {
            return Err(GatewayError::RateLimitExceeded {
                requested: amount,
                available,
            });
        }
        self.level = available - amount;
        self.last_refill = now;
        debug_assert!(invariant_bucket_bounds(&self.state()));
        Ok(())
    }

    /// Add `amount` to the level after refill, capped at capacity.
    ///
    /// Never fails; the excess past capacity is discarded. The saturating
    /// semantics must be preserved exactly: the outbound path relies on
    /// replenishment being unable to fail.
    pub fn replenish(&mut self, amount: u64, now: u64) {
        let refilled = self.refilled_level(now);
        self.level = refilled.saturating_add(amount).min(self.capacity);
        self.last_refill = now;
        debug_assert!(invariant_bucket_bounds(&self.state()));
    }

    /// Adopt new capacity and window, carrying in-flight usage over.
    ///
    /// The bucket first refills at the old rate up to `now`; the usage
    /// (old capacity minus level) then counts against the new capacity.
    pub fn reconfigure(&mut self, capacity: u64, window_secs: u64, now: u64) {
        let used = self.capacity.saturating_sub(self.refilled_level(now));
        self.capacity = capacity;
        self.window_secs = window_secs;
        self.level = capacity.saturating_sub(used);
        self.last_refill = now;
    }

    /// Snapshot for the read surface.
    pub fn state(&self) -> BucketState {
        BucketState {
            capacity: self.capacity,
            window_secs: self.window_secs,
            level: self.level,
            last_refill: self.last_refill,
        }
    }

    /// Level available at `now`, without committing the refill.
    pub fn available(&self, now: u64) -> u64 {
        self.refilled_level(now)
    }
}

/// Per-edge bucket store with the directional inversion applied at its two
/// entry points.
///
/// The bucket arithmetic is written in outbound terms: consume on send.
/// Turning it into an inbound limiter is wiring only: value leaving the
/// local domain calls [`outbound`](Self::outbound) (sending frees inbound
/// capacity), value arriving calls [`inbound`](Self::inbound) (receiving
/// spends tolerance for that edge). Both call sites must stay swapped
/// together; swapping only one silently disables limiting on a side.
#[derive(Clone, Debug, Default)]
pub struct DirectionalLimiter {
    buckets: HashMap<EdgeId, TokenBucket>,
}

impl DirectionalLimiter {
    /// Create an empty limiter; every edge starts unconfigured (disabled).
    pub fn new() -> Self {
        Self::default()
    }

    /// Bulk upsert of per-edge limits. Existing usage carries over.
    pub fn configure(&mut self, configs: &[RateLimitConfig], now: u64) {
        for config in configs {
            match self.buckets.get_mut(&config.edge) {
                Some(bucket) => bucket.reconfigure(config.capacity, config.window_secs, now),
                None => {
                    self.buckets.insert(
                        config.edge,
                        TokenBucket::new(config.capacity, config.window_secs, now),
                    );
                }
            }
        }
    }

    /// Account for value entering the local domain: consume.
    pub fn inbound(&mut self, edge: EdgeId, amount: u64, now: u64) -> Result<(), GatewayError> {
        match self.buckets.get_mut(&edge) {
            Some(bucket) => bucket.consume(amount, now),
            // unconfigured edge behaves as capacity zero
            None if amount == 0 => Ok(()),
            None => Err(GatewayError::RateLimitExceeded {
                requested: amount,
                available: 0,
            }),
        }
    }

    /// Account for value leaving the local domain: replenish.
    ///
    /// Never fails; an unconfigured edge is a no-op.
    pub fn outbound(&mut self, edge: EdgeId, amount: u64, now: u64) {
        if let Some(bucket) = self.buckets.get_mut(&edge) {
            bucket.replenish(amount, now);
        }
    }

    /// Snapshot of one edge's bucket, if configured.
    pub fn state(&self, edge: EdgeId) -> Option<BucketState> {
        self.buckets.get(&edge).map(TokenBucket::state)
    }
}

/// Standing identity exemptions and per-transfer overrides.
///
/// The two sets are independent: identity exemption is a standing policy,
/// a transfer-id entry re-admits one specific delivery after review and
/// stays until explicitly revoked.
#[derive(Clone, Debug, Default)]
pub struct OverrideRegistry {
    exempt_identities: HashSet<Identity>,
    overridable_transfers: HashSet<TransferId>,
}

impl OverrideRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Idempotent upsert of one identity's exemption flag.
    ///
    /// Returns whether the set changed.
    pub fn set_identity(&mut self, identity: Identity, is_exempt: bool) -> bool {
        if is_exempt {
            self.exempt_identities.insert(identity)
        } else {
            self.exempt_identities.remove(&identity)
        }
    }

    /// Idempotent upsert of one transfer id's override flag.
    ///
    /// Returns whether the set changed.
    pub fn set_transfer(&mut self, id: TransferId, can_override: bool) -> bool {
        if can_override {
            self.overridable_transfers.insert(id)
        } else {
            self.overridable_transfers.remove(&id)
        }
    }

    /// Whether the identity is exempt from rate accounting.
    pub fn is_exempt(&self, identity: &Identity) -> bool {
        self.exempt_identities.contains(identity)
    }

    /// Whether this specific transfer may bypass the limiter.
    pub fn can_override(&self, id: &TransferId) -> bool {
        self.overridable_transfers.contains(id)
    }

    /// Resolve the override decision for one credit call.
    ///
    /// Identity exemption wins over transfer override when both apply.
    pub fn resolve(&self, recipient: &Identity, transfer_id: &TransferId) -> OverridePolicy {
        if self.is_exempt(recipient) {
            OverridePolicy::ExemptIdentity
        } else if self.can_override(transfer_id) {
            OverridePolicy::ExemptTransfer
        } else {
            OverridePolicy::None
        }
    }
}

/// Administrator-owned gateway configuration.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct GatewayConfig {
    /// Sole identity allowed to mutate configuration and withdraw fees.
    pub admin: Identity,
    /// Identity holding accrued fees on the settlement ledger.
    pub fee_custody: Identity,
    /// Transfer granularity divisor used by dust removal.
    pub granularity: u64,
    /// Fee in basis points applied when an edge has no explicit entry.
    pub default_fee_bps: u16,
    /// Per-edge fee overrides in basis points.
    pub fee_bps_by_edge: HashMap<EdgeId, u16>,
    /// When true, credit and debit are rejected.
    pub paused: bool,
    /// Identity additionally allowed to pause.
    pub pauser: Option<Identity>,
    /// Identity additionally allowed to unpause.
    pub unpauser: Option<Identity>,
}

impl GatewayConfig {
    /// Configuration with no fees, unit granularity, and no pause roles.
    pub fn new(admin: Identity, fee_custody: Identity) -> Self {
        Self {
            admin,
            fee_custody,
            granularity: 1,
            default_fee_bps: 0,
            fee_bps_by_edge: HashMap::new(),
            paused: false,
            pauser: None,
            unpauser: None,
        }
    }

    /// Fee basis points for `edge`, falling back to the default.
    pub fn fee_bps(&self, edge: EdgeId) -> u16 {
        self.fee_bps_by_edge
            .get(&edge)
            .copied()
            .unwrap_or(self.default_fee_bps)
    }

    /// Whether `caller` may pause the gateway.
    pub fn may_pause(&self, caller: &Identity) -> bool {
        *caller == self.admin || self.pauser.as_ref() == Some(caller)
    }

    /// Whether `caller` may unpause the gateway.
    pub fn may_unpause(&self, caller: &Identity) -> bool {
        *caller == self.admin || self.unpauser.as_ref() == Some(caller)
    }
}
