//! # Driving Ports (Inbound API)
//!
//! The public API this subsystem exposes to the host gateway.

use crate::domain::{
    BucketState, DebitOutcome, EdgeId, GatewayError, Identity, RateLimitConfig, TransferId,
};
use async_trait::async_trait;

/// Primary API of the gateway accounting core.
///
/// Settlement-touching operations are async; configuration and reads are
/// synchronous. Every failure aborts the whole call with no partial state
/// mutation.
#[async_trait]
pub trait GatewayApi: Send + Sync {
    /// Credit an inbound delivery, honoring exemptions and overrides.
    ///
    /// An exempt recipient or an overridden transfer id bypasses rate
    /// accounting; otherwise the source edge's bucket is consumed. Returns
    /// the amount actually settled.
    async fn credit_overridable(
        &self,
        transfer_id: TransferId,
        recipient: Identity,
        amount: u64,
        source_edge: EdgeId,
    ) -> Result<u64, GatewayError>;

    /// Debit an outbound transfer: fee, dust removal, slippage floor,
    /// burn/lock, and limiter replenishment.
    async fn debit(
        &self,
        sender: Identity,
        amount: u64,
        min_amount_out: u64,
        destination_edge: EdgeId,
    ) -> Result<DebitOutcome, GatewayError>;

    /// Withdraw accrued fees to `to` (administrator only).
    async fn withdraw_fee(
        &self,
        caller: Identity,
        to: Identity,
        amount: u64,
    ) -> Result<(), GatewayError>;

    /// Replace per-edge rate limits (administrator only).
    ///
    /// In-flight usage carries over against the new capacity and rate.
    fn set_rate_limits(
        &self,
        caller: Identity,
        configs: Vec<RateLimitConfig>,
    ) -> Result<(), GatewayError>;

    /// Upsert exemption flags for identities (administrator only).
    ///
    /// `identities` and `flags` are parallel arrays; a length mismatch
    /// aborts before any mutation.
    fn modify_exempt_identities(
        &self,
        caller: Identity,
        identities: &[Identity],
        flags: &[bool],
    ) -> Result<(), GatewayError>;

    /// Upsert override flags for transfer ids (administrator only).
    ///
    /// Same parallel-array contract as identity exemptions.
    fn modify_overridable_transfer_ids(
        &self,
        caller: Identity,
        ids: &[TransferId],
        flags: &[bool],
    ) -> Result<(), GatewayError>;

    /// Flip the pause switch (administrator, or the pause/unpause role).
    fn set_pause(&self, caller: Identity, paused: bool) -> Result<(), GatewayError>;

    /// Whether the identity is exempt from rate accounting.
    fn is_exempt(&self, identity: &Identity) -> bool;

    /// Whether this transfer id may bypass the limiter.
    fn can_override(&self, id: &TransferId) -> bool;

    /// Snapshot of one edge's bucket, if configured.
    fn bucket_state(&self, edge: EdgeId) -> Option<BucketState>;

    /// Fee balance accrued and not yet withdrawn.
    fn fee_accrued(&self) -> u64;

    /// Whether transfers are currently rejected.
    fn is_paused(&self) -> bool;
}
