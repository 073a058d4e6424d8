//! # Domain Value Objects
//!
//! Immutable value types for the gateway accounting core.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Address-like identity (20-byte).
pub type Identity = [u8; 20];

/// Unique transfer identifier assigned by the transport layer (32-byte).
pub type TransferId = [u8; 32];

/// The all-zero identity, rejected as a withdrawal destination.
pub const EMPTY_IDENTITY: Identity = [0u8; 20];

/// Identifies one remote domain relative to the local domain.
///
/// The unit of rate-limit configuration: every edge has its own bucket.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct EdgeId(pub u32);

impl fmt::Display for EdgeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Rate limit configuration for one edge.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RateLimitConfig {
    /// Edge the limit applies to.
    pub edge: EdgeId,
    /// Maximum bucket level.
    pub capacity: u64,
    /// Seconds for a full refill from empty. Zero disables refill.
    pub window_secs: u64,
}

/// Read-only snapshot of one bucket.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BucketState {
    /// Maximum level.
    pub capacity: u64,
    /// Refill window in seconds.
    pub window_secs: u64,
    /// Current level, before any pending refill.
    pub level: u64,
    /// Timestamp of the last committed refill.
    pub last_refill: u64,
}

/// How a credit-path call bypasses (or does not bypass) rate accounting.
///
/// Resolved exactly once per credit call; there are no parallel code paths
/// per override axis.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OverridePolicy {
    /// No override applies: the limiter is consulted.
    None,
    /// The recipient is a standing exempt identity.
    ExemptIdentity,
    /// This specific transfer id was granted a manual override.
    ExemptTransfer,
}

/// Result of a fee-aware debit.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DebitOutcome {
    /// Quantity actually burned/locked locally (fee + receivable).
    pub amount_settled: u64,
    /// Quantity the remote recipient will receive.
    pub amount_received: u64,
}
