//! # Driven Ports (Outbound SPI)
//!
//! Interfaces this subsystem requires the host to implement: value
//! settlement, time, and event delivery.

use crate::domain::{Identity, SettlementError};
use crate::events::GatewayEvent;
use async_trait::async_trait;

/// Value settlement collaborator (mint/burn, or release/lock equivalents).
///
/// Operations are assumed atomic: a returned error means nothing moved.
///
/// # Thread Safety
///
/// Implementations must be `Send + Sync`; the service may be shared across
/// async tasks.
#[async_trait]
pub trait SettlementLedger: Send + Sync {
    /// Create `amount` units in `to`'s balance (mint or release).
    async fn mint(&self, to: Identity, amount: u64) -> Result<(), SettlementError>;

    /// Destroy `amount` units from `from`'s balance (burn or lock).
    async fn burn(&self, from: Identity, amount: u64) -> Result<(), SettlementError>;

    /// Move `amount` units between balances (fee custody payouts).
    async fn transfer(
        &self,
        from: Identity,
        to: Identity,
        amount: u64,
    ) -> Result<(), SettlementError>;
}

/// Abstract interface for time-related operations.
///
/// Enables deterministic testing of the refill math by injecting
/// controllable time sources. Production implementations use system time.
pub trait TimeSource: Send + Sync {
    /// Current unix time in seconds.
    fn now(&self) -> u64;
}

/// Best-effort sink for gateway accounting events.
///
/// Publishing must not fail the surrounding call; implementations buffer,
/// forward, or drop as they see fit.
pub trait GatewayEventPublisher: Send + Sync {
    /// Deliver one event.
    fn publish(&self, event: GatewayEvent);
}
