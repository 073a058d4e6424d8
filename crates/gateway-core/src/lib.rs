//! # Gateway Core
//!
//! Accounting core for a cross-domain value-transfer gateway.
//!
//! **Architecture:** Hexagonal (DDD + Ports/Adapters)
//!
//! ## Purpose
//!
//! Decide, for every unit of value crossing between the local domain and a
//! remote one, whether the transfer fits the configured inbound quota:
//! - Per-edge token buckets with linear refill
//! - Directional inversion: outbound transfers replenish inbound capacity
//! - Standing identity exemptions and per-transfer overrides
//! - Fee and dust arithmetic with exact conservation
//!
//! ## Module Structure
//!
//! ```text
//! gateway-core/
//! ├── domain/      # token bucket, override registry, errors, fee math
//! ├── ports/       # GatewayApi, SettlementLedger, TimeSource
//! ├── adapters/    # in-memory settlement, clocks, event publishers
//! ├── events/      # observable accounting events
//! └── service      # GatewayService wiring it together
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod adapters;
pub mod domain;
pub mod events;
pub mod ports;
pub mod service;

// Re-exports
pub use adapters::{
    BufferedEventPublisher, FixedTimeSource, InMemorySettlement, NoOpEventPublisher,
    SystemTimeSource,
};
pub use domain::{
    fee_for, invariant_bucket_bounds, invariant_dust_bound, invariant_fee_conservation,
    remove_dust, split_debit, BucketState, DebitBreakdown, DebitOutcome, DirectionalLimiter,
    EdgeId, GatewayConfig, GatewayError, Identity, OverridePolicy, OverrideRegistry,
    RateLimitConfig, SettlementError, TokenBucket, TransferId, EMPTY_IDENTITY,
};
pub use events::GatewayEvent;
pub use ports::{GatewayApi, GatewayEventPublisher, SettlementLedger, TimeSource};
pub use service::GatewayService;

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
