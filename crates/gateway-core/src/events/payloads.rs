//! Observable accounting events, one per state transition.
//!
//! Published through the [`GatewayEventPublisher`] port so hosts can feed
//! them into whatever bus or sink they run.
//!
//! [`GatewayEventPublisher`]: crate::ports::outbound::GatewayEventPublisher

use crate::domain::{EdgeId, Identity, RateLimitConfig, TransferId};
use serde::{Deserialize, Serialize};

/// One observable gateway state transition.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum GatewayEvent {
    /// Rate limit configuration was replaced.
    RateLimitsConfigured {
        /// The full new configuration list.
        configs: Vec<RateLimitConfig>,
    },

    /// An identity's exemption flag was upserted.
    ExemptIdentityUpdated {
        /// The identity affected.
        identity: Identity,
        /// Whether the identity is now exempt.
        is_exempt: bool,
    },

    /// A transfer id's override flag was upserted.
    TransferOverrideUpdated {
        /// The transfer id affected.
        id: TransferId,
        /// Whether the transfer may now bypass the limiter.
        can_override: bool,
    },

    /// An exempt recipient bypassed rate accounting.
    RateLimitOverridden {
        /// The exempt recipient.
        recipient: Identity,
        /// Amount credited without rate accounting.
        amount: u64,
    },

    /// A transfer-id override bypassed rate accounting.
    RateLimitOverriddenByTransfer {
        /// The overridden transfer.
        transfer_id: TransferId,
        /// Amount credited without rate accounting.
        amount: u64,
    },

    /// An inbound delivery was credited.
    TransferReceived {
        /// Transport-assigned transfer id.
        transfer_id: TransferId,
        /// Edge the value arrived from.
        source_edge: EdgeId,
        /// Local recipient.
        recipient: Identity,
        /// Amount minted/released to the recipient.
        amount: u64,
    },

    /// An outbound transfer was debited.
    TransferSent {
        /// Edge the value leaves toward.
        destination_edge: EdgeId,
        /// Local sender.
        sender: Identity,
        /// Amount burned/locked locally.
        amount_settled: u64,
        /// Amount the remote recipient receives.
        amount_received: u64,
    },

    /// Accrued fees were withdrawn.
    FeeWithdrawn {
        /// Withdrawal destination.
        to: Identity,
        /// Amount withdrawn.
        amount: u64,
    },

    /// The pause switch was flipped.
    PauseUpdated {
        /// Whether transfers are now rejected.
        paused: bool,
    },
}
