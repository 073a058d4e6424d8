//! # Domain Errors
//!
//! Failure taxonomy for the gateway accounting core. Every failure aborts
//! the whole call with no partial state mutation; retry is the caller's
//! decision.

use thiserror::Error;

/// Gateway error types.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum GatewayError {
    /// The edge's inbound quota is exhausted.
    ///
    /// Recoverable via a transfer-id override granted after review.
    #[error("rate limit exceeded: requested {requested}, available {available}")]
    RateLimitExceeded {
        /// Amount the delivery asked for.
        requested: u64,
        /// Bucket level after refill.
        available: u64,
    },

    /// The receivable amount fell below the caller's floor.
    #[error("slippage exceeded: received {received}, minimum requested {min_amount_out}")]
    SlippageExceeded {
        /// Amount the recipient would receive after fee and dust removal.
        received: u64,
        /// Floor the caller demanded.
        min_amount_out: u64,
    },

    /// Paired input arrays have different lengths.
    #[error("input length mismatch: {left} vs {right}")]
    InputLengthMismatch {
        /// Length of the identifier array.
        left: usize,
        /// Length of the flag array.
        right: usize,
    },

    /// The withdrawal destination is the empty identity.
    #[error("withdrawal destination is the empty identity")]
    ZeroAddress,

    /// The withdrawal amount is zero.
    #[error("withdrawal amount is zero")]
    ZeroAmount,

    /// Requested more than the currently accrued fee balance.
    #[error("exceeds accrued fee: requested {requested}, available {available}")]
    ExceedsFeeAccrued {
        /// Amount requested.
        requested: u64,
        /// Fee balance actually accrued.
        available: u64,
    },

    /// An administrator-only call was made by another identity.
    #[error("caller is not authorized")]
    Unauthorized,

    /// The gateway is paused; transfers are rejected until unpaused.
    #[error("gateway is paused")]
    Paused,

    /// The settlement collaborator rejected the mint/burn/transfer.
    #[error("settlement failed: {0}")]
    Settlement(#[from] SettlementError),
}

/// Failures reported by the settlement collaborator.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum SettlementError {
    /// The debited identity holds less than the requested amount.
    #[error("insufficient balance: requested {requested}, available {available}")]
    InsufficientBalance {
        /// Amount to be burned or transferred.
        requested: u64,
        /// Balance actually held.
        available: u64,
    },

    /// The ledger refused the operation for this caller.
    #[error("settlement not authorized")]
    Unauthorized,
}
