//! # Domain Invariants
//!
//! Checkable business rules for the gateway core, used by tests and
//! `debug_assert!` call sites.

use super::services::{remove_dust, DebitBreakdown};
use super::value_objects::BucketState;

/// Bucket bound: the level never exceeds the capacity.
pub fn invariant_bucket_bounds(state: &BucketState) -> bool {
    state.level <= state.capacity
}

/// Fee conservation: the settled amount is exactly fee plus receivable.
pub fn invariant_fee_conservation(breakdown: &DebitBreakdown) -> bool {
    breakdown.amount_settled == breakdown.fee + breakdown.amount_received
}

/// Dust bound: truncation never increases the amount and removes less than
/// one granularity unit.
pub fn invariant_dust_bound(amount: u64, granularity: u64) -> bool {
    let kept = remove_dust(amount, granularity);
    kept <= amount && (granularity <= 1 || amount - kept < granularity)
}
