//! In-Memory Settlement Adapter
//!
//! Implements the `SettlementLedger` port against a plain balance map.
//!
//! In production, this would drive the real asset backend; here it backs
//! tests and local runs, and exposes balance/supply accessors so flows can
//! assert conservation.

use crate::domain::{Identity, SettlementError};
use crate::ports::outbound::SettlementLedger;
use async_trait::async_trait;
use parking_lot::RwLock;
use std::collections::HashMap;
use tracing::debug;

/// In-memory token ledger.
pub struct InMemorySettlement {
    balances: RwLock<HashMap<Identity, u64>>,
    supply: RwLock<u64>,
}

impl InMemorySettlement {
    /// Create an empty ledger.
    pub fn new() -> Self {
        Self {
            balances: RwLock::new(HashMap::new()),
            supply: RwLock::new(0),
        }
    }

    /// Seed a balance directly (test setup).
    pub fn seed(&self, identity: Identity, amount: u64) {
        let mut balances = self.balances.write();
        let balance = balances.entry(identity).or_insert(0);
        *balance = balance.saturating_add(amount);
        let mut supply = self.supply.write();
        *supply = supply.saturating_add(amount);
    }

    /// Balance currently held by `identity`.
    pub fn balance_of(&self, identity: &Identity) -> u64 {
        self.balances.read().get(identity).copied().unwrap_or(0)
    }

    /// Sum of all balances.
    pub fn total_supply(&self) -> u64 {
        *self.supply.read()
    }
}

impl Default for InMemorySettlement {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SettlementLedger for InMemorySettlement {
    async fn mint(&self, to: Identity, amount: u64) -> Result<(), SettlementError> {
        let mut balances = self.balances.write();
        let balance = balances.entry(to).or_insert(0);
        *balance = balance.saturating_add(amount);
        let mut supply = self.supply.write();
        *supply = supply.saturating_add(amount);
        debug!(to = %hex::encode(to), amount, "minted");
        Ok(())
    }

    async fn burn(&self, from: Identity, amount: u64) -> Result<(), SettlementError> {
        let mut balances = self.balances.write();
        let balance = balances.entry(from).or_insert(0);
        if *balance < amount {
            return Err(SettlementError::InsufficientBalance {
                requested: amount,
                available: *balance,
            });
        }
        *balance -= amount;
        *self.supply.write() -= amount;
        debug!(from = %hex::encode(from), amount, "burned");
        Ok(())
    }

    async fn transfer(
        &self,
        from: Identity,
        to: Identity,
        amount: u64,
    ) -> Result<(), SettlementError> {
        let mut balances = self.balances.write();
        let from_balance = balances.get(&from).copied().unwrap_or(0);
        if from_balance < amount {
            return Err(SettlementError::InsufficientBalance {
                requested: amount,
                available: from_balance,
            });
        }
        balances.insert(from, from_balance - amount);
        let to_balance = balances.entry(to).or_insert(0);
        *to_balance = to_balance.saturating_add(amount);
        debug!(
            from = %hex::encode(from),
            to = %hex::encode(to),
            amount,
            "transferred"
        );
        Ok(())
    }
}
