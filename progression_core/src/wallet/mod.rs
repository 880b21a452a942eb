//! The currency ledger: spendable Berries and accumulated XP.
//!
//! The wallet is the single point of mutation for both balances. Every flow
//! that earns or spends currency goes through [`Wallet::credit`] and
//! [`Wallet::debit`]; no other component touches the numbers directly.

use serde::{Deserialize, Serialize};
use tracing::debug;

use quest_rules::CreditReason;

use crate::error::{ProgressionError, Result};

/// Which balance a credit targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CurrencyKind {
    /// Spendable currency.
    Berries,
    /// Accumulation score. Monotonically non-decreasing: there is no XP debit.
    Xp,
}

/// A two-balance ledger.
///
/// Balances are unsigned, so a negative balance is unrepresentable; the debit
/// path refuses any amount the balance cannot cover, in one test-and-set step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Wallet {
    berries: u64,
    xp: u64,
}

impl Wallet {
    /// Create a wallet with the given starting balances.
    pub fn new(berries: u64, xp: u64) -> Self {
        Self { berries, xp }
    }

    /// Current spendable balance.
    pub fn berries(&self) -> u64 {
        self.berries
    }

    /// Current accumulation score.
    pub fn xp(&self) -> u64 {
        self.xp
    }

    /// Increase a balance. Always succeeds.
    pub fn credit(&mut self, kind: CurrencyKind, amount: u64, reason: CreditReason) {
        match kind {
            CurrencyKind::Berries => self.berries = self.berries.saturating_add(amount),
            CurrencyKind::Xp => self.xp = self.xp.saturating_add(amount),
        }
        debug!(?kind, amount, ?reason, "wallet credit");
    }

    /// Spend Berries.
    ///
    /// Checks and subtracts in a single step: on a shortfall the wallet is
    /// left untouched and [`ProgressionError::InsufficientFunds`] is returned.
    pub fn debit(&mut self, amount: u64) -> Result<()> {
        if amount > self.berries {
            return Err(ProgressionError::InsufficientFunds {
                needed: amount,
                available: self.berries,
            });
        }
        self.berries -= amount;
        debug!(amount, remaining = self.berries, "wallet debit");
        Ok(())
    }

    /// Whether the spendable balance covers `amount`. Pure query; callers
    /// gating UI on this must still go through [`Wallet::debit`]
    /// transactionally.
    pub fn can_afford(&self, amount: u64) -> bool {
        self.berries >= amount
    }
}
