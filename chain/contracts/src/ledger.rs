//! Ledger — per-account quote-currency balances and the capacity invariant
//!
//! Invariants held whenever no operation is in flight:
//! - `total == Σ balances`
//! - `total <= capacity` after every committed credit
//!
//! `credit` and `debit` validate every precondition before writing any
//! state, so a failed call leaves the ledger untouched.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::collections::BTreeMap;
use tracing::debug;
use vault_types::ids::AccountId;
use vault_types::numeric::Amount;

use crate::errors::{VaultError, VaultResult};
use crate::events::{Deposit, VaultEvent, Withdrawal};

/// Owner-mutable limits the ledger consults but never changes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Limits {
    /// Ceiling on `total`, in quote minor units
    pub capacity: Amount,
    /// Maximum amount of a single debit
    pub withdrawal_ceiling: Amount,
}

/// Balance and observability counters of one account.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountEntry {
    pub balance: Amount,
    pub deposits: u64,
    pub withdrawals: u64,
}

/// State captured before an operation touches `account`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LedgerCheckpoint {
    account: AccountId,
    entry: Option<AccountEntry>,
    total: Amount,
    events_len: usize,
}

impl LedgerCheckpoint {
    pub fn account(&self) -> AccountId {
        self.account
    }
}

/// Quote-currency ledger with an append-only event log.
#[derive(Debug, Default)]
pub struct Ledger {
    accounts: BTreeMap<AccountId, AccountEntry>,
    total: Amount,
    events: Vec<VaultEvent>,
}

impl Ledger {
    pub fn new() -> Self {
        Self::default()
    }

    // ───────────────────────── Transitions ─────────────────────────

    /// Credit `amount` to `account`.
    ///
    /// Fails `ZeroAmount` or `CapExceeded` without touching state.
    pub fn credit(
        &mut self,
        account: AccountId,
        amount: Amount,
        limits: &Limits,
    ) -> VaultResult<VaultEvent> {
        let new_total = self.checked_new_total(amount, limits)?;
        let new_balance = self
            .balance_of(&account)
            .checked_add(amount)
            .ok_or(VaultError::Overflow)?;

        let entry = self.accounts.entry(account).or_default();
        entry.balance = new_balance;
        entry.deposits += 1;
        self.total = new_total;

        debug!(%account, amount, total = self.total, "ledger credit");

        let event = VaultEvent::Deposit(Deposit {
            account,
            amount_quote: amount,
        });
        self.events.push(event.clone());
        Ok(event)
    }

    /// Debit `amount` from `account`.
    ///
    /// Checks run in order: zero amount, withdrawal ceiling, balance.
    pub fn debit(
        &mut self,
        account: AccountId,
        amount: Amount,
        limits: &Limits,
    ) -> VaultResult<VaultEvent> {
        if amount == 0 {
            return Err(VaultError::ZeroAmount);
        }
        if amount > limits.withdrawal_ceiling {
            return Err(VaultError::WithdrawalLimitExceeded {
                requested: amount,
                limit: limits.withdrawal_ceiling,
            });
        }

        let available = self.balance_of(&account);
        if amount > available {
            return Err(VaultError::InsufficientBalance {
                required: amount,
                available,
            });
        }

        let entry = self.accounts.entry(account).or_default();
        entry.balance -= amount;
        entry.withdrawals += 1;
        // total >= balance >= amount, so this cannot underflow
        self.total -= amount;

        debug!(%account, amount, total = self.total, "ledger debit");

        let event = VaultEvent::Withdrawal(Withdrawal {
            account,
            amount_quote: amount,
        });
        self.events.push(event.clone());
        Ok(event)
    }

    /// Fail unless a credit of `amount` would currently fit under capacity.
    pub fn ensure_capacity(&self, amount: Amount, limits: &Limits) -> VaultResult<()> {
        self.checked_new_total(amount, limits).map(|_| ())
    }

    fn checked_new_total(&self, amount: Amount, limits: &Limits) -> VaultResult<Amount> {
        if amount == 0 {
            return Err(VaultError::ZeroAmount);
        }
        let new_total = self.total.checked_add(amount).ok_or(VaultError::Overflow)?;
        if new_total > limits.capacity {
            return Err(VaultError::CapExceeded {
                requested: amount,
                available: self.available_capacity(limits),
            });
        }
        Ok(new_total)
    }

    // ───────────────────────── Rollback ─────────────────────────

    pub fn checkpoint(&self, account: AccountId) -> LedgerCheckpoint {
        LedgerCheckpoint {
            account,
            entry: self.accounts.get(&account).copied(),
            total: self.total,
            events_len: self.events.len(),
        }
    }

    /// Put the ledger back exactly as it was at `checkpoint`.
    pub fn restore(&mut self, checkpoint: LedgerCheckpoint) {
        match checkpoint.entry {
            Some(entry) => {
                self.accounts.insert(checkpoint.account, entry);
            }
            None => {
                self.accounts.remove(&checkpoint.account);
            }
        }
        self.total = checkpoint.total;
        self.events.truncate(checkpoint.events_len);
    }

    // ───────────────────────── Events ─────────────────────────

    /// Append a non-ledger event (swaps, parameter updates).
    pub fn emit(&mut self, event: VaultEvent) {
        self.events.push(event);
    }

    pub fn events(&self) -> &[VaultEvent] {
        &self.events
    }

    pub fn drain_events(&mut self) -> Vec<VaultEvent> {
        std::mem::take(&mut self.events)
    }

    // ───────────────────────── Queries ─────────────────────────

    pub fn balance_of(&self, account: &AccountId) -> Amount {
        self.accounts.get(account).map_or(0, |e| e.balance)
    }

    pub fn deposit_count(&self, account: &AccountId) -> u64 {
        self.accounts.get(account).map_or(0, |e| e.deposits)
    }

    pub fn withdrawal_count(&self, account: &AccountId) -> u64 {
        self.accounts.get(account).map_or(0, |e| e.withdrawals)
    }

    pub fn total(&self) -> Amount {
        self.total
    }

    pub fn available_capacity(&self, limits: &Limits) -> Amount {
        limits.capacity.saturating_sub(self.total)
    }

    /// `total == Σ balances`
    pub fn check_invariant(&self) -> bool {
        let sum = self
            .accounts
            .values()
            .try_fold(0u128, |acc, e| acc.checked_add(e.balance));
        sum == Some(self.total)
    }

    /// SHA-256 over the total and every (account, balance) pair in account order.
    pub fn state_root(&self) -> [u8; 32] {
        let mut hasher = Sha256::new();
        hasher.update(self.total.to_be_bytes());
        for (account, entry) in &self.accounts {
            hasher.update(account.as_bytes());
            hasher.update(entry.balance.to_be_bytes());
        }
        hasher.finalize().into()
    }
}
