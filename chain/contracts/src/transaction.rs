//! Transactional boundary around one top-level vault operation
//!
//! A `Transaction` checkpoints the ledger entry it is about to touch and
//! journals a compensation for every external effect that succeeds. If it
//! is dropped without `commit`, the ledger is restored and compensations
//! run newest-first, so a failed operation leaves neither ledger state nor
//! custody changed.
//!
//! Create the transaction after acquiring the execution lock: locals drop
//! in reverse order, so the rollback then runs while the lock is still held.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;
use tracing::warn;
use vault_types::ids::AccountId;
use vault_types::numeric::Amount;

use crate::interfaces::{FungibleAsset, NativeWrapper, TradingPool};
use crate::ledger::{Ledger, LedgerCheckpoint};

/// Undo action for an external effect already performed.
pub enum Compensation {
    /// Move `amount` of `asset` from `from` back to `to`.
    Refund {
        asset: Rc<dyn FungibleAsset>,
        from: AccountId,
        to: AccountId,
        amount: Amount,
    },
    /// Return pool balances above its reserves to `recipient`.
    Skim {
        pool: Rc<dyn TradingPool>,
        recipient: AccountId,
    },
    /// Convert wrapped units held by `holder` back to native for `recipient`.
    Unwrap {
        wrapper: Rc<dyn NativeWrapper>,
        holder: AccountId,
        recipient: AccountId,
        amount: Amount,
    },
}

impl Compensation {
    fn run(&self) -> bool {
        match self {
            Compensation::Refund {
                asset,
                from,
                to,
                amount,
            } => asset.transfer(from, to, *amount),
            Compensation::Skim { pool, recipient } => pool.skim(recipient),
            Compensation::Unwrap {
                wrapper,
                holder,
                recipient,
                amount,
            } => wrapper.unwrap(holder, recipient, *amount),
        }
    }
}

impl fmt::Debug for Compensation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Compensation::Refund {
                asset, to, amount, ..
            } => write!(f, "Refund({} {} -> {})", amount, asset.id(), to),
            Compensation::Skim { pool, recipient } => {
                write!(f, "Skim({} -> {})", pool.address(), recipient)
            }
            Compensation::Unwrap {
                recipient, amount, ..
            } => write!(f, "Unwrap({} -> {})", amount, recipient),
        }
    }
}

/// All-or-nothing scope for one operation.
pub struct Transaction<'a> {
    ledger: &'a RefCell<Ledger>,
    checkpoint: Option<LedgerCheckpoint>,
    journal: Vec<Compensation>,
    committed: bool,
}

impl<'a> Transaction<'a> {
    /// Open a transaction that will touch `account`'s ledger entry.
    pub fn begin(ledger: &'a RefCell<Ledger>, account: AccountId) -> Self {
        let checkpoint = ledger.borrow().checkpoint(account);
        Self {
            ledger,
            checkpoint: Some(checkpoint),
            journal: Vec::new(),
            committed: false,
        }
    }

    /// Journal the undo for an external effect that just succeeded.
    pub fn record(&mut self, compensation: Compensation) {
        self.journal.push(compensation);
    }

    /// Replace the whole journal with one compensation. Used when a later
    /// effect consumed every earlier one: after a completed swap the value
    /// pulled, wrapped or sent to the pool is all held as quote output.
    pub fn settle(&mut self, compensation: Compensation) {
        self.journal.clear();
        self.journal.push(compensation);
    }

    pub fn pending(&self) -> usize {
        self.journal.len()
    }

    pub fn commit(mut self) {
        self.committed = true;
        self.journal.clear();
    }

    fn roll_back(&mut self) {
        if let Some(checkpoint) = self.checkpoint.take() {
            self.ledger.borrow_mut().restore(checkpoint);
        }
        let journal = std::mem::take(&mut self.journal);
        let steps = journal.len();
        for compensation in journal.iter().rev() {
            if !compensation.run() {
                warn!(?compensation, "compensation failed during rollback");
            }
        }
        if steps > 0 {
            warn!(steps, "operation rolled back with compensations");
        }
    }
}

impl Drop for Transaction<'_> {
    fn drop(&mut self) {
        if !self.committed {
            self.roll_back();
        }
    }
}
