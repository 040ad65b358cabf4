//! Vault — custody of quote-currency balances
//!
//! Holds the ledger, the owner-mutable limits and the collaborators. The
//! deposit router lives in `deposit.rs` and the withdrawal controller in
//! `withdrawal.rs`; both are `impl Vault` blocks sharing this state.
//!
//! Every mutating entry point:
//! 1. Acquires the execution lock
//! 2. Opens a transaction over the touched ledger entry
//! 3. Validates, mutates the ledger, then calls collaborators
//! 4. Commits, or rolls everything back on error

use rust_decimal::Decimal;
use std::cell::{Cell, RefCell};
use std::rc::Rc;
use tracing::info;
use vault_types::ids::{AccountId, AssetId};
use vault_types::numeric::{to_display_units, Amount};

use crate::config::VaultConfig;
use crate::errors::{VaultError, VaultResult};
use crate::events::{CapacityUpdated, OwnershipTransferred, VaultEvent, WithdrawalCeilingUpdated};
use crate::interfaces::{FungibleAsset, NativeWrapper, PoolRegistry, PriceFeed};
use crate::ledger::{Ledger, Limits};
use crate::security::{ExecutionLock, Ownership};
use crate::swap::SwapEngine;

/// External contracts the vault talks to.
pub struct Collaborators {
    pub quote: Rc<dyn FungibleAsset>,
    pub wrapper: Rc<dyn NativeWrapper>,
    pub pools: Rc<dyn PoolRegistry>,
    pub price_feed: Option<Rc<dyn PriceFeed>>,
}

/// Single-currency custodial vault.
pub struct Vault {
    /// Custody address holding every asset the vault controls
    pub(crate) address: AccountId,
    pub(crate) quote: Rc<dyn FungibleAsset>,
    pub(crate) wrapper: Rc<dyn NativeWrapper>,
    pub(crate) swap_engine: SwapEngine,
    price_feed: Option<Rc<dyn PriceFeed>>,
    quote_decimals: u32,
    pub(crate) ledger: RefCell<Ledger>,
    pub(crate) limits: Cell<Limits>,
    ownership: RefCell<Ownership>,
    pub(crate) lock: ExecutionLock,
}

impl Vault {
    /// Create a vault with a fresh custody address.
    pub fn new(config: VaultConfig, collaborators: Collaborators) -> VaultResult<Self> {
        Self::with_address(AccountId::new(), config, collaborators)
    }

    pub fn with_address(
        address: AccountId,
        config: VaultConfig,
        collaborators: Collaborators,
    ) -> VaultResult<Self> {
        config.validate()?;

        let quote_id = collaborators.quote.id();
        if collaborators.wrapper.wrapped().id() == quote_id {
            return Err(VaultError::invalid_params(
                "wrapped native asset cannot be the quote currency",
            ));
        }
        if address == config.owner {
            return Err(VaultError::invalid_params(
                "vault custody address cannot be the owner",
            ));
        }

        info!(
            %address,
            quote = %quote_id,
            capacity = config.capacity,
            withdrawal_ceiling = config.withdrawal_ceiling,
            "vault created"
        );

        Ok(Self {
            address,
            swap_engine: SwapEngine::new(quote_id, collaborators.pools),
            quote: collaborators.quote,
            wrapper: collaborators.wrapper,
            price_feed: collaborators.price_feed,
            quote_decimals: config.quote_decimals,
            ledger: RefCell::new(Ledger::new()),
            limits: Cell::new(config.limits()),
            ownership: RefCell::new(Ownership::new(config.owner)),
            lock: ExecutionLock::new(),
        })
    }

    // ───────────────────────── Administration ─────────────────────────

    /// Change the capacity. Owner-only; must stay at or above the current total.
    pub fn set_capacity(&self, caller: &AccountId, new_capacity: Amount) -> VaultResult<VaultEvent> {
        let _guard = self.lock.acquire()?;
        self.ownership.borrow().ensure_owner(caller)?;

        if new_capacity == 0 {
            return Err(VaultError::invalid_params("capacity must be non-zero"));
        }
        let total = self.ledger.borrow().total();
        if new_capacity < total {
            return Err(VaultError::invalid_params(format!(
                "capacity {} below current total {}",
                new_capacity, total
            )));
        }

        let mut limits = self.limits.get();
        let old = std::mem::replace(&mut limits.capacity, new_capacity);
        self.limits.set(limits);

        info!(old, new = new_capacity, "capacity updated");
        Ok(self.emit(VaultEvent::CapacityUpdated(CapacityUpdated {
            old,
            new: new_capacity,
        })))
    }

    /// Change the per-withdrawal ceiling. Owner-only.
    pub fn set_withdrawal_ceiling(
        &self,
        caller: &AccountId,
        new_ceiling: Amount,
    ) -> VaultResult<VaultEvent> {
        let _guard = self.lock.acquire()?;
        self.ownership.borrow().ensure_owner(caller)?;

        if new_ceiling == 0 {
            return Err(VaultError::invalid_params(
                "withdrawal ceiling must be non-zero",
            ));
        }

        let mut limits = self.limits.get();
        let old = std::mem::replace(&mut limits.withdrawal_ceiling, new_ceiling);
        self.limits.set(limits);

        info!(old, new = new_ceiling, "withdrawal ceiling updated");
        Ok(self.emit(VaultEvent::WithdrawalCeilingUpdated(
            WithdrawalCeilingUpdated {
                old,
                new: new_ceiling,
            },
        )))
    }

    pub fn transfer_ownership(
        &self,
        caller: &AccountId,
        new_owner: AccountId,
    ) -> VaultResult<VaultEvent> {
        let _guard = self.lock.acquire()?;
        let previous = self.ownership.borrow_mut().transfer(caller, new_owner)?;

        info!(%previous, new = %new_owner, "ownership transferred");
        Ok(self.emit(VaultEvent::OwnershipTransferred(OwnershipTransferred {
            previous,
            new: new_owner,
        })))
    }

    fn emit(&self, event: VaultEvent) -> VaultEvent {
        self.ledger.borrow_mut().emit(event.clone());
        event
    }

    // ───────────────────────── Queries ─────────────────────────

    pub fn address(&self) -> AccountId {
        self.address
    }

    pub fn owner(&self) -> AccountId {
        self.ownership.borrow().owner()
    }

    pub fn quote_asset(&self) -> AssetId {
        self.quote.id()
    }

    pub fn balance_of(&self, account: &AccountId) -> Amount {
        self.ledger.borrow().balance_of(account)
    }

    pub fn total_deposited(&self) -> Amount {
        self.ledger.borrow().total()
    }

    pub fn capacity(&self) -> Amount {
        self.limits.get().capacity
    }

    pub fn withdrawal_ceiling(&self) -> Amount {
        self.limits.get().withdrawal_ceiling
    }

    /// Quote units that can still be credited before hitting capacity.
    pub fn available_capacity(&self) -> Amount {
        self.ledger.borrow().available_capacity(&self.limits.get())
    }

    pub fn deposit_count(&self, account: &AccountId) -> u64 {
        self.ledger.borrow().deposit_count(account)
    }

    pub fn withdrawal_count(&self, account: &AccountId) -> u64 {
        self.ledger.borrow().withdrawal_count(account)
    }

    pub fn is_locked(&self) -> bool {
        self.lock.is_locked()
    }

    /// Balance in whole quote units, e.g. `12.500000`.
    pub fn balance_display(&self, account: &AccountId) -> Option<Decimal> {
        to_display_units(self.balance_of(account), self.quote_decimals)
    }

    /// Oracle price of the native unit in quote currency. Display only.
    pub fn native_price(&self) -> Option<Decimal> {
        let round = self.price_feed.as_ref()?.latest_round()?;
        if round.answer <= 0 {
            return None;
        }
        Decimal::try_from_i128_with_scale(round.answer, round.decimals).ok()
    }

    /// `total == Σ balances`
    pub fn is_consistent(&self) -> bool {
        self.ledger.borrow().check_invariant()
    }

    pub fn state_root(&self) -> [u8; 32] {
        self.ledger.borrow().state_root()
    }

    /// Snapshot of the event log.
    pub fn events(&self) -> Vec<VaultEvent> {
        self.ledger.borrow().events().to_vec()
    }

    /// Drain the event log. Refused while an operation is in flight.
    pub fn drain_events(&self) -> VaultResult<Vec<VaultEvent>> {
        let _guard = self.lock.acquire()?;
        Ok(self.ledger.borrow_mut().drain_events())
    }
}
