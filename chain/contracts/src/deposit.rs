//! DepositRouter — classify an incoming deposit and drive it into the ledger
//!
//! Three paths, each ending in exactly one `Ledger::credit`:
//! - Native unit: wrap, swap to quote, credit the swap output
//! - Quote currency: pull from the depositor, credit the amount unchanged
//! - Other fungible asset: pull, swap to quote, credit the swap output
//!
//! Capacity is checked against the quoted output before any asset moves.
//! The credit re-checks it; reserves cannot move in between because the
//! lock rejects every other entry into the vault.

use std::rc::Rc;
use tracing::{debug, info};
use vault_types::ids::{AccountId, AssetId};
use vault_types::numeric::Amount;

use crate::errors::{VaultError, VaultResult};
use crate::events::{Swapped, VaultEvent};
use crate::interfaces::FungibleAsset;
use crate::swap::SwapOutcome;
use crate::transaction::{Compensation, Transaction};
use crate::vault::Vault;

/// Deposit classification
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssetKind {
    /// The chain's base unit, attached to the call
    Native,
    /// The vault's unit of account
    Quote,
    /// Any other fungible asset with a direct pool to the quote currency
    Other,
}

/// What a depositor hands to the vault.
#[derive(Clone)]
pub enum DepositRequest {
    Native { amount: Amount },
    Token { asset: Rc<dyn FungibleAsset>, amount: Amount },
}

impl DepositRequest {
    pub fn amount(&self) -> Amount {
        match self {
            DepositRequest::Native { amount } | DepositRequest::Token { amount, .. } => *amount,
        }
    }
}

impl Vault {
    /// Classify a fungible asset by id. Native deposits never carry an asset.
    pub fn classify(&self, asset: &AssetId) -> AssetKind {
        if *asset == self.quote.id() {
            AssetKind::Quote
        } else {
            AssetKind::Other
        }
    }

    /// Route a deposit to its path. Returns the quote amount credited.
    pub fn deposit(&self, caller: &AccountId, request: DepositRequest) -> VaultResult<Amount> {
        match request {
            DepositRequest::Native { amount } => self.deposit_native(caller, amount),
            DepositRequest::Token { asset, amount } => self.deposit_token(caller, &asset, amount),
        }
    }

    /// Deposit a fungible asset, swapping it first unless it is the quote currency.
    pub fn deposit_token(
        &self,
        caller: &AccountId,
        asset: &Rc<dyn FungibleAsset>,
        amount: Amount,
    ) -> VaultResult<Amount> {
        match self.classify(&asset.id()) {
            AssetKind::Quote => self.deposit_quote(caller, amount),
            _ => self.deposit_other(caller, asset, amount),
        }
    }

    /// Deposit `amount` of the native unit held by `caller`.
    pub fn deposit_native(&self, caller: &AccountId, amount: Amount) -> VaultResult<Amount> {
        let _guard = self.lock.acquire()?;
        if amount == 0 {
            return Err(VaultError::ZeroAmount);
        }
        let mut tx = Transaction::begin(&self.ledger, *caller);

        let wrapped = self.wrapper.wrapped();
        self.preflight(&wrapped.id(), amount)?;

        if !self.wrapper.wrap(caller, &self.address, amount) {
            return Err(VaultError::transfer_failed(&wrapped.id(), "wrap native deposit"));
        }
        tx.record(Compensation::Unwrap {
            wrapper: Rc::clone(&self.wrapper),
            holder: self.address,
            recipient: *caller,
            amount,
        });

        let outcome = self.swap_to_quote(&mut tx, caller, &wrapped, amount)?;
        self.credit(caller, outcome.amount_out)?;
        tx.commit();

        info!(account = %caller, amount, credited = outcome.amount_out, "native deposit");
        Ok(outcome.amount_out)
    }

    fn deposit_quote(&self, caller: &AccountId, amount: Amount) -> VaultResult<Amount> {
        let _guard = self.lock.acquire()?;
        if amount == 0 {
            return Err(VaultError::ZeroAmount);
        }
        let mut tx = Transaction::begin(&self.ledger, *caller);
        self.ledger
            .borrow()
            .ensure_capacity(amount, &self.limits.get())?;

        self.pull(&mut tx, caller, &self.quote, amount)?;
        self.credit(caller, amount)?;
        tx.commit();

        info!(account = %caller, amount, "quote deposit");
        Ok(amount)
    }

    fn deposit_other(
        &self,
        caller: &AccountId,
        asset: &Rc<dyn FungibleAsset>,
        amount: Amount,
    ) -> VaultResult<Amount> {
        let _guard = self.lock.acquire()?;
        if amount == 0 {
            return Err(VaultError::ZeroAmount);
        }
        let mut tx = Transaction::begin(&self.ledger, *caller);
        self.preflight(&asset.id(), amount)?;

        self.pull(&mut tx, caller, asset, amount)?;
        let outcome = self.swap_to_quote(&mut tx, caller, asset, amount)?;
        self.credit(caller, outcome.amount_out)?;
        tx.commit();

        info!(
            account = %caller,
            asset = %outcome.asset_in,
            amount,
            credited = outcome.amount_out,
            "token deposit"
        );
        Ok(outcome.amount_out)
    }

    /// Quote the swap output and make sure it fits under capacity.
    fn preflight(&self, asset: &AssetId, amount: Amount) -> VaultResult<Amount> {
        let expected = self.swap_engine.quote(asset, amount)?;
        self.ledger
            .borrow()
            .ensure_capacity(expected, &self.limits.get())?;
        debug!(%asset, amount, expected, "deposit preflight passed");
        Ok(expected)
    }

    /// Move `amount` of `asset` from the depositor into custody.
    fn pull(
        &self,
        tx: &mut Transaction<'_>,
        caller: &AccountId,
        asset: &Rc<dyn FungibleAsset>,
        amount: Amount,
    ) -> VaultResult<()> {
        if !asset.transfer_from(&self.address, caller, &self.address, amount) {
            return Err(VaultError::transfer_failed(&asset.id(), "pull from depositor"));
        }
        tx.record(Compensation::Refund {
            asset: Rc::clone(asset),
            from: self.address,
            to: *caller,
            amount,
        });
        Ok(())
    }

    fn swap_to_quote(
        &self,
        tx: &mut Transaction<'_>,
        caller: &AccountId,
        asset: &Rc<dyn FungibleAsset>,
        amount: Amount,
    ) -> VaultResult<SwapOutcome> {
        let outcome = self
            .swap_engine
            .swap(tx, asset, amount, &self.address, caller, &self.quote)?;

        self.ledger
            .borrow_mut()
            .emit(VaultEvent::Swapped(Swapped {
                account: *caller,
                asset_in: outcome.asset_in.clone(),
                amount_in: outcome.amount_in,
                amount_quote_out: outcome.amount_out,
            }));
        Ok(outcome)
    }

    fn credit(&self, caller: &AccountId, amount: Amount) -> VaultResult<VaultEvent> {
        let limits = self.limits.get();
        self.ledger.borrow_mut().credit(*caller, amount, &limits)
    }

    /// Quote amount a deposit of `asset` would credit right now, without effects.
    pub fn preview_deposit(&self, asset: &AssetId, amount: Amount) -> VaultResult<Amount> {
        if amount == 0 {
            return Err(VaultError::ZeroAmount);
        }
        match self.classify(asset) {
            AssetKind::Quote => Ok(amount),
            _ => self.swap_engine.quote(asset, amount),
        }
    }

    pub fn preview_native_deposit(&self, amount: Amount) -> VaultResult<Amount> {
        self.preview_deposit(&self.wrapper.wrapped().id(), amount)
    }
}
