//! Security primitives: execution lock and owner capability
//!
//! The lock wraps every state-mutating entry point of the vault. Entry
//! points take `&self` so that a collaborator calling back into the vault
//! mid-operation reaches the lock check instead of a borrow conflict.

use serde::{Deserialize, Serialize};
use std::cell::Cell;
use vault_types::ids::AccountId;

use crate::errors::VaultError;

/// Lock state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LockState {
    Unlocked,
    Locked,
}

/// Reentrancy lock preventing nested calls into protected operations.
///
/// `acquire` hands out a `LockGuard`; the lock returns to `Unlocked` when
/// the guard drops, on success and error paths alike.
#[derive(Debug)]
pub struct ExecutionLock {
    state: Cell<LockState>,
}

impl ExecutionLock {
    /// Create a new unlocked lock.
    pub fn new() -> Self {
        Self {
            state: Cell::new(LockState::Unlocked),
        }
    }

    /// Transition `Unlocked -> Locked`, or fail with `Reentrancy`.
    pub fn acquire(&self) -> Result<LockGuard<'_>, VaultError> {
        match self.state.get() {
            LockState::Locked => Err(VaultError::Reentrancy),
            LockState::Unlocked => {
                self.state.set(LockState::Locked);
                Ok(LockGuard { lock: self })
            }
        }
    }

    pub fn state(&self) -> LockState {
        self.state.get()
    }

    pub fn is_locked(&self) -> bool {
        self.state.get() == LockState::Locked
    }
}

impl Default for ExecutionLock {
    fn default() -> Self {
        Self::new()
    }
}

/// Held for the duration of one top-level operation.
#[derive(Debug)]
#[must_use = "the lock is released as soon as the guard is dropped"]
pub struct LockGuard<'a> {
    lock: &'a ExecutionLock,
}

impl Drop for LockGuard<'_> {
    fn drop(&mut self) {
        self.lock.state.set(LockState::Unlocked);
    }
}

/// Owner capability gating administrative parameter updates.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ownership {
    owner: AccountId,
}

impl Ownership {
    pub fn new(owner: AccountId) -> Self {
        Self { owner }
    }

    /// Fail with `Unauthorized` unless `caller` is the owner.
    pub fn ensure_owner(&self, caller: &AccountId) -> Result<(), VaultError> {
        if *caller != self.owner {
            return Err(VaultError::Unauthorized);
        }
        Ok(())
    }

    /// Hand ownership to `new_owner`. Returns the previous owner.
    pub fn transfer(
        &mut self,
        caller: &AccountId,
        new_owner: AccountId,
    ) -> Result<AccountId, VaultError> {
        self.ensure_owner(caller)?;
        Ok(std::mem::replace(&mut self.owner, new_owner))
    }

    pub fn owner(&self) -> AccountId {
        self.owner
    }
}
