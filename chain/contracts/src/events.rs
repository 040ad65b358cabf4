//! Vault events
//!
//! Events are immutable records appended by committed operations. A
//! rolled-back operation leaves no event behind.

use serde::{Deserialize, Serialize};
use vault_types::ids::{AccountId, AssetId};
use vault_types::numeric::Amount;

/// Quote-currency amount credited to an account
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Deposit {
    pub account: AccountId,
    pub amount_quote: Amount,
}

/// Quote-currency amount paid out to an account
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Withdrawal {
    pub account: AccountId,
    pub amount_quote: Amount,
}

/// A deposit was normalized into the quote currency through a pool
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Swapped {
    pub account: AccountId,
    pub asset_in: AssetId,
    pub amount_in: Amount,
    pub amount_quote_out: Amount,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CapacityUpdated {
    pub old: Amount,
    pub new: Amount,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WithdrawalCeilingUpdated {
    pub old: Amount,
    pub new: Amount,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OwnershipTransferred {
    pub previous: AccountId,
    pub new: AccountId,
}

/// Enum wrapper for all vault events, enabling uniform handling.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum VaultEvent {
    Deposit(Deposit),
    Withdrawal(Withdrawal),
    Swapped(Swapped),
    CapacityUpdated(CapacityUpdated),
    WithdrawalCeilingUpdated(WithdrawalCeilingUpdated),
    OwnershipTransferred(OwnershipTransferred),
}
