//! Collaborator interfaces consumed by the vault
//!
//! Implementations are untrusted: any call may re-enter the vault, and
//! asset movements report failure through their `bool` return rather than
//! by panicking. The vault maps every `false` to `TransferFailed`.

use std::rc::Rc;
use vault_types::ids::{AccountId, AssetId};
use vault_types::numeric::Amount;

/// Fungible asset transfer interface.
///
/// The `from`/`owner` argument stands in for the caller of the asset
/// contract: `transfer` moves the caller's own funds, `transfer_from` moves
/// funds `spender` was approved for.
pub trait FungibleAsset {
    fn id(&self) -> AssetId;

    fn balance_of(&self, holder: &AccountId) -> Amount;

    fn transfer(&self, from: &AccountId, to: &AccountId, amount: Amount) -> bool;

    fn transfer_from(
        &self,
        spender: &AccountId,
        from: &AccountId,
        to: &AccountId,
        amount: Amount,
    ) -> bool;

    fn approve(&self, owner: &AccountId, spender: &AccountId, amount: Amount) -> bool;
}

/// Constant-product pool trading two assets.
///
/// Input is transferred to `address()` first; `swap` then releases the
/// requested outputs and re-syncs the cached reserves.
pub trait TradingPool {
    /// Custody address receiving swap input.
    fn address(&self) -> AccountId;

    /// `(asset_a, asset_b)` in the pool's own order.
    fn identities(&self) -> (AssetId, AssetId);

    /// Cached `(reserve_a, reserve_b)` matching `identities()`.
    fn reserves(&self) -> (Amount, Amount);

    fn swap(&self, amount_a_out: Amount, amount_b_out: Amount, recipient: &AccountId) -> bool;

    /// Send balances held above the cached reserves to `recipient`.
    fn skim(&self, recipient: &AccountId) -> bool;
}

/// Locates the direct pool for an asset pair, irrespective of order.
pub trait PoolRegistry {
    fn pool_for(&self, asset_a: &AssetId, asset_b: &AssetId) -> Option<Rc<dyn TradingPool>>;
}

/// Converts the native unit into its fungible form and back.
pub trait NativeWrapper {
    /// The fungible (wrapped) asset.
    fn wrapped(&self) -> Rc<dyn FungibleAsset>;

    /// Take `amount` native units from `payer`, mint wrapped units to `beneficiary`.
    fn wrap(&self, payer: &AccountId, beneficiary: &AccountId, amount: Amount) -> bool;

    /// Burn `amount` wrapped units of `holder`, release native units to `recipient`.
    fn unwrap(&self, holder: &AccountId, recipient: &AccountId, amount: Amount) -> bool;
}

/// Latest oracle answer: `answer / 10^decimals` quote units per native unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PriceRound {
    pub answer: i128,
    pub decimals: u32,
}

/// External price oracle. Informational only; no vault invariant reads it.
pub trait PriceFeed {
    fn latest_round(&self) -> Option<PriceRound>;
}
