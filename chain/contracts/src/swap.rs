//! SwapEngine — single-pool constant-product exchange into the quote currency
//!
//! Output is computed with the 0.3% fee formula and always rounded down:
//!
//! ```text
//! amount_in_with_fee = amount_in * 997
//! amount_out = amount_in_with_fee * reserve_out / (reserve_in * 1000 + amount_in_with_fee)
//! ```
//!
//! There is no multi-hop routing and no minimum-output guard: the swap
//! executes at whatever price the pool offers when it is called.

use std::rc::Rc;
use tracing::{debug, info};
use vault_types::ids::{AccountId, AssetId};
use vault_types::numeric::Amount;

use crate::errors::{VaultError, VaultResult};
use crate::interfaces::{FungibleAsset, PoolRegistry, TradingPool};
use crate::transaction::{Compensation, Transaction};

/// Fee multiplier numerator applied to the input (0.3% fee).
pub const FEE_NUMERATOR: u128 = 997;
/// Fee multiplier denominator.
pub const FEE_DENOMINATOR: u128 = 1000;

/// Constant-product output for `amount_in` against the given reserves.
pub fn get_amount_out(amount_in: Amount, reserve_in: Amount, reserve_out: Amount) -> VaultResult<Amount> {
    if amount_in == 0 {
        return Err(VaultError::ZeroAmount);
    }
    if reserve_in == 0 || reserve_out == 0 {
        return Err(VaultError::InsufficientLiquidity);
    }

    let amount_in_with_fee = amount_in.checked_mul(FEE_NUMERATOR).ok_or(VaultError::Overflow)?;
    let numerator = amount_in_with_fee
        .checked_mul(reserve_out)
        .ok_or(VaultError::Overflow)?;
    let denominator = reserve_in
        .checked_mul(FEE_DENOMINATOR)
        .and_then(|r| r.checked_add(amount_in_with_fee))
        .ok_or(VaultError::Overflow)?;

    Ok(numerator / denominator)
}

/// Which side of the pool holds the input asset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Side {
    A,
    B,
}

/// A located pool with reserves oriented as (input, quote).
struct Route {
    pool: Rc<dyn TradingPool>,
    input_side: Side,
    reserve_in: Amount,
    reserve_out: Amount,
}

/// Completed swap
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SwapOutcome {
    pub asset_in: AssetId,
    pub amount_in: Amount,
    pub amount_out: Amount,
}

/// Swaps held assets into the quote currency through direct pools.
pub struct SwapEngine {
    quote: AssetId,
    pools: Rc<dyn PoolRegistry>,
}

impl SwapEngine {
    pub fn new(quote: AssetId, pools: Rc<dyn PoolRegistry>) -> Self {
        Self { quote, pools }
    }

    pub fn quote_asset(&self) -> &AssetId {
        &self.quote
    }

    fn route(&self, asset_in: &AssetId) -> VaultResult<Route> {
        let no_path = || VaultError::NoDirectPath {
            asset: asset_in.clone(),
        };
        let pool = self.pools.pool_for(asset_in, &self.quote).ok_or_else(no_path)?;

        let (asset_a, asset_b) = pool.identities();
        let (reserve_a, reserve_b) = pool.reserves();
        let (input_side, reserve_in, reserve_out) = if asset_a == *asset_in && asset_b == self.quote {
            (Side::A, reserve_a, reserve_b)
        } else if asset_b == *asset_in && asset_a == self.quote {
            (Side::B, reserve_b, reserve_a)
        } else {
            return Err(no_path());
        };

        Ok(Route {
            pool,
            input_side,
            reserve_in,
            reserve_out,
        })
    }

    /// Quote-currency output a swap of `amount_in` would produce right now.
    pub fn quote(&self, asset_in: &AssetId, amount_in: Amount) -> VaultResult<Amount> {
        let route = self.route(asset_in)?;
        get_amount_out(amount_in, route.reserve_in, route.reserve_out)
    }

    /// Swap `amount_in` of `asset_in` held by `custody` into the quote currency.
    ///
    /// Until the pool pays out, the input leg is compensated by skimming the
    /// pool back to `custody`. Once it pays out, the journal settles into a
    /// single quote-currency refund to `refund_to`.
    pub fn swap(
        &self,
        tx: &mut Transaction<'_>,
        asset_in: &Rc<dyn FungibleAsset>,
        amount_in: Amount,
        custody: &AccountId,
        refund_to: &AccountId,
        quote_asset: &Rc<dyn FungibleAsset>,
    ) -> VaultResult<SwapOutcome> {
        let asset_id = asset_in.id();
        let route = self.route(&asset_id)?;
        let amount_out = get_amount_out(amount_in, route.reserve_in, route.reserve_out)?;

        debug!(
            asset = %asset_id,
            amount_in,
            amount_out,
            reserve_in = route.reserve_in,
            reserve_out = route.reserve_out,
            "executing swap"
        );

        let pool_address = route.pool.address();
        if !asset_in.transfer(custody, &pool_address, amount_in) {
            return Err(VaultError::transfer_failed(&asset_id, "input transfer to pool"));
        }
        tx.record(Compensation::Skim {
            pool: Rc::clone(&route.pool),
            recipient: *custody,
        });

        let (out_a, out_b) = match route.input_side {
            Side::A => (0, amount_out),
            Side::B => (amount_out, 0),
        };
        if !route.pool.swap(out_a, out_b, custody) {
            return Err(VaultError::transfer_failed(&self.quote, "pool swap output"));
        }
        tx.settle(Compensation::Refund {
            asset: Rc::clone(quote_asset),
            from: *custody,
            to: *refund_to,
            amount: amount_out,
        });

        info!(asset = %asset_id, amount_in, amount_out, "swap settled");

        Ok(SwapOutcome {
            asset_in: asset_id,
            amount_in,
            amount_out,
        })
    }
}
