//! In-memory collaborators for vault integration tests
//!
//! - `MockToken`: balances + allowances, failure switches, optional re-entry hook
//! - `MockPool`: constant-product pair with cached reserves, `swap` and `skim`
//! - `MockRegistry`: order-insensitive pool lookup
//! - `MockWrapper`: native ledger wrapping into a `MockToken`
//! - `MockPriceFeed`: fixed oracle answer

#![allow(dead_code)]

use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::rc::Rc;

use quote_vault::interfaces::{
    FungibleAsset, NativeWrapper, PoolRegistry, PriceFeed, PriceRound, TradingPool,
};
use quote_vault::{Collaborators, Vault, VaultConfig};
use vault_types::ids::{AccountId, AssetId};
use vault_types::numeric::Amount;

pub fn init_tracing() {
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();
}

// ═══════════════════════════════════════════════════════════════════
// Token
// ═══════════════════════════════════════════════════════════════════

type Hook = Box<dyn Fn()>;

pub struct MockToken {
    id: AssetId,
    balances: RefCell<HashMap<AccountId, Amount>>,
    allowances: RefCell<HashMap<(AccountId, AccountId), Amount>>,
    pub fail_transfer: Cell<bool>,
    pub fail_transfer_from: Cell<bool>,
    hook: RefCell<Option<Hook>>,
}

impl MockToken {
    pub fn new(symbol: &str) -> Rc<Self> {
        Rc::new(Self {
            id: AssetId::new(symbol),
            balances: RefCell::new(HashMap::new()),
            allowances: RefCell::new(HashMap::new()),
            fail_transfer: Cell::new(false),
            fail_transfer_from: Cell::new(false),
            hook: RefCell::new(None),
        })
    }

    pub fn mint(&self, to: &AccountId, amount: Amount) {
        *self.balances.borrow_mut().entry(*to).or_default() += amount;
    }

    pub fn burn(&self, from: &AccountId, amount: Amount) -> bool {
        let mut balances = self.balances.borrow_mut();
        let balance = balances.entry(*from).or_default();
        if *balance < amount {
            return false;
        }
        *balance -= amount;
        true
    }

    /// Run `hook` after every successful movement, like a receive callback.
    pub fn set_hook(&self, hook: impl Fn() + 'static) {
        *self.hook.borrow_mut() = Some(Box::new(hook));
    }

    pub fn clear_hook(&self) {
        self.hook.borrow_mut().take();
    }

    pub fn allowance(&self, owner: &AccountId, spender: &AccountId) -> Amount {
        self.allowances
            .borrow()
            .get(&(*owner, *spender))
            .copied()
            .unwrap_or(0)
    }

    fn move_balance(&self, from: &AccountId, to: &AccountId, amount: Amount) -> bool {
        let mut balances = self.balances.borrow_mut();
        let available = balances.get(from).copied().unwrap_or(0);
        if available < amount {
            return false;
        }
        *balances.entry(*from).or_default() -= amount;
        *balances.entry(*to).or_default() += amount;
        true
    }

    fn fire_hook(&self) {
        // Taken out while running so a nested movement cannot recurse into it.
        let hook = self.hook.borrow_mut().take();
        if let Some(hook) = hook {
            hook();
            let mut slot = self.hook.borrow_mut();
            if slot.is_none() {
                *slot = Some(hook);
            }
        }
    }
}

impl FungibleAsset for MockToken {
    fn id(&self) -> AssetId {
        self.id.clone()
    }

    fn balance_of(&self, holder: &AccountId) -> Amount {
        self.balances.borrow().get(holder).copied().unwrap_or(0)
    }

    fn transfer(&self, from: &AccountId, to: &AccountId, amount: Amount) -> bool {
        if self.fail_transfer.get() || !self.move_balance(from, to, amount) {
            return false;
        }
        self.fire_hook();
        true
    }

    fn transfer_from(
        &self,
        spender: &AccountId,
        from: &AccountId,
        to: &AccountId,
        amount: Amount,
    ) -> bool {
        if self.fail_transfer_from.get() || self.allowance(from, spender) < amount {
            return false;
        }
        if !self.move_balance(from, to, amount) {
            return false;
        }
        *self
            .allowances
            .borrow_mut()
            .entry((*from, *spender))
            .or_default() -= amount;
        self.fire_hook();
        true
    }

    fn approve(&self, owner: &AccountId, spender: &AccountId, amount: Amount) -> bool {
        self.allowances.borrow_mut().insert((*owner, *spender), amount);
        true
    }
}

// ═══════════════════════════════════════════════════════════════════
// Pool
// ═══════════════════════════════════════════════════════════════════

pub struct MockPool {
    address: AccountId,
    token_a: Rc<MockToken>,
    token_b: Rc<MockToken>,
    reserves: Cell<(Amount, Amount)>,
    pub fail_swap: Cell<bool>,
}

impl MockPool {
    /// Seed a pool holding `reserve_a` of `token_a` and `reserve_b` of `token_b`.
    pub fn new(
        token_a: &Rc<MockToken>,
        token_b: &Rc<MockToken>,
        reserve_a: Amount,
        reserve_b: Amount,
    ) -> Rc<Self> {
        let address = AccountId::new();
        token_a.mint(&address, reserve_a);
        token_b.mint(&address, reserve_b);
        Rc::new(Self {
            address,
            token_a: Rc::clone(token_a),
            token_b: Rc::clone(token_b),
            reserves: Cell::new((reserve_a, reserve_b)),
            fail_swap: Cell::new(false),
        })
    }

    fn balances(&self) -> (Amount, Amount) {
        (
            self.token_a.balance_of(&self.address),
            self.token_b.balance_of(&self.address),
        )
    }
}

impl TradingPool for MockPool {
    fn address(&self) -> AccountId {
        self.address
    }

    fn identities(&self) -> (AssetId, AssetId) {
        (self.token_a.id(), self.token_b.id())
    }

    fn reserves(&self) -> (Amount, Amount) {
        self.reserves.get()
    }

    fn swap(&self, amount_a_out: Amount, amount_b_out: Amount, recipient: &AccountId) -> bool {
        if self.fail_swap.get() {
            return false;
        }
        let (reserve_a, reserve_b) = self.reserves.get();
        if amount_a_out >= reserve_a || amount_b_out >= reserve_b {
            return false;
        }

        let (balance_a, balance_b) = self.balances();
        let in_a = balance_a.saturating_sub(reserve_a);
        let in_b = balance_b.saturating_sub(reserve_b);
        if in_a == 0 && in_b == 0 {
            return false;
        }

        // Fee-adjusted product check on post-swap balances
        let after_a = balance_a - amount_a_out;
        let after_b = balance_b - amount_b_out;
        let adjusted_a = after_a * 1000 - in_a * 3;
        let adjusted_b = after_b * 1000 - in_b * 3;
        if adjusted_a * adjusted_b < reserve_a * reserve_b * 1_000_000 {
            return false;
        }

        if amount_a_out > 0 && !self.token_a.transfer(&self.address, recipient, amount_a_out) {
            return false;
        }
        if amount_b_out > 0 && !self.token_b.transfer(&self.address, recipient, amount_b_out) {
            return false;
        }
        self.reserves.set(self.balances());
        true
    }

    fn skim(&self, recipient: &AccountId) -> bool {
        let (reserve_a, reserve_b) = self.reserves.get();
        let (balance_a, balance_b) = self.balances();
        let excess_a = balance_a.saturating_sub(reserve_a);
        let excess_b = balance_b.saturating_sub(reserve_b);
        (excess_a == 0 || self.token_a.transfer(&self.address, recipient, excess_a))
            && (excess_b == 0 || self.token_b.transfer(&self.address, recipient, excess_b))
    }
}

#[derive(Default)]
pub struct MockRegistry {
    pools: RefCell<Vec<Rc<MockPool>>>,
}

impl MockRegistry {
    pub fn add(&self, pool: &Rc<MockPool>) {
        self.pools.borrow_mut().push(Rc::clone(pool));
    }
}

impl PoolRegistry for MockRegistry {
    fn pool_for(&self, asset_a: &AssetId, asset_b: &AssetId) -> Option<Rc<dyn TradingPool>> {
        self.pools
            .borrow()
            .iter()
            .find(|pool| {
                let (a, b) = pool.identities();
                (a == *asset_a && b == *asset_b) || (a == *asset_b && b == *asset_a)
            })
            .map(|pool| Rc::clone(pool) as Rc<dyn TradingPool>)
    }
}

// ═══════════════════════════════════════════════════════════════════
// Wrapper & oracle
// ═══════════════════════════════════════════════════════════════════

pub struct MockWrapper {
    token: Rc<MockToken>,
    native: RefCell<HashMap<AccountId, Amount>>,
}

impl MockWrapper {
    pub fn new(token: &Rc<MockToken>) -> Rc<Self> {
        Rc::new(Self {
            token: Rc::clone(token),
            native: RefCell::new(HashMap::new()),
        })
    }

    pub fn fund_native(&self, holder: &AccountId, amount: Amount) {
        *self.native.borrow_mut().entry(*holder).or_default() += amount;
    }

    pub fn native_balance_of(&self, holder: &AccountId) -> Amount {
        self.native.borrow().get(holder).copied().unwrap_or(0)
    }
}

impl NativeWrapper for MockWrapper {
    fn wrapped(&self) -> Rc<dyn FungibleAsset> {
        Rc::clone(&self.token) as Rc<dyn FungibleAsset>
    }

    fn wrap(&self, payer: &AccountId, beneficiary: &AccountId, amount: Amount) -> bool {
        {
            let mut native = self.native.borrow_mut();
            let balance = native.entry(*payer).or_default();
            if *balance < amount {
                return false;
            }
            *balance -= amount;
        }
        self.token.mint(beneficiary, amount);
        true
    }

    fn unwrap(&self, holder: &AccountId, recipient: &AccountId, amount: Amount) -> bool {
        if !self.token.burn(holder, amount) {
            return false;
        }
        self.fund_native(recipient, amount);
        true
    }
}

pub struct MockPriceFeed {
    pub round: Option<PriceRound>,
}

impl PriceFeed for MockPriceFeed {
    fn latest_round(&self) -> Option<PriceRound> {
        self.round
    }
}

// ═══════════════════════════════════════════════════════════════════
// Fixture
// ═══════════════════════════════════════════════════════════════════

pub const WETH_POOL_RESERVE: Amount = 1_000_000;
pub const DAI_POOL_USDC_RESERVE: Amount = 4_000_000;
pub const DAI_POOL_DAI_RESERVE: Amount = 2_000_000;
pub const STARTING_FUNDS: Amount = 1_000_000;

/// A vault wired to USDC (quote), WETH (wrapped native) and DAI.
///
/// Pools: WETH/USDC at 1:1, USDC/DAI at 2:1 (quote on side A). SHIB has no pool.
pub struct Env {
    pub vault: Rc<Vault>,
    pub usdc: Rc<MockToken>,
    pub weth: Rc<MockToken>,
    pub dai: Rc<MockToken>,
    pub shib: Rc<MockToken>,
    pub wrapper: Rc<MockWrapper>,
    pub weth_pool: Rc<MockPool>,
    pub dai_pool: Rc<MockPool>,
    pub owner: AccountId,
    pub alice: AccountId,
    pub bob: AccountId,
}

impl Env {
    pub fn new() -> Self {
        Self::with_limits(10_000_000, 500_000)
    }

    pub fn with_limits(capacity: Amount, withdrawal_ceiling: Amount) -> Self {
        Self::build(capacity, withdrawal_ceiling, None)
    }

    pub fn with_price_feed(round: Option<PriceRound>) -> Self {
        Self::build(10_000_000, 500_000, Some(round))
    }

    fn build(capacity: Amount, withdrawal_ceiling: Amount, feed: Option<Option<PriceRound>>) -> Self {
        init_tracing();

        let usdc = MockToken::new("USDC");
        let weth = MockToken::new("WETH");
        let dai = MockToken::new("DAI");
        let shib = MockToken::new("SHIB");

        let weth_pool = MockPool::new(&weth, &usdc, WETH_POOL_RESERVE, WETH_POOL_RESERVE);
        let dai_pool = MockPool::new(&usdc, &dai, DAI_POOL_USDC_RESERVE, DAI_POOL_DAI_RESERVE);
        let registry = Rc::new(MockRegistry::default());
        registry.add(&weth_pool);
        registry.add(&dai_pool);

        let wrapper = MockWrapper::new(&weth);
        let owner = AccountId::new();
        let config = VaultConfig {
            owner,
            capacity,
            withdrawal_ceiling,
            ..VaultConfig::default()
        };
        let collaborators = Collaborators {
            quote: Rc::clone(&usdc) as Rc<dyn FungibleAsset>,
            wrapper: Rc::clone(&wrapper) as Rc<dyn NativeWrapper>,
            pools: registry as Rc<dyn PoolRegistry>,
            price_feed: feed.map(|round| Rc::new(MockPriceFeed { round }) as Rc<dyn PriceFeed>),
        };
        let vault = Rc::new(Vault::new(config, collaborators).unwrap());

        let alice = AccountId::new();
        let bob = AccountId::new();
        for user in [&alice, &bob] {
            usdc.mint(user, STARTING_FUNDS);
            dai.mint(user, STARTING_FUNDS);
            shib.mint(user, STARTING_FUNDS);
            wrapper.fund_native(user, STARTING_FUNDS);
            for token in [&usdc, &dai, &shib, &weth] {
                token.approve(user, &vault.address(), Amount::MAX);
            }
        }

        Self {
            vault,
            usdc,
            weth,
            dai,
            shib,
            wrapper,
            weth_pool,
            dai_pool,
            owner,
            alice,
            bob,
        }
    }

    pub fn usdc_asset(&self) -> Rc<dyn FungibleAsset> {
        Rc::clone(&self.usdc) as Rc<dyn FungibleAsset>
    }

    pub fn dai_asset(&self) -> Rc<dyn FungibleAsset> {
        Rc::clone(&self.dai) as Rc<dyn FungibleAsset>
    }

    pub fn shib_asset(&self) -> Rc<dyn FungibleAsset> {
        Rc::clone(&self.shib) as Rc<dyn FungibleAsset>
    }

    /// Quote currency actually held in custody.
    pub fn custody(&self) -> Amount {
        self.usdc.balance_of(&self.vault.address())
    }
}
