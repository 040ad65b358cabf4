//! Quote-currency custodial vault
//!
//! Users deposit heterogeneous assets; everything except the quote currency
//! is swapped into it through a direct constant-product pool. Balances, the
//! running total and the capacity ceiling are all kept in quote units.
//!
//! # Modules
//! - `errors`: Vault error taxonomy
//! - `events`: Append-only event records
//! - `security`: Execution lock (reentrancy guard) and owner capability
//! - `interfaces`: Collaborator traits (assets, pools, wrapper, price feed)
//! - `ledger`: Balances, total, capacity invariant, credit/debit
//! - `swap`: Constant-product swap engine
//! - `transaction`: Checkpoint-and-compensate operation boundary
//! - `config`: Construction-time configuration
//! - `vault`: Vault state, administration and queries
//! - `deposit`: Deposit router (native / quote / other)
//! - `withdrawal`: Withdrawal controller
//!
//! All collaborators are untrusted and may call back into the vault; the
//! vault is single-threaded (`Rc`/`RefCell`) and serializes operations.

pub mod config;
pub mod deposit;
pub mod errors;
pub mod events;
pub mod interfaces;
pub mod ledger;
pub mod security;
pub mod swap;
pub mod transaction;
pub mod vault;
pub mod withdrawal;

pub use config::VaultConfig;
pub use deposit::{AssetKind, DepositRequest};
pub use errors::{VaultError, VaultResult};
pub use vault::{Collaborators, Vault};

/// Vault ABI version, frozen after release
pub const VAULT_ABI_VERSION: &str = "1.0.0";
