//! Vault configuration
//!
//! Construction-time parameters. Capacity and withdrawal ceiling can later
//! be changed by the owner; `quote_decimals` is fixed for the vault's life.

use serde::{Deserialize, Serialize};
use vault_types::ids::AccountId;
use vault_types::numeric::{Amount, DEFAULT_QUOTE_DECIMALS, MAX_DISPLAY_DECIMALS};

use crate::errors::{VaultError, VaultResult};
use crate::ledger::Limits;

/// Configuration for a vault instance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VaultConfig {
    /// Holder of the administrative capability.
    pub owner: AccountId,
    /// Ceiling on total deposits, in quote minor units.
    pub capacity: Amount,
    /// Maximum quote amount per withdrawal.
    pub withdrawal_ceiling: Amount,
    /// Decimal places of the quote currency, for display only.
    #[serde(default = "default_quote_decimals")]
    pub quote_decimals: u32,
}

fn default_quote_decimals() -> u32 {
    DEFAULT_QUOTE_DECIMALS
}

impl Default for VaultConfig {
    fn default() -> Self {
        Self {
            owner: AccountId::new(),
            // 1,000,000 units of a 6-decimal quote currency
            capacity: 1_000_000_000_000,
            // 10,000 units
            withdrawal_ceiling: 10_000_000_000,
            quote_decimals: DEFAULT_QUOTE_DECIMALS,
        }
    }
}

impl VaultConfig {
    pub fn validate(&self) -> VaultResult<()> {
        if self.capacity == 0 {
            return Err(VaultError::invalid_params("capacity must be non-zero"));
        }
        if self.withdrawal_ceiling == 0 {
            return Err(VaultError::invalid_params(
                "withdrawal ceiling must be non-zero",
            ));
        }
        if self.quote_decimals > MAX_DISPLAY_DECIMALS {
            return Err(VaultError::invalid_params(format!(
                "quote decimals {} above {}",
                self.quote_decimals, MAX_DISPLAY_DECIMALS
            )));
        }
        Ok(())
    }

    pub fn limits(&self) -> Limits {
        Limits {
            capacity: self.capacity,
            withdrawal_ceiling: self.withdrawal_ceiling,
        }
    }
}
