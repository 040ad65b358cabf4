//! WithdrawalController — pay out quote currency against the ledger
//!
//! The ledger is debited before the outbound transfer. A collaborator that
//! re-enters during the transfer is rejected by the lock, and any read it
//! makes already sees the reduced balance. If the transfer fails the
//! transaction restores the debited entry.

use tracing::info;
use vault_types::ids::AccountId;
use vault_types::numeric::Amount;

use crate::errors::{VaultError, VaultResult};
use crate::transaction::Transaction;
use crate::vault::Vault;

impl Vault {
    /// Withdraw `amount` quote units to `caller`.
    ///
    /// Fails `ZeroAmount`, `WithdrawalLimitExceeded`, `InsufficientBalance`
    /// or `TransferFailed`; on any failure the ledger is unchanged.
    pub fn withdraw(&self, caller: &AccountId, amount: Amount) -> VaultResult<Amount> {
        let _guard = self.lock.acquire()?;
        let tx = Transaction::begin(&self.ledger, *caller);

        let limits = self.limits.get();
        self.ledger.borrow_mut().debit(*caller, amount, &limits)?;

        if !self.quote.transfer(&self.address, caller, amount) {
            return Err(VaultError::transfer_failed(
                &self.quote.id(),
                "payout to withdrawer",
            ));
        }
        tx.commit();

        info!(account = %caller, amount, "withdrawal");
        Ok(amount)
    }
}
