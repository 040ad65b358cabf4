//! Vault error types
//!
//! Every failure is terminal for the operation that raised it. The vault
//! rolls back all effects before the error reaches the caller.

use thiserror::Error;
use vault_types::ids::AssetId;
use vault_types::numeric::Amount;

/// Vault errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum VaultError {
    #[error("Amount must be greater than zero")]
    ZeroAmount,

    #[error("Capacity exceeded: requested {requested}, available {available}")]
    CapExceeded { requested: Amount, available: Amount },

    #[error("Insufficient balance: required {required}, available {available}")]
    InsufficientBalance { required: Amount, available: Amount },

    #[error("Withdrawal limit exceeded: requested {requested}, limit {limit}")]
    WithdrawalLimitExceeded { requested: Amount, limit: Amount },

    #[error("No direct pool between {asset} and the quote currency")]
    NoDirectPath { asset: AssetId },

    #[error("Transfer of {asset} failed: {reason}")]
    TransferFailed { asset: AssetId, reason: String },

    #[error("Reentrancy detected")]
    Reentrancy,

    #[error("Invalid parameters: {reason}")]
    InvalidParams { reason: String },

    #[error("Unauthorized: caller is not the owner")]
    Unauthorized,

    #[error("Insufficient pool liquidity")]
    InsufficientLiquidity,

    #[error("Arithmetic overflow")]
    Overflow,
}

impl VaultError {
    pub(crate) fn transfer_failed(asset: &AssetId, reason: impl Into<String>) -> Self {
        VaultError::TransferFailed {
            asset: asset.clone(),
            reason: reason.into(),
        }
    }

    pub(crate) fn invalid_params(reason: impl Into<String>) -> Self {
        VaultError::InvalidParams {
            reason: reason.into(),
        }
    }
}

/// Result alias used throughout the crate
pub type VaultResult<T> = Result<T, VaultError>;
