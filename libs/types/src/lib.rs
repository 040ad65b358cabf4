//! Types library for the quote-currency vault
//!
//! Identifier and amount types shared by the vault contract and its
//! collaborators (assets, pools, wrappers).
//!
//! # Modules
//! - `ids`: Unique identifiers (AccountId, AssetId)
//! - `numeric`: Integer minor-unit amounts and their decimal display form

pub mod ids;
pub mod numeric;

// Library version constant
pub const LIB_VERSION: &str = "1.0.0";

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::ids::*;
    pub use crate::numeric::*;
}
