//! Timepass SDK - Rust SDK for the time-metered access-pass protocol
//!
//! This crate provides offline utilities for interacting with the Timepass
//! program on Solana:
//!
//! - Computing Program Derived Addresses (PDAs) for every protocol account
//! - Building instructions for purchases, grants, rewards, slashing, and
//!   administration without an RPC connection
//! - Deserializing program account data and mapping program error codes
//!
//! # Example Usage
//!
//! ```no_run
//! use timepass_sdk::{pda, transaction_builder::PurchaseBuilder};
//! use solana_sdk::signature::{Keypair, Signer};
//!
//! # fn main() -> timepass_sdk::Result<()> {
//! let payer = Keypair::new().pubkey();
//!
//! // Compute PDAs
//! let subscription = pda::subscription_address(&payer)?;
//! let holder = pda::holder_address(&payer)?;
//!
//! // Build a native-currency purchase of tier 1
//! let ix = PurchaseBuilder::new()
//!     .payer(payer)
//!     .amount(5_000_000)
//!     .tier_id(1)
//!     .curve_id(0)
//!     .build_instruction()?;
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]

pub mod error;
pub mod pda;
pub mod program_types;
pub mod transaction_builder;

// Re-export commonly used items
pub use error::{Result, TimepassError};
pub use program_types::*;
pub use transaction_builder::{
    claim_rewards, create_reward_curve, create_tier, deactivate_subscription, grant_time,
    initialize, refund, revoke_time, set_global_supply_cap, set_referral_code, set_tier_paused,
    slash, transfer_subscription, update_protocol_recipient, update_tier, withdraw_creator,
    yield_rewards, PurchaseBuilder,
};

// Re-export commonly used external types
pub use anchor_lang::{AnchorDeserialize, AnchorSerialize};
pub use solana_sdk;
pub use spl_associated_token_account;
pub use spl_token;

/// Default deployed program ID
pub const DEFAULT_PROGRAM_ID: &str = "TPVWLsUGYucHZCELLMGWmqS6dDQeinYacNncy4vBnL4";

/// The program ID string, overridable through the `TIMEPASS_PROGRAM_ID`
/// environment variable for devnet and local-validator deployments
#[must_use]
pub fn program_id_string() -> String {
    std::env::var("TIMEPASS_PROGRAM_ID").unwrap_or_else(|_| DEFAULT_PROGRAM_ID.to_string())
}

/// The program ID as a parsed pubkey
///
/// # Errors
/// Returns an error if an overridden program ID string is not valid base58
pub fn program_id() -> Result<solana_sdk::pubkey::Pubkey> {
    Ok(program_id_string().parse()?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_program_id_parses() {
        let id = DEFAULT_PROGRAM_ID
            .parse::<solana_sdk::pubkey::Pubkey>()
            .unwrap();
        assert_ne!(id, solana_sdk::pubkey::Pubkey::default());
    }
}
