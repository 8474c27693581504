//! Program Derived Address (PDA) computation utilities

use crate::{error::Result, program_id_string};
use solana_sdk::pubkey::Pubkey;

/// Compute the Config PDA
///
/// # Errors
/// Returns an error if the program ID cannot be parsed
pub fn config() -> Result<(Pubkey, u8)> {
    let program_id = program_id_string().parse()?;
    Ok(config_with_program_id(&program_id))
}

/// Compute the Config PDA address only (without bump)
///
/// # Errors
/// Returns an error if the program ID cannot be parsed
pub fn config_address() -> Result<Pubkey> {
    let program_id = program_id_string().parse()?;
    Ok(config_address_with_program_id(&program_id))
}

/// Compute the Config PDA with custom program ID
#[must_use]
pub fn config_with_program_id(program_id: &Pubkey) -> (Pubkey, u8) {
    let seeds = &[b"config" as &[u8]];
    Pubkey::find_program_address(seeds, program_id)
}

/// Compute the Config PDA address only (without bump) with custom program ID
#[must_use]
pub fn config_address_with_program_id(program_id: &Pubkey) -> Pubkey {
    config_with_program_id(program_id).0
}

/// Compute the reward Pool PDA
///
/// # Errors
/// Returns an error if the program ID cannot be parsed
pub fn pool() -> Result<(Pubkey, u8)> {
    let program_id = program_id_string().parse()?;
    Ok(pool_with_program_id(&program_id))
}

/// Compute the reward Pool PDA address only (without bump)
///
/// # Errors
/// Returns an error if the program ID cannot be parsed
pub fn pool_address() -> Result<Pubkey> {
    let program_id = program_id_string().parse()?;
    Ok(pool_address_with_program_id(&program_id))
}

/// Compute the reward Pool PDA with custom program ID
#[must_use]
pub fn pool_with_program_id(program_id: &Pubkey) -> (Pubkey, u8) {
    let seeds = &[b"pool" as &[u8]];
    Pubkey::find_program_address(seeds, program_id)
}

/// Compute the reward Pool PDA address only (without bump) with custom program ID
#[must_use]
pub fn pool_address_with_program_id(program_id: &Pubkey) -> Pubkey {
    pool_with_program_id(program_id).0
}

/// Compute the funds Vault PDA
///
/// All captured value sits in this system-owned account (native currency) or
/// in its associated token account (SPL currency).
///
/// # Errors
/// Returns an error if the program ID cannot be parsed
pub fn vault() -> Result<(Pubkey, u8)> {
    let program_id = program_id_string().parse()?;
    Ok(vault_with_program_id(&program_id))
}

/// Compute the funds Vault PDA address only (without bump)
///
/// # Errors
/// Returns an error if the program ID cannot be parsed
pub fn vault_address() -> Result<Pubkey> {
    let program_id = program_id_string().parse()?;
    Ok(vault_address_with_program_id(&program_id))
}

/// Compute the funds Vault PDA with custom program ID
#[must_use]
pub fn vault_with_program_id(program_id: &Pubkey) -> (Pubkey, u8) {
    let seeds = &[b"vault" as &[u8]];
    Pubkey::find_program_address(seeds, program_id)
}

/// Compute the funds Vault PDA address only (without bump) with custom program ID
#[must_use]
pub fn vault_address_with_program_id(program_id: &Pubkey) -> Pubkey {
    vault_with_program_id(program_id).0
}

/// Compute a Tier PDA
///
/// # Arguments
/// * `tier_id` - The 1-based tier id
///
/// # Errors
/// Returns an error if the program ID cannot be parsed
pub fn tier(tier_id: u16) -> Result<(Pubkey, u8)> {
    let program_id = program_id_string().parse()?;
    Ok(tier_with_program_id(tier_id, &program_id))
}

/// Compute a Tier PDA address only (without bump)
///
/// # Errors
/// Returns an error if the program ID cannot be parsed
pub fn tier_address(tier_id: u16) -> Result<Pubkey> {
    let program_id = program_id_string().parse()?;
    Ok(tier_address_with_program_id(tier_id, &program_id))
}

/// Compute a Tier PDA with custom program ID
#[must_use]
pub fn tier_with_program_id(tier_id: u16, program_id: &Pubkey) -> (Pubkey, u8) {
    let id_bytes = tier_id.to_le_bytes();
    let seeds = &[b"tier" as &[u8], &id_bytes];
    Pubkey::find_program_address(seeds, program_id)
}

/// Compute a Tier PDA address only (without bump) with custom program ID
#[must_use]
pub fn tier_address_with_program_id(tier_id: u16, program_id: &Pubkey) -> Pubkey {
    tier_with_program_id(tier_id, program_id).0
}

/// Compute a `RewardCurve` PDA
///
/// # Arguments
/// * `curve_id` - The 0-based curve id
///
/// # Errors
/// Returns an error if the program ID cannot be parsed
pub fn curve(curve_id: u8) -> Result<(Pubkey, u8)> {
    let program_id = program_id_string().parse()?;
    Ok(curve_with_program_id(curve_id, &program_id))
}

/// Compute a `RewardCurve` PDA address only (without bump)
///
/// # Errors
/// Returns an error if the program ID cannot be parsed
pub fn curve_address(curve_id: u8) -> Result<Pubkey> {
    let program_id = program_id_string().parse()?;
    Ok(curve_address_with_program_id(curve_id, &program_id))
}

/// Compute a `RewardCurve` PDA with custom program ID
#[must_use]
pub fn curve_with_program_id(curve_id: u8, program_id: &Pubkey) -> (Pubkey, u8) {
    let seeds = &[b"curve" as &[u8], &[curve_id]];
    Pubkey::find_program_address(seeds, program_id)
}

/// Compute a `RewardCurve` PDA address only (without bump) with custom program ID
#[must_use]
pub fn curve_address_with_program_id(curve_id: u8, program_id: &Pubkey) -> Pubkey {
    curve_with_program_id(curve_id, program_id).0
}

/// Compute a Subscription PDA
///
/// # Arguments
/// * `account` - The subscriber's pubkey
///
/// # Errors
/// Returns an error if the program ID cannot be parsed
pub fn subscription(account: &Pubkey) -> Result<(Pubkey, u8)> {
    let program_id = program_id_string().parse()?;
    Ok(subscription_with_program_id(account, &program_id))
}

/// Compute a Subscription PDA address only (without bump)
///
/// # Errors
/// Returns an error if the program ID cannot be parsed
pub fn subscription_address(account: &Pubkey) -> Result<Pubkey> {
    let program_id = program_id_string().parse()?;
    Ok(subscription_address_with_program_id(account, &program_id))
}

/// Compute a Subscription PDA with custom program ID
#[must_use]
pub fn subscription_with_program_id(account: &Pubkey, program_id: &Pubkey) -> (Pubkey, u8) {
    let seeds = &[b"subscription" as &[u8], account.as_ref()];
    Pubkey::find_program_address(seeds, program_id)
}

/// Compute a Subscription PDA address only (without bump) with custom program ID
#[must_use]
pub fn subscription_address_with_program_id(account: &Pubkey, program_id: &Pubkey) -> Pubkey {
    subscription_with_program_id(account, program_id).0
}

/// Compute a Holder PDA
///
/// # Arguments
/// * `account` - The holder's pubkey
///
/// # Errors
/// Returns an error if the program ID cannot be parsed
pub fn holder(account: &Pubkey) -> Result<(Pubkey, u8)> {
    let program_id = program_id_string().parse()?;
    Ok(holder_with_program_id(account, &program_id))
}

/// Compute a Holder PDA address only (without bump)
///
/// # Errors
/// Returns an error if the program ID cannot be parsed
pub fn holder_address(account: &Pubkey) -> Result<Pubkey> {
    let program_id = program_id_string().parse()?;
    Ok(holder_address_with_program_id(account, &program_id))
}

/// Compute a Holder PDA with custom program ID
#[must_use]
pub fn holder_with_program_id(account: &Pubkey, program_id: &Pubkey) -> (Pubkey, u8) {
    let seeds = &[b"holder" as &[u8], account.as_ref()];
    Pubkey::find_program_address(seeds, program_id)
}

/// Compute a Holder PDA address only (without bump) with custom program ID
#[must_use]
pub fn holder_address_with_program_id(account: &Pubkey, program_id: &Pubkey) -> Pubkey {
    holder_with_program_id(account, program_id).0
}

/// Compute a `ReferralCode` PDA
///
/// # Arguments
/// * `code` - The referral code value
///
/// # Errors
/// Returns an error if the program ID cannot be parsed
pub fn referral_code(code: u64) -> Result<(Pubkey, u8)> {
    let program_id = program_id_string().parse()?;
    Ok(referral_code_with_program_id(code, &program_id))
}

/// Compute a `ReferralCode` PDA address only (without bump)
///
/// # Errors
/// Returns an error if the program ID cannot be parsed
pub fn referral_code_address(code: u64) -> Result<Pubkey> {
    let program_id = program_id_string().parse()?;
    Ok(referral_code_address_with_program_id(code, &program_id))
}

/// Compute a `ReferralCode` PDA with custom program ID
#[must_use]
pub fn referral_code_with_program_id(code: u64, program_id: &Pubkey) -> (Pubkey, u8) {
    let code_bytes = code.to_le_bytes();
    let seeds = &[b"referral" as &[u8], &code_bytes];
    Pubkey::find_program_address(seeds, program_id)
}

/// Compute a `ReferralCode` PDA address only (without bump) with custom program ID
#[must_use]
pub fn referral_code_address_with_program_id(code: u64, program_id: &Pubkey) -> Pubkey {
    referral_code_with_program_id(code, program_id).0
}

#[cfg(test)]
mod tests {
    use super::*;
    use solana_sdk::signature::{Keypair, Signer};

    #[test]
    fn test_singleton_pdas() {
        let (config_pda, _bump) = config().unwrap();
        let (config_pda2, _) = config().unwrap();
        assert_eq!(config_pda, config_pda2);
        assert_eq!(config_pda, config_address().unwrap());

        let (pool_pda, _) = pool().unwrap();
        let (vault_pda, _) = vault().unwrap();
        assert_ne!(config_pda, pool_pda);
        assert_ne!(pool_pda, vault_pda);
        assert_eq!(pool_pda, pool_address().unwrap());
        assert_eq!(vault_pda, vault_address().unwrap());
    }

    #[test]
    fn test_tier_pda() {
        let (tier1, _bump) = tier(1).unwrap();
        let (tier1_again, _) = tier(1).unwrap();
        assert_eq!(tier1, tier1_again);

        // Different ids produce different PDAs
        let (tier2, _) = tier(2).unwrap();
        assert_ne!(tier1, tier2);

        assert_eq!(tier1, tier_address(1).unwrap());
    }

    #[test]
    fn test_curve_pda() {
        let (curve0, _) = curve(0).unwrap();
        let (curve1, _) = curve(1).unwrap();
        assert_ne!(curve0, curve1);
        assert_eq!(curve0, curve_address(0).unwrap());
    }

    #[test]
    fn test_subscription_and_holder_pdas() {
        let account = Keypair::new().pubkey();

        let (sub_pda, _) = subscription(&account).unwrap();
        let (sub_pda2, _) = subscription(&account).unwrap();
        assert_eq!(sub_pda, sub_pda2);
        assert_ne!(sub_pda, account);

        let (holder_pda, _) = holder(&account).unwrap();
        assert_ne!(holder_pda, sub_pda);

        // Different accounts produce different PDAs
        let other = Keypair::new().pubkey();
        let (other_sub, _) = subscription(&other).unwrap();
        assert_ne!(sub_pda, other_sub);

        assert_eq!(sub_pda, subscription_address(&account).unwrap());
        assert_eq!(holder_pda, holder_address(&account).unwrap());
    }

    #[test]
    fn test_referral_code_pda() {
        let (code_pda, _) = referral_code(42).unwrap();
        let (code_pda2, _) = referral_code(42).unwrap();
        assert_eq!(code_pda, code_pda2);

        let (other_pda, _) = referral_code(43).unwrap();
        assert_ne!(code_pda, other_pda);

        assert_eq!(code_pda, referral_code_address(42).unwrap());
    }

    #[test]
    fn test_custom_program_id() {
        let custom = Keypair::new().pubkey();
        let default_config = config_address().unwrap();
        let custom_config = config_address_with_program_id(&custom);
        assert_ne!(default_config, custom_config);
    }
}
