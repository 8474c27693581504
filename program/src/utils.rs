use anchor_lang::prelude::*;
use anchor_lang::solana_program::program_pack::Pack;
use anchor_spl::associated_token::get_associated_token_address;
use anchor_spl::token::spl_token::state::Account as SplTokenAccount;
use anchor_spl::token::ID as TOKEN_PROGRAM_ID;

use crate::errors::TimepassError;
use crate::state::Config;

/// Validates that `fund` can receive the configured currency on behalf of `owner`.
///
/// For the native currency the fund account must be the owner's own account.
/// For an SPL currency it must be the owner's canonical associated token
/// account for the configured mint, owned by the SPL Token program and
/// holding valid token-account data. Every payout leg relies on this
/// derivation check, so fees cannot be redirected to arbitrary token
/// accounts.
///
/// # Errors
///
/// Returns an error if:
/// - the account key does not match the expected derivation (`InvalidFundAccount`)
/// - the account is not a valid token account (`InvalidFundAccount`)
/// - the token account uses a different mint (`WrongMint`)
/// - the token account is owned by someone else (`InvalidFundAccount`)
pub fn validate_fund_account(
    fund: &AccountInfo,
    owner: &Pubkey,
    config: &Config,
) -> Result<()> {
    if config.is_native() {
        require!(fund.key() == *owner, TimepassError::InvalidFundAccount);
        return Ok(());
    }

    let expected = get_associated_token_address(owner, &config.currency_mint);
    require!(fund.key() == expected, TimepassError::InvalidFundAccount);
    require!(
        fund.owner == &TOKEN_PROGRAM_ID,
        TimepassError::InvalidFundAccount
    );

    let data = fund.try_borrow_data()?;
    require!(
        data.len() == SplTokenAccount::LEN,
        TimepassError::InvalidFundAccount
    );
    let token_account =
        SplTokenAccount::unpack(&data).map_err(|_| TimepassError::InvalidFundAccount)?;
    require!(
        token_account.mint == config.currency_mint,
        TimepassError::WrongMint
    );
    require!(
        token_account.owner == *owner,
        TimepassError::InvalidFundAccount
    );
    Ok(())
}

/// Validates the configured mint account when the currency is an SPL token
pub fn validate_currency_mint(mint: &AccountInfo, config: &Config) -> Result<()> {
    require!(!config.is_native(), TimepassError::WrongMint);
    require!(
        mint.key() == config.currency_mint,
        TimepassError::WrongMint
    );
    Ok(())
}

/// Current cluster time
pub fn now() -> Result<i64> {
    Ok(Clock::get()?.unix_timestamp)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ata_derivation_is_deterministic() {
        let owner = Pubkey::new_unique();
        let mint = Pubkey::new_unique();
        let a = get_associated_token_address(&owner, &mint);
        let b = get_associated_token_address(&owner, &mint);
        assert_eq!(a, b);
    }

    #[test]
    fn ata_derivation_differs_per_owner() {
        let mint = Pubkey::new_unique();
        let a = get_associated_token_address(&Pubkey::new_unique(), &mint);
        let b = get_associated_token_address(&Pubkey::new_unique(), &mint);
        assert_ne!(a, b);
    }
}
