use anchor_lang::prelude::*;
use anchor_spl::token::Token;

use crate::currency::{VaultAccess, VAULT_SEED};
use crate::errors::TimepassError;
use crate::events::RewardsClaimed;
use crate::rewards;
use crate::state::{Config, Holder, Pool};
use crate::utils::{validate_currency_mint, validate_fund_account};

/// Permissionless claim on behalf of any holder; the payout always lands in
/// the holder's own fund account
#[derive(Accounts)]
pub struct ClaimRewards<'info> {
    #[account(
        seeds = [b"config"],
        bump = config.bump
    )]
    pub config: Account<'info, Config>,

    #[account(
        mut,
        seeds = [b"pool"],
        bump = pool.bump
    )]
    pub pool: Account<'info, Pool>,

    /// The holder whose entitlement is claimed
    /// CHECK: Only used as a PDA key and payout identity
    pub account: UncheckedAccount<'info>,

    #[account(
        mut,
        seeds = [b"holder", account.key().as_ref()],
        bump = holder.bump
    )]
    pub holder: Account<'info, Holder>,

    #[account(
        mut,
        seeds = [VAULT_SEED],
        bump = config.vault_bump
    )]
    pub vault: SystemAccount<'info>,

    /// Vault token account (SPL currency only)
    /// CHECK: Validated as the vault's ATA in the handler
    #[account(mut)]
    pub vault_token: Option<UncheckedAccount<'info>>,

    /// Configured currency mint (SPL currency only)
    /// CHECK: Validated against `config.currency_mint` in the handler
    pub currency_mint: Option<UncheckedAccount<'info>>,

    /// The holder's fund destination
    /// CHECK: Validated against the holder in the handler
    #[account(mut)]
    pub account_funds: UncheckedAccount<'info>,

    pub token_program: Option<Program<'info, Token>>,

    pub system_program: Program<'info, System>,
}

pub fn handler(ctx: Context<ClaimRewards>) -> Result<()> {
    let config = &ctx.accounts.config;
    let pool = &mut ctx.accounts.pool;
    let holder = &mut ctx.accounts.holder;

    let amount = rewards::claimable(pool, holder)?;
    if amount == 0 {
        // Nothing to pay; a second consecutive claim is a successful no-op
        return Ok(());
    }

    let vault_info = ctx.accounts.vault.to_account_info();
    let system_program_info = ctx.accounts.system_program.to_account_info();
    let mint_info = ctx.accounts.currency_mint.as_ref().map(|a| a.to_account_info());
    let vault_token_info = ctx.accounts.vault_token.as_ref().map(|a| a.to_account_info());
    if !config.is_native() {
        let mint = mint_info.as_ref().ok_or(TimepassError::WrongMint)?;
        validate_currency_mint(mint, config)?;
        let vault_token = vault_token_info
            .as_ref()
            .ok_or(TimepassError::InvalidFundAccount)?;
        validate_fund_account(vault_token, &ctx.accounts.vault.key(), config)?;
    }
    let vault = VaultAccess {
        native: config.is_native(),
        mint: mint_info.as_ref(),
        vault: &vault_info,
        vault_token: vault_token_info.as_ref(),
        token_program: ctx.accounts.token_program.as_ref(),
        system_program: &system_program_info,
        vault_bump: config.vault_bump,
    };

    let account_funds_info = ctx.accounts.account_funds.to_account_info();
    validate_fund_account(&account_funds_info, &ctx.accounts.account.key(), config)?;

    rewards::record_claim(pool, holder, amount)?;
    vault.transfer_out(&account_funds_info, amount)?;

    emit!(RewardsClaimed {
        account: holder.account,
        amount,
    });

    Ok(())
}
