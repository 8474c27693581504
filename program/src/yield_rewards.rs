use anchor_lang::prelude::*;
use anchor_spl::token::Token;

use crate::currency::{VaultAccess, VAULT_SEED};
use crate::errors::TimepassError;
use crate::events::RewardsAllocated;
use crate::rewards;
use crate::state::{Config, Pool};
use crate::utils::{validate_currency_mint, validate_fund_account};

#[derive(AnchorSerialize, AnchorDeserialize, Clone, Debug)]
pub struct YieldRewardsArgs {
    /// Amount captured from the payer and spread across all holders
    pub amount: u64,
}

/// Permissionless pool top-up: anyone may donate yield to point-holders
#[derive(Accounts)]
pub struct YieldRewards<'info> {
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

    #[account(mut)]
    pub payer: Signer<'info>,

    /// Payer's fund source: the payer itself for native, a token account for SPL
    /// CHECK: The token program enforces mint and ownership during the capture CPI
    #[account(mut)]
    pub payer_funds: UncheckedAccount<'info>,

    pub token_program: Option<Program<'info, Token>>,

    pub system_program: Program<'info, System>,
}

pub fn handler(ctx: Context<YieldRewards>, args: YieldRewardsArgs) -> Result<()> {
    require!(args.amount > 0, TimepassError::InvalidAmount);

    let config = &ctx.accounts.config;
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

    let payer_info = ctx.accounts.payer.to_account_info();
    let payer_funds_info = ctx.accounts.payer_funds.to_account_info();
    let captured = vault.capture(&payer_info, &payer_funds_info, args.amount)?;

    let pool = &mut ctx.accounts.pool;
    rewards::allocate(pool, captured)?;

    emit!(RewardsAllocated {
        amount: captured,
        total_allocated: pool.total_allocated,
    });

    Ok(())
}
