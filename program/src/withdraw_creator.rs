use anchor_lang::prelude::*;
use anchor_spl::token::Token;

use crate::currency::{VaultAccess, VAULT_SEED};
use crate::errors::TimepassError;
use crate::events::CreatorWithdraw;
use crate::state::{Config, Pool};
use crate::utils::{validate_currency_mint, validate_fund_account};

#[derive(AnchorSerialize, AnchorDeserialize, Clone, Debug)]
pub struct WithdrawCreatorArgs {
    /// Amount to withdraw from the creator balance
    pub amount: u64,
}

#[derive(Accounts)]
pub struct WithdrawCreator<'info> {
    #[account(
        seeds = [b"config"],
        bump = config.bump,
        has_one = authority @ TimepassError::Unauthorized
    )]
    pub config: Account<'info, Config>,

    #[account(
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

    /// Withdrawal destination
    /// CHECK: Validated against the authority in the handler
    #[account(mut)]
    pub destination_funds: UncheckedAccount<'info>,

    pub authority: Signer<'info>,

    pub token_program: Option<Program<'info, Token>>,

    pub system_program: Program<'info, System>,
}

pub fn handler(ctx: Context<WithdrawCreator>, args: WithdrawCreatorArgs) -> Result<()> {
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

    // Pool-owned value never leaves through the creator path
    let creator_balance = vault
        .balance()?
        .checked_sub(ctx.accounts.pool.balance)
        .ok_or(TimepassError::ArithmeticError)?;
    require!(
        args.amount <= creator_balance,
        TimepassError::InsufficientBalance
    );

    let destination_info = ctx.accounts.destination_funds.to_account_info();
    validate_fund_account(&destination_info, &config.authority, config)?;
    vault.transfer_out(&destination_info, args.amount)?;

    emit!(CreatorWithdraw {
        to: ctx.accounts.destination_funds.key(),
        amount: args.amount,
    });

    Ok(())
}
