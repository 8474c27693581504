use anchor_lang::prelude::*;
use anchor_spl::token::Token;

use crate::currency::{VaultAccess, VAULT_SEED};
use crate::errors::TimepassError;
use crate::events::Refunded;
use crate::state::{Config, Pool, Subscription};
use crate::utils::{now, validate_currency_mint, validate_fund_account};

#[derive(AnchorSerialize, AnchorDeserialize, Clone, Debug)]
pub struct RefundArgs {
    /// Amount to return from the creator balance
    pub amount: u64,
}

#[derive(Accounts)]
pub struct Refund<'info> {
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

    /// The account being refunded
    /// CHECK: Only used as a PDA key and payout identity
    pub account: UncheckedAccount<'info>,

    #[account(
        mut,
        seeds = [b"subscription", account.key().as_ref()],
        bump = subscription.bump
    )]
    pub subscription: Account<'info, Subscription>,

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

    /// The refunded account's fund destination
    /// CHECK: Validated against the account in the handler
    #[account(mut)]
    pub account_funds: UncheckedAccount<'info>,

    pub authority: Signer<'info>,

    pub token_program: Option<Program<'info, Token>>,

    pub system_program: Program<'info, System>,
}

pub fn handler(ctx: Context<Refund>, args: RefundArgs) -> Result<()> {
    let now = now()?;
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

    // Refunds draw on the creator's share only; pool-owned value is out of
    // reach
    let creator_balance = vault
        .balance()?
        .checked_sub(ctx.accounts.pool.balance)
        .ok_or(TimepassError::ArithmeticError)?;
    require!(
        args.amount <= creator_balance,
        TimepassError::InsufficientBalance
    );

    let account_funds_info = ctx.accounts.account_funds.to_account_info();
    validate_fund_account(&account_funds_info, &ctx.accounts.account.key(), config)?;
    vault.transfer_out(&account_funds_info, args.amount)?;

    let subscription = &mut ctx.accounts.subscription;
    subscription.clear_time(now);

    emit!(Refunded {
        account: subscription.account,
        amount: args.amount,
        token_id: subscription.token_id,
    });

    Ok(())
}
