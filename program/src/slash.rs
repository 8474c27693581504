use anchor_lang::prelude::*;
use anchor_spl::associated_token::get_associated_token_address;
use anchor_spl::token::Token;

use crate::constants::TIER_ID_NONE;
use crate::currency::{VaultAccess, VAULT_SEED};
use crate::errors::TimepassError;
use crate::events::{SlashPayoutFallback, Slashed};
use crate::rewards;
use crate::state::{Config, Holder, Pool, Subscription, Tier};
use crate::utils::{now, validate_currency_mint, validate_fund_account};

/// Permissionless slash of a lapsed holder.
///
/// Preconditions: the subscription's tier marks the pool slashable, the
/// slash grace period has elapsed past expiry, and the holder still has
/// shares. A deactivated subscription is judged against the slash deadline
/// recorded at deactivation, so leaving the tier is not an escape. The share
/// removal always takes effect; if the payout leg cannot be delivered, the
/// funds remain pooled and a fallback event is emitted instead of failing.
#[derive(Accounts)]
pub struct Slash<'info> {
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

    /// The lapsed account being slashed
    /// CHECK: Only used as a PDA key and payout identity
    pub account: UncheckedAccount<'info>,

    #[account(
        seeds = [b"subscription", account.key().as_ref()],
        bump = subscription.bump
    )]
    pub subscription: Account<'info, Subscription>,

    /// The subscription's tier, carrying the slash parameters; omitted for a
    /// deactivated subscription, which uses its recorded deadline instead
    #[account(
        seeds = [b"tier", &tier.id.to_le_bytes()],
        bump = tier.bump
    )]
    pub tier: Option<Account<'info, Tier>>,

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

    /// The slashed account's fund destination. Must belong to the slashed
    /// account; if it cannot receive the payout, the slash still proceeds.
    /// CHECK: Key validated against the slashed account in the handler
    #[account(mut)]
    pub account_funds: UncheckedAccount<'info>,

    pub token_program: Option<Program<'info, Token>>,

    pub system_program: Program<'info, System>,
}

pub fn handler(ctx: Context<Slash>) -> Result<()> {
    let now = now()?;
    let config = &ctx.accounts.config;
    let subscription = &ctx.accounts.subscription;

    if subscription.tier_id == TIER_ID_NONE {
        // Deactivated: the deadline recorded at deactivation governs
        require!(
            subscription.inactive_slashable_at(now),
            TimepassError::NotSlashable
        );
    } else {
        let tier = ctx
            .accounts
            .tier
            .as_ref()
            .ok_or(TimepassError::TierNotFound)?;
        require!(tier.id == subscription.tier_id, TimepassError::TierNotFound);
        require!(
            tier.slashable_at(subscription.expires_at, now)?,
            TimepassError::NotSlashable
        );
    }
    require!(
        ctx.accounts.holder.num_shares > 0,
        TimepassError::NotSlashable
    );

    // The payout may only ever reach the slashed account itself
    let account_key = ctx.accounts.account.key();
    let expected_funds = if config.is_native() {
        account_key
    } else {
        get_associated_token_address(&account_key, &config.currency_mint)
    };
    require!(
        ctx.accounts.account_funds.key() == expected_funds,
        TimepassError::InvalidFundAccount
    );

    let pool = &mut ctx.accounts.pool;
    let holder = &mut ctx.accounts.holder;
    let (shares, entitlement) = rewards::burn(pool, holder)?;

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
    let paid = if entitlement > 0 {
        vault.try_transfer_out(&account_funds_info, entitlement)?
    } else {
        true
    };

    if paid {
        pool.balance = pool
            .balance
            .checked_sub(entitlement)
            .ok_or(TimepassError::ArithmeticError)?;
        emit!(Slashed {
            account: account_key,
            shares,
            payout: entitlement,
        });
    } else {
        // Funds stay pooled; the exit value is crystallized but undeliverable
        emit!(Slashed {
            account: account_key,
            shares,
            payout: 0,
        });
        emit!(SlashPayoutFallback {
            account: account_key,
            amount: entitlement,
        });
    }

    Ok(())
}
