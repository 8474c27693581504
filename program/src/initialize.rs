use anchor_lang::prelude::*;
use anchor_lang::system_program;

use crate::currency::VAULT_SEED;
use crate::events::{CurveCreated, TierCreated};
use crate::state::{Config, CurveParams, Pool, RewardCurve, Tier, TierParams};
use crate::utils::now;

#[derive(AnchorSerialize, AnchorDeserialize, Clone, Debug)]
pub struct InitializeArgs {
    /// `Pubkey::default()` selects native lamports, otherwise the SPL mint
    pub currency_mint: Pubkey,
    pub protocol_recipient: Pubkey,
    pub protocol_bps: u16,
    pub client_recipient: Pubkey,
    pub client_bps: u16,
    pub client_referral_bps: u16,
    /// 0 = uncapped
    pub global_supply_cap: u64,
    /// Tier 1, created as part of initialization
    pub tier: TierParams,
    /// Curve 0, created as part of initialization
    pub curve: CurveParams,
}

#[derive(Accounts)]
pub struct Initialize<'info> {
    #[account(
        init,
        payer = authority,
        space = Config::SPACE,
        seeds = [b"config"],
        bump
    )]
    pub config: Account<'info, Config>,

    #[account(
        init,
        payer = authority,
        space = Pool::SPACE,
        seeds = [b"pool"],
        bump
    )]
    pub pool: Account<'info, Pool>,

    #[account(
        init,
        payer = authority,
        space = Tier::SPACE,
        seeds = [b"tier".as_ref(), &1u16.to_le_bytes()],
        bump
    )]
    pub tier_one: Account<'info, Tier>,

    #[account(
        init,
        payer = authority,
        space = RewardCurve::SPACE,
        seeds = [b"curve".as_ref(), &[0u8]],
        bump
    )]
    pub curve_zero: Account<'info, RewardCurve>,

    /// Funds vault PDA: native balance holder and authority over the vault
    /// token account. Funded to its rent-exempt reserve here so it persists.
    #[account(
        mut,
        seeds = [VAULT_SEED],
        bump
    )]
    pub vault: SystemAccount<'info>,

    #[account(mut)]
    pub authority: Signer<'info>,

    pub system_program: Program<'info, System>,
}

pub fn handler(ctx: Context<Initialize>, args: InitializeArgs) -> Result<()> {
    Config::validate_fee_params(
        &args.protocol_recipient,
        args.protocol_bps,
        &args.client_recipient,
        args.client_bps,
        args.client_referral_bps,
    )?;
    args.curve.validate()?;
    // Curve 0 exists once this instruction completes
    args.tier.validate(1)?;

    let config = &mut ctx.accounts.config;
    config.authority = ctx.accounts.authority.key();
    config.currency_mint = args.currency_mint;
    config.protocol_recipient = args.protocol_recipient;
    config.protocol_bps = args.protocol_bps;
    config.client_recipient = args.client_recipient;
    config.client_bps = args.client_bps;
    config.client_referral_bps = args.client_referral_bps;
    config.global_supply_cap = args.global_supply_cap;
    config.num_subscriptions = 0;
    config.token_id_counter = 0;
    config.num_tiers = 1;
    config.num_curves = 1;
    config.vault_bump = ctx.bumps.vault;
    config.bump = ctx.bumps.config;

    let pool = &mut ctx.accounts.pool;
    pool.total_shares = 0;
    pool.points_per_share = 0;
    pool.total_allocated = 0;
    pool.balance = 0;
    pool.bump = ctx.bumps.pool;

    let curve = &mut ctx.accounts.curve_zero;
    curve.id = 0;
    curve.start_multiplier = args.curve.start_multiplier;
    curve.min_multiplier = args.curve.min_multiplier;
    curve.decay_secs = args.curve.decay_secs;
    curve.activated_at = now()?;
    curve.bump = ctx.bumps.curve_zero;

    let tier = &mut ctx.accounts.tier_one;
    tier.id = 1;
    tier.current_supply = 0;
    tier.paused = false;
    tier.apply_params(&args.tier);
    tier.bump = ctx.bumps.tier_one;

    // Keep the vault alive: top it up to the rent-exempt reserve for a
    // zero-data account
    let reserve = Rent::get()?.minimum_balance(0);
    let missing = reserve.saturating_sub(ctx.accounts.vault.lamports());
    if missing > 0 {
        let cpi = CpiContext::new(
            ctx.accounts.system_program.to_account_info(),
            system_program::Transfer {
                from: ctx.accounts.authority.to_account_info(),
                to: ctx.accounts.vault.to_account_info(),
            },
        );
        system_program::transfer(cpi, missing)?;
    }

    emit!(CurveCreated { curve_id: 0 });
    emit!(TierCreated { tier_id: 1 });

    Ok(())
}
