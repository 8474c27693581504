use anchor_lang::prelude::*;

use crate::errors::TimepassError;
use crate::events::TimeGranted;
use crate::state::{Config, Subscription, Tier};
use crate::utils::now;

#[derive(AnchorSerialize, AnchorDeserialize, Clone, Debug)]
pub struct GrantTimeArgs {
    /// Seconds of access to grant, payment-free
    pub seconds: u64,
    /// Target tier; 0 keeps the account's current tier (or tier 1 if none)
    pub tier_id: u16,
}

#[derive(Accounts)]
pub struct GrantTime<'info> {
    #[account(
        mut,
        seeds = [b"config"],
        bump = config.bump,
        has_one = authority @ TimepassError::Unauthorized
    )]
    pub config: Account<'info, Config>,

    /// The account receiving time
    /// CHECK: Only used as a PDA key
    pub account: UncheckedAccount<'info>,

    #[account(
        init_if_needed,
        payer = authority,
        space = Subscription::SPACE,
        seeds = [b"subscription", account.key().as_ref()],
        bump
    )]
    pub subscription: Account<'info, Subscription>,

    /// Target tier; the handler checks it matches the resolved tier id
    #[account(
        mut,
        seeds = [b"tier", &tier.id.to_le_bytes()],
        bump = tier.bump
    )]
    pub tier: Account<'info, Tier>,

    /// Previous tier, required only when the grant switches tiers
    #[account(
        mut,
        seeds = [b"tier", &old_tier.id.to_le_bytes()],
        bump = old_tier.bump
    )]
    pub old_tier: Option<Account<'info, Tier>>,

    #[account(mut)]
    pub authority: Signer<'info>,

    pub system_program: Program<'info, System>,
}

pub fn handler(ctx: Context<GrantTime>, args: GrantTimeArgs) -> Result<()> {
    let now = now()?;
    require!(
        ctx.accounts.account.key() != Pubkey::default(),
        TimepassError::InvalidAccount
    );
    require!(args.seconds > 0, TimepassError::InvalidAmount);

    let subscription = &mut ctx.accounts.subscription;
    if subscription.token_id == 0 {
        subscription.account = ctx.accounts.account.key();
        subscription.token_id = ctx.accounts.config.record_mint()?;
        subscription.bump = ctx.bumps.subscription;
    }

    let tier = &mut ctx.accounts.tier;
    let effective_tier_id = if args.tier_id == 0 {
        if subscription.tier_id == 0 {
            1
        } else {
            subscription.tier_id
        }
    } else {
        args.tier_id
    };
    require!(tier.id == effective_tier_id, TimepassError::TierNotFound);
    require!(!tier.paused, TimepassError::TierPaused);

    if subscription.tier_id == 0 {
        tier.join()?;
    } else if subscription.tier_id != tier.id {
        let old_tier = ctx
            .accounts
            .old_tier
            .as_mut()
            .ok_or(TimepassError::TierNotFound)?;
        require!(
            old_tier.id == subscription.tier_id,
            TimepassError::TierNotFound
        );
        old_tier.leave();
        tier.join()?;
    }

    subscription.extend(now, args.seconds, false)?;
    subscription.tier_id = tier.id;
    // Active membership takes its slash policy from the live tier
    subscription.slashable_after = 0;

    emit!(TimeGranted {
        account: subscription.account,
        seconds: args.seconds,
        tier_id: subscription.tier_id,
        expires_at: subscription.expires_at,
    });

    Ok(())
}
