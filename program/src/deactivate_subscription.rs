use anchor_lang::prelude::*;

use crate::constants::TIER_ID_NONE;
use crate::errors::TimepassError;
use crate::events::SubscriptionDeactivated;
use crate::state::{Subscription, Tier};
use crate::utils::now;

#[derive(Accounts)]
pub struct DeactivateSubscription<'info> {
    /// The lapsed account
    /// CHECK: Only used as a PDA key
    pub account: UncheckedAccount<'info>,

    #[account(
        mut,
        seeds = [b"subscription", account.key().as_ref()],
        bump = subscription.bump
    )]
    pub subscription: Account<'info, Subscription>,

    /// The tier being vacated; required unless the subscription is already inactive
    #[account(
        mut,
        seeds = [b"tier", &tier.id.to_le_bytes()],
        bump = tier.bump
    )]
    pub tier: Option<Account<'info, Tier>>,
}

pub fn handler(ctx: Context<DeactivateSubscription>) -> Result<()> {
    let now = now()?;
    let subscription = &mut ctx.accounts.subscription;

    // Idempotent: already inactive is a successful no-op
    if subscription.tier_id == TIER_ID_NONE {
        return Ok(());
    }

    require!(
        now > subscription.expires_at,
        TimepassError::NotEligible
    );

    let tier = ctx
        .accounts
        .tier
        .as_mut()
        .ok_or(TimepassError::TierNotFound)?;
    require!(tier.id == subscription.tier_id, TimepassError::TierNotFound);

    let vacated = subscription.tier_id;
    // Preserve slashability across deactivation: a lapsed member cannot
    // shed its slash exposure by vacating the tier
    subscription.slashable_after = tier.slash_deadline(subscription.expires_at)?.unwrap_or(0);
    tier.leave();
    subscription.tier_id = TIER_ID_NONE;

    emit!(SubscriptionDeactivated {
        account: subscription.account,
        tier_id: vacated,
    });

    Ok(())
}
