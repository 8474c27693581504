use anchor_lang::prelude::*;

use crate::constants::TIER_ID_NONE;
use crate::errors::TimepassError;
use crate::events::SubscriptionTransferred;
use crate::state::{Holder, Subscription, Tier};

/// Moves a subscription record, and the reward-holder record with it, from
/// `from` to `to`. Invoked in place of the identity layer's pre-transfer
/// hook: the destination must not already carry a subscription or a reward
/// position, and the source tier must allow transfers.
///
/// Both holder PDAs are derived from the party keys, so the source cannot
/// withhold its holder record to keep shares behind; a source that never
/// earned shares gets an empty record created and moved.
#[derive(Accounts)]
pub struct TransferSubscription<'info> {
    #[account(mut)]
    pub from: Signer<'info>,

    /// The new owner
    /// CHECK: Only used as a PDA key
    pub to: UncheckedAccount<'info>,

    #[account(
        mut,
        seeds = [b"subscription", from.key().as_ref()],
        bump = from_subscription.bump,
        close = from
    )]
    pub from_subscription: Account<'info, Subscription>,

    /// Fails if the destination already has a subscription record
    #[account(
        init,
        payer = from,
        space = Subscription::SPACE,
        seeds = [b"subscription", to.key().as_ref()],
        bump
    )]
    pub to_subscription: Account<'info, Subscription>,

    /// Source holder record; created empty when it does not exist yet
    #[account(
        init_if_needed,
        payer = from,
        space = Holder::SPACE,
        seeds = [b"holder", from.key().as_ref()],
        bump
    )]
    pub from_holder: Account<'info, Holder>,

    /// Destination holder record; must hold no existing position
    #[account(
        init_if_needed,
        payer = from,
        space = Holder::SPACE,
        seeds = [b"holder", to.key().as_ref()],
        bump
    )]
    pub to_holder: Account<'info, Holder>,

    /// The source subscription's tier; required unless the subscription is inactive
    #[account(
        seeds = [b"tier", &tier.id.to_le_bytes()],
        bump = tier.bump
    )]
    pub tier: Option<Account<'info, Tier>>,

    pub system_program: Program<'info, System>,
}

pub fn handler(ctx: Context<TransferSubscription>) -> Result<()> {
    require!(
        ctx.accounts.to.key() != Pubkey::default(),
        TimepassError::InvalidAccount
    );

    let from_subscription = &ctx.accounts.from_subscription;

    // An active tier must permit transfers; tierless subscriptions move freely
    if from_subscription.tier_id != TIER_ID_NONE {
        let tier = ctx
            .accounts
            .tier
            .as_ref()
            .ok_or(TimepassError::TierNotFound)?;
        require!(
            tier.id == from_subscription.tier_id,
            TimepassError::TierNotFound
        );
        require!(tier.transferable, TimepassError::TierTransferBlocked);
    }

    let token_id = from_subscription.token_id;
    let to_subscription = &mut ctx.accounts.to_subscription;
    to_subscription.account = ctx.accounts.to.key();
    to_subscription.token_id = token_id;
    to_subscription.tier_id = from_subscription.tier_id;
    to_subscription.expires_at = from_subscription.expires_at;
    to_subscription.purchase_expires = from_subscription.purchase_expires;
    to_subscription.granted_secs = from_subscription.granted_secs;
    to_subscription.slashable_after = from_subscription.slashable_after;
    to_subscription.bump = ctx.bumps.to_subscription;

    // Shares follow the subscription unconditionally; merging into an
    // existing position is not supported
    let from_holder = &mut ctx.accounts.from_holder;
    if from_holder.account == Pubkey::default() {
        from_holder.account = ctx.accounts.from.key();
        from_holder.bump = ctx.bumps.from_holder;
    }
    let to_holder = &mut ctx.accounts.to_holder;
    if to_holder.account == Pubkey::default() {
        to_holder.account = ctx.accounts.to.key();
        to_holder.bump = ctx.bumps.to_holder;
    }
    from_holder.move_position_into(to_holder)?;

    emit!(SubscriptionTransferred {
        from: ctx.accounts.from.key(),
        to: ctx.accounts.to.key(),
        token_id,
    });

    Ok(())
}
