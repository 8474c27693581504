use anchor_lang::prelude::*;

use crate::errors::TimepassError;
use crate::events::TimeRevoked;
use crate::state::{Config, Subscription};
use crate::utils::now;

#[derive(Accounts)]
pub struct RevokeTime<'info> {
    #[account(
        seeds = [b"config"],
        bump = config.bump,
        has_one = authority @ TimepassError::Unauthorized
    )]
    pub config: Account<'info, Config>,

    /// The account losing granted time
    /// CHECK: Only used as a PDA key
    pub account: UncheckedAccount<'info>,

    #[account(
        mut,
        seeds = [b"subscription", account.key().as_ref()],
        bump = subscription.bump
    )]
    pub subscription: Account<'info, Subscription>,

    pub authority: Signer<'info>,
}

pub fn handler(ctx: Context<RevokeTime>) -> Result<()> {
    let now = now()?;
    let subscription = &mut ctx.accounts.subscription;

    // Only previously granted seconds come off; paid time is untouchable and
    // the expiry never drops below the present
    let removed = subscription.revoke_granted(now)?;

    emit!(TimeRevoked {
        account: subscription.account,
        seconds: removed,
        expires_at: subscription.expires_at,
    });

    Ok(())
}
