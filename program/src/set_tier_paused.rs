use anchor_lang::prelude::*;

use crate::errors::TimepassError;
use crate::events::TierPausedSet;
use crate::state::{Config, Tier};

#[derive(AnchorSerialize, AnchorDeserialize, Clone, Debug)]
pub struct SetTierPausedArgs {
    pub tier_id: u16,
    pub paused: bool,
}

#[derive(Accounts)]
#[instruction(args: SetTierPausedArgs)]
pub struct SetTierPaused<'info> {
    #[account(
        seeds = [b"config"],
        bump = config.bump,
        has_one = authority @ TimepassError::Unauthorized
    )]
    pub config: Account<'info, Config>,

    #[account(
        mut,
        seeds = [b"tier", &args.tier_id.to_le_bytes()],
        bump = tier.bump
    )]
    pub tier: Account<'info, Tier>,

    pub authority: Signer<'info>,
}

pub fn handler(ctx: Context<SetTierPaused>, args: SetTierPausedArgs) -> Result<()> {
    // Pausing blocks new joins and renewals; existing expiry is untouched
    let tier = &mut ctx.accounts.tier;
    tier.paused = args.paused;

    emit!(TierPausedSet {
        tier_id: args.tier_id,
        paused: args.paused,
    });

    Ok(())
}
