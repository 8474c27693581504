use anchor_lang::prelude::*;

use crate::errors::TimepassError;
use crate::events::TierUpdated;
use crate::state::{Config, Tier, TierParams};

#[derive(AnchorSerialize, AnchorDeserialize, Clone, Debug)]
pub struct UpdateTierArgs {
    pub tier_id: u16,
    pub params: TierParams,
}

#[derive(Accounts)]
#[instruction(args: UpdateTierArgs)]
pub struct UpdateTier<'info> {
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

pub fn handler(ctx: Context<UpdateTier>, args: UpdateTierArgs) -> Result<()> {
    args.params.validate(ctx.accounts.config.num_curves)?;

    // Full overwrite of the parameters; current supply is never reset
    let tier = &mut ctx.accounts.tier;
    tier.apply_params(&args.params);

    emit!(TierUpdated {
        tier_id: args.tier_id,
    });

    Ok(())
}
