use anchor_lang::prelude::*;

use crate::errors::TimepassError;
use crate::events::TierCreated;
use crate::state::{Config, Tier, TierParams};

#[derive(AnchorSerialize, AnchorDeserialize, Clone, Debug)]
pub struct CreateTierArgs {
    /// Must be the next sequential tier id (`config.num_tiers + 1`); part of
    /// the args so the PDA can be derived client-side
    pub tier_id: u16,
    pub params: TierParams,
}

#[derive(Accounts)]
#[instruction(args: CreateTierArgs)]
pub struct CreateTier<'info> {
    #[account(
        mut,
        seeds = [b"config"],
        bump = config.bump,
        has_one = authority @ TimepassError::Unauthorized
    )]
    pub config: Account<'info, Config>,

    #[account(
        init,
        payer = authority,
        space = Tier::SPACE,
        seeds = [b"tier".as_ref(), &args.tier_id.to_le_bytes()],
        bump
    )]
    pub tier: Account<'info, Tier>,

    #[account(mut)]
    pub authority: Signer<'info>,

    pub system_program: Program<'info, System>,
}

pub fn handler(ctx: Context<CreateTier>, args: CreateTierArgs) -> Result<()> {
    let config = &mut ctx.accounts.config;

    // Tier ids are sequential and 1-based
    let next_id = config
        .num_tiers
        .checked_add(1)
        .ok_or(TimepassError::ArithmeticError)?;
    require!(args.tier_id == next_id, TimepassError::InvalidTierParams);

    args.params.validate(config.num_curves)?;

    let tier = &mut ctx.accounts.tier;
    tier.id = args.tier_id;
    tier.current_supply = 0;
    tier.paused = false;
    tier.apply_params(&args.params);
    tier.bump = ctx.bumps.tier;

    config.num_tiers = next_id;

    emit!(TierCreated {
        tier_id: args.tier_id,
    });

    Ok(())
}
