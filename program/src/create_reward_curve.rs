use anchor_lang::prelude::*;

use crate::errors::TimepassError;
use crate::events::CurveCreated;
use crate::state::{Config, CurveParams, RewardCurve};
use crate::utils::now;

#[derive(AnchorSerialize, AnchorDeserialize, Clone, Debug)]
pub struct CreateRewardCurveArgs {
    /// Must be the next sequential curve id (`config.num_curves`)
    pub curve_id: u8,
    pub params: CurveParams,
}

#[derive(Accounts)]
#[instruction(args: CreateRewardCurveArgs)]
pub struct CreateRewardCurve<'info> {
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
        space = RewardCurve::SPACE,
        seeds = [b"curve".as_ref(), &[args.curve_id]],
        bump
    )]
    pub curve: Account<'info, RewardCurve>,

    #[account(mut)]
    pub authority: Signer<'info>,

    pub system_program: Program<'info, System>,
}

pub fn handler(ctx: Context<CreateRewardCurve>, args: CreateRewardCurveArgs) -> Result<()> {
    let config = &mut ctx.accounts.config;

    // Curves are append-only and immutable once created; tiers referencing
    // older curves keep functioning against frozen multipliers
    require!(
        args.curve_id == config.num_curves,
        TimepassError::InvalidCurveParams
    );
    args.params.validate()?;

    let curve = &mut ctx.accounts.curve;
    curve.id = args.curve_id;
    curve.start_multiplier = args.params.start_multiplier;
    curve.min_multiplier = args.params.min_multiplier;
    curve.decay_secs = args.params.decay_secs;
    curve.activated_at = now()?;
    curve.bump = ctx.bumps.curve;

    config.num_curves = config
        .num_curves
        .checked_add(1)
        .ok_or(TimepassError::ArithmeticError)?;

    emit!(CurveCreated {
        curve_id: args.curve_id,
    });

    Ok(())
}
