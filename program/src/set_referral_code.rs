use anchor_lang::prelude::*;

use crate::errors::TimepassError;
use crate::events::ReferralCodeSet;
use crate::state::{Config, ReferralCode};

#[derive(AnchorSerialize, AnchorDeserialize, Clone, Debug)]
pub struct SetReferralCodeArgs {
    pub code: u64,
    /// Referrer share, carved from the client fee; bounded by
    /// `config.client_referral_bps`
    pub bps: u16,
    /// Once set, the code can never be changed again
    pub permanent: bool,
    /// Restricts payouts to one referrer (`Pubkey::default()` = anyone)
    pub restricted_to: Pubkey,
}

#[derive(Accounts)]
#[instruction(args: SetReferralCodeArgs)]
pub struct SetReferralCode<'info> {
    #[account(
        seeds = [b"config"],
        bump = config.bump,
        has_one = authority @ TimepassError::Unauthorized
    )]
    pub config: Account<'info, Config>,

    #[account(
        init_if_needed,
        payer = authority,
        space = ReferralCode::SPACE,
        seeds = [b"referral", &args.code.to_le_bytes()],
        bump
    )]
    pub referral_code: Account<'info, ReferralCode>,

    #[account(mut)]
    pub authority: Signer<'info>,

    pub system_program: Program<'info, System>,
}

pub fn handler(ctx: Context<SetReferralCode>, args: SetReferralCodeArgs) -> Result<()> {
    require!(args.code != 0, TimepassError::InvalidReferralParams);
    require!(
        args.bps <= ctx.accounts.config.client_referral_bps,
        TimepassError::InvalidReferralParams
    );

    let referral_code = &mut ctx.accounts.referral_code;

    // An existing record carries a non-zero code; permanence is irrevocable
    if referral_code.code != 0 {
        require!(!referral_code.permanent, TimepassError::ReferralLocked);
    }

    referral_code.code = args.code;
    referral_code.bps = args.bps;
    referral_code.permanent = args.permanent;
    referral_code.restricted_to = args.restricted_to;
    referral_code.bump = ctx.bumps.referral_code;

    emit!(ReferralCodeSet {
        code: args.code,
        bps: args.bps,
    });

    Ok(())
}
