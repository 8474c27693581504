use anchor_lang::prelude::*;

use crate::errors::TimepassError;
use crate::events::GlobalSupplyCapSet;
use crate::state::Config;

#[derive(AnchorSerialize, AnchorDeserialize, Clone, Debug)]
pub struct SetGlobalSupplyCapArgs {
    /// New lifetime mint ceiling; 0 = uncapped. A cap below the current
    /// subscriber count simply blocks further mints.
    pub cap: u64,
}

#[derive(Accounts)]
pub struct SetGlobalSupplyCap<'info> {
    #[account(
        mut,
        seeds = [b"config"],
        bump = config.bump,
        has_one = authority @ TimepassError::Unauthorized
    )]
    pub config: Account<'info, Config>,

    pub authority: Signer<'info>,
}

pub fn handler(ctx: Context<SetGlobalSupplyCap>, args: SetGlobalSupplyCapArgs) -> Result<()> {
    ctx.accounts.config.global_supply_cap = args.cap;

    emit!(GlobalSupplyCapSet { cap: args.cap });

    Ok(())
}
