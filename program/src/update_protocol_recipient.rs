use anchor_lang::prelude::*;

use crate::errors::TimepassError;
use crate::events::ProtocolRecipientUpdated;
use crate::state::Config;

#[derive(AnchorSerialize, AnchorDeserialize, Clone, Debug)]
pub struct UpdateProtocolRecipientArgs {
    /// New protocol fee recipient; the zero address abandons the fee and
    /// forces `protocol_bps` to zero
    pub recipient: Pubkey,
}

#[derive(Accounts)]
pub struct UpdateProtocolRecipient<'info> {
    #[account(
        mut,
        seeds = [b"config"],
        bump = config.bump
    )]
    pub config: Account<'info, Config>,

    /// Only the current protocol recipient may rotate itself
    pub current_recipient: Signer<'info>,
}

pub fn handler(
    ctx: Context<UpdateProtocolRecipient>,
    args: UpdateProtocolRecipientArgs,
) -> Result<()> {
    let config = &mut ctx.accounts.config;

    require!(
        ctx.accounts.current_recipient.key() == config.protocol_recipient,
        TimepassError::NotEligible
    );

    config.protocol_recipient = args.recipient;
    if args.recipient == Pubkey::default() {
        config.protocol_bps = 0;
    }

    emit!(ProtocolRecipientUpdated {
        recipient: args.recipient,
    });

    Ok(())
}
