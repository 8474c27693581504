use anchor_lang::prelude::*;
use anchor_spl::token::Token;

use crate::currency::{VaultAccess, VAULT_SEED};
use crate::errors::TimepassError;
use crate::events::{FeeTransfer, Purchased, ReferralPaid, RewardsAllocated, SharesIssued};
use crate::fees;
use crate::rewards;
use crate::state::{bps_share, Config, Holder, Pool, ReferralCode, RewardCurve, Subscription, Tier};
use crate::utils::{now, validate_currency_mint, validate_fund_account};

#[derive(AnchorSerialize, AnchorDeserialize, Clone, Debug)]
pub struct PurchaseArgs {
    /// Target tier; 0 keeps the account's current tier (or tier 1 if none)
    pub tier_id: u16,
    /// Gross amount to capture from the payer
    pub amount: u64,
    /// Referral code; 0 = no code (the fallback share still applies when a
    /// referrer account participates)
    pub referral_code: u64,
}

#[derive(Accounts)]
#[instruction(args: PurchaseArgs)]
pub struct Purchase<'info> {
    #[account(
        mut,
        seeds = [b"config"],
        bump = config.bump
    )]
    pub config: Account<'info, Config>,

    #[account(
        mut,
        seeds = [b"pool"],
        bump = pool.bump
    )]
    pub pool: Account<'info, Pool>,

    /// The beneficiary whose subscription is extended (not necessarily the payer)
    /// CHECK: Only used as a PDA key; funds always flow from the payer
    pub account: UncheckedAccount<'info>,

    #[account(
        init_if_needed,
        payer = payer,
        space = Subscription::SPACE,
        seeds = [b"subscription", account.key().as_ref()],
        bump
    )]
    pub subscription: Account<'info, Subscription>,

    #[account(
        init_if_needed,
        payer = payer,
        space = Holder::SPACE,
        seeds = [b"holder", account.key().as_ref()],
        bump
    )]
    pub holder: Account<'info, Holder>,

    /// Target tier; the handler checks it matches the resolved tier id
    #[account(
        mut,
        seeds = [b"tier", &tier.id.to_le_bytes()],
        bump = tier.bump
    )]
    pub tier: Account<'info, Tier>,

    /// Previous tier, required only when the purchase switches tiers
    #[account(
        mut,
        seeds = [b"tier", &old_tier.id.to_le_bytes()],
        bump = old_tier.bump
    )]
    pub old_tier: Option<Account<'info, Tier>>,

    /// Reward curve configured on the target tier
    #[account(
        seeds = [b"curve", &[curve.id]],
        bump = curve.bump,
        constraint = curve.id == tier.reward_curve_id @ TimepassError::InvalidCurveParams
    )]
    pub curve: Account<'info, RewardCurve>,

    /// Funds vault PDA
    #[account(
        mut,
        seeds = [VAULT_SEED],
        bump = config.vault_bump
    )]
    pub vault: SystemAccount<'info>,

    /// Vault token account (SPL currency only)
    /// CHECK: Validated as the vault's ATA for the configured mint in the handler
    #[account(mut)]
    pub vault_token: Option<UncheckedAccount<'info>>,

    /// Configured currency mint (SPL currency only)
    /// CHECK: Validated against `config.currency_mint` in the handler
    pub currency_mint: Option<UncheckedAccount<'info>>,

    #[account(mut)]
    pub payer: Signer<'info>,

    /// Payer's fund source: the payer itself for native, a token account for SPL
    /// CHECK: The token program enforces mint and ownership during the capture CPI
    #[account(mut)]
    pub payer_funds: UncheckedAccount<'info>,

    /// Protocol fee destination, required when a protocol fee is due
    /// CHECK: Validated against the configured protocol recipient in the handler
    #[account(mut)]
    pub protocol_funds: Option<UncheckedAccount<'info>>,

    /// Client fee destination, required when a client fee is due
    /// CHECK: Validated against the configured client recipient in the handler
    #[account(mut)]
    pub client_funds: Option<UncheckedAccount<'info>>,

    /// Referral code account for `args.referral_code`
    #[account(
        seeds = [b"referral", &args.referral_code.to_le_bytes()],
        bump = referral_code.bump
    )]
    pub referral_code: Option<Account<'info, ReferralCode>>,

    /// The referrer being credited for this purchase
    /// CHECK: Only used as the referral payout identity
    pub referrer: Option<UncheckedAccount<'info>>,

    /// Referrer's fund destination
    /// CHECK: Validated against the referrer in the handler
    #[account(mut)]
    pub referrer_funds: Option<UncheckedAccount<'info>>,

    pub token_program: Option<Program<'info, Token>>,

    pub system_program: Program<'info, System>,
}

#[allow(clippy::too_many_lines)]
pub fn handler(ctx: Context<Purchase>, args: PurchaseArgs) -> Result<()> {
    let now = now()?;
    require!(
        ctx.accounts.account.key() != Pubkey::default(),
        TimepassError::InvalidAccount
    );

    // Mint the identity on first contact, enforcing the global cap
    let subscription = &mut ctx.accounts.subscription;
    if subscription.token_id == 0 {
        subscription.account = ctx.accounts.account.key();
        subscription.token_id = ctx.accounts.config.record_mint()?;
        subscription.bump = ctx.bumps.subscription;
    }
    let holder = &mut ctx.accounts.holder;
    if holder.account == Pubkey::default() {
        holder.account = ctx.accounts.account.key();
        holder.bump = ctx.bumps.holder;
    }

    // Resolve the target tier: 0 retains the current tier, or tier 1 if none
    let tier = &mut ctx.accounts.tier;
    let effective_tier_id = if args.tier_id == 0 {
        if subscription.tier_id == 0 {
            1
        } else {
            subscription.tier_id
        }
    } else {
        args.tier_id
    };
    require!(tier.id == effective_tier_id, TimepassError::TierNotFound);
    require!(!tier.paused, TimepassError::TierPaused);

    // Tier membership: join on first entry, move supply on a switch. A third
    // party may renew but never migrate an active subscription.
    if subscription.tier_id == 0 {
        tier.join()?;
    } else if subscription.tier_id != tier.id {
        if subscription.is_active(now) {
            require!(
                ctx.accounts.payer.key() == subscription.account,
                TimepassError::TierInvalidSwitch
            );
        }
        let old_tier = ctx
            .accounts
            .old_tier
            .as_mut()
            .ok_or(TimepassError::TierNotFound)?;
        require!(
            old_tier.id == subscription.tier_id,
            TimepassError::TierNotFound
        );
        old_tier.leave();
        tier.join()?;
    }

    // Convert tokens to time before any funds move
    let first_purchase = subscription.first_purchase();
    let seconds = tier.tokens_to_seconds(args.amount, first_purchase)?;
    subscription.extend(now, seconds, true)?;
    subscription.tier_id = tier.id;
    // Active membership takes its slash policy from the live tier
    subscription.slashable_after = 0;

    // Capture the full gross amount into the vault
    let config = &ctx.accounts.config;
    let vault_info = ctx.accounts.vault.to_account_info();
    let system_program_info = ctx.accounts.system_program.to_account_info();
    let mint_info = ctx.accounts.currency_mint.as_ref().map(|a| a.to_account_info());
    let vault_token_info = ctx.accounts.vault_token.as_ref().map(|a| a.to_account_info());
    if !config.is_native() {
        let mint = mint_info.as_ref().ok_or(TimepassError::WrongMint)?;
        validate_currency_mint(mint, config)?;
        let vault_token = vault_token_info
            .as_ref()
            .ok_or(TimepassError::InvalidFundAccount)?;
        validate_fund_account(vault_token, &ctx.accounts.vault.key(), config)?;
    }
    let vault = VaultAccess {
        native: config.is_native(),
        mint: mint_info.as_ref(),
        vault: &vault_info,
        vault_token: vault_token_info.as_ref(),
        token_program: ctx.accounts.token_program.as_ref(),
        system_program: &system_program_info,
        vault_bump: config.vault_bump,
    };
    let payer_info = ctx.accounts.payer.to_account_info();
    let payer_funds_info = ctx.accounts.payer_funds.to_account_info();
    vault.capture(&payer_info, &payer_funds_info, args.amount)?;

    // Resolve the effective referral share: the code's bps when it applies
    // and is non-zero, otherwise the fallback client-referral share. No
    // referrer, no referral leg.
    let referrer_key = ctx.accounts.referrer.as_ref().map(|r| r.key());
    let (referral_bps, code_used) = match referrer_key {
        Some(ref referrer) => {
            let code_bps = ctx
                .accounts
                .referral_code
                .as_ref()
                .and_then(|code| code.bps_for(referrer))
                .unwrap_or(0);
            if code_bps > 0 {
                (code_bps, args.referral_code)
            } else {
                (config.client_referral_bps, 0)
            }
        }
        None => (0, 0),
    };

    let split = fees::split(
        args.amount,
        config.protocol_bps,
        config.client_bps,
        referral_bps,
    )?;

    // Pay the fee legs out of the captured funds
    if split.protocol_fee > 0 {
        let funds = ctx
            .accounts
            .protocol_funds
            .as_ref()
            .ok_or(TimepassError::InvalidFundAccount)?;
        let funds_info = funds.to_account_info();
        validate_fund_account(&funds_info, &config.protocol_recipient, config)?;
        vault.transfer_out(&funds_info, split.protocol_fee)?;
        emit!(FeeTransfer {
            recipient: config.protocol_recipient,
            amount: split.protocol_fee,
            protocol: true,
        });
    }
    if split.client_fee > 0 {
        let funds = ctx
            .accounts
            .client_funds
            .as_ref()
            .ok_or(TimepassError::InvalidFundAccount)?;
        let funds_info = funds.to_account_info();
        validate_fund_account(&funds_info, &config.client_recipient, config)?;
        vault.transfer_out(&funds_info, split.client_fee)?;
        emit!(FeeTransfer {
            recipient: config.client_recipient,
            amount: split.client_fee,
            protocol: false,
        });
    }
    if split.referral_fee > 0 {
        let referrer = referrer_key.ok_or(TimepassError::InvalidFundAccount)?;
        let funds = ctx
            .accounts
            .referrer_funds
            .as_ref()
            .ok_or(TimepassError::InvalidFundAccount)?;
        let funds_info = funds.to_account_info();
        validate_fund_account(&funds_info, &referrer, config)?;
        vault.transfer_out(&funds_info, split.referral_fee)?;
        emit!(ReferralPaid {
            referrer,
            account: subscription.account,
            code: code_used,
            amount: split.referral_fee,
        });
    }

    // Route the tier's reward share into the pool: issue decayed shares to
    // the buyer, then allocate the value across all holders. With no shares
    // outstanding the value simply stays creator-withdrawable.
    let reward_amount = bps_share(split.net, tier.reward_bps)?;
    if reward_amount > 0 {
        let pool = &mut ctx.accounts.pool;
        let shares =
            rewards::issue_with_curve(pool, holder, reward_amount, &ctx.accounts.curve, now)?;
        if shares > 0 {
            emit!(SharesIssued {
                account: subscription.account,
                shares,
                multiplier: ctx.accounts.curve.multiplier_at(now),
            });
        }
        if pool.total_shares > 0 {
            rewards::allocate(pool, reward_amount)?;
            emit!(RewardsAllocated {
                amount: reward_amount,
                total_allocated: pool.total_allocated,
            });
        }
    }

    emit!(Purchased {
        account: subscription.account,
        token_id: subscription.token_id,
        tier_id: subscription.tier_id,
        amount: args.amount,
        seconds,
        net_amount: split.net,
        expires_at: subscription.expires_at,
    });

    Ok(())
}
