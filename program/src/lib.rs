//! Timepass Protocol
//!
//! A time-metered access-pass program: accounts pay a native or SPL asset to
//! accrue remaining seconds of access, organized into tiers with independent
//! pricing, supply caps, and transferability rules. Each purchase is split
//! between the creator balance, protocol and client fees, referral payouts,
//! and a share-based reward pool that pays yield to point-holders through
//! time-decaying issuance curves. Lapsed holders can be slashed, returning
//! their unclaimed value.
//!
//! ## Core Features
//! - Tiered subscriptions with per-tier pricing, duration, caps and pausing
//! - Exact-amount funds capture with a fee-on-transfer guard
//! - Protocol/client/referral fee splitting with an enforced ceiling
//! - Proportional reward pool with append-only decay curves
//! - Grants, revocation, refunds, and subscription transfers
//! - Slashing of lapsed point-holders with a non-blocking payout fallback

#![forbid(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![allow(unexpected_cfgs)]
#![allow(clippy::wildcard_imports)]
#![allow(clippy::needless_pass_by_value)] // Anchor handlers must take owned Context by design
#![allow(clippy::unnecessary_wraps)] // Anchor handlers return Result<()> for consistency
#![allow(deprecated)] // Anchor framework uses deprecated AccountInfo::realloc internally

use anchor_lang::prelude::*;

mod claim_rewards;
pub mod constants;
mod create_reward_curve;
mod create_tier;
pub mod currency;
mod deactivate_subscription;
pub mod errors;
pub mod events;
pub mod fees;
mod grant_time;
mod initialize;
mod purchase;
mod refund;
pub mod rewards;
mod revoke_time;
mod set_global_supply_cap;
mod set_referral_code;
mod set_tier_paused;
mod slash;
pub mod state;
mod transfer_subscription;
mod update_protocol_recipient;
mod update_tier;
pub mod utils;
mod withdraw_creator;
mod yield_rewards;

use claim_rewards::*;
use create_reward_curve::*;
use create_tier::*;
use deactivate_subscription::*;
use grant_time::*;
use initialize::*;
use purchase::*;
use refund::*;
use revoke_time::*;
use set_global_supply_cap::*;
use set_referral_code::*;
use set_tier_paused::*;
use slash::*;
use transfer_subscription::*;
use update_protocol_recipient::*;
use update_tier::*;
use withdraw_creator::*;
use yield_rewards::*;

declare_id!("TPVWLsUGYucHZCELLMGWmqS6dDQeinYacNncy4vBnL4");

#[program]
pub mod timepass {
    use super::*;

    /// Initialize the protocol: config, reward pool, funds vault, tier 1 and curve 0
    ///
    /// # Errors
    /// Returns an error if:
    /// - Any account already exists
    /// - Fee parameters violate the ceiling or the zero-recipient rule
    /// - Tier or curve parameters fail validation
    pub fn initialize(ctx: Context<Initialize>, args: InitializeArgs) -> Result<()> {
        initialize::handler(ctx, args)
    }

    /// Create the next sequential tier
    ///
    /// # Errors
    /// Returns an error if:
    /// - The caller is not the config authority
    /// - `tier_id` is not the next sequential id
    /// - Tier parameters fail validation (zero period/price, bad curve reference)
    pub fn create_tier(ctx: Context<CreateTier>, args: CreateTierArgs) -> Result<()> {
        create_tier::handler(ctx, args)
    }

    /// Overwrite an existing tier's parameters; current supply is preserved
    ///
    /// # Errors
    /// Returns an error if:
    /// - The caller is not the config authority
    /// - Tier parameters fail validation
    pub fn update_tier(ctx: Context<UpdateTier>, args: UpdateTierArgs) -> Result<()> {
        update_tier::handler(ctx, args)
    }

    /// Pause or unpause a tier for new joins and renewals
    ///
    /// # Errors
    /// Returns an error if the caller is not the config authority
    pub fn set_tier_paused(ctx: Context<SetTierPaused>, args: SetTierPausedArgs) -> Result<()> {
        set_tier_paused::handler(ctx, args)
    }

    /// Append a new immutable reward curve
    ///
    /// # Errors
    /// Returns an error if:
    /// - The caller is not the config authority
    /// - `curve_id` is not the next sequential id
    /// - Curve parameters fail validation
    pub fn create_reward_curve(
        ctx: Context<CreateRewardCurve>,
        args: CreateRewardCurveArgs,
    ) -> Result<()> {
        create_reward_curve::handler(ctx, args)
    }

    /// Create or update a referral code
    ///
    /// # Errors
    /// Returns an error if:
    /// - The caller is not the config authority
    /// - The code is already marked permanent
    /// - The bps exceed the configured referral ceiling
    pub fn set_referral_code(
        ctx: Context<SetReferralCode>,
        args: SetReferralCodeArgs,
    ) -> Result<()> {
        set_referral_code::handler(ctx, args)
    }

    /// Change the global supply cap (0 = uncapped)
    ///
    /// # Errors
    /// Returns an error if the caller is not the config authority
    pub fn set_global_supply_cap(
        ctx: Context<SetGlobalSupplyCap>,
        args: SetGlobalSupplyCapArgs,
    ) -> Result<()> {
        set_global_supply_cap::handler(ctx, args)
    }

    /// Rotate the protocol fee recipient; only the current recipient may sign
    ///
    /// # Errors
    /// Returns an error if the signer is not the current protocol recipient
    pub fn update_protocol_recipient(
        ctx: Context<UpdateProtocolRecipient>,
        args: UpdateProtocolRecipientArgs,
    ) -> Result<()> {
        update_protocol_recipient::handler(ctx, args)
    }

    /// Purchase access time for any account: capture funds, extend the
    /// subscription, split fees, and route rewards into the pool
    ///
    /// # Errors
    /// Returns an error if:
    /// - The beneficiary is the zero address
    /// - The payment does not cover the initial mint price plus one period
    /// - A third party attempts to switch an active subscription's tier
    /// - The target tier is paused or at capacity, or the global cap is reached
    /// - The funds capture arrives short (fee-on-transfer guard)
    pub fn purchase(ctx: Context<Purchase>, args: PurchaseArgs) -> Result<()> {
        purchase::handler(ctx, args)
    }

    /// Grant payment-free time to an account (privileged)
    ///
    /// # Errors
    /// Returns an error if:
    /// - The caller is not the config authority
    /// - The target tier is paused or at capacity
    pub fn grant_time(ctx: Context<GrantTime>, args: GrantTimeArgs) -> Result<()> {
        grant_time::handler(ctx, args)
    }

    /// Revoke previously granted time, floored at the present (privileged)
    ///
    /// # Errors
    /// Returns an error if the caller is not the config authority
    pub fn revoke_time(ctx: Context<RevokeTime>) -> Result<()> {
        revoke_time::handler(ctx)
    }

    /// Refund an account from the creator balance and zero its remaining time
    /// (privileged)
    ///
    /// # Errors
    /// Returns an error if:
    /// - The caller is not the config authority
    /// - The creator balance cannot cover the amount
    pub fn refund(ctx: Context<Refund>, args: RefundArgs) -> Result<()> {
        refund::handler(ctx, args)
    }

    /// Drop tier membership of an expired subscription; idempotent
    ///
    /// # Errors
    /// Returns an error if the subscription has not expired yet
    pub fn deactivate_subscription(ctx: Context<DeactivateSubscription>) -> Result<()> {
        deactivate_subscription::handler(ctx)
    }

    /// Move a subscription and its reward position to another account
    ///
    /// # Errors
    /// Returns an error if:
    /// - The destination already has a subscription or reward position
    /// - The source tier forbids transfers
    pub fn transfer_subscription(ctx: Context<TransferSubscription>) -> Result<()> {
        transfer_subscription::handler(ctx)
    }

    /// Permissionless reward pool top-up, spread across all current holders
    ///
    /// # Errors
    /// Returns an error if:
    /// - The pool has no shares outstanding
    /// - The funds capture arrives short
    pub fn yield_rewards(ctx: Context<YieldRewards>, args: YieldRewardsArgs) -> Result<()> {
        yield_rewards::handler(ctx, args)
    }

    /// Claim a holder's unclaimed entitlement; permissionless, pays the holder
    ///
    /// # Errors
    /// Returns an error if the payout transfer fails
    pub fn claim_rewards(ctx: Context<ClaimRewards>) -> Result<()> {
        claim_rewards::handler(ctx)
    }

    /// Slash a lapsed holder: burn their shares and crystallize their payout
    ///
    /// # Errors
    /// Returns an error if:
    /// - The tier does not mark the pool slashable
    /// - The slash grace period has not elapsed
    /// - The holder has no shares
    pub fn slash(ctx: Context<Slash>) -> Result<()> {
        slash::handler(ctx)
    }

    /// Withdraw creator funds (vault balance minus pool balance, privileged)
    ///
    /// # Errors
    /// Returns an error if:
    /// - The caller is not the config authority
    /// - The creator balance cannot cover the amount
    pub fn withdraw_creator(ctx: Context<WithdrawCreator>, args: WithdrawCreatorArgs) -> Result<()> {
        withdraw_creator::handler(ctx, args)
    }
}
