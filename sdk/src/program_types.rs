//! Program account types and instruction argument structures
//!
//! Byte-for-byte mirrors of the on-chain layouts so account data can be
//! deserialized and instruction arguments serialized without linking the
//! program crate. Account data carries an 8-byte Anchor discriminator before
//! the fields below.

use anchor_lang::prelude::*;
use serde::{Deserialize, Serialize};

/// Global protocol configuration
/// PDA seeds: ["config"]
#[derive(
    Clone, Debug, PartialEq, Eq, Serialize, Deserialize, AnchorSerialize, AnchorDeserialize,
)]
pub struct Config {
    /// Privileged operator for management, grants, refunds and withdrawals
    pub authority: Pubkey,
    /// Currency selector: `Pubkey::default()` = native lamports, otherwise the SPL mint
    pub currency_mint: Pubkey,
    /// Protocol fee recipient (zero address = no protocol fee)
    pub protocol_recipient: Pubkey,
    /// Protocol fee in basis points
    pub protocol_bps: u16,
    /// Client fee recipient (zero address = no client fee)
    pub client_recipient: Pubkey,
    /// Client fee in basis points
    pub client_bps: u16,
    /// Fallback referral share and ceiling for referral codes
    pub client_referral_bps: u16,
    /// Global cap on lifetime minted subscriptions (0 = uncapped)
    pub global_supply_cap: u64,
    /// Number of identity tokens minted so far
    pub num_subscriptions: u64,
    /// Monotonic identity token counter
    pub token_id_counter: u64,
    /// Number of tiers created (tier ids are 1-based)
    pub num_tiers: u16,
    /// Number of reward curves created (curve ids are 0-based)
    pub num_curves: u8,
    /// Bump seed of the funds vault PDA
    pub vault_bump: u8,
    /// PDA bump seed
    pub bump: u8,
}

/// Access tier
/// PDA seeds: ["tier", `tier_id` (u16 LE)]
#[derive(
    Clone, Debug, PartialEq, Eq, Serialize, Deserialize, AnchorSerialize, AnchorDeserialize,
)]
pub struct Tier {
    /// Sequential tier id, 1-based
    pub id: u16,
    /// Seconds of access granted per period
    pub period_secs: u64,
    /// Price of one full period, in currency base units
    pub price_per_period: u64,
    /// One-time surcharge on an account's first paid purchase
    pub initial_mint_price: u64,
    /// Maximum concurrent members (0 = uncapped)
    pub supply_cap: u64,
    /// Current member count
    pub current_supply: u64,
    /// Paused tiers reject new joins and renewals
    pub paused: bool,
    /// Whether subscriptions on this tier may be transferred
    pub transferable: bool,
    /// Share of the post-fee purchase amount routed to the reward pool
    pub reward_bps: u16,
    /// Reward curve used to convert reward value into shares
    pub reward_curve_id: u8,
    /// Whether lapsed members of this tier can be slashed
    pub reward_slashable: bool,
    /// Grace period after expiry before a member becomes slashable
    pub slash_grace_secs: u64,
    /// PDA bump seed
    pub bump: u8,
}

/// Per-account subscription record
/// PDA seeds: ["subscription", account]
#[derive(
    Clone, Debug, PartialEq, Eq, Serialize, Deserialize, AnchorSerialize, AnchorDeserialize,
)]
pub struct Subscription {
    /// The subscriber
    pub account: Pubkey,
    /// Opaque monotonic identity token id, always > 0 once minted
    pub token_id: u64,
    /// Current tier membership (0 = inactive, no tier)
    pub tier_id: u16,
    /// Absolute expiry of access time
    pub expires_at: i64,
    /// Absolute expiry of paid time; 0 until the first paid purchase
    pub purchase_expires: i64,
    /// Outstanding granted (unpaid, revocable) seconds
    pub granted_secs: u64,
    /// Slash deadline recorded at deactivation (0 = not slashable while inactive)
    pub slashable_after: i64,
    /// PDA bump seed
    pub bump: u8,
}

/// Per-account reward pool position
/// PDA seeds: ["holder", account]
#[derive(
    Clone, Debug, PartialEq, Eq, Serialize, Deserialize, AnchorSerialize, AnchorDeserialize,
)]
pub struct Holder {
    /// The holder
    pub account: Pubkey,
    /// Point-shares held
    pub num_shares: u64,
    /// Signed correction applied to the points-per-share product
    pub points_correction: i128,
    /// Value already withdrawn through claims
    pub withdrawn: u64,
    /// PDA bump seed
    pub bump: u8,
}

/// Immutable time-decay reward curve
/// PDA seeds: ["curve", [id]]
#[derive(
    Clone, Debug, PartialEq, Eq, Serialize, Deserialize, AnchorSerialize, AnchorDeserialize,
)]
pub struct RewardCurve {
    /// Sequential curve id, 0-based, append-only
    pub id: u8,
    /// Multiplier at activation
    pub start_multiplier: u64,
    /// Multiplier floor after the decay window has elapsed
    pub min_multiplier: u64,
    /// Length of the decay window in seconds
    pub decay_secs: u64,
    /// Curve activation timestamp
    pub activated_at: i64,
    /// PDA bump seed
    pub bump: u8,
}

/// Referral code record
/// PDA seeds: ["referral", code (u64 LE)]
#[derive(
    Clone, Debug, PartialEq, Eq, Serialize, Deserialize, AnchorSerialize, AnchorDeserialize,
)]
pub struct ReferralCode {
    /// The code value
    pub code: u64,
    /// Referrer share in basis points, carved from the client fee
    pub bps: u16,
    /// Once true, the code can never be changed again
    pub permanent: bool,
    /// Restricts payouts to one referrer (`Pubkey::default()` = anyone)
    pub restricted_to: Pubkey,
    /// PDA bump seed
    pub bump: u8,
}

/// Reward pool accumulator
/// PDA seeds: ["pool"]
#[derive(
    Clone, Debug, PartialEq, Eq, Serialize, Deserialize, AnchorSerialize, AnchorDeserialize,
)]
pub struct Pool {
    /// Sum of all holders' shares
    pub total_shares: u64,
    /// Points-per-share accumulator, scaled by 2^64
    pub points_per_share: u128,
    /// Lifetime value allocated to the pool
    pub total_allocated: u64,
    /// Pool-owned funds currently in the vault
    pub balance: u64,
    /// PDA bump seed
    pub bump: u8,
}

/// Tier creation and update parameters
#[derive(
    Clone, Debug, PartialEq, Eq, Serialize, Deserialize, AnchorSerialize, AnchorDeserialize,
)]
pub struct TierParams {
    pub period_secs: u64,
    pub price_per_period: u64,
    pub initial_mint_price: u64,
    pub supply_cap: u64,
    pub transferable: bool,
    pub reward_bps: u16,
    pub reward_curve_id: u8,
    pub reward_slashable: bool,
    pub slash_grace_secs: u64,
}

/// Reward curve creation parameters
#[derive(
    Clone, Debug, PartialEq, Eq, Serialize, Deserialize, AnchorSerialize, AnchorDeserialize,
)]
pub struct CurveParams {
    pub start_multiplier: u64,
    pub min_multiplier: u64,
    pub decay_secs: u64,
}

/// Arguments for initializing the protocol
#[derive(
    Clone, Debug, PartialEq, Eq, Serialize, Deserialize, AnchorSerialize, AnchorDeserialize,
)]
pub struct InitializeArgs {
    /// `Pubkey::default()` selects native lamports, otherwise the SPL mint
    pub currency_mint: Pubkey,
    pub protocol_recipient: Pubkey,
    pub protocol_bps: u16,
    pub client_recipient: Pubkey,
    pub client_bps: u16,
    pub client_referral_bps: u16,
    /// 0 = uncapped
    pub global_supply_cap: u64,
    /// Tier 1, created as part of initialization
    pub tier: TierParams,
    /// Curve 0, created as part of initialization
    pub curve: CurveParams,
}

/// Arguments for a purchase
#[derive(
    Clone, Debug, PartialEq, Eq, Serialize, Deserialize, AnchorSerialize, AnchorDeserialize,
)]
pub struct PurchaseArgs {
    /// Target tier; 0 keeps the account's current tier (or tier 1 if none)
    pub tier_id: u16,
    /// Gross amount to capture from the payer
    pub amount: u64,
    /// Referral code; 0 = no code
    pub referral_code: u64,
}

/// Arguments for creating a tier
#[derive(
    Clone, Debug, PartialEq, Eq, Serialize, Deserialize, AnchorSerialize, AnchorDeserialize,
)]
pub struct CreateTierArgs {
    /// Must be the next sequential tier id
    pub tier_id: u16,
    pub params: TierParams,
}

/// Arguments for updating a tier
#[derive(
    Clone, Debug, PartialEq, Eq, Serialize, Deserialize, AnchorSerialize, AnchorDeserialize,
)]
pub struct UpdateTierArgs {
    pub tier_id: u16,
    pub params: TierParams,
}

/// Arguments for pausing or unpausing a tier
#[derive(
    Clone, Debug, PartialEq, Eq, Serialize, Deserialize, AnchorSerialize, AnchorDeserialize,
)]
pub struct SetTierPausedArgs {
    pub tier_id: u16,
    pub paused: bool,
}

/// Arguments for appending a reward curve
#[derive(
    Clone, Debug, PartialEq, Eq, Serialize, Deserialize, AnchorSerialize, AnchorDeserialize,
)]
pub struct CreateRewardCurveArgs {
    /// Must be the next sequential curve id
    pub curve_id: u8,
    pub params: CurveParams,
}

/// Arguments for creating or updating a referral code
#[derive(
    Clone, Debug, PartialEq, Eq, Serialize, Deserialize, AnchorSerialize, AnchorDeserialize,
)]
pub struct SetReferralCodeArgs {
    pub code: u64,
    /// Referrer share, bounded by the config's referral ceiling
    pub bps: u16,
    /// Once set, the code can never be changed again
    pub permanent: bool,
    /// Restricts payouts to one referrer (`Pubkey::default()` = anyone)
    pub restricted_to: Pubkey,
}

/// Arguments for changing the global supply cap
#[derive(
    Clone, Debug, PartialEq, Eq, Serialize, Deserialize, AnchorSerialize, AnchorDeserialize,
)]
pub struct SetGlobalSupplyCapArgs {
    /// New lifetime mint ceiling; 0 = uncapped
    pub cap: u64,
}

/// Arguments for rotating the protocol fee recipient
#[derive(
    Clone, Debug, PartialEq, Eq, Serialize, Deserialize, AnchorSerialize, AnchorDeserialize,
)]
pub struct UpdateProtocolRecipientArgs {
    /// New recipient; the zero address abandons the fee
    pub recipient: Pubkey,
}

/// Arguments for granting payment-free time
#[derive(
    Clone, Debug, PartialEq, Eq, Serialize, Deserialize, AnchorSerialize, AnchorDeserialize,
)]
pub struct GrantTimeArgs {
    /// Seconds of access to grant
    pub seconds: u64,
    /// Target tier; 0 keeps the account's current tier (or tier 1 if none)
    pub tier_id: u16,
}

/// Arguments for a refund
#[derive(
    Clone, Debug, PartialEq, Eq, Serialize, Deserialize, AnchorSerialize, AnchorDeserialize,
)]
pub struct RefundArgs {
    /// Amount to return from the creator balance
    pub amount: u64,
}

/// Arguments for a yield donation into the reward pool
#[derive(
    Clone, Debug, PartialEq, Eq, Serialize, Deserialize, AnchorSerialize, AnchorDeserialize,
)]
pub struct YieldRewardsArgs {
    /// Amount captured from the payer and spread across all holders
    pub amount: u64,
}

/// Arguments for a creator withdrawal
#[derive(
    Clone, Debug, PartialEq, Eq, Serialize, Deserialize, AnchorSerialize, AnchorDeserialize,
)]
pub struct WithdrawCreatorArgs {
    /// Amount to withdraw from the creator balance
    pub amount: u64,
}
