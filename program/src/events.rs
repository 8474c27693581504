use anchor_lang::prelude::*;

/// Event emitted when a purchase completes (mint, renewal, or tier switch)
#[event]
pub struct Purchased {
    /// The account whose subscription was extended
    pub account: Pubkey,
    /// The account's identity token id
    pub token_id: u64,
    /// The tier the subscription now belongs to
    pub tier_id: u16,
    /// Gross amount captured from the payer
    pub amount: u64,
    /// Seconds of access added by this purchase
    pub seconds: u64,
    /// Amount retained by creator + reward pool after all fee legs
    pub net_amount: u64,
    /// New absolute expiry timestamp
    pub expires_at: i64,
}

/// Event emitted for each protocol or client fee leg paid out
#[event]
pub struct FeeTransfer {
    /// Fee recipient
    pub recipient: Pubkey,
    /// Amount transferred
    pub amount: u64,
    /// True for the protocol leg, false for the client leg
    pub protocol: bool,
}

/// Event emitted when a referral payout occurs during a purchase
#[event]
pub struct ReferralPaid {
    /// The referrer receiving the payout
    pub referrer: Pubkey,
    /// The account whose purchase was referred
    pub account: Pubkey,
    /// Referral code used (0 when the fallback client-referral share applied)
    pub code: u64,
    /// Amount paid to the referrer
    pub amount: u64,
}

/// Event emitted when time is granted without payment
#[event]
pub struct TimeGranted {
    /// The account receiving time
    pub account: Pubkey,
    /// Seconds granted
    pub seconds: u64,
    /// Tier the account belongs to after the grant
    pub tier_id: u16,
    /// New absolute expiry timestamp
    pub expires_at: i64,
}

/// Event emitted when previously granted time is revoked
#[event]
pub struct TimeRevoked {
    /// The account losing time
    pub account: Pubkey,
    /// Seconds revoked
    pub seconds: u64,
    /// New absolute expiry timestamp
    pub expires_at: i64,
}

/// Event emitted when a subscription is refunded
#[event]
pub struct Refunded {
    /// The refunded account
    pub account: Pubkey,
    /// Amount returned from the creator balance
    pub amount: u64,
    /// The account's identity token id
    pub token_id: u64,
}

/// Event emitted when value is allocated to the reward pool
#[event]
pub struct RewardsAllocated {
    /// Amount added to the pool balance
    pub amount: u64,
    /// Lifetime total allocated to the pool
    pub total_allocated: u64,
}

/// Event emitted when reward shares are issued to a holder
#[event]
pub struct SharesIssued {
    /// The holder receiving shares
    pub account: Pubkey,
    /// Number of shares issued
    pub shares: u64,
    /// Curve multiplier in effect at issuance
    pub multiplier: u64,
}

/// Event emitted when a holder's reward entitlement is claimed
#[event]
pub struct RewardsClaimed {
    /// The holder whose entitlement was paid
    pub account: Pubkey,
    /// Amount paid out
    pub amount: u64,
}

/// Event emitted when a lapsed holder is slashed
#[event]
pub struct Slashed {
    /// The slashed account
    pub account: Pubkey,
    /// Shares burned
    pub shares: u64,
    /// Entitlement paid out (0 if the payout fell back)
    pub payout: u64,
}

/// Event emitted when a slash payout fails and the funds remain pooled
///
/// The share removal still takes effect; only the transfer leg is skipped.
#[event]
pub struct SlashPayoutFallback {
    /// The slashed account whose payout failed
    pub account: Pubkey,
    /// Entitlement amount retained by the pool
    pub amount: u64,
}

/// Event emitted when a new tier is created
#[event]
pub struct TierCreated {
    /// Sequential id of the new tier
    pub tier_id: u16,
}

/// Event emitted when an existing tier's parameters are overwritten
#[event]
pub struct TierUpdated {
    /// Id of the updated tier
    pub tier_id: u16,
}

/// Event emitted when a tier's paused flag changes
#[event]
pub struct TierPausedSet {
    /// Id of the tier
    pub tier_id: u16,
    /// New paused state
    pub paused: bool,
}

/// Event emitted when a new reward curve is appended
#[event]
pub struct CurveCreated {
    /// Sequential id of the new curve
    pub curve_id: u8,
}

/// Event emitted when a referral code is created or updated
#[event]
pub struct ReferralCodeSet {
    /// The referral code
    pub code: u64,
    /// Reward share in basis points
    pub bps: u16,
}

/// Event emitted when the global supply cap changes
#[event]
pub struct GlobalSupplyCapSet {
    /// New cap (0 = uncapped)
    pub cap: u64,
}

/// Event emitted when an expired subscription drops its tier membership
#[event]
pub struct SubscriptionDeactivated {
    /// The deactivated account
    pub account: Pubkey,
    /// Tier the subscription previously belonged to
    pub tier_id: u16,
}

/// Event emitted when a subscription (and its holder record) moves accounts
#[event]
pub struct SubscriptionTransferred {
    /// Previous owner
    pub from: Pubkey,
    /// New owner
    pub to: Pubkey,
    /// Identity token id that moved
    pub token_id: u64,
}

/// Event emitted when the protocol fee recipient rotates itself
#[event]
pub struct ProtocolRecipientUpdated {
    /// The new recipient (may be the zero address, which zeroes the fee)
    pub recipient: Pubkey,
}

/// Event emitted when the creator withdraws non-pool funds
#[event]
pub struct CreatorWithdraw {
    /// Destination of the withdrawal
    pub to: Pubkey,
    /// Amount withdrawn
    pub amount: u64,
}
