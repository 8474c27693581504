use anchor_lang::prelude::*;

/// Custom error codes for the access-pass protocol
///
/// Note: Anchor automatically assigns error codes starting from 6000.
#[error_code]
pub enum TimepassError {
    /// Error Code: 6000
    /// When the target account is the zero-identity sentinel or otherwise unusable
    #[msg("Invalid account provided for this operation.")]
    InvalidAccount,

    /// Error Code: 6001
    /// When a funds capture observes less value arriving than was requested
    #[msg("Capture failed: the vault received less than the requested amount.")]
    InvalidCapture,

    /// Error Code: 6002
    /// When the creator balance cannot cover a refund or withdrawal
    #[msg("Insufficient creator balance to complete the operation.")]
    InsufficientBalance,

    /// Error Code: 6003
    /// When a tier or global supply cap would be exceeded
    #[msg("Supply cap exceeded: no capacity remaining for new subscribers.")]
    CapacityExceeded,

    /// Error Code: 6004
    /// When a third party attempts to switch another account's active tier
    #[msg("Tier switch rejected: only the account owner may change tiers.")]
    TierInvalidSwitch,

    /// Error Code: 6005
    /// When the target tier is paused for new joins and renewals
    #[msg("Tier is paused and not accepting purchases.")]
    TierPaused,

    /// Error Code: 6006
    /// When the source tier forbids subscription transfers
    #[msg("Tier does not allow subscription transfers.")]
    TierTransferBlocked,

    /// Error Code: 6007
    /// When a referenced tier id has not been created
    #[msg("Tier not found.")]
    TierNotFound,

    /// Error Code: 6008
    /// When slash preconditions are unmet (tier not slashable, grace not elapsed, no shares)
    #[msg("Account is not slashable.")]
    NotSlashable,

    /// Error Code: 6009
    /// When a fee-recipient update is attempted by anyone but the current recipient
    #[msg("Caller is not eligible to perform this update.")]
    NotEligible,

    /// Error Code: 6010
    /// When the caller lacks the config authority for a privileged operation
    #[msg("Unauthorized: config authority signature required.")]
    Unauthorized,

    /// Error Code: 6011
    /// When tier parameters fail validation (zero period, zero price, bad curve reference)
    #[msg("Invalid tier parameters.")]
    InvalidTierParams,

    /// Error Code: 6012
    /// When fee parameters violate the ceiling or the zero-recipient rule
    #[msg("Invalid fee parameters.")]
    InvalidFeeParams,

    /// Error Code: 6013
    /// When curve parameters fail validation
    #[msg("Invalid reward curve parameters.")]
    InvalidCurveParams,

    /// Error Code: 6014
    /// When referral code parameters exceed the configured ceiling
    #[msg("Invalid referral code parameters.")]
    InvalidReferralParams,

    /// Error Code: 6015
    /// When attempting to modify a referral code marked permanent
    #[msg("Referral code is permanent and cannot be changed.")]
    ReferralLocked,

    /// Error Code: 6016
    /// When the transfer destination already carries a subscription or shares
    #[msg("Destination account already has a subscription.")]
    AlreadySubscribed,

    /// Error Code: 6017
    /// When an operation requires an active or existing subscription
    #[msg("Subscription is inactive or does not exist.")]
    SubscriptionInactive,

    /// Error Code: 6018
    /// When yield allocation finds no shares to distribute to
    #[msg("Reward pool has no shares outstanding.")]
    NoSharesOutstanding,

    /// Error Code: 6019
    /// When a fund account fails validation (wrong owner, wrong derivation, not a token account)
    #[msg("Invalid fund account for the configured currency.")]
    InvalidFundAccount,

    /// Error Code: 6020
    /// When a token account or mint does not match the configured currency mint
    #[msg("Wrong mint: account does not use the configured currency.")]
    WrongMint,

    /// Error Code: 6021
    /// When arithmetic operations would overflow/underflow
    #[msg("Arithmetic operation would result in overflow or underflow.")]
    ArithmeticError,

    /// Error Code: 6022
    /// When an instruction argument requires a positive amount
    #[msg("Amount must be greater than zero.")]
    InvalidAmount,
}
