//! Error types for the Timepass SDK
//!
//! Program-specific error codes (Anchor assigns them starting at 6000) are
//! mapped to dedicated variants so callers can match on the failure instead
//! of parsing log strings.

use thiserror::Error;

/// Result type for Timepass SDK operations
pub type Result<T> = std::result::Result<T, TimepassError>;

/// Error types that can occur when using the Timepass SDK
#[derive(Error, Debug)]
pub enum TimepassError {
    /// Error from the Anchor framework
    #[error("Anchor error: {0}")]
    Anchor(anchor_lang::error::Error),

    /// Error parsing a pubkey
    #[error("Pubkey parse error: {0}")]
    ParsePubkey(#[from] solana_sdk::pubkey::ParsePubkeyError),

    /// Error from SPL Token
    #[error("SPL Token error: {0}")]
    SplToken(#[from] spl_token::error::TokenError),

    /// Error from the Solana program runtime
    #[error("Program error: {0}")]
    Program(#[from] solana_program::program_error::ProgramError),

    /// Error from serde JSON
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Generic error with message
    #[error("Timepass SDK error: {0}")]
    Generic(String),

    /// Instruction serialization failure
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// A required builder field was not provided
    #[error("Missing builder field: {0}")]
    MissingField(&'static str),

    // Program error variants (Anchor error codes 6000-6021)
    /// The target account is the zero-identity sentinel or otherwise unusable (6000)
    #[error("Invalid account provided for this operation.")]
    InvalidAccount,

    /// A funds capture observed less value arriving than was requested (6001)
    #[error("Capture failed: the vault received less than the requested amount.")]
    InvalidCapture,

    /// The creator balance cannot cover a refund or withdrawal (6002)
    #[error("Insufficient creator balance to complete the operation.")]
    InsufficientBalance,

    /// A tier or global supply cap would be exceeded (6003)
    #[error("Supply cap exceeded: no capacity remaining for new subscribers.")]
    CapacityExceeded,

    /// A third party attempted to switch another account's active tier (6004)
    #[error("Tier switch rejected: only the account owner may change tiers.")]
    TierInvalidSwitch,

    /// The target tier is paused for new joins and renewals (6005)
    #[error("Tier is paused and not accepting purchases.")]
    TierPaused,

    /// The source tier forbids subscription transfers (6006)
    #[error("Tier does not allow subscription transfers.")]
    TierTransferBlocked,

    /// A referenced tier id has not been created (6007)
    #[error("Tier not found.")]
    TierNotFound,

    /// Slash preconditions are unmet (6008)
    #[error("Account is not slashable.")]
    NotSlashable,

    /// A fee-recipient update was attempted by the wrong signer (6009)
    #[error("Caller is not eligible to perform this update.")]
    NotEligible,

    /// The caller lacks the config authority (6010)
    #[error("Unauthorized: config authority signature required.")]
    Unauthorized,

    /// Tier parameters failed validation (6011)
    #[error("Invalid tier parameters.")]
    InvalidTierParams,

    /// Fee parameters violate the ceiling or the zero-recipient rule (6012)
    #[error("Invalid fee parameters.")]
    InvalidFeeParams,

    /// Curve parameters failed validation (6013)
    #[error("Invalid reward curve parameters.")]
    InvalidCurveParams,

    /// Referral code parameters exceed the configured ceiling (6014)
    #[error("Invalid referral code parameters.")]
    InvalidReferralParams,

    /// The referral code is marked permanent (6015)
    #[error("Referral code is permanent and cannot be changed.")]
    ReferralLocked,

    /// The transfer destination already carries a subscription or shares (6016)
    #[error("Destination account already has a subscription.")]
    AlreadySubscribed,

    /// An operation required an active or existing subscription (6017)
    #[error("Subscription is inactive or does not exist.")]
    SubscriptionInactive,

    /// Yield allocation found no shares to distribute to (6018)
    #[error("Reward pool has no shares outstanding.")]
    NoSharesOutstanding,

    /// A fund account failed validation for the configured currency (6019)
    #[error("Invalid fund account for the configured currency.")]
    InvalidFundAccount,

    /// A token account or mint does not match the configured currency (6020)
    #[error("Wrong mint: account does not use the configured currency.")]
    WrongMint,

    /// Arithmetic overflow or underflow inside the program (6021)
    #[error("Arithmetic operation would result in overflow or underflow.")]
    ArithmeticError,

    /// An instruction argument required a positive amount (6022)
    #[error("Amount must be greater than zero.")]
    InvalidAmount,
}

impl From<anchor_lang::error::Error> for TimepassError {
    fn from(error: anchor_lang::error::Error) -> Self {
        Self::from_anchor_error(error)
    }
}

impl From<String> for TimepassError {
    fn from(msg: String) -> Self {
        Self::Generic(msg)
    }
}

impl From<&str> for TimepassError {
    fn from(msg: &str) -> Self {
        Self::Generic(msg.to_string())
    }
}

impl From<anyhow::Error> for TimepassError {
    fn from(error: anyhow::Error) -> Self {
        Self::Generic(error.to_string())
    }
}

impl TimepassError {
    /// Map a raw custom error code (as found in transaction logs or
    /// `InstructionError::Custom`) to its specific variant
    #[must_use]
    pub const fn from_error_code(code: u32) -> Option<Self> {
        match code {
            6000 => Some(Self::InvalidAccount),
            6001 => Some(Self::InvalidCapture),
            6002 => Some(Self::InsufficientBalance),
            6003 => Some(Self::CapacityExceeded),
            6004 => Some(Self::TierInvalidSwitch),
            6005 => Some(Self::TierPaused),
            6006 => Some(Self::TierTransferBlocked),
            6007 => Some(Self::TierNotFound),
            6008 => Some(Self::NotSlashable),
            6009 => Some(Self::NotEligible),
            6010 => Some(Self::Unauthorized),
            6011 => Some(Self::InvalidTierParams),
            6012 => Some(Self::InvalidFeeParams),
            6013 => Some(Self::InvalidCurveParams),
            6014 => Some(Self::InvalidReferralParams),
            6015 => Some(Self::ReferralLocked),
            6016 => Some(Self::AlreadySubscribed),
            6017 => Some(Self::SubscriptionInactive),
            6018 => Some(Self::NoSharesOutstanding),
            6019 => Some(Self::InvalidFundAccount),
            6020 => Some(Self::WrongMint),
            6021 => Some(Self::ArithmeticError),
            6022 => Some(Self::InvalidAmount),
            _ => None,
        }
    }

    /// Map an Anchor error to a specific variant when the error code is one
    /// of ours, falling back to the generic Anchor wrapper otherwise
    #[must_use]
    pub fn from_anchor_error(anchor_error: anchor_lang::error::Error) -> Self {
        use anchor_lang::error::Error;

        match &anchor_error {
            Error::AnchorError(err) => Self::from_error_code(err.error_code_number)
                .unwrap_or(Self::Anchor(anchor_error)),
            Error::ProgramError(_) => Self::Anchor(anchor_error),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn maps_known_error_codes() {
        assert!(matches!(
            TimepassError::from_error_code(6000),
            Some(TimepassError::InvalidAccount)
        ));
        assert!(matches!(
            TimepassError::from_error_code(6008),
            Some(TimepassError::NotSlashable)
        ));
        assert!(matches!(
            TimepassError::from_error_code(6021),
            Some(TimepassError::ArithmeticError)
        ));
        assert!(matches!(
            TimepassError::from_error_code(6022),
            Some(TimepassError::InvalidAmount)
        ));
    }

    #[test]
    fn unknown_codes_map_to_none() {
        assert!(TimepassError::from_error_code(5999).is_none());
        assert!(TimepassError::from_error_code(6023).is_none());
        assert!(TimepassError::from_error_code(0).is_none());
    }
}
