//! Program constants
//!
//! Mathematical and protocol constants used throughout the access-pass
//! program. These values are immutable and represent universal constants or
//! protocol-level invariants that should never change post-deployment.

/// Basis points divisor for percentage calculations
///
/// Basis points are a unit of measure for percentages, where 1 basis point = 0.01%.
/// This constant represents 10,000 basis points = 100%, used for all fee and
/// reward calculations.
///
/// # Examples
/// ```ignore
/// // Calculate 2.5% fee (250 basis points):
/// let fee_bps: u16 = 250;
/// let amount: u64 = 1_000_000;
/// let fee = (u128::from(amount) * u128::from(fee_bps)) / BPS_DENOMINATOR;
/// // fee = 25_000 (2.5% of 1_000_000)
/// ```
pub const BPS_DENOMINATOR: u128 = 10_000;

/// Maximum combined protocol + client fee, in basis points (12.5%)
///
/// Validated whenever fee parameters are set. The ceiling bounds the share of
/// every purchase that can be diverted away from the creator and reward pool.
pub const MAX_TOTAL_FEE_BPS: u16 = 1_250;

/// Maximum reward allocation a tier may configure, in basis points (100%)
pub const MAX_REWARD_BPS: u16 = 10_000;

/// Fixed-point scale for the reward pool's points-per-share accumulator
///
/// Pool entitlement math runs at `2^64` precision so that integer division
/// only rounds once, at payout time. Rounding is always down: dust accrues to
/// the pool, never to a holder.
pub const SHARE_PRECISION: u128 = 1 << 64;

/// Tier id reserved for "no active tier"
///
/// Real tiers are 1-based. A subscription whose `tier_id` equals this value
/// holds an identity token but no tier membership.
pub const TIER_ID_NONE: u16 = 0;
