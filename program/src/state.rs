use anchor_lang::prelude::*;

use crate::constants::{BPS_DENOMINATOR, MAX_REWARD_BPS, MAX_TOTAL_FEE_BPS, TIER_ID_NONE};
use crate::errors::TimepassError;

/// Global configuration account
/// PDA seeds: ["config"]
#[account]
#[derive(InitSpace)]
pub struct Config {
    /// Privileged operator: tier/curve/referral management, grants, refunds, withdrawals
    pub authority: Pubkey, // 32 bytes
    /// Currency selector: `Pubkey::default()` = native lamports, otherwise the SPL mint
    pub currency_mint: Pubkey, // 32 bytes
    /// Protocol fee recipient (zero address = no protocol fee)
    pub protocol_recipient: Pubkey, // 32 bytes
    /// Protocol fee in basis points
    pub protocol_bps: u16, // 2 bytes
    /// Client fee recipient (zero address = no client fee)
    pub client_recipient: Pubkey, // 32 bytes
    /// Client fee in basis points
    pub client_bps: u16, // 2 bytes
    /// Fallback referral share and ceiling for referral codes, carved from the client fee
    pub client_referral_bps: u16, // 2 bytes
    /// Global cap on lifetime minted subscriptions (0 = uncapped)
    pub global_supply_cap: u64, // 8 bytes
    /// Number of identity tokens minted so far
    pub num_subscriptions: u64, // 8 bytes
    /// Monotonic identity token counter (first issued id is 1, ids are never reused)
    pub token_id_counter: u64, // 8 bytes
    /// Number of tiers created (tier ids are 1-based)
    pub num_tiers: u16, // 2 bytes
    /// Number of reward curves created (curve ids are 0-based)
    pub num_curves: u8, // 1 byte
    /// Bump seed of the funds vault PDA
    pub vault_bump: u8, // 1 byte
    /// PDA bump seed
    pub bump: u8, // 1 byte
}

impl Config {
    pub const SPACE: usize = 8 + Self::INIT_SPACE;

    /// Validates a full set of fee parameters.
    ///
    /// Rules:
    /// - `protocol_bps + client_bps` must not exceed [`MAX_TOTAL_FEE_BPS`]
    /// - a zero recipient must carry zero bps and vice versa, per leg
    /// - `client_referral_bps` must not exceed `client_bps`, so the referral
    ///   carve-out can never overdraw the client share
    pub fn validate_fee_params(
        protocol_recipient: &Pubkey,
        protocol_bps: u16,
        client_recipient: &Pubkey,
        client_bps: u16,
        client_referral_bps: u16,
    ) -> Result<()> {
        let total = protocol_bps
            .checked_add(client_bps)
            .ok_or(TimepassError::ArithmeticError)?;
        require!(total <= MAX_TOTAL_FEE_BPS, TimepassError::InvalidFeeParams);
        require!(
            (*protocol_recipient == Pubkey::default()) == (protocol_bps == 0),
            TimepassError::InvalidFeeParams
        );
        require!(
            (*client_recipient == Pubkey::default()) == (client_bps == 0),
            TimepassError::InvalidFeeParams
        );
        require!(
            client_referral_bps <= client_bps,
            TimepassError::InvalidFeeParams
        );
        Ok(())
    }

    /// True when the configured currency is native lamports
    #[must_use]
    pub fn is_native(&self) -> bool {
        self.currency_mint == Pubkey::default()
    }

    /// Checks the global supply cap and increments the subscriber count
    pub fn record_mint(&mut self) -> Result<u64> {
        if self.global_supply_cap > 0 {
            require!(
                self.num_subscriptions < self.global_supply_cap,
                TimepassError::CapacityExceeded
            );
        }
        self.num_subscriptions = self
            .num_subscriptions
            .checked_add(1)
            .ok_or(TimepassError::ArithmeticError)?;
        self.token_id_counter = self
            .token_id_counter
            .checked_add(1)
            .ok_or(TimepassError::ArithmeticError)?;
        Ok(self.token_id_counter)
    }
}

/// Tier account: pricing, duration, capacity and reward parameters
/// PDA seeds: ["tier", `id.to_le_bytes()`]
#[account]
#[derive(InitSpace)]
pub struct Tier {
    /// Sequential tier id, 1-based (0 is the "no tier" sentinel and has no account)
    pub id: u16, // 2 bytes
    /// Seconds of access granted per period
    pub period_secs: u64, // 8 bytes
    /// Price of one full period, in currency base units
    pub price_per_period: u64, // 8 bytes
    /// One-time surcharge applied to an account's first paid purchase
    pub initial_mint_price: u64, // 8 bytes
    /// Maximum concurrent members (0 = uncapped)
    pub supply_cap: u64, // 8 bytes
    /// Current member count
    pub current_supply: u64, // 8 bytes
    /// Paused tiers reject new joins and renewals
    pub paused: bool, // 1 byte
    /// Whether subscriptions on this tier may be transferred between accounts
    pub transferable: bool, // 1 byte
    /// Share of the post-fee purchase amount routed to the reward pool
    pub reward_bps: u16, // 2 bytes
    /// Reward curve used to convert reward value into shares
    pub reward_curve_id: u8, // 1 byte
    /// Whether lapsed members of this tier can be slashed
    pub reward_slashable: bool, // 1 byte
    /// Grace period after expiry before a member becomes slashable
    pub slash_grace_secs: u64, // 8 bytes
    /// PDA bump seed
    pub bump: u8, // 1 byte
}

/// Validated tier parameters shared by create and update
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Debug)]
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

impl TierParams {
    /// Validates tier parameters against the current curve count.
    ///
    /// `price_per_period` must be positive: time conversion divides by it, and
    /// free access is expressible through grants instead.
    pub fn validate(&self, num_curves: u8) -> Result<()> {
        require!(self.period_secs > 0, TimepassError::InvalidTierParams);
        require!(self.price_per_period > 0, TimepassError::InvalidTierParams);
        require!(
            self.reward_bps <= MAX_REWARD_BPS,
            TimepassError::InvalidTierParams
        );
        require!(
            self.reward_curve_id < num_curves,
            TimepassError::InvalidTierParams
        );
        Ok(())
    }
}

impl Tier {
    pub const SPACE: usize = 8 + Self::INIT_SPACE;

    /// Overwrites all mutable parameters. `current_supply` is preserved.
    pub fn apply_params(&mut self, params: &TierParams) {
        self.period_secs = params.period_secs;
        self.price_per_period = params.price_per_period;
        self.initial_mint_price = params.initial_mint_price;
        self.supply_cap = params.supply_cap;
        self.transferable = params.transferable;
        self.reward_bps = params.reward_bps;
        self.reward_curve_id = params.reward_curve_id;
        self.reward_slashable = params.reward_slashable;
        self.slash_grace_secs = params.slash_grace_secs;
    }

    /// Converts captured tokens into seconds of access.
    ///
    /// The first paid purchase pays the `initial_mint_price` surcharge off the
    /// top. The remainder must cover at least one full period; partial periods
    /// beyond that are credited pro rata, rounding down.
    pub fn tokens_to_seconds(&self, tokens: u64, first_purchase: bool) -> Result<u64> {
        let net = if first_purchase {
            tokens
                .checked_sub(self.initial_mint_price)
                .ok_or(TimepassError::InsufficientBalance)?
        } else {
            tokens
        };
        require!(
            net >= self.price_per_period,
            TimepassError::InsufficientBalance
        );
        let seconds = u128::from(net)
            .checked_mul(u128::from(self.period_secs))
            .and_then(|v| v.checked_div(u128::from(self.price_per_period)))
            .ok_or(TimepassError::ArithmeticError)?;
        u64::try_from(seconds).map_err(|_| TimepassError::ArithmeticError.into())
    }

    /// Adds a member, enforcing the per-tier supply cap
    pub fn join(&mut self) -> Result<()> {
        if self.supply_cap > 0 {
            require!(
                self.current_supply < self.supply_cap,
                TimepassError::CapacityExceeded
            );
        }
        self.current_supply = self
            .current_supply
            .checked_add(1)
            .ok_or(TimepassError::ArithmeticError)?;
        Ok(())
    }

    /// Removes a member (tier switch, deactivation)
    pub fn leave(&mut self) {
        self.current_supply = self.current_supply.saturating_sub(1);
    }

    /// Absolute timestamp after which a member whose time expired at
    /// `expires_at` may be slashed, or `None` when the tier is not slashable
    pub fn slash_deadline(&self, expires_at: i64) -> Result<Option<i64>> {
        if !self.reward_slashable {
            return Ok(None);
        }
        let grace =
            i64::try_from(self.slash_grace_secs).map_err(|_| TimepassError::ArithmeticError)?;
        let deadline = expires_at
            .checked_add(grace)
            .ok_or(TimepassError::ArithmeticError)?;
        Ok(Some(deadline))
    }

    /// True when a member whose time expired at `expires_at` is strictly past
    /// the slash grace period at `now`
    pub fn slashable_at(&self, expires_at: i64, now: i64) -> Result<bool> {
        Ok(self.slash_deadline(expires_at)?.is_some_and(|d| now > d))
    }
}

/// Per-account subscription record
/// PDA seeds: ["subscription", account]
#[account]
#[derive(InitSpace)]
pub struct Subscription {
    /// The subscriber
    pub account: Pubkey, // 32 bytes
    /// Opaque monotonic identity token id, assigned at creation (always > 0)
    pub token_id: u64, // 8 bytes
    /// Current tier membership (0 = inactive, no tier)
    pub tier_id: u16, // 2 bytes
    /// Absolute expiry of access time
    pub expires_at: i64, // 8 bytes
    /// Absolute expiry of paid time; 0 until the first paid purchase
    pub purchase_expires: i64, // 8 bytes
    /// Outstanding granted (unpaid, revocable) seconds
    pub granted_secs: u64, // 8 bytes
    /// Slash deadline recorded when the subscription is deactivated from a
    /// slashable tier (0 = not slashable while inactive)
    pub slashable_after: i64, // 8 bytes
    /// PDA bump seed
    pub bump: u8, // 1 byte
}

impl Subscription {
    pub const SPACE: usize = 8 + Self::INIT_SPACE;

    /// True when the subscription has tier membership and unexpired time
    #[must_use]
    pub fn is_active(&self, now: i64) -> bool {
        self.tier_id != TIER_ID_NONE && self.expires_at >= now
    }

    /// True when the account has never completed a paid purchase
    #[must_use]
    pub fn first_purchase(&self) -> bool {
        self.purchase_expires == 0
    }

    /// `max(0, expires_at - now)`
    #[must_use]
    pub fn remaining_seconds(&self, now: i64) -> u64 {
        self.expires_at
            .checked_sub(now)
            .and_then(|d| u64::try_from(d).ok())
            .unwrap_or(0)
    }

    /// Extends expiry from `max(now, expires_at)` by `seconds`.
    ///
    /// Paid purchases advance `purchase_expires` identically; grants leave it
    /// untouched and instead accumulate `granted_secs`.
    pub fn extend(&mut self, now: i64, seconds: u64, paid: bool) -> Result<()> {
        let delta = i64::try_from(seconds).map_err(|_| TimepassError::ArithmeticError)?;
        let base = self.expires_at.max(now);
        self.expires_at = base
            .checked_add(delta)
            .ok_or(TimepassError::ArithmeticError)?;
        if paid {
            let purchase_base = self.purchase_expires.max(now);
            self.purchase_expires = purchase_base
                .checked_add(delta)
                .ok_or(TimepassError::ArithmeticError)?;
        } else {
            self.granted_secs = self
                .granted_secs
                .checked_add(seconds)
                .ok_or(TimepassError::ArithmeticError)?;
        }
        Ok(())
    }

    /// Removes previously granted seconds from the expiry, floored at `now`.
    ///
    /// Paid time is never revoked. Returns the seconds actually removed,
    /// which can be less than `granted_secs` when the floor applies.
    pub fn revoke_granted(&mut self, now: i64) -> Result<u64> {
        let granted = i64::try_from(self.granted_secs).map_err(|_| TimepassError::ArithmeticError)?;
        let target = self
            .expires_at
            .checked_sub(granted)
            .ok_or(TimepassError::ArithmeticError)?
            .max(now)
            .min(self.expires_at);
        let removed = self.expires_at.checked_sub(target).unwrap_or(0).max(0);
        self.expires_at = target;
        self.granted_secs = 0;
        u64::try_from(removed).map_err(|_| TimepassError::ArithmeticError.into())
    }

    /// True when a deactivated subscription is past the slash deadline
    /// recorded at deactivation
    #[must_use]
    pub fn inactive_slashable_at(&self, now: i64) -> bool {
        self.tier_id == TIER_ID_NONE && self.slashable_after != 0 && now > self.slashable_after
    }

    /// Zeroes all remaining time (refund path)
    pub fn clear_time(&mut self, now: i64) {
        self.expires_at = self.expires_at.min(now);
        self.purchase_expires = self.purchase_expires.min(now);
        self.granted_secs = 0;
    }
}

/// Per-account reward pool holder record
/// PDA seeds: ["holder", account]
#[account]
#[derive(InitSpace)]
pub struct Holder {
    /// The holder
    pub account: Pubkey, // 32 bytes
    /// Point-shares held
    pub num_shares: u64, // 8 bytes
    /// Signed correction applied to the points-per-share product, fixed at issuance
    pub points_correction: i128, // 16 bytes
    /// Value already withdrawn through claims
    pub withdrawn: u64, // 8 bytes
    /// PDA bump seed
    pub bump: u8, // 1 byte
}

impl Holder {
    pub const SPACE: usize = 8 + Self::INIT_SPACE;

    /// Moves the entire position into `to`, which must hold nothing, and
    /// zeroes this record. Merging two positions is not supported.
    pub fn move_position_into(&mut self, to: &mut Self) -> Result<()> {
        require!(
            to.num_shares == 0 && to.withdrawn == 0 && to.points_correction == 0,
            TimepassError::AlreadySubscribed
        );
        to.num_shares = self.num_shares;
        to.points_correction = self.points_correction;
        to.withdrawn = self.withdrawn;
        self.num_shares = 0;
        self.points_correction = 0;
        self.withdrawn = 0;
        Ok(())
    }
}

/// Immutable time-decay reward curve
/// PDA seeds: ["curve", [id]]
#[account]
#[derive(InitSpace)]
pub struct RewardCurve {
    /// Sequential curve id, 0-based, append-only
    pub id: u8, // 1 byte
    /// Multiplier at activation
    pub start_multiplier: u64, // 8 bytes
    /// Multiplier floor after the decay window has elapsed
    pub min_multiplier: u64, // 8 bytes
    /// Length of the decay window in seconds
    pub decay_secs: u64, // 8 bytes
    /// Curve activation timestamp (creation time)
    pub activated_at: i64, // 8 bytes
    /// PDA bump seed
    pub bump: u8, // 1 byte
}

/// Reward curve creation parameters
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Debug)]
pub struct CurveParams {
    pub start_multiplier: u64,
    pub min_multiplier: u64,
    pub decay_secs: u64,
}

impl CurveParams {
    pub fn validate(&self) -> Result<()> {
        require!(self.start_multiplier > 0, TimepassError::InvalidCurveParams);
        require!(
            self.start_multiplier >= self.min_multiplier,
            TimepassError::InvalidCurveParams
        );
        require!(self.decay_secs > 0, TimepassError::InvalidCurveParams);
        Ok(())
    }
}

impl RewardCurve {
    pub const SPACE: usize = 8 + Self::INIT_SPACE;

    /// Multiplier at `now`: linear decay from `start_multiplier` to
    /// `min_multiplier` over `decay_secs`, integer round-down, monotone
    /// non-increasing in `now`.
    #[must_use]
    pub fn multiplier_at(&self, now: i64) -> u64 {
        let elapsed = now
            .checked_sub(self.activated_at)
            .and_then(|d| u64::try_from(d).ok())
            .unwrap_or(0);
        if elapsed >= self.decay_secs {
            return self.min_multiplier;
        }
        let range = self.start_multiplier.saturating_sub(self.min_multiplier);
        let remaining = self.decay_secs.saturating_sub(elapsed);
        let scaled = u128::from(range)
            .checked_mul(u128::from(remaining))
            .and_then(|v| v.checked_div(u128::from(self.decay_secs)))
            .unwrap_or(0);
        // range * remaining / decay_secs <= range, so the cast cannot truncate
        self.min_multiplier
            .saturating_add(u64::try_from(scaled).unwrap_or(u64::MAX))
    }
}

/// Referral code account
/// PDA seeds: ["referral", `code.to_le_bytes()`]
#[account]
#[derive(InitSpace)]
pub struct ReferralCode {
    /// The code value
    pub code: u64, // 8 bytes
    /// Referrer share in basis points, carved from the client fee
    pub bps: u16, // 2 bytes
    /// Once true, the code can never be changed again
    pub permanent: bool, // 1 byte
    /// Restricts payouts to one referrer (`Pubkey::default()` = anyone)
    pub restricted_to: Pubkey, // 32 bytes
    /// PDA bump seed
    pub bump: u8, // 1 byte
}

impl ReferralCode {
    pub const SPACE: usize = 8 + Self::INIT_SPACE;

    /// Effective bps for a given referrer, or `None` when the code does not
    /// apply (restricted to someone else)
    #[must_use]
    pub fn bps_for(&self, referrer: &Pubkey) -> Option<u16> {
        if self.restricted_to != Pubkey::default() && self.restricted_to != *referrer {
            return None;
        }
        Some(self.bps)
    }
}

/// Shared reward pool state
/// PDA seeds: ["pool"]
#[account]
#[derive(InitSpace)]
pub struct Pool {
    /// Sum of all holders' shares
    pub total_shares: u64, // 8 bytes
    /// Points-per-share accumulator, scaled by `SHARE_PRECISION`
    pub points_per_share: u128, // 16 bytes
    /// Lifetime value allocated to the pool
    pub total_allocated: u64, // 8 bytes
    /// Pool-owned funds currently in the vault (ingress minus egress)
    pub balance: u64, // 8 bytes
    /// PDA bump seed
    pub bump: u8, // 1 byte
}

impl Pool {
    pub const SPACE: usize = 8 + Self::INIT_SPACE;
}

/// Computes `amount * bps / 10_000`, rounding down
pub fn bps_share(amount: u64, bps: u16) -> Result<u64> {
    let share = u128::from(amount)
        .checked_mul(u128::from(bps))
        .and_then(|v| v.checked_div(BPS_DENOMINATOR))
        .ok_or(TimepassError::ArithmeticError)?;
    // bps <= 10_000 keeps the result within u64
    u64::try_from(share).map_err(|_| TimepassError::ArithmeticError.into())
}

#[cfg(test)]
#[allow(clippy::arithmetic_side_effects)]
mod tests {
    use super::*;

    const DAY: u64 = 86_400;

    fn tier(price: u64, period: u64, mint_price: u64) -> Tier {
        Tier {
            id: 1,
            period_secs: period,
            price_per_period: price,
            initial_mint_price: mint_price,
            supply_cap: 0,
            current_supply: 0,
            paused: false,
            transferable: true,
            reward_bps: 0,
            reward_curve_id: 0,
            reward_slashable: false,
            slash_grace_secs: 0,
            bump: 255,
        }
    }

    #[test]
    fn one_period_price_buys_one_period() {
        // Scenario A: 0.001 unit / 30 days, fresh account pays exactly the price
        let t = tier(1_000, 30 * DAY, 0);
        let secs = t.tokens_to_seconds(1_000, true).unwrap();
        assert_eq!(secs, 30 * DAY);
    }

    #[test]
    fn below_one_period_fails() {
        // Scenario B: half the period price is rejected outright
        let t = tier(1_000, 30 * DAY, 0);
        let err = t.tokens_to_seconds(500, true).unwrap_err();
        assert_eq!(err, TimepassError::InsufficientBalance.into());
    }

    #[test]
    fn initial_mint_price_only_charged_once() {
        let t = tier(1_000, 30 * DAY, 250);
        // First purchase: surcharge comes off the top
        let secs = t.tokens_to_seconds(1_250, true).unwrap();
        assert_eq!(secs, 30 * DAY);
        // Renewal: full amount converts to time
        let secs = t.tokens_to_seconds(1_250, false).unwrap();
        assert_eq!(secs, 1_250 * 30 * DAY / 1_000);
    }

    #[test]
    fn surcharge_larger_than_payment_fails() {
        let t = tier(1_000, 30 * DAY, 2_000);
        let err = t.tokens_to_seconds(1_500, true).unwrap_err();
        assert_eq!(err, TimepassError::InsufficientBalance.into());
    }

    #[test]
    fn partial_periods_round_down() {
        let t = tier(1_000, 100, 0);
        assert_eq!(t.tokens_to_seconds(1_999, false).unwrap(), 199);
    }

    #[test]
    fn supply_cap_blocks_join_when_full() {
        let mut t = tier(1_000, DAY, 0);
        t.supply_cap = 2;
        t.join().unwrap();
        t.join().unwrap();
        let err = t.join().unwrap_err();
        assert_eq!(err, TimepassError::CapacityExceeded.into());
        assert_eq!(t.current_supply, 2);
        t.leave();
        t.join().unwrap();
    }

    #[test]
    fn zero_cap_is_uncapped() {
        let mut t = tier(1_000, DAY, 0);
        for _ in 0..100 {
            t.join().unwrap();
        }
        assert_eq!(t.current_supply, 100);
    }

    fn fresh_sub() -> Subscription {
        Subscription {
            account: Pubkey::new_unique(),
            token_id: 1,
            tier_id: 1,
            expires_at: 0,
            purchase_expires: 0,
            granted_secs: 0,
            slashable_after: 0,
            bump: 255,
        }
    }

    #[test]
    fn extend_from_now_when_expired() {
        let mut s = fresh_sub();
        s.extend(1_000, 600, true).unwrap();
        assert_eq!(s.expires_at, 1_600);
        assert_eq!(s.purchase_expires, 1_600);
        assert!(!s.first_purchase());
        assert_eq!(s.remaining_seconds(1_000), 600);
    }

    #[test]
    fn extend_stacks_on_active_time() {
        let mut s = fresh_sub();
        s.extend(1_000, 600, true).unwrap();
        s.extend(1_100, 600, true).unwrap();
        assert_eq!(s.expires_at, 2_200);
    }

    #[test]
    fn grants_accumulate_and_revoke_floors_at_now() {
        let mut s = fresh_sub();
        s.extend(1_000, 100, true).unwrap();
        s.extend(1_000, 1_000, false).unwrap();
        assert_eq!(s.granted_secs, 1_000);
        assert_eq!(s.expires_at, 2_100);
        // At t=1500 only 600 of the granted 1000 remain above the floor
        let removed = s.revoke_granted(1_500).unwrap();
        assert_eq!(removed, 600);
        assert_eq!(s.expires_at, 1_500);
        assert_eq!(s.granted_secs, 0);
    }

    #[test]
    fn revoke_after_expiry_removes_nothing() {
        let mut s = fresh_sub();
        s.extend(1_000, 600, false).unwrap();
        let removed = s.revoke_granted(2_000).unwrap();
        assert_eq!(removed, 0);
        // Expiry never moves forward
        assert_eq!(s.expires_at, 1_600);
        assert_eq!(s.granted_secs, 0);
    }

    #[test]
    fn revoke_never_touches_paid_time() {
        let mut s = fresh_sub();
        s.extend(1_000, 1_000, true).unwrap();
        s.extend(1_000, 500, false).unwrap();
        let removed = s.revoke_granted(1_000).unwrap();
        assert_eq!(removed, 500);
        assert_eq!(s.expires_at, 2_000);
    }

    #[test]
    fn active_requires_tier_and_time() {
        let mut s = fresh_sub();
        s.extend(1_000, 600, true).unwrap();
        assert!(s.is_active(1_600));
        assert!(!s.is_active(1_601));
        s.tier_id = TIER_ID_NONE;
        assert!(!s.is_active(1_000));
    }

    #[test]
    fn clear_time_zeroes_everything() {
        let mut s = fresh_sub();
        s.extend(1_000, 600, true).unwrap();
        s.extend(1_000, 300, false).unwrap();
        s.clear_time(1_200);
        assert_eq!(s.remaining_seconds(1_200), 0);
        assert_eq!(s.granted_secs, 0);
        // Purchase history is preserved (no second initial-mint surcharge)
        assert!(!s.first_purchase());
    }

    #[test]
    fn slash_window_opens_strictly_after_grace() {
        // 7-day grace: 6 days past expiry is too early, 8 days is enough
        let mut t = tier(1_000, DAY, 0);
        t.reward_slashable = true;
        t.slash_grace_secs = 7 * DAY;
        let day = 86_400_i64;
        let expires = 1_000_000;
        assert!(!t.slashable_at(expires, expires + 6 * day).unwrap());
        assert!(!t.slashable_at(expires, expires + 7 * day).unwrap());
        assert!(t.slashable_at(expires, expires + 7 * day + 1).unwrap());
        assert!(t.slashable_at(expires, expires + 8 * day).unwrap());
    }

    #[test]
    fn non_slashable_tier_has_no_deadline() {
        let t = tier(1_000, DAY, 0);
        assert_eq!(t.slash_deadline(1_000).unwrap(), None);
        assert!(!t.slashable_at(1_000, i64::MAX).unwrap());
    }

    #[test]
    fn deactivation_preserves_the_slash_deadline() {
        let mut t = tier(1_000, DAY, 0);
        t.reward_slashable = true;
        t.slash_grace_secs = 100;
        let mut s = fresh_sub();
        s.extend(1_000, 600, true).unwrap();
        // Deactivating records the deadline so lapsing out of the tier is not
        // an escape from slashing
        s.slashable_after = t.slash_deadline(s.expires_at).unwrap().unwrap_or(0);
        s.tier_id = TIER_ID_NONE;
        assert_eq!(s.slashable_after, 1_700);
        assert!(!s.inactive_slashable_at(1_700));
        assert!(s.inactive_slashable_at(1_701));
    }

    #[test]
    fn inactive_without_recorded_deadline_is_never_slashable() {
        let mut s = fresh_sub();
        s.tier_id = TIER_ID_NONE;
        assert!(!s.inactive_slashable_at(i64::MAX));
        // An active subscription never uses the recorded deadline
        s.tier_id = 1;
        s.slashable_after = 1;
        assert!(!s.inactive_slashable_at(i64::MAX));
    }

    #[test]
    fn holder_move_carries_the_full_position() {
        let mut from = Holder {
            account: Pubkey::new_unique(),
            num_shares: 10,
            points_correction: -5,
            withdrawn: 3,
            bump: 255,
        };
        let mut to = Holder {
            account: Pubkey::new_unique(),
            num_shares: 0,
            points_correction: 0,
            withdrawn: 0,
            bump: 254,
        };
        from.move_position_into(&mut to).unwrap();
        assert_eq!(to.num_shares, 10);
        assert_eq!(to.points_correction, -5);
        assert_eq!(to.withdrawn, 3);
        assert_eq!(from.num_shares, 0);
        assert_eq!(from.points_correction, 0);
        assert_eq!(from.withdrawn, 0);
    }

    #[test]
    fn holder_move_rejects_occupied_destination() {
        let mut from = Holder {
            account: Pubkey::new_unique(),
            num_shares: 10,
            points_correction: 0,
            withdrawn: 0,
            bump: 255,
        };
        let mut to = Holder {
            account: Pubkey::new_unique(),
            num_shares: 1,
            points_correction: 0,
            withdrawn: 0,
            bump: 254,
        };
        let err = from.move_position_into(&mut to).unwrap_err();
        assert_eq!(err, TimepassError::AlreadySubscribed.into());
        // Source position untouched on failure
        assert_eq!(from.num_shares, 10);
        assert_eq!(to.num_shares, 1);
    }

    fn curve(start: u64, min: u64, window: u64) -> RewardCurve {
        RewardCurve {
            id: 0,
            start_multiplier: start,
            min_multiplier: min,
            decay_secs: window,
            activated_at: 1_000,
            bump: 255,
        }
    }

    #[test]
    fn curve_decays_monotonically() {
        let c = curve(64, 1, 1_000);
        let mut last = c.multiplier_at(1_000);
        assert_eq!(last, 64);
        for t in (1_000..=2_200).step_by(50) {
            let m = c.multiplier_at(t);
            assert!(m <= last, "multiplier increased at t={t}");
            last = m;
        }
        assert_eq!(c.multiplier_at(2_000), 1);
        assert_eq!(c.multiplier_at(10_000), 1);
    }

    #[test]
    fn curve_floor_can_be_zero() {
        let c = curve(8, 0, 100);
        assert_eq!(c.multiplier_at(1_100), 0);
        assert_eq!(c.multiplier_at(1_050), 4);
    }

    #[test]
    fn curve_clamps_before_activation() {
        let c = curve(64, 1, 1_000);
        assert_eq!(c.multiplier_at(500), 64);
    }

    #[test]
    fn curve_params_validation() {
        assert!(CurveParams {
            start_multiplier: 0,
            min_multiplier: 0,
            decay_secs: 10,
        }
        .validate()
        .is_err());
        assert!(CurveParams {
            start_multiplier: 2,
            min_multiplier: 5,
            decay_secs: 10,
        }
        .validate()
        .is_err());
        assert!(CurveParams {
            start_multiplier: 5,
            min_multiplier: 1,
            decay_secs: 0,
        }
        .validate()
        .is_err());
        assert!(CurveParams {
            start_multiplier: 5,
            min_multiplier: 1,
            decay_secs: 10,
        }
        .validate()
        .is_ok());
    }

    #[test]
    fn fee_params_ceiling() {
        let a = Pubkey::new_unique();
        let b = Pubkey::new_unique();
        assert!(Config::validate_fee_params(&a, 500, &b, 500, 200).is_ok());
        assert!(Config::validate_fee_params(&a, 1_000, &b, 251, 0).is_err());
        assert!(Config::validate_fee_params(&a, 1_250, &Pubkey::default(), 0, 0).is_ok());
    }

    #[test]
    fn fee_params_zero_recipient_rule() {
        let a = Pubkey::new_unique();
        // Zero recipient with non-zero bps, and vice versa, both rejected
        assert!(Config::validate_fee_params(&Pubkey::default(), 100, &a, 100, 0).is_err());
        assert!(Config::validate_fee_params(&a, 0, &a, 100, 0).is_err());
        // Referral ceiling may not exceed the client share
        assert!(Config::validate_fee_params(&a, 100, &a, 100, 200).is_err());
    }

    #[test]
    fn global_cap_enforced_on_mint() {
        let mut c = Config {
            authority: Pubkey::new_unique(),
            currency_mint: Pubkey::default(),
            protocol_recipient: Pubkey::default(),
            protocol_bps: 0,
            client_recipient: Pubkey::default(),
            client_bps: 0,
            client_referral_bps: 0,
            global_supply_cap: 1,
            num_subscriptions: 0,
            token_id_counter: 0,
            num_tiers: 1,
            num_curves: 1,
            vault_bump: 255,
            bump: 255,
        };
        assert_eq!(c.record_mint().unwrap(), 1);
        let err = c.record_mint().unwrap_err();
        assert_eq!(err, TimepassError::CapacityExceeded.into());
        c.global_supply_cap = 0;
        assert_eq!(c.record_mint().unwrap(), 2);
    }

    #[test]
    fn referral_restriction() {
        let referrer = Pubkey::new_unique();
        let other = Pubkey::new_unique();
        let code = ReferralCode {
            code: 7,
            bps: 200,
            permanent: false,
            restricted_to: referrer,
            bump: 255,
        };
        assert_eq!(code.bps_for(&referrer), Some(200));
        assert_eq!(code.bps_for(&other), None);
        let open = ReferralCode {
            restricted_to: Pubkey::default(),
            ..code
        };
        assert_eq!(open.bps_for(&other), Some(200));
    }

    #[test]
    fn bps_share_rounds_down() {
        assert_eq!(bps_share(1_000, 500).unwrap(), 50);
        assert_eq!(bps_share(999, 500).unwrap(), 49);
        assert_eq!(bps_share(u64::MAX, 10_000).unwrap(), u64::MAX);
    }
}
