//! Reward pool share accounting
//!
//! The pool pays yield proportionally to share holders using a points-per-share
//! accumulator scaled by [`SHARE_PRECISION`]. Each holder carries a signed
//! correction fixed at issuance time, so shares issued after an allocation
//! never claim value from it. All division rounds down; dust stays in the
//! pool. This keeps two invariants exact under any interleaving of
//! issue/allocate/claim/burn:
//!
//! - `sum(holder.num_shares) == pool.total_shares`
//! - `pool.balance` only grows via `allocate` and only shrinks by amounts
//!   actually paid out

use anchor_lang::prelude::*;

use crate::constants::SHARE_PRECISION;
use crate::errors::TimepassError;
use crate::state::{Holder, Pool, RewardCurve};

/// Converts a reward amount into shares using the curve's multiplier at `now`
/// and credits them to `holder`. A zero-share result (decayed curve floor or
/// tiny amount) is a no-op. Returns the shares issued.
pub fn issue_with_curve(
    pool: &mut Pool,
    holder: &mut Holder,
    amount: u64,
    curve: &RewardCurve,
    now: i64,
) -> Result<u64> {
    let multiplier = curve.multiplier_at(now);
    let shares_wide = u128::from(amount)
        .checked_mul(u128::from(multiplier))
        .ok_or(TimepassError::ArithmeticError)?;
    let shares = u64::try_from(shares_wide).map_err(|_| TimepassError::ArithmeticError)?;
    if shares == 0 {
        return Ok(0);
    }
    issue(pool, holder, shares)?;
    Ok(shares)
}

/// Credits `shares` to `holder`, offsetting the accumulator so that only
/// future allocations count toward this issuance.
pub fn issue(pool: &mut Pool, holder: &mut Holder, shares: u64) -> Result<()> {
    let offset = pool
        .points_per_share
        .checked_mul(u128::from(shares))
        .ok_or(TimepassError::ArithmeticError)?;
    let offset = i128::try_from(offset).map_err(|_| TimepassError::ArithmeticError)?;
    holder.points_correction = holder
        .points_correction
        .checked_sub(offset)
        .ok_or(TimepassError::ArithmeticError)?;
    holder.num_shares = holder
        .num_shares
        .checked_add(shares)
        .ok_or(TimepassError::ArithmeticError)?;
    pool.total_shares = pool
        .total_shares
        .checked_add(shares)
        .ok_or(TimepassError::ArithmeticError)?;
    Ok(())
}

/// Adds `amount` to the pool without changing share counts: the sole
/// mechanism that raises value-per-share for all current holders.
pub fn allocate(pool: &mut Pool, amount: u64) -> Result<()> {
    require!(pool.total_shares > 0, TimepassError::NoSharesOutstanding);
    let delta = u128::from(amount)
        .checked_mul(SHARE_PRECISION)
        .and_then(|v| v.checked_div(u128::from(pool.total_shares)))
        .ok_or(TimepassError::ArithmeticError)?;
    pool.points_per_share = pool
        .points_per_share
        .checked_add(delta)
        .ok_or(TimepassError::ArithmeticError)?;
    pool.total_allocated = pool
        .total_allocated
        .checked_add(amount)
        .ok_or(TimepassError::ArithmeticError)?;
    pool.balance = pool
        .balance
        .checked_add(amount)
        .ok_or(TimepassError::ArithmeticError)?;
    Ok(())
}

/// Lifetime value the holder's shares have earned, before withdrawals
fn cumulative_entitlement(pool: &Pool, holder: &Holder) -> Result<u64> {
    let product = pool
        .points_per_share
        .checked_mul(u128::from(holder.num_shares))
        .ok_or(TimepassError::ArithmeticError)?;
    let product = i128::try_from(product).map_err(|_| TimepassError::ArithmeticError)?;
    let corrected = product
        .checked_add(holder.points_correction)
        .ok_or(TimepassError::ArithmeticError)?;
    // Corrections are fixed at issuance, so the corrected sum is never negative
    let corrected = u128::try_from(corrected.max(0)).map_err(|_| TimepassError::ArithmeticError)?;
    let value = corrected
        .checked_div(SHARE_PRECISION)
        .ok_or(TimepassError::ArithmeticError)?;
    u64::try_from(value).map_err(|_| TimepassError::ArithmeticError.into())
}

/// Unclaimed entitlement: cumulative earnings minus prior withdrawals
pub fn claimable(pool: &Pool, holder: &Holder) -> Result<u64> {
    let cumulative = cumulative_entitlement(pool, holder)?;
    Ok(cumulative.saturating_sub(holder.withdrawn))
}

/// Marks `amount` as withdrawn and deducts it from the pool balance.
/// Call after computing `claimable` and before the funds leave the vault.
pub fn record_claim(pool: &mut Pool, holder: &mut Holder, amount: u64) -> Result<()> {
    holder.withdrawn = holder
        .withdrawn
        .checked_add(amount)
        .ok_or(TimepassError::ArithmeticError)?;
    pool.balance = pool
        .balance
        .checked_sub(amount)
        .ok_or(TimepassError::ArithmeticError)?;
    Ok(())
}

/// Removes all of the holder's shares and zeroes the record, returning the
/// unclaimed entitlement crystallized by the burn. The caller decides whether
/// the payout succeeds; the share removal stands either way.
pub fn burn(pool: &mut Pool, holder: &mut Holder) -> Result<(u64, u64)> {
    let entitlement = claimable(pool, holder)?;
    let shares = holder.num_shares;
    pool.total_shares = pool
        .total_shares
        .checked_sub(shares)
        .ok_or(TimepassError::ArithmeticError)?;
    holder.num_shares = 0;
    holder.points_correction = 0;
    holder.withdrawn = 0;
    Ok((shares, entitlement))
}

#[cfg(test)]
#[allow(clippy::arithmetic_side_effects)]
mod tests {
    use super::*;

    fn pool() -> Pool {
        Pool {
            total_shares: 0,
            points_per_share: 0,
            total_allocated: 0,
            balance: 0,
            bump: 255,
        }
    }

    fn holder() -> Holder {
        Holder {
            account: Pubkey::new_unique(),
            num_shares: 0,
            points_correction: 0,
            withdrawn: 0,
            bump: 255,
        }
    }

    fn curve_flat(multiplier: u64) -> RewardCurve {
        RewardCurve {
            id: 0,
            start_multiplier: multiplier,
            min_multiplier: multiplier,
            decay_secs: 1,
            activated_at: 0,
            bump: 255,
        }
    }

    #[test]
    fn proportional_split_between_two_holders() {
        let mut p = pool();
        let mut a = holder();
        let mut b = holder();
        issue(&mut p, &mut a, 300).unwrap();
        issue(&mut p, &mut b, 100).unwrap();
        allocate(&mut p, 1_000).unwrap();
        assert_eq!(claimable(&p, &a).unwrap(), 750);
        assert_eq!(claimable(&p, &b).unwrap(), 250);
    }

    #[test]
    fn late_issuance_earns_nothing_from_past_allocations() {
        let mut p = pool();
        let mut early = holder();
        let mut late = holder();
        issue(&mut p, &mut early, 100).unwrap();
        allocate(&mut p, 500).unwrap();
        issue(&mut p, &mut late, 100).unwrap();
        assert_eq!(claimable(&p, &early).unwrap(), 500);
        assert_eq!(claimable(&p, &late).unwrap(), 0);
        // Both participate in the next allocation equally
        allocate(&mut p, 400).unwrap();
        assert_eq!(claimable(&p, &early).unwrap(), 700);
        assert_eq!(claimable(&p, &late).unwrap(), 200);
    }

    #[test]
    fn no_double_claim() {
        let mut p = pool();
        let mut a = holder();
        issue(&mut p, &mut a, 10).unwrap();
        allocate(&mut p, 999).unwrap();
        let first = claimable(&p, &a).unwrap();
        assert!(first > 0);
        record_claim(&mut p, &mut a, first).unwrap();
        assert_eq!(claimable(&p, &a).unwrap(), 0);
    }

    #[test]
    fn share_conservation_under_issue_and_burn() {
        let mut p = pool();
        let mut holders: Vec<Holder> = (0..5).map(|_| holder()).collect();
        for (i, h) in holders.iter_mut().enumerate() {
            issue(&mut p, h, (i as u64 + 1) * 10).unwrap();
        }
        assert_eq!(
            p.total_shares,
            holders.iter().map(|h| h.num_shares).sum::<u64>()
        );
        allocate(&mut p, 12_345).unwrap();
        let (shares, _) = burn(&mut p, &mut holders[2]).unwrap();
        assert_eq!(shares, 30);
        assert_eq!(
            p.total_shares,
            holders.iter().map(|h| h.num_shares).sum::<u64>()
        );
    }

    #[test]
    fn burn_crystallizes_full_entitlement_and_leaves_others_whole() {
        let mut p = pool();
        let mut a = holder();
        let mut b = holder();
        issue(&mut p, &mut a, 100).unwrap();
        issue(&mut p, &mut b, 100).unwrap();
        allocate(&mut p, 1_000).unwrap();
        let b_before = claimable(&p, &b).unwrap();
        let (shares, entitlement) = burn(&mut p, &mut a).unwrap();
        assert_eq!(shares, 100);
        assert_eq!(entitlement, 500);
        // Remaining holders' entitlements are unchanged by the burn
        assert_eq!(claimable(&p, &b).unwrap(), b_before);
        record_claim(&mut p, &mut a, entitlement).unwrap();
        assert_eq!(p.balance, 500);
    }

    #[test]
    fn burn_after_partial_claim_pays_only_the_rest() {
        let mut p = pool();
        let mut a = holder();
        issue(&mut p, &mut a, 10).unwrap();
        allocate(&mut p, 1_000).unwrap();
        record_claim(&mut p, &mut a, 400).unwrap();
        let (_, entitlement) = burn(&mut p, &mut a).unwrap();
        assert_eq!(entitlement, 600);
    }

    #[test]
    fn moved_position_keeps_its_claimable_value() {
        let mut p = pool();
        let mut a = holder();
        let mut b = holder();
        issue(&mut p, &mut a, 100).unwrap();
        allocate(&mut p, 1_000).unwrap();
        let before = claimable(&p, &a).unwrap();
        assert!(before > 0);
        a.move_position_into(&mut b).unwrap();
        // The entitlement travels with the position; nothing stays behind
        assert_eq!(claimable(&p, &b).unwrap(), before);
        assert_eq!(claimable(&p, &a).unwrap(), 0);
        assert_eq!(p.total_shares, b.num_shares);
    }

    #[test]
    fn allocate_requires_shares() {
        let mut p = pool();
        let err = allocate(&mut p, 100).unwrap_err();
        assert_eq!(err, TimepassError::NoSharesOutstanding.into());
    }

    #[test]
    fn rounding_dust_stays_in_pool() {
        let mut p = pool();
        let mut a = holder();
        let mut b = holder();
        let mut c = holder();
        issue(&mut p, &mut a, 1).unwrap();
        issue(&mut p, &mut b, 1).unwrap();
        issue(&mut p, &mut c, 1).unwrap();
        allocate(&mut p, 100).unwrap();
        let total: u64 = [&a, &b, &c]
            .iter()
            .map(|h| claimable(&p, h).unwrap())
            .sum();
        // 100 does not divide by 3; the remainder is pool dust, never minted value
        assert!(total <= 100);
        assert_eq!(total, 99);
    }

    #[test]
    fn conservation_across_interleaved_operations() {
        // pool.balance always equals allocations minus successful payouts
        let mut p = pool();
        let mut a = holder();
        let mut b = holder();
        issue(&mut p, &mut a, 7).unwrap();
        allocate(&mut p, 1_003).unwrap();
        issue(&mut p, &mut b, 13).unwrap();
        allocate(&mut p, 997).unwrap();
        let ca = claimable(&p, &a).unwrap();
        record_claim(&mut p, &mut a, ca).unwrap();
        let (_, eb) = burn(&mut p, &mut b).unwrap();
        record_claim(&mut p, &mut b, eb).unwrap();
        assert_eq!(p.total_allocated, 2_000);
        assert_eq!(p.balance, 2_000 - ca - eb);
        // Whatever remains is claimable by the last holder plus dust
        let rest = claimable(&p, &a).unwrap();
        assert!(rest <= p.balance);
    }

    #[test]
    fn issue_with_curve_applies_multiplier() {
        let mut p = pool();
        let mut a = holder();
        let c = curve_flat(6);
        let shares = issue_with_curve(&mut p, &mut a, 100, &c, 0).unwrap();
        assert_eq!(shares, 600);
        assert_eq!(p.total_shares, 600);
    }

    #[test]
    fn issue_with_decayed_zero_curve_is_noop() {
        let mut p = pool();
        let mut a = holder();
        let c = RewardCurve {
            id: 0,
            start_multiplier: 10,
            min_multiplier: 0,
            decay_secs: 100,
            activated_at: 0,
            bump: 255,
        };
        let shares = issue_with_curve(&mut p, &mut a, 1_000, &c, 1_000).unwrap();
        assert_eq!(shares, 0);
        assert_eq!(p.total_shares, 0);
        assert_eq!(a.num_shares, 0);
    }

    #[test]
    fn earlier_issuance_never_yields_fewer_shares() {
        let mut p = pool();
        let c = RewardCurve {
            id: 0,
            start_multiplier: 64,
            min_multiplier: 1,
            decay_secs: 10_000,
            activated_at: 0,
            bump: 255,
        };
        let mut last = u64::MAX;
        for t in (0..20_000).step_by(500) {
            let mut h = holder();
            let shares = issue_with_curve(&mut p, &mut h, 1_000, &c, t).unwrap();
            assert!(shares <= last, "shares per unit increased at t={t}");
            last = shares;
        }
    }
}
