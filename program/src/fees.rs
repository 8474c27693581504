//! Purchase-time fee splitting
//!
//! Split order: protocol fee first, then the client fee, then the referral
//! carve-out from the client fee. The referral share is computed over the
//! post-protocol-fee amount and deducted from the client leg for that
//! transaction only. Whatever remains after all legs stays in the vault for
//! the creator and reward pool.

use anchor_lang::prelude::*;

use crate::errors::TimepassError;
use crate::state::bps_share;

/// Outcome of splitting one purchase amount
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FeeBreakdown {
    /// Paid to the protocol recipient
    pub protocol_fee: u64,
    /// Paid to the client recipient (already reduced by the referral leg)
    pub client_fee: u64,
    /// Paid to the referrer
    pub referral_fee: u64,
    /// Retained in the vault (creator + reward pool)
    pub net: u64,
}

/// Splits `gross` between the protocol, client, referrer and the vault.
///
/// `referral_bps` is the effective referral share for this transaction:
/// the resolved code's bps, the fallback client-referral bps, or 0 when no
/// referrer participates. Callers validate referral ceilings beforehand;
/// `referral_bps <= client_bps` is required for the carve-out to be payable.
pub fn split(
    gross: u64,
    protocol_bps: u16,
    client_bps: u16,
    referral_bps: u16,
) -> Result<FeeBreakdown> {
    let protocol_fee = bps_share(gross, protocol_bps)?;
    let client_gross = bps_share(gross, client_bps)?;
    let after_protocol = gross
        .checked_sub(protocol_fee)
        .ok_or(TimepassError::ArithmeticError)?;
    let referral_fee = bps_share(after_protocol, referral_bps)?;
    let client_fee = client_gross
        .checked_sub(referral_fee)
        .ok_or(TimepassError::InvalidFeeParams)?;
    let net = gross
        .checked_sub(protocol_fee)
        .and_then(|v| v.checked_sub(client_gross))
        .ok_or(TimepassError::ArithmeticError)?;
    Ok(FeeBreakdown {
        protocol_fee,
        client_fee,
        referral_fee,
        net,
    })
}

#[cfg(test)]
#[allow(clippy::arithmetic_side_effects)]
mod tests {
    use super::*;

    #[test]
    fn protocol_and_client_split_on_gross() {
        // Scenario C: 500/500 bps on 1000 units -> 50 + 50, net 900
        let f = split(1_000, 500, 500, 0).unwrap();
        assert_eq!(f.protocol_fee, 50);
        assert_eq!(f.client_fee, 50);
        assert_eq!(f.referral_fee, 0);
        assert_eq!(f.net, 900);
    }

    #[test]
    fn referral_carved_from_client_on_post_protocol_amount() {
        // Scenario D: 200 bps referral over the post-protocol amount,
        // deducted from the client's leg
        let f = split(10_000, 500, 500, 200).unwrap();
        assert_eq!(f.protocol_fee, 500);
        assert_eq!(f.referral_fee, (10_000 - 500) * 200 / 10_000); // 190
        assert_eq!(f.client_fee, 500 - 190);
        assert_eq!(f.net, 9_000);
        // The carve-out does not change the vault's take
        let no_ref = split(10_000, 500, 500, 0).unwrap();
        assert_eq!(f.net, no_ref.net);
    }

    #[test]
    fn legs_always_sum_to_gross() {
        for gross in [0u64, 1, 999, 1_000, 123_457, u64::from(u32::MAX)] {
            for (p, c, r) in [(0, 0, 0), (500, 750, 0), (1_250, 0, 0), (250, 1_000, 1_000)] {
                let f = split(gross, p, c, r).unwrap();
                assert_eq!(
                    f.protocol_fee + f.client_fee + f.referral_fee + f.net,
                    gross,
                    "gross={gross} p={p} c={c} r={r}"
                );
            }
        }
    }

    #[test]
    fn zero_fees_pass_everything_through() {
        let f = split(5_000, 0, 0, 0).unwrap();
        assert_eq!(f.net, 5_000);
    }

    #[test]
    fn oversized_referral_is_rejected() {
        // referral bps above the client share cannot be carved out
        let err = split(10_000, 0, 100, 5_000).unwrap_err();
        assert_eq!(err, TimepassError::InvalidFeeParams.into());
    }
}
