use crate::event::SettledEvent;
use crate::types::{amount, approx_f64, SignedAmount, U256};
use serde::{Deserialize, Serialize};

/// Advertised multiplier per outcome bin (12 rows -> 13 bins).
pub const DEFAULT_MULTIPLIERS: [f64; 13] = [
    2.0, 1.3, 1.1, 0.9, 0.8, 0.7, 0.6, 0.7, 0.8, 0.9, 1.1, 1.3, 2.0,
];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Paytable(pub Vec<f64>);

impl Default for Paytable {
    fn default() -> Self {
        Self(DEFAULT_MULTIPLIERS.to_vec())
    }
}

impl Paytable {
    pub fn bins(&self) -> usize {
        self.0.len()
    }

    pub fn multiplier(&self, bin: u8) -> Option<f64> {
        self.0.get(bin as usize).copied()
    }
}

/// What the player sees next to the rendered outcome. Informational only:
/// the contract has already paid out.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SettlementSummary {
    pub sequence_number: u64,
    pub outcome_index: u8,
    #[serde(with = "amount")]
    pub stake_wei: U256,
    #[serde(with = "amount")]
    pub fee_wei: U256,
    #[serde(with = "amount")]
    pub payout_wei: U256,
    /// `payout / stake`, zero when nothing was staked.
    pub multiplier: f64,
    pub advertised_multiplier: Option<f64>,
    pub pnl_game: SignedAmount,
    pub pnl_net: SignedAmount,
}

impl SettlementSummary {
    pub fn new(event: &SettledEvent, fee_wei: U256, paytable: &Paytable) -> Self {
        let multiplier = if event.stake_wei.is_zero() {
            0.0
        } else {
            approx_f64(event.payout_wei) / approx_f64(event.stake_wei)
        };
        let cost = event.stake_wei.saturating_add(fee_wei);

        Self {
            sequence_number: event.sequence_number,
            outcome_index: event.outcome_index,
            stake_wei: event.stake_wei,
            fee_wei,
            payout_wei: event.payout_wei,
            multiplier,
            advertised_multiplier: paytable.multiplier(event.outcome_index),
            pnl_game: SignedAmount::difference(event.payout_wei, event.stake_wei),
            pnl_net: SignedAmount::difference(event.payout_wei, cost),
        }
    }

    pub fn is_win(&self) -> bool {
        !self.payout_wei.is_zero()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settled(stake: u128, payout: u128, bin: u8) -> SettledEvent {
        SettledEvent {
            sequence_number: 1,
            player: "0x00000000000000000000000000000000000000aa".parse().unwrap(),
            stake_wei: U256::from(stake),
            outcome_index: bin,
            payout_wei: U256::from(payout),
        }
    }

    #[test]
    fn test_summary_math() {
        let stake = 10_000_000_000_000_000u128;
        let payout = 13_000_000_000_000_000u128;
        let fee = 1_000_000_000_000_000u128;
        let s = SettlementSummary::new(&settled(stake, payout, 1), U256::from(fee), &Paytable::default());

        assert!((s.multiplier - 1.3).abs() < 1e-12);
        assert_eq!(s.advertised_multiplier, Some(1.3));
        assert_eq!(s.pnl_game.format_ether(), "0.003");
        assert_eq!(s.pnl_net.format_ether(), "0.002");
        assert!(s.is_win());
    }

    #[test]
    fn test_losing_round() {
        let s = SettlementSummary::new(&settled(100, 60, 6), U256::from(5u64), &Paytable::default());
        assert_eq!(s.pnl_game.to_string(), "-40");
        assert_eq!(s.pnl_net.to_string(), "-45");
        assert_eq!(s.advertised_multiplier, Some(0.6));
    }

    #[test]
    fn test_zero_stake_and_unknown_bin() {
        let s = SettlementSummary::new(&settled(0, 0, 200), U256::ZERO, &Paytable::default());
        assert_eq!(s.multiplier, 0.0);
        assert_eq!(s.advertised_multiplier, None);
        assert!(!s.is_win());
    }
}
