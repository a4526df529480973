//! Contract events as seen by the reveal path.
//!
//! The observation layer decodes logs into [`ObservedLog`], where every field
//! is optional. Typed events are only produced once all required fields are
//! present.

use crate::error::{Result, RevealError};
use crate::types::{amount, Address, U256};
use serde::{Deserialize, Serialize};

/// A randomness request was accepted and assigned a sequence number.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AcceptedEvent {
    pub sequence_number: u64,
    pub player: Address,
    #[serde(with = "amount")]
    pub stake_wei: U256,
}

/// The request settled with its final, contract-determined outcome.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SettledEvent {
    pub sequence_number: u64,
    pub player: Address,
    #[serde(with = "amount")]
    pub stake_wei: U256,
    pub outcome_index: u8,
    #[serde(with = "amount")]
    pub payout_wei: U256,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum LogKind {
    Accepted,
    Settled,
}

/// Decoded log with possibly absent arguments.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ObservedLog {
    pub kind: LogKind,
    #[serde(default)]
    pub sequence_number: Option<u64>,
    #[serde(default)]
    pub player: Option<Address>,
    #[serde(default, with = "amount::option")]
    pub stake_wei: Option<U256>,
    #[serde(default)]
    pub outcome_index: Option<u8>,
    #[serde(default, with = "amount::option")]
    pub payout_wei: Option<U256>,
}

impl ObservedLog {
    pub fn is_from(&self, player: &Address) -> bool {
        self.player.as_ref() == Some(player)
    }

    pub fn to_accepted(&self) -> Result<AcceptedEvent> {
        Ok(AcceptedEvent {
            sequence_number: self
                .sequence_number
                .ok_or(RevealError::MissingEventField("sequenceNumber"))?,
            player: self.player.ok_or(RevealError::MissingEventField("player"))?,
            stake_wei: self
                .stake_wei
                .ok_or(RevealError::MissingEventField("stakeWei"))?,
        })
    }

    pub fn to_settled(&self) -> Result<SettledEvent> {
        Ok(SettledEvent {
            sequence_number: self
                .sequence_number
                .ok_or(RevealError::MissingEventField("sequenceNumber"))?,
            player: self.player.ok_or(RevealError::MissingEventField("player"))?,
            stake_wei: self
                .stake_wei
                .ok_or(RevealError::MissingEventField("stakeWei"))?,
            outcome_index: self
                .outcome_index
                .ok_or(RevealError::MissingEventField("outcomeIndex"))?,
            payout_wei: self
                .payout_wei
                .ok_or(RevealError::MissingEventField("payoutWei"))?,
        })
    }
}

impl From<AcceptedEvent> for ObservedLog {
    fn from(event: AcceptedEvent) -> Self {
        Self {
            kind: LogKind::Accepted,
            sequence_number: Some(event.sequence_number),
            player: Some(event.player),
            stake_wei: Some(event.stake_wei),
            outcome_index: None,
            payout_wei: None,
        }
    }
}

impl From<SettledEvent> for ObservedLog {
    fn from(event: SettledEvent) -> Self {
        Self {
            kind: LogKind::Settled,
            sequence_number: Some(event.sequence_number),
            player: Some(event.player),
            stake_wei: Some(event.stake_wei),
            outcome_index: Some(event.outcome_index),
            payout_wei: Some(event.payout_wei),
        }
    }
}
