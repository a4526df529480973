//! Pure state machine correlating a local action with its accepted and
//! settled events.
//!
//! `Idle -> AwaitingAcceptance -> AwaitingSettlement -> Revealing -> Idle`.
//! Time only enters through the timestamps carried by inputs, so the same
//! input sequence always produces the same transitions.

use crate::config::SessionConfig;
use crate::error::{Result, RevealFault};
use crate::state::{PendingRequest, RevealPhase, RevealState};
use chrono::{DateTime, Utc};
use reveal_core::wheel::normalize;
use reveal_core::types::amount;
use reveal_core::{
    GameKind, LogKind, ObservedLog, OutcomeRenderer, OutcomeView, RevealError, SettledEvent,
    SettlementSummary, U256,
};
use serde::{Deserialize, Serialize};
use std::time::Duration;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum RevealInput {
    /// The player submitted a new request.
    #[serde(rename_all = "camelCase")]
    Submit {
        #[serde(with = "amount")]
        stake_wei: U256,
        #[serde(with = "amount")]
        fee_wei: U256,
        at: DateTime<Utc>,
    },
    /// A decoded contract log from the shared event stream.
    Observed { log: ObservedLog, at: DateTime<Utc> },
    /// Clock advance, drives timeouts and animation completion.
    Tick { now: DateTime<Utc> },
    /// The UI finished the reveal animation early.
    #[serde(rename_all = "camelCase")]
    AnimationFinished {
        sequence_number: u64,
        at: DateTime<Utc>,
    },
}

impl RevealInput {
    pub fn at(&self) -> DateTime<Utc> {
        match self {
            RevealInput::Submit { at, .. }
            | RevealInput::Observed { at, .. }
            | RevealInput::AnimationFinished { at, .. } => *at,
            RevealInput::Tick { now } => *now,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum RevealEffect {
    /// Start the idle animation.
    #[serde(rename_all = "camelCase")]
    Submitted {
        #[serde(with = "amount")]
        stake_wei: U256,
        #[serde(with = "amount")]
        fee_wei: U256,
    },
    /// A sequence number is now tracked; `replaced` is the one it overwrote.
    #[serde(rename_all = "camelCase")]
    Accepted {
        sequence_number: u64,
        replaced: Option<u64>,
    },
    #[serde(rename_all = "camelCase")]
    Reveal {
        sequence_number: u64,
        view: OutcomeView,
        summary: SettlementSummary,
    },
    #[serde(rename_all = "camelCase")]
    Completed { sequence_number: u64 },
    Fault { fault: RevealFault },
}

#[derive(Debug, Clone, PartialEq)]
pub struct Transition {
    pub state: RevealState,
    pub effects: Vec<RevealEffect>,
}

impl Transition {
    fn stay(state: &RevealState) -> Self {
        Self {
            state: state.clone(),
            effects: Vec::new(),
        }
    }

    fn to(state: RevealState, effects: Vec<RevealEffect>) -> Self {
        Self { state, effects }
    }

    /// Back to idle with the fault surfaced.
    fn fault(rotation: f64, fault: RevealFault) -> Self {
        Self {
            state: RevealState {
                phase: RevealPhase::Idle,
                rotation: normalize(rotation),
            },
            effects: vec![RevealEffect::Fault { fault }],
        }
    }
}

/// `at + d`, or the last representable instant if that overflows, which
/// leaves the phase without an effective deadline.
fn deadline_after(at: DateTime<Utc>, d: Duration) -> DateTime<Utc> {
    chrono::Duration::from_std(d)
        .ok()
        .and_then(|d| at.checked_add_signed(d))
        .unwrap_or(DateTime::<Utc>::MAX_UTC)
}

fn elapsed(from: DateTime<Utc>, to: DateTime<Utc>) -> Duration {
    (to - from).to_std().unwrap_or_default()
}

/// Fault for an event that could not be decoded.
fn event_fault(err: RevealError, sequence_number: u64) -> RevealFault {
    match err {
        RevealError::MissingEventField(field) => RevealFault::MissingEventField {
            field: field.to_string(),
        },
        other => RevealFault::RenderFailed {
            sequence_number,
            reason: other.to_string(),
        },
    }
}

/// Reducer bound to one session configuration.
#[derive(Debug, Clone)]
pub struct Reducer {
    config: SessionConfig,
    renderer: OutcomeRenderer,
}

impl Reducer {
    pub fn new(config: SessionConfig) -> Result<Self> {
        config.validate()?;
        let renderer = OutcomeRenderer::new(config.reveal.clone())?;
        Ok(Self { config, renderer })
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn renderer(&self) -> &OutcomeRenderer {
        &self.renderer
    }

    /// Wheel rotation at `at` while idling for `request`.
    fn idle_rotation(&self, request: &PendingRequest, at: DateTime<Utc>) -> f64 {
        match self.config.game {
            GameKind::Wheel => self
                .config
                .reveal
                .spin
                .idle_rotation(request.spin_origin, elapsed(request.submitted_at, at)),
            GameKind::Poker | GameKind::Mines => request.spin_origin,
        }
    }

    /// Wheel rotation at `at` given the current phase.
    fn rotation_at(&self, state: &RevealState, at: DateTime<Utc>) -> f64 {
        match &state.phase {
            RevealPhase::Idle => state.rotation,
            RevealPhase::AwaitingAcceptance { request, .. }
            | RevealPhase::AwaitingSettlement { request, .. } => self.idle_rotation(request, at),
            RevealPhase::Revealing {
                view, started_at, ..
            } => match view {
                OutcomeView::Wheel { plan, .. } => plan.angle_at(elapsed(*started_at, at)),
                OutcomeView::Deal { .. } | OutcomeView::Grid { .. } => state.rotation,
            },
        }
    }

    pub fn reduce(&self, state: &RevealState, input: &RevealInput) -> Transition {
        match input {
            RevealInput::Submit {
                stake_wei,
                fee_wei,
                at,
            } => self.on_submit(state, *stake_wei, *fee_wei, *at),
            RevealInput::Observed { log, at } => self.on_observed(state, log, *at),
            RevealInput::Tick { now } => self.on_tick(state, *now),
            RevealInput::AnimationFinished {
                sequence_number,
                at,
            } => self.on_animation_finished(state, *sequence_number, *at),
        }
    }

    fn on_submit(
        &self,
        state: &RevealState,
        stake_wei: U256,
        fee_wei: U256,
        at: DateTime<Utc>,
    ) -> Transition {
        let mut effects = Vec::new();

        match &state.phase {
            RevealPhase::Revealing {
                sequence_number, ..
            } => {
                effects.push(RevealEffect::Fault {
                    fault: RevealFault::AnimationInterrupted {
                        sequence_number: *sequence_number,
                    },
                });
            }
            RevealPhase::AwaitingAcceptance { .. } | RevealPhase::AwaitingSettlement { .. } => {
                tracing::debug!(
                    "Abandoning pending request ({}) for a new submission",
                    state.phase.name()
                );
            }
            RevealPhase::Idle => {}
        }

        let request = PendingRequest {
            stake_wei,
            fee_wei,
            submitted_at: at,
            spin_origin: normalize(self.rotation_at(state, at)),
        };
        effects.push(RevealEffect::Submitted { stake_wei, fee_wei });

        Transition::to(
            RevealState {
                rotation: request.spin_origin,
                phase: RevealPhase::AwaitingAcceptance {
                    request,
                    deadline: deadline_after(at, self.config.acceptance_timeout),
                },
            },
            effects,
        )
    }

    fn on_observed(&self, state: &RevealState, log: &ObservedLog, at: DateTime<Utc>) -> Transition {
        if !log.is_from(&self.config.player) {
            tracing::debug!("Ignoring {:?} log for another player", log.kind);
            return Transition::stay(state);
        }

        match log.kind {
            LogKind::Accepted => self.on_accepted(state, log, at),
            LogKind::Settled => self.on_settled(state, log, at),
        }
    }

    fn on_accepted(&self, state: &RevealState, log: &ObservedLog, at: DateTime<Utc>) -> Transition {
        let (request, previous) = match &state.phase {
            RevealPhase::AwaitingAcceptance { request, .. } => (request, None),
            RevealPhase::AwaitingSettlement {
                request,
                sequence_number,
                ..
            } => (request, Some(*sequence_number)),
            _ => {
                tracing::debug!("Ignoring acceptance with no local request in flight");
                return Transition::stay(state);
            }
        };

        let accepted = match log.to_accepted() {
            Ok(accepted) => accepted,
            Err(e) => {
                let fault = event_fault(e, log.sequence_number.unwrap_or_default());
                return Transition::fault(self.rotation_at(state, at), fault);
            }
        };

        if previous == Some(accepted.sequence_number) {
            return Transition::stay(state);
        }

        Transition::to(
            state.with_phase(RevealPhase::AwaitingSettlement {
                request: request.clone(),
                sequence_number: accepted.sequence_number,
                accepted_stake_wei: accepted.stake_wei,
                deadline: deadline_after(at, self.config.settlement_timeout),
            }),
            vec![RevealEffect::Accepted {
                sequence_number: accepted.sequence_number,
                replaced: previous,
            }],
        )
    }

    fn on_settled(&self, state: &RevealState, log: &ObservedLog, at: DateTime<Utc>) -> Transition {
        let RevealPhase::AwaitingSettlement {
            request,
            sequence_number,
            accepted_stake_wei,
            ..
        } = &state.phase
        else {
            tracing::debug!("Ignoring settlement with nothing awaiting settlement");
            return Transition::stay(state);
        };
        let rotation = self.rotation_at(state, at);

        match log.sequence_number {
            None => {
                return Transition::fault(
                    rotation,
                    event_fault(RevealError::MissingEventField("sequenceNumber"), 0),
                );
            }
            Some(seq) if seq != *sequence_number => {
                tracing::debug!(
                    "Ignoring settlement for seq {} while waiting on seq {}",
                    seq,
                    sequence_number
                );
                return Transition::stay(state);
            }
            Some(_) => {}
        }

        let settled = match log.to_settled() {
            Ok(settled) => settled,
            Err(e) => return Transition::fault(rotation, event_fault(e, *sequence_number)),
        };

        if settled.stake_wei != *accepted_stake_wei {
            return Transition::fault(
                rotation,
                RevealFault::ContradictingEvent {
                    sequence_number: settled.sequence_number,
                    reason: format!(
                        "settled stake {} differs from accepted stake {}",
                        settled.stake_wei, accepted_stake_wei
                    ),
                },
            );
        }

        self.reveal(state, request, &settled, rotation, at)
    }

    fn reveal(
        &self,
        state: &RevealState,
        request: &PendingRequest,
        settled: &SettledEvent,
        rotation: f64,
        at: DateTime<Utc>,
    ) -> Transition {
        let view = match self.renderer.render(self.config.game, settled, rotation) {
            Ok(view) => view,
            Err(e) => {
                return Transition::fault(
                    rotation,
                    RevealFault::RenderFailed {
                        sequence_number: settled.sequence_number,
                        reason: e.to_string(),
                    },
                );
            }
        };
        let summary = SettlementSummary::new(settled, request.fee_wei, &self.config.reveal.paytable);
        let ends_at = deadline_after(at, view.animation_duration(&self.config.reveal));

        Transition::to(
            RevealState {
                rotation: normalize(rotation),
                phase: RevealPhase::Revealing {
                    sequence_number: settled.sequence_number,
                    view: view.clone(),
                    summary: summary.clone(),
                    started_at: at,
                    ends_at,
                },
            },
            vec![RevealEffect::Reveal {
                sequence_number: settled.sequence_number,
                view,
                summary,
            }],
        )
    }

    fn on_tick(&self, state: &RevealState, now: DateTime<Utc>) -> Transition {
        match &state.phase {
            RevealPhase::Idle => Transition::stay(state),
            RevealPhase::AwaitingAcceptance { deadline, .. } if now > *deadline => {
                Transition::fault(
                    self.rotation_at(state, now),
                    RevealFault::AcceptanceTimedOut {
                        timeout_ms: self.config.acceptance_timeout.as_millis() as u64,
                    },
                )
            }
            RevealPhase::AwaitingSettlement {
                deadline,
                sequence_number,
                ..
            } if now > *deadline => Transition::fault(
                self.rotation_at(state, now),
                RevealFault::SettlementTimedOut {
                    sequence_number: *sequence_number,
                    timeout_ms: self.config.settlement_timeout.as_millis() as u64,
                },
            ),
            RevealPhase::Revealing {
                sequence_number,
                ends_at,
                ..
            } if now >= *ends_at => self.complete(state, *sequence_number),
            _ => Transition::stay(state),
        }
    }

    fn on_animation_finished(
        &self,
        state: &RevealState,
        finished: u64,
        _at: DateTime<Utc>,
    ) -> Transition {
        match &state.phase {
            RevealPhase::Revealing {
                sequence_number, ..
            } if *sequence_number == finished => self.complete(state, finished),
            _ => Transition::stay(state),
        }
    }

    fn complete(&self, state: &RevealState, sequence_number: u64) -> Transition {
        let rotation = match &state.phase {
            RevealPhase::Revealing { view, .. } => view.resting_rotation().unwrap_or(state.rotation),
            _ => state.rotation,
        };
        Transition::to(
            RevealState {
                phase: RevealPhase::Idle,
                rotation: normalize(rotation),
            },
            vec![RevealEffect::Completed { sequence_number }],
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use reveal_core::Address;

    fn me() -> Address {
        "0x00000000000000000000000000000000000000aa".parse().unwrap()
    }

    fn t(secs: i64) -> DateTime<Utc> {
        Utc.timestamp_opt(1_700_000_000 + secs, 0).unwrap()
    }

    fn reducer(game: GameKind) -> Reducer {
        Reducer::new(SessionConfig::new(me(), game)).unwrap()
    }

    fn submit(at: i64) -> RevealInput {
        RevealInput::Submit {
            stake_wei: U256::from(100u64),
            fee_wei: U256::from(1u64),
            at: t(at),
        }
    }

    fn accepted(seq: u64, at: i64) -> RevealInput {
        RevealInput::Observed {
            log: reveal_core::AcceptedEvent {
                sequence_number: seq,
                player: me(),
                stake_wei: U256::from(100u64),
            }
            .into(),
            at: t(at),
        }
    }

    #[test]
    fn test_submit_from_idle() {
        let r = reducer(GameKind::Poker);
        let next = r.reduce(&RevealState::default(), &submit(0));
        assert!(matches!(next.state.phase, RevealPhase::AwaitingAcceptance { .. }));
        assert_eq!(next.effects.len(), 1);
    }

    #[test]
    fn test_acceptance_tracks_sequence_number() {
        let r = reducer(GameKind::Poker);
        let s = r.reduce(&RevealState::default(), &submit(0)).state;
        let next = r.reduce(&s, &accepted(9, 1));
        assert_eq!(next.state.phase.sequence_number(), Some(9));
        assert_eq!(
            next.effects,
            vec![RevealEffect::Accepted {
                sequence_number: 9,
                replaced: None
            }]
        );
    }

    #[test]
    fn test_duplicate_acceptance_is_noop() {
        let r = reducer(GameKind::Poker);
        let s = r.reduce(&RevealState::default(), &submit(0)).state;
        let s = r.reduce(&s, &accepted(9, 1)).state;
        let next = r.reduce(&s, &accepted(9, 2));
        assert_eq!(next.state, s);
        assert!(next.effects.is_empty());
    }

    #[test]
    fn test_acceptance_while_idle_is_ignored() {
        let r = reducer(GameKind::Poker);
        let next = r.reduce(&RevealState::default(), &accepted(3, 0));
        assert!(next.state.is_idle());
        assert!(next.effects.is_empty());
    }

    #[test]
    fn test_wheel_idles_while_waiting() {
        let r = reducer(GameKind::Wheel);
        let s = r.reduce(&RevealState::default(), &submit(0)).state;
        // 180 deg/s for 1.5s
        assert!((r.rotation_at(&s, t(0) + chrono::Duration::milliseconds(1500)) - 270.0).abs() < 1e-9);
    }

    #[test]
    fn test_event_fault_keeps_missing_field_apart() {
        assert_eq!(
            event_fault(RevealError::MissingEventField("payoutWei"), 4),
            RevealFault::MissingEventField {
                field: "payoutWei".to_string()
            }
        );
        match event_fault(RevealError::config("bad layout"), 4) {
            RevealFault::RenderFailed {
                sequence_number,
                reason,
            } => {
                assert_eq!(sequence_number, 4);
                assert!(reason.contains("bad layout"));
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_deadline_at_end_of_calendar() {
        let last = DateTime::<Utc>::MAX_UTC;
        let near_end = last - chrono::Duration::seconds(1);
        assert_eq!(deadline_after(near_end, Duration::from_secs(60)), last);
        assert_eq!(deadline_after(t(0), Duration::from_secs(60)), t(60));

        let r = reducer(GameKind::Wheel);
        let submit = RevealInput::Submit {
            stake_wei: U256::from(100u64),
            fee_wei: U256::from(1u64),
            at: near_end,
        };
        let s = r.reduce(&RevealState::default(), &submit).state;
        let next = r.reduce(&s, &RevealInput::Tick { now: last });
        assert!(next.effects.is_empty());
        assert!(matches!(next.state.phase, RevealPhase::AwaitingAcceptance { .. }));
    }
}
