//! Explicit ordering for session inputs.
//!
//! [`EventQueue`] is the synchronous form used by headless callers and tests.
//! [`SessionDriver`] runs a session on its own task. Inputs are bounded so
//! senders feel backpressure; effects are unbounded so the task never blocks
//! on a caller that has not started reading yet.

use crate::error::{Result, SessionError};
use crate::reducer::{RevealEffect, RevealInput};
use crate::session::RevealSession;
use std::collections::VecDeque;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

/// FIFO of inputs, applied strictly in arrival order.
#[derive(Debug, Default)]
pub struct EventQueue {
    inputs: VecDeque<RevealInput>,
}

impl EventQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, input: RevealInput) {
        self.inputs.push_back(input);
    }

    pub fn len(&self) -> usize {
        self.inputs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inputs.is_empty()
    }

    /// Apply every queued input to `session`, returning effects in order.
    pub fn drain_into(&mut self, session: &mut RevealSession) -> Vec<RevealEffect> {
        let mut effects = Vec::new();
        while let Some(input) = self.inputs.pop_front() {
            effects.extend(session.apply(input));
        }
        effects
    }
}

impl Extend<RevealInput> for EventQueue {
    fn extend<T: IntoIterator<Item = RevealInput>>(&mut self, iter: T) {
        self.inputs.extend(iter);
    }
}

/// Owns a session on a tokio task. Inputs go in through [`SessionDriver::send`],
/// effects come out on the receiver returned by [`SessionDriver::spawn`].
/// A `buffer` of 0 is treated as 1.
pub struct SessionDriver {
    inputs: mpsc::Sender<RevealInput>,
    task: JoinHandle<RevealSession>,
}

impl SessionDriver {
    pub fn spawn(
        mut session: RevealSession,
        buffer: usize,
    ) -> (Self, mpsc::UnboundedReceiver<RevealEffect>) {
        let (input_tx, mut input_rx) = mpsc::channel::<RevealInput>(buffer.max(1));
        let (effect_tx, effect_rx) = mpsc::unbounded_channel::<RevealEffect>();

        let task = tokio::spawn(async move {
            while let Some(input) = input_rx.recv().await {
                for effect in session.apply(input) {
                    if effect_tx.send(effect).is_err() {
                        tracing::debug!("Effect receiver dropped for session {}", session.id());
                    }
                }
            }
            tracing::debug!("Input channel closed for session {}", session.id());
            session
        });

        (
            Self {
                inputs: input_tx,
                task,
            },
            effect_rx,
        )
    }

    pub async fn send(&self, input: RevealInput) -> Result<()> {
        self.inputs
            .send(input)
            .await
            .map_err(|_| SessionError::ChannelClosed)
    }

    /// Close the input side and wait for the session to drain.
    pub async fn shutdown(self) -> Result<RevealSession> {
        drop(self.inputs);
        self.task
            .await
            .map_err(|e| SessionError::internal(format!("session task failed: {e}")))
    }
}
