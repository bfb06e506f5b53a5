use super::error::{StateError, StateResult};
use super::{StrokeEvent, StrokeState};

#[derive(Debug, Default)]
pub struct StrokeMachine {
    state: StrokeState,
}

impl StrokeMachine {
    pub fn new() -> Self {
        Self {
            state: StrokeState::Idle,
        }
    }

    pub fn state(&self) -> StrokeState {
        self.state
    }

    pub fn can_transition(&self, event: StrokeEvent) -> bool {
        self.next_state(event).is_some()
    }

    pub fn next_state(&self, event: StrokeEvent) -> Option<StrokeState> {
        use StrokeEvent::*;
        match (self.state, event) {
            (StrokeState::Idle, Begin(point)) => Some(StrokeState::Drawing { last: point }),
            (StrokeState::Drawing { .. }, Extend(point)) => {
                Some(StrokeState::Drawing { last: point })
            }
            (StrokeState::Drawing { .. }, End | Cancel) => Some(StrokeState::Idle),
            _ => None,
        }
    }

    /// Applies `event`, returning the state that was left.
    pub fn transition(&mut self, event: StrokeEvent) -> StateResult<StrokeState> {
        tracing::trace!(from = ?self.state, event = ?event, "request stroke transition");
        let next = self.next_state(event).ok_or_else(|| {
            let from = self.state;
            tracing::debug!(from = ?from, event = ?event, "invalid stroke transition requested");
            StateError::InvalidStrokeTransition { from, event }
        })?;

        let previous = std::mem::replace(&mut self.state, next);
        Ok(previous)
    }
}

impl std::fmt::Display for StrokeMachine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "StrokeState::{:?}", self.state)
    }
}
