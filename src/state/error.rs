use super::event::StrokeEvent;
use super::model::StrokeState;
use thiserror::Error;

pub type StateResult<T> = std::result::Result<T, StateError>;

#[derive(Debug, Error)]
pub enum StateError {
    #[error("invalid stroke transition: from {from:?} using event {event:?}")]
    InvalidStrokeTransition {
        from: StrokeState,
        event: StrokeEvent,
    },
}
