//! Transport state machine.
//!
//! Holds the single playback state of the deck and decides which transitions
//! are allowed. Side effects are not fired here; the [`Player`](crate::player::Player)
//! runs them for every [`Transition::Entered`] it gets back.
use std::fmt;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TransportState {
    #[default]
    Stopped,
    Starting,
    Playing,
    Stopping,
    Pausing,
    Paused,
}

impl fmt::Display for TransportState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TransportState::Stopped => "Stopped",
            TransportState::Starting => "Starting",
            TransportState::Playing => "Playing",
            TransportState::Stopping => "Stopping",
            TransportState::Pausing => "Pausing",
            TransportState::Paused => "Paused",
        };
        f.write_str(name)
    }
}

impl TransportState {
    /// States reachable from `self` in one step.
    pub fn successors(self) -> &'static [TransportState] {
        use TransportState::*;
        match self {
            Stopped => &[Starting],
            Starting => &[Playing, Stopped],
            // Starting from Playing happens when the stream ran out and the
            // user presses play again.
            Playing => &[Stopping, Pausing, Starting, Stopped],
            Stopping => &[Stopped, Playing],
            Pausing => &[Paused, Playing],
            Paused => &[Starting, Stopped],
        }
    }

    pub fn can_enter(self, to: TransportState) -> bool {
        self.successors().contains(&to)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    /// The requested state was already active.
    Unchanged,
    Entered {
        from: TransportState,
        to: TransportState,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum TransitionError {
    #[error("illegal transport transition {from} -> {to}")]
    Illegal {
        from: TransportState,
        to: TransportState,
    },
}

#[derive(Debug, Default)]
pub struct Transport {
    state: TransportState,
}

impl Transport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> TransportState {
        self.state
    }

    pub fn request(&mut self, to: TransportState) -> Result<Transition, TransitionError> {
        let from = self.state;
        if from == to {
            return Ok(Transition::Unchanged);
        }
        if !from.can_enter(to) {
            return Err(TransitionError::Illegal { from, to });
        }
        self.state = to;
        Ok(Transition::Entered { from, to })
    }

    /// Puts the transport back to `Stopped` without consulting the table.
    /// Used when a new file replaces whatever was playing.
    pub fn reset(&mut self) -> TransportState {
        std::mem::take(&mut self.state)
    }
}
