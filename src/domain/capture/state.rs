//! Capture session state machine

use std::fmt;

use thiserror::Error;

/// Capture session states
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SessionState {
    #[default]
    Idle,
    Capturing,
    Stopped,
}

impl SessionState {
    /// Get the string representation
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Capturing => "capturing",
            Self::Stopped => "stopped",
        }
    }
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Error when an invalid state transition is attempted.
///
/// State machine:
///   IDLE -> CAPTURING (start)
///   CAPTURING -> STOPPED (stop, or external source termination)
///   STOPPED -> IDLE (reset)
///   IDLE -> IDLE (reset)
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Invalid state transition: cannot {action} while in {current_state} state")]
pub struct InvalidStateTransition {
    pub current_state: SessionState,
    pub action: &'static str,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn state_display() {
        assert_eq!(SessionState::Idle.to_string(), "idle");
        assert_eq!(SessionState::Capturing.to_string(), "capturing");
        assert_eq!(SessionState::Stopped.to_string(), "stopped");
    }

    #[test]
    fn default_state_is_idle() {
        assert_eq!(SessionState::default(), SessionState::Idle);
    }

    #[test]
    fn transition_error_display() {
        let err = InvalidStateTransition {
            current_state: SessionState::Capturing,
            action: "start",
        };
        let msg = err.to_string();
        assert!(msg.contains("start"));
        assert!(msg.contains("capturing"));
    }
}
