//! Structured error types for switchboard.
//!
//! Most negative outcomes in switchboard are not errors at all:
//!
//! - A request no handler accepts comes back as `None` from
//!   [`HandlerChain::handle`](crate::HandlerChain::handle).
//! - An event tag outside the mediator's vocabulary is dropped by
//!   [`Mediator::notify`](crate::Mediator::notify).
//!
//! `SwitchboardError` covers the wiring mistakes Rust lets us represent:
//! triggering a component before its mediator was injected, or after the
//! mediator was dropped, and naming an operating system the BIOS doesn't know.

use thiserror::Error;

/// Pattern-matchable switchboard errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SwitchboardError {
    /// The component was triggered before any mediator was attached.
    #[error("component '{component}' has no mediator attached")]
    Detached { component: &'static str },

    /// The component's mediator has already been dropped.
    #[error("mediator for component '{component}' was dropped")]
    MediatorDropped { component: &'static str },

    /// No boot strategy is registered under this name.
    #[error("unknown operating system: {name}")]
    UnknownOperatingSystem { name: String },
}

/// Result alias used throughout switchboard.
pub type Result<T, E = SwitchboardError> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detached_display_names_component() {
        let err = SwitchboardError::Detached {
            component: "shutdown",
        };
        assert_eq!(
            err.to_string(),
            "component 'shutdown' has no mediator attached"
        );
    }

    #[test]
    fn test_mediator_dropped_display() {
        let err = SwitchboardError::MediatorDropped { component: "sleep" };
        assert!(err.to_string().contains("sleep"));
        assert!(err.to_string().contains("dropped"));
    }

    #[test]
    fn test_errors_are_matchable() {
        let err = SwitchboardError::UnknownOperatingSystem {
            name: "beos".to_string(),
        };
        match err {
            SwitchboardError::UnknownOperatingSystem { name } => assert_eq!(name, "beos"),
            other => panic!("unexpected error: {other}"),
        }
    }
}
