//! Shared vocabulary: the closed set of event tags components exchange with
//! their mediator.

use std::fmt;

/// Event tags understood by the start menu mediator.
///
/// Tags travel as plain strings through [`Mediator::notify`](crate::Mediator::notify)
/// and are matched exactly, so `"shutdown"` is not `"Shutdown"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventTag {
    /// A user picked "Shut down" from the menu.
    Shutdown,
    /// A user picked "Sleep" from the menu.
    Sleep,
    /// The log file was written.
    Log,
    /// Running apps were closed.
    Close,
}

impl EventTag {
    pub const ALL: [EventTag; 4] = [
        EventTag::Shutdown,
        EventTag::Sleep,
        EventTag::Log,
        EventTag::Close,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            EventTag::Shutdown => "Shutdown",
            EventTag::Sleep => "Sleep",
            EventTag::Log => "Log",
            EventTag::Close => "Close",
        }
    }

    /// Exact-match lookup. Returns `None` for anything outside the vocabulary.
    pub fn parse(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|tag| tag.as_str() == name)
    }
}

impl fmt::Display for EventTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
