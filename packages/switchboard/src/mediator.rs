//! Mediator and component traits.
//!
//! Components never talk to each other. They report named events to a single
//! mediator, and the mediator decides which component methods run in
//! response.
//!
//! # Wiring
//!
//! Construction is two-phase so nothing is ever partially built:
//!
//! ```text
//! 1. build components          Rc<Shutdown>, Rc<Sleep>
//! 2. build mediator            Rc<StartMenu> { shutdown, sleep }
//! 3. inject back-references    component.attach(Weak<dyn Mediator>)
//! ```
//!
//! The mediator owns its components (`Rc`); a component only holds a `Weak`
//! back-reference, so dropping the mediator never leaks a cycle.
//!
//! # Re-entry
//!
//! A component action emits its status line and then notifies the mediator
//! again, so `notify` is re-entered synchronously from inside a reaction it
//! started. [`Reentry`] bounds that nesting to one level.

use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};

use tracing::trace;

use crate::core::EventTag;
use crate::error::{Result, SwitchboardError};

/// Central router for component events.
pub trait Mediator {
    /// Receive `event` from `sender`.
    ///
    /// Unknown event names are ignored; this never fails.
    fn notify(&self, sender: &dyn Component, event: &str);
}

/// A participant that only knows its mediator.
pub trait Component {
    /// Stable name used in logs and errors.
    fn name(&self) -> &'static str;

    /// Inject (or replace) the mediator back-reference.
    fn attach(&self, mediator: Weak<dyn Mediator>);
}

/// A component's non-owning back-reference to its mediator.
#[derive(Default)]
pub struct MediatorLink {
    mediator: RefCell<Option<Weak<dyn Mediator>>>,
}

impl MediatorLink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn attach(&self, mediator: Weak<dyn Mediator>) {
        *self.mediator.borrow_mut() = Some(mediator);
    }

    pub fn is_attached(&self) -> bool {
        self.mediator
            .borrow()
            .as_ref()
            .is_some_and(|m| m.strong_count() > 0)
    }

    /// Resolve the mediator for `component`.
    pub fn resolve(&self, component: &'static str) -> Result<Rc<dyn Mediator>> {
        let link = self.mediator.borrow();
        let weak = link
            .as_ref()
            .ok_or(SwitchboardError::Detached { component })?;
        weak.upgrade()
            .ok_or(SwitchboardError::MediatorDropped { component })
    }

    /// Send `tag` from `sender` to the attached mediator.
    pub fn notify(&self, sender: &dyn Component, tag: EventTag) -> Result<()> {
        let mediator = self.resolve(sender.name())?;
        trace!(sender = sender.name(), %tag, "notifying mediator");
        mediator.notify(sender, tag.as_str());
        Ok(())
    }
}

impl std::fmt::Debug for MediatorLink {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MediatorLink")
            .field("attached", &self.is_attached())
            .finish()
    }
}

/// Maximum number of nested `notify` calls allowed inside a reaction.
pub const MAX_REENTRY: usize = 1;

/// Depth counter for synchronous re-entry into a mediator.
///
/// The outermost `notify` runs at depth 1; each nested call from a component
/// action adds one. Entering beyond `1 + limit` is refused.
#[derive(Debug)]
pub struct Reentry {
    depth: Cell<usize>,
    limit: usize,
}

impl Reentry {
    pub fn new(limit: usize) -> Self {
        Self {
            depth: Cell::new(0),
            limit,
        }
    }

    /// Enter one level. Returns `None` when the nesting limit is reached.
    pub fn enter(&self) -> Option<ReentryGuard<'_>> {
        let depth = self.depth.get();
        if depth > self.limit {
            return None;
        }
        self.depth.set(depth + 1);
        Some(ReentryGuard { depth: &self.depth })
    }

    /// Current nesting depth (0 when idle).
    pub fn depth(&self) -> usize {
        self.depth.get()
    }
}

impl Default for Reentry {
    fn default() -> Self {
        Self::new(MAX_REENTRY)
    }
}

/// Leaves one nesting level on drop.
pub struct ReentryGuard<'a> {
    depth: &'a Cell<usize>,
}

impl Drop for ReentryGuard<'_> {
    fn drop(&mut self) {
        self.depth.set(self.depth.get().saturating_sub(1));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Probe {
        link: MediatorLink,
    }

    impl Component for Probe {
        fn name(&self) -> &'static str {
            "probe"
        }

        fn attach(&self, mediator: Weak<dyn Mediator>) {
            self.link.attach(mediator);
        }
    }

    #[derive(Default)]
    struct Recorder {
        seen: RefCell<Vec<(String, String)>>,
    }

    impl Mediator for Recorder {
        fn notify(&self, sender: &dyn Component, event: &str) {
            self.seen
                .borrow_mut()
                .push((sender.name().to_string(), event.to_string()));
        }
    }

    #[test]
    fn test_detached_link_errors() {
        let probe = Probe {
            link: MediatorLink::new(),
        };
        assert!(!probe.link.is_attached());
        assert_eq!(
            probe.link.notify(&probe, EventTag::Log),
            Err(SwitchboardError::Detached { component: "probe" })
        );
    }

    #[test]
    fn test_attached_link_forwards_tag() {
        let recorder = Rc::new(Recorder::default());
        let probe = Probe {
            link: MediatorLink::new(),
        };
        let weak: Weak<dyn Mediator> = Rc::downgrade(&recorder) as Weak<dyn Mediator>;
        probe.attach(weak);

        assert!(probe.link.is_attached());
        probe.link.notify(&probe, EventTag::Close).unwrap();

        assert_eq!(
            *recorder.seen.borrow(),
            vec![("probe".to_string(), "Close".to_string())]
        );
    }

    #[test]
    fn test_dropped_mediator_errors() {
        let recorder = Rc::new(Recorder::default());
        let probe = Probe {
            link: MediatorLink::new(),
        };
        probe.attach(Rc::downgrade(&recorder) as Weak<dyn Mediator>);
        drop(recorder);

        assert!(!probe.link.is_attached());
        assert_eq!(
            probe.link.notify(&probe, EventTag::Log),
            Err(SwitchboardError::MediatorDropped { component: "probe" })
        );
    }

    #[test]
    fn test_reentry_allows_one_nested_level() {
        let reentry = Reentry::default();

        let outer = reentry.enter();
        assert!(outer.is_some());
        assert_eq!(reentry.depth(), 1);

        let nested = reentry.enter();
        assert!(nested.is_some());
        assert_eq!(reentry.depth(), 2);

        assert!(reentry.enter().is_none());
        assert_eq!(reentry.depth(), 2);

        drop(nested);
        drop(outer);
        assert_eq!(reentry.depth(), 0);
        assert!(reentry.enter().is_some());
    }
}
