//! Observer: a service manager that notifies attached services when its
//! state changes.
//!
//! Each [`ServiceManager`] owns its own subscriber list. Two managers never
//! share services.

use std::fmt;
use std::rc::Rc;

use chrono::Utc;
use tracing::debug;
use uuid::Uuid;

use crate::transcript::Console;

/// Identifier handed out by [`ServiceManager::attach`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ServiceId(Uuid);

impl ServiceId {
    fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl fmt::Display for ServiceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A subscriber reacting to state changes.
pub trait Service {
    fn name(&self) -> &'static str;

    /// Called with the manager's new state, in attach order.
    fn update(&self, state: u8, console: &dyn Console);
}

/// Announces available updates while the state is low.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemUpdateService;

impl Service for SystemUpdateService {
    fn name(&self) -> &'static str {
        "system-update"
    }

    fn update(&self, state: u8, console: &dyn Console) {
        if state < 3 {
            console.line("System Update Service: New Update Available.");
        }
    }
}

/// Prints the wall clock on most state changes.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemTimeService;

impl Service for SystemTimeService {
    fn name(&self) -> &'static str {
        "system-time"
    }

    fn update(&self, state: u8, console: &dyn Console) {
        if state >= 2 || state == 0 {
            console.line(&format!(
                "System Time Service: {}.",
                Utc::now().timestamp()
            ));
        }
    }
}

/// Subject owning a state value and its subscribers.
pub struct ServiceManager {
    state: Option<u8>,
    services: Vec<(ServiceId, Box<dyn Service>)>,
    console: Rc<dyn Console>,
    rng: fastrand::Rng,
}

impl ServiceManager {
    pub fn new(console: Rc<dyn Console>) -> Self {
        Self::with_rng(console, fastrand::Rng::new())
    }

    /// Deterministic state sequence for [`work`](Self::work).
    pub fn with_seed(console: Rc<dyn Console>, seed: u64) -> Self {
        Self::with_rng(console, fastrand::Rng::with_seed(seed))
    }

    fn with_rng(console: Rc<dyn Console>, rng: fastrand::Rng) -> Self {
        Self {
            state: None,
            services: Vec::new(),
            console,
            rng,
        }
    }

    pub fn attach(&mut self, service: impl Service + 'static) -> ServiceId {
        self.console.line("System: Starting service");
        let id = ServiceId::new();
        debug!(service = service.name(), %id, "service attached");
        self.services.push((id, Box::new(service)));
        id
    }

    /// Remove a service. Returns `false` if it wasn't attached.
    pub fn detach(&mut self, id: ServiceId) -> bool {
        let before = self.services.len();
        self.services.retain(|(sid, _)| *sid != id);
        let removed = self.services.len() != before;
        debug!(%id, removed, "service detach requested");
        removed
    }

    /// Push the current state to every attached service.
    ///
    /// Does nothing until a state has been set.
    pub fn notify(&self) {
        let Some(state) = self.state else {
            return;
        };
        self.console.line("System: Notifying services...");
        for (_, service) in &self.services {
            service.update(state, self.console.as_ref());
        }
    }

    pub fn set_state(&mut self, state: u8) {
        self.console
            .line(&format!("System: My state has just changed to: {state}"));
        self.state = Some(state);
        self.notify();
    }

    /// Pick a random state in `0..10` and notify. Returns the new state.
    pub fn work(&mut self) -> u8 {
        self.console.line("");
        self.console.line("System: I'm doing something important.");
        let state = self.rng.u8(0..10);
        self.set_state(state);
        state
    }

    pub fn state(&self) -> Option<u8> {
        self.state
    }

    pub fn contains(&self, id: ServiceId) -> bool {
        self.services.iter().any(|(sid, _)| *sid == id)
    }

    pub fn len(&self) -> usize {
        self.services.len()
    }

    pub fn is_empty(&self) -> bool {
        self.services.is_empty()
    }
}

impl fmt::Debug for ServiceManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ServiceManager")
            .field("state", &self.state)
            .field(
                "services",
                &self.services.iter().map(|(_, s)| s.name()).collect::<Vec<_>>(),
            )
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transcript::Transcript;

    const UPDATE_LINE: &str = "System Update Service: New Update Available.";

    fn manager() -> (ServiceManager, Transcript) {
        let transcript = Transcript::new();
        (ServiceManager::new(transcript.console()), transcript)
    }

    #[test]
    fn test_low_state_notifies_both_services() {
        let (mut manager, transcript) = manager();
        manager.attach(SystemUpdateService);
        manager.attach(SystemTimeService);
        transcript.clear();

        manager.set_state(2);

        let lines = transcript.lines();
        assert_eq!(lines[0], "System: My state has just changed to: 2");
        assert_eq!(lines[1], "System: Notifying services...");
        assert_eq!(lines[2], UPDATE_LINE);
        assert!(lines[3].starts_with("System Time Service: "));
        assert_eq!(lines.len(), 4);
    }

    #[test]
    fn test_state_one_only_reaches_update_service() {
        let (mut manager, transcript) = manager();
        manager.attach(SystemUpdateService);
        manager.attach(SystemTimeService);

        manager.set_state(1);

        assert_eq!(transcript.count(UPDATE_LINE), 1);
        assert!(!transcript.contains("System Time Service"));
    }

    #[test]
    fn test_high_state_only_reaches_time_service() {
        let (mut manager, transcript) = manager();
        manager.attach(SystemUpdateService);
        manager.attach(SystemTimeService);

        manager.set_state(7);

        assert_eq!(transcript.count(UPDATE_LINE), 0);
        assert!(transcript.contains("System Time Service"));
    }

    #[test]
    fn test_detach_stops_updates() {
        let (mut manager, transcript) = manager();
        let update = manager.attach(SystemUpdateService);

        assert!(manager.detach(update));
        assert!(!manager.contains(update));
        assert!(!manager.detach(update));

        manager.set_state(0);
        assert_eq!(transcript.count(UPDATE_LINE), 0);
    }

    #[test]
    fn test_managers_do_not_share_services() {
        let (mut first, _) = manager();
        let (second, _) = manager();

        first.attach(SystemUpdateService);

        assert_eq!(first.len(), 1);
        assert!(second.is_empty());
    }

    #[test]
    fn test_notify_before_state_is_silent() {
        let (mut manager, transcript) = manager();
        manager.attach(SystemUpdateService);
        transcript.clear();

        manager.notify();
        assert!(transcript.is_empty());
    }

    #[test]
    fn test_seeded_work_is_deterministic() {
        let mut a = ServiceManager::with_seed(Transcript::new().console(), 7);
        let mut b = ServiceManager::with_seed(Transcript::new().console(), 7);

        let states_a: Vec<u8> = (0..5).map(|_| a.work()).collect();
        let states_b: Vec<u8> = (0..5).map(|_| b.work()).collect();

        assert_eq!(states_a, states_b);
        assert!(states_a.iter().all(|s| *s < 10));
        assert_eq!(a.state(), states_a.last().copied());
    }

    #[test]
    fn test_work_starts_with_blank_separator() {
        let (mut manager, transcript) = manager();
        manager.attach(SystemUpdateService);
        transcript.clear();

        let state = manager.work();

        let lines = transcript.lines();
        assert_eq!(lines[0], "");
        assert_eq!(lines[1], "System: I'm doing something important.");
        assert_eq!(lines[2], format!("System: My state has just changed to: {state}"));
    }
}
