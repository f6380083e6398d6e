//! The start menu: two power options coordinated by a mediator.
//!
//! ```text
//! Shutdown.shutdown() ─► notify("Shutdown") ─► StartMenu
//!                                                 ├─► Shutdown.write_log() ─► notify("Log")
//!                                                 └─► Shutdown.close_apps() ─► notify("Close")
//!
//! Sleep.suspend() ─────► notify("Sleep") ────► StartMenu
//!                                                 └─► Shutdown.write_log() ─► notify("Log")
//! ```
//!
//! `Log` and `Close` are acknowledgements: the menu routes them to no
//! reaction, which is what keeps re-entry one level deep.

use std::cell::RefCell;
use std::fmt;
use std::rc::{Rc, Weak};

use tracing::{debug, trace, warn};

use crate::core::EventTag;
use crate::error::Result;
use crate::mediator::{Component, Mediator, MediatorLink, Reentry};
use crate::observer::{ServiceId, ServiceManager};
use crate::transcript::Console;

/// The "Shut down" option. Also owns the log/close steps both options need.
pub struct Shutdown {
    link: MediatorLink,
    console: Rc<dyn Console>,
}

impl Shutdown {
    pub fn new(console: Rc<dyn Console>) -> Rc<Self> {
        Rc::new(Self {
            link: MediatorLink::new(),
            console,
        })
    }

    pub fn write_log(&self) -> Result<()> {
        self.link.resolve(self.name())?;
        self.console.line(" * Writing the Log file...");
        self.link.notify(self, EventTag::Log)
    }

    pub fn close_apps(&self) -> Result<()> {
        self.link.resolve(self.name())?;
        self.console.line(" * Closing Apps...");
        self.link.notify(self, EventTag::Close)
    }

    /// User picked "Shut down".
    pub fn shutdown(&self) -> Result<()> {
        self.link.resolve(self.name())?;
        self.console.line("> Shutting down...");
        self.link.notify(self, EventTag::Shutdown)
    }
}

impl Component for Shutdown {
    fn name(&self) -> &'static str {
        "shutdown"
    }

    fn attach(&self, mediator: Weak<dyn Mediator>) {
        self.link.attach(mediator);
    }
}

impl fmt::Debug for Shutdown {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Shutdown").field("link", &self.link).finish()
    }
}

/// The "Sleep" option.
///
/// Optionally disables one observer service before going to sleep.
pub struct Sleep {
    link: MediatorLink,
    console: Rc<dyn Console>,
    standby: RefCell<Option<(Rc<RefCell<ServiceManager>>, ServiceId)>>,
}

impl Sleep {
    pub fn new(console: Rc<dyn Console>) -> Rc<Self> {
        Rc::new(Self {
            link: MediatorLink::new(),
            console,
            standby: RefCell::new(None),
        })
    }

    /// Detach `service` from `manager` whenever the system suspends.
    pub fn disable_on_suspend(&self, manager: Rc<RefCell<ServiceManager>>, service: ServiceId) {
        *self.standby.borrow_mut() = Some((manager, service));
    }

    /// User picked "Sleep".
    pub fn suspend(&self) -> Result<()> {
        self.link.resolve(self.name())?;
        self.console.line("> Suspending...");
        if let Some((manager, service)) = self.standby.borrow().as_ref() {
            let detached = manager.borrow_mut().detach(*service);
            debug!(%service, detached, "disabled service before suspend");
        }
        self.link.notify(self, EventTag::Sleep)
    }
}

impl Component for Sleep {
    fn name(&self) -> &'static str {
        "sleep"
    }

    fn attach(&self, mediator: Weak<dyn Mediator>) {
        self.link.attach(mediator);
    }
}

impl fmt::Debug for Sleep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Sleep")
            .field("link", &self.link)
            .field("standby", &self.standby.borrow().as_ref().map(|(_, id)| *id))
            .finish()
    }
}

/// Mediator routing start menu events between the power options.
pub struct StartMenu {
    shutdown: Rc<Shutdown>,
    sleep: Rc<Sleep>,
    console: Rc<dyn Console>,
    reentry: Reentry,
}

impl StartMenu {
    /// Build the menu around existing components and inject it into each.
    pub fn wire(shutdown: Rc<Shutdown>, sleep: Rc<Sleep>, console: Rc<dyn Console>) -> Rc<Self> {
        let menu = Rc::new(Self {
            shutdown,
            sleep,
            console,
            reentry: Reentry::default(),
        });
        let mediator: Weak<dyn Mediator> = Rc::downgrade(&menu) as Weak<dyn Mediator>;
        menu.shutdown.attach(mediator.clone());
        menu.sleep.attach(mediator);
        menu
    }

    pub fn shutdown(&self) -> &Rc<Shutdown> {
        &self.shutdown
    }

    pub fn sleep(&self) -> &Rc<Sleep> {
        &self.sleep
    }

    fn react(&self, tag: EventTag) -> Result<()> {
        match tag {
            EventTag::Shutdown => {
                self.console.line("System shutting down, please wait for:");
                self.shutdown.write_log()?;
                self.shutdown.close_apps()
            }
            EventTag::Sleep => {
                self.console.line("System goes to sleep, please wait for:");
                self.shutdown.write_log()
            }
            EventTag::Log | EventTag::Close => Ok(()),
        }
    }
}

impl Mediator for StartMenu {
    fn notify(&self, sender: &dyn Component, event: &str) {
        let Some(tag) = EventTag::parse(event) else {
            trace!(sender = sender.name(), event, "ignoring unknown event");
            return;
        };
        let Some(_guard) = self.reentry.enter() else {
            warn!(
                sender = sender.name(),
                %tag,
                depth = self.reentry.depth(),
                "re-entry limit reached, dropping event"
            );
            return;
        };

        debug!(sender = sender.name(), %tag, "routing event");
        if let Err(err) = self.react(tag) {
            warn!(%tag, error = %err, "reaction failed");
        }
    }
}

impl fmt::Debug for StartMenu {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StartMenu")
            .field("shutdown", &self.shutdown)
            .field("sleep", &self.sleep)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SwitchboardError;
    use crate::observer::SystemUpdateService;
    use crate::transcript::Transcript;

    fn wired() -> (Rc<StartMenu>, Transcript) {
        let transcript = Transcript::new();
        let shutdown = Shutdown::new(transcript.console());
        let sleep = Sleep::new(transcript.console());
        let menu = StartMenu::wire(shutdown, sleep, transcript.console());
        (menu, transcript)
    }

    #[test]
    fn test_shutdown_writes_log_then_closes_apps() {
        let (menu, transcript) = wired();

        menu.shutdown().shutdown().unwrap();

        assert_eq!(
            transcript.lines(),
            vec![
                "> Shutting down...",
                "System shutting down, please wait for:",
                " * Writing the Log file...",
                " * Closing Apps...",
            ]
        );
    }

    #[test]
    fn test_sleep_writes_log_only() {
        let (menu, transcript) = wired();

        menu.sleep().suspend().unwrap();

        assert_eq!(
            transcript.lines(),
            vec![
                "> Suspending...",
                "System goes to sleep, please wait for:",
                " * Writing the Log file...",
            ]
        );
        assert_eq!(transcript.count(" * Closing Apps..."), 0);
    }

    #[test]
    fn test_unknown_event_is_ignored() {
        let (menu, transcript) = wired();

        menu.notify(&**menu.shutdown(), "Reboot");
        menu.notify(&**menu.shutdown(), "shutdown");

        assert!(transcript.is_empty());
    }

    #[test]
    fn test_acknowledgement_tags_have_no_reaction() {
        let (menu, transcript) = wired();

        menu.notify(&**menu.shutdown(), "Log");
        menu.notify(&**menu.sleep(), "Close");

        assert!(transcript.is_empty());
    }

    #[test]
    fn test_direct_notify_matches_component_trigger() {
        let (menu, transcript) = wired();

        menu.notify(&**menu.sleep(), "Shutdown");

        assert_eq!(transcript.count(" * Writing the Log file..."), 1);
        assert_eq!(transcript.count(" * Closing Apps..."), 1);
    }

    #[test]
    fn test_unwired_component_errors_without_output() {
        let transcript = Transcript::new();
        let shutdown = Shutdown::new(transcript.console());

        assert_eq!(
            shutdown.shutdown(),
            Err(SwitchboardError::Detached {
                component: "shutdown"
            })
        );
        assert!(transcript.is_empty());
    }

    #[test]
    fn test_dropped_menu_errors() {
        let transcript = Transcript::new();
        let shutdown = Shutdown::new(transcript.console());
        let sleep = Sleep::new(transcript.console());
        let menu = StartMenu::wire(shutdown.clone(), sleep.clone(), transcript.console());
        drop(menu);

        assert_eq!(
            sleep.suspend(),
            Err(SwitchboardError::MediatorDropped { component: "sleep" })
        );
        assert!(transcript.is_empty());
    }

    #[test]
    fn test_suspend_detaches_standby_service() {
        let (menu, transcript) = wired();
        let manager = Rc::new(RefCell::new(ServiceManager::new(transcript.console())));
        let update = manager.borrow_mut().attach(SystemUpdateService);
        menu.sleep().disable_on_suspend(manager.clone(), update);

        menu.sleep().suspend().unwrap();

        assert!(!manager.borrow().contains(update));
    }

    #[test]
    fn test_reentry_depth_returns_to_zero() {
        let (menu, _) = wired();
        menu.shutdown().shutdown().unwrap();
        assert_eq!(menu.reentry.depth(), 0);
    }
}
