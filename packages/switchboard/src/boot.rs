//! Boot chain: drivers, window manager and taskbar handlers.
//!
//! Each boot stage recognises exactly one piece of software. A request names
//! the software to start and walks the chain until a stage claims it.

use crate::chain::{Dispatch, HandlerChain, Responder};
use crate::transcript::Console;

/// Software requested when nothing else is configured.
pub const DEFAULT_REQUESTS: [&str; 3] = ["NVIDIA", "Pico", "xfce"];

/// Line printed for a request no stage accepted.
pub const UNHANDLED_LINE: &str = "[INFO] Error, service could not start.";

/// Graphics driver stage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Drivers {
    vendor: String,
}

impl Drivers {
    pub fn new(vendor: impl Into<String>) -> Self {
        Self {
            vendor: vendor.into(),
        }
    }
}

impl Default for Drivers {
    fn default() -> Self {
        Self::new("NVIDIA")
    }
}

impl Responder<str> for Drivers {
    fn name(&self) -> &str {
        "Drivers"
    }

    fn respond(&self, request: &str) -> Option<String> {
        (request == self.vendor).then(|| format!("Drivers: {request} started..."))
    }
}

/// Window manager stage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WindowManager {
    session: String,
}

impl WindowManager {
    pub fn new(session: impl Into<String>) -> Self {
        Self {
            session: session.into(),
        }
    }
}

impl Default for WindowManager {
    fn default() -> Self {
        Self::new("xfce")
    }
}

impl Responder<str> for WindowManager {
    fn name(&self) -> &str {
        "Window Manager"
    }

    fn respond(&self, request: &str) -> Option<String> {
        (request == self.session).then(|| format!("Window Manager: {request} started..."))
    }
}

/// Taskbar stage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Taskbar {
    panel: String,
}

impl Taskbar {
    pub fn new(panel: impl Into<String>) -> Self {
        Self {
            panel: panel.into(),
        }
    }
}

impl Default for Taskbar {
    fn default() -> Self {
        Self::new("Pico")
    }
}

impl Responder<str> for Taskbar {
    fn name(&self) -> &str {
        "Taskbar"
    }

    fn respond(&self, request: &str) -> Option<String> {
        (request == self.panel).then(|| format!("Taskbar: {request} started..."))
    }
}

/// Drivers → Window Manager → Taskbar, with default criteria.
pub fn boot_chain() -> HandlerChain<str> {
    HandlerChain::new()
        .with_handler(Drivers::default())
        .with_handler(WindowManager::default())
        .with_handler(Taskbar::default())
}

/// Try to start one piece of software, reporting the outcome on `console`.
pub fn start(chain: &HandlerChain<str>, software: &str, console: &dyn Console) -> Dispatch {
    console.line(&format!("Trying to start {software}..."));
    let dispatch = chain.handle_traced(software);
    match dispatch.result {
        Some(ref result) => console.line(&format!("[INFO] {result}")),
        None => console.line(UNHANDLED_LINE),
    }
    dispatch
}

/// [`start`] every request in order.
pub fn start_all<S: AsRef<str>>(
    chain: &HandlerChain<str>,
    software: &[S],
    console: &dyn Console,
) -> Vec<Dispatch> {
    software
        .iter()
        .map(|s| start(chain, s.as_ref(), console))
        .collect()
}
