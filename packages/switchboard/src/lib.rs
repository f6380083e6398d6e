//! # Switchboard
//!
//! Two small coordination mechanisms, shown on a toy operating system:
//! a chain of responsibility that decides which boot stage starts a piece of
//! software, and a mediator that routes start menu events between power
//! options that never reference each other.
//!
//! ## Architecture
//!
//! ```text
//! request ─► Handler ─► Handler ─► Handler ─► None
//!              │           │          │
//!              └───────────┴──────────┴─► Some(result)   (first match wins)
//!
//! Component ──notify(tag)──► Mediator ──► other Component methods
//!     ▲                                          │
//!     └──────────── notify(tag) ◄────────────────┘      (one level of re-entry)
//! ```
//!
//! Every status line flows through a [`Console`]; the order of those lines is
//! the observable behavior of each scenario. Tests record it with a
//! [`Transcript`].
//!
//! ## Key Invariants
//!
//! 1. **First match wins** - a request is serviced by exactly one handler or by none
//! 2. **Unhandled is not an error** - an unmatched request yields `None`
//! 3. **Closed vocabulary** - the mediator reacts only to known [`EventTag`]s
//!    and silently ignores everything else
//! 4. **Bounded re-entry** - a reaction may re-enter the mediator once, never deeper
//! 5. **No ownership cycles** - mediators own components, components hold `Weak`
//!    back-references
//!
//! ## Example
//!
//! ```ignore
//! use switchboard::{boot, Shutdown, Sleep, StartMenu, Stdout};
//! use std::rc::Rc;
//!
//! let console: Rc<dyn switchboard::Console> = Rc::new(Stdout);
//!
//! // Chain of responsibility
//! let chain = boot::boot_chain();
//! boot::start_all(&chain, &["NVIDIA", "xfce", "unknown"], console.as_ref());
//!
//! // Mediator: build components, then the menu, which injects itself
//! let shutdown = Shutdown::new(console.clone());
//! let sleep = Sleep::new(console.clone());
//! let menu = StartMenu::wire(shutdown, sleep, console);
//! menu.shutdown().shutdown()?;
//! ```
//!
//! Alongside the two core mechanisms the crate carries the other behavioral
//! scenarios of the start menu: an observer ([`ServiceManager`]), a memento
//! ([`ShadowProtect`]) and a strategy ([`Bios`]).

// Core modules
mod chain;
mod core;
mod error;
mod mediator;
mod start_menu;
mod transcript;

// Scenarios
pub mod boot;
pub mod memento;
pub mod observer;
pub mod strategy;


// Re-export chain types
pub use chain::{Dispatch, ExactMatch, FnResponder, Handler, HandlerChain, Links, Responder};

// Re-export mediator types
pub use crate::core::EventTag;
pub use mediator::{Component, Mediator, MediatorLink, Reentry, ReentryGuard, MAX_REENTRY};
pub use start_menu::{Shutdown, Sleep, StartMenu};

// Re-export error types
pub use crate::error::{Result, SwitchboardError};

// Re-export console types
pub use transcript::{Console, Stdout, Transcript};

// Re-export scenario entry points
pub use memento::{Backup, ShadowProtect, Snapshot};
pub use observer::{Service, ServiceId, ServiceManager, SystemTimeService, SystemUpdateService};
pub use strategy::{Arch, Bios, OperatingSystem, OsChoice, Ubuntu};
