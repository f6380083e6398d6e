//! Chain of responsibility.
//!
//! A [`Handler`] is one node of a singly-linked chain. Each node wraps a
//! [`Responder`] (the predicate/action pair) and owns its successor. A request
//! walks the chain from the head until some responder accepts it.
//!
//! # Key Properties
//!
//! - **First match wins**: the walk stops at the first accepting responder
//! - **Link order is chain order**: nothing reorders handlers after linking
//! - **Unhandled is not an error**: a request nobody accepts yields `None`
//! - **Requests are read-only**: handlers see `&R` for the whole walk
//!
//! # Example
//!
//! ```ignore
//! use switchboard::{ExactMatch, Handler};
//!
//! let mut drivers = Handler::new(ExactMatch::new("Drivers", "NVIDIA"));
//! drivers
//!     .set_next(Handler::new(ExactMatch::new("Window Manager", "xfce")))
//!     .set_next(Handler::new(ExactMatch::new("Taskbar", "Pico")));
//!
//! assert_eq!(
//!     drivers.handle("xfce").as_deref(),
//!     Some("Window Manager: xfce started...")
//! );
//! assert_eq!(drivers.handle("unknown"), None);
//! ```

use std::fmt;

use serde::Serialize;
use tracing::{debug, trace};

/// The predicate/action pair of a chain node.
///
/// `respond` returns `Some(result)` when this responder services the request,
/// `None` to let the chain forward it.
pub trait Responder<R: ?Sized> {
    /// Human-readable name for tracing and traversal reports.
    fn name(&self) -> &str;

    fn respond(&self, request: &R) -> Option<String>;
}

/// Responder that accepts requests equal to a fixed criterion.
///
/// Produces `"{name}: {request} started..."`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExactMatch {
    name: String,
    criterion: String,
}

impl ExactMatch {
    pub fn new(name: impl Into<String>, criterion: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            criterion: criterion.into(),
        }
    }

    pub fn criterion(&self) -> &str {
        &self.criterion
    }
}

impl<R> Responder<R> for ExactMatch
where
    R: AsRef<str> + ?Sized,
{
    fn name(&self) -> &str {
        &self.name
    }

    fn respond(&self, request: &R) -> Option<String> {
        let request = request.as_ref();
        (request == self.criterion).then(|| format!("{}: {} started...", self.name, request))
    }
}

/// Responder backed by a closure.
pub struct FnResponder<F> {
    name: String,
    f: F,
}

impl<F> FnResponder<F> {
    pub fn new(name: impl Into<String>, f: F) -> Self {
        Self {
            name: name.into(),
            f,
        }
    }
}

impl<R, F> Responder<R> for FnResponder<F>
where
    R: ?Sized,
    F: Fn(&R) -> Option<String>,
{
    fn name(&self) -> &str {
        &self.name
    }

    fn respond(&self, request: &R) -> Option<String> {
        (self.f)(request)
    }
}

/// Outcome of walking a chain with [`Handler::handle_traced`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Dispatch {
    /// The accepting handler's result, `None` if unhandled.
    pub result: Option<String>,
    /// Name of the handler that produced `result`.
    pub handled_by: Option<String>,
    /// Every handler the request reached, in walk order.
    pub visited: Vec<String>,
}

impl Dispatch {
    pub fn is_handled(&self) -> bool {
        self.result.is_some()
    }
}

/// One node of a responsibility chain.
///
/// The node owns its successor; there are no back-links.
pub struct Handler<R: ?Sized> {
    responder: Box<dyn Responder<R>>,
    next: Option<Box<Handler<R>>>,
}

impl<R: ?Sized> Handler<R> {
    /// Create an unlinked handler.
    pub fn new(responder: impl Responder<R> + 'static) -> Self {
        Self {
            responder: Box::new(responder),
            next: None,
        }
    }

    pub fn name(&self) -> &str {
        self.responder.name()
    }

    /// Link `next` as this handler's successor and return it.
    ///
    /// Returning the argument allows fluent linking:
    /// `a.set_next(b).set_next(c)` links a→b and b→c. Any previous successor
    /// (and everything after it) is dropped.
    pub fn set_next(&mut self, next: Handler<R>) -> &mut Handler<R> {
        &mut **self.next.insert(Box::new(next))
    }

    /// Detach and return this handler's successor, leaving it terminal.
    pub fn take_next(&mut self) -> Option<Handler<R>> {
        self.next.take().map(|boxed| *boxed)
    }

    pub fn next(&self) -> Option<&Handler<R>> {
        self.next.as_deref()
    }

    pub fn is_terminal(&self) -> bool {
        self.next.is_none()
    }

    /// Iterate this handler and every successor in chain order.
    pub fn iter(&self) -> Links<'_, R> {
        Links { cursor: Some(self) }
    }

    /// Service `request` here or forward it down the chain.
    pub fn handle(&self, request: &R) -> Option<String> {
        for handler in self.iter() {
            if let Some(result) = handler.responder.respond(request) {
                debug!(handler = handler.name(), "request serviced");
                return Some(result);
            }
            trace!(handler = handler.name(), "forwarding request");
        }
        debug!("request reached the end of the chain unhandled");
        None
    }

    /// Like [`handle`](Self::handle), also reporting which handlers were visited.
    pub fn handle_traced(&self, request: &R) -> Dispatch {
        let mut visited = Vec::new();
        for handler in self.iter() {
            visited.push(handler.name().to_string());
            if let Some(result) = handler.responder.respond(request) {
                return Dispatch {
                    result: Some(result),
                    handled_by: Some(handler.name().to_string()),
                    visited,
                };
            }
        }
        Dispatch {
            result: None,
            handled_by: None,
            visited,
        }
    }

    fn tail_mut(&mut self) -> &mut Handler<R> {
        let mut node = self;
        loop {
            match node.next {
                Some(ref mut next) => node = &mut **next,
                None => return node,
            }
        }
    }
}

// Unlink iteratively so long chains don't overflow the stack on drop.
impl<R: ?Sized> Drop for Handler<R> {
    fn drop(&mut self) {
        let mut next = self.next.take();
        while let Some(mut node) = next {
            next = node.next.take();
        }
    }
}

impl<R: ?Sized> fmt::Debug for Handler<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Handler")
            .field("name", &self.name())
            .field("next", &self.next().map(|n| n.name()))
            .finish()
    }
}

/// Iterator over a handler and its successors.
pub struct Links<'a, R: ?Sized> {
    cursor: Option<&'a Handler<R>>,
}

impl<'a, R: ?Sized> Iterator for Links<'a, R> {
    type Item = &'a Handler<R>;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.cursor?;
        self.cursor = current.next.as_deref();
        Some(current)
    }
}

/// Owner of a chain's head with append-style construction.
///
/// ```ignore
/// let chain = HandlerChain::new()
///     .with_handler(ExactMatch::new("Drivers", "NVIDIA"))
///     .with_handler(ExactMatch::new("Taskbar", "Pico"));
/// ```
pub struct HandlerChain<R: ?Sized> {
    head: Option<Handler<R>>,
}

impl<R: ?Sized> HandlerChain<R> {
    pub fn new() -> Self {
        Self { head: None }
    }

    /// Start a chain from an already linked head.
    pub fn from_head(head: Handler<R>) -> Self {
        Self { head: Some(head) }
    }

    /// Append a responder at the tail of the chain.
    pub fn with_handler(mut self, responder: impl Responder<R> + 'static) -> Self {
        self.push(Handler::new(responder));
        self
    }

    /// Append a handler (and anything already linked after it) at the tail.
    pub fn push(&mut self, handler: Handler<R>) {
        match self.head {
            Some(ref mut head) => {
                head.tail_mut().set_next(handler);
            }
            None => self.head = Some(handler),
        }
    }

    pub fn head(&self) -> Option<&Handler<R>> {
        self.head.as_ref()
    }

    pub fn len(&self) -> usize {
        self.iter().count()
    }

    pub fn is_empty(&self) -> bool {
        self.head.is_none()
    }

    /// Handler names in chain order.
    pub fn names(&self) -> Vec<String> {
        self.iter().map(|h| h.name().to_string()).collect()
    }

    pub fn iter(&self) -> Links<'_, R> {
        Links {
            cursor: self.head.as_ref(),
        }
    }

    pub fn handle(&self, request: &R) -> Option<String> {
        self.head.as_ref().and_then(|head| head.handle(request))
    }

    pub fn handle_traced(&self, request: &R) -> Dispatch {
        match self.head {
            Some(ref head) => head.handle_traced(request),
            None => Dispatch {
                result: None,
                handled_by: None,
                visited: Vec::new(),
            },
        }
    }
}

impl<R: ?Sized> Default for HandlerChain<R> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: ?Sized> fmt::Debug for HandlerChain<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HandlerChain")
            .field("handlers", &self.names())
            .finish()
    }
}
