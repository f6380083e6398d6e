//! Console sinks for status lines.
//!
//! Every status line a component, handler driver, or service produces goes
//! through a [`Console`]. The order of those lines is the only observable
//! contract of a scenario, so tests swap [`Stdout`] for a [`Transcript`] and
//! assert on the recorded sequence.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

/// A sink for human-readable status lines.
pub trait Console {
    /// Emit one line. Implementations must preserve call order.
    fn line(&self, line: &str);
}

/// Writes each line to standard output.
#[derive(Debug, Default, Clone, Copy)]
pub struct Stdout;

impl Console for Stdout {
    fn line(&self, line: &str) {
        println!("{line}");
    }
}

/// In-memory recorder of status lines.
///
/// Clones share the same buffer, so a test can hand one clone to the
/// components under test and keep another to inspect.
///
/// # Example
///
/// ```ignore
/// let transcript = Transcript::new();
/// let shutdown = Shutdown::new(transcript.console());
/// // ...
/// assert_eq!(transcript.lines()[0], "> Shutting down...");
/// ```
#[derive(Clone, Default)]
pub struct Transcript {
    lines: Rc<RefCell<Vec<String>>>,
}

impl Transcript {
    pub fn new() -> Self {
        Self::default()
    }

    /// A shareable console handle writing into this transcript.
    pub fn console(&self) -> Rc<dyn Console> {
        Rc::new(self.clone())
    }

    /// Snapshot of every line recorded so far.
    pub fn lines(&self) -> Vec<String> {
        self.lines.borrow().clone()
    }

    pub fn len(&self) -> usize {
        self.lines.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.borrow().is_empty()
    }

    /// Number of recorded lines exactly equal to `line`.
    pub fn count(&self, line: &str) -> usize {
        self.lines.borrow().iter().filter(|l| *l == line).count()
    }

    /// Whether any recorded line contains `needle`.
    pub fn contains(&self, needle: &str) -> bool {
        self.lines.borrow().iter().any(|l| l.contains(needle))
    }

    pub fn clear(&self) {
        self.lines.borrow_mut().clear();
    }
}

impl Console for Transcript {
    fn line(&self, line: &str) {
        self.lines.borrow_mut().push(line.to_string());
    }
}

impl fmt::Debug for Transcript {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Transcript")
            .field("lines", &self.len())
            .finish()
    }
}
