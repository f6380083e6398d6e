//! Memento: backups of an originator's state kept by a caretaker.
//!
//! [`Backup`] is the originator, [`Snapshot`] the memento and
//! [`ShadowProtect`] the caretaker holding the history. The caretaker never
//! looks inside a snapshot beyond its display name.

use std::fmt;
use std::rc::Rc;

use chrono::{DateTime, Local};
use tracing::debug;

use crate::transcript::Console;

/// Length of the generated backup identifiers.
const STATE_LEN: usize = 30;

/// Characters of the state shown in a snapshot's name.
const NAME_PREFIX_LEN: usize = 9;

/// Saved originator state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snapshot {
    state: String,
    created_at: DateTime<Local>,
}

impl Snapshot {
    fn new(state: String) -> Self {
        Self {
            state,
            created_at: Local::now(),
        }
    }

    pub fn state(&self) -> &str {
        &self.state
    }

    /// Creation time formatted as `YYYY-MM-DD HH:MM:SS`.
    pub fn date(&self) -> String {
        self.created_at.format("%Y-%m-%d %H:%M:%S").to_string()
    }

    /// `"{date} / ({first nine characters}...)"`
    pub fn name(&self) -> String {
        let prefix: String = self.state.chars().take(NAME_PREFIX_LEN).collect();
        format!("{} / ({}...)", self.date(), prefix)
    }
}

/// The originator. Its work replaces the state with a new backup id.
pub struct Backup {
    state: String,
    console: Rc<dyn Console>,
    rng: fastrand::Rng,
}

impl Backup {
    pub fn new(state: impl Into<String>, console: Rc<dyn Console>) -> Self {
        Self::with_rng(state.into(), console, fastrand::Rng::new())
    }

    /// Deterministic backup ids for [`work`](Self::work).
    pub fn with_seed(state: impl Into<String>, console: Rc<dyn Console>, seed: u64) -> Self {
        Self::with_rng(state.into(), console, fastrand::Rng::with_seed(seed))
    }

    fn with_rng(state: String, console: Rc<dyn Console>, rng: fastrand::Rng) -> Self {
        Self {
            state,
            console,
            rng,
        }
    }

    pub fn state(&self) -> &str {
        &self.state
    }

    /// Run a backup, moving the state to a fresh random id.
    pub fn work(&mut self) {
        self.console
            .line("Backing Up. Do not turn off your computer.");
        let mut letters: Vec<char> = ('a'..='z').chain('A'..='Z').collect();
        self.rng.shuffle(&mut letters);
        self.state = letters.into_iter().take(STATE_LEN).collect();
        self.console.line(&format!(
            "[BACKUP STATUS]: Last backup was successful. See {} for more details.",
            self.state
        ));
    }

    pub fn save(&self) -> Snapshot {
        Snapshot::new(self.state.clone())
    }

    pub fn restore(&mut self, snapshot: &Snapshot) {
        self.state = snapshot.state.clone();
        self.console.line(&format!(
            "[BACKUP STATUS]: Restoring data from {}.",
            self.state
        ));
    }
}

impl fmt::Debug for Backup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Backup").field("state", &self.state).finish()
    }
}

/// The caretaker: owns the originator and its history of snapshots.
pub struct ShadowProtect {
    originator: Backup,
    history: Vec<Snapshot>,
    console: Rc<dyn Console>,
}

impl ShadowProtect {
    pub fn new(originator: Backup, console: Rc<dyn Console>) -> Self {
        Self {
            originator,
            history: Vec::new(),
            console,
        }
    }

    pub fn originator(&self) -> &Backup {
        &self.originator
    }

    pub fn originator_mut(&mut self) -> &mut Backup {
        &mut self.originator
    }

    pub fn history(&self) -> &[Snapshot] {
        &self.history
    }

    /// Save the originator's current state.
    pub fn backup(&mut self) {
        self.console.line("");
        self.console
            .line("ShadowProtect: Saving Originator's state...");
        self.history.push(self.originator.save());
        debug!(depth = self.history.len(), "snapshot saved");
    }

    /// Restore the most recent snapshot. Returns `false` if there was none.
    pub fn undo(&mut self) -> bool {
        let Some(snapshot) = self.history.pop() else {
            return false;
        };
        self.console.line(&format!(
            "ShadowProtect: Restoring state to: {}",
            snapshot.name()
        ));
        self.originator.restore(&snapshot);
        true
    }

    pub fn show_history(&self) {
        self.console
            .line("ShadowProtect: Here's the list of backups:");
        for snapshot in &self.history {
            self.console.line(&snapshot.name());
        }
    }
}

impl fmt::Debug for ShadowProtect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ShadowProtect")
            .field("originator", &self.originator)
            .field("history", &self.history.len())
            .finish()
    }
}
