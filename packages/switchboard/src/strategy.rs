//! Strategy: the BIOS boots whichever operating system it was given.

use std::fmt;
use std::rc::Rc;
use std::str::FromStr;

use crate::error::{Result, SwitchboardError};
use crate::transcript::Console;

/// A bootable operating system.
pub trait OperatingSystem {
    fn name(&self) -> &'static str;

    /// Boot banner for this system.
    fn boot(&self) -> String;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct Ubuntu;

impl OperatingSystem for Ubuntu {
    fn name(&self) -> &'static str {
        "ubuntu"
    }

    fn boot(&self) -> String {
        "Ubuntu 8.04, kernel".to_string()
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct Arch;

impl OperatingSystem for Arch {
    fn name(&self) -> &'static str {
        "arch"
    }

    fn boot(&self) -> String {
        "ArchLinux 16.0".to_string()
    }
}

/// Operating systems selectable by name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OsChoice {
    Ubuntu,
    Arch,
}

impl OsChoice {
    pub fn into_os(self) -> Box<dyn OperatingSystem> {
        match self {
            OsChoice::Ubuntu => Box::new(Ubuntu),
            OsChoice::Arch => Box::new(Arch),
        }
    }
}

impl FromStr for OsChoice {
    type Err = SwitchboardError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "ubuntu" => Ok(OsChoice::Ubuntu),
            "arch" | "archlinux" => Ok(OsChoice::Arch),
            _ => Err(SwitchboardError::UnknownOperatingSystem {
                name: s.to_string(),
            }),
        }
    }
}

/// The context holding the current boot strategy.
pub struct Bios {
    os: Box<dyn OperatingSystem>,
    console: Rc<dyn Console>,
}

impl Bios {
    pub fn new(os: Box<dyn OperatingSystem>, console: Rc<dyn Console>) -> Self {
        Self { os, console }
    }

    pub fn os(&self) -> &dyn OperatingSystem {
        self.os.as_ref()
    }

    /// Swap the boot strategy.
    pub fn set_os(&mut self, os: Box<dyn OperatingSystem>) {
        self.os = os;
    }

    /// Boot the selected system. Returns its banner.
    pub fn boot_loader(&self) -> String {
        self.console.line("GRUB: Booting the selected OS.");
        let banner = self.os.boot();
        self.console
            .line(&format!("{banner} Starting... Please wait"));
        banner
    }
}

impl fmt::Debug for Bios {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Bios").field("os", &self.os.name()).finish()
    }
}
