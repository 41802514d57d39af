//! Derived installation state

use binlink_platform::LinkInspection;
use std::fmt;
use std::path::PathBuf;

use crate::location::ExecutableLocation;

/// Whether the alias currently resolves to the executable
///
/// Never stored; recomputed from the filesystem on every check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InstallationState {
    Installed,
    NotInstalled(NotInstalledReason),
}

/// Why an alias does not count as installed
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NotInstalledReason {
    /// Nothing at the alias path
    Missing,
    /// A regular file or directory occupies the alias path
    NotSymlink,
    /// A symlink to some other path
    WrongTarget(PathBuf),
    /// The alias could not be inspected
    Unreadable(String),
}

impl InstallationState {
    /// Classify an inspected alias against the expected executable
    #[must_use]
    pub fn from_inspection(inspection: LinkInspection, expected: &ExecutableLocation) -> Self {
        match inspection {
            LinkInspection::Symlink(target) if expected.matches(&target) => Self::Installed,
            LinkInspection::Symlink(target) => {
                Self::NotInstalled(NotInstalledReason::WrongTarget(target))
            }
            LinkInspection::Missing => Self::NotInstalled(NotInstalledReason::Missing),
            LinkInspection::NotSymlink => Self::NotInstalled(NotInstalledReason::NotSymlink),
            LinkInspection::Unreadable(message) => {
                Self::NotInstalled(NotInstalledReason::Unreadable(message))
            }
        }
    }

    #[must_use]
    pub fn is_installed(&self) -> bool {
        matches!(self, Self::Installed)
    }
}

impl fmt::Display for InstallationState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Installed => f.write_str("installed"),
            Self::NotInstalled(reason) => write!(f, "not installed ({reason})"),
        }
    }
}

impl fmt::Display for NotInstalledReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Missing => f.write_str("alias missing"),
            Self::NotSymlink => f.write_str("alias is not a symbolic link"),
            Self::WrongTarget(target) => write!(f, "alias points to {}", target.display()),
            Self::Unreadable(message) => write!(f, "alias unreadable: {message}"),
        }
    }
}
