//! Where the embedded executable lives and where its alias goes

use binlink_errors::LauncherError;
use std::ffi::OsStr;
use std::fmt;
use std::path::{Component, Path, PathBuf};

/// Run-mode inputs that determine the executable location
///
/// Passed in explicitly instead of being read from process globals.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LaunchLayout {
    /// Running from a finalized distribution bundle
    pub packaged: bool,
    /// Packaged resources directory
    pub resources_dir: PathBuf,
    /// Working directory of a development run
    pub cwd: PathBuf,
}

/// Absolute path to the application's embedded executable
///
/// Computed once at startup; immutable afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecutableLocation(PathBuf);

impl ExecutableLocation {
    /// Resolve the executable for a run mode.
    ///
    /// Packaged: `resources_dir/<name>`. Development: the sibling of the
    /// working directory, `cwd/../<name>`. Relative resource directories are
    /// taken relative to `cwd`; `.` and `..` are collapsed lexically.
    ///
    /// # Errors
    ///
    /// Returns `InvalidLocation` if the name is not a single path component or
    /// the result is not absolute.
    pub fn resolve(layout: &LaunchLayout, executable_name: &str) -> Result<Self, LauncherError> {
        let name = Path::new(executable_name);
        if executable_name.is_empty()
            || name.components().count() != 1
            || !matches!(name.components().next(), Some(Component::Normal(_)))
        {
            return Err(LauncherError::InvalidLocation {
                path: executable_name.to_string(),
                reason: "executable name must be a single path component".to_string(),
            });
        }

        let joined = if layout.packaged {
            layout.cwd.join(&layout.resources_dir).join(name)
        } else {
            layout.cwd.join("..").join(name)
        };

        Self::from_path(normalize_lexically(&joined))
    }

    /// Wrap an already-known absolute path
    ///
    /// # Errors
    ///
    /// Returns `InvalidLocation` if the path is relative.
    pub fn from_path(path: impl Into<PathBuf>) -> Result<Self, LauncherError> {
        let path = path.into();
        if !path.is_absolute() {
            return Err(LauncherError::InvalidLocation {
                path: path.display().to_string(),
                reason: "path is not absolute".to_string(),
            });
        }
        Ok(Self(path))
    }

    #[must_use]
    pub fn as_path(&self) -> &Path {
        &self.0
    }

    /// Byte-for-byte comparison against a link's target text
    #[must_use]
    pub fn matches(&self, link_target: &Path) -> bool {
        self.0.as_os_str() == link_target.as_os_str()
    }
}

impl fmt::Display for ExecutableLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.display().fmt(f)
    }
}

/// Fixed location of the command-line alias
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AliasPath(PathBuf);

impl AliasPath {
    /// # Errors
    ///
    /// Returns `InvalidLocation` if the path is relative or has no parent directory.
    pub fn new(path: impl Into<PathBuf>) -> Result<Self, LauncherError> {
        let path = path.into();
        let has_parent = path
            .parent()
            .is_some_and(|p| !p.as_os_str().is_empty());
        if !path.is_absolute() || !has_parent || path.file_name().is_none() {
            return Err(LauncherError::InvalidLocation {
                path: path.display().to_string(),
                reason: "alias must be an absolute path to a file".to_string(),
            });
        }
        Ok(Self(path))
    }

    /// `dir/<name>`
    ///
    /// # Errors
    ///
    /// Same conditions as [`AliasPath::new`].
    pub fn in_dir(dir: &Path, name: impl AsRef<OsStr>) -> Result<Self, LauncherError> {
        Self::new(dir.join(name.as_ref()))
    }

    #[must_use]
    pub fn as_path(&self) -> &Path {
        &self.0
    }

    /// Directory that must exist before the link can be created
    #[must_use]
    pub fn parent(&self) -> &Path {
        // Checked non-empty in the constructor
        self.0.parent().unwrap_or(Path::new("/"))
    }
}

impl fmt::Display for AliasPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.display().fmt(f)
    }
}

/// Collapse `.` and `..` without touching the filesystem
fn normalize_lexically(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                // `..` at the root stays at the root
                if !out.pop() && !path.is_absolute() {
                    out.push("..");
                }
            }
            other => out.push(other.as_os_str()),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn layout(packaged: bool) -> LaunchLayout {
        LaunchLayout {
            packaged,
            resources_dir: PathBuf::from("/Applications/App.app/Contents/Resources"),
            cwd: PathBuf::from("/home/dev/project/app"),
        }
    }

    #[test]
    fn test_packaged_uses_resources_dir() {
        let location = ExecutableLocation::resolve(&layout(true), "app-bin").unwrap();
        assert_eq!(
            location.as_path(),
            Path::new("/Applications/App.app/Contents/Resources/app-bin")
        );
    }

    #[test]
    fn test_development_uses_parent_of_cwd() {
        let location = ExecutableLocation::resolve(&layout(false), "app-bin").unwrap();
        assert_eq!(location.as_path(), Path::new("/home/dev/project/app-bin"));
    }

    #[test]
    fn test_relative_resources_dir_anchored_at_cwd() {
        let layout = LaunchLayout {
            packaged: true,
            resources_dir: PathBuf::from("./dist/../resources"),
            cwd: PathBuf::from("/srv/app"),
        };
        let location = ExecutableLocation::resolve(&layout, "app-bin").unwrap();
        assert_eq!(location.as_path(), Path::new("/srv/app/resources/app-bin"));
    }

    #[test]
    fn test_development_at_root_stays_absolute() {
        let layout = LaunchLayout {
            packaged: false,
            resources_dir: PathBuf::new(),
            cwd: PathBuf::from("/"),
        };
        let location = ExecutableLocation::resolve(&layout, "app-bin").unwrap();
        assert_eq!(location.as_path(), Path::new("/app-bin"));
    }

    #[test]
    fn test_rejects_bad_inputs() {
        assert!(ExecutableLocation::resolve(&layout(true), "bin/app").is_err());
        assert!(ExecutableLocation::resolve(&layout(true), "..").is_err());
        assert!(ExecutableLocation::resolve(&layout(true), "").is_err());

        let relative = LaunchLayout {
            packaged: false,
            resources_dir: PathBuf::new(),
            cwd: PathBuf::from("project"),
        };
        assert!(ExecutableLocation::resolve(&relative, "app-bin").is_err());

        assert!(AliasPath::new("bin/app").is_err());
        assert!(AliasPath::new("/").is_err());
    }

    #[test]
    fn test_match_is_byte_exact() {
        let location = ExecutableLocation::from_path("/opt/app/bin").unwrap();
        assert!(location.matches(Path::new("/opt/app/bin")));
        assert!(!location.matches(Path::new("/opt/app/./bin")));
        assert!(!location.matches(Path::new("/opt/app/bin/")));
    }
}
