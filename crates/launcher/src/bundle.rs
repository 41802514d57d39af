//! Application bundle lookups

use binlink_errors::LauncherError;
use binlink_platform::{CommandOutput, Platform, PlatformCommand, PlatformContext};
use std::path::{Path, PathBuf};
use std::sync::Arc;

const APP_BUNDLE_EXTENSION: &str = "app";
const OPEN: &str = "/usr/bin/open";

/// Innermost `*.app` directory enclosing `path`
///
/// Used to get from the path an alias resolves to back to the bundle that
/// should be opened.
///
/// # Errors
///
/// Returns `BundleNotFound` if no ancestor has the bundle extension.
pub fn bundle_root(path: &Path) -> Result<PathBuf, LauncherError> {
    path.ancestors()
        .find(|p| {
            p.extension()
                .is_some_and(|ext| ext.eq_ignore_ascii_case(APP_BUNDLE_EXTENSION))
        })
        .map(Path::to_path_buf)
        .ok_or_else(|| LauncherError::BundleNotFound {
            path: path.display().to_string(),
        })
}

/// Packaged resources directory for a bundled executable
///
/// `X.app/Contents/MacOS/exe` maps to `X.app/Contents/Resources`; anything
/// outside a bundle maps to the executable's own directory.
#[must_use]
pub fn resources_dir_from_executable(executable: &Path) -> PathBuf {
    let exe_dir = executable.parent().unwrap_or(Path::new("/"));
    match (exe_dir.file_name(), exe_dir.parent()) {
        (Some(name), Some(contents))
            if name == "MacOS" && contents.file_name().is_some_and(|n| n == "Contents") =>
        {
            contents.join("Resources")
        }
        _ => exe_dir.to_path_buf(),
    }
}

/// Launches an application bundle through Launch Services (`open -a`)
pub struct BundleOpener {
    platform: Arc<Platform>,
}

impl BundleOpener {
    #[must_use]
    pub fn new(platform: Arc<Platform>) -> Self {
        Self { platform }
    }

    /// The `open -a <bundle>` invocation for `bundle`
    #[must_use]
    pub fn command(&self, bundle: &Path) -> PlatformCommand {
        let mut cmd = self.platform.command(OPEN);
        cmd.args(["-a", bundle.to_string_lossy().as_ref()]);
        cmd
    }

    /// Open `bundle`, returning once `open` has handed it off
    ///
    /// # Errors
    ///
    /// Returns `Io` if `open` cannot be spawned or exits non-zero.
    pub async fn open(&self, ctx: &PlatformContext, bundle: &Path) -> Result<(), LauncherError> {
        let output = self
            .platform
            .execute_command(ctx, self.command(bundle))
            .await?;
        Self::classify(bundle, &output)
    }

    fn classify(bundle: &Path, output: &CommandOutput) -> Result<(), LauncherError> {
        if output.status.success() {
            return Ok(());
        }
        let stderr = output.stderr_text();
        Err(LauncherError::Io {
            operation: "open".to_string(),
            path: bundle.display().to_string(),
            message: if stderr.is_empty() {
                format!("exited with {}", output.status)
            } else {
                stderr
            },
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bundle_root_from_resource() {
        let root =
            bundle_root(Path::new("/Applications/App.app/Contents/Resources/app-bin")).unwrap();
        assert_eq!(root, PathBuf::from("/Applications/App.app"));
    }

    #[test]
    fn test_bundle_root_innermost() {
        let root = bundle_root(Path::new(
            "/Applications/Outer.app/Contents/Helpers/Inner.app/Contents/MacOS/inner",
        ))
        .unwrap();
        assert_eq!(
            root,
            PathBuf::from("/Applications/Outer.app/Contents/Helpers/Inner.app")
        );
    }

    #[test]
    fn test_bundle_root_missing() {
        let err = bundle_root(Path::new("/usr/local/bin/app-bin")).unwrap_err();
        assert!(matches!(err, LauncherError::BundleNotFound { .. }));
    }

    #[test]
    fn test_resources_dir_from_executable() {
        assert_eq!(
            resources_dir_from_executable(Path::new("/Applications/App.app/Contents/MacOS/App")),
            PathBuf::from("/Applications/App.app/Contents/Resources")
        );
        assert_eq!(
            resources_dir_from_executable(Path::new("/opt/app/bin/app")),
            PathBuf::from("/opt/app/bin")
        );
    }

    #[test]
    fn test_open_command() {
        let opener = BundleOpener::new(Arc::new(Platform::current()));
        let cmd = opener.command(Path::new("/Applications/My App.app"));
        assert_eq!(cmd.program(), "/usr/bin/open");
        assert_eq!(cmd.get_args(), ["-a", "/Applications/My App.app"]);
    }

    #[cfg(unix)]
    #[test]
    fn test_open_exit_status() {
        use std::os::unix::process::ExitStatusExt;
        use std::process::ExitStatus;

        let bundle = Path::new("/Applications/App.app");
        let output = |code: i32, stderr: &str| CommandOutput {
            status: ExitStatus::from_raw(code << 8),
            stdout: Vec::new(),
            stderr: stderr.as_bytes().to_vec(),
        };

        assert!(BundleOpener::classify(bundle, &output(0, "")).is_ok());

        let err = BundleOpener::classify(
            bundle,
            &output(1, "Unable to find application named 'App.app'"),
        )
        .unwrap_err();
        assert!(err.is_io());
        assert!(err.to_string().contains("Unable to find application"));

        let err = BundleOpener::classify(bundle, &output(1, "")).unwrap_err();
        assert!(err.to_string().starts_with("open failed for /Applications/App.app: exited with"));
    }
}
