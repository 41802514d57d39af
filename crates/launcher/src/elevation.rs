//! Linkers that shell out to the host's trusted elevation mechanism
//!
//! The command text only ever contains paths wrapped in single quotes. Paths
//! carrying characters that could escape that quoting are refused before any
//! process is spawned.

use async_trait::async_trait;
use binlink_errors::LauncherError;
use binlink_platform::{CommandOutput, Platform, PlatformContext};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use uuid::Uuid;

use crate::linker::PrivilegedFileLinker;

const OSASCRIPT: &str = "/usr/bin/osascript";
const PKEXEC: &str = "pkexec";

/// AppleScript error numbers for a cancelled or refused authorization prompt
const OSASCRIPT_DENIED_CODES: [&str; 3] = ["(-128)", "(-60005)", "(-60006)"];

/// pkexec: dialog dismissed / not authorized, and authentication failed
const PKEXEC_DENIED_EXIT_CODES: [i32; 2] = [126, 127];

fn shell_quoted(path: &Path, operation: &str) -> Result<String, LauncherError> {
    let invalid = |reason: &str| LauncherError::Io {
        operation: operation.to_string(),
        path: path.display().to_string(),
        message: reason.to_string(),
    };

    let text = path
        .to_str()
        .ok_or_else(|| invalid("path is not valid UTF-8"))?;
    if text
        .chars()
        .any(|c| matches!(c, '\'' | '"' | '\\') || c.is_control())
    {
        return Err(invalid("path contains quote, backslash or control characters"));
    }
    Ok(format!("'{text}'"))
}

fn parent_of(link_path: &Path) -> &Path {
    link_path.parent().unwrap_or(Path::new("/"))
}

fn staging_sibling(link_path: &Path) -> PathBuf {
    let name = link_path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    link_path.with_file_name(format!(".{name}.{}.tmp", Uuid::new_v4().simple()))
}

fn command_failed(operation: &str, link_path: &Path, output: &CommandOutput) -> LauncherError {
    let stderr = output.stderr_text();
    LauncherError::Io {
        operation: operation.to_string(),
        path: link_path.display().to_string(),
        message: if stderr.is_empty() {
            format!("exited with {}", output.status)
        } else {
            stderr
        },
    }
}

/// macOS: `osascript` running `do shell script ... with administrator privileges`
pub struct OsascriptLinker {
    platform: Arc<Platform>,
}

impl OsascriptLinker {
    #[must_use]
    pub fn new(platform: Arc<Platform>) -> Self {
        Self { platform }
    }

    /// AppleScript source that creates the parent directory and force-links
    ///
    /// BSD `ln` has no staged-rename mode; `-h` keeps an existing link to a
    /// directory from being descended into.
    ///
    /// # Errors
    ///
    /// Returns `Io` if a path cannot be quoted safely.
    pub fn script(target: &Path, link_path: &Path) -> Result<String, LauncherError> {
        let parent = shell_quoted(parent_of(link_path), "osascript")?;
        let target = shell_quoted(target, "osascript")?;
        let link = shell_quoted(link_path, "osascript")?;

        Ok(format!(
            "do shell script \"/bin/mkdir -p {parent} && /bin/ln -s -f -h {target} {link}\" \
             with administrator privileges"
        ))
    }

    fn classify(link_path: &Path, output: &CommandOutput) -> Result<(), LauncherError> {
        if output.status.success() {
            return Ok(());
        }
        let stderr = output.stderr_text();
        if OSASCRIPT_DENIED_CODES.iter().any(|code| stderr.contains(code)) {
            return Err(LauncherError::PermissionDenied {
                operation: "osascript".to_string(),
                message: stderr,
            });
        }
        Err(command_failed("osascript", link_path, output))
    }
}

#[async_trait]
impl PrivilegedFileLinker for OsascriptLinker {
    async fn link_atomic(
        &self,
        ctx: &PlatformContext,
        target: &Path,
        link_path: &Path,
    ) -> Result<(), LauncherError> {
        let script = Self::script(target, link_path)?;

        let mut cmd = self.platform.command(OSASCRIPT);
        cmd.args(["-e", script.as_str()]);

        let output = self.platform.execute_command(ctx, cmd).await?;
        Self::classify(link_path, &output)
    }

    fn name(&self) -> &'static str {
        "osascript"
    }
}

/// Linux and other Unix hosts: `pkexec /bin/sh -c ...`
///
/// The new link is staged next to the alias and moved over it with
/// `mv -T`, which is a single `rename(2)`.
pub struct PkexecLinker {
    platform: Arc<Platform>,
}

impl PkexecLinker {
    #[must_use]
    pub fn new(platform: Arc<Platform>) -> Self {
        Self { platform }
    }

    /// Shell script run as root
    ///
    /// # Errors
    ///
    /// Returns `Io` if a path cannot be quoted safely.
    pub fn script(target: &Path, link_path: &Path) -> Result<String, LauncherError> {
        let parent = shell_quoted(parent_of(link_path), "pkexec")?;
        let target = shell_quoted(target, "pkexec")?;
        let link = shell_quoted(link_path, "pkexec")?;
        let staged = shell_quoted(&staging_sibling(link_path), "pkexec")?;

        Ok(format!(
            "mkdir -p {parent} && ln -s {target} {staged} && mv -T -f {staged} {link} \
             || {{ rm -f {staged}; exit 1; }}"
        ))
    }

    fn classify(link_path: &Path, output: &CommandOutput) -> Result<(), LauncherError> {
        match output.status.code() {
            Some(0) => Ok(()),
            Some(code) if PKEXEC_DENIED_EXIT_CODES.contains(&code) => {
                Err(LauncherError::PermissionDenied {
                    operation: "pkexec".to_string(),
                    message: format!("authorization not granted (exit {code})"),
                })
            }
            _ => Err(command_failed("pkexec", link_path, output)),
        }
    }
}

#[async_trait]
impl PrivilegedFileLinker for PkexecLinker {
    async fn link_atomic(
        &self,
        ctx: &PlatformContext,
        target: &Path,
        link_path: &Path,
    ) -> Result<(), LauncherError> {
        let script = Self::script(target, link_path)?;
        let pkexec = self.platform.process().which(PKEXEC).await?;

        let mut cmd = self.platform.command(&pkexec.to_string_lossy());
        cmd.args(["/bin/sh", "-c", script.as_str()]);

        let output = self.platform.execute_command(ctx, cmd).await?;
        Self::classify(link_path, &output)
    }

    fn name(&self) -> &'static str {
        "pkexec"
    }
}
