//! Turns the merged configuration into a ready installer

use binlink_config::{Config, LauncherConfig};
use binlink_events::EventSender;
use binlink_launcher::{
    resources_dir_from_executable, AliasPath, ExecutableLocation, LaunchLayout, LauncherInstaller,
};
use std::path::{Path, PathBuf};

use crate::cli::GlobalArgs;
use crate::error::CliError;

/// Apply CLI configuration overrides (highest precedence)
pub fn apply_cli_config(config: &mut Config, global: &GlobalArgs) {
    config.general.json |= global.json;
    config.general.debug |= global.debug;
    config.launcher.packaged |= global.packaged;

    if let Some(dir) = &global.resources_dir {
        config.launcher.resources_dir = Some(dir.clone());
    }
    if let Some(alias) = &global.alias {
        config.launcher.alias_path = Some(alias.clone());
    }
}

/// Run-mode layout, with unset directories filled from the process
///
/// The resources directory defaults to the one belonging to `current_exe`.
pub fn launch_layout(launcher: &LauncherConfig, cwd: PathBuf, current_exe: &Path) -> LaunchLayout {
    LaunchLayout {
        packaged: launcher.packaged,
        resources_dir: launcher
            .resources_dir
            .clone()
            .unwrap_or_else(|| resources_dir_from_executable(current_exe)),
        cwd: launcher.cwd.clone().unwrap_or(cwd),
    }
}

/// Installer for the host, reporting on `event_sender`
pub fn build_installer(
    config: &Config,
    event_sender: EventSender,
) -> Result<LauncherInstaller, CliError> {
    let cwd = std::env::current_dir()?;
    let current_exe = std::env::current_exe()?;
    let layout = launch_layout(&config.launcher, cwd, &current_exe);

    let location = ExecutableLocation::resolve(&layout, &config.launcher.executable_name)?;
    let alias = AliasPath::new(config.launcher.alias_path())?;
    tracing::debug!(
        packaged = layout.packaged,
        location = %location,
        alias = %alias,
        "Resolved launcher paths"
    );

    Ok(LauncherInstaller::for_host(location, alias).with_event_sender(Some(event_sender)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    fn global(args: &[&str]) -> GlobalArgs {
        let mut argv = vec!["binlink"];
        argv.extend_from_slice(args);
        argv.push("status");
        crate::cli::Cli::try_parse_from(argv).unwrap().global
    }

    #[test]
    fn test_cli_overrides_config() {
        let mut config = Config::default();
        config.launcher.resources_dir = Some(PathBuf::from("/from/file"));

        apply_cli_config(
            &mut config,
            &global(&["--packaged", "--resources-dir", "/from/cli", "--alias", "/opt/bin/x"]),
        );

        assert!(config.launcher.packaged);
        assert_eq!(config.launcher.resources_dir, Some(PathBuf::from("/from/cli")));
        assert_eq!(config.launcher.alias_path(), PathBuf::from("/opt/bin/x"));
    }

    #[test]
    fn test_absent_flags_keep_config() {
        let mut config = Config::default();
        config.launcher.packaged = true;
        config.launcher.resources_dir = Some(PathBuf::from("/from/file"));

        apply_cli_config(&mut config, &global(&[]));

        assert!(config.launcher.packaged);
        assert_eq!(config.launcher.resources_dir, Some(PathBuf::from("/from/file")));
    }

    #[test]
    fn test_layout_defaults_from_bundle() {
        let mut config = Config::default();
        config.launcher.packaged = true;

        let layout = launch_layout(
            &config.launcher,
            PathBuf::from("/"),
            Path::new("/Applications/App.app/Contents/MacOS/App"),
        );
        assert_eq!(
            layout.resources_dir,
            PathBuf::from("/Applications/App.app/Contents/Resources")
        );

        let location = ExecutableLocation::resolve(&layout, "app-bin").unwrap();
        assert_eq!(
            location.as_path(),
            Path::new("/Applications/App.app/Contents/Resources/app-bin")
        );
    }

    #[test]
    fn test_layout_prefers_configured_cwd() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = Config::default();
        config.launcher.cwd = Some(dir.path().join("app"));

        let layout = launch_layout(&config.launcher, PathBuf::from("/elsewhere"), Path::new("/x/y"));
        let location = ExecutableLocation::resolve(&layout, "app-bin").unwrap();

        assert_eq!(location.as_path(), dir.path().join("app-bin"));
    }
}
