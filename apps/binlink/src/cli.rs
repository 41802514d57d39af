//! Command line interface definition

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// binlink - expose an application's embedded executable on the command line
#[derive(Parser)]
#[command(name = "binlink")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Install the command-line launcher for a packaged application")]
#[command(long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    #[command(flatten)]
    pub global: GlobalArgs,
}

/// Global arguments available for all commands
#[derive(Parser)]
pub struct GlobalArgs {
    /// Output in JSON format
    #[arg(long, global = true)]
    pub json: bool,

    /// Enable debug logging to the per-user log directory
    #[arg(long, global = true)]
    pub debug: bool,

    /// Use alternate config file
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Treat this run as a packaged distribution
    #[arg(long, global = true)]
    pub packaged: bool,

    /// Packaged resources directory containing the executable
    #[arg(long, global = true, value_name = "DIR")]
    pub resources_dir: Option<PathBuf>,

    /// Absolute path of the command-line alias
    #[arg(long, global = true, value_name = "PATH")]
    pub alias: Option<PathBuf>,
}

/// Available commands
#[derive(Subcommand)]
pub enum Commands {
    /// Show whether the launcher is installed
    #[command(alias = "st")]
    Status,

    /// Create or repair the launcher alias (may prompt for authorization)
    Install,

    /// Print the application bundle containing a path
    Locate {
        /// Path to look up (defaults to this executable)
        path: Option<PathBuf>,
    },

    /// Open the application bundle this launcher belongs to
    Start {
        /// Path inside the bundle (defaults to this executable)
        path: Option<PathBuf>,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from([
            "binlink",
            "install",
            "--packaged",
            "--resources-dir",
            "/Applications/App.app/Contents/Resources",
            "--alias",
            "/usr/local/bin/app-bin",
        ])
        .unwrap();

        assert!(matches!(cli.command, Commands::Install));
        assert!(cli.global.packaged);
        assert_eq!(
            cli.global.resources_dir,
            Some(PathBuf::from("/Applications/App.app/Contents/Resources"))
        );
        assert_eq!(cli.global.alias, Some(PathBuf::from("/usr/local/bin/app-bin")));
    }

    #[test]
    fn test_locate_path_is_optional() {
        let cli = Cli::try_parse_from(["binlink", "locate"]).unwrap();
        assert!(matches!(cli.command, Commands::Locate { path: None }));

        let cli = Cli::try_parse_from(["binlink", "--json", "locate", "/usr/local/bin/x"]).unwrap();
        assert!(cli.global.json);
        assert!(matches!(cli.command, Commands::Locate { path: Some(_) }));
    }

    #[test]
    fn test_start_path_is_optional() {
        let cli = Cli::try_parse_from(["binlink", "start"]).unwrap();
        assert!(matches!(cli.command, Commands::Start { path: None }));

        let cli = Cli::try_parse_from([
            "binlink",
            "start",
            "/Applications/App.app/Contents/Resources/app-bin",
        ])
        .unwrap();
        assert!(matches!(cli.command, Commands::Start { path: Some(_) }));
    }

    #[test]
    fn test_subcommand_required() {
        assert!(Cli::try_parse_from(["binlink"]).is_err());
    }
}
