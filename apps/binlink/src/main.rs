//! binlink - command-line launcher installer
//!
//! Inspects and installs the symlink that makes a packaged application's
//! embedded executable reachable from a shell.

mod cli;
mod display;
mod error;
mod events;
mod logging;
mod setup;

use crate::cli::{Cli, Commands};
use crate::display::{CommandResult, OutputRenderer};
use crate::error::CliError;
use crate::events::EventHandler;
use binlink_config::Config;
use binlink_events::{EventReceiver, EventSender};
use binlink_launcher::{bundle_root, BundleOpener, InstallationState};
use binlink_platform::{Platform, PlatformContext};
use clap::Parser;
use console::Term;
use std::path::PathBuf;
use std::process;
use std::sync::Arc;
use tokio::select;
use tracing::{error, info};

#[tokio::main]
async fn main() {
    // Parse command line arguments first to check for JSON mode
    let cli = Cli::parse();
    let json_mode = cli.global.json;

    init_tracing(json_mode, cli.global.debug);

    if let Err(e) = run(cli).await {
        error!("Application error: {}", e);
        // stderr only, so JSON on stdout stays parseable
        eprintln!("Error: {e}");
        process::exit(1);
    }
}

/// Main application logic
async fn run(cli: Cli) -> Result<(), CliError> {
    info!("Starting binlink v{}", env!("CARGO_PKG_VERSION"));

    // Load configuration with proper precedence:
    // 1. Start with file config (or defaults)
    let mut config = Config::load_or_default(cli.global.config.as_deref()).await?;

    // 2. Merge environment variables
    config.merge_env()?;

    // 3. Apply CLI flags (highest precedence)
    setup::apply_cli_config(&mut config, &cli.global);

    let (event_sender, event_receiver) = binlink_events::channel();

    let json = config.general.json;
    let renderer = OutputRenderer::new(json, Term::stdout().features().colors_supported());
    let mut event_handler = EventHandler::new(
        Term::stderr().features().colors_supported(),
        config.general.debug,
        json,
    );

    let result = execute_command_with_events(
        cli.command,
        &config,
        event_sender,
        event_receiver,
        &mut event_handler,
    )
    .await?;

    renderer.render_result(&result)?;

    info!("Command completed successfully");
    Ok(())
}

/// Execute command with concurrent event handling
async fn execute_command_with_events(
    command: Commands,
    config: &Config,
    event_sender: EventSender,
    mut event_receiver: EventReceiver,
    event_handler: &mut EventHandler,
) -> Result<CommandResult, CliError> {
    let mut command_future = Box::pin(execute_command(command, config, event_sender));
    let mut events_open = true;

    loop {
        select! {
            result = &mut command_future => {
                // Drain any remaining events
                while let Ok(event) = event_receiver.try_recv() {
                    event_handler.handle_event(event);
                }
                return result;
            }

            event = event_receiver.recv(), if events_open => {
                match event {
                    Some(event) => event_handler.handle_event(event),
                    None => events_open = false,
                }
            }
        }
    }
}

/// Execute the specified command
async fn execute_command(
    command: Commands,
    config: &Config,
    event_sender: EventSender,
) -> Result<CommandResult, CliError> {
    match command {
        Commands::Status => {
            let installer = setup::build_installer(config, event_sender)?;
            let state = installer.report_status();
            let reason = match &state {
                InstallationState::Installed => None,
                InstallationState::NotInstalled(reason) => Some(reason.to_string()),
            };
            Ok(CommandResult::Status {
                installed: state.is_installed(),
                alias: installer.alias().as_path().to_path_buf(),
                target: installer.location().as_path().to_path_buf(),
                reason,
            })
        }

        Commands::Install => {
            let installer = setup::build_installer(config, event_sender)?;
            installer.install().await?;
            Ok(CommandResult::Installed {
                alias: installer.alias().as_path().to_path_buf(),
                target: installer.location().as_path().to_path_buf(),
            })
        }

        Commands::Locate { path } => {
            let bundle = enclosing_bundle(path).await?;
            Ok(CommandResult::Located { bundle })
        }

        Commands::Start { path } => {
            let bundle = enclosing_bundle(path).await?;
            let ctx = PlatformContext::new(Some(event_sender));
            BundleOpener::new(Arc::new(Platform::current()))
                .open(&ctx, &bundle)
                .await?;
            Ok(CommandResult::Started { bundle })
        }
    }
}

/// Bundle enclosing `path` (or this executable) once symlinks are followed
async fn enclosing_bundle(path: Option<PathBuf>) -> Result<PathBuf, CliError> {
    let path = match path {
        Some(path) => path,
        None => std::env::current_exe()?,
    };
    let resolved = resolve_symlinks(path).await?;
    Ok(bundle_root(&resolved)?)
}

/// Follow every symlink in `path`, as a shell alias would be followed
async fn resolve_symlinks(path: PathBuf) -> Result<PathBuf, CliError> {
    tokio::fs::canonicalize(&path).await.map_err(|e| {
        CliError::InvalidArguments(format!("cannot resolve {}: {e}", path.display()))
    })
}

/// Initialize tracing/logging
fn init_tracing(json_mode: bool, debug_enabled_flag: bool) {
    let debug_enabled = std::env::var("RUST_LOG").is_ok() || debug_enabled_flag;

    if debug_enabled {
        // Debug mode: structured JSON logs to file
        let log_dir = Config::logs_dir();
        if let Err(e) = std::fs::create_dir_all(&log_dir) {
            if !json_mode {
                eprintln!("Warning: Failed to create log directory: {e}");
            }
        }

        let log_file = log_dir.join(format!(
            "binlink-{}.log",
            chrono::Utc::now().format("%Y%m%d-%H%M%S")
        ));

        match std::fs::File::create(&log_file) {
            Ok(file) => {
                tracing_subscriber::fmt()
                    .json()
                    .with_writer(file)
                    .with_env_filter(
                        tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(
                            |_| tracing_subscriber::EnvFilter::new("info,binlink=debug"),
                        ),
                    )
                    .init();

                if !json_mode {
                    eprintln!("Debug logging enabled: {}", log_file.display());
                }
                return;
            }
            Err(e) => {
                if !json_mode {
                    eprintln!("Warning: Failed to create log file: {e}");
                }
            }
        }
    }

    // Normal mode: warnings and errors to stderr, which JSON output never uses
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .init();
}
