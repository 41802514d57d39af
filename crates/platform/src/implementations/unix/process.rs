//! POSIX process operations implementation

use async_trait::async_trait;
use binlink_errors::PlatformError;
use binlink_events::{
    AppEvent, FailureContext, PlatformEvent, PlatformOperationContext, PlatformOperationKind,
    PlatformOperationMetrics, ProcessCommandDescriptor,
};
use std::convert::TryFrom;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};
use tokio::process::Command;

use crate::core::PlatformContext;
use crate::process::{CommandOutput, PlatformCommand, ProcessOperations};

/// POSIX implementation of process operations
pub struct UnixProcessOperations;

impl UnixProcessOperations {
    pub fn new() -> Self {
        Self
    }
}

impl Default for UnixProcessOperations {
    fn default() -> Self {
        Self::new()
    }
}

fn process_context(descriptor: ProcessCommandDescriptor) -> PlatformOperationContext {
    PlatformOperationContext {
        kind: PlatformOperationKind::Process,
        operation: "execute_command".to_string(),
        target: None,
        source: None,
        command: Some(descriptor),
    }
}

fn process_metrics(duration: Duration, output: Option<&CommandOutput>) -> PlatformOperationMetrics {
    PlatformOperationMetrics {
        duration_ms: Some(duration_to_millis(duration)),
        exit_code: output.and_then(|o| o.status.code()),
        stdout_bytes: output.and_then(|o| u64::try_from(o.stdout.len()).ok()),
        stderr_bytes: output.and_then(|o| u64::try_from(o.stderr.len()).ok()),
        changes: None,
    }
}

fn duration_to_millis(duration: Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}

async fn emit_process_started(ctx: &PlatformContext, descriptor: &ProcessCommandDescriptor) {
    ctx.emit_event(AppEvent::Platform(PlatformEvent::OperationStarted {
        context: process_context(descriptor.clone()),
    }))
    .await;
}

async fn emit_process_completed(
    ctx: &PlatformContext,
    descriptor: &ProcessCommandDescriptor,
    output: &CommandOutput,
    duration: Duration,
) {
    ctx.emit_event(AppEvent::Platform(PlatformEvent::OperationCompleted {
        context: process_context(descriptor.clone()),
        metrics: Some(process_metrics(duration, Some(output))),
    }))
    .await;
}

async fn emit_process_failed(
    ctx: &PlatformContext,
    descriptor: &ProcessCommandDescriptor,
    error: &PlatformError,
    duration: Duration,
) {
    ctx.emit_event(AppEvent::Platform(PlatformEvent::OperationFailed {
        context: process_context(descriptor.clone()),
        failure: FailureContext::from_error(error),
        metrics: Some(process_metrics(duration, None)),
    }))
    .await;
}

#[cfg(unix)]
fn is_executable_file(path: &Path) -> bool {
    use std::os::unix::fs::PermissionsExt;

    std::fs::metadata(path).is_ok_and(|m| m.is_file() && m.permissions().mode() & 0o111 != 0)
}

#[cfg(not(unix))]
fn is_executable_file(path: &Path) -> bool {
    path.is_file()
}

#[async_trait]
impl ProcessOperations for UnixProcessOperations {
    async fn execute_command(
        &self,
        ctx: &PlatformContext,
        cmd: PlatformCommand,
    ) -> Result<CommandOutput, PlatformError> {
        let start = Instant::now();
        let descriptor = ProcessCommandDescriptor {
            program: cmd.program().to_string(),
            args: cmd.get_args().to_vec(),
            cwd: cmd.get_current_dir().cloned(),
        };

        emit_process_started(ctx, &descriptor).await;

        let result: Result<CommandOutput, PlatformError> = async {
            let mut command = Command::new(cmd.program());
            command.args(cmd.get_args());

            if let Some(dir) = cmd.get_current_dir() {
                command.current_dir(dir);
            }

            for (key, value) in cmd.get_env_vars() {
                command.env(key, value);
            }

            let output = command.output().await.map_err(|e| match e.kind() {
                ErrorKind::NotFound => PlatformError::CommandNotFound {
                    command: cmd.program().to_string(),
                },
                _ => PlatformError::ProcessExecutionFailed {
                    command: cmd.program().to_string(),
                    message: e.to_string(),
                },
            })?;

            Ok(CommandOutput {
                status: output.status,
                stdout: output.stdout,
                stderr: output.stderr,
            })
        }
        .await;

        let duration = start.elapsed();

        match &result {
            Ok(output) => {
                emit_process_completed(ctx, &descriptor, output, duration).await;
            }
            Err(e) => {
                emit_process_failed(ctx, &descriptor, e, duration).await;
            }
        }

        result
    }

    fn create_command(&self, program: &str) -> PlatformCommand {
        PlatformCommand::new(program)
    }

    async fn which(&self, program: &str) -> Result<PathBuf, PlatformError> {
        let candidate = Path::new(program);
        if candidate.components().count() > 1 {
            return if is_executable_file(candidate) {
                Ok(candidate.to_path_buf())
            } else {
                Err(PlatformError::CommandNotFound {
                    command: program.to_string(),
                })
            };
        }

        let search_path = std::env::var_os("PATH").unwrap_or_default();
        std::env::split_paths(&search_path)
            .map(|dir| dir.join(program))
            .find(|path| is_executable_file(path))
            .ok_or_else(|| PlatformError::CommandNotFound {
                command: program.to_string(),
            })
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_execute_command_captures_output() {
        let ops = UnixProcessOperations::new();
        let mut cmd = ops.create_command("/bin/sh");
        cmd.args(["-c", "echo out; echo err >&2; exit 3"]);

        let output = ops
            .execute_command(&PlatformContext::default(), cmd)
            .await
            .unwrap();
        assert_eq!(output.status.code(), Some(3));
        assert_eq!(String::from_utf8_lossy(&output.stdout).trim(), "out");
        assert_eq!(output.stderr_text(), "err");
    }

    #[tokio::test]
    async fn test_missing_program_is_command_not_found() {
        let ops = UnixProcessOperations::new();
        let cmd = ops.create_command("/definitely/not/a/binary");
        let err = ops
            .execute_command(&PlatformContext::default(), cmd)
            .await
            .unwrap_err();
        assert!(matches!(err, PlatformError::CommandNotFound { .. }));
    }

    #[tokio::test]
    async fn test_which_finds_sh() {
        let ops = UnixProcessOperations::new();
        let path = ops.which("sh").await.unwrap();
        assert!(path.ends_with("sh"));
        assert!(ops.which("binlink-no-such-tool").await.is_err());
    }
}
