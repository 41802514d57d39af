//! Core platform abstractions and context management

use binlink_events::{AppEvent, EventEmitter, EventSender};

use crate::filesystem::FilesystemOperations;
use crate::process::{CommandOutput, PlatformCommand, ProcessOperations};
use binlink_errors::PlatformError;

/// Context for platform operations, providing event emission
#[derive(Clone, Default)]
pub struct PlatformContext {
    event_sender: Option<EventSender>,
}

impl PlatformContext {
    /// Create a new platform context with event emission capabilities
    pub fn new(event_sender: Option<EventSender>) -> Self {
        Self { event_sender }
    }

    /// Emit a platform event if event sender is available
    pub async fn emit_event(&self, event: AppEvent) {
        self.emit(event);
    }
}

impl EventEmitter for PlatformContext {
    fn event_sender(&self) -> Option<&EventSender> {
        self.event_sender.as_ref()
    }
}

/// Main platform abstraction providing access to all platform operations
pub struct Platform {
    filesystem_ops: Box<dyn FilesystemOperations>,
    process_ops: Box<dyn ProcessOperations>,
}

impl Platform {
    /// Create a new platform instance with the specified implementations
    pub fn new(
        filesystem_ops: Box<dyn FilesystemOperations>,
        process_ops: Box<dyn ProcessOperations>,
    ) -> Self {
        Self {
            filesystem_ops,
            process_ops,
        }
    }

    /// Get the platform for the host operating system
    pub fn current() -> Self {
        use crate::implementations::unix::{
            filesystem::UnixFilesystemOperations, process::UnixProcessOperations,
        };

        Self::new(
            Box::new(UnixFilesystemOperations::new()),
            Box::new(UnixProcessOperations::new()),
        )
    }

    /// Access filesystem operations
    pub fn filesystem(&self) -> &dyn FilesystemOperations {
        &*self.filesystem_ops
    }

    /// Access process operations
    pub fn process(&self) -> &dyn ProcessOperations {
        &*self.process_ops
    }

    /// Convenience method: Execute a command and get output
    pub async fn execute_command(
        &self,
        ctx: &PlatformContext,
        cmd: PlatformCommand,
    ) -> Result<CommandOutput, PlatformError> {
        self.process().execute_command(ctx, cmd).await
    }

    /// Convenience method: Create a new command builder
    pub fn command(&self, program: &str) -> PlatformCommand {
        self.process().create_command(program)
    }
}
