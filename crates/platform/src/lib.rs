//! Platform abstraction layer for launcher installation.
//!
//! This crate provides a unified interface for platform-specific operations including:
//! - Filesystem operations (link inspection, atomic symlink replacement)
//! - Process execution with proper event emission and error handling
//!
//! Every operation reports start/completion/failure through the event system,
//! so callers get structured logging without printing anything themselves.

pub mod core;
pub mod filesystem;
pub mod implementations;
pub mod process;

pub use core::{Platform, PlatformContext};

/// Re-export commonly used types
pub use filesystem::{FilesystemOperations, LinkInspection};
pub use process::{CommandOutput, PlatformCommand, ProcessOperations};
