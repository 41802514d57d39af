//! POSIX platform implementation (macOS and Linux)

pub mod filesystem;
pub mod process;
