//! Well-known, non-configurable names and locations
//!
//! The alias directory can be overridden per install, but these defaults are
//! what a fresh install uses.

/// Name of the embedded executable and of the alias created for it
pub const DEFAULT_EXECUTABLE_NAME: &str = "binlink";

/// Directory conventionally on the shell search path
pub const DEFAULT_ALIAS_DIR: &str = "/usr/local/bin";

pub const CONFIG_DIR_NAME: &str = "binlink";
pub const CONFIG_FILE_NAME: &str = "config.toml";

/// Log directory under the per-user data directory
pub const LOGS_DIR_NAME: &str = "logs";

/// Environment overrides
pub const ENV_PACKAGED: &str = "BINLINK_PACKAGED";
pub const ENV_RESOURCES_DIR: &str = "BINLINK_RESOURCES_DIR";
pub const ENV_ALIAS: &str = "BINLINK_ALIAS";
