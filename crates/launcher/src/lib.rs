#![deny(clippy::pedantic, unsafe_code)]
#![allow(clippy::module_name_repetitions)]

//! Command-line launcher installation
//!
//! Makes an application's embedded executable reachable from a shell by
//! keeping a symbolic link at a well-known alias path. The link itself is the
//! only state: whether the launcher is installed is recomputed on demand by
//! inspecting the alias.
//!
//! Mutation of privileged locations goes through a [`PrivilegedFileLinker`],
//! so the only prompt a user ever sees is the operating system's own
//! authorization dialog.

pub mod bundle;
pub mod elevation;
pub mod installer;
pub mod linker;
pub mod location;
pub mod state;

pub use bundle::{bundle_root, resources_dir_from_executable, BundleOpener};
pub use elevation::{OsascriptLinker, PkexecLinker};
pub use installer::LauncherInstaller;
pub use linker::{DirectLinker, ElevatingLinker, PrivilegedFileLinker};
pub use location::{AliasPath, ExecutableLocation, LaunchLayout};
pub use state::{InstallationState, NotInstalledReason};
