//! CLI command handlers, one file per command.

mod discover;
mod import_har;
mod mirror;

pub use discover::run_discover;
pub use import_har::run_import_har;
pub use mirror::{run_mirror_command, MirrorArgs};
