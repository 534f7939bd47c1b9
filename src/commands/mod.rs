//! Command entry points called by the CLI.
//!
//! Each command loads the configuration, builds a [`Workspace`] and
//! drives the install manager; output is plain lines on stdout.

mod context;
mod install;
mod list;
mod locate;
mod refresh;
mod uninstall;

pub use context::Workspace;
pub use install::install;
pub use list::list;
pub use locate::locate;
pub use refresh::refresh;
pub use uninstall::uninstall;
