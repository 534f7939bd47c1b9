//! Application layer - Use cases that coordinate domain services.
//!
//! The install manager drives the package index, the install layout and
//! the ledger to install, uninstall and locate packages.

mod manager;

pub use manager::InstallManager;
