//! Package management module
//!
//! This module provides the pieces the install manager is built from:
//! version comparison, the package index, the installed-package ledger
//! and the on-disk install layout.

mod descriptor;
mod index;
mod layout;
mod ledger;
mod spec;
mod version;

pub use descriptor::{InstallSpec, PackageDescriptor, VersionDescriptor};
pub use index::{PACKAGE_CONFIG_FILE, PackageIndex, PackageLocation};
pub use layout::{INFO_DIR_NAME, InstallLayout, resolve_under, validate_name};
pub use ledger::{InstallLedger, InstalledEntry, LEDGER_FILE_NAME};
pub use spec::PackageSpec;
pub use version::{LATEST, Version, VersionRequest, VersionResolver, is_greater};
