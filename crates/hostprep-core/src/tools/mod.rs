//! Adapters for the external tools the actions drive.

pub mod asdf;
pub mod docker;
pub mod git;
pub mod packages;

pub use asdf::VersionManager;
pub use docker::ContainerRuntime;
pub use git::Git;
pub use packages::PackageManager;
