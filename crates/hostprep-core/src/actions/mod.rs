//! The built-in provisioning actions, one per stage.

mod container_runtime;
mod dotfiles;
mod kernel_tuning;
mod language_packages;
mod local_config;
mod log_platform;
mod system_packages;
mod user_binaries;
mod version_manager;

pub use container_runtime::ContainerRuntimeInstall;
pub use dotfiles::Dotfiles;
pub use kernel_tuning::KernelTuning;
pub use language_packages::LanguagePackages;
pub use local_config::LocalConfig;
pub use log_platform::LogPlatform;
pub use system_packages::SystemPackages;
pub use user_binaries::UserBinaries;
pub use version_manager::VersionManagerSetup;
