//! Everything an action needs to know about the host, resolved once at startup.

use crate::config::Config;
use crate::error::{HostprepError, Result};
use nix::unistd::{Uid, User};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone)]
pub struct HostContext {
    pub config: Config,
    /// Home directory of the operator; relative config paths resolve against it.
    pub home: PathBuf,
    /// Login name, used for group membership.
    pub user: String,
    /// Running with an effective uid of 0.
    pub elevated: bool,
}

impl HostContext {
    pub fn new(config: Config, home: PathBuf, user: impl Into<String>, elevated: bool) -> Self {
        Self {
            config,
            home,
            user: user.into(),
            elevated,
        }
    }

    /// Build the context from the running process.
    ///
    /// Under `sudo` the operator is the invoking user: both the login name
    /// and the home directory come from `SUDO_USER`'s passwd entry, so
    /// per-user files do not land in root's home.
    pub fn detect(config: Config) -> Result<Self> {
        let uid = Uid::effective();
        let elevated = uid.is_root();
        let sudo_user = sudo_operator(elevated, std::env::var("SUDO_USER").ok());

        let home = match &sudo_user {
            Some(name) => User::from_name(name).ok().flatten().map(|u| u.dir),
            None => home::home_dir(),
        }
        .ok_or(HostprepError::HomeNotFound)?;

        let user = match sudo_user.or_else(|| login_name(std::env::var("USER").ok())) {
            Some(name) => name,
            None => User::from_uid(uid)
                .ok()
                .flatten()
                .map(|u| u.name)
                .unwrap_or_else(|| uid.to_string()),
        };
        Ok(Self::new(config, home, user, elevated))
    }

    /// Absolute paths pass through, relative ones are taken from home.
    pub fn resolve(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.home.join(path)
        }
    }

    pub fn shell_rc(&self) -> PathBuf {
        self.resolve(&self.config.host.shell_rc)
    }

    pub fn asdf_dir(&self) -> PathBuf {
        self.resolve(&self.config.version_manager.dir)
    }

    pub fn bin_dir(&self) -> PathBuf {
        self.resolve(&self.config.binaries.dir)
    }

    /// Whether privileged commands need a sudo prefix.
    pub fn needs_sudo(&self) -> bool {
        !self.elevated && self.config.host.use_sudo
    }
}

/// `SUDO_USER` counts only when running as root on someone else's behalf.
fn sudo_operator(elevated: bool, sudo_user: Option<String>) -> Option<String> {
    sudo_user.filter(|name| elevated && !name.is_empty() && name != "root")
}

fn login_name(user: Option<String>) -> Option<String> {
    user.filter(|name| !name.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ctx() -> HostContext {
        HostContext::new(Config::default(), PathBuf::from("/home/ops"), "ops", false)
    }

    #[test]
    fn resolve_relative_against_home() {
        let ctx = ctx();
        assert_eq!(
            ctx.resolve(Path::new(".local/bin")),
            PathBuf::from("/home/ops/.local/bin")
        );
        assert_eq!(ctx.resolve(Path::new("/etc/hosts")), PathBuf::from("/etc/hosts"));
        assert_eq!(ctx.asdf_dir(), PathBuf::from("/home/ops/.asdf"));
        assert_eq!(ctx.shell_rc(), PathBuf::from("/home/ops/.bashrc"));
    }

    #[test]
    fn sudo_only_when_unprivileged_and_enabled() {
        let mut ctx = ctx();
        assert!(ctx.needs_sudo());
        ctx.config.host.use_sudo = false;
        assert!(!ctx.needs_sudo());
        ctx.config.host.use_sudo = true;
        ctx.elevated = true;
        assert!(!ctx.needs_sudo());
    }

    #[test]
    fn sudo_user_only_counts_when_elevated() {
        let ops = || Some("ops".to_string());
        assert_eq!(sudo_operator(true, ops()), ops());
        assert_eq!(sudo_operator(false, ops()), None);
        assert_eq!(sudo_operator(true, Some("root".to_string())), None);
        assert_eq!(sudo_operator(true, Some(String::new())), None);
        assert_eq!(sudo_operator(true, None), None);
    }

    #[test]
    fn empty_login_name_is_unknown() {
        assert_eq!(login_name(Some("ops".to_string())), Some("ops".to_string()));
        assert_eq!(login_name(Some(String::new())), None);
        assert_eq!(login_name(None), None);
    }
}
