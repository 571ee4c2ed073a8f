use crate::config::ContainerConfig;
use crate::error::Result;
use crate::exec::{Cmd, Shell};
use std::path::Path;

/// Docker engine and its compose plugin.
pub struct ContainerRuntime<'a> {
    shell: &'a mut dyn Shell,
}

impl<'a> ContainerRuntime<'a> {
    pub fn new(shell: &'a mut dyn Shell) -> Self {
        Self { shell }
    }

    pub fn available(&self) -> bool {
        self.shell.has_program("docker")
    }

    /// Add the upstream repository, install the engine and start it on boot.
    pub fn install(&mut self, config: &ContainerConfig, package_manager: &str) -> Result<()> {
        self.shell.run(
            &Cmd::new(package_manager)
                .args(["install", "-y", "yum-utils"])
                .privileged(),
        )?;
        self.shell.run(
            &Cmd::new("yum-config-manager")
                .args(["--add-repo", config.repo_url.as_str()])
                .privileged(),
        )?;
        self.shell.run(
            &Cmd::new(package_manager)
                .args(["install", "-y"])
                .args(config.packages.iter().cloned())
                .privileged(),
        )?;
        self.shell.run(
            &Cmd::new("systemctl")
                .args(["enable", "--now", "docker"])
                .privileged(),
        )
    }

    pub fn add_user_to_group(&mut self, user: &str, group: &str) -> Result<()> {
        self.shell.run(
            &Cmd::new("usermod")
                .args(["-aG", group, user])
                .privileged(),
        )
    }

    /// `docker compose pull` for `services` in the compose project at `dir`.
    pub fn pull(&mut self, dir: &Path, services: &[String]) -> Result<()> {
        let cmd = Cmd::new("docker")
            .args(["compose", "pull"])
            .args(services.iter().cloned())
            .current_dir(dir)
            .privileged();
        self.shell.run(&cmd)
    }
}
