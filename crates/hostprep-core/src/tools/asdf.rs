//! asdf, the tool-version manager, installed from git under the home directory.

use crate::error::Result;
use crate::exec::{Cmd, Shell};
use std::path::PathBuf;

pub struct VersionManager<'a> {
    shell: &'a mut dyn Shell,
    dir: PathBuf,
}

impl<'a> VersionManager<'a> {
    pub fn new(shell: &'a mut dyn Shell, dir: PathBuf) -> Self {
        Self { shell, dir }
    }

    pub fn binary(&self) -> PathBuf {
        self.dir.join("bin").join("asdf")
    }

    pub fn is_installed(&self) -> bool {
        self.binary().exists()
    }

    /// Line sourced from the shell rc file to put asdf and its shims on PATH.
    pub fn rc_line(&self) -> String {
        format!(". \"{}\"", self.dir.join("asdf.sh").display())
    }

    fn cmd(&self) -> Cmd {
        Cmd::new(self.binary().to_string_lossy().into_owned())
    }

    pub fn plugins(&mut self) -> Result<Vec<String>> {
        let cmd = self.cmd().args(["plugin", "list"]);
        let out = self.shell.capture(&cmd)?;
        Ok(out
            .lines()
            .map(str::trim)
            .filter(|l| !l.is_empty())
            .map(str::to_string)
            .collect())
    }

    /// Add a plugin unless `plugin list` already shows it. Returns true when added.
    pub fn add_plugin(&mut self, name: &str, url: Option<&str>) -> Result<bool> {
        // `plugin list` exits non-zero when no plugins exist yet.
        let existing = self.plugins().unwrap_or_default();
        if existing.iter().any(|p| p == name) {
            return Ok(false);
        }
        let mut cmd = self.cmd().args(["plugin", "add", name]);
        if let Some(url) = url {
            cmd = cmd.arg(url);
        }
        self.shell.run(&cmd)?;
        Ok(true)
    }

    pub fn install_version(&mut self, name: &str, version: &str) -> Result<()> {
        let cmd = self.cmd().args(["install", name, version]);
        self.shell.run(&cmd)
    }

    pub fn set_global(&mut self, name: &str, version: &str) -> Result<()> {
        let cmd = self.cmd().args(["global", name, version]);
        self.shell.run(&cmd)
    }

    /// Run a shimmed tool through `asdf exec`.
    pub fn exec<I, S>(&mut self, args: I) -> Result<()>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let cmd = self.cmd().arg("exec").args(args);
        self.shell.run(&cmd)
    }
}
