use crate::error::Result;
use crate::exec::{Cmd, Shell};

/// yum / dnf. Installs are naturally idempotent; `is_installed` lets callers
/// skip the transaction entirely.
pub struct PackageManager<'a> {
    shell: &'a mut dyn Shell,
    program: &'a str,
}

impl<'a> PackageManager<'a> {
    pub fn new(shell: &'a mut dyn Shell, program: &'a str) -> Self {
        Self { shell, program }
    }

    pub fn install<S: AsRef<str>>(&mut self, names: &[S]) -> Result<()> {
        let names: Vec<String> = names
            .iter()
            .map(|n| n.as_ref().trim())
            .filter(|n| !n.is_empty())
            .map(str::to_string)
            .collect();
        if names.is_empty() {
            return Ok(());
        }
        let cmd = Cmd::new(self.program)
            .args(["install", "-y"])
            .args(names)
            .privileged();
        self.shell.run(&cmd)
    }

    pub fn update(&mut self) -> Result<()> {
        let cmd = Cmd::new(self.program).args(["update", "-y"]).privileged();
        self.shell.run(&cmd)
    }

    pub fn is_installed(&mut self, name: &str) -> bool {
        self.shell
            .capture(&Cmd::new("rpm").args(["-q", name]))
            .is_ok()
    }

    /// The subset of `names` not yet installed, in order.
    pub fn missing<'n>(&mut self, names: &'n [String]) -> Vec<&'n str> {
        names
            .iter()
            .map(|n| n.trim())
            .filter(|n| !n.is_empty())
            .filter(|n| !self.is_installed(n))
            .collect()
    }
}
