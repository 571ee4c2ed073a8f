use crate::error::Result;
use crate::exec::{Cmd, Shell};
use std::path::Path;

pub struct Git<'a> {
    shell: &'a mut dyn Shell,
}

impl<'a> Git<'a> {
    pub fn new(shell: &'a mut dyn Shell) -> Self {
        Self { shell }
    }

    /// Clone `url` into `dest`. An existing checkout is left as it is.
    /// Returns true when a clone happened.
    pub fn clone_repo(
        &mut self,
        url: &str,
        dest: &Path,
        branch: Option<&str>,
        shallow: bool,
    ) -> Result<bool> {
        if dest.join(".git").exists() {
            return Ok(false);
        }
        let mut cmd = Cmd::new("git").arg("clone");
        if shallow {
            cmd = cmd.args(["--depth", "1"]);
        }
        if let Some(branch) = branch {
            cmd = cmd.args(["--branch", branch]);
        }
        let cmd = cmd.arg(url).path_arg(dest);
        self.shell.run(&cmd)?;
        Ok(true)
    }
}
