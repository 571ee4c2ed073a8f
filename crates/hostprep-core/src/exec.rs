//! External command invocation.
//!
//! Every collaborator (package manager, asdf, docker, git) is driven through
//! the [`Shell`] trait so the runner and the actions can be exercised against
//! a recording shell instead of the live host.
//!
//! Privileged commands are prefixed with `sudo` when the process is not root
//! and sudo is enabled in the config. Output of `run` flows straight to the
//! terminal; `capture` pipes stdout back to the caller.

use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::{Command, Output, Stdio};

use crate::error::{HostprepError, Result};

/// A single external command, described but not yet run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cmd {
    pub program: String,
    pub args: Vec<String>,
    pub cwd: Option<PathBuf>,
    pub stdin: Option<String>,
    pub privileged: bool,
}

impl Cmd {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            cwd: None,
            stdin: None,
            privileged: false,
        }
    }

    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    pub fn path_arg(self, path: &Path) -> Self {
        self.arg(path.to_string_lossy().into_owned())
    }

    pub fn current_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.cwd = Some(dir.into());
        self
    }

    pub fn stdin(mut self, text: impl Into<String>) -> Self {
        self.stdin = Some(text.into());
        self
    }

    pub fn privileged(mut self) -> Self {
        self.privileged = true;
        self
    }

    /// Command line as shown in logs and error messages.
    pub fn display(&self) -> String {
        let mut parts = Vec::with_capacity(self.args.len() + 1);
        parts.push(self.program.as_str());
        parts.extend(self.args.iter().map(String::as_str));
        parts.join(" ")
    }
}

pub trait Shell {
    /// Run to completion with output on the terminal. Non-zero exit is an error.
    fn run(&mut self, cmd: &Cmd) -> Result<()>;

    /// Run to completion and return stdout. Non-zero exit is an error.
    fn capture(&mut self, cmd: &Cmd) -> Result<String>;

    /// Whether `program` resolves on PATH.
    fn has_program(&self, program: &str) -> bool;
}

// ---------------------------------------------------------------------------
// SystemShell
// ---------------------------------------------------------------------------

/// Runs commands on the live host.
#[derive(Debug, Clone)]
pub struct SystemShell {
    sudo: bool,
}

impl SystemShell {
    /// `sudo`: prefix privileged commands with sudo.
    pub fn new(sudo: bool) -> Self {
        Self { sudo }
    }

    fn build(&self, cmd: &Cmd) -> Command {
        let mut command = if cmd.privileged && self.sudo {
            let mut c = Command::new("sudo");
            c.arg(&cmd.program);
            c
        } else {
            Command::new(&cmd.program)
        };
        command.args(&cmd.args);
        if let Some(dir) = &cmd.cwd {
            command.current_dir(dir);
        }
        command
    }

    fn execute(&self, cmd: &Cmd, capture: bool) -> Result<String> {
        let mut command = self.build(cmd);
        command.stdin(if cmd.stdin.is_some() {
            Stdio::piped()
        } else {
            Stdio::null()
        });
        if capture {
            command.stdout(Stdio::piped());
        } else {
            command.stdout(Stdio::inherit());
        }
        command.stderr(Stdio::inherit());

        tracing::debug!(command = %cmd.display(), privileged = cmd.privileged, "spawning");
        let spawn_err = |source| HostprepError::CommandSpawn {
            command: cmd.display(),
            source,
        };
        let mut child = command.spawn().map_err(spawn_err)?;

        // stdin is written on its own thread while stdout drains, so a child
        // that echoes its input (tee) cannot fill the pipe and block.
        let output = std::thread::scope(|scope| -> std::io::Result<Output> {
            let feeder = match (child.stdin.take(), cmd.stdin.as_deref()) {
                (Some(mut pipe), Some(text)) => {
                    Some(scope.spawn(move || pipe.write_all(text.as_bytes())))
                }
                _ => None,
            };
            let output = child.wait_with_output()?;
            if let Some(feeder) = feeder {
                feeder
                    .join()
                    .map_err(|_| std::io::Error::other("stdin writer panicked"))??;
            }
            Ok(output)
        })
        .map_err(spawn_err)?;
        if !output.status.success() {
            return Err(HostprepError::CommandFailed {
                command: cmd.display(),
                status: output.status.to_string(),
            });
        }
        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

impl Shell for SystemShell {
    fn run(&mut self, cmd: &Cmd) -> Result<()> {
        self.execute(cmd, false).map(|_| ())
    }

    fn capture(&mut self, cmd: &Cmd) -> Result<String> {
        self.execute(cmd, true)
    }

    fn has_program(&self, program: &str) -> bool {
        which::which(program).is_ok()
    }
}
