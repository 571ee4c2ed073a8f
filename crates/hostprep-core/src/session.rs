//! Per-action execution state: the host collaborators plus the step log.

use std::path::Path;

use crate::context::HostContext;
use crate::error::Result;
use crate::exec::{Cmd, Shell};
use crate::fetch::Fetch;
use crate::io;
use crate::prompt::{Confirm, Decide};
use crate::tools::{ContainerRuntime, Git, PackageManager, VersionManager};
use crate::types::Outcome;

/// The side-effecting collaborators a run is wired to.
pub struct HostIo {
    pub shell: Box<dyn Shell>,
    pub fetch: Box<dyn Fetch>,
    pub decide: Box<dyn Decide>,
}

impl HostIo {
    pub fn new(
        shell: impl Shell + 'static,
        fetch: impl Fetch + 'static,
        decide: impl Decide + 'static,
    ) -> Self {
        Self {
            shell: Box::new(shell),
            fetch: Box::new(fetch),
            decide: Box::new(decide),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepRecord {
    pub name: String,
    pub outcome: Outcome,
    pub detail: Option<String>,
}

/// Handed to an action body. Each sub-step goes through [`Session::step`],
/// which asks for confirmation, runs it, and records the outcome. A failed
/// step is logged and recorded; it never stops the action.
pub struct Session<'a> {
    action: &'a str,
    ctx: &'a HostContext,
    io: &'a mut HostIo,
    steps: Vec<StepRecord>,
}

impl<'a> Session<'a> {
    pub fn new(action: &'a str, ctx: &'a HostContext, io: &'a mut HostIo) -> Self {
        Self {
            action,
            ctx,
            io,
            steps: Vec::new(),
        }
    }

    pub fn ctx(&self) -> &'a HostContext {
        self.ctx
    }

    pub fn into_steps(self) -> Vec<StepRecord> {
        self.steps
    }

    pub fn steps(&self) -> &[StepRecord] {
        &self.steps
    }

    // -----------------------------------------------------------------------
    // Steps
    // -----------------------------------------------------------------------

    /// Ask `confirm`, then run `body`. Returns the recorded outcome.
    pub fn step<F>(&mut self, name: &str, confirm: Confirm, body: F) -> Outcome
    where
        F: FnOnce(&mut Self) -> Result<()>,
    {
        if !self.io.decide.confirm(&confirm) {
            tracing::info!(action = self.action, step = name, "declined");
            self.record(name, Outcome::Skipped, Some("declined".to_string()));
            return Outcome::Skipped;
        }
        self.run_step(name, body)
    }

    /// Run `body` without asking; used for follow-ups of a confirmed step.
    pub fn run_step<F>(&mut self, name: &str, body: F) -> Outcome
    where
        F: FnOnce(&mut Self) -> Result<()>,
    {
        tracing::info!(action = self.action, step = name, "running");
        match body(self) {
            Ok(()) => {
                self.record(name, Outcome::Completed, None);
                Outcome::Completed
            }
            Err(e) => {
                tracing::error!(action = self.action, step = name, "{e:#}");
                self.record(name, Outcome::Failed, Some(e.to_string()));
                Outcome::Failed
            }
        }
    }

    /// Record a step that needed no work because the host already has it.
    pub fn already(&mut self, name: &str, detail: impl Into<String>) {
        let detail = detail.into();
        tracing::info!(action = self.action, step = name, detail = %detail, "already in place");
        self.record(name, Outcome::Completed, Some(detail));
    }

    /// Record a step that was not attempted for a reason other than the operator.
    pub fn skip(&mut self, name: &str, detail: impl Into<String>) {
        let detail = detail.into();
        tracing::info!(action = self.action, step = name, detail = %detail, "skipped");
        self.record(name, Outcome::Skipped, Some(detail));
    }

    fn record(&mut self, name: &str, outcome: Outcome, detail: Option<String>) {
        self.steps.push(StepRecord {
            name: name.to_string(),
            outcome,
            detail,
        });
    }

    // -----------------------------------------------------------------------
    // Collaborators
    // -----------------------------------------------------------------------

    pub fn shell(&mut self) -> &mut dyn Shell {
        self.io.shell.as_mut()
    }

    pub fn has_program(&self, program: &str) -> bool {
        self.io.shell.has_program(program)
    }

    pub fn packages(&mut self) -> PackageManager<'_> {
        PackageManager::new(
            self.io.shell.as_mut(),
            &self.ctx.config.host.package_manager,
        )
    }

    pub fn asdf(&mut self) -> VersionManager<'_> {
        VersionManager::new(self.io.shell.as_mut(), self.ctx.asdf_dir())
    }

    pub fn docker(&mut self) -> ContainerRuntime<'_> {
        ContainerRuntime::new(self.io.shell.as_mut())
    }

    pub fn git(&mut self) -> Git<'_> {
        Git::new(self.io.shell.as_mut())
    }

    /// Download `url` and write it atomically to `dest`.
    pub fn download_to(&mut self, url: &str, dest: &Path) -> Result<()> {
        let body = self.io.fetch.get(url)?;
        io::atomic_write(dest, &body)
    }

    /// Append whichever of `lines` are not already present in `path`.
    ///
    /// Privileged files are appended through `tee -a`, which the shell runs
    /// under sudo when needed. Returns the number of lines added.
    pub fn ensure_lines(&mut self, path: &Path, lines: &[String], privileged: bool) -> Result<usize> {
        let existing = io::read_or_empty(path)?;
        let missing = io::missing_lines(&existing, lines);
        if missing.is_empty() {
            return Ok(0);
        }
        let block = io::append_block(&existing, &missing);
        if privileged {
            let cmd = Cmd::new("tee")
                .arg("-a")
                .path_arg(path)
                .stdin(block)
                .privileged();
            self.io.shell.capture(&cmd)?;
        } else {
            io::append_text(path, &block)?;
        }
        Ok(missing.len())
    }
}
