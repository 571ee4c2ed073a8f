//! Test doubles for the host collaborators.

use std::cell::RefCell;
use std::collections::HashMap;
use std::path::Path;
use std::rc::Rc;

use crate::config::Config;
use crate::context::HostContext;
use crate::error::{HostprepError, Result};
use crate::exec::{Cmd, Shell};
use crate::fetch::Fetch;
use crate::prompt::{Confirm, Decide};
use crate::registry::Action;
use crate::session::{HostIo, Session};
use crate::types::Stage;

#[derive(Default)]
struct ShellState {
    commands: Vec<Cmd>,
    failures: Vec<String>,
    responses: Vec<(String, String)>,
    programs: Vec<String>,
}

/// Records every command instead of running it. Clones share the log.
#[derive(Clone, Default)]
pub struct RecordingShell {
    state: Rc<RefCell<ShellState>>,
}

impl RecordingShell {
    pub fn new() -> Self {
        Self::default()
    }

    /// Commands whose display contains `pattern` fail.
    pub fn fail_on(self, pattern: &str) -> Self {
        self.state.borrow_mut().failures.push(pattern.to_string());
        self
    }

    /// Captured commands whose display contains `pattern` return `stdout`.
    pub fn respond(self, pattern: &str, stdout: &str) -> Self {
        self.state
            .borrow_mut()
            .responses
            .push((pattern.to_string(), stdout.to_string()));
        self
    }

    /// Report `program` as present on PATH.
    pub fn with_program(self, program: &str) -> Self {
        self.state.borrow_mut().programs.push(program.to_string());
        self
    }

    pub fn commands(&self) -> Vec<Cmd> {
        self.state.borrow().commands.clone()
    }

    pub fn displays(&self) -> Vec<String> {
        self.state
            .borrow()
            .commands
            .iter()
            .map(Cmd::display)
            .collect()
    }

    fn record(&mut self, cmd: &Cmd) -> Result<String> {
        let mut state = self.state.borrow_mut();
        state.commands.push(cmd.clone());
        let line = cmd.display();
        if state.failures.iter().any(|p| line.contains(p.as_str())) {
            return Err(HostprepError::CommandFailed {
                command: line,
                status: "exit status: 1".to_string(),
            });
        }
        Ok(state
            .responses
            .iter()
            .find(|(p, _)| line.contains(p.as_str()))
            .map(|(_, out)| out.clone())
            .unwrap_or_default())
    }
}

impl Shell for RecordingShell {
    fn run(&mut self, cmd: &Cmd) -> Result<()> {
        self.record(cmd).map(|_| ())
    }

    fn capture(&mut self, cmd: &Cmd) -> Result<String> {
        self.record(cmd)
    }

    fn has_program(&self, program: &str) -> bool {
        self.state.borrow().programs.iter().any(|p| p == program)
    }
}

/// Serves canned bodies by URL; unknown URLs fail like a 404.
#[derive(Clone, Default)]
pub struct StaticFetcher {
    bodies: Rc<RefCell<HashMap<String, Vec<u8>>>>,
    requested: Rc<RefCell<Vec<String>>>,
}

impl StaticFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn serve(self, url: &str, body: &[u8]) -> Self {
        self.bodies
            .borrow_mut()
            .insert(url.to_string(), body.to_vec());
        self
    }

    pub fn requested(&self) -> Vec<String> {
        self.requested.borrow().clone()
    }
}

impl Fetch for StaticFetcher {
    fn get(&mut self, url: &str) -> Result<Vec<u8>> {
        self.requested.borrow_mut().push(url.to_string());
        self.bodies
            .borrow()
            .get(url)
            .cloned()
            .ok_or_else(|| HostprepError::Download {
                url: url.to_string(),
                reason: "HTTP 404".to_string(),
            })
    }
}

/// Unprivileged context rooted at `home`, with default config.
pub fn test_ctx(home: &Path) -> HostContext {
    HostContext::new(Config::default(), home.to_path_buf(), "ops", false)
}

pub fn host_io(shell: &RecordingShell, decide: impl Decide + 'static) -> HostIo {
    HostIo::new(shell.clone(), StaticFetcher::new(), decide)
}

pub fn host_io_with(
    shell: &RecordingShell,
    fetch: &StaticFetcher,
    decide: impl Decide + 'static,
) -> HostIo {
    HostIo::new(shell.clone(), fetch.clone(), decide)
}

/// What a [`FakeAction`] does when run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FakeBehavior {
    /// One confirmed step that succeeds.
    Succeed,
    /// One confirmed step that fails, then one that succeeds.
    FailStep,
    /// Return a step-level error from the body itself.
    FailBody,
    /// Abort the run.
    Fatal,
}

/// Action that appends its name to a shared log when run.
pub struct FakeAction {
    name: String,
    stage: Stage,
    log: Rc<RefCell<Vec<String>>>,
    behavior: FakeBehavior,
}

impl FakeAction {
    pub fn boxed(name: &str, stage: Stage) -> Box<dyn Action> {
        Self::logged(name, stage, &Rc::default(), FakeBehavior::Succeed)
    }

    pub fn logged(
        name: &str,
        stage: Stage,
        log: &Rc<RefCell<Vec<String>>>,
        behavior: FakeBehavior,
    ) -> Box<dyn Action> {
        Box::new(Self {
            name: name.to_string(),
            stage,
            log: Rc::clone(log),
            behavior,
        })
    }
}

impl Action for FakeAction {
    fn name(&self) -> &str {
        &self.name
    }

    fn description(&self) -> &str {
        "test action"
    }

    fn stage(&self) -> Stage {
        self.stage
    }

    fn run(&self, session: &mut Session<'_>) -> Result<()> {
        self.log.borrow_mut().push(self.name.clone());
        match self.behavior {
            FakeBehavior::Succeed => {
                session.step("work", Confirm::yes(format!("Run {}?", self.name)), |_| Ok(()));
            }
            FakeBehavior::FailStep => {
                session.step("broken", Confirm::yes("Run broken step?"), |_| {
                    Err(HostprepError::CommandFailed {
                        command: "false".to_string(),
                        status: "exit status: 1".to_string(),
                    })
                });
                session.step("after", Confirm::yes("Run follow-up?"), |_| Ok(()));
            }
            FakeBehavior::FailBody => {
                return Err(HostprepError::Download {
                    url: "https://example.com/missing".to_string(),
                    reason: "HTTP 404".to_string(),
                })
            }
            FakeBehavior::Fatal => return Err(HostprepError::MissingTool("docker".to_string())),
        }
        Ok(())
    }
}
