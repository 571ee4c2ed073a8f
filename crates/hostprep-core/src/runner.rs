//! Selection parsing and sequential execution.

use crate::context::HostContext;
use crate::error::{HostprepError, Result};
use crate::registry::Registry;
use crate::session::{HostIo, Session, StepRecord};
use crate::types::Outcome;

/// The operator's choice from the menu.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Selection {
    All,
    /// Zero-based index into the registry (menu entry `index + 1`).
    One(usize),
}

/// Parse menu input. `0` is everything, `1..=action_count` a single action.
pub fn resolve_selection(raw: &str, action_count: usize) -> Result<Selection> {
    let input = raw.trim();
    let invalid = || HostprepError::InvalidSelection {
        input: input.to_string(),
        max: action_count,
    };
    let n: usize = input.parse().map_err(|_| invalid())?;
    match n {
        0 => Ok(Selection::All),
        n if n <= action_count => Ok(Selection::One(n - 1)),
        _ => Err(invalid()),
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionReport {
    pub name: String,
    pub outcome: Outcome,
    pub steps: Vec<StepRecord>,
}

impl ActionReport {
    pub fn failed_steps(&self) -> impl Iterator<Item = &StepRecord> {
        self.steps.iter().filter(|s| s.outcome == Outcome::Failed)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExecutionReport {
    pub actions: Vec<ActionReport>,
}

impl ExecutionReport {
    pub fn has_failures(&self) -> bool {
        self.actions.iter().any(|a| a.outcome == Outcome::Failed)
    }
}

/// Runs selected actions of a registry against one host.
pub struct Runner<'a> {
    registry: &'a Registry,
    ctx: &'a HostContext,
}

impl<'a> Runner<'a> {
    pub fn new(registry: &'a Registry, ctx: &'a HostContext) -> Self {
        Self { registry, ctx }
    }

    /// Run the selected action(s) in registry order.
    ///
    /// Step failures are recorded and execution moves on. An `Err` from an
    /// action body ends that action as `Failed`; if the error is fatal it is
    /// returned immediately and the actions after it do not run.
    pub fn execute(&self, selection: Selection, io: &mut HostIo) -> Result<ExecutionReport> {
        let indices: Vec<usize> = match selection {
            Selection::All => (0..self.registry.actions().len()).collect(),
            Selection::One(i) => {
                if i >= self.registry.actions().len() {
                    return Err(HostprepError::InvalidSelection {
                        input: (i + 1).to_string(),
                        max: self.registry.actions().len(),
                    });
                }
                vec![i]
            }
        };

        let mut report = ExecutionReport::default();
        for i in indices {
            let Some(action) = self.registry.get(i) else {
                continue;
            };
            tracing::info!(action = action.name(), stage = %action.stage(), "starting action");
            let mut session = Session::new(action.name(), self.ctx, io);
            let result = action.run(&mut session);
            let mut steps = session.into_steps();
            if let Err(e) = result {
                if e.is_fatal() {
                    return Err(e);
                }
                tracing::error!(action = action.name(), "action aborted: {e:#}");
                steps.push(StepRecord {
                    name: "run".to_string(),
                    outcome: Outcome::Failed,
                    detail: Some(e.to_string()),
                });
            }
            let outcome = Outcome::summarize(steps.iter().map(|s| s.outcome));
            tracing::info!(action = action.name(), outcome = %outcome, "finished action");
            report.actions.push(ActionReport {
                name: action.name().to_string(),
                outcome,
                steps,
            });
        }
        Ok(report)
    }
}
