//! The fixed set of provisioning actions and the menu built from it.

use std::collections::HashSet;

use crate::actions;
use crate::error::{HostprepError, Result};
use crate::session::Session;
use crate::types::Stage;

/// One named, independently selectable unit of provisioning work.
///
/// `run` returns `Err` only for fatal problems (a guard the action depends
/// on). Sub-step failures are recorded through [`Session::step`] instead.
pub trait Action {
    fn name(&self) -> &str;
    fn description(&self) -> &str;
    fn stage(&self) -> Stage;
    fn run(&self, session: &mut Session<'_>) -> Result<()>;
}

pub struct Registry {
    actions: Vec<Box<dyn Action>>,
}

impl Registry {
    /// Order `actions` by stage, keeping registration order within a stage.
    /// Names must be unique.
    pub fn new(mut actions: Vec<Box<dyn Action>>) -> Result<Self> {
        let mut seen = HashSet::new();
        for action in &actions {
            if !seen.insert(action.name().to_string()) {
                return Err(HostprepError::DuplicateAction(action.name().to_string()));
            }
        }
        actions.sort_by_key(|a| a.stage());
        Ok(Self { actions })
    }

    /// Every built-in action.
    pub fn builtin() -> Result<Self> {
        Self::new(vec![
            Box::new(actions::VersionManagerSetup),
            Box::new(actions::LanguagePackages),
            Box::new(actions::SystemPackages),
            Box::new(actions::ContainerRuntimeInstall),
            Box::new(actions::KernelTuning),
            Box::new(actions::UserBinaries),
            Box::new(actions::LocalConfig),
            Box::new(actions::Dotfiles),
            Box::new(actions::LogPlatform),
        ])
    }

    pub fn actions(&self) -> &[Box<dyn Action>] {
        &self.actions
    }

    pub fn get(&self, index: usize) -> Option<&dyn Action> {
        self.actions.get(index).map(|a| a.as_ref())
    }
}

/// Numbered listing: `0) all`, then `i) name` for each action.
pub fn render_menu(actions: &[Box<dyn Action>]) -> String {
    let width = actions.len().to_string().len();
    let mut out = format!("{:>width$}) all\n", 0);
    for (i, action) in actions.iter().enumerate() {
        out.push_str(&format!(
            "{:>width$}) {:<20} {}\n",
            i + 1,
            action.name(),
            action.description()
        ));
    }
    out
}
