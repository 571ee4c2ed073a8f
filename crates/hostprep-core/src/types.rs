use std::fmt;

// ---------------------------------------------------------------------------
// Stage
// ---------------------------------------------------------------------------

/// Position of an action in the fixed dependency order.
///
/// Declaration order is execution order when running everything: the version
/// manager must exist before language packages go through it, the container
/// runtime must exist before the application that runs on it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Stage {
    VersionManager,
    LanguagePackages,
    OsPackages,
    ContainerRuntime,
    KernelTuning,
    UserBinaries,
    LocalConfig,
    Dotfiles,
    Application,
}

impl Stage {
    pub fn all() -> &'static [Stage] {
        &[
            Stage::VersionManager,
            Stage::LanguagePackages,
            Stage::OsPackages,
            Stage::ContainerRuntime,
            Stage::KernelTuning,
            Stage::UserBinaries,
            Stage::LocalConfig,
            Stage::Dotfiles,
            Stage::Application,
        ]
    }

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Stage::VersionManager => "version_manager",
            Stage::LanguagePackages => "language_packages",
            Stage::OsPackages => "os_packages",
            Stage::ContainerRuntime => "container_runtime",
            Stage::KernelTuning => "kernel_tuning",
            Stage::UserBinaries => "user_binaries",
            Stage::LocalConfig => "local_config",
            Stage::Dotfiles => "dotfiles",
            Stage::Application => "application",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Outcome
// ---------------------------------------------------------------------------

/// Result of one step or one action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Completed,
    /// The operator declined the confirmation, or there was nothing configured.
    Skipped,
    Failed,
}

impl Outcome {
    pub fn as_str(self) -> &'static str {
        match self {
            Outcome::Completed => "completed",
            Outcome::Skipped => "skipped",
            Outcome::Failed => "failed",
        }
    }

    /// Fold step outcomes into the outcome of the action that ran them.
    ///
    /// Any failure wins; an action whose every step was skipped is skipped;
    /// an action with no steps at all completed.
    pub fn summarize<I>(steps: I) -> Outcome
    where
        I: IntoIterator<Item = Outcome>,
    {
        let mut any = false;
        let mut all_skipped = true;
        for outcome in steps {
            any = true;
            match outcome {
                Outcome::Failed => return Outcome::Failed,
                Outcome::Completed => all_skipped = false,
                Outcome::Skipped => {}
            }
        }
        if any && all_skipped {
            Outcome::Skipped
        } else {
            Outcome::Completed
        }
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stage_order_matches_declaration() {
        let all = Stage::all();
        for (i, stage) in all.iter().enumerate() {
            assert_eq!(stage.index(), i);
        }
        assert!(Stage::VersionManager < Stage::LanguagePackages);
        assert!(Stage::ContainerRuntime < Stage::Application);
    }

    #[test]
    fn summarize_failure_wins() {
        let outcome = Outcome::summarize([Outcome::Completed, Outcome::Failed, Outcome::Skipped]);
        assert_eq!(outcome, Outcome::Failed);
    }

    #[test]
    fn summarize_all_skipped() {
        let outcome = Outcome::summarize([Outcome::Skipped, Outcome::Skipped]);
        assert_eq!(outcome, Outcome::Skipped);
    }

    #[test]
    fn summarize_mixed_and_empty() {
        assert_eq!(
            Outcome::summarize([Outcome::Skipped, Outcome::Completed]),
            Outcome::Completed
        );
        assert_eq!(Outcome::summarize([]), Outcome::Completed);
    }
}
