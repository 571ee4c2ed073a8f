use crate::error::Result;
use crate::prompt::Confirm;
use crate::registry::Action;
use crate::session::Session;
use crate::types::Stage;

/// Python and Node packages installed through the asdf-managed toolchains.
pub struct LanguagePackages;

impl Action for LanguagePackages {
    fn name(&self) -> &str {
        "language-packages"
    }

    fn description(&self) -> &str {
        "pip and npm packages via asdf"
    }

    fn stage(&self) -> Stage {
        Stage::LanguagePackages
    }

    fn run(&self, s: &mut Session<'_>) -> Result<()> {
        let cfg = &s.ctx().config.language_packages;
        if cfg.pip.is_empty() && cfg.npm.is_empty() {
            s.skip("packages", "nothing configured");
            return Ok(());
        }
        if !s.asdf().is_installed() {
            s.skip("packages", "asdf is not installed; run version-manager first");
            return Ok(());
        }

        if !cfg.pip.is_empty() {
            let question = format!("pip install --user {}?", cfg.pip.join(" "));
            s.step("pip packages", Confirm::yes(question), |s| {
                let args = ["pip", "install", "--user"]
                    .into_iter()
                    .map(String::from)
                    .chain(cfg.pip.iter().cloned());
                s.asdf().exec(args)
            });
        }

        if !cfg.npm.is_empty() {
            let question = format!("npm install -g {}?", cfg.npm.join(" "));
            s.step("npm packages", Confirm::yes(question), |s| {
                let args = ["npm", "install", "-g"]
                    .into_iter()
                    .map(String::from)
                    .chain(cfg.npm.iter().cloned());
                s.asdf().exec(args)
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::prompt::ScriptedDecider;
    use crate::testing::{host_io, test_ctx, RecordingShell};
    use crate::types::Outcome;
    use tempfile::TempDir;

    fn with_asdf(dir: &TempDir) {
        let bin = dir.path().join(".asdf/bin");
        std::fs::create_dir_all(&bin).unwrap();
        std::fs::write(bin.join("asdf"), b"").unwrap();
    }

    #[test]
    fn installs_through_asdf_exec() {
        let dir = TempDir::new().unwrap();
        with_asdf(&dir);
        let ctx = test_ctx(dir.path());
        let shell = RecordingShell::new();
        let mut io = host_io(&shell, ScriptedDecider::defaults());
        let mut session = Session::new("language-packages", &ctx, &mut io);
        LanguagePackages.run(&mut session).unwrap();

        let cmds = shell.displays();
        assert_eq!(cmds.len(), 2);
        assert!(cmds[0].ends_with("asdf exec pip install --user ansible yamllint"));
        assert!(cmds[1].ends_with("asdf exec npm install -g pnpm"));
    }

    #[test]
    fn declined_pip_still_installs_npm() {
        let dir = TempDir::new().unwrap();
        with_asdf(&dir);
        let ctx = test_ctx(dir.path());
        let shell = RecordingShell::new();
        let mut io = host_io(&shell, ScriptedDecider::new([false, true]));
        let mut session = Session::new("language-packages", &ctx, &mut io);
        LanguagePackages.run(&mut session).unwrap();

        let outcomes: Vec<Outcome> = session.steps().iter().map(|s| s.outcome).collect();
        assert_eq!(outcomes, [Outcome::Skipped, Outcome::Completed]);
        assert_eq!(shell.displays().len(), 1);
    }

    #[test]
    fn without_asdf_nothing_runs() {
        let dir = TempDir::new().unwrap();
        let ctx = test_ctx(dir.path());
        let shell = RecordingShell::new();
        let mut io = host_io(&shell, ScriptedDecider::defaults());
        let mut session = Session::new("language-packages", &ctx, &mut io);
        LanguagePackages.run(&mut session).unwrap();
        assert!(shell.commands().is_empty());
        assert_eq!(session.steps()[0].outcome, Outcome::Skipped);
    }
}
