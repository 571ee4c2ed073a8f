use crate::error::Result;
use crate::prompt::Confirm;
use crate::registry::Action;
use crate::session::Session;
use crate::types::Stage;

/// Installs asdf from git, hooks it into the shell, then adds each configured
/// plugin, installs its version and makes that version the global default.
pub struct VersionManagerSetup;

impl Action for VersionManagerSetup {
    fn name(&self) -> &str {
        "version-manager"
    }

    fn description(&self) -> &str {
        "asdf version manager and tool plugins"
    }

    fn stage(&self) -> Stage {
        Stage::VersionManager
    }

    fn run(&self, s: &mut Session<'_>) -> Result<()> {
        let ctx = s.ctx();
        let cfg = &ctx.config.version_manager;
        let dir = ctx.asdf_dir();

        if s.asdf().is_installed() {
            s.already("clone asdf", dir.display().to_string());
        } else {
            let question = format!("Install asdf {} into {}?", cfg.branch, dir.display());
            s.step("clone asdf", Confirm::yes(question), |s| {
                s.git()
                    .clone_repo(&cfg.repo, &dir, Some(cfg.branch.as_str()), true)
                    .map(|_| ())
            });
        }

        let rc = ctx.shell_rc();
        let hook = vec![s.asdf().rc_line()];
        s.step(
            "shell hook",
            Confirm::yes(format!("Load asdf from {}?", rc.display())),
            |s| s.ensure_lines(&rc, &hook, false).map(|_| ()),
        );

        if !s.asdf().is_installed() {
            s.skip("plugins", "asdf is not installed");
            return Ok(());
        }
        for plugin in &cfg.plugins {
            let question = format!(
                "Install {} {} and make it the global default?",
                plugin.name, plugin.version
            );
            s.step(
                &format!("{} {}", plugin.name, plugin.version),
                Confirm::yes(question),
                |s| {
                    let mut asdf = s.asdf();
                    asdf.add_plugin(&plugin.name, plugin.url.as_deref())?;
                    asdf.install_version(&plugin.name, &plugin.version)?;
                    asdf.set_global(&plugin.name, &plugin.version)
                },
            );
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

    #[test]
    fn fresh_host_clones_then_skips_plugins() {
        let dir = TempDir::new().unwrap();
        let ctx = test_ctx(dir.path());
        let shell = RecordingShell::new();
        let mut io = host_io(&shell, ScriptedDecider::defaults());
        let mut session = Session::new("version-manager", &ctx, &mut io);
        VersionManagerSetup.run(&mut session).unwrap();

        let cmds = shell.displays();
        assert_eq!(cmds.len(), 1);
        assert!(cmds[0].starts_with("git clone --depth 1 --branch v0.14.0"));

        let rc = std::fs::read_to_string(dir.path().join(".bashrc")).unwrap();
        assert!(rc.contains(".asdf/asdf.sh"));

        let steps = session.into_steps();
        assert_eq!(steps.last().unwrap().name, "plugins");
        assert_eq!(steps.last().unwrap().outcome, Outcome::Skipped);
    }

    #[test]
    fn installed_asdf_sets_up_each_plugin() {
        let dir = TempDir::new().unwrap();
        let bin = dir.path().join(".asdf/bin");
        std::fs::create_dir_all(&bin).unwrap();
        std::fs::write(bin.join("asdf"), b"").unwrap();

        let mut ctx = test_ctx(dir.path());
        ctx.config.version_manager.plugins.truncate(1);
        let shell = RecordingShell::new().respond("plugin list", "nodejs\n");
        let mut io = host_io(&shell, ScriptedDecider::defaults());
        let mut session = Session::new("version-manager", &ctx, &mut io);
        VersionManagerSetup.run(&mut session).unwrap();

        let asdf = bin.join("asdf").display().to_string();
        let cmds = shell.displays();
        assert_eq!(
            cmds,
            [
                format!("{asdf} plugin list"),
                format!("{asdf} plugin add python"),
                format!("{asdf} install python 3.12.4"),
                format!("{asdf} global python 3.12.4"),
            ]
        );
        let steps = session.into_steps();
        assert_eq!(steps[0].name, "clone asdf");
        assert_eq!(steps[0].outcome, Outcome::Completed);
        assert!(steps.iter().all(|s| s.outcome == Outcome::Completed));
    }

    #[test]
    fn failed_plugin_does_not_stop_the_next() {
        let dir = TempDir::new().unwrap();
        let bin = dir.path().join(".asdf/bin");
        std::fs::create_dir_all(&bin).unwrap();
        std::fs::write(bin.join("asdf"), b"").unwrap();

        let ctx = test_ctx(dir.path());
        let shell = RecordingShell::new().fail_on("install python");
        let mut io = host_io(&shell, ScriptedDecider::defaults());
        let mut session = Session::new("version-manager", &ctx, &mut io);
        VersionManagerSetup.run(&mut session).unwrap();

        let steps = session.into_steps();
        let by_name = |n: &str| steps.iter().find(|s| s.name == n).unwrap().outcome;
        assert_eq!(by_name("python 3.12.4"), Outcome::Failed);
        assert_eq!(by_name("nodejs 20.15.0"), Outcome::Completed);
        assert_eq!(by_name("golang 1.22.4"), Outcome::Completed);
    }
}
