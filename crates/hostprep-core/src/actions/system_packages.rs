use crate::error::Result;
use crate::prompt::Confirm;
use crate::registry::Action;
use crate::session::Session;
use crate::types::Stage;

/// OS packages from the distribution repositories.
pub struct SystemPackages;

impl Action for SystemPackages {
    fn name(&self) -> &str {
        "system-packages"
    }

    fn description(&self) -> &str {
        "system update and base packages"
    }

    fn stage(&self) -> Stage {
        Stage::OsPackages
    }

    fn run(&self, s: &mut Session<'_>) -> Result<()> {
        let cfg = &s.ctx().config.system_packages;

        s.step(
            "system update",
            Confirm::no("Update all installed packages first?"),
            |s| s.packages().update(),
        );

        if cfg.packages.is_empty() {
            s.skip("install packages", "nothing configured");
            return Ok(());
        }
        let missing: Vec<String> = s
            .packages()
            .missing(&cfg.packages)
            .into_iter()
            .map(str::to_string)
            .collect();
        if missing.is_empty() {
            s.already("install packages", "all configured packages are installed");
            return Ok(());
        }
        let question = format!("Install {}?", missing.join(" "));
        s.step("install packages", Confirm::yes(question), |s| {
            s.packages().install(&missing)
        });
        Ok(())
    }
}
