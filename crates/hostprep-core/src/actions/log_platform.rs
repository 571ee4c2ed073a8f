use crate::error::{HostprepError, Result};
use crate::prompt::Confirm;
use crate::registry::Action;
use crate::session::Session;
use crate::types::Stage;

/// A containerised log-management stack plus sample log datasets to feed it.
///
/// Needs a working docker; without one the run stops here rather than
/// cloning a stack nothing can start.
pub struct LogPlatform;

impl Action for LogPlatform {
    fn name(&self) -> &str {
        "log-platform"
    }

    fn description(&self) -> &str {
        "log platform compose stack and sample datasets"
    }

    fn stage(&self) -> Stage {
        Stage::Application
    }

    fn run(&self, s: &mut Session<'_>) -> Result<()> {
        if !s.docker().available() {
            return Err(HostprepError::MissingTool(
                "docker (run container-runtime first)".to_string(),
            ));
        }
        let ctx = s.ctx();
        let cfg = &ctx.config.log_platform;
        let checkout = ctx.resolve(&cfg.dir);

        s.step(
            "clone platform",
            Confirm::yes(format!("Clone {} into {}?", cfg.repo, checkout.display())),
            |s| {
                s.git()
                    .clone_repo(&cfg.repo, &checkout, cfg.branch.as_deref(), true)
                    .map(|_| ())
            },
        );

        let compose_dir = checkout.join(&cfg.compose_dir);
        if compose_dir.is_dir() {
            let question = format!("Pull images for {}?", cfg.services.join(", "));
            s.step("pull images", Confirm::yes(question), |s| {
                s.docker().pull(&compose_dir, &cfg.services)
            });
        } else {
            s.skip(
                "pull images",
                format!("{} does not exist", compose_dir.display()),
            );
        }

        let data_dir = ctx.resolve(&cfg.data_dir);
        for dataset in &cfg.datasets {
            let step = format!("dataset {}", dataset.name);
            let dest = data_dir.join(&dataset.name);
            if dest.exists() {
                s.already(&step, dest.display().to_string());
                continue;
            }
            let question = format!("Download sample dataset {}?", dataset.name);
            s.step(&step, Confirm::yes(question), |s| {
                s.download_to(&dataset.url, &dest)
            });
        }
        Ok(())
    }
}
