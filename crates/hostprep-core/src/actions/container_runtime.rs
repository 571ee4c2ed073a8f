use crate::error::Result;
use crate::exec::Cmd;
use crate::prompt::Confirm;
use crate::registry::Action;
use crate::session::Session;
use crate::types::Stage;

/// Docker engine from the upstream repository, plus group membership for the
/// operator so compose commands work without sudo after the next login.
pub struct ContainerRuntimeInstall;

impl Action for ContainerRuntimeInstall {
    fn name(&self) -> &str {
        "container-runtime"
    }

    fn description(&self) -> &str {
        "docker engine and compose plugin"
    }

    fn stage(&self) -> Stage {
        Stage::ContainerRuntime
    }

    fn run(&self, s: &mut Session<'_>) -> Result<()> {
        let ctx = s.ctx();
        let cfg = &ctx.config.container;

        if s.docker().available() {
            s.already("install docker", "docker is on PATH");
        } else {
            s.step(
                "install docker",
                Confirm::yes("Install docker from the upstream repository?"),
                |s| {
                    let pm = ctx.config.host.package_manager.as_str();
                    s.docker().install(cfg, pm)
                },
            );
        }

        if ctx.user == "root" {
            s.skip("docker group", "running as root");
            return Ok(());
        }
        let groups = s
            .shell()
            .capture(&Cmd::new("id").args(["-nG", ctx.user.as_str()]))
            .unwrap_or_default();
        if groups.split_whitespace().any(|g| g == cfg.group) {
            s.already("docker group", format!("{} is in {}", ctx.user, cfg.group));
            return Ok(());
        }
        let question = format!("Add {} to the {} group?", ctx.user, cfg.group);
        s.step("docker group", Confirm::yes(question), |s| {
            s.docker().add_user_to_group(&ctx.user, &cfg.group)
        });
        Ok(())
    }
}
