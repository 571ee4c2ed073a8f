use crate::error::Result;
use crate::exec::Cmd;
use crate::prompt::Confirm;
use crate::registry::Action;
use crate::session::Session;
use crate::types::Stage;

/// Kernel parameters, file-descriptor limits and boot arguments needed by
/// search-heavy workloads. All three files are owned by root.
pub struct KernelTuning;

impl Action for KernelTuning {
    fn name(&self) -> &str {
        "kernel-tuning"
    }

    fn description(&self) -> &str {
        "sysctl, limits and boot parameters"
    }

    fn stage(&self) -> Stage {
        Stage::KernelTuning
    }

    fn run(&self, s: &mut Session<'_>) -> Result<()> {
        let cfg = &s.ctx().config.tuning;

        if cfg.sysctl.is_empty() {
            s.skip("sysctl", "nothing configured");
        } else {
            let lines: Vec<String> = cfg.sysctl.iter().map(|e| e.line()).collect();
            let question = format!("Add {} kernel parameters to {}?", lines.len(), cfg.sysctl_file.display());
            // Reload whether or not lines were added.
            s.step("sysctl", Confirm::yes(question), |s| {
                s.ensure_lines(&cfg.sysctl_file, &lines, true)?;
                let reload = Cmd::new("sysctl")
                    .arg("-p")
                    .path_arg(&cfg.sysctl_file)
                    .privileged();
                s.shell().run(&reload)
            });
        }

        if cfg.limits.is_empty() {
            s.skip("limits", "nothing configured");
        } else {
            let question = format!("Raise open-file limits in {}?", cfg.limits_file.display());
            s.step("limits", Confirm::yes(question), |s| {
                s.ensure_lines(&cfg.limits_file, &cfg.limits, true).map(|_| ())
            });
        }

        let Some(grub) = cfg.grub_line() else {
            s.skip("bootloader", "nothing configured");
            return Ok(());
        };
        let question = format!(
            "Append kernel arguments \"{}\" and regenerate the boot config?",
            cfg.grub_cmdline.join(" ")
        );
        s.step("bootloader", Confirm::no(question), |s| {
            s.ensure_lines(&cfg.grub_file, &[grub], true)?;
            let mkconfig = Cmd::new("grub2-mkconfig")
                .arg("-o")
                .path_arg(&cfg.grub_output)
                .privileged();
            s.shell().run(&mkconfig)
        });
        Ok(())
    }
}
