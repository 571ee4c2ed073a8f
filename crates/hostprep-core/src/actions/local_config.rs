use crate::error::Result;
use crate::io;
use crate::prompt::Confirm;
use crate::registry::Action;
use crate::session::Session;
use crate::types::Stage;

/// Starter config files under home, and the user bin directory on PATH.
/// Existing files are never overwritten.
pub struct LocalConfig;

impl Action for LocalConfig {
    fn name(&self) -> &str {
        "local-config"
    }

    fn description(&self) -> &str {
        "starter config files and PATH entry"
    }

    fn stage(&self) -> Stage {
        Stage::LocalConfig
    }

    fn run(&self, s: &mut Session<'_>) -> Result<()> {
        let ctx = s.ctx();

        for file in &ctx.config.local_config.files {
            let path = ctx.resolve(&file.path);
            let step = format!("write {}", file.path.display());
            if path.exists() {
                s.already(&step, "file exists");
                continue;
            }
            let question = format!("Create {}?", path.display());
            s.step(&step, Confirm::yes(question), |_| {
                io::write_if_missing(&path, file.contents.as_bytes()).map(|_| ())
            });
        }

        let rc = ctx.shell_rc();
        let export = vec![format!("export PATH=\"{}:$PATH\"", ctx.bin_dir().display())];
        let question = format!("Add {} to PATH in {}?", ctx.bin_dir().display(), rc.display());
        s.step("PATH entry", Confirm::yes(question), |s| {
            s.ensure_lines(&rc, &export, false).map(|_| ())
        });
        Ok(())
    }
}
