use crate::error::Result;
use crate::io;
use crate::prompt::Confirm;
use crate::registry::Action;
use crate::session::Session;
use crate::types::Stage;

/// Single-file release binaries dropped into the per-user bin directory.
pub struct UserBinaries;

impl Action for UserBinaries {
    fn name(&self) -> &str {
        "user-binaries"
    }

    fn description(&self) -> &str {
        "release binaries into ~/.local/bin"
    }

    fn stage(&self) -> Stage {
        Stage::UserBinaries
    }

    fn run(&self, s: &mut Session<'_>) -> Result<()> {
        let ctx = s.ctx();
        let bin_dir = ctx.bin_dir();
        if ctx.config.binaries.items.is_empty() {
            s.skip("binaries", "nothing configured");
            return Ok(());
        }

        for item in &ctx.config.binaries.items {
            let step = format!("download {}", item.name);
            let dest = bin_dir.join(&item.name);
            if dest.exists() {
                s.already(&step, dest.display().to_string());
                continue;
            }
            let question = format!("Download {} to {}?", item.name, dest.display());
            s.step(&step, Confirm::yes(question), |s| {
                s.download_to(&item.url, &dest)?;
                io::set_executable(&dest)
            });
        }
        Ok(())
    }
}
