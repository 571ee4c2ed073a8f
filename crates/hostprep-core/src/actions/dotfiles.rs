use std::path::{Path, PathBuf};

use crate::error::Result;
use crate::io;
use crate::prompt::Confirm;
use crate::registry::Action;
use crate::session::Session;
use crate::types::Stage;

/// Personal dotfiles repository, symlinked into home.
pub struct Dotfiles;

/// What currently sits at a link target.
#[derive(Debug, Clone, PartialEq, Eq)]
enum LinkState {
    /// Already a symlink to the checkout.
    Linked,
    /// The checkout has no such file.
    MissingSource,
    /// Nothing at the target.
    Absent,
    /// Some other file or link is in the way.
    Occupied,
}

fn link_state(source: &Path, target: &Path) -> LinkState {
    if !source.exists() {
        return LinkState::MissingSource;
    }
    match std::fs::read_link(target) {
        Ok(dest) if dest == source => LinkState::Linked,
        Ok(_) => LinkState::Occupied,
        Err(_) if target.symlink_metadata().is_ok() => LinkState::Occupied,
        Err(_) => LinkState::Absent,
    }
}

fn backup_path(target: &Path) -> PathBuf {
    let stamp = chrono::Local::now().format("%Y%m%d%H%M%S");
    let name = target
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    target.with_file_name(format!("{name}.bak-{stamp}"))
}

fn link(source: &Path, target: &Path) -> Result<()> {
    if let Some(parent) = target.parent() {
        io::ensure_dir(parent)?;
    }
    std::os::unix::fs::symlink(source, target)?;
    Ok(())
}

impl Action for Dotfiles {
    fn name(&self) -> &str {
        "dotfiles"
    }

    fn description(&self) -> &str {
        "clone and link personal dotfiles"
    }

    fn stage(&self) -> Stage {
        Stage::Dotfiles
    }

    fn run(&self, s: &mut Session<'_>) -> Result<()> {
        let ctx = s.ctx();
        let cfg = &ctx.config.dotfiles;
        let Some(repo) = cfg.repo.as_deref() else {
            s.skip("clone dotfiles", "no dotfiles repository configured");
            return Ok(());
        };
        let checkout = ctx.resolve(&cfg.dir);

        s.step(
            "clone dotfiles",
            Confirm::yes(format!("Clone {repo} into {}?", checkout.display())),
            |s| {
                s.git()
                    .clone_repo(repo, &checkout, cfg.branch.as_deref(), false)
                    .map(|_| ())
            },
        );

        for spec in &cfg.links {
            let source = checkout.join(&spec.source);
            let target = ctx.resolve(&spec.target);
            let step = format!("link {}", spec.target.display());
            match link_state(&source, &target) {
                LinkState::Linked => s.already(&step, "already linked"),
                LinkState::MissingSource => {
                    s.skip(&step, format!("{} not in checkout", spec.source.display()))
                }
                LinkState::Absent => {
                    let question = format!("Link {} -> {}?", target.display(), source.display());
                    s.step(&step, Confirm::yes(question), |_| link(&source, &target));
                }
                LinkState::Occupied => {
                    let question = format!(
                        "{} exists. Back it up and link {}?",
                        target.display(),
                        source.display()
                    );
                    s.step(&step, Confirm::no(question), |_| {
                        let backup = backup_path(&target);
                        std::fs::rename(&target, &backup)?;
                        tracing::info!(backup = %backup.display(), "moved existing file aside");
                        link(&source, &target)
                    });
                }
            }
        }
        Ok(())
    }
}
