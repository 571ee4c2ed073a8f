use anyhow::Context;
use hostprep_core::config::{Config, WarnLevel};
use hostprep_core::context::HostContext;
use hostprep_core::exec::SystemShell;
use hostprep_core::fetch::HttpFetcher;
use hostprep_core::guard;
use hostprep_core::prompt::TerminalDecider;
use hostprep_core::registry::{render_menu, Registry};
use hostprep_core::runner::{resolve_selection, Runner};
use hostprep_core::session::HostIo;
use std::io::{BufRead, Write};
use std::path::Path;

use crate::output;

pub fn run(config_path: Option<&Path>) -> anyhow::Result<()> {
    let config = Config::load(config_path).context("failed to load config")?;
    for warning in config.validate() {
        match warning.level {
            WarnLevel::Error => tracing::error!("config: {}", warning.message),
            WarnLevel::Warning => tracing::warn!("config: {}", warning.message),
        }
    }

    let ctx = HostContext::detect(config)?;
    guard::check(&ctx)?;
    tracing::info!(user = %ctx.user, elevated = ctx.elevated, "host checks passed");

    let registry = Registry::builtin()?;
    let mut stdout = std::io::stdout();
    write!(stdout, "{}", render_menu(registry.actions()))?;
    write!(stdout, "Select an action: ")?;
    stdout.flush()?;

    let mut stdin = std::io::stdin().lock();
    let mut line = String::new();
    stdin
        .read_line(&mut line)
        .context("failed to read selection")?;
    let selection = resolve_selection(&line, registry.actions().len())?;

    let mut io = HostIo::new(
        SystemShell::new(ctx.needs_sudo()),
        HttpFetcher::new(),
        TerminalDecider::new(stdin, stdout),
    );
    let report = Runner::new(&registry, &ctx).execute(selection, &mut io)?;

    output::print_summary(&report);
    if report.has_failures() {
        tracing::warn!("some steps failed; see the summary above");
    }
    Ok(())
}
