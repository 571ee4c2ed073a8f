//! Upfront host checks. A failure here is fatal: nothing runs.

use crate::context::HostContext;
use crate::error::{HostprepError, Result};
use regex::Regex;
use std::collections::HashMap;
use std::path::Path;
use std::sync::OnceLock;

static OS_RELEASE_LINE: OnceLock<Regex> = OnceLock::new();

fn os_release_line() -> &'static Regex {
    OS_RELEASE_LINE
        .get_or_init(|| Regex::new(r"^([A-Z0-9_]+)=(.*)$").expect("os-release line pattern"))
}

/// Parse os-release `KEY=value` pairs, stripping surrounding quotes.
pub fn parse_os_release(content: &str) -> HashMap<String, String> {
    content
        .lines()
        .map(str::trim)
        .filter(|l| !l.starts_with('#'))
        .filter_map(|l| os_release_line().captures(l))
        .map(|caps| {
            let value = caps[2].trim().trim_matches('"').trim_matches('\'');
            (caps[1].to_string(), value.to_string())
        })
        .collect()
}

/// Check that the os-release at `path` names one of `families` in `ID` or `ID_LIKE`.
pub fn check_os_family(path: &Path, families: &[String]) -> Result<()> {
    let content = std::fs::read_to_string(path).map_err(|e| {
        HostprepError::UnsupportedHost(format!("cannot read {}: {e}", path.display()))
    })?;
    let fields = parse_os_release(&content);
    let id = fields.get("ID").map(String::as_str).unwrap_or("");
    let like = fields.get("ID_LIKE").map(String::as_str).unwrap_or("");

    let matches = std::iter::once(id)
        .chain(like.split_whitespace())
        .any(|candidate| families.iter().any(|f| f == candidate));
    if matches {
        return Ok(());
    }

    let name = fields
        .get("PRETTY_NAME")
        .cloned()
        .unwrap_or_else(|| id.to_string());
    Err(HostprepError::UnsupportedHost(format!(
        "'{name}' is not one of: {}",
        families.join(", ")
    )))
}

/// Check that every tool resolves on PATH.
pub fn check_tools<'a, I>(tools: I) -> Result<()>
where
    I: IntoIterator<Item = &'a str>,
{
    for tool in tools {
        if which::which(tool).is_err() {
            return Err(HostprepError::MissingTool(tool.to_string()));
        }
    }
    Ok(())
}

/// Run every guard clause for `ctx`.
pub fn check(ctx: &HostContext) -> Result<()> {
    let host = &ctx.config.host;
    check_os_family(&host.os_release, &host.os_families)?;

    let mut tools: Vec<&str> = host.required_tools.iter().map(String::as_str).collect();
    if ctx.needs_sudo() {
        tools.push("sudo");
    }
    check_tools(tools)?;
    tracing::debug!(os_release = %host.os_release.display(), "guard clauses passed");
    Ok(())
}
