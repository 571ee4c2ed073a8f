use std::path::{Path, PathBuf};

/// Resolve which config file to load.
///
/// Priority:
/// 1. `--config` flag / `HOSTPREP_CONFIG` env var (passed in as `explicit`)
/// 2. `~/.config/hostprep/config.yaml`, if it exists
/// 3. None: built-in defaults
pub fn resolve_config(explicit: Option<&Path>) -> Option<PathBuf> {
    if let Some(p) = explicit {
        return Some(p.to_path_buf());
    }
    home::home_dir().and_then(|home| user_config(&home))
}

fn user_config(home: &Path) -> Option<PathBuf> {
    let path = home.join(".config").join("hostprep").join("config.yaml");
    path.is_file().then_some(path)
}
