use crate::error::Result;
use std::io::Write;
use std::path::Path;
use tempfile::NamedTempFile;

/// Atomically write `data` to `path` using a tempfile in the same directory.
pub fn atomic_write(path: &Path, data: &[u8]) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let dir = path.parent().unwrap_or(Path::new("."));
    let mut tmp = NamedTempFile::new_in(dir)?;
    tmp.write_all(data)?;
    tmp.persist(path).map_err(|e| e.error)?;
    Ok(())
}

/// Create a directory and all parents, idempotent.
pub fn ensure_dir(path: &Path) -> Result<()> {
    std::fs::create_dir_all(path)?;
    Ok(())
}

/// Write a file only if it does not already exist. Returns true if written.
pub fn write_if_missing(path: &Path, data: &[u8]) -> Result<bool> {
    if path.exists() {
        return Ok(false);
    }
    atomic_write(path, data)?;
    Ok(true)
}

/// Append text to a file, creating it (and its parents) if it doesn't exist.
pub fn append_text(path: &Path, text: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let mut f = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)?;
    f.write_all(text.as_bytes())?;
    Ok(())
}

/// Lines of `wanted` with no exact (trimmed) match in `existing`, in order,
/// without duplicates.
pub fn missing_lines<'a>(existing: &str, wanted: &'a [String]) -> Vec<&'a str> {
    let mut missing: Vec<&str> = Vec::new();
    for line in wanted {
        let line = line.trim();
        if line.is_empty() || missing.contains(&line) {
            continue;
        }
        if !existing.lines().any(|l| l.trim() == line) {
            missing.push(line);
        }
    }
    missing
}

/// Text to append so that `lines` follow `existing` on lines of their own.
pub fn append_block(existing: &str, lines: &[&str]) -> String {
    let sep = if existing.is_empty() || existing.ends_with('\n') {
        ""
    } else {
        "\n"
    };
    let mut block = String::from(sep);
    for line in lines {
        block.push_str(line);
        block.push('\n');
    }
    block
}

/// Mark a file executable by everyone (0755).
pub fn set_executable(path: &Path) -> Result<()> {
    use std::os::unix::fs::PermissionsExt;
    std::fs::set_permissions(path, std::fs::Permissions::from_mode(0o755))?;
    Ok(())
}

/// Read a file, treating a missing file as empty.
pub fn read_or_empty(path: &Path) -> Result<String> {
    match std::fs::read_to_string(path) {
        Ok(s) => Ok(s),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(String::new()),
        Err(e) => Err(e.into()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn atomic_write_creates_parents() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("a/b/c/test.conf");
        atomic_write(&path, b"data").unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "data");
    }

    #[test]
    fn write_if_missing_skips_existing() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("existing.txt");
        std::fs::write(&path, b"original").unwrap();
        let written = write_if_missing(&path, b"new").unwrap();
        assert!(!written);
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "original");
    }

    #[test]
    fn missing_lines_exact_match_only() {
        let existing = "vm.max_map_count = 262144\n# fs.file-max = 2097152\n";
        let wanted = vec![
            "vm.max_map_count = 262144".to_string(),
            "fs.file-max = 2097152".to_string(),
            "fs.file-max = 2097152".to_string(),
            "   ".to_string(),
        ];
        assert_eq!(missing_lines(existing, &wanted), ["fs.file-max = 2097152"]);
    }

    #[test]
    fn append_block_adds_separator_when_needed() {
        assert_eq!(append_block("", &["a"]), "a\n");
        assert_eq!(append_block("x\n", &["a", "b"]), "a\nb\n");
        assert_eq!(append_block("x", &["a"]), "\na\n");
    }

    #[test]
    fn read_or_empty_missing_file() {
        let dir = TempDir::new().unwrap();
        assert_eq!(read_or_empty(&dir.path().join("nope")).unwrap(), "");
    }

    #[test]
    fn set_executable_sets_mode() {
        use std::os::unix::fs::PermissionsExt;
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("tool");
        std::fs::write(&path, b"#!/bin/sh\n").unwrap();
        set_executable(&path).unwrap();
        let mode = std::fs::metadata(&path).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o755);
    }

    #[test]
    fn append_text_creates_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("rc/.bashrc");
        append_text(&path, "one\n").unwrap();
        append_text(&path, "two\n").unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "one\ntwo\n");
    }
}
