// src/language/formatter.rs - External formatter associations

use serde::Deserialize;
use std::path::{Path, PathBuf};

/// `formatter = { command = "...", args = [...] }` on a language.
/// The command is looked up, never run.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct FormatterConfig {
    pub command: String,
    #[serde(default)]
    pub args: Vec<String>,
}

/// Find `command` the way a shell would: as a path if it has a separator,
/// otherwise in each `PATH` directory.
pub fn find_executable(command: &str) -> Option<PathBuf> {
    let path = Path::new(command);
    if path.components().count() > 1 {
        return is_executable(path).then(|| path.to_path_buf());
    }
    let search = std::env::var_os("PATH")?;
    std::env::split_paths(&search)
        .map(|dir| dir.join(command))
        .find(|candidate| is_executable(candidate))
}

#[cfg(unix)]
fn is_executable(path: &Path) -> bool {
    use std::os::unix::fs::PermissionsExt;
    std::fs::metadata(path)
        .map(|m| m.is_file() && m.permissions().mode() & 0o111 != 0)
        .unwrap_or(false)
}

#[cfg(not(unix))]
fn is_executable(path: &Path) -> bool {
    path.is_file() || path.with_extension("exe").is_file()
}
