// Cache and config path utilities.

use std::path::{Path, PathBuf};

use directories::ProjectDirs;

/// Default cache file, relative to the working directory.
pub const DEFAULT_CACHE_FILE: &str = "superstore.csv";

/// Get the platform config directory (~/.config/superstore on Linux).
pub fn config_dir() -> Option<PathBuf> {
    ProjectDirs::from("", "", "superstore").map(|dirs| dirs.config_dir().to_path_buf())
}

/// Path to the config file.
pub fn config_path() -> Option<PathBuf> {
    config_dir().map(|dir| dir.join("config.json"))
}

/// Path for one endpoint's raw table, stored next to the joined cache file.
pub fn intermediate_path(cache_path: &Path, endpoint: &str) -> PathBuf {
    let file = format!("{}.csv", sanitize_name(endpoint));
    match cache_path.parent() {
        Some(dir) => dir.join(file),
        None => PathBuf::from(file),
    }
}

/// Sanitize a name for use in filesystem paths.
/// Replaces problematic characters with underscores.
fn sanitize_name(name: &str) -> String {
    name.chars()
        .map(|c| match c {
            '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '_',
            _ => c,
        })
        .collect()
}
