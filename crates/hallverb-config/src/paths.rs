//! Platform-specific paths for user presets.
//!
//! - **User presets**: `~/.config/hallverb/presets/` (Linux),
//!   `~/Library/Application Support/hallverb/presets/` (macOS),
//!   `%APPDATA%\hallverb\presets\` (Windows)

use std::path::{Path, PathBuf};

use crate::error::{ConfigError, Result};

const APP_NAME: &str = "hallverb";
const PRESETS_SUBDIR: &str = "presets";

/// Returns the user-specific configuration directory.
///
/// Falls back to the current directory if the platform config directory
/// cannot be determined.
pub fn user_config_dir() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(APP_NAME)
}

/// Returns the user-specific presets directory.
pub fn user_presets_dir() -> PathBuf {
    user_config_dir().join(PRESETS_SUBDIR)
}

/// Find a preset file by path or by name in the user presets directory.
///
/// A name without extension gets `.toml` appended.
pub fn find_preset(name: &str) -> Option<PathBuf> {
    find_preset_in(name, &user_presets_dir())
}

fn find_preset_in(name: &str, dir: &Path) -> Option<PathBuf> {
    let path = PathBuf::from(name);
    if path.is_file() {
        return Some(path);
    }

    let filename = if name.ends_with(".toml") {
        name.to_string()
    } else {
        format!("{name}.toml")
    };
    let user_path = dir.join(filename);
    user_path.is_file().then_some(user_path)
}

/// Ensure the user presets directory exists.
pub fn ensure_user_presets_dir() -> Result<PathBuf> {
    let dir = user_presets_dir();
    if !dir.exists() {
        std::fs::create_dir_all(&dir).map_err(|e| ConfigError::create_dir(&dir, e))?;
    }
    Ok(dir)
}

/// List all `.toml` files in the user presets directory.
///
/// Returns an empty vector if the directory doesn't exist or can't be read.
pub fn list_user_presets() -> Vec<PathBuf> {
    list_presets_in_dir(&user_presets_dir())
}

fn list_presets_in_dir(dir: &Path) -> Vec<PathBuf> {
    let Ok(entries) = std::fs::read_dir(dir) else {
        return Vec::new();
    };

    let mut presets: Vec<PathBuf> = entries
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| path.is_file() && path.extension().is_some_and(|ext| ext == "toml"))
        .collect();
    presets.sort();
    presets
}

/// Get the preset name from a file path (the file stem).
///
/// ```rust
/// use hallverb_config::paths::preset_name_from_path;
/// use std::path::Path;
///
/// let name = preset_name_from_path(Path::new("/path/to/big_room.toml"));
/// assert_eq!(name, Some("big_room".to_string()));
/// ```
pub fn preset_name_from_path(path: &Path) -> Option<String> {
    path.file_stem()
        .and_then(|s| s.to_str())
        .map(ToString::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_user_presets_dir_layout() {
        let dir = user_presets_dir();
        assert!(dir.ends_with("hallverb/presets"), "got {}", dir.display());
    }

    #[test]
    fn test_find_preset_by_name_and_path() {
        let temp = TempDir::new().unwrap();
        let file = temp.path().join("vault.toml");
        fs::write(&file, "name = \"Vault\"").unwrap();

        assert_eq!(find_preset_in("vault", temp.path()), Some(file.clone()));
        assert_eq!(find_preset_in("vault.toml", temp.path()), Some(file.clone()));
        let as_path = file.to_string_lossy().into_owned();
        assert_eq!(find_preset_in(&as_path, Path::new("/nonexistent")), Some(file));
        assert_eq!(find_preset_in("missing", temp.path()), None);
    }

    #[test]
    fn test_list_presets_filters_and_sorts() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("b.toml"), "").unwrap();
        fs::write(temp.path().join("a.toml"), "").unwrap();
        fs::write(temp.path().join("notes.txt"), "").unwrap();
        fs::create_dir(temp.path().join("dir.toml")).unwrap();

        let names: Vec<String> = list_presets_in_dir(temp.path())
            .iter()
            .filter_map(|p| preset_name_from_path(p))
            .collect();
        assert_eq!(names, ["a", "b"]);
        assert!(list_presets_in_dir(Path::new("/nonexistent/dir")).is_empty());
    }
}
