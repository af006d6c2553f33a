//! Platform-specific paths for configuration and saved profiles.
//!
//! # Directory Structure
//!
//! - **User config**: `~/.config/timbre/` (Linux),
//!   `~/Library/Application Support/timbre/` (macOS), `%APPDATA%\timbre\` (Windows)
//! - **Default config file**: `config.toml` inside the user config directory
//! - **User profiles**: `profiles/` inside the user config directory
//!
//! # Example
//!
//! ```rust,no_run
//! use timbre_config::paths;
//!
//! if let Some(path) = paths::find_profile("voice") {
//!     println!("Found profile at: {:?}", path);
//! }
//! ```

use std::path::{Path, PathBuf};

/// Application name used for directory paths.
const APP_NAME: &str = "timbre";

/// Subdirectory name for saved profiles.
const PROFILES_SUBDIR: &str = "profiles";

/// File name of the default configuration.
const CONFIG_FILE: &str = "config.toml";

/// Returns the user-specific configuration directory.
///
/// Returns a fallback path if the config directory cannot be determined.
pub fn user_config_dir() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(APP_NAME)
}

/// Returns the path of the default configuration file.
///
/// The file need not exist.
pub fn default_config_path() -> PathBuf {
    user_config_dir().join(CONFIG_FILE)
}

/// Returns the directory holding user-saved profiles.
pub fn user_profiles_dir() -> PathBuf {
    user_config_dir().join(PROFILES_SUBDIR)
}

/// Find a profile file by name.
///
/// `name` may be a path to an existing file, or a profile name (with or
/// without `.toml`) looked up in [`user_profiles_dir`].
pub fn find_profile(name: &str) -> Option<PathBuf> {
    let path = PathBuf::from(name);
    if path.is_file() {
        return Some(path);
    }

    let filename = if name.ends_with(".toml") {
        name.to_string()
    } else {
        format!("{name}.toml")
    };

    let user_path = user_profiles_dir().join(filename);
    user_path.is_file().then_some(user_path)
}

/// Ensure the user config directory exists.
///
/// # Errors
///
/// Returns an error if the directory cannot be created.
pub fn ensure_user_config_dir() -> Result<PathBuf, crate::ConfigError> {
    let dir = user_config_dir();

    if !dir.exists() {
        std::fs::create_dir_all(&dir).map_err(|e| crate::ConfigError::create_dir(&dir, e))?;
    }

    Ok(dir)
}

/// List all profile files in the user profiles directory.
///
/// Returns an empty vector if the directory doesn't exist or can't be read.
pub fn list_user_profiles() -> Vec<PathBuf> {
    list_profiles_in_dir(&user_profiles_dir())
}

fn list_profiles_in_dir(dir: &Path) -> Vec<PathBuf> {
    let Ok(entries) = std::fs::read_dir(dir) else {
        return Vec::new();
    };

    let mut profiles: Vec<PathBuf> = entries
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| path.is_file() && path.extension().is_some_and(|ext| ext == "toml"))
        .collect();
    profiles.sort();
    profiles
}

/// Get the profile name from a file path.
///
/// # Example
///
/// ```rust
/// use timbre_config::paths::profile_name_from_path;
/// use std::path::Path;
///
/// let name = profile_name_from_path(Path::new("/path/to/voice.toml"));
/// assert_eq!(name, Some("voice".to_string()));
/// ```
pub fn profile_name_from_path(path: &Path) -> Option<String> {
    path.file_stem()
        .and_then(|s| s.to_str())
        .map(|s| s.to_string())
}
