//! Environment-driven configuration for colorfun front ends.

use std::env;
use std::path::PathBuf;

use dirs_next::{config_dir, home_dir};

use crate::store::DEFAULT_NAMESPACE;

/// Environment variable overriding the directory holding store files.
pub const STORE_DIR_ENV: &str = "COLORFUN_STORE_DIR";

/// Environment variable pointing at a named-color JSON document.
pub const NAMED_COLORS_PATH_ENV: &str = "COLORFUN_NAMED_COLORS_PATH";

/// Environment variable forcing the UI language.
pub const LANG_ENV: &str = "COLORFUN_LANG";

/// Resolved configuration for one process.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    /// Directory holding `<namespace>.json` store files.
    pub store_dir: PathBuf,
    /// Store namespace for the playground session.
    pub namespace: String,
    /// Optional named-color document; the embedded catalog is used when absent.
    pub named_colors_path: Option<PathBuf>,
    /// Raw language override (validated by the caller).
    pub language: Option<String>,
}

impl AppConfig {
    /// Build a configuration from environment variables and platform defaults.
    pub fn from_environment() -> Self {
        Self {
            store_dir: default_store_dir(),
            namespace: DEFAULT_NAMESPACE.to_string(),
            named_colors_path: non_empty_env(NAMED_COLORS_PATH_ENV).map(|path| expand_tilde(&path)),
            language: non_empty_env(LANG_ENV),
        }
    }
}

/// Resolve a user-supplied path, replacing a leading `~` component with the
/// home directory. Paths such as `~alice/x` are left alone.
pub fn expand_tilde(path: &str) -> PathBuf {
    let path = path.trim();
    let Some(rest) = path.strip_prefix('~') else {
        return PathBuf::from(path);
    };
    let relative = match rest.chars().next() {
        None => "",
        Some('/' | '\\') => &rest[1..],
        Some(_) => return PathBuf::from(path),
    };
    match home_dir() {
        Some(home) if relative.is_empty() => home,
        Some(home) => home.join(relative),
        None => PathBuf::from(path),
    }
}

fn default_store_dir() -> PathBuf {
    if let Some(path) = non_empty_env(STORE_DIR_ENV) {
        return expand_tilde(&path);
    }

    config_dir().unwrap_or_else(|| PathBuf::from(".")).join("colorfun")
}

fn non_empty_env(name: &str) -> Option<String> {
    env::var(name)
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}
