use dirs::home_dir;
use std::{
    env, fs, io,
    path::{Path, PathBuf},
};

pub const HOME_ENV_VAR: &str = "DAIRY_CORE_HOME";

const DEFAULT_DIR_NAME: &str = ".dairy_core";
const CONFIG_DIR: &str = "config";
const CONFIG_BACKUP_DIR: &str = "backups";
const CONFIG_FILE: &str = "config.json";
const EXPORT_DIR: &str = "exports";

/// Resolves where the application keeps its files.
pub struct PathResolver;

impl PathResolver {
    /// `$DAIRY_CORE_HOME`, or `~/.dairy_core`.
    pub fn base_dir() -> PathBuf {
        if let Some(custom) = env::var_os(HOME_ENV_VAR) {
            return PathBuf::from(custom);
        }
        home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(DEFAULT_DIR_NAME)
    }

    pub fn config_dir_in(base: &Path) -> PathBuf {
        base.join(CONFIG_DIR)
    }

    pub fn config_file_in(base: &Path) -> PathBuf {
        Self::config_dir_in(base).join(CONFIG_FILE)
    }

    pub fn config_backup_dir_in(base: &Path) -> PathBuf {
        Self::config_dir_in(base).join(CONFIG_BACKUP_DIR)
    }

    /// Default destination for printable statements.
    pub fn exports_dir_in(base: &Path) -> PathBuf {
        base.join(EXPORT_DIR)
    }
}

pub fn ensure_dir(path: &Path) -> io::Result<()> {
    fs::create_dir_all(path)
}
