use dirs::home_dir;
use std::{env, fs, io, path::Path, path::PathBuf};

const DEFAULT_DIR_NAME: &str = ".kara";
const CONFIG_FILE: &str = "config.json";
const DATA_FILE: &str = "snapshot.json";

/// Returns the application data directory, defaulting to `~/.kara`.
pub fn app_data_dir() -> PathBuf {
    if let Some(custom) = env::var_os("KARA_HOME") {
        return PathBuf::from(custom);
    }
    home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(DEFAULT_DIR_NAME)
}

pub fn config_file_in(base: &Path) -> PathBuf {
    base.join(CONFIG_FILE)
}

/// Snapshot file used when neither the CLI nor the config names one.
pub fn default_data_file_in(base: &Path) -> PathBuf {
    base.join(DATA_FILE)
}

pub fn ensure_dir(path: &Path) -> io::Result<()> {
    if !path.as_os_str().is_empty() && !path.exists() {
        fs::create_dir_all(path)?;
    }
    Ok(())
}
