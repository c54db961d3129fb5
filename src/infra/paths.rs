// src/infra/paths.rs — Config and data path management
//
// All paths respect the WAYRANK_HOME environment variable for isolation.
// When WAYRANK_HOME is set, config and data live under that directory.
// When unset, config uses ~/.wayrank/ and data uses XDG_DATA_HOME/wayrank.

use directories::{BaseDirs, ProjectDirs};
use std::path::PathBuf;

/// Returns the WAYRANK_HOME override, if set.
fn wayrank_home() -> Option<PathBuf> {
    std::env::var_os("WAYRANK_HOME").map(PathBuf::from)
}

/// Configuration directory: $WAYRANK_HOME/ or ~/.wayrank/
pub fn config_dir() -> PathBuf {
    if let Some(home) = wayrank_home() {
        return home;
    }
    match BaseDirs::new() {
        Some(base) => base.home_dir().join(".wayrank"),
        None => PathBuf::from(".wayrank"),
    }
}

/// Data directory: $WAYRANK_HOME/data/ or ~/.local/share/wayrank/
pub fn data_dir() -> PathBuf {
    if let Some(home) = wayrank_home() {
        return home.join("data");
    }
    match ProjectDirs::from("", "", "wayrank") {
        Some(dirs) => dirs.data_local_dir().to_path_buf(),
        None => config_dir().join("data"),
    }
}

/// Database path
pub fn db_path() -> PathBuf {
    data_dir().join("wayrank.db")
}

/// Config file path
pub fn config_file_path() -> PathBuf {
    config_dir().join("config.toml")
}

/// Ensure config and data directories exist
pub fn ensure_dirs() -> std::io::Result<()> {
    for dir in [config_dir(), data_dir()] {
        std::fs::create_dir_all(dir)?;
    }
    Ok(())
}
