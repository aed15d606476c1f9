//! Utility helpers — data directory resolution.

use std::path::PathBuf;

/// Get the Chatrelay data directory (e.g. `~/.chatrelay/`).
pub fn get_data_path() -> PathBuf {
    let home = dirs_next::home_dir().unwrap_or_else(|| PathBuf::from("."));
    home.join(".chatrelay")
}
