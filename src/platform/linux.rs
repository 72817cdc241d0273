// tabmem config path for Linux: $XDG_CONFIG_HOME/tabmem or ~/.config/tabmem

use std::env;
use std::path::PathBuf;

/// Returns the configuration directory for tabmem on Linux.
pub fn get_config_dir() -> PathBuf {
    config_dir_from(env::var("XDG_CONFIG_HOME").ok(), env::var("HOME").ok())
}

fn config_dir_from(xdg: Option<String>, home: Option<String>) -> PathBuf {
    match xdg.filter(|x| !x.is_empty()) {
        Some(xdg) => PathBuf::from(xdg).join("tabmem"),
        None => PathBuf::from(home.unwrap_or_else(|| String::from("/tmp")))
            .join(".config")
            .join("tabmem"),
    }
}
