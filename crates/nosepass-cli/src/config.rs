use std::path::{Path, PathBuf};

use nosepass_core::config::CONFIG_FILE_NAME;
use nosepass_core::NosepassError;

/// Resolve the config path: explicit flag or `NOSEPASS_CONFIG` first, then
/// `~/.nosepass`.
pub fn resolve_config_path(explicit: Option<&Path>) -> anyhow::Result<PathBuf> {
    if let Some(path) = explicit {
        return Ok(path.to_path_buf());
    }
    default_config_path()
}

pub fn default_config_path() -> anyhow::Result<PathBuf> {
    Ok(home_dir()?.join(CONFIG_FILE_NAME))
}

fn home_dir() -> anyhow::Result<PathBuf> {
    match std::env::var("HOME") {
        Ok(home) if !home.trim().is_empty() => Ok(PathBuf::from(home)),
        _ => Err(NosepassError::ConfigIo(
            "HOME environment variable must be set".to_string(),
        )
        .into()),
    }
}
