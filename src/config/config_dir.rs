use std::path::PathBuf;

use tracing::debug;

use super::error::{ConfigError, ConfigResult};

/// Overrides every other lookup when set.
pub static CONFIG_ENV: &str = "SYLLABUS_CONFIG";

/// `$SYLLABUS_CONFIG`, then `./config.toml` for local runs, then the per-user config
/// directory, falling back to `./config.toml`.
pub fn find_config_file(use_local: bool) -> PathBuf {
    if let Some(path) = std::env::var_os(CONFIG_ENV) {
        return PathBuf::from(path);
    }

    if use_local {
        return PathBuf::from("./config.toml");
    }

    #[cfg(unix)]
    let base = std::env::var_os("HOME").map(|home| PathBuf::from(home).join(".config"));
    #[cfg(windows)]
    let base = std::env::var_os("APPDATA").map(PathBuf::from);
    #[cfg(not(any(unix, windows)))]
    let base: Option<PathBuf> = None;

    base.map(|dir| dir.join(crate::APPLICATION_NAME).join("config.toml"))
        .filter(|path| path.exists())
        .unwrap_or_else(|| PathBuf::from("./config.toml"))
}

pub fn read_config(use_local: bool) -> ConfigResult<Vec<u8>> {
    let filename = find_config_file(use_local);

    tracing::trace!("looking for config at: {}", filename.display());
    if !filename.exists() {
        return Err(ConfigError::ConfigNotFound(filename.display().to_string()));
    }

    let filename = filename.canonicalize()?;
    debug!("using {} as configuration file", filename.display());

    Ok(std::fs::read(filename)?)
}
