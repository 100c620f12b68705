//! Path resolution for dagctl
//!
//! # Environment Variables
//!
//! - `DAGCTL_CONFIG_DIR` - Override config directory
//!
//! # Path Resolution Priority
//!
//! For config_dir():
//! 1. `DAGCTL_CONFIG_DIR` environment variable
//! 2. `XDG_CONFIG_HOME/dagctl` (if set)
//! 3. Platform default:
//!    - Windows: `%APPDATA%\dagctl`
//!    - macOS/Linux: `~/.config/dagctl`

use anyhow::{Context, Result};
use std::path::PathBuf;

/// Environment variable for config directory override
pub const ENV_CONFIG_DIR: &str = "DAGCTL_CONFIG_DIR";

const APP_DIR: &str = "dagctl";

/// Get the dagctl config directory path
pub fn config_dir() -> Result<PathBuf> {
    if let Ok(dir) = std::env::var(ENV_CONFIG_DIR) {
        let path = expand(&dir);
        log::debug!(
            "Using config dir from {}: {}",
            ENV_CONFIG_DIR,
            path.display()
        );
        return Ok(path);
    }

    if let Ok(xdg_config) = std::env::var("XDG_CONFIG_HOME") {
        let path = PathBuf::from(xdg_config).join(APP_DIR);
        log::debug!("Using XDG_CONFIG_HOME: {}", path.display());
        return Ok(path);
    }

    #[cfg(windows)]
    {
        if let Some(app_data) = dirs::config_dir() {
            let path = app_data.join(APP_DIR);
            log::debug!("Using Windows config dir: {}", path.display());
            return Ok(path);
        }
    }

    let home = dirs::home_dir().context("Could not determine home directory")?;
    let path = home.join(".config").join(APP_DIR);
    log::debug!("Using default config dir: {}", path.display());
    Ok(path)
}

/// Default location of the config file
pub fn config_file() -> Result<PathBuf> {
    Ok(config_dir()?.join("config.toml"))
}

/// Expand ~ and environment variables in a path string.
///
/// Unknown variables leave the input untouched rather than failing.
pub fn expand(path: &str) -> PathBuf {
    let expanded = shellexpand::full(path).unwrap_or(std::borrow::Cow::Borrowed(path));
    PathBuf::from(expanded.as_ref())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_expand_tilde() {
        let home = dirs::home_dir().unwrap();
        assert_eq!(expand("~/graphs"), home.join("graphs"));
    }

    #[test]
    fn test_expand_plain_path_unchanged() {
        assert_eq!(expand("/tmp/plain"), PathBuf::from("/tmp/plain"));
    }

    #[test]
    fn test_expand_unknown_variable_is_left_alone() {
        let raw = "/tmp/$DAGCTL_SURELY_UNSET_VARIABLE/x";
        assert_eq!(expand(raw), PathBuf::from(raw));
    }

    #[test]
    fn test_config_file_name() {
        let file = config_file().unwrap();
        assert_eq!(file.file_name().unwrap(), "config.toml");
    }
}
