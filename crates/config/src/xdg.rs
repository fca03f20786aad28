//! XDG Base Directory support for brailledit.

use anyhow::{Context, Result};
use std::path::PathBuf;

const APP_NAME: &str = "brailledit";

/// Get the configuration directory following XDG conventions.
///
/// Returns `$XDG_CONFIG_HOME/brailledit` or `~/.config/brailledit`.
pub fn get_config_dir() -> Result<PathBuf> {
    dirs::config_dir()
        .map(|p| p.join(APP_NAME))
        .context("Failed to determine config directory")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_config_dir() {
        let dir = get_config_dir().unwrap();
        assert!(dir.ends_with("brailledit"));
    }
}
