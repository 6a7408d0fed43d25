//! Run configuration for Wally
//!
//! An immutable [`Config`] is built once at startup and handed to the
//! resolver and network switcher. It can be loaded from a TOML file
//! (`~/.config/wally/config.toml` by default) and falls back to
//! built-in defaults when no file exists.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::{WallyError, WallyResult};

/// Remote directory under which every user's projects live on the controller
pub const DEFAULT_REMOTE_ROOT: &str = "/home/root/Documents/KISS";

/// Account used for every SSH session to the controller
pub const DEFAULT_REMOTE_USER: &str = "root";

/// Wi-Fi interface names, one per supported platform class.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct InterfaceConfig {
    pub windows: String,
    /// Varies between machines; left empty until the macOS backend exists
    pub macos: String,
    pub unix: String,
}

impl Default for InterfaceConfig {
    fn default() -> Self {
        Self {
            windows: "wlan".to_string(),
            macos: String::new(),
            unix: "wlan0".to_string(),
        }
    }
}

/// Immutable run configuration.
///
/// The two whitelists drive hostname shorthand resolution: `wired`
/// resolves against `wired_whitelist`, `hotspot` against
/// `hotspot_whitelist`, and membership in the hotspot whitelist is what
/// marks a target as requiring a Wi-Fi network switch.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Hostnames reachable over a wired link
    pub wired_whitelist: BTreeSet<String>,
    /// Hostnames reachable only via a Wallaby-hosted Wi-Fi hotspot
    pub hotspot_whitelist: BTreeSet<String>,
    /// Accept the `wired`/`hotspot`/`prompt` shorthands; when false every
    /// hostname argument is taken literally
    pub accept_shorthands: bool,
    /// Append "-wallaby" to a four-digit SSID entered at the prompt
    pub append_wallaby_suffix: bool,
    pub remote_root: String,
    pub remote_user: String,
    pub interfaces: InterfaceConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            wired_whitelist: BTreeSet::from(["192.168.124.1".to_string()]),
            hotspot_whitelist: BTreeSet::from(["192.168.125.1".to_string()]),
            accept_shorthands: true,
            append_wallaby_suffix: true,
            remote_root: DEFAULT_REMOTE_ROOT.to_string(),
            remote_user: DEFAULT_REMOTE_USER.to_string(),
            interfaces: InterfaceConfig::default(),
        }
    }
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load(path: &Path) -> WallyResult<Self> {
        let content = std::fs::read_to_string(path)?;
        toml::from_str(&content).map_err(|e| WallyError::Config {
            path: path.display().to_string(),
            message: e.to_string(),
        })
    }

    /// Load the config the CLI should use.
    ///
    /// An explicitly supplied path must exist and parse; the default
    /// path is optional and silently falls back to [`Config::default`].
    pub fn load_or_default(explicit: Option<&Path>) -> WallyResult<Self> {
        match explicit {
            Some(path) => Self::load(path),
            None => match Self::default_path() {
                Some(path) if path.exists() => Self::load(&path),
                _ => Ok(Self::default()),
            },
        }
    }

    /// Default config file location (`~/.config/wally/config.toml` on Linux)
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join("wally").join("config.toml"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_shipped_whitelists() {
        let config = Config::default();
        assert!(config.wired_whitelist.contains("192.168.124.1"));
        assert!(config.hotspot_whitelist.contains("192.168.125.1"));
        assert!(config.accept_shorthands);
        assert!(config.append_wallaby_suffix);
        assert_eq!(config.remote_root, DEFAULT_REMOTE_ROOT);
        assert_eq!(config.remote_user, "root");
        assert_eq!(config.interfaces.unix, "wlan0");
    }

    #[test]
    fn parses_partial_toml_with_defaults() {
        let config: Config = toml::from_str(
            r#"
            wired_whitelist = ["10.0.0.2", "wallaby.local"]
            accept_shorthands = false
            "#,
        )
        .unwrap();
        assert_eq!(config.wired_whitelist.len(), 2);
        assert!(!config.accept_shorthands);
        // Untouched fields keep their defaults
        assert!(config.hotspot_whitelist.contains("192.168.125.1"));
        assert_eq!(config.remote_user, "root");
    }

    #[test]
    fn parses_interface_table() {
        let config: Config = toml::from_str(
            r#"
            [interfaces]
            unix = "wlp3s0"
            "#,
        )
        .unwrap();
        assert_eq!(config.interfaces.unix, "wlp3s0");
        assert_eq!(config.interfaces.windows, "wlan");
    }

    #[test]
    fn load_missing_file_is_an_io_error() {
        let err = Config::load(Path::new("/nonexistent/wally.toml")).unwrap_err();
        assert!(matches!(err, WallyError::Io(_)));
    }
}
