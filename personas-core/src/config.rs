//! Client configuration.
//!
//! # Storage layout
//!
//! ```text
//! ~/.personas/
//!   config.yaml   (mode 0600, optional; defaults apply when absent)
//! ```
//!
//! # API pattern
//!
//! Every filesystem function has two forms:
//! - `fn_at(home: &Path, …)`: explicit home; used in tests with `TempDir`
//! - `fn(…)`: derives home from `dirs::home_dir()`, delegates to `_at`
//!
//! Resolution order for the API URL: explicit override (CLI flag), then
//! `PERSONAS_API_URL`, then `config.yaml`, then [`DEFAULT_API_URL`].

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

pub const DEFAULT_API_URL: &str = "http://localhost:8080";
pub const API_URL_ENV: &str = "PERSONAS_API_URL";

/// Settings for talking to the `/personas` backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Backend origin, without the `/personas` suffix.
    pub api_url: String,
    /// Per-request timeout. `None` means wait indefinitely.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout_secs: Option<u64>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            timeout_secs: None,
        }
    }
}

impl ClientConfig {
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs.map(Duration::from_secs)
    }

    /// Apply the environment and an optional explicit override, in that order.
    pub fn with_overrides(mut self, env_url: Option<String>, flag_url: Option<String>) -> Self {
        if let Some(url) = env_url.filter(|u| !u.trim().is_empty()) {
            self.api_url = url;
        }
        if let Some(url) = flag_url.filter(|u| !u.trim().is_empty()) {
            self.api_url = url;
        }
        self.api_url = self.api_url.trim_end_matches('/').to_string();
        self
    }
}

// ---------------------------------------------------------------------------
// Path helpers
// ---------------------------------------------------------------------------

/// `<home>/.personas/config.yaml` (pure, no I/O).
pub fn config_path_at(home: &Path) -> PathBuf {
    home.join(".personas").join("config.yaml")
}

// ---------------------------------------------------------------------------
// Load / save
// ---------------------------------------------------------------------------

/// Load `<home>/.personas/config.yaml`, or defaults if it does not exist.
pub fn load_at(home: &Path) -> Result<ClientConfig, ConfigError> {
    let path = config_path_at(home);
    if !path.exists() {
        return Ok(ClientConfig::default());
    }
    let contents = std::fs::read_to_string(&path)?;
    serde_yaml::from_str(&contents).map_err(|e| ConfigError::Parse { path, source: e })
}

/// `load_at` convenience wrapper.
pub fn load() -> Result<ClientConfig, ConfigError> {
    load_at(&home()?)
}

/// Load the file config and apply `PERSONAS_API_URL` plus `flag_url`.
pub fn resolve_at(home: &Path, flag_url: Option<String>) -> Result<ClientConfig, ConfigError> {
    let env_url = std::env::var(API_URL_ENV).ok();
    Ok(load_at(home)?.with_overrides(env_url, flag_url))
}

/// `resolve_at` convenience wrapper.
pub fn resolve(flag_url: Option<String>) -> Result<ClientConfig, ConfigError> {
    resolve_at(&home()?, flag_url)
}

/// Atomically write `config` to `<home>/.personas/config.yaml`.
///
/// Write flow: serialize → `.yaml.tmp` sibling → `chmod 0600` → `rename`.
pub fn save_at(home: &Path, config: &ClientConfig) -> Result<PathBuf, ConfigError> {
    let path = config_path_at(home);
    if let Some(dir) = path.parent() {
        if !dir.exists() {
            std::fs::create_dir_all(dir)?;
            set_dir_permissions(dir)?;
        }
    }
    let tmp_path = path.with_file_name("config.yaml.tmp");
    let yaml = serde_yaml::to_string(config)?;
    std::fs::write(&tmp_path, yaml)?;
    set_file_permissions(&tmp_path)?;
    std::fs::rename(&tmp_path, &path)?;
    Ok(path)
}

/// `save_at` convenience wrapper.
pub fn save(config: &ClientConfig) -> Result<PathBuf, ConfigError> {
    save_at(&home()?, config)
}

// ---------------------------------------------------------------------------
// Private helpers
// ---------------------------------------------------------------------------

fn home() -> Result<PathBuf, ConfigError> {
    dirs::home_dir().ok_or(ConfigError::HomeNotFound)
}

#[cfg(unix)]
fn set_dir_permissions(path: &Path) -> Result<(), ConfigError> {
    use std::os::unix::fs::PermissionsExt;
    std::fs::set_permissions(path, std::fs::Permissions::from_mode(0o700))?;
    Ok(())
}
#[cfg(not(unix))]
fn set_dir_permissions(_path: &Path) -> Result<(), ConfigError> {
    Ok(())
}

#[cfg(unix)]
fn set_file_permissions(path: &Path) -> Result<(), ConfigError> {
    use std::os::unix::fs::PermissionsExt;
    std::fs::set_permissions(path, std::fs::Permissions::from_mode(0o600))?;
    Ok(())
}
#[cfg(not(unix))]
fn set_file_permissions(_path: &Path) -> Result<(), ConfigError> {
    Ok(())
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn config_path_is_correct() {
        let home = TempDir::new().expect("tempdir");
        assert!(config_path_at(home.path()).ends_with(".personas/config.yaml"));
    }

    #[test]
    fn missing_file_yields_defaults() {
        let home = TempDir::new().expect("tempdir");
        let cfg = load_at(home.path()).expect("load");
        assert_eq!(cfg, ClientConfig::default());
        assert_eq!(cfg.timeout(), None);
    }

    #[test]
    fn flag_beats_env_beats_file() {
        let base = ClientConfig {
            api_url: "http://file:1".into(),
            timeout_secs: Some(3),
        };
        let env_only = base
            .clone()
            .with_overrides(Some("http://env:2/".into()), None);
        assert_eq!(env_only.api_url, "http://env:2");

        let both = base.with_overrides(Some("http://env:2".into()), Some("http://flag:3".into()));
        assert_eq!(both.api_url, "http://flag:3");
        assert_eq!(both.timeout(), Some(Duration::from_secs(3)));
    }

    #[test]
    fn blank_overrides_are_ignored() {
        let cfg = ClientConfig::default().with_overrides(Some("  ".into()), Some(String::new()));
        assert_eq!(cfg.api_url, DEFAULT_API_URL);
    }

    #[test]
    fn save_sets_file_permissions() {
        let home = TempDir::new().expect("tempdir");
        let path = save_at(home.path(), &ClientConfig::default()).expect("save");
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let mode = std::fs::metadata(&path).unwrap().permissions().mode() & 0o777;
            assert_eq!(mode, 0o600);
        }
        assert!(path.exists());
    }

    #[test]
    fn home_not_found_error_message() {
        assert!(ConfigError::HomeNotFound.to_string().contains("home directory"));
    }
}
