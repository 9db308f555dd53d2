//! Desktop shell configuration.
//!
//! Reads/writes JSON at `<config dir>/infinity-desktop/config.json`.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

const DEFAULT_DEV_SERVER_URL: &str = "http://localhost:5173";
const DEFAULT_INITIAL_DELAY_SECS: u64 = 10;
const DEFAULT_INTERVAL_SECS: u64 = 4 * 60 * 60;

/// Overrides the dev server address.
pub const ENV_DEV_SERVER_URL: &str = "INFINITY_DEV_SERVER_URL";
/// `1` forces development mode in release builds.
pub const ENV_DEV: &str = "INFINITY_DEV";

/// On-disk config format.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ConfigFile {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    dev_server_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    auto_update: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    update_initial_delay_secs: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    update_interval_secs: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    open_devtools: Option<bool>,
}

/// Desktop shell configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DesktopConfig {
    /// Content address in development.
    pub dev_server_url: String,
    /// Background update checks in production.
    pub auto_update: bool,
    pub update_initial_delay_secs: u64,
    pub update_interval_secs: u64,
    /// Open devtools on the main window in development.
    pub open_devtools: bool,
    file_path: PathBuf,
}

impl Default for DesktopConfig {
    fn default() -> Self {
        Self {
            dev_server_url: DEFAULT_DEV_SERVER_URL.into(),
            auto_update: true,
            update_initial_delay_secs: DEFAULT_INITIAL_DELAY_SECS,
            update_interval_secs: DEFAULT_INTERVAL_SECS,
            open_devtools: true,
            file_path: config_file_path()
                .unwrap_or_else(|_| PathBuf::from("/tmp/infinity-desktop/config.json")),
        }
    }
}

impl DesktopConfig {
    /// Loads configuration from disk, then applies environment overrides.
    pub fn load() -> anyhow::Result<Self> {
        let mut config = Self::load_from(&config_file_path()?)?;
        if let Ok(url) = std::env::var(ENV_DEV_SERVER_URL) {
            if !url.is_empty() {
                config.dev_server_url = url;
            }
        }
        Ok(config)
    }

    /// Loads configuration from `path`. A missing file yields defaults; a
    /// malformed one is logged and yields defaults.
    pub fn load_from(path: &Path) -> anyhow::Result<Self> {
        let mut config = DesktopConfig {
            file_path: path.to_path_buf(),
            ..Default::default()
        };

        if path.exists() {
            let content = std::fs::read_to_string(path)?;
            if let Ok(file) = serde_json::from_str::<ConfigFile>(&content) {
                if let Some(url) = file.dev_server_url.filter(|u| !u.is_empty()) {
                    config.dev_server_url = url;
                }
                if let Some(auto_update) = file.auto_update {
                    config.auto_update = auto_update;
                }
                if let Some(secs) = file.update_initial_delay_secs {
                    config.update_initial_delay_secs = secs;
                }
                if let Some(secs) = file.update_interval_secs.filter(|s| *s > 0) {
                    config.update_interval_secs = secs;
                }
                if let Some(open) = file.open_devtools {
                    config.open_devtools = open;
                }
            } else {
                tracing::warn!(
                    path = %path.display(),
                    "failed to parse desktop config, using defaults"
                );
            }
        }

        Ok(config)
    }

    /// Saves configuration to disk.
    pub fn save(&self) -> anyhow::Result<()> {
        if let Some(parent) = self.file_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let file = ConfigFile {
            dev_server_url: Some(self.dev_server_url.clone()),
            auto_update: Some(self.auto_update),
            update_initial_delay_secs: Some(self.update_initial_delay_secs),
            update_interval_secs: Some(self.update_interval_secs),
            open_devtools: Some(self.open_devtools),
        };

        let json = serde_json::to_string_pretty(&file)?;
        std::fs::write(&self.file_path, &json)?;

        tracing::debug!("desktop configuration saved");
        Ok(())
    }

    pub fn file_path(&self) -> &Path {
        &self.file_path
    }
}

/// Development mode: `INFINITY_DEV=1`, or a build without Tauri's
/// `custom-protocol` feature.
pub fn is_dev() -> bool {
    tauri::is_dev() || std::env::var(ENV_DEV).is_ok_and(|v| v == "1")
}

fn config_file_path() -> anyhow::Result<PathBuf> {
    Ok(config_base_dir()?.join("infinity-desktop").join("config.json"))
}

fn config_base_dir() -> anyhow::Result<PathBuf> {
    #[cfg(target_os = "linux")]
    {
        if let Ok(xdg) = std::env::var("XDG_CONFIG_HOME") {
            if !xdg.is_empty() {
                return Ok(PathBuf::from(xdg));
            }
        }
        let home = std::env::var("HOME").unwrap_or_else(|_| "/tmp".into());
        Ok(PathBuf::from(home).join(".config"))
    }

    #[cfg(target_os = "windows")]
    {
        let appdata =
            std::env::var("APPDATA").unwrap_or_else(|_| "C:\\Users\\Default\\AppData".into());
        Ok(PathBuf::from(appdata))
    }

    #[cfg(target_os = "macos")]
    {
        let home = std::env::var("HOME")?;
        Ok(PathBuf::from(home).join("Library").join("Application Support"))
    }

    #[cfg(not(any(target_os = "linux", target_os = "windows", target_os = "macos")))]
    {
        Ok(PathBuf::from("/tmp"))
    }
}
