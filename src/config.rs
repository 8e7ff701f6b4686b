//! Configuration management for xampp-mechanic
//!
//! Stores operator preferences in ~/.config/xampp-mechanic/config.json

use crate::layout;
use crate::repair::{PathChoice, RepairOptions};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Default (`C:/xampp/mysql`) or a custom root
    #[serde(default)]
    pub path_choice: PathChoice,
    /// Last custom root the operator entered
    #[serde(default)]
    pub custom_root: Option<PathBuf>,
    /// Port pre-filled in the port inspector
    #[serde(default = "default_inspect_port")]
    pub inspect_port: u16,
    /// Substring matched against running process names
    #[serde(default = "default_server_process")]
    pub server_process: String,
}

fn default_inspect_port() -> u16 {
    layout::DEFAULT_INSPECT_PORT
}

fn default_server_process() -> String {
    layout::SERVER_PROCESS.to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            path_choice: PathChoice::Default,
            custom_root: None,
            inspect_port: default_inspect_port(),
            server_process: default_server_process(),
        }
    }
}

impl Config {
    /// Get the config directory path
    fn config_dir() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("xampp-mechanic"))
    }

    /// Get the config file path
    pub fn config_path() -> Option<PathBuf> {
        Self::config_dir().map(|p| p.join("config.json"))
    }

    /// Load config from disk, or return default
    pub fn load() -> Self {
        match Self::config_path() {
            Some(path) => Self::load_from(&path),
            None => Self::default(),
        }
    }

    pub fn load_from(path: &Path) -> Self {
        let Ok(content) = fs::read_to_string(path) else {
            return Self::default();
        };
        match serde_json::from_str(&content) {
            Ok(config) => config,
            Err(err) => {
                preserve_corrupt_config(path, &content);
                tracing::warn!(
                    error = %err,
                    path = %path.display(),
                    "config file was corrupted; a backup was saved and defaults were loaded"
                );
                Self::default()
            }
        }
    }

    /// Save config to `path`, creating parent directories
    pub fn save_to(&self, path: &Path) -> Result<(), String> {
        if let Some(dir) = path.parent() {
            fs::create_dir_all(dir)
                .map_err(|e| format!("Failed to create config directory: {}", e))?;
        }

        let content = serde_json::to_string_pretty(self)
            .map_err(|e| format!("Failed to serialize config: {}", e))?;

        #[cfg(unix)]
        {
            write_config_atomic(path, &content)
                .map_err(|e| format!("Failed to write config: {}", e))?;
        }

        #[cfg(not(unix))]
        {
            fs::write(path, content).map_err(|e| format!("Failed to write config: {}", e))?;
        }

        Ok(())
    }

    /// Options for the next repair based on the stored selection
    pub fn repair_options(&self) -> RepairOptions {
        let custom = self
            .custom_root
            .as_ref()
            .map(|p| p.display().to_string())
            .unwrap_or_default();
        RepairOptions::resolve(self.path_choice, &custom)
    }

    /// Get the config file location for display
    pub fn config_location() -> String {
        Self::config_path()
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| "~/.config/xampp-mechanic/config.json".to_string())
    }
}

fn preserve_corrupt_config(path: &Path, content: &str) {
    let corrupt_path = path.with_extension("json.corrupt");
    if fs::rename(path, &corrupt_path).is_err() {
        let _ = fs::write(&corrupt_path, content);
    }
}

#[cfg(unix)]
fn write_config_atomic(path: &Path, content: &str) -> Result<(), String> {
    use std::fs::OpenOptions;
    use std::io::Write;
    use std::os::unix::fs::PermissionsExt;

    let tmp_path = path.with_extension("tmp");
    let mut file = OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .open(&tmp_path)
        .map_err(|e| e.to_string())?;

    if let Err(e) = file.set_permissions(fs::Permissions::from_mode(0o600)) {
        tracing::warn!(error = %e, "failed to set temp config file permissions");
    }

    file.write_all(content.as_bytes())
        .map_err(|e| e.to_string())?;

    if let Err(err) = fs::rename(&tmp_path, path) {
        let _ = fs::remove_file(&tmp_path);
        return Err(err.to_string());
    }
    Ok(())
}
