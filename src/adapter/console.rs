//! Console stand-in for the hardware host: prints what the key would show,
//! persists the settings record as yaml and opens URLs on the local machine.

use std::path::PathBuf;

use crate::domain::host::HostSink;
use crate::domain::model::KeySettings;
use crate::infrastructure::config;

pub struct ConsoleHost {
    settings_path: PathBuf,
}

impl ConsoleHost {
    pub fn new() -> Self {
        Self {
            settings_path: config::settings_file_path(),
        }
    }

    pub fn with_settings_path(settings_path: PathBuf) -> Self {
        Self { settings_path }
    }

    /// Load the persisted settings record, falling back to an empty record
    /// when the file is missing or unreadable.
    pub fn load_settings(&self) -> KeySettings {
        if !self.settings_path.exists() {
            tracing::debug!("No persisted settings at {:?}", self.settings_path);
            return KeySettings::default();
        }

        match std::fs::read_to_string(&self.settings_path) {
            Ok(content) => match serde_yaml::from_str(&content) {
                Ok(settings) => {
                    tracing::info!("Loaded settings from {:?}", self.settings_path);
                    settings
                }
                Err(e) => {
                    tracing::warn!("Failed to parse {:?}: {}, using defaults", self.settings_path, e);
                    KeySettings::default()
                }
            },
            Err(e) => {
                tracing::warn!("Failed to read {:?}: {}, using defaults", self.settings_path, e);
                KeySettings::default()
            }
        }
    }

    fn write_settings(&self, settings: &KeySettings) -> anyhow::Result<()> {
        if let Some(dir) = self.settings_path.parent() {
            std::fs::create_dir_all(dir)?;
        }
        let content = serde_yaml::to_string(settings)?;
        std::fs::write(&self.settings_path, content)?;
        Ok(())
    }
}

impl Default for ConsoleHost {
    fn default() -> Self {
        Self::new()
    }
}

impl HostSink for ConsoleHost {
    fn set_display_text(&self, text: &str) {
        println!("[key] {}", text.replace('\n', " / "));
    }

    fn show_success(&self) {
        println!("[key] ✓");
    }

    fn persist_settings(&self, settings: &KeySettings) {
        // Fire-and-forget boundary: a failed write must not disturb the
        // gesture lifecycle
        if let Err(e) = self.write_settings(settings) {
            tracing::warn!("Failed to persist settings to {:?}: {}", self.settings_path, e);
        }
    }

    fn open_url(&self, url: &str) {
        println!("[key] opening {}", url);
        if let Err(e) = open::that(url) {
            tracing::warn!("Failed to open {}: {}", url, e);
        }
    }
}
