#[cfg(test)]
#[path = "settings_store_test.rs"]
mod tests;

use std::path;

use anyhow::bail;
use anyhow::Result;
use tokio::fs;
use tokio::io::AsyncWriteExt;

use crate::domain::models::Settings;
use crate::domain::models::SettingsField;
use crate::domain::models::GEMINI_MODELS;
use crate::domain::models::MAX_TOKENS_RANGE;
use crate::domain::models::TEMPERATURE_RANGE;

/// Owns the persisted settings record. The full record is rewritten on every
/// accepted mutation; a missing or unreadable record falls back to defaults.
pub struct SettingsStore {
    file_path: path::PathBuf,
    settings: Settings,
}

impl SettingsStore {
    pub async fn load(file_path: path::PathBuf) -> SettingsStore {
        let settings = match SettingsStore::read(&file_path).await {
            Ok(settings) => settings,
            Err(err) => {
                tracing::warn!(error = %err, path = %file_path.display(), "settings record is unreadable, falling back to defaults");
                Settings::default()
            }
        };

        return SettingsStore {
            file_path,
            settings,
        };
    }

    async fn read(file_path: &path::Path) -> Result<Settings> {
        if !file_path.exists() {
            return Ok(Settings::default());
        }

        let payload = fs::read_to_string(file_path).await?;
        let settings: Settings = serde_json::from_str(&payload)?;

        return Ok(settings);
    }

    pub fn current(&self) -> &Settings {
        return &self.settings;
    }

    /// Validates and applies a single field change, then persists the whole
    /// record. Out-of-range numbers are clamped, unknown models and NaN are
    /// rejected before anything is stored.
    pub async fn replace_field(&mut self, field: SettingsField) -> Result<Settings> {
        match field {
            SettingsField::ApiKey(value) => {
                self.settings.api_key = value;
            }
            SettingsField::Model(value) => {
                if !GEMINI_MODELS.contains(&value.as_str()) {
                    bail!(format!(
                        "unknown model {value}, expected one of: {}",
                        GEMINI_MODELS.join(", ")
                    ));
                }
                self.settings.model = value;
            }
            SettingsField::Temperature(value) => {
                if value.is_nan() {
                    bail!("temperature must be a number");
                }
                self.settings.temperature = value.clamp(TEMPERATURE_RANGE.0, TEMPERATURE_RANGE.1);
            }
            SettingsField::MaxTokens(value) => {
                self.settings.max_tokens = value.clamp(MAX_TOKENS_RANGE.0, MAX_TOKENS_RANGE.1);
            }
        }

        self.save().await?;

        return Ok(self.settings.clone());
    }

    async fn save(&self) -> Result<()> {
        if let Some(parent) = self.file_path.parent() {
            if !parent.exists() {
                fs::create_dir_all(parent).await?;
            }
        }

        let payload = serde_json::to_string(&self.settings)?;
        let mut file = fs::File::create(&self.file_path).await?;
        file.write_all(payload.as_bytes()).await?;

        return Ok(());
    }
}
