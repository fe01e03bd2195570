#[cfg(test)]
#[path = "settings_test.rs"]
mod tests;

use serde_derive::Deserialize;
use serde_derive::Serialize;

/// Models the settings panel accepts. Anything else is rejected before it
/// reaches storage.
pub const GEMINI_MODELS: &[&str] = &[
    "gemini-2.0-flash-exp",
    "gemini-2.0-flash-thinking-exp",
    "gemini-1.5-flash",
    "gemini-1.5-flash-8b",
    "gemini-1.5-pro",
];

pub const TEMPERATURE_RANGE: (f64, f64) = (0.0, 2.0);
pub const MAX_TOKENS_RANGE: (u32, u32) = (1, 8192);

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    pub api_key: String,
    pub model: String,
    pub temperature: f64,
    pub max_tokens: u32,
}

impl Default for Settings {
    fn default() -> Settings {
        return Settings {
            api_key: "".to_string(),
            model: "gemini-2.0-flash-exp".to_string(),
            temperature: 0.9,
            max_tokens: 2048,
        };
    }
}

/// A single mutation from the settings panel or a CLI override. The full
/// record is re-persisted after every accepted field change.
#[derive(Clone, Debug, PartialEq)]
pub enum SettingsField {
    ApiKey(String),
    Model(String),
    Temperature(f64),
    MaxTokens(u32),
}
