use super::SettingsField;

/// User intents forwarded from the view to the session service. The view
/// never mutates the stores directly.
pub enum Action {
    SubmitPrompt(String),
    ClearHistory(),
    UpdateSetting(SettingsField),
}
