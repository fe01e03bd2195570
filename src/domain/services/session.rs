#[cfg(test)]
#[path = "session_test.rs"]
mod tests;

use anyhow::Result;
use tokio::sync::mpsc;

use super::SettingsStore;
use super::TranscriptStore;
use crate::domain::models::compose;
use crate::domain::models::Action;
use crate::domain::models::Backend;
use crate::domain::models::BackendBox;
use crate::domain::models::Event;
use crate::domain::models::Message;
use crate::domain::models::Persona;
use crate::domain::models::Role;
use crate::domain::models::SettingsField;

/// Orchestrates one chat turn at a time: guards the submit, appends the user
/// message, runs the single generation call, and absorbs the result (success
/// or error) back into the transcript. At most one request is ever in
/// flight; the flag here is authoritative, the view disabling its input is
/// advisory only.
pub struct SessionManager {
    settings: SettingsStore,
    transcript: TranscriptStore,
    backend: BackendBox,
    persona: Persona,
    tx: mpsc::UnboundedSender<Event>,
    awaiting_response: bool,
}

impl SessionManager {
    pub fn new(
        settings: SettingsStore,
        transcript: TranscriptStore,
        backend: BackendBox,
        persona: Persona,
        tx: mpsc::UnboundedSender<Event>,
    ) -> SessionManager {
        return SessionManager {
            settings,
            transcript,
            backend,
            persona,
            tx,
            awaiting_response: false,
        };
    }

    /// Replays the persisted state to the view. The view renders from this
    /// signal and from deltas afterwards, it never reads the stores itself.
    pub fn restore(&self) -> Result<()> {
        self.tx
            .send(Event::SettingsUpdated(self.settings.current().clone()))?;
        self.tx
            .send(Event::HistoryRestored(self.transcript.messages().to_vec()))?;

        return Ok(());
    }

    /// One-time startup probe. Failures surface as a notice, never block the
    /// session.
    pub async fn startup_check(&self) -> Result<()> {
        let settings = self.settings.current();
        if settings.api_key.is_empty() {
            self.tx.send(Event::Notice(
                "Add your Gemini API key in Settings before chatting.".to_string(),
            ))?;
            return Ok(());
        }

        if let Err(err) = self
            .backend
            .health_check(&settings.api_key, &settings.model)
            .await
        {
            tracing::warn!(
                error = %err,
                backend = self.backend.name(),
                model = settings.model,
                "startup health check failed"
            );
            self.tx.send(Event::Notice(format!(
                "{} is not reachable right now: {err}",
                settings.model
            )))?;
        }

        return Ok(());
    }

    pub async fn submit(&mut self, utterance: &str) -> Result<()> {
        let utterance = utterance.trim();
        if utterance.is_empty() {
            return Ok(());
        }
        if self.awaiting_response {
            tracing::warn!("submit rejected, a generation request is already in flight");
            return Ok(());
        }
        if self.settings.current().api_key.is_empty() {
            self.tx.send(Event::Notice(
                "Add your Gemini API key in Settings before chatting.".to_string(),
            ))?;
            return Ok(());
        }

        // The user turn is persisted before the request goes out, so a crash
        // mid-request still leaves it in the transcript.
        let user_message = Message::new(Role::User, utterance);
        self.transcript.append(user_message.clone()).await?;
        self.tx.send(Event::UserMessageAppended(user_message))?;

        self.awaiting_response = true;
        self.tx.send(Event::PendingStarted())?;

        let settings = self.settings.current().clone();
        let request = compose(&self.persona, utterance, &settings);
        let content = match self
            .backend
            .generate(request, &settings.api_key, &settings.model)
            .await
        {
            Ok(text) => text,
            Err(err) => {
                tracing::error!(
                    error = %err,
                    backend = self.backend.name(),
                    model = settings.model,
                    "generation failed"
                );
                format!("Error: {err}")
            }
        };

        let assistant_message = Message::new(Role::Assistant, &content);
        self.transcript.append(assistant_message.clone()).await?;

        self.awaiting_response = false;
        self.tx.send(Event::PendingEnded())?;
        self.tx
            .send(Event::AssistantMessageAppended(assistant_message))?;

        return Ok(());
    }

    pub async fn clear_history(&mut self) -> Result<()> {
        self.transcript.clear().await?;
        self.tx.send(Event::HistoryCleared())?;

        return Ok(());
    }

    pub async fn update_setting(&mut self, field: SettingsField) -> Result<()> {
        match self.settings.replace_field(field).await {
            Ok(updated) => {
                self.tx.send(Event::SettingsUpdated(updated))?;
            }
            Err(err) => {
                self.tx.send(Event::Notice(err.to_string()))?;
            }
        }

        return Ok(());
    }
}

pub struct SessionService {}

impl SessionService {
    pub async fn start(
        mut manager: SessionManager,
        rx: &mut mpsc::UnboundedReceiver<Action>,
    ) -> Result<()> {
        manager.restore()?;
        manager.startup_check().await?;

        while let Some(action) = rx.recv().await {
            match action {
                Action::SubmitPrompt(text) => {
                    manager.submit(&text).await?;
                }
                Action::ClearHistory() => {
                    manager.clear_history().await?;
                }
                Action::UpdateSetting(field) => {
                    manager.update_setting(field).await?;
                }
            }
        }

        return Ok(());
    }
}
