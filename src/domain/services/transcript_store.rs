#[cfg(test)]
#[path = "transcript_store_test.rs"]
mod tests;

use std::path;

use anyhow::Result;
use tokio::fs;
use tokio::io::AsyncWriteExt;

use crate::domain::models::Message;

/// Owns the persisted transcript: an ordered, append-only list of messages.
/// Every append rewrites the full snapshot so a reload always matches append
/// order. A missing or unreadable record loads as an empty transcript.
pub struct TranscriptStore {
    file_path: path::PathBuf,
    messages: Vec<Message>,
}

impl TranscriptStore {
    pub async fn load(file_path: path::PathBuf) -> TranscriptStore {
        let messages = match TranscriptStore::read(&file_path).await {
            Ok(messages) => messages,
            Err(err) => {
                tracing::warn!(error = %err, path = %file_path.display(), "transcript record is unreadable, starting empty");
                vec![]
            }
        };

        return TranscriptStore {
            file_path,
            messages,
        };
    }

    async fn read(file_path: &path::Path) -> Result<Vec<Message>> {
        if !file_path.exists() {
            return Ok(vec![]);
        }

        let payload = fs::read_to_string(file_path).await?;
        let messages: Vec<Message> = serde_json::from_str(&payload)?;

        return Ok(messages);
    }

    pub fn messages(&self) -> &[Message] {
        return &self.messages;
    }

    pub async fn append(&mut self, message: Message) -> Result<()> {
        self.messages.push(message);
        self.save().await?;

        return Ok(());
    }

    pub async fn clear(&mut self) -> Result<()> {
        self.messages.clear();
        if self.file_path.exists() {
            fs::remove_file(&self.file_path).await?;
        }

        return Ok(());
    }

    pub async fn save(&self) -> Result<()> {
        if let Some(parent) = self.file_path.parent() {
            if !parent.exists() {
                fs::create_dir_all(parent).await?;
            }
        }

        let payload = serde_json::to_string(&self.messages)?;
        let mut file = fs::File::create(&self.file_path).await?;
        file.write_all(payload.as_bytes()).await?;

        return Ok(());
    }
}
