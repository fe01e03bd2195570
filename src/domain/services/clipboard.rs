#[cfg(test)]
#[path = "clipboard_test.rs"]
mod tests;

use std::path;

use anyhow::anyhow;
use anyhow::Result;
use once_cell::sync::OnceCell;
use tokio::sync::mpsc;

static COPY_TX: OnceCell<mpsc::UnboundedSender<String>> = OnceCell::new();

/// What the app can put on the clipboard. Everything copies as text; an
/// image copies as its path.
pub enum CopyPayload {
    ImagePath(path::PathBuf),
    DocCard(String),
    ChatReply(String),
}

impl CopyPayload {
    fn into_text(self) -> String {
        match self {
            CopyPayload::ImagePath(image) => return image.display().to_string(),
            CopyPayload::DocCard(text) => return text,
            CopyPayload::ChatReply(text) => return text,
        }
    }
}

/// Clipboard writes happen on a dedicated task: arboard's handle cannot be
/// shared across the UI and session tasks.
pub struct ClipboardService {}

impl ClipboardService {
    pub async fn start() -> Result<()> {
        let (tx, mut rx) = mpsc::unbounded_channel::<String>();
        COPY_TX
            .set(tx)
            .map_err(|_| return anyhow!("the clipboard task is already running"))?;
        let mut clipboard = arboard::Clipboard::new()?;

        while let Some(text) = rx.recv().await {
            clipboard.set_text(text)?;
        }

        return Ok(());
    }

    pub fn healthcheck() -> Result<()> {
        if COPY_TX.get().is_some() {
            return Ok(());
        }

        arboard::Clipboard::new()?;
        return Ok(());
    }

    pub fn copy(payload: CopyPayload) -> Result<()> {
        let tx = COPY_TX
            .get()
            .ok_or_else(|| return anyhow!("the clipboard task is not running"))?;
        tx.send(payload.into_text())?;

        return Ok(());
    }
}
