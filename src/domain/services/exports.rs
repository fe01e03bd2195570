#[cfg(test)]
#[path = "exports_test.rs"]
mod tests;

use std::env;
use std::path;

use anyhow::anyhow;
use anyhow::Result;
use tokio::fs;
use tokio::io::AsyncWriteExt;

/// Saves doc cards and gallery images into the user's downloads directory.
pub struct Exports {
    pub downloads_dir: path::PathBuf,
}

impl Default for Exports {
    fn default() -> Exports {
        let downloads_dir = dirs::download_dir().unwrap_or_else(env::temp_dir);

        return Exports::new(downloads_dir);
    }
}

impl Exports {
    pub fn new(downloads_dir: path::PathBuf) -> Exports {
        return Exports { downloads_dir };
    }

    pub async fn save_text(&self, filename: &str, text: &str) -> Result<path::PathBuf> {
        if !self.downloads_dir.exists() {
            fs::create_dir_all(&self.downloads_dir).await?;
        }

        let target = self.downloads_dir.join(filename);
        let mut file = fs::File::create(&target).await?;
        file.write_all(text.as_bytes()).await?;

        return Ok(target);
    }

    pub async fn save_file(&self, source: &path::Path) -> Result<path::PathBuf> {
        let filename = source
            .file_name()
            .ok_or_else(|| return anyhow!("source path has no file name"))?;

        if !self.downloads_dir.exists() {
            fs::create_dir_all(&self.downloads_dir).await?;
        }

        let target = self.downloads_dir.join(filename);
        fs::copy(source, &target).await?;

        return Ok(target);
    }
}
