#[cfg(test)]
#[path = "gallery_test.rs"]
mod tests;

use std::path;

use anyhow::Result;
use tokio::fs;

const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "gif", "webp"];

/// Lists the images shown in the gallery tab. The directory is scanned once
/// at startup; an absent directory is simply an empty gallery.
pub struct Gallery {
    pub images_dir: path::PathBuf,
}

impl Gallery {
    pub fn new(images_dir: path::PathBuf) -> Gallery {
        return Gallery { images_dir };
    }

    pub async fn list(&self) -> Result<Vec<path::PathBuf>> {
        let mut images: Vec<path::PathBuf> = vec![];
        if !self.images_dir.exists() {
            return Ok(images);
        }

        let mut dir = fs::read_dir(&self.images_dir).await?;
        while let Some(file) = dir.next_entry().await? {
            let file_path = file.path();
            let is_image = file_path
                .extension()
                .and_then(|ext| {
                    return ext.to_str();
                })
                .map(|ext| {
                    return IMAGE_EXTENSIONS.contains(&ext.to_lowercase().as_str());
                })
                .unwrap_or(false);

            if is_image {
                images.push(file_path);
            }
        }

        images.sort();

        return Ok(images);
    }
}
