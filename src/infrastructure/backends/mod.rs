pub mod gemini;

use anyhow::bail;
use anyhow::Result;

use crate::domain::models::BackendBox;

pub struct BackendManager {}

impl BackendManager {
    pub fn get(name: &str) -> Result<BackendBox> {
        if name == "gemini" {
            return Ok(Box::<gemini::Gemini>::default());
        }

        bail!(format!("no backend implemented for {name}"))
    }
}
