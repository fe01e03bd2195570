use anyhow::anyhow;
use anyhow::Result;
use rust_embed::RustEmbed;
use serde_derive::Deserialize;
use serde_derive::Serialize;

#[derive(RustEmbed)]
#[folder = "assets/"]
struct Assets;

pub const PERSONA_NAME: &str = "Mr Dep Dodep";

/// The fixed character block prefixed to every prompt.
#[derive(Clone, Debug)]
pub struct Persona {
    pub name: String,
    pub description: String,
}

impl Persona {
    pub fn load() -> Result<Persona> {
        let file =
            Assets::get("persona.md").ok_or_else(|| return anyhow!("persona.md is not embedded"))?;
        let description = String::from_utf8(file.data.to_vec())?.trim().to_string();

        return Ok(Persona {
            name: PERSONA_NAME.to_string(),
            description,
        });
    }
}

/// One card in the documentation browser.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocSection {
    pub title: String,
    pub content: Option<String>,
    pub list: Option<Vec<String>>,
    pub footer: Option<String>,
}

impl DocSection {
    /// The copy/download form of a card: title, content, list items one per
    /// line, footer.
    pub fn plain_text(&self) -> String {
        let mut parts: Vec<String> = vec![self.title.to_string()];

        if let Some(content) = &self.content {
            parts.push(content.to_string());
        }
        if let Some(list) = &self.list {
            parts.push(list.join("\n"));
        }
        if let Some(footer) = &self.footer {
            parts.push(footer.to_string());
        }

        return parts.join("\n\n");
    }

    pub fn filename(&self) -> String {
        let slug = self
            .title
            .split_whitespace()
            .collect::<Vec<&str>>()
            .join("-")
            .to_lowercase();

        return format!("mr-dep-{slug}.txt");
    }
}

pub fn doc_sections() -> Result<Vec<DocSection>> {
    let file =
        Assets::get("docs.json").ok_or_else(|| return anyhow!("docs.json is not embedded"))?;
    let sections: Vec<DocSection> = serde_json::from_slice(&file.data)?;

    return Ok(sections);
}
