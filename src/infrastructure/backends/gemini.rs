#[cfg(test)]
#[path = "gemini_test.rs"]
mod tests;

use std::time::Duration;

use anyhow::bail;
use anyhow::Result;
use async_trait::async_trait;
use serde::Deserialize;
use serde::Serialize;

use crate::domain::models::Backend;
use crate::domain::models::GenerationError;
use crate::domain::models::GenerationRequest;

#[derive(Default, Debug, Clone, PartialEq, Serialize, Deserialize)]
struct ContentPart {
    text: String,
}

#[derive(Default, Debug, Clone, PartialEq, Serialize, Deserialize)]
struct Content {
    role: String,
    parts: Vec<ContentPart>,
}

#[derive(Default, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    temperature: f64,
    max_output_tokens: u32,
}

#[derive(Default, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CompletionRequest {
    contents: Vec<Content>,
    generation_config: GenerationConfig,
}

#[derive(Default, Debug, Clone, PartialEq, Deserialize)]
struct ResponsePart {
    text: Option<String>,
}

#[derive(Default, Debug, Clone, PartialEq, Deserialize)]
struct ResponseContent {
    parts: Option<Vec<ResponsePart>>,
}

#[derive(Default, Debug, Clone, PartialEq, Deserialize)]
struct ResponseCandidate {
    content: Option<ResponseContent>,
}

#[derive(Default, Debug, Clone, PartialEq, Deserialize)]
struct ProviderError {
    message: String,
}

#[derive(Default, Debug, Clone, PartialEq, Deserialize)]
struct CompletionResponse {
    candidates: Option<Vec<ResponseCandidate>>,
    error: Option<ProviderError>,
}

pub struct Gemini {
    url: String,
    health_check_timeout: Duration,
}

impl Default for Gemini {
    fn default() -> Gemini {
        return Gemini::new("https://generativelanguage.googleapis.com".to_string());
    }
}

impl Gemini {
    pub fn new(url: String) -> Gemini {
        return Gemini {
            url,
            health_check_timeout: Duration::from_millis(1000),
        };
    }
}

#[async_trait]
impl Backend for Gemini {
    fn name(&self) -> &'static str {
        return "gemini";
    }

    #[allow(clippy::implicit_return)]
    async fn health_check(&self, api_key: &str, model: &str) -> Result<()> {
        if api_key.is_empty() {
            bail!("Gemini API key is not defined");
        }

        let url = format!(
            "{url}/v1beta/models/{model}?key={key}",
            url = self.url,
            key = api_key,
        );

        let res = reqwest::Client::new()
            .get(&url)
            .timeout(self.health_check_timeout)
            .send()
            .await;

        if res.is_err() {
            tracing::error!(error = ?res.unwrap_err(), "Gemini is not reachable");
            bail!("Gemini is not reachable");
        }

        let status = res.unwrap().status().as_u16();
        if status >= 400 {
            tracing::error!(status = status, "Gemini health check failed");
            bail!("Gemini health check failed");
        }

        return Ok(());
    }

    #[allow(clippy::implicit_return)]
    async fn generate(
        &self,
        request: GenerationRequest,
        api_key: &str,
        model: &str,
    ) -> Result<String, GenerationError> {
        let req = CompletionRequest {
            contents: vec![Content {
                role: "user".to_string(),
                parts: vec![ContentPart {
                    text: request.prompt,
                }],
            }],
            generation_config: GenerationConfig {
                temperature: request.temperature,
                max_output_tokens: request.max_output_tokens,
            },
        };

        let res = reqwest::Client::new()
            .post(format!(
                "{url}/v1beta/models/{model}:generateContent?key={key}",
                url = self.url,
                key = api_key,
            ))
            .json(&req)
            .send()
            .await
            .map_err(|err| {
                return GenerationError::Transport(err.to_string());
            })?;

        // Provider errors arrive with a non-2xx status but a well-formed
        // error body, so mapping goes by body shape rather than status code.
        let body = res.json::<CompletionResponse>().await.map_err(|err| {
            return GenerationError::Transport(err.to_string());
        })?;

        if let Some(error) = body.error {
            return Err(GenerationError::Provider(error.message));
        }

        let text = body
            .candidates
            .and_then(|candidates| {
                return candidates.into_iter().next();
            })
            .and_then(|candidate| {
                return candidate.content;
            })
            .and_then(|content| {
                return content.parts;
            })
            .and_then(|parts| {
                return parts.into_iter().next();
            })
            .and_then(|part| {
                return part.text;
            })
            .filter(|text| {
                return !text.is_empty();
            });

        return text.ok_or(GenerationError::EmptyResponse);
    }
}
