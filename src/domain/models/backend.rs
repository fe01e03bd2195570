use anyhow::Result;
use async_trait::async_trait;
use thiserror::Error;

use super::GenerationRequest;

/// Failure modes of a single generation attempt. All three are absorbed into
/// the transcript by the session manager, never propagated to the caller.
#[derive(Debug, Error)]
pub enum GenerationError {
    /// No response, or a response body that wasn't parseable at all.
    #[error("{0}")]
    Transport(String),
    /// The provider answered with an error object of its own.
    #[error("{0}")]
    Provider(String),
    /// A well-formed success body with no extractable text.
    #[error("the model returned no response text")]
    EmptyResponse,
}

pub type BackendBox = Box<dyn Backend + Send + Sync>;

#[async_trait]
pub trait Backend {
    fn name(&self) -> &'static str;

    /// Used at startup to verify the configured model is reachable with the
    /// stored credential.
    async fn health_check(&self, api_key: &str, model: &str) -> Result<()>;

    /// Issues exactly one completion request. No retries: retry policy, if
    /// any, belongs to the caller.
    async fn generate(
        &self,
        request: GenerationRequest,
        api_key: &str,
        model: &str,
    ) -> Result<String, GenerationError>;
}
