//! Model selection and the text generation seam used by the pipeline.

use super::client::LlmClient;
use crate::error::{EvalError, Result};
use async_trait::async_trait;
use tracing::{info, warn};

/// Something that turns a prompt into text.
///
/// The evaluation pipeline only talks to this trait, so tests and alternative
/// backends can be injected without touching the network.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    /// Generate text for `prompt`.
    async fn generate(&self, prompt: &str) -> Result<String>;

    /// Identifier of the model answering prompts.
    fn model(&self) -> &str;
}

/// An [`LlmClient`] bound to the first candidate model that answered.
///
/// Immutable once connected, so a single instance can be shared across
/// requests behind an `Arc`.
pub struct GenerativeAdapter {
    client: LlmClient,
    model: String,
}

impl GenerativeAdapter {
    /// Probe each candidate in order and bind the first one that responds.
    ///
    /// Fails with [`EvalError::NoModelAvailable`] when every candidate fails.
    pub async fn connect<S: AsRef<str>>(client: LlmClient, candidates: &[S]) -> Result<Self> {
        for candidate in candidates {
            let candidate = candidate.as_ref();
            match client.test_connection(candidate).await {
                Ok(()) => {
                    info!(model = candidate, "Successfully initialized model");
                    return Ok(Self {
                        client,
                        model: candidate.to_string(),
                    });
                }
                Err(e) => {
                    warn!(model = candidate, error = %e, "Failed to initialize model");
                }
            }
        }

        Err(EvalError::NoModelAvailable {
            tried: candidates.iter().map(|c| c.as_ref().to_string()).collect(),
        })
    }

    /// Connect using the candidate list from the client's configuration.
    pub async fn from_client(client: LlmClient) -> Result<Self> {
        let candidates = client.config().models.clone();
        Self::connect(client, &candidates).await
    }
}

#[async_trait]
impl TextGenerator for GenerativeAdapter {
    async fn generate(&self, prompt: &str) -> Result<String> {
        self.client.complete(&self.model, prompt).await
    }

    fn model(&self) -> &str {
        &self.model
    }
}
