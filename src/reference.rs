//! Reference ("ideal") answer generation.

use crate::error::{GenerationError, GenerationStage};
use crate::llm::{Prompts, TextGenerator};
use crate::question::{Question, ReferenceAnswer};
use std::sync::Arc;
use tracing::warn;

/// Produces the comparison baseline for the lexical metrics.
#[derive(Clone)]
pub struct ReferenceGenerator {
    generator: Arc<dyn TextGenerator>,
}

impl ReferenceGenerator {
    pub fn new(generator: Arc<dyn TextGenerator>) -> Self {
        Self { generator }
    }

    /// Ask the model for the ideal answer to `question`.
    ///
    /// A failed call is returned as `Err`, never propagated as a panic.
    pub async fn generate_reference(&self, question: &Question) -> ReferenceAnswer {
        let prompt = Prompts::reference_answer(question.as_str());
        self.generator.generate(&prompt).await.map_err(|e| {
            warn!(error = %e, "reference generation failed");
            GenerationError::new(GenerationStage::Reference, e)
        })
    }
}
