//! Pipeline inputs: the question and the answer under evaluation.

use crate::error::{EvalError, GenerationError, Result};
use std::fmt;

/// A generated answer, or the generation failure that replaced it.
pub type Answer = std::result::Result<String, GenerationError>;

/// A reference ("ideal") answer, used only as a comparison baseline.
pub type ReferenceAnswer = std::result::Result<String, GenerationError>;

/// A trimmed, non-empty question.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Question(String);

impl Question {
    pub fn new(text: impl AsRef<str>) -> Result<Self> {
        let trimmed = text.as_ref().trim();
        if trimmed.is_empty() {
            return Err(EvalError::InvalidQuestion(
                "question must not be empty".to_string(),
            ));
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Question {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Question {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
