//! Rust QA Judge - answer quality evaluation with an LLM-as-a-Judge.
//!
//! A question is answered by a generative model, which also writes an
//! "ideal" reference answer. The answer is compared with the reference
//! using ROUGE and BLEU, then the model judges it against a rubric with the
//! metric scores as context. Everything is merged into one
//! [`EvaluationResult`].
//!
//! # Quick Start
//!
//! ```no_run
//! use rust_qa_judge::{Config, Evaluator, Question};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     // Load configuration and connect to the first working model
//!     let config = Config::load()?;
//!     let evaluator = Evaluator::connect(&config).await?;
//!
//!     let question = Question::new("What is the capital of France?")?;
//!     let outcome = evaluator.ask(&question).await;
//!
//!     if let Some(evaluation) = outcome.evaluation {
//!         println!("{}: {}/10", evaluation.llm_judge_verdict.as_str(), evaluation.score);
//!     }
//!
//!     Ok(())
//! }
//! ```
//!
//! # Architecture
//!
//! - **GenerativeAdapter**: binds the first working model from an ordered candidate list
//! - **ReferenceGenerator**: asks the model for an ideal answer
//! - **metrics**: ROUGE-1/2/L and sentence BLEU against the reference
//! - **LlmJudge**: rubric-based verdict parsed from the model's JSON
//! - **Evaluator**: runs the stages and merges the result
//! - **server** / **console**: HTTP API and interactive loop

pub mod config;
pub mod console;
pub mod display;
pub mod error;
pub mod evaluator;
pub mod judge;
pub mod llm;
pub mod logging;
pub mod metrics;
pub mod question;
pub mod reference;
pub mod server;

// Re-export commonly used types
pub use config::Config;
pub use error::{EvalError, GenerationError, GenerationStage, Result};
pub use evaluator::{EVALUATION_METHOD, EvaluationResult, Evaluator, QaOutcome};
pub use judge::{JudgeVerdict, LlmJudge, Quality, Verdict};
pub use llm::{GenerativeAdapter, LlmClient, TextGenerator};
pub use metrics::{MetricScores, MetricsSummary, RougeScores};
pub use question::{Answer, Question, ReferenceAnswer};
pub use reference::ReferenceGenerator;
