//! Evaluation orchestrator.
//!
//! Runs reference generation, metric computation and judging in sequence
//! and merges everything into one [`EvaluationResult`]. Each stage degrades
//! on its own, so `evaluate` always returns a complete record.

use crate::config::Config;
use crate::error::{GenerationError, GenerationStage, Result};
use crate::judge::{JudgeVerdict, LlmJudge, Quality, Verdict};
use crate::llm::{GenerativeAdapter, LlmClient, TextGenerator};
use crate::metrics::{MetricScores, MetricsSummary, RougeScores};
use crate::question::{Answer, Question, ReferenceAnswer};
use crate::reference::ReferenceGenerator;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{info, warn};

/// Method tag attached to every result.
pub const EVALUATION_METHOD: &str = "LLM-as-a-Judge with ROUGE/BLEU";

/// The merged outcome of one evaluation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvaluationResult {
    pub llm_judge_verdict: Verdict,
    pub quality: Quality,
    pub score: u8,
    pub reasoning: String,
    pub strengths: Vec<String>,
    pub missing_elements: Vec<String>,
    pub content_depth: u8,
    pub clarity: u8,
    pub accuracy: u8,
    pub completeness: u8,
    pub judge_confidence: u8,
    pub reference_answer: String,
    pub rouge_scores: RougeScores,
    pub bleu_score: f64,
    pub metrics_summary: MetricsSummary,
    pub evaluation_method: String,
}

impl EvaluationResult {
    /// Merge the stage outputs, renaming judge fields to their public names.
    pub fn merge(verdict: JudgeVerdict, reference: &ReferenceAnswer, scores: MetricScores) -> Self {
        let reference_answer = match reference {
            Ok(text) => text.clone(),
            Err(e) => e.to_string(),
        };

        Self {
            llm_judge_verdict: verdict.verdict,
            quality: verdict.quality,
            score: verdict.score,
            reasoning: verdict.reasoning,
            strengths: verdict.strengths,
            missing_elements: verdict.improvements,
            content_depth: verdict.detail,
            clarity: verdict.clarity,
            accuracy: verdict.accuracy,
            completeness: verdict.completeness,
            judge_confidence: verdict.judge_confidence,
            reference_answer,
            rouge_scores: scores.rouge,
            bleu_score: scores.bleu,
            metrics_summary: MetricsSummary::from_scores(&scores),
            evaluation_method: EVALUATION_METHOD.to_string(),
        }
    }

    /// A terminal `ERROR` result with every score zeroed.
    pub fn error(message: impl Into<String>) -> Self {
        Self::merge(
            JudgeVerdict::error(message),
            &Ok(String::new()),
            MetricScores::default(),
        )
    }

    /// True when judging failed or was skipped.
    pub fn is_error(&self) -> bool {
        self.quality == Quality::Error
    }
}

/// Answer plus its evaluation, as produced by [`Evaluator::ask`].
#[derive(Debug, Clone)]
pub struct QaOutcome {
    pub question: Question,
    pub answer: Answer,
    /// `None` when answer generation failed.
    pub evaluation: Option<EvaluationResult>,
}

/// Answer evaluator. Construct once and share it; it holds no per-request state.
#[derive(Clone)]
pub struct Evaluator {
    generator: Arc<dyn TextGenerator>,
    reference: ReferenceGenerator,
    judge: LlmJudge,
}

impl Evaluator {
    /// Create an evaluator on top of an already connected generator.
    pub fn new(generator: Arc<dyn TextGenerator>) -> Self {
        Self {
            reference: ReferenceGenerator::new(generator.clone()),
            judge: LlmJudge::new(generator.clone()),
            generator,
        }
    }

    /// Validate the configuration and connect to the first working model.
    ///
    /// Fails when the API key is missing or no candidate model answers.
    pub async fn connect(config: &Config) -> Result<Self> {
        config.validate()?;
        let client = LlmClient::new(config.llm.clone());
        let adapter = GenerativeAdapter::from_client(client).await?;
        Ok(Self::new(Arc::new(adapter)))
    }

    /// Model answering prompts.
    pub fn model(&self) -> &str {
        self.generator.model()
    }

    /// Ask the model to answer `question` directly.
    pub async fn get_answer(&self, question: &Question) -> Answer {
        self.generator.generate(question.as_str()).await.map_err(|e| {
            warn!(error = %e, "answer generation failed");
            GenerationError::new(GenerationStage::Answer, e)
        })
    }

    /// Evaluate `answer` to `question`.
    ///
    /// A failed answer short-circuits to an `ERROR` result without any model
    /// calls. Otherwise the reference, metrics and judge stages run in order.
    ///
    /// When the reference fails there is no baseline to compare against: all
    /// metrics are zero, `reference_answer` holds the error text, and the
    /// judge still runs. Zero metrics therefore do not always mean zero
    /// overlap.
    pub async fn evaluate(&self, question: &Question, answer: &Answer) -> EvaluationResult {
        let answer = match answer {
            Ok(text) => text,
            Err(e) => {
                warn!(error = %e, "skipping evaluation of failed answer");
                return EvaluationResult::error("Original answer generation failed");
            }
        };

        info!("Generating reference answer");
        let reference = self.reference.generate_reference(question).await;

        info!("Calculating NLP metrics");
        let scores = match &reference {
            Ok(text) => MetricScores::compute(answer, text),
            Err(_) => {
                warn!("no reference answer, metrics set to zero");
                MetricScores::default()
            }
        };

        info!("Running LLM-as-a-Judge evaluation");
        let verdict = self.judge.judge(question, answer, &scores).await;

        let result = EvaluationResult::merge(verdict, &reference, scores);
        info!(
            verdict = result.llm_judge_verdict.as_str(),
            score = result.score,
            overall = result.metrics_summary.overall_score,
            "evaluation complete"
        );
        result
    }

    /// Generate an answer and evaluate it unless generation failed.
    pub async fn ask(&self, question: &Question) -> QaOutcome {
        let answer = self.get_answer(question).await;
        let evaluation = match &answer {
            Ok(_) => Some(self.evaluate(question, &answer).await),
            Err(_) => None,
        };

        QaOutcome {
            question: question.clone(),
            answer,
            evaluation,
        }
    }
}
