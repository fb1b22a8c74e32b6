//! LLM-as-a-Judge evaluation.
//!
//! The judge model is asked for a JSON verdict. Its reply is cleaned of
//! markdown fences and parsed leniently: missing fields take defaults,
//! while unparseable replies and failed calls become an `ERROR` verdict.

use crate::error::{EvalError, Result};
use crate::llm::{Prompts, TextGenerator};
use crate::metrics::MetricScores;
use crate::question::Question;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::warn;

/// Verdict returned by the judge model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Verdict {
    Excellent,
    Good,
    Fair,
    Poor,
    Bad,
    Error,
    Unknown,
}

impl Verdict {
    /// Convert from string (case-insensitive). Unrecognized tokens map to `Unknown`.
    pub fn parse(s: &str) -> Self {
        match s.trim().to_uppercase().as_str() {
            "EXCELLENT" => Verdict::Excellent,
            "GOOD" => Verdict::Good,
            "FAIR" => Verdict::Fair,
            "POOR" => Verdict::Poor,
            "BAD" => Verdict::Bad,
            "ERROR" => Verdict::Error,
            _ => Verdict::Unknown,
        }
    }

    /// Coarse quality label. `Quality::Error` is reserved for failed
    /// judging and never derived from a verdict token.
    pub fn quality(&self) -> Quality {
        match self {
            Verdict::Excellent | Verdict::Good => Quality::Good,
            Verdict::Fair | Verdict::Poor | Verdict::Bad => Quality::Bad,
            Verdict::Error | Verdict::Unknown => Quality::Unknown,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Verdict::Excellent => "EXCELLENT",
            Verdict::Good => "GOOD",
            Verdict::Fair => "FAIR",
            Verdict::Poor => "POOR",
            Verdict::Bad => "BAD",
            Verdict::Error => "ERROR",
            Verdict::Unknown => "UNKNOWN",
        }
    }
}

/// Coarse good/bad label derived from the verdict.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Quality {
    Good,
    Bad,
    Unknown,
    Error,
}

/// Structured judgement of one answer. Every score is in `[0, 10]`.
#[derive(Debug, Clone, PartialEq)]
pub struct JudgeVerdict {
    pub verdict: Verdict,
    pub quality: Quality,
    pub score: u8,
    pub reasoning: String,
    pub strengths: Vec<String>,
    pub improvements: Vec<String>,
    pub detail: u8,
    pub clarity: u8,
    pub accuracy: u8,
    pub completeness: u8,
    /// The overall score clamped into `[1, 10]`; 0 only for errors.
    pub judge_confidence: u8,
}

/// Reply shape requested from the judge model. All fields are optional,
/// but a field that is present must not be `null`.
#[derive(Debug, Deserialize)]
struct RawVerdict {
    verdict: Option<String>,
    score: Option<f64>,
    reasoning: Option<String>,
    strengths: Option<Vec<serde_json::Value>>,
    improvements: Option<Vec<serde_json::Value>>,
    detail_score: Option<f64>,
    clarity_score: Option<f64>,
    accuracy_score: Option<f64>,
    completeness_score: Option<f64>,
}

/// List items are kept as text; non-string items keep their JSON form.
fn to_items(values: Option<Vec<serde_json::Value>>) -> Vec<String> {
    values
        .unwrap_or_default()
        .into_iter()
        .map(|v| match v {
            serde_json::Value::String(s) => s,
            other => other.to_string(),
        })
        .collect()
}

fn to_scale(value: Option<f64>) -> u8 {
    value.map(|v| v.round().clamp(0.0, 10.0) as u8).unwrap_or(0)
}

impl JudgeVerdict {
    /// The standardized all-zero record used whenever judging fails.
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            verdict: Verdict::Error,
            quality: Quality::Error,
            score: 0,
            reasoning: message.into(),
            strengths: Vec::new(),
            improvements: Vec::new(),
            detail: 0,
            clarity: 0,
            accuracy: 0,
            completeness: 0,
            judge_confidence: 0,
        }
    }

    /// Parse a judge model reply.
    ///
    /// Fails with [`EvalError::LlmParse`] if the cleaned reply is not a JSON
    /// object or a present field has the wrong type.
    pub fn parse(response: &str) -> Result<Self> {
        let cleaned = clean_json_response(response);

        let value: serde_json::Value = serde_json::from_str(cleaned).map_err(|e| {
            EvalError::LlmParse(format!(
                "Failed to parse judge response: {}. Response: {}",
                e,
                preview(response)
            ))
        })?;

        let Some(fields) = value.as_object() else {
            return Err(EvalError::LlmParse(format!(
                "Judge response is not a JSON object: {}",
                preview(response)
            )));
        };
        if let Some((name, _)) = fields.iter().find(|(_, v)| v.is_null()) {
            return Err(EvalError::LlmParse(format!(
                "Judge response field '{}' is null",
                name
            )));
        }

        let raw: RawVerdict = serde_json::from_value(value).map_err(|e| {
            EvalError::LlmParse(format!("Judge response has invalid fields: {}", e))
        })?;

        let verdict = raw
            .verdict
            .as_deref()
            .map(Verdict::parse)
            .unwrap_or(Verdict::Unknown);

        let judge_confidence = raw
            .score
            .map(|s| s.round().clamp(1.0, 10.0) as u8)
            .unwrap_or(5);

        Ok(Self {
            verdict,
            quality: verdict.quality(),
            score: to_scale(raw.score),
            reasoning: raw
                .reasoning
                .unwrap_or_else(|| "No reasoning provided".to_string()),
            strengths: to_items(raw.strengths),
            improvements: to_items(raw.improvements),
            detail: to_scale(raw.detail_score),
            clarity: to_scale(raw.clarity_score),
            accuracy: to_scale(raw.accuracy_score),
            completeness: to_scale(raw.completeness_score),
            judge_confidence,
        })
    }
}

/// Strip a leading ```` ```json ```` (or bare ```` ``` ````) fence and a
/// trailing ```` ``` ```` fence.
pub fn clean_json_response(text: &str) -> &str {
    let mut text = text.trim();
    if let Some(rest) = text.strip_prefix("```json") {
        text = rest;
    } else if let Some(rest) = text.strip_prefix("```") {
        text = rest;
    }
    if let Some(rest) = text.strip_suffix("```") {
        text = rest;
    }
    text.trim()
}

fn preview(response: &str) -> String {
    response.chars().take(200).collect()
}

/// LLM-as-a-Judge for answer quality.
#[derive(Clone)]
pub struct LlmJudge {
    generator: Arc<dyn TextGenerator>,
}

impl LlmJudge {
    /// Create a new judge backed by the given generator.
    pub fn new(generator: Arc<dyn TextGenerator>) -> Self {
        Self { generator }
    }

    /// Judge `answer` to `question`. Never fails: any problem yields
    /// [`JudgeVerdict::error`].
    pub async fn judge(
        &self,
        question: &Question,
        answer: &str,
        scores: &MetricScores,
    ) -> JudgeVerdict {
        let prompt = Prompts::judge(question.as_str(), answer, scores);

        let outcome = match self.generator.generate(&prompt).await {
            Ok(response) => JudgeVerdict::parse(&response),
            Err(e) => Err(e),
        };

        outcome.unwrap_or_else(|e| {
            warn!(error = %e, "LLM Judge error");
            JudgeVerdict::error(format!("LLM Judge evaluation failed: {}", e))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::testing::ScriptedGenerator;

    const FULL_REPLY: &str = r#"{
        "verdict": "GOOD",
        "score": 8,
        "reasoning": "Correct and concise.",
        "strengths": ["accurate", "direct"],
        "improvements": ["add context"],
        "detail_score": 6,
        "clarity_score": 9,
        "accuracy_score": 10,
        "completeness_score": 7
    }"#;

    #[test]
    fn test_parse_full_reply() {
        let v = JudgeVerdict::parse(FULL_REPLY).unwrap();
        assert_eq!(v.verdict, Verdict::Good);
        assert_eq!(v.quality, Quality::Good);
        assert_eq!(v.score, 8);
        assert_eq!(v.reasoning, "Correct and concise.");
        assert_eq!(v.strengths, vec!["accurate", "direct"]);
        assert_eq!(v.improvements, vec!["add context"]);
        assert_eq!((v.detail, v.clarity, v.accuracy, v.completeness), (6, 9, 10, 7));
        assert_eq!(v.judge_confidence, 8);
    }

    #[test]
    fn test_parse_fenced_reply() {
        let fenced = format!("```json\n{}\n```", FULL_REPLY);
        assert_eq!(JudgeVerdict::parse(&fenced).unwrap().score, 8);

        let bare = format!("```\n{}\n```", FULL_REPLY);
        assert_eq!(JudgeVerdict::parse(&bare).unwrap().score, 8);
    }

    #[test]
    fn test_missing_fields_take_defaults() {
        let v = JudgeVerdict::parse("{}").unwrap();
        assert_eq!(v.verdict, Verdict::Unknown);
        assert_eq!(v.quality, Quality::Unknown);
        assert_eq!(v.score, 0);
        assert_eq!(v.reasoning, "No reasoning provided");
        assert!(v.strengths.is_empty());
        assert!(v.improvements.is_empty());
        assert_eq!((v.detail, v.clarity, v.accuracy, v.completeness), (0, 0, 0, 0));
        assert_eq!(v.judge_confidence, 5);
    }

    #[test]
    fn test_scores_are_clamped() {
        let v = JudgeVerdict::parse(r#"{"score": 14, "clarity_score": -3, "accuracy_score": 7.6}"#)
            .unwrap();
        assert_eq!(v.score, 10);
        assert_eq!(v.clarity, 0);
        assert_eq!(v.accuracy, 8);
        assert_eq!(v.judge_confidence, 10);

        let v = JudgeVerdict::parse(r#"{"score": 0}"#).unwrap();
        assert_eq!(v.score, 0);
        assert_eq!(v.judge_confidence, 1);
    }

    #[test]
    fn test_invalid_replies_are_errors() {
        for reply in [
            "",
            "   ",
            r#"{"verdict": "GOOD", "score": 8"#,
            r#"{"verdict": "GOOD", "score": "eight"}"#,
            r#"{"clarity_score": [1]}"#,
            r#"{"strengths": "just one"}"#,
            "[1, 2, 3]",
            "I think the answer is good.",
        ] {
            assert!(
                matches!(JudgeVerdict::parse(reply), Err(EvalError::LlmParse(_))),
                "expected parse error for {:?}",
                reply
            );
        }
    }

    #[test]
    fn test_quality_mapping() {
        assert_eq!(Verdict::parse("EXCELLENT").quality(), Quality::Good);
        assert_eq!(Verdict::parse("good").quality(), Quality::Good);
        assert_eq!(Verdict::parse("FAIR").quality(), Quality::Bad);
        assert_eq!(Verdict::parse("Poor").quality(), Quality::Bad);
        assert_eq!(Verdict::parse("BAD").quality(), Quality::Bad);
        assert_eq!(Verdict::parse("totally-unknown-token").quality(), Quality::Unknown);
        assert_eq!(Verdict::parse("ERROR").quality(), Quality::Unknown);
    }

    #[test]
    fn test_error_verdict_token_is_not_a_failure() {
        let v = JudgeVerdict::parse(r#"{"verdict": "ERROR", "score": 6}"#).unwrap();
        assert_eq!(v.verdict, Verdict::Error);
        assert_eq!(v.quality, Quality::Unknown);
        assert_eq!(v.score, 6);
    }

    #[test]
    fn test_null_fields_are_errors() {
        for reply in [
            r#"{"verdict": "GOOD", "score": null}"#,
            r#"{"verdict": null, "score": 8}"#,
            r#"{"score": 8, "strengths": null}"#,
        ] {
            assert!(
                matches!(JudgeVerdict::parse(reply), Err(EvalError::LlmParse(_))),
                "expected parse error for {:?}",
                reply
            );
        }
    }

    #[test]
    fn test_structured_list_items_are_kept() {
        let v = JudgeVerdict::parse(
            r#"{"verdict": "GOOD", "strengths": [{"point": "accurate"}, "clear", 3]}"#,
        )
        .unwrap();
        assert_eq!(v.strengths, vec![r#"{"point":"accurate"}"#, "clear", "3"]);
    }

    #[test]
    fn test_clean_json_response() {
        assert_eq!(clean_json_response("```json\n{}\n```"), "{}");
        assert_eq!(clean_json_response("  {\"a\": 1}  "), "{\"a\": 1}");
        assert_eq!(clean_json_response("{}```"), "{}");
    }

    #[test]
    fn test_error_record() {
        let v = JudgeVerdict::error("boom");
        assert_eq!(v.verdict, Verdict::Error);
        assert_eq!(v.quality, Quality::Error);
        assert_eq!(v.reasoning, "boom");
        assert_eq!(v.score + v.judge_confidence + v.detail, 0);
    }

    #[tokio::test]
    async fn test_judge_sends_prompt_and_parses() {
        let generator = Arc::new(ScriptedGenerator::replying(&[FULL_REPLY]));
        let judge = LlmJudge::new(generator.clone());
        let question = Question::new("What is the capital of France?").unwrap();

        let v = judge
            .judge(&question, "Paris.", &MetricScores::default())
            .await;

        assert_eq!(v.score, 8);
        let prompts = generator.prompts();
        assert_eq!(prompts.len(), 1);
        assert!(prompts[0].contains("Question: What is the capital of France?"));
        assert!(prompts[0].contains("Answer: Paris."));
    }

    #[tokio::test]
    async fn test_judge_degrades_on_generation_failure() {
        let judge = LlmJudge::new(Arc::new(ScriptedGenerator::failing("quota exceeded")));
        let question = Question::new("Q?").unwrap();

        let v = judge.judge(&question, "A.", &MetricScores::default()).await;

        assert_eq!(v.verdict, Verdict::Error);
        assert!(v.reasoning.starts_with("LLM Judge evaluation failed:"));
        assert!(v.reasoning.contains("quota exceeded"));
    }

    #[tokio::test]
    async fn test_judge_degrades_on_garbage_reply() {
        let judge = LlmJudge::new(Arc::new(ScriptedGenerator::replying(&["not json at all"])));
        let question = Question::new("Q?").unwrap();

        let v = judge.judge(&question, "A.", &MetricScores::default()).await;
        assert_eq!(v.verdict, Verdict::Error);
        assert_eq!(v.score, 0);
    }
}
