//! Lexical similarity metrics between an answer and a reference answer.
//!
//! All calculators are pure and never fail; problems degrade to zero scores
//! so a metrics issue can never abort an evaluation.

mod bleu;
mod rouge;
pub mod tokenize;

pub use bleu::{SentenceBleu, bleu};
pub use rouge::{RougeScores, rouge};

use serde::{Deserialize, Serialize};

/// ROUGE and BLEU scores for one answer/reference pair.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct MetricScores {
    pub rouge: RougeScores,
    pub bleu: f64,
}

impl MetricScores {
    /// Compute every metric for `answer` against `reference`.
    pub fn compute(answer: &str, reference: &str) -> Self {
        Self {
            rouge: rouge(answer, reference),
            bleu: bleu(answer, reference),
        }
    }
}

/// Qualitative band of the weighted overall score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Interpretation {
    #[serde(rename = "Excellent match with reference")]
    Excellent,
    #[serde(rename = "Good match with some variations")]
    Good,
    #[serde(rename = "Partial match with significant differences")]
    Partial,
    #[serde(rename = "Low similarity to reference")]
    Low,
}

impl Interpretation {
    pub fn from_overall(overall: f64) -> Self {
        if overall >= 0.75 {
            Interpretation::Excellent
        } else if overall >= 0.5 {
            Interpretation::Good
        } else if overall >= 0.25 {
            Interpretation::Partial
        } else {
            Interpretation::Low
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Interpretation::Excellent => "Excellent match with reference",
            Interpretation::Good => "Good match with some variations",
            Interpretation::Partial => "Partial match with significant differences",
            Interpretation::Low => "Low similarity to reference",
        }
    }
}

/// Weighted roll-up of the metrics with an interpretation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricsSummary {
    pub overall_score: f64,
    pub interpretation: Interpretation,
    #[serde(flatten)]
    pub rouge: RougeScores,
    pub bleu_score: f64,
}

impl MetricsSummary {
    /// `0.4·rouge1 + 0.3·rouge2 + 0.2·rougeL + 0.1·bleu`, kept within `[0, 1]`.
    pub fn from_scores(scores: &MetricScores) -> Self {
        let overall = (scores.rouge.rouge1 * 0.4
            + scores.rouge.rouge2 * 0.3
            + scores.rouge.rouge_l * 0.2
            + scores.bleu * 0.1)
            .clamp(0.0, 1.0);

        Self {
            overall_score: overall,
            interpretation: Interpretation::from_overall(overall),
            rouge: scores.rouge,
            bleu_score: scores.bleu,
        }
    }
}

impl Default for MetricsSummary {
    fn default() -> Self {
        Self::from_scores(&MetricScores::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scores(r1: f64, r2: f64, rl: f64, b: f64) -> MetricScores {
        MetricScores {
            rouge: RougeScores {
                rouge1: r1,
                rouge2: r2,
                rouge_l: rl,
            },
            bleu: b,
        }
    }

    #[test]
    fn test_interpretation_bands_at_boundaries() {
        assert_eq!(Interpretation::from_overall(1.0), Interpretation::Excellent);
        assert_eq!(Interpretation::from_overall(0.75), Interpretation::Excellent);
        assert_eq!(Interpretation::from_overall(0.7499), Interpretation::Good);
        assert_eq!(Interpretation::from_overall(0.5), Interpretation::Good);
        assert_eq!(Interpretation::from_overall(0.4999), Interpretation::Partial);
        assert_eq!(Interpretation::from_overall(0.25), Interpretation::Partial);
        assert_eq!(Interpretation::from_overall(0.2499), Interpretation::Low);
        assert_eq!(Interpretation::from_overall(0.0), Interpretation::Low);
    }

    #[test]
    fn test_overall_weights() {
        let summary = MetricsSummary::from_scores(&scores(1.0, 0.0, 0.0, 0.0));
        assert!((summary.overall_score - 0.4).abs() < 1e-12);

        let summary = MetricsSummary::from_scores(&scores(0.0, 0.0, 0.0, 1.0));
        assert!((summary.overall_score - 0.1).abs() < 1e-12);
        assert_eq!(summary.interpretation, Interpretation::Low);
    }

    #[test]
    fn test_overall_is_bounded() {
        let perfect = MetricsSummary::from_scores(&scores(1.0, 1.0, 1.0, 1.0));
        assert!(perfect.overall_score <= 1.0);
        assert_eq!(perfect.interpretation, Interpretation::Excellent);

        let zero = MetricsSummary::default();
        assert_eq!(zero.overall_score, 0.0);
        assert_eq!(zero.interpretation, Interpretation::Low);
    }

    #[test]
    fn test_summary_json_shape() {
        let summary = MetricsSummary::from_scores(&scores(0.6, 0.6, 0.6, 0.6));
        let json = serde_json::to_value(&summary).unwrap();

        assert_eq!(json["interpretation"], "Good match with some variations");
        assert_eq!(json["rouge1"], 0.6);
        assert_eq!(json["rougeL"], 0.6);
        assert_eq!(json["bleu_score"], 0.6);
        assert!(json["overall_score"].is_number());
    }

    #[test]
    fn test_compute_identical() {
        let text = "Ownership rules let Rust manage memory without a garbage collector.";
        let scores = MetricScores::compute(text, text);
        assert_eq!(scores.rouge.rouge1, 1.0);
        assert!((scores.bleu - 1.0).abs() < 1e-9);
    }
}
