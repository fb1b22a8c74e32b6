//! Prompt templates for reference generation and judging.

use crate::metrics::MetricScores;

/// Collection of prompts used by the evaluation pipeline.
pub struct Prompts;

impl Prompts {
    /// Prompt asking for the ideal, maximally comprehensive answer to `question`.
    pub fn reference_answer(question: &str) -> String {
        format!(
            r#"As an expert evaluator, generate the IDEAL reference answer for this question:

Question: {question}

Requirements:
- Maximum comprehensiveness and detail
- Perfect structure and clarity
- Complete coverage of all aspects
- Actionable and specific guidance
- Include examples and best practices

Provide the most comprehensive answer possible that covers:
- Specific details and concrete examples
- Step-by-step actionable guidance
- Proper structure and organization
- Relevant context and explanations
- Potential pitfalls and solutions

Reference Answer:"#
        )
    }

    /// Judge prompt embedding the Q&A pair and the lexical metrics.
    pub fn judge(question: &str, answer: &str, scores: &MetricScores) -> String {
        format!(
            r#"[Expert Evaluation Task]
Evaluate this Q&A pair based on:
- Accuracy - Correctness of information
- Completeness - Coverage of the topic
- Clarity - Organization and readability
- Depth - Level of detail provided
- Usefulness - Practical value

Question: {question}
Answer: {answer}

Objective Metrics (for reference):
- ROUGE-1: {rouge1:.3}
- ROUGE-2: {rouge2:.3}
- ROUGE-L: {rouge_l:.3}
- BLEU: {bleu:.3}

Provide evaluation in this exact JSON format:
{{
    "verdict": "EXCELLENT/GOOD/FAIR/POOR",
    "score": 1-10,
    "reasoning": "Detailed analysis",
    "strengths": ["list", "of", "strengths"],
    "improvements": ["suggested", "improvements"],
    "detail_score": 1-10,
    "clarity_score": 1-10,
    "accuracy_score": 1-10,
    "completeness_score": 1-10
}}

Respond with only the JSON, no other text."#,
            rouge1 = scores.rouge.rouge1,
            rouge2 = scores.rouge.rouge2,
            rouge_l = scores.rouge.rouge_l,
            bleu = scores.bleu,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metrics::RougeScores;

    #[test]
    fn test_reference_prompt_embeds_question() {
        let prompt = Prompts::reference_answer("How do I brew tea?");
        assert!(prompt.contains("Question: How do I brew tea?"));
        assert!(prompt.contains("Potential pitfalls and solutions"));
        assert!(prompt.trim_end().ends_with("Reference Answer:"));
    }

    #[test]
    fn test_judge_prompt_formats_metrics_to_three_decimals() {
        let scores = MetricScores {
            rouge: RougeScores {
                rouge1: 0.5,
                rouge2: 0.12345,
                rouge_l: 1.0 / 3.0,
            },
            bleu: 0.0,
        };
        let prompt = Prompts::judge("Q?", "A.", &scores);

        assert!(prompt.contains("Question: Q?"));
        assert!(prompt.contains("Answer: A."));
        assert!(prompt.contains("- ROUGE-1: 0.500"));
        assert!(prompt.contains("- ROUGE-2: 0.123"));
        assert!(prompt.contains("- ROUGE-L: 0.333"));
        assert!(prompt.contains("- BLEU: 0.000"));
        assert!(prompt.contains("\"completeness_score\": 1-10"));
    }
}
