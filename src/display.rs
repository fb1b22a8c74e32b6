//! Terminal rendering of answers and evaluation results.

use crate::evaluator::EvaluationResult;
use crate::question::Answer;
use std::fmt;

/// Width of the report and of wrapped reasoning text.
pub const REPORT_WIDTH: usize = 80;

/// Plain-text report for one [`EvaluationResult`].
pub struct Report<'a>(pub &'a EvaluationResult);

impl fmt::Display for Report<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let result = self.0;
        let rule = "=".repeat(REPORT_WIDTH);

        writeln!(f)?;
        writeln!(f, "{}", rule)?;
        writeln!(f, "{:^width$}", "EVALUATION RESULTS", width = REPORT_WIDTH)?;
        writeln!(f, "{}", rule)?;

        writeln!(f)?;
        writeln!(f, "Verdict:        {}", result.llm_judge_verdict.as_str())?;
        writeln!(f, "Overall Score:  {}/10", result.score)?;
        writeln!(f, "Method:         {}", result.evaluation_method)?;

        writeln!(f, "\nDetailed Scores:")?;
        writeln!(f, "  - Depth:        {}/10", result.content_depth)?;
        writeln!(f, "  - Clarity:      {}/10", result.clarity)?;
        writeln!(f, "  - Accuracy:     {}/10", result.accuracy)?;
        writeln!(f, "  - Completeness: {}/10", result.completeness)?;

        let metrics = &result.metrics_summary;
        writeln!(f, "\nNLP Metrics:")?;
        writeln!(f, "  - ROUGE-1: {:.3}", metrics.rouge.rouge1)?;
        writeln!(f, "  - ROUGE-2: {:.3}", metrics.rouge.rouge2)?;
        writeln!(f, "  - ROUGE-L: {:.3}", metrics.rouge.rouge_l)?;
        writeln!(f, "  - BLEU:    {:.3}", metrics.bleu_score)?;
        writeln!(
            f,
            "  - Overall: {:.3} ({})",
            metrics.overall_score,
            metrics.interpretation.as_str()
        )?;

        writeln!(f, "\nEvaluation Reasoning:")?;
        let reasoning = if result.reasoning.trim().is_empty() {
            "No reasoning provided"
        } else {
            result.reasoning.as_str()
        };
        for line in wrap(reasoning, REPORT_WIDTH) {
            writeln!(f, "{}", line)?;
        }

        write_bullets(f, "Strengths", &result.strengths)?;
        write_bullets(f, "Suggested Improvements", &result.missing_elements)?;

        writeln!(f, "{}", rule)
    }
}

fn write_bullets(f: &mut fmt::Formatter<'_>, title: &str, items: &[String]) -> fmt::Result {
    if items.is_empty() {
        return Ok(());
    }
    writeln!(f, "\n{}:", title)?;
    for item in items {
        writeln!(f, "  • {}", item)?;
    }
    Ok(())
}

/// Text shown for a generated answer; failures show their error marker.
pub fn answer_text(answer: &Answer) -> String {
    match answer {
        Ok(text) => text.clone(),
        Err(e) => e.to_string(),
    }
}

/// Greedy word wrap. Words longer than `width` get a line of their own.
pub fn wrap(text: &str, width: usize) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();

    for word in text.split_whitespace() {
        let needed = if current.is_empty() {
            word.chars().count()
        } else {
            current.chars().count() + 1 + word.chars().count()
        };

        if needed > width && !current.is_empty() {
            lines.push(std::mem::take(&mut current));
        }
        if !current.is_empty() {
            current.push(' ');
        }
        current.push_str(word);
    }

    if !current.is_empty() {
        lines.push(current);
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{GenerationError, GenerationStage};

    #[test]
    fn test_wrap_respects_width() {
        let text = "word ".repeat(50);
        let lines = wrap(&text, 20);

        assert!(lines.len() > 1);
        assert!(lines.iter().all(|l| l.chars().count() <= 20));
        assert_eq!(lines.join(" "), text.trim_end());
    }

    #[test]
    fn test_wrap_long_word() {
        let long = "x".repeat(30);
        let lines = wrap(&format!("a {} b", long), 10);
        assert_eq!(lines, vec!["a".to_string(), long, "b".to_string()]);
    }

    #[test]
    fn test_wrap_empty() {
        assert!(wrap("   ", 80).is_empty());
    }

    #[test]
    fn test_report_sections() {
        let mut result = EvaluationResult::error("Original answer generation failed");
        result.strengths = vec!["concise".to_string()];

        let text = Report(&result).to_string();

        assert!(text.contains("EVALUATION RESULTS"));
        assert!(text.contains("Verdict:        ERROR"));
        assert!(text.contains("Overall Score:  0/10"));
        assert!(text.contains("  - ROUGE-1: 0.000"));
        assert!(text.contains("(Low similarity to reference)"));
        assert!(text.contains("Original answer generation failed"));
        assert!(text.contains("Strengths:\n  • concise"));
        assert!(!text.contains("Suggested Improvements"));
    }

    #[test]
    fn test_report_wraps_reasoning() {
        let mut result = EvaluationResult::error("");
        result.reasoning = "lorem ipsum ".repeat(30);

        let text = Report(&result).to_string();
        assert!(text.lines().all(|l| l.chars().count() <= REPORT_WIDTH));

        result.reasoning.clear();
        assert!(Report(&result).to_string().contains("No reasoning provided"));
    }

    #[test]
    fn test_answer_text_shows_marker() {
        let failed: Answer = Err(GenerationError::new(GenerationStage::Answer, "quota"));
        assert_eq!(answer_text(&failed), "Error getting answer: quota");
        assert_eq!(answer_text(&Ok("Paris.".to_string())), "Paris.");
    }
}
