//! Sentence-level BLEU against a single reference.
//!
//! Follows sacreBLEU's sentence scoring: 13a tokenization, clipped n-gram
//! precisions up to order 4, exponential smoothing for orders with no
//! matches, and the standard brevity penalty. The 0..100 score is
//! normalized to 0..1.

use super::tokenize::{bleu_tokens, tokenize_13a};
use std::collections::HashMap;

/// Sentence BLEU settings.
#[derive(Debug, Clone, Copy)]
pub struct SentenceBleu {
    /// Highest n-gram order.
    pub max_order: usize,
    /// Average only over the orders the hypothesis is long enough for.
    pub effective_order: bool,
}

impl Default for SentenceBleu {
    fn default() -> Self {
        Self {
            max_order: 4,
            effective_order: false,
        }
    }
}

/// n-gram statistics of a hypothesis against one reference.
#[derive(Debug, Default, PartialEq)]
struct NgramStats {
    correct: Vec<usize>,
    total: Vec<usize>,
    sys_len: usize,
    ref_len: usize,
}

impl SentenceBleu {
    /// Score `hypothesis` against `reference` on the 0..100 scale.
    ///
    /// Returns `None` if tokenization is unavailable.
    pub fn score(&self, hypothesis: &str, reference: &str) -> Option<f64> {
        let hyp = tokenize_13a(hypothesis)?;
        let refs = tokenize_13a(reference)?;
        let stats = self.stats(&hyp, &refs);
        Some(self.compute(&stats))
    }

    fn stats(&self, hyp: &[String], reference: &[String]) -> NgramStats {
        let mut stats = NgramStats {
            sys_len: hyp.len(),
            ref_len: reference.len(),
            ..Default::default()
        };

        for n in 1..=self.max_order {
            let ref_counts = ngram_counts(reference, n);
            let hyp_counts = ngram_counts(hyp, n);

            let correct = hyp_counts
                .iter()
                .map(|(ng, c)| (*c).min(ref_counts.get(ng).copied().unwrap_or(0)))
                .sum();

            stats.correct.push(correct);
            stats.total.push(hyp.len().saturating_sub(n - 1));
        }

        stats
    }

    fn compute(&self, stats: &NgramStats) -> f64 {
        if stats.sys_len == 0 {
            return 0.0;
        }

        let bp = if stats.sys_len < stats.ref_len {
            (1.0 - stats.ref_len as f64 / stats.sys_len as f64).exp()
        } else {
            1.0
        };

        let mut precisions = vec![0.0f64; self.max_order];
        let mut smooth = 1.0f64;
        let mut eff_order = self.max_order;

        for n in 0..self.max_order {
            if stats.total[n] == 0 {
                break;
            }
            if self.effective_order {
                eff_order = n + 1;
            }
            precisions[n] = if stats.correct[n] == 0 {
                smooth *= 2.0;
                100.0 / (smooth * stats.total[n] as f64)
            } else {
                100.0 * stats.correct[n] as f64 / stats.total[n] as f64
            };
        }

        let used = &precisions[..eff_order];
        if used.iter().any(|p| *p <= 0.0) {
            return 0.0;
        }

        let log_mean = used.iter().map(|p| p.ln()).sum::<f64>() / eff_order as f64;
        bp * log_mean.exp()
    }
}

fn ngram_counts(tokens: &[String], n: usize) -> HashMap<&[String], usize> {
    let mut counts = HashMap::new();
    if tokens.len() >= n {
        for window in tokens.windows(n) {
            *counts.entry(window).or_insert(0) += 1;
        }
    }
    counts
}

/// BLEU of `answer` against `reference`, normalized to `[0, 1]`.
///
/// Both texts are case-folded and tokenized before scoring. Never fails:
/// any problem yields `0.0`.
pub fn bleu(answer: &str, reference: &str) -> f64 {
    bleu_with(bleu_tokens, answer, reference)
}

fn bleu_with(tokenize: fn(&str) -> Vec<String>, answer: &str, reference: &str) -> f64 {
    let hypothesis = tokenize(answer).join(" ");
    let reference = tokenize(reference).join(" ");

    match SentenceBleu::default().score(&hypothesis, &reference) {
        Some(score) if score.is_finite() => (score / 100.0).clamp(0.0, 1.0),
        Some(score) => {
            tracing::warn!(score, "BLEU calculation produced a non-finite score");
            0.0
        }
        None => {
            tracing::warn!("BLEU calculation error: tokenizer unavailable");
            0.0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn toks(s: &str) -> Vec<String> {
        s.split_whitespace().map(str::to_string).collect()
    }

    #[test]
    fn test_identical_texts_score_one() {
        let text = "The quick brown fox jumps over the lazy dog.";
        assert!((bleu(text, text) - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_empty_answer_scores_zero() {
        assert_eq!(bleu("", "Paris is the capital of France."), 0.0);
        assert_eq!(bleu("Paris is lovely", ""), 0.0);
    }

    #[test]
    fn test_short_hypothesis_without_effective_order() {
        // Two tokens cannot form 3- and 4-grams, so the plain sentence score is zero.
        let score = bleu("Paris.", "Paris is the capital of France.");
        assert_eq!(score, 0.0);
    }

    #[test]
    fn test_effective_order_scores_short_hypothesis() {
        let scorer = SentenceBleu {
            effective_order: true,
            ..Default::default()
        };
        let score = scorer.score("paris .", "paris is the capital of france .").unwrap();
        assert!(score > 0.0 && score < 100.0);
    }

    #[test]
    fn test_exp_smoothing() {
        let scorer = SentenceBleu::default();
        // hyp 4 tokens, ref 4 tokens; unigram 3/4, no higher-order matches
        let stats = scorer.stats(&toks("a b c x"), &toks("c b a y"));
        assert_eq!(stats.correct, vec![3, 0, 0, 0]);
        assert_eq!(stats.total, vec![4, 3, 2, 1]);

        let expected = ((75.0f64).ln()
            + (100.0f64 / (2.0 * 3.0)).ln()
            + (100.0f64 / (4.0 * 2.0)).ln()
            + (100.0f64 / 8.0).ln())
            / 4.0;
        assert!((scorer.compute(&stats) - expected.exp()).abs() < 1e-9);
    }

    #[test]
    fn test_brevity_penalty() {
        let scorer = SentenceBleu::default();
        let stats = scorer.stats(&toks("a b c d"), &toks("a b c d e f g h"));
        let score = scorer.compute(&stats);
        assert!((score - 100.0 * (1.0f64 - 2.0).exp()).abs() < 1e-9);
    }

    #[test]
    fn test_fallback_tokens_still_score() {
        use crate::metrics::tokenize::regex_words;

        let text = "It's the quick brown fox, jumping over the lazy dog.";
        assert!((bleu_with(regex_words, text, text) - 1.0).abs() < 1e-9);

        // punctuation is dropped by the fallback, so only words are compared
        let score = bleu_with(regex_words, "the quick brown fox !", "the quick brown fox");
        assert!((score - 1.0).abs() < 1e-9);
        assert!(bleu("the quick brown fox !", "the quick brown fox") < 1.0);
    }

    #[test]
    fn test_score_is_bounded() {
        let score = bleu(
            "Rust is a systems programming language focused on safety.",
            "Rust is a language empowering everyone to build reliable software.",
        );
        assert!((0.0..=1.0).contains(&score));
    }
}
