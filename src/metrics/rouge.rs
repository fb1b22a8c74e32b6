//! ROUGE-1, ROUGE-2 and ROUGE-L F-measures.

use super::tokenize::rouge_tokens;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// ROUGE F-measures, each in `[0, 1]`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct RougeScores {
    pub rouge1: f64,
    pub rouge2: f64,
    #[serde(rename = "rougeL")]
    pub rouge_l: f64,
}

/// Compute ROUGE scores of `answer` against `reference` with stemming.
///
/// Never fails: empty input or a non-finite intermediate result gives zeros.
pub fn rouge(answer: &str, reference: &str) -> RougeScores {
    let cand = rouge_tokens(answer, true);
    let refs = rouge_tokens(reference, true);

    let scores = RougeScores {
        rouge1: ngram_fmeasure(&refs, &cand, 1),
        rouge2: ngram_fmeasure(&refs, &cand, 2),
        rouge_l: lcs_fmeasure(&refs, &cand),
    };

    if [scores.rouge1, scores.rouge2, scores.rouge_l]
        .iter()
        .all(|s| s.is_finite() && (0.0..=1.0).contains(s))
    {
        scores
    } else {
        tracing::warn!(?scores, "ROUGE calculation produced out-of-range values");
        RougeScores::default()
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

/// F-measure of clipped n-gram overlap.
fn ngram_fmeasure(reference: &[String], candidate: &[String], n: usize) -> f64 {
    let ref_counts = ngram_counts(reference, n);
    let cand_counts = ngram_counts(candidate, n);

    let ref_total: usize = ref_counts.values().sum();
    let cand_total: usize = cand_counts.values().sum();
    if ref_total == 0 || cand_total == 0 {
        return 0.0;
    }

    let overlap: usize = cand_counts
        .iter()
        .filter_map(|(ng, c)| ref_counts.get(ng).map(|r| (*c).min(*r)))
        .sum();

    fmeasure(
        overlap as f64 / cand_total as f64,
        overlap as f64 / ref_total as f64,
    )
}

/// F-measure based on the longest common subsequence.
fn lcs_fmeasure(reference: &[String], candidate: &[String]) -> f64 {
    if reference.is_empty() || candidate.is_empty() {
        return 0.0;
    }

    let lcs = lcs_length(reference, candidate) as f64;
    fmeasure(lcs / candidate.len() as f64, lcs / reference.len() as f64)
}

/// LCS length, DP over two rows sized by the shorter sequence.
fn lcs_length(a: &[String], b: &[String]) -> usize {
    let (short, long) = if a.len() < b.len() { (a, b) } else { (b, a) };

    let mut prev = vec![0usize; short.len() + 1];
    let mut curr = vec![0usize; short.len() + 1];

    for i in 1..=long.len() {
        for j in 1..=short.len() {
            curr[j] = if long[i - 1] == short[j - 1] {
                prev[j - 1] + 1
            } else {
                prev[j].max(curr[j - 1])
            };
        }
        std::mem::swap(&mut prev, &mut curr);
    }

    prev[short.len()]
}

fn fmeasure(precision: f64, recall: f64) -> f64 {
    if precision + recall > 0.0 {
        2.0 * precision * recall / (precision + recall)
    } else {
        0.0
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
        let scores = rouge(text, text);
        assert_eq!(scores.rouge1, 1.0);
        assert_eq!(scores.rouge2, 1.0);
        assert_eq!(scores.rouge_l, 1.0);
    }

    #[test]
    fn test_disjoint_texts_score_zero() {
        let scores = rouge("alpha beta gamma", "delta epsilon zeta");
        assert_eq!(scores, RougeScores::default());
    }

    #[test]
    fn test_empty_inputs_score_zero() {
        assert_eq!(rouge("", "something here"), RougeScores::default());
        assert_eq!(rouge("something here", ""), RougeScores::default());
        assert_eq!(rouge("!!!", "???"), RougeScores::default());
    }

    #[test]
    fn test_partial_overlap() {
        // candidate: paris ; reference: paris is the capital of france
        let scores = rouge("Paris.", "Paris is the capital of France.");
        // P = 1/1, R = 1/6 -> F = 2/7
        assert!((scores.rouge1 - 2.0 / 7.0).abs() < 1e-12);
        assert_eq!(scores.rouge2, 0.0);
        assert!((scores.rouge_l - 2.0 / 7.0).abs() < 1e-12);
    }

    #[test]
    fn test_stemming_matches_inflections() {
        let scores = rouge("cats running", "cat runs");
        assert_eq!(scores.rouge1, 1.0);
    }

    #[test]
    fn test_clipped_counts() {
        let r = toks("the cat");
        let c = toks("the the the");
        // overlap clipped to 1: P = 1/3, R = 1/2
        let f = ngram_fmeasure(&r, &c, 1);
        assert!((f - 0.4).abs() < 1e-12);
    }

    #[test]
    fn test_lcs_length() {
        assert_eq!(lcs_length(&toks("a b c d e"), &toks("a c e")), 3);
        assert_eq!(lcs_length(&toks("a b"), &toks("c d")), 0);
    }

    #[test]
    fn test_serializes_rouge_l_key() {
        let json = serde_json::to_value(RougeScores::default()).unwrap();
        assert!(json.get("rougeL").is_some());
        assert!(json.get("rouge_l").is_none());
    }
}
