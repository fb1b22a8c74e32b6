//! Tokenizers for the lexical metrics.

use regex::Regex;
use rust_stemmers::{Algorithm, Stemmer};
use std::sync::OnceLock;

/// Porter stemmer for English text
static STEMMER: OnceLock<Stemmer> = OnceLock::new();

static WORD_TOKENIZER: OnceLock<Option<Regex>> = OnceLock::new();
static WORD_FALLBACK: OnceLock<Option<Regex>> = OnceLock::new();
static TOKENIZER_13A: OnceLock<Option<[(Regex, &'static str); 4]>> = OnceLock::new();

fn get_stemmer() -> &'static Stemmer {
    STEMMER.get_or_init(|| Stemmer::create(Algorithm::English))
}

fn compile(pattern: &str) -> Option<Regex> {
    match Regex::new(pattern) {
        Ok(re) => Some(re),
        Err(e) => {
            tracing::warn!(pattern, error = %e, "tokenizer pattern failed to compile");
            None
        }
    }
}

/// Tokenize for ROUGE: lowercase, every run of characters outside
/// `[a-z0-9]` is a separator, tokens longer than three characters are stemmed
/// when `stem` is set.
pub fn rouge_tokens(text: &str, stem: bool) -> Vec<String> {
    let lowered = text.to_lowercase();
    let stemmer = get_stemmer();

    lowered
        .split(|c: char| !(c.is_ascii_lowercase() || c.is_ascii_digit()))
        .filter(|s| !s.is_empty())
        .map(|s| {
            if stem && s.len() > 3 {
                stemmer.stem(s).into_owned()
            } else {
                s.to_string()
            }
        })
        .collect()
}

/// Contraction suffixes split off a word, Treebank style.
const CONTRACTIONS: [&str; 7] = ["n't", "'ll", "'re", "'ve", "'s", "'m", "'d"];

/// Split a trailing contraction: `it's` becomes `it` and `'s`, `can't`
/// becomes `ca` and `n't`.
fn split_contraction(word: &str) -> Vec<String> {
    for suffix in CONTRACTIONS {
        if let Some(stem) = word.strip_suffix(suffix) {
            if !stem.is_empty() {
                return vec![stem.to_string(), suffix.to_string()];
            }
        }
    }
    vec![word.to_string()]
}

/// Primary BLEU tokenizer: words (with inner hyphens), contractions split
/// off, and individual punctuation marks, case-folded.
///
/// Returns `None` when the tokenizer is unavailable.
pub fn word_tokenize(text: &str) -> Option<Vec<String>> {
    let re = WORD_TOKENIZER
        .get_or_init(|| compile(r"\w+(?:[-']\w+)*|[^\w\s]"))
        .as_ref()?;
    let lowered = text.to_lowercase();
    Some(
        re.find_iter(&lowered)
            .flat_map(|m| split_contraction(m.as_str()))
            .collect(),
    )
}

/// Fallback BLEU tokenizer: plain `\w+` runs, case-folded.
pub fn regex_words(text: &str) -> Vec<String> {
    let lowered = text.to_lowercase();
    match WORD_FALLBACK.get_or_init(|| compile(r"\w+")) {
        Some(re) => re.find_iter(&lowered).map(|m| m.as_str().to_string()).collect(),
        None => lowered
            .split(|c: char| !c.is_alphanumeric() && c != '_')
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect(),
    }
}

/// BLEU tokens with the primary tokenizer, falling back to [`regex_words`].
pub fn bleu_tokens(text: &str) -> Vec<String> {
    tokens_or_fallback(word_tokenize(text), text)
}

fn tokens_or_fallback(primary: Option<Vec<String>>, text: &str) -> Vec<String> {
    primary.unwrap_or_else(|| {
        tracing::debug!("primary word tokenizer unavailable, using regex fallback");
        regex_words(text)
    })
}

/// The `13a` (mteval-v13a) tokenization applied by sentence BLEU.
pub fn tokenize_13a(line: &str) -> Option<Vec<String>> {
    let rules = TOKENIZER_13A
        .get_or_init(|| {
            Some([
                // punctuation except apostrophe
                (compile(r"([\{-~\[-`\x20-&\(-\+:-@/])")?, " $1 "),
                // period and comma unless preceded by a digit
                (compile(r"([^0-9])([\.,])")?, "$1 $2 "),
                // period and comma unless followed by a digit
                (compile(r"([\.,])([^0-9])")?, " $1 $2"),
                // dash preceded by a digit
                (compile(r"([0-9])(-)")?, "$1 $2 "),
            ])
        })
        .as_ref()?;

    let mut line = line
        .replace("<skipped>", "")
        .replace("-\n", "")
        .replace('\n', " ");
    if line.contains('&') {
        line = line
            .replace("&quot;", "\"")
            .replace("&amp;", "&")
            .replace("&lt;", "<")
            .replace("&gt;", ">");
    }

    let mut line = format!(" {} ", line);
    for (re, replacement) in rules {
        line = re.replace_all(&line, *replacement).into_owned();
    }

    Some(line.split_whitespace().map(str::to_string).collect())
}
