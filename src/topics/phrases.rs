// Noun-phrase candidate extraction and TF-IDF ranking.
//
// Candidate spans are maximal runs of content tokens between stop words and
// sentence punctuation — the classic stop-word-delimited approximation of
// noun chunks. Each candidate is then treated as its own document for
// TF-IDF weighting, so phrases built from distinctive vocabulary outrank
// phrases built from filler that merely slipped past the stop list.

use std::collections::{HashMap, HashSet};

use keyword_extraction::tf_idf::{TfIdf, TfIdfParams};
use regex_lite::Regex;
use stop_words::{get, LANGUAGE};
use tracing::debug;

use crate::error::{PipelineError, Result};

/// Extracts ranked multi-word candidate phrases from raw document text.
pub struct PhraseExtractor {
    stop_words: Vec<String>,
    stop_set: HashSet<String>,
    segment_re: Regex,
}

impl PhraseExtractor {
    pub fn new() -> Result<Self> {
        // Sentence punctuation and brackets end a candidate span.
        let segment_re = Regex::new(r#"[.,;:!?()\[\]{}<>"'`|/\\\n\r]+"#)
            .map_err(|e| PipelineError::Extraction(format!("tokenizer failed to build: {e}")))?;

        let stop_words: Vec<String> = get(LANGUAGE::English);
        let stop_set = stop_words.iter().map(|w| w.to_lowercase()).collect();

        Ok(Self {
            stop_words,
            stop_set,
            segment_re,
        })
    }

    /// Extract up to `top_n` candidate phrases, highest TF-IDF weight first.
    ///
    /// Empty or phrase-free text returns an empty vector — that is a benign
    /// outcome, not an error. Ties keep discovery order, so identical input
    /// always produces identical output.
    pub fn extract(&self, text: &str, top_n: usize) -> Result<Vec<String>> {
        if top_n == 0 || text.trim().is_empty() {
            return Ok(Vec::new());
        }

        let candidates = self.candidate_phrases(text);
        if candidates.is_empty() {
            return Ok(Vec::new());
        }

        // TF-IDF over the candidate set, each candidate as one document.
        let params = TfIdfParams::UnprocessedDocuments(&candidates, &self.stop_words, None);
        let tfidf = TfIdf::new(params);

        let vocab_size = candidates
            .iter()
            .flat_map(|p| p.split_whitespace())
            .collect::<HashSet<_>>()
            .len();
        let word_scores: HashMap<String, f32> = tfidf
            .get_ranked_word_scores(vocab_size)
            .into_iter()
            .collect();

        // A phrase scores the sum of its tokens' weights.
        let mut scored: Vec<(String, f32)> = candidates
            .into_iter()
            .map(|phrase| {
                let score = phrase
                    .split_whitespace()
                    .map(|t| word_scores.get(t).copied().unwrap_or(0.0))
                    .sum();
                (phrase, score)
            })
            .collect();

        // Stable sort: equal scores keep discovery order.
        scored.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));

        debug!(
            candidates = scored.len(),
            kept = scored.len().min(top_n),
            "ranked candidate phrases"
        );

        Ok(scored
            .into_iter()
            .take(top_n)
            .map(|(phrase, _)| phrase)
            .collect())
    }

    /// Multi-word spans between stop words and punctuation, deduplicated by
    /// exact string in first-discovery order.
    fn candidate_phrases(&self, text: &str) -> Vec<String> {
        let mut seen = HashSet::new();
        let mut phrases = Vec::new();

        for segment in self.segment_re.split(text) {
            let mut run: Vec<String> = Vec::new();
            for raw in segment.split_whitespace() {
                let token = normalize_token(raw);
                if self.breaks_run(&token) {
                    flush_run(&mut run, &mut seen, &mut phrases);
                } else {
                    run.push(token);
                }
            }
            flush_run(&mut run, &mut seen, &mut phrases);
        }

        phrases
    }

    fn breaks_run(&self, token: &str) -> bool {
        token.len() < 2
            || self.stop_set.contains(token)
            || !token.chars().any(|c| c.is_alphabetic())
    }
}

fn normalize_token(raw: &str) -> String {
    raw.trim_matches(|c: char| !c.is_alphanumeric()).to_lowercase()
}

/// A run of 2+ content tokens becomes a candidate phrase.
fn flush_run(run: &mut Vec<String>, seen: &mut HashSet<String>, phrases: &mut Vec<String>) {
    if run.len() > 1 {
        let phrase = run.join(" ");
        if seen.insert(phrase.clone()) {
            phrases.push(phrase);
        }
    }
    run.clear();
}

#[cfg(test)]
mod tests {
    use super::*;

    fn extractor() -> PhraseExtractor {
        PhraseExtractor::new().unwrap()
    }

    #[test]
    fn test_extracts_multi_word_spans() {
        let text = "The topic model is a tool, and the neural network improves it.";
        let phrases = extractor().candidate_phrases(text);
        assert!(phrases.contains(&"topic model".to_string()), "{phrases:?}");
        assert!(phrases.contains(&"neural network improves".to_string()), "{phrases:?}");
    }

    #[test]
    fn test_single_tokens_are_not_candidates() {
        let text = "Learning is the process.";
        let phrases = extractor().candidate_phrases(text);
        assert!(phrases.is_empty(), "{phrases:?}");
    }

    #[test]
    fn test_punctuation_breaks_spans() {
        let text = "gradient descent, stochastic optimization";
        let phrases = extractor().candidate_phrases(text);
        assert_eq!(
            phrases,
            vec![
                "gradient descent".to_string(),
                "stochastic optimization".to_string()
            ]
        );
    }

    #[test]
    fn test_duplicates_collapse_in_discovery_order() {
        let text = "neural network. deep model. neural network.";
        let phrases = extractor().candidate_phrases(text);
        assert_eq!(
            phrases,
            vec!["neural network".to_string(), "deep model".to_string()]
        );
    }

    #[test]
    fn test_empty_text_is_empty_ok() {
        let result = extractor().extract("", 100).unwrap();
        assert!(result.is_empty());
        let result = extractor().extract("   \n\t ", 100).unwrap();
        assert!(result.is_empty());
    }

    #[test]
    fn test_top_n_zero_returns_empty() {
        let result = extractor()
            .extract("neural network training improves accuracy", 0)
            .unwrap();
        assert!(result.is_empty());
    }

    #[test]
    fn test_respects_top_n() {
        let text = "neural network training. gradient descent optimization. \
                    convolutional layer design. recurrent sequence modeling.";
        let result = extractor().extract(text, 2).unwrap();
        assert_eq!(result.len(), 2);
    }

    #[test]
    fn test_extraction_is_deterministic() {
        let text = "topic model inference. latent variable estimation. \
                    topic model inference. posterior sampling scheme.";
        let a = extractor().extract(text, 10).unwrap();
        let b = extractor().extract(text, 10).unwrap();
        assert_eq!(a, b);
    }
}
