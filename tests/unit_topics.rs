// Unit tests for phrase extraction and topic modeling invariants.
//
// Pure-function properties only: no network, no filesystem. Question
// generation and pipeline flows live in tests/composition.rs.

use graphseed::error::PipelineError;
use graphseed::topics::model::TopicModel;
use graphseed::topics::phrases::PhraseExtractor;

fn extractor() -> PhraseExtractor {
    PhraseExtractor::new().unwrap()
}

fn sample_text() -> &'static str {
    "Topic models describe latent structure in document collections. \
     A topic model assigns probability mass to vocabulary terms, and \
     posterior inference recovers latent structure from sparse counts. \
     Gibbs sampling is a standard inference scheme; variational inference \
     is the common alternative. Document collections with shared vocabulary \
     terms produce overlapping topics, while disjoint vocabulary terms \
     produce separated topics."
}

// ============================================================
// PhraseExtractor — invariant properties
// ============================================================

#[test]
fn extract_returns_at_most_n_items() {
    for n in [0, 1, 3, 100] {
        let phrases = extractor().extract(sample_text(), n).unwrap();
        assert!(
            phrases.len() <= n,
            "asked for {n}, got {} phrases",
            phrases.len()
        );
    }
}

#[test]
fn extract_has_no_duplicates() {
    let phrases = extractor().extract(sample_text(), 100).unwrap();
    let mut unique = phrases.clone();
    unique.sort();
    unique.dedup();
    assert_eq!(unique.len(), phrases.len(), "duplicate phrase in {phrases:?}");
}

#[test]
fn extract_phrases_are_drawn_from_the_text() {
    let text = sample_text().to_lowercase();
    let phrases = extractor().extract(sample_text(), 100).unwrap();
    assert!(!phrases.is_empty());
    for phrase in &phrases {
        for token in phrase.split_whitespace() {
            assert!(
                text.contains(token),
                "token {token} of phrase {phrase:?} not present in the input"
            );
        }
    }
}

#[test]
fn extract_phrases_are_multi_word() {
    let phrases = extractor().extract(sample_text(), 100).unwrap();
    for phrase in &phrases {
        assert!(
            phrase.split_whitespace().count() > 1,
            "single-token candidate {phrase:?}"
        );
    }
}

#[test]
fn extract_empty_text_returns_empty_for_any_n() {
    for n in [0, 1, 100] {
        assert!(extractor().extract("", n).unwrap().is_empty());
    }
}

#[test]
fn extract_is_deterministic() {
    let a = extractor().extract(sample_text(), 50).unwrap();
    let b = extractor().extract(sample_text(), 50).unwrap();
    assert_eq!(a, b, "identical input must produce identical ranking");
}

// ============================================================
// TopicModel — determinism and error cases
// ============================================================

#[test]
fn fit_empty_phrase_set_errors_for_any_topic_count() {
    for k in 1..=4 {
        let result = TopicModel::new(k).fit(&[]);
        assert!(
            matches!(result, Err(PipelineError::ModelFit(_))),
            "empty fit with k={k} must be a model-fit error"
        );
    }
}

#[test]
fn fit_is_bit_identical_across_repeated_calls() {
    let phrases: Vec<String> = [
        "latent topic structure",
        "posterior inference scheme",
        "sparse count matrix",
        "vocabulary probability mass",
        "latent topic inference",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect();

    let a = TopicModel::new(3).fit(&phrases).unwrap().top_terms(10);
    let b = TopicModel::new(3).fit(&phrases).unwrap().top_terms(10);
    assert_eq!(a, b, "same phrases, topic count, and seed must reproduce exactly");
}

#[test]
fn two_vocabulary_corpus_separates_with_two_topics() {
    // Two fully disjoint vocabularies, each repeated with strong internal
    // co-occurrence. A two-topic fit must put their top terms in
    // different vocabularies.
    let mut phrases = Vec::new();
    for _ in 0..15 {
        phrases.push("machine learning neural network training".to_string());
        phrases.push("neural network deep learning models".to_string());
    }
    for _ in 0..15 {
        phrases.push("stock market interest rate trading".to_string());
        phrases.push("interest rate inflation market prices".to_string());
    }

    let ml_vocab = [
        "machine", "learning", "neural", "network", "training", "deep", "models",
    ];
    let finance_vocab = [
        "stock", "market", "interest", "rate", "trading", "inflation", "prices",
    ];

    let topics = TopicModel::new(2).fit(&phrases).unwrap().top_terms(5);
    assert_eq!(topics.len(), 2);

    let top_a = topics[0][0].as_str();
    let top_b = topics[1][0].as_str();
    assert_ne!(top_a, top_b, "the two topics share a top phrase");

    let a_is_ml = ml_vocab.contains(&top_a);
    let b_is_ml = ml_vocab.contains(&top_b);
    assert!(
        ml_vocab.contains(&top_a) || finance_vocab.contains(&top_a),
        "unexpected term {top_a}"
    );
    assert!(
        ml_vocab.contains(&top_b) || finance_vocab.contains(&top_b),
        "unexpected term {top_b}"
    );
    assert_ne!(
        a_is_ml, b_is_ml,
        "topics failed to separate the vocabularies: {topics:?}"
    );
}

#[test]
fn top_terms_respects_per_topic_bound() {
    let phrases: Vec<String> = ["latent topic structure inference sampling scheme"]
        .iter()
        .map(|s| s.to_string())
        .collect();
    let fitted = TopicModel::new(2).fit(&phrases).unwrap();
    for topic in fitted.top_terms(3) {
        assert!(topic.len() <= 3);
    }
}
