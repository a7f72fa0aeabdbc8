// Latent Dirichlet Allocation over candidate phrases.
//
// Each phrase is one bag-of-words observation. The model is fit by
// collapsed Gibbs sampling with a seeded RNG, so identical phrases, topic
// count, and seed reproduce bit-identical topic term lists. The sampler is
// deliberately plain: the phrase sets here are small (thousands of short
// phrases at most) and a fixed sweep count converges well before it ends.

use std::collections::{HashMap, HashSet};

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use stop_words::{get, LANGUAGE};
use tracing::debug;

use crate::error::{PipelineError, Result};

/// Default random seed for reproducible fits.
pub const DEFAULT_SEED: u64 = 42;

/// Gibbs sweeps per fit.
const SWEEPS: usize = 100;

/// Configuration for one topic model fit.
pub struct TopicModel {
    num_topics: usize,
    seed: u64,
}

impl TopicModel {
    pub fn new(num_topics: usize) -> Self {
        Self {
            num_topics: num_topics.max(1),
            seed: DEFAULT_SEED,
        }
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Fit the model over the phrase set.
    ///
    /// Fails on an empty phrase set or when no vocabulary survives stop-word
    /// filtering; a vocabulary smaller than the topic count still fits
    /// (degenerate topics are a quality observation, not an error).
    pub fn fit(&self, phrases: &[String]) -> Result<FittedTopicModel> {
        if phrases.is_empty() {
            return Err(PipelineError::ModelFit(
                "the phrase set is empty — supply at least one phrase".to_string(),
            ));
        }

        let (vocab, docs) = build_vocabulary(phrases);
        if vocab.is_empty() {
            return Err(PipelineError::ModelFit(
                "no vocabulary survives tokenization — the phrases contain only stop words"
                    .to_string(),
            ));
        }

        let k = self.num_topics;
        let v = vocab.len();
        // Symmetric 1/K priors. Phrases are tiny documents, so a small
        // document-topic prior keeps each phrase's tokens coupled to the
        // same topic instead of drowning the count signal.
        let alpha = 1.0 / k as f64;
        let beta = 1.0 / k as f64;

        let mut rng = StdRng::seed_from_u64(self.seed);

        let mut doc_topic = vec![vec![0.0f64; k]; docs.len()];
        let mut topic_term = vec![vec![0.0f64; v]; k];
        let mut topic_total = vec![0.0f64; k];

        // Random initial assignment, then resample every token each sweep.
        let mut assignments: Vec<Vec<usize>> = Vec::with_capacity(docs.len());
        for (d, doc) in docs.iter().enumerate() {
            let mut z_doc = Vec::with_capacity(doc.len());
            for &w in doc {
                let z = rng.random_range(0..k);
                doc_topic[d][z] += 1.0;
                topic_term[z][w] += 1.0;
                topic_total[z] += 1.0;
                z_doc.push(z);
            }
            assignments.push(z_doc);
        }

        let mut weights = vec![0.0f64; k];
        for _ in 0..SWEEPS {
            for (d, doc) in docs.iter().enumerate() {
                for (i, &w) in doc.iter().enumerate() {
                    let z_old = assignments[d][i];
                    doc_topic[d][z_old] -= 1.0;
                    topic_term[z_old][w] -= 1.0;
                    topic_total[z_old] -= 1.0;

                    let mut total = 0.0;
                    for (t, weight) in weights.iter_mut().enumerate() {
                        *weight = (topic_term[t][w] + beta) / (topic_total[t] + beta * v as f64)
                            * (doc_topic[d][t] + alpha);
                        total += *weight;
                    }
                    if !total.is_finite() || total <= 0.0 {
                        return Err(PipelineError::ModelFit(
                            "sampling weights diverged — the input is numerically singular"
                                .to_string(),
                        ));
                    }

                    let mut target = rng.random::<f64>() * total;
                    let mut z_new = k - 1;
                    for (t, weight) in weights.iter().enumerate() {
                        target -= weight;
                        if target <= 0.0 {
                            z_new = t;
                            break;
                        }
                    }

                    assignments[d][i] = z_new;
                    doc_topic[d][z_new] += 1.0;
                    topic_term[z_new][w] += 1.0;
                    topic_total[z_new] += 1.0;
                }
            }
        }

        debug!(
            topics = k,
            vocabulary = v,
            observations = docs.len(),
            "fitted topic model"
        );

        Ok(FittedTopicModel { vocab, topic_term })
    }
}

/// A fitted model: per-topic term weights over the discovered vocabulary.
pub struct FittedTopicModel {
    vocab: Vec<String>,
    topic_term: Vec<Vec<f64>>,
}

impl FittedTopicModel {
    pub fn num_topics(&self) -> usize {
        self.topic_term.len()
    }

    pub fn vocab_size(&self) -> usize {
        self.vocab.len()
    }

    /// Per topic, the vocabulary sorted by topic weight descending,
    /// truncated to `per_topic` terms. Equal weights keep vocabulary
    /// discovery order (stable sort), so the output is deterministic.
    pub fn top_terms(&self, per_topic: usize) -> Vec<Vec<String>> {
        self.topic_term
            .iter()
            .map(|counts| {
                let mut order: Vec<usize> = (0..self.vocab.len()).collect();
                order.sort_by(|&a, &b| {
                    counts[b]
                        .partial_cmp(&counts[a])
                        .unwrap_or(std::cmp::Ordering::Equal)
                });
                order
                    .into_iter()
                    .take(per_topic)
                    .map(|i| self.vocab[i].clone())
                    .collect()
            })
            .collect()
    }
}

/// Tokenize phrases into vocabulary ids, first-occurrence order.
/// Stop words and tokens without alphabetic characters are dropped.
fn build_vocabulary(phrases: &[String]) -> (Vec<String>, Vec<Vec<usize>>) {
    let stop_set: HashSet<String> = get(LANGUAGE::English).into_iter().collect();

    let mut vocab: Vec<String> = Vec::new();
    let mut ids: HashMap<String, usize> = HashMap::new();
    let mut docs: Vec<Vec<usize>> = Vec::with_capacity(phrases.len());

    for phrase in phrases {
        let mut doc = Vec::new();
        for raw in phrase.split_whitespace() {
            let token: String = raw
                .trim_matches(|c: char| !c.is_alphanumeric())
                .to_lowercase();
            if token.len() < 2
                || stop_set.contains(&token)
                || !token.chars().any(|c| c.is_alphabetic())
            {
                continue;
            }
            let id = *ids.entry(token.clone()).or_insert_with(|| {
                vocab.push(token);
                vocab.len() - 1
            });
            doc.push(id);
        }
        docs.push(doc);
    }

    (vocab, docs)
}
