// The phrase -> topic -> question pipeline.
//
// Strictly sequential: each stage's output is the next stage's input.
// Every run depends only on its own input text and options, so concurrent
// runs never share mutable state.

use std::time::Duration;

use serde::Serialize;
use tracing::{info, warn};

use crate::error::{PipelineError, Result};
use crate::generate::questions::QuestionGenerator;
use crate::generate::traits::TextGenerator;
use crate::topics::model::{TopicModel, DEFAULT_SEED};
use crate::topics::phrases::PhraseExtractor;

/// What to do when a topic's question generation keeps failing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailurePolicy {
    /// Abort the whole run and propagate the error (the default).
    Abort,
    /// Log the failed topic and continue with the remaining ones.
    SkipTopic,
}

/// Bounded retry for the remote generation call: `attempts` total tries,
/// delay doubling after each failed attempt.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    pub attempts: u32,
    pub base_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            attempts: 3,
            base_delay: Duration::from_secs(2),
        }
    }
}

impl RetryPolicy {
    fn delay_after(&self, attempt: u32) -> Duration {
        self.base_delay * 2u32.saturating_pow(attempt.saturating_sub(1))
    }
}

pub struct PipelineOptions {
    /// Feed `text` to the topic model verbatim, bypassing phrase extraction.
    pub use_raw_text: bool,
    /// Number of latent topics to model.
    pub topic_count: usize,
    /// Candidate phrase cap before topic modeling.
    pub phrase_limit: usize,
    /// Representative terms kept per topic.
    pub phrases_per_topic: usize,
    /// Random seed for the topic model.
    pub seed: u64,
    pub failure_policy: FailurePolicy,
    /// Bound on the whole run, remote calls included.
    pub deadline: Option<Duration>,
}

impl Default for PipelineOptions {
    fn default() -> Self {
        Self {
            use_raw_text: false,
            topic_count: 1,
            phrase_limit: 3000,
            phrases_per_topic: 20,
            seed: DEFAULT_SEED,
            failure_policy: FailurePolicy::Abort,
            deadline: None,
        }
    }
}

/// Ordered topics (each its ranked phrase list) and the flat question
/// sequence: topic order first, generation order within a topic.
#[derive(Debug, Clone, Serialize)]
pub struct PipelineResult {
    pub topics: Vec<Vec<String>>,
    pub questions: Vec<String>,
}

impl PipelineResult {
    fn empty() -> Self {
        Self {
            topics: Vec::new(),
            questions: Vec::new(),
        }
    }
}

/// Composes extraction, topic modeling, and question generation.
pub struct TopicPipeline<'a> {
    extractor: PhraseExtractor,
    generator: &'a dyn TextGenerator,
    retry: RetryPolicy,
}

impl<'a> TopicPipeline<'a> {
    pub fn new(generator: &'a dyn TextGenerator) -> Result<Self> {
        Ok(Self {
            extractor: PhraseExtractor::new()?,
            generator,
            retry: RetryPolicy::default(),
        })
    }

    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    /// Run the full pipeline over the combined document text.
    ///
    /// An empty candidate phrase set is an empty success, never an error.
    pub async fn run(&self, text: &str, options: &PipelineOptions) -> Result<PipelineResult> {
        match options.deadline {
            Some(deadline) => tokio::time::timeout(deadline, self.run_inner(text, options))
                .await
                .map_err(|_| PipelineError::Timeout(deadline))?,
            None => self.run_inner(text, options).await,
        }
    }

    async fn run_inner(&self, text: &str, options: &PipelineOptions) -> Result<PipelineResult> {
        let phrases = if options.use_raw_text {
            vec![text.to_string()]
        } else {
            self.extractor.extract(text, options.phrase_limit)?
        };

        if phrases.is_empty() {
            info!("no candidate phrases found, returning an empty result");
            return Ok(PipelineResult::empty());
        }

        info!(
            phrases = phrases.len(),
            topics = options.topic_count,
            "fitting topic model"
        );
        let fitted = TopicModel::new(options.topic_count)
            .with_seed(options.seed)
            .fit(&phrases)?;
        let topics = fitted.top_terms(options.phrases_per_topic);

        let questions_for = QuestionGenerator::new(self.generator);
        let mut questions = Vec::new();
        for (index, topic) in topics.iter().enumerate() {
            match self.generate_with_retry(&questions_for, topic).await {
                Ok(generated) => {
                    info!(
                        topic = index,
                        questions = generated.len(),
                        "generated seed questions"
                    );
                    questions.extend(generated);
                }
                Err(e) => match options.failure_policy {
                    FailurePolicy::Abort => return Err(e),
                    FailurePolicy::SkipTopic => {
                        warn!(
                            topic = index,
                            error = %e,
                            "skipping topic after exhausted generation retries"
                        );
                    }
                },
            }
        }

        Ok(PipelineResult { topics, questions })
    }

    async fn generate_with_retry(
        &self,
        questions_for: &QuestionGenerator<'_>,
        topic: &[String],
    ) -> Result<Vec<String>> {
        let attempts = self.retry.attempts.max(1);
        let mut last: Option<anyhow::Error> = None;

        for attempt in 1..=attempts {
            match questions_for.generate(topic).await {
                Ok(questions) => return Ok(questions),
                Err(PipelineError::Generation { source, .. }) => {
                    warn!(attempt, error = %source, "question generation attempt failed");
                    last = Some(source);
                    if attempt < attempts {
                        tokio::time::sleep(self.retry.delay_after(attempt)).await;
                    }
                }
                Err(other) => return Err(other),
            }
        }

        Err(PipelineError::Generation {
            attempts,
            source: last.unwrap_or_else(|| anyhow::anyhow!("no generation attempt was made")),
        })
    }
}
