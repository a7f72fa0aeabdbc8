// Seed-question generation for one topic.
//
// One remote request per topic. Retrying is deliberately left to the
// caller — each request is billable, and only the orchestrator knows how
// many attempts a run can afford.

use tracing::debug;

use super::traits::{Prompt, TextGenerator};
use crate::error::{PipelineError, Result};

const SYSTEM_PROMPT: &str = "You are an expert in ontology creation for knowledge graphs. \
     You take a bunch of phrases, and you generate good questions that can act as a seed \
     for generating and populating information in a knowledge graph based on phrases provided.";

/// Converts a topic's representative phrases into ontology-seeding questions.
pub struct QuestionGenerator<'a> {
    generator: &'a dyn TextGenerator,
}

impl<'a> QuestionGenerator<'a> {
    pub fn new(generator: &'a dyn TextGenerator) -> Self {
        Self { generator }
    }

    /// Generate seed questions for one topic.
    ///
    /// An empty phrase list returns an empty result without spending a
    /// remote call. Question order follows line order in the completion.
    pub async fn generate(&self, topic_phrases: &[String]) -> Result<Vec<String>> {
        if topic_phrases.is_empty() {
            return Ok(Vec::new());
        }

        let prompt = build_prompt(topic_phrases);
        let completion = self
            .generator
            .complete(&prompt)
            .await
            .map_err(|source| PipelineError::Generation { attempts: 1, source })?;

        let questions = parse_questions(&completion);
        debug!(
            phrases = topic_phrases.len(),
            questions = questions.len(),
            "parsed generated questions"
        );
        Ok(questions)
    }
}

fn build_prompt(phrases: &[String]) -> Prompt {
    Prompt {
        system: SYSTEM_PROMPT.to_string(),
        user: format!(
            "Generate a list of specific, high-quality questions to create seed questions \
             for an ontology for a knowledge graph from the following key phrases: {}",
            phrases.join(", ")
        ),
    }
}

/// One question per line, trimmed, blank lines dropped, order preserved.
fn parse_questions(completion: &str) -> Vec<String> {
    completion
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(String::from)
        .collect()
}
