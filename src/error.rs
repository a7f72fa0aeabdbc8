// Typed errors for the phrase -> topic -> question pipeline.
//
// The four kinds map onto the pipeline stages so callers can tell a benign
// empty result (which is Ok) apart from a genuine failure, and can decide
// which failures are worth retrying. Adapters outside the core (graph
// service, document store) stay on anyhow.

use std::time::Duration;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, PipelineError>;

#[derive(Error, Debug)]
pub enum PipelineError {
    /// The tokenizer could not be built or could not process the input.
    /// Empty or short input is NOT an extraction error.
    #[error("phrase extraction failed: {0}")]
    Extraction(String),

    /// The topic model had nothing to fit (empty phrase set, no vocabulary
    /// after filtering) or the sampler diverged.
    #[error("topic model fit failed: {0}")]
    ModelFit(String),

    /// The remote text-generation call failed. Carries the total number of
    /// attempts made and the last underlying cause.
    #[error("question generation failed after {attempts} attempt(s): {source}")]
    Generation { attempts: u32, source: anyhow::Error },

    /// The caller's deadline for the whole pipeline run elapsed.
    #[error("pipeline deadline of {0:?} exceeded")]
    Timeout(Duration),
}

impl PipelineError {
    /// The pipeline stage this error originated from, for log context and
    /// service-level error mapping.
    pub fn stage(&self) -> &'static str {
        match self {
            PipelineError::Extraction(_) => "phrase-extraction",
            PipelineError::ModelFit(_) => "topic-model",
            PipelineError::Generation { .. } => "question-generation",
            PipelineError::Timeout(_) => "pipeline",
        }
    }
}
