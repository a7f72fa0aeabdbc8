// Text generator trait — swap-ready abstraction.
//
// The pipeline depends only on "submit prompt, receive text" semantics, so
// any text-generation backend can be substituted without touching pipeline
// logic — including scripted doubles in tests.

use anyhow::Result;
use async_trait::async_trait;

/// A structured generation prompt: a system-role instruction plus the
/// user-role request.
#[derive(Debug, Clone)]
pub struct Prompt {
    pub system: String,
    pub user: String,
}

/// Trait for remote text generation. Implementations must be async because
/// providers require HTTP API calls.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    /// Submit one prompt and return the raw completion text.
    async fn complete(&self, prompt: &Prompt) -> Result<String>;
}
