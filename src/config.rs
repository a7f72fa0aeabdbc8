use std::env;

use anyhow::Result;

/// Default chat model for question generation.
pub const DEFAULT_MODEL: &str = "gpt-3.5-turbo";

/// Default OpenAI-compatible API endpoint.
pub const DEFAULT_OPENAI_API_URL: &str = "https://api.openai.com/v1";

/// Central configuration loaded from environment variables.
///
/// All secrets come from env vars (never hardcoded). The .env file
/// is loaded automatically at startup via dotenvy.
pub struct Config {
    /// Base URL of the knowledge-graph service API.
    pub graph_api_url: String,
    /// API key for the knowledge-graph service.
    pub graph_api_key: String,
    /// API key for the text-generation service.
    pub openai_api_key: String,
    /// OpenAI-compatible endpoint (defaults to the public OpenAI API).
    pub openai_api_url: String,
    /// Chat model used for question generation.
    pub openai_model: String,
    /// Directory holding uploaded documents and their extracted text.
    pub data_dir: String,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// Only data_dir and the OpenAI endpoint/model have defaults — API keys
    /// are required for anything beyond `init` and local extraction tests.
    pub fn load() -> Result<Self> {
        Ok(Self {
            graph_api_url: env::var("GRAPH_API_URL").unwrap_or_default(),
            graph_api_key: env::var("GRAPH_API_KEY").unwrap_or_default(),
            openai_api_key: env::var("OPENAI_API_KEY").unwrap_or_default(),
            openai_api_url: env::var("OPENAI_API_URL")
                .unwrap_or_else(|_| DEFAULT_OPENAI_API_URL.to_string()),
            openai_model: env::var("OPENAI_MODEL").unwrap_or_else(|_| DEFAULT_MODEL.to_string()),
            data_dir: env::var("GRAPHSEED_DATA_DIR").unwrap_or_else(|_| "./data".to_string()),
        })
    }

    /// Check that the text-generation credentials are configured.
    /// Call this before any operation that generates questions.
    pub fn require_generator(&self) -> Result<()> {
        if self.openai_api_key.is_empty() {
            anyhow::bail!(
                "OPENAI_API_KEY not set. Add it to your .env file.\n\
                 See .env.example for the required variables."
            );
        }
        Ok(())
    }

    /// Check that the knowledge-graph service is configured.
    /// Call this before uploading documents or creating/querying a graph.
    pub fn require_graph(&self) -> Result<()> {
        if self.graph_api_url.is_empty() {
            anyhow::bail!(
                "GRAPH_API_URL not set. Add it to your .env file.\n\
                 See .env.example for the required variables."
            );
        }
        if self.graph_api_key.is_empty() {
            anyhow::bail!(
                "GRAPH_API_KEY not set. Add it to your .env file.\n\
                 See .env.example for the required variables."
            );
        }
        Ok(())
    }
}
