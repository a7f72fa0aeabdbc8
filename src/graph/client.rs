// Knowledge-graph service client.
//
// The service is an opaque collaborator: documents go in, a graph gets
// built from seed questions, and natural-language queries come back as
// opaque JSON. The service reports creation failures in-band with a 200
// response; that distinction is made exactly once here, at the
// deserialization boundary, and surfaces as a typed outcome. Nothing
// downstream inspects raw payload keys.

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use reqwest::multipart;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tokio::time::{sleep, Instant};
use tracing::{debug, info, warn};

/// Bound on a single service request. Uploads of large documents are the
/// slowest call this client makes.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(120);

/// Bounded attempts for graph creation.
const CREATE_ATTEMPTS: u32 = 3;

/// Fixed delay between creation attempts.
const CREATE_RETRY_DELAY: Duration = Duration::from_secs(15);

/// HTTP client for the knowledge-graph service.
pub struct GraphStoreClient {
    client: Client,
    base_url: String,
    api_key: String,
}

/// Receipt for a batch of uploaded documents.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentsReceipt {
    pub namespace: String,
    #[serde(default)]
    pub documents: Vec<String>,
    /// Everything else the service reports about the upload, untouched.
    #[serde(flatten)]
    pub detail: Value,
}

/// Outcome of a single graph-construction request.
#[derive(Debug, Clone)]
pub enum GraphCreation {
    /// The service accepted the request; the payload is its opaque
    /// description of the graph under construction.
    Created(Value),
    /// The service reported an in-band failure.
    Failed { message: String },
}

/// Build state reported by the status endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GraphState {
    Pending,
    Building,
    Ready,
    Failed,
}

#[derive(Deserialize)]
struct StatusResponse {
    status: GraphState,
    #[serde(default)]
    error: Option<String>,
}

#[derive(Deserialize)]
struct CreateResponse {
    #[serde(default)]
    error: Option<String>,
    #[serde(flatten)]
    graph: Value,
}

impl GraphStoreClient {
    pub fn new(base_url: &str, api_key: &str) -> Result<Self> {
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .context("Failed to build the graph service HTTP client")?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
        })
    }

    /// Upload document files into a namespace.
    pub async fn add_documents(
        &self,
        namespace: &str,
        paths: &[PathBuf],
    ) -> Result<DocumentsReceipt> {
        let url = format!("{}/namespaces/{}/documents", self.base_url, namespace);

        let mut form = multipart::Form::new();
        for path in paths {
            let bytes = tokio::fs::read(path)
                .await
                .with_context(|| format!("Failed to read {}", path.display()))?;
            let file_name = path
                .file_name()
                .and_then(|n| n.to_str())
                .unwrap_or("document")
                .to_string();
            form = form.part("files", multipart::Part::bytes(bytes).file_name(file_name));
        }

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .multipart(form)
            .send()
            .await
            .context("Failed to upload documents to the graph service")?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            anyhow::bail!("Graph service returned {} on document upload: {}", status, body);
        }

        let receipt: DocumentsReceipt = response
            .json()
            .await
            .context("Failed to parse the document upload response")?;

        info!(
            namespace,
            documents = receipt.documents.len(),
            "documents registered with the graph service"
        );
        Ok(receipt)
    }

    /// Request graph construction from seed questions. One attempt; in-band
    /// service failures come back as `GraphCreation::Failed`, not as `Err`.
    pub async fn create_graph(
        &self,
        namespace: &str,
        questions: &[String],
    ) -> Result<GraphCreation> {
        let url = format!("{}/namespaces/{}/graph", self.base_url, namespace);

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&serde_json::json!({ "questions": questions }))
            .send()
            .await
            .context("Failed to call the graph service")?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            anyhow::bail!("Graph service returned {} on graph creation: {}", status, body);
        }

        let body: CreateResponse = response
            .json()
            .await
            .context("Failed to parse the graph creation response")?;

        Ok(match body.error {
            Some(message) => GraphCreation::Failed { message },
            None => GraphCreation::Created(body.graph),
        })
    }

    /// Graph creation with bounded retries covering both transport errors
    /// and in-band failures. Returns the accepted graph payload; when
    /// attempts run out, the last failure is surfaced.
    pub async fn create_graph_with_retry(
        &self,
        namespace: &str,
        questions: &[String],
    ) -> Result<Value> {
        let mut last_error: Option<anyhow::Error> = None;

        for attempt in 1..=CREATE_ATTEMPTS {
            match self.create_graph(namespace, questions).await {
                Ok(GraphCreation::Created(graph)) => {
                    info!(namespace, attempt, "graph creation accepted");
                    return Ok(graph);
                }
                Ok(GraphCreation::Failed { message }) => {
                    warn!(namespace, attempt, %message, "graph service reported a creation failure");
                    last_error = Some(anyhow::anyhow!("graph service failure: {message}"));
                }
                Err(e) => {
                    warn!(namespace, attempt, error = %e, "graph creation call failed");
                    last_error = Some(e);
                }
            }
            if attempt < CREATE_ATTEMPTS {
                sleep(CREATE_RETRY_DELAY).await;
            }
        }

        Err(match last_error {
            Some(e) => e.context(format!(
                "Graph creation failed after {CREATE_ATTEMPTS} attempts"
            )),
            None => anyhow::anyhow!("Graph creation failed after {CREATE_ATTEMPTS} attempts"),
        })
    }

    /// Poll build state until the graph is ready, the service reports a
    /// build failure, or the deadline elapses.
    pub async fn wait_until_ready(
        &self,
        namespace: &str,
        poll_interval: Duration,
        deadline: Duration,
    ) -> Result<GraphState> {
        let started = Instant::now();
        loop {
            let status = self.graph_status(namespace).await?;
            match status.status {
                GraphState::Ready => return Ok(GraphState::Ready),
                GraphState::Failed => {
                    anyhow::bail!(
                        "Graph build failed in the service: {}",
                        status.error.unwrap_or_else(|| "no detail given".to_string())
                    );
                }
                state => {
                    debug!(namespace, state = ?state, "graph not ready yet");
                }
            }
            if started.elapsed() >= deadline {
                anyhow::bail!("Graph was not ready within {:?}", deadline);
            }
            sleep(poll_interval).await;
        }
    }

    async fn graph_status(&self, namespace: &str) -> Result<StatusResponse> {
        let url = format!("{}/namespaces/{}/graph/status", self.base_url, namespace);
        let response = self
            .client
            .get(&url)
            .bearer_auth(&self.api_key)
            .send()
            .await
            .context("Failed to fetch graph build status")?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            anyhow::bail!("Graph service returned {} on status check: {}", status, body);
        }

        response
            .json()
            .await
            .context("Failed to parse the graph status response")
    }

    /// Natural-language query against a built graph. The response payload
    /// is passed through untouched.
    pub async fn query_graph(&self, namespace: &str, query: &str) -> Result<Value> {
        let url = format!("{}/namespaces/{}/graph/query", self.base_url, namespace);

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&serde_json::json!({ "query": query }))
            .send()
            .await
            .context("Failed to query the graph service")?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            anyhow::bail!("Graph service returned {} on query: {}", status, body);
        }

        response
            .json()
            .await
            .context("Failed to parse the graph query response")
    }
}
