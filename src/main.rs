use std::time::Duration;

use anyhow::Result;
use clap::{Parser, Subcommand};
use colored::Colorize;
use tracing::info;

use graphseed::config::Config;
use graphseed::documents::DocumentStore;
use graphseed::generate::openai::OpenAiGenerator;
use graphseed::graph::client::GraphStoreClient;
use graphseed::topics::pipeline::{FailurePolicy, PipelineOptions, TopicPipeline};

/// Graphseed: topic-seeded knowledge graph construction.
///
/// Extracts salient phrases from scientific documents, reduces them to
/// latent topics, seeds natural-language questions from each topic, and
/// hands questions plus documents to a knowledge-graph service.
#[derive(Parser)]
#[command(name = "graphseed", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize the data directory
    Init,

    /// Run the topic pipeline over stored documents and print the results
    Extract {
        /// Document file names inside the data directory
        #[arg(required = true)]
        files: Vec<String>,

        /// Feed the combined text to the topic model without phrase extraction
        #[arg(long)]
        raw: bool,

        /// Number of latent topics to model
        #[arg(long, default_value = "1")]
        topics: usize,

        /// Representative phrases kept per topic
        #[arg(long, default_value = "20")]
        phrases_per_topic: usize,

        /// Candidate phrase cap before topic modeling
        #[arg(long, default_value = "3000")]
        phrase_limit: usize,

        /// Continue past topics whose question generation keeps failing
        #[arg(long)]
        skip_failed_topics: bool,
    },

    /// Build a knowledge graph from stored documents
    CreateGraph {
        /// Graph service namespace
        namespace: String,

        /// Document file names inside the data directory
        #[arg(required = true)]
        files: Vec<String>,

        /// Number of latent topics to model
        #[arg(long, default_value = "1")]
        topics: usize,

        /// Poll until the graph build finishes (bounded, not a blind sleep)
        #[arg(long)]
        wait: bool,
    },

    /// Query a built graph in natural language
    Query {
        /// Graph service namespace
        namespace: String,

        /// The question to ask
        question: String,
    },

    /// Start the HTTP API server
    #[cfg(feature = "web")]
    Serve {
        /// Port to listen on
        #[arg(long, default_value = "8000")]
        port: u16,

        /// Address to bind
        #[arg(long, default_value = "0.0.0.0")]
        bind: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present (silently ignore if missing)
    let _ = dotenvy::dotenv();

    // Set up structured logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("graphseed=info")),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Init => {
            let config = Config::load()?;
            let store = DocumentStore::new(&config.data_dir);
            store.init().await?;
            println!("Data directory ready at: {}", config.data_dir);
            println!("\nGraphseed is ready. Next step: set up your .env file");
            println!("  (see .env.example for required variables)");
            println!("\nThen add extracted document text to the data directory and run:");
            println!("  cargo run -- extract <file.txt>");
        }

        Commands::Extract {
            files,
            raw,
            topics,
            phrases_per_topic,
            phrase_limit,
            skip_failed_topics,
        } => {
            let config = Config::load()?;
            config.require_generator()?;
            let store = DocumentStore::new(&config.data_dir);

            let combined_text = store.combined_text(&files).await?;
            println!(
                "Running the topic pipeline over {} document(s)...",
                files.len()
            );

            let generator = OpenAiGenerator::new(
                &config.openai_api_url,
                &config.openai_api_key,
                &config.openai_model,
            )?;
            let pipeline = TopicPipeline::new(&generator)?;
            let options = PipelineOptions {
                use_raw_text: raw,
                topic_count: topics,
                phrases_per_topic,
                phrase_limit,
                failure_policy: if skip_failed_topics {
                    FailurePolicy::SkipTopic
                } else {
                    FailurePolicy::Abort
                },
                ..Default::default()
            };

            let result = pipeline.run(&combined_text, &options).await?;
            graphseed::output::terminal::display_pipeline_result(&result);
        }

        Commands::CreateGraph {
            namespace,
            files,
            topics,
            wait,
        } => {
            let config = Config::load()?;
            config.require_generator()?;
            config.require_graph()?;
            let store = DocumentStore::new(&config.data_dir);
            let graph = GraphStoreClient::new(&config.graph_api_url, &config.graph_api_key)?;

            let combined_text = store.combined_text(&files).await?;
            println!("Extracting topics and seed questions...");

            let generator = OpenAiGenerator::new(
                &config.openai_api_url,
                &config.openai_api_key,
                &config.openai_model,
            )?;
            let pipeline = TopicPipeline::new(&generator)?;
            let options = PipelineOptions {
                topic_count: topics,
                ..Default::default()
            };
            let result = pipeline.run(&combined_text, &options).await?;
            graphseed::output::terminal::display_pipeline_result(&result);

            if result.questions.is_empty() {
                println!(
                    "{}",
                    "No seed questions were produced — nothing to build a graph from.".yellow()
                );
                return Ok(());
            }

            println!("Uploading {} document(s) to namespace '{namespace}'...", files.len());
            let mut paths = Vec::with_capacity(files.len());
            for name in &files {
                paths.push(store.resolve(name)?);
            }
            graph.add_documents(&namespace, &paths).await?;

            println!("Requesting graph construction...");
            let extracted_graph = graph
                .create_graph_with_retry(&namespace, &result.questions)
                .await?;
            info!(namespace = %namespace, "graph creation accepted");
            println!("{}", "Graph creation accepted.".bold());

            if wait {
                let spinner = indicatif::ProgressBar::new_spinner();
                spinner.set_message("Waiting for the graph build...");
                spinner.enable_steady_tick(Duration::from_millis(120));

                graph
                    .wait_until_ready(&namespace, Duration::from_secs(5), Duration::from_secs(300))
                    .await?;

                spinner.finish_with_message("Graph is ready.");
            }

            println!(
                "\n{}",
                format!("Graph response: {extracted_graph}").dimmed()
            );
            println!("Query it with: cargo run -- query {namespace} \"<your question>\"");
        }

        Commands::Query {
            namespace,
            question,
        } => {
            let config = Config::load()?;
            config.require_graph()?;
            let graph = GraphStoreClient::new(&config.graph_api_url, &config.graph_api_key)?;

            println!("Querying namespace '{namespace}'...");
            let response = graph.query_graph(&namespace, &question).await?;
            graphseed::output::terminal::display_query_response(&response);
        }

        #[cfg(feature = "web")]
        Commands::Serve { port, bind } => {
            let config = Config::load()?;
            graphseed::web::run_server(config, port, &bind).await?;
        }
    }

    Ok(())
}
