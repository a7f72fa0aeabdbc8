// Graphseed: topic-seeded knowledge graph construction.
//
// This is the library root. Each module corresponds to a major subsystem:
// the phrase/topic/question pipeline, the generative-text and graph-service
// clients, the document store, and the optional web layer.

pub mod config;
pub mod documents;
pub mod error;
pub mod generate;
pub mod graph;
pub mod output;
pub mod topics;

#[cfg(feature = "web")]
pub mod web;
