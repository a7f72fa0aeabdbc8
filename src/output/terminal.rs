// Terminal rendering of pipeline results and graph query responses.

use colored::Colorize;
use serde_json::Value;

use crate::output::truncate_chars;
use crate::topics::pipeline::PipelineResult;

/// Display topics and their generated seed questions.
pub fn display_pipeline_result(result: &PipelineResult) {
    if result.topics.is_empty() {
        println!(
            "\n{}",
            "No topics found — the documents yielded no candidate phrases.".dimmed()
        );
        return;
    }

    println!(
        "\n{}",
        format!("=== Topics ({}) ===", result.topics.len()).bold()
    );
    for (i, topic) in result.topics.iter().enumerate() {
        println!("\n  {:>2}. {}", i + 1, format!("Topic {}", i + 1).bold());
        let phrases = topic.join(", ");
        println!("      {}", truncate_chars(&phrases, 160).dimmed());
    }

    if result.questions.is_empty() {
        println!("\n{}", "No questions were generated.".dimmed());
        return;
    }

    println!(
        "\n{}",
        format!("=== Seed questions ({}) ===", result.questions.len()).bold()
    );
    for (i, question) in result.questions.iter().enumerate() {
        println!("  {:>2}. {}", i + 1, question);
    }
    println!();
}

/// Pretty-print an opaque graph query response.
pub fn display_query_response(response: &Value) {
    println!("\n{}", "=== Query response ===".bold());
    match serde_json::to_string_pretty(response) {
        Ok(text) => println!("{text}"),
        Err(_) => println!("{response}"),
    }
}
