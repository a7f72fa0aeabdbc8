// Knowledge-graph service integration.

pub mod client;
