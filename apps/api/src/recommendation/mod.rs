// Recommendation pipeline: prompt building, the generation call and response parsing.
// All LLM calls go through llm_client; this module only sees the GenerationBackend trait.

pub mod format;
pub mod handlers;
pub mod heuristics;
pub mod parser;
pub mod pipeline;
pub mod prompt_builder;
pub mod prompts;
