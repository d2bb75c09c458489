// Generation: prompt building, provider calls, response contracts, fallbacks.
// All provider calls go through llm_client; handlers go through the orchestrator.

pub mod fallback;
pub mod handlers;
pub mod orchestrator;
pub mod prompt_builder;
pub mod prompts;
pub mod request;
pub mod schema;
