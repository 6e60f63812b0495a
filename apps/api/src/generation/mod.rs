// AI generation pipeline: validation → prompt composition → gateway call →
// extraction → classification → retry. All LLM calls go through
// llm_client::CompletionGateway — no direct HTTP from these modules.

pub mod classify;
pub mod extract;
pub mod generator;
pub mod handlers;
pub mod prompts;
pub mod retry;
pub mod schema;
pub mod session;
pub mod validation;
