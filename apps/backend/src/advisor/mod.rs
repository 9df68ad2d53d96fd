//! Finance advisor component: a thin proxy over an OpenAI-compatible chat
//! completion API with a fixed advisory system prompt, contextual guidance by
//! topic, and mandatory safety disclaimers appended to every answer.

pub mod client;
pub mod prompts;
pub mod service;

pub use client::{AdvisorConfig, ChatMessage, ChatRole, OpenAiClient};
pub use service::FinanceAdvisor;
