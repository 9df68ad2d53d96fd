//! Finance advisor orchestration: builds the message list, calls the chat
//! client, and appends the safety disclaimers to every answer.

use tracing::info;

use crate::advisor::client::{ChatCompletionResponse, ChatMessage, OpenAiClient};
use crate::advisor::prompts;
use crate::error::AppError;
use crate::errors::ErrorCode;

const ADVICE_MAX_TOKENS: u32 = 2000;
const ANALYSIS_MAX_TOKENS: u32 = 1500;
const DEFAULT_TEMPERATURE: f32 = 0.7;
const RISK_TEMPERATURE: f32 = 0.3;
const CONCEPT_TEMPERATURE: f32 = 0.5;

/// High-level advisor facade over the chat client. Owns no state beyond the
/// client; clone freely.
#[derive(Clone)]
pub struct FinanceAdvisor {
    client: OpenAiClient,
}

impl FinanceAdvisor {
    pub fn new(client: OpenAiClient) -> Self {
        Self { client }
    }

    /// Answer a financial question. The server-side system prompt plus
    /// topic-specific guidance always lead the conversation; caller-provided
    /// history is truncated to the last [`prompts::HISTORY_LIMIT`] messages.
    pub async fn get_financial_advice(
        &self,
        query: &str,
        history: &[ChatMessage],
        temperature: Option<f32>,
    ) -> Result<ChatCompletionResponse, AppError> {
        if query.trim().is_empty() {
            return Err(AppError::validation(
                ErrorCode::ValidationError,
                "Query cannot be empty",
            ));
        }

        let messages = advice_messages(query, history);

        info!(
            model = %self.client.model(),
            history_len = history.len(),
            "processing financial advice request"
        );

        let mut response = self
            .client
            .create_chat_completion(
                &messages,
                temperature.unwrap_or(DEFAULT_TEMPERATURE),
                Some(ADVICE_MAX_TOKENS),
            )
            .await?;

        append_disclaimers(&mut response);

        Ok(response)
    }

    /// Assess a risk profile from free-form questionnaire answers. Runs at a
    /// low temperature for consistent analysis.
    pub async fn assess_risk_profile(
        &self,
        answers: &serde_json::Value,
    ) -> Result<ChatCompletionResponse, AppError> {
        if !answers.is_object() || answers.as_object().is_some_and(|m| m.is_empty()) {
            return Err(AppError::validation(
                ErrorCode::ValidationError,
                "Answers must be a non-empty object",
            ));
        }

        info!("assessing financial risk profile");

        let messages = [
            ChatMessage::system(prompts::SYSTEM_INSTRUCTIONS),
            ChatMessage::user(prompts::risk_assessment_prompt(answers)),
        ];

        self.client
            .create_chat_completion(&messages, RISK_TEMPERATURE, Some(ANALYSIS_MAX_TOKENS))
            .await
    }

    /// Explain a financial concept at the requested knowledge level.
    pub async fn explain_concept(
        &self,
        concept: &str,
        knowledge_level: &str,
    ) -> Result<ChatCompletionResponse, AppError> {
        if concept.trim().is_empty() {
            return Err(AppError::validation(
                ErrorCode::ValidationError,
                "Concept cannot be empty",
            ));
        }

        info!(concept = %concept, level = %knowledge_level, "explaining financial concept");

        let messages = [
            ChatMessage::system(prompts::SYSTEM_INSTRUCTIONS),
            ChatMessage::user(prompts::concept_explanation_prompt(concept, knowledge_level)),
        ];

        self.client
            .create_chat_completion(&messages, CONCEPT_TEMPERATURE, Some(ANALYSIS_MAX_TOKENS))
            .await
    }
}

/// System prompt (with topic guidance), then the last [`prompts::HISTORY_LIMIT`]
/// history messages, then the query itself.
fn advice_messages(query: &str, history: &[ChatMessage]) -> Vec<ChatMessage> {
    let system = format!(
        "{}{}",
        prompts::SYSTEM_INSTRUCTIONS,
        prompts::contextual_instructions(query)
    );

    let mut messages = Vec::with_capacity(history.len().min(prompts::HISTORY_LIMIT) + 2);
    messages.push(ChatMessage::system(system));
    let start = history.len().saturating_sub(prompts::HISTORY_LIMIT);
    messages.extend_from_slice(&history[start..]);
    messages.push(ChatMessage::user(query));
    messages
}

fn append_disclaimers(response: &mut ChatCompletionResponse) {
    if let Some(choice) = response.choices.first_mut() {
        choice.message.content.push_str(prompts::SAFETY_DISCLAIMERS);
    }
}
