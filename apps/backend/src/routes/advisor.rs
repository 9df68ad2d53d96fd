use actix_web::{web, HttpResponse};
use serde::Deserialize;

use crate::advisor::client::ChatMessage;
use crate::advisor::FinanceAdvisor;
use crate::error::AppError;
use crate::extractors::{CurrentUser, ValidatedJson};

#[derive(Debug, Deserialize)]
pub struct AdviceRequest {
    pub query: String,
    #[serde(default)]
    pub conversation_history: Vec<ChatMessage>,
    #[serde(default)]
    pub temperature: Option<f32>,
}

#[derive(Debug, Deserialize)]
pub struct RiskAssessmentRequest {
    pub answers: serde_json::Value,
}

fn default_knowledge_level() -> String {
    "beginner".to_string()
}

#[derive(Debug, Deserialize)]
pub struct ConceptExplanationRequest {
    pub concept: String,
    #[serde(default = "default_knowledge_level")]
    pub knowledge_level: String,
}

async fn advice(
    current_user: CurrentUser,
    advisor: web::Data<FinanceAdvisor>,
    body: ValidatedJson<AdviceRequest>,
) -> Result<HttpResponse, AppError> {
    let payload = body.into_inner();
    tracing::info!(user_id = %current_user.id, "finance advice requested");

    let response = advisor
        .get_financial_advice(&payload.query, &payload.conversation_history, payload.temperature)
        .await?;

    Ok(HttpResponse::Ok().json(response))
}

async fn risk_assessment(
    current_user: CurrentUser,
    advisor: web::Data<FinanceAdvisor>,
    body: ValidatedJson<RiskAssessmentRequest>,
) -> Result<HttpResponse, AppError> {
    tracing::info!(user_id = %current_user.id, "risk assessment requested");

    let response = advisor.assess_risk_profile(&body.into_inner().answers).await?;
    Ok(HttpResponse::Ok().json(response))
}

async fn explain_concept(
    current_user: CurrentUser,
    advisor: web::Data<FinanceAdvisor>,
    body: ValidatedJson<ConceptExplanationRequest>,
) -> Result<HttpResponse, AppError> {
    let payload = body.into_inner();
    tracing::info!(user_id = %current_user.id, concept = %payload.concept, "concept explanation requested");

    let response = advisor
        .explain_concept(&payload.concept, &payload.knowledge_level)
        .await?;
    Ok(HttpResponse::Ok().json(response))
}

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/advice", web::post().to(advice))
        .route("/risk-assessment", web::post().to(risk_assessment))
        .route("/explain-concept", web::post().to(explain_concept));
}
