use axum::{extract::State, http::StatusCode, routing::get, Json, Router};
use chrono::Utc;
use planora_core::config::LlmConfig;
use serde::Serialize;

#[derive(Clone)]
pub struct HealthState {
    llm_provider: String,
    missing_credentials: Option<String>,
}

impl HealthState {
    pub fn from_config(llm: &LlmConfig) -> Self {
        Self {
            llm_provider: format!("{:?}", llm.provider).to_ascii_lowercase(),
            missing_credentials: llm.missing_credentials(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct HealthCheck {
    pub status: &'static str,
    pub detail: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub service: HealthCheck,
    pub llm: HealthCheck,
    pub checked_at: String,
}

pub fn router(state: HealthState) -> Router {
    Router::new().route("/health", get(health)).with_state(state)
}

pub async fn health(State(state): State<HealthState>) -> (StatusCode, Json<HealthResponse>) {
    let llm = match &state.missing_credentials {
        None => HealthCheck {
            status: "ready",
            detail: format!("{} credentials configured", state.llm_provider),
        },
        Some(message) => HealthCheck { status: "degraded", detail: message.clone() },
    };
    let ready = llm.status == "ready";

    let payload = HealthResponse {
        status: if ready { "ready" } else { "degraded" },
        service: HealthCheck {
            status: "ready",
            detail: "planora-server runtime initialized".to_string(),
        },
        llm,
        checked_at: Utc::now().to_rfc3339(),
    };

    let status_code = if ready { StatusCode::OK } else { StatusCode::SERVICE_UNAVAILABLE };
    (status_code, Json(payload))
}
