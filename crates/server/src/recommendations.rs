use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::post,
    Json, Router,
};
use planora_agent::runtime::RecommendationRuntime;
use planora_core::domain::trip::TripContext;
use planora_core::errors::InterfaceError;
use planora_core::recommendations::{RecommendationOptions, RecommendationResponse};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use uuid::Uuid;

#[derive(Clone)]
pub struct RecommendationState {
    runtime: Arc<RecommendationRuntime>,
}

impl RecommendationState {
    pub fn new(runtime: RecommendationRuntime) -> Self {
        Self { runtime: Arc::new(runtime) }
    }
}

#[derive(Debug, Deserialize)]
pub struct RecommendationRequest {
    pub trip: TripContext,
    #[serde(default)]
    pub options: RecommendationOptions,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorBody {
    pub error: String,
    pub correlation_id: String,
}

pub fn router(state: RecommendationState) -> Router {
    Router::new().route("/api/v1/recommendations", post(recommend)).with_state(state)
}

async fn recommend(
    State(state): State<RecommendationState>,
    payload: Result<Json<RecommendationRequest>, JsonRejection>,
) -> Result<Json<RecommendationResponse>, ApiError> {
    let correlation_id = Uuid::new_v4().to_string();

    let Json(request) = payload.map_err(|rejection| {
        ApiError(InterfaceError::BadRequest {
            message: rejection.body_text(),
            correlation_id: correlation_id.clone(),
        })
    })?;

    info!(
        event_name = "recommendations.request.received",
        correlation_id = %correlation_id,
        destination = %request.trip.destination,
        category = ?request.options.category,
        limit = request.options.limit,
        "recommendation request received"
    );

    state
        .runtime
        .recommend(&request.trip, &request.options, &correlation_id)
        .await
        .map(Json)
        .map_err(|error| ApiError(error.into_interface(correlation_id.clone())))
}

pub struct ApiError(pub InterfaceError);

impl ApiError {
    fn status(&self) -> StatusCode {
        match self.0 {
            InterfaceError::BadRequest { .. } => StatusCode::BAD_REQUEST,
            InterfaceError::ServiceUnavailable { .. } => StatusCode::SERVICE_UNAVAILABLE,
            InterfaceError::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        warn!(
            event_name = "recommendations.request.failed",
            correlation_id = %self.0.correlation_id(),
            status = status.as_u16(),
            error = %self.0,
            "recommendation request failed"
        );

        // request-shape problems are safe to echo back; other details stay in the logs
        let error = match &self.0 {
            InterfaceError::BadRequest { message, .. } => message.clone(),
            other => other.user_message().to_string(),
        };
        let body = ErrorBody { error, correlation_id: self.0.correlation_id().to_string() };
        (status, Json(body)).into_response()
    }
}
