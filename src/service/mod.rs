//! HTTP surface: `POST /supplier-selection` and `GET /health`.

pub mod error;

use crate::core::requirement::RequirementId;
use crate::selection::engine::SelectionEngine;
use crate::selection::policy::SelectionMode;
use crate::selection::response::BuyerQuote;
use axum::{
    body::Bytes,
    extract::State,
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;
use serde_json::{json, Value};
use tower_http::cors::{Any, CorsLayer};

pub use error::ApiError;

/// Request body of `POST /supplier-selection`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SelectionRequest {
    #[serde(default)]
    pub requirement_id: Option<String>,
    #[serde(default)]
    pub mode: Option<String>,
    /// Accepted for compatibility; has no effect on the decision.
    #[serde(default)]
    pub force_supplier: Option<Value>,
}

/// Build the router. Every origin is allowed; preflight is answered by the CORS layer.
pub fn create_app(engine: SelectionEngine) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(health_check_handler))
        .route("/supplier-selection", post(select_supplier_handler))
        .layer(cors)
        .with_state(engine)
}

pub async fn health_check_handler() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

/// The body is parsed as JSON whatever its `Content-Type`; only a body that
/// is not a valid request object is rejected.
pub async fn select_supplier_handler(
    State(engine): State<SelectionEngine>,
    body: Bytes,
) -> Result<Json<BuyerQuote>, ApiError> {
    let request: SelectionRequest = serde_json::from_slice(&body).map_err(|e| {
        log::warn!("rejected selection request body: {}", e);
        ApiError::BadRequest("Invalid request body".to_string())
    })?;

    let requirement_id = request
        .requirement_id
        .map(RequirementId::new)
        .filter(|id| !id.is_blank())
        .ok_or_else(|| ApiError::BadRequest("requirementId is required".to_string()))?;

    if request.force_supplier.is_some() {
        log::debug!(
            "requirement {}: forceSupplier supplied and ignored",
            requirement_id
        );
    }

    let mode = SelectionMode::from_request(request.mode.as_deref());
    let outcome = engine.select(&requirement_id, mode).await?;
    Ok(Json(outcome.quote))
}
