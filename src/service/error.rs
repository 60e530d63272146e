use crate::core::error::SelectionError;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

/// Message returned for every failure that is not the caller's fault.
pub const GENERIC_FAILURE: &str = "Selection failed";

/// HTTP-facing error. Only validation and not-found messages reach the
/// caller verbatim; everything else collapses to [`GENERIC_FAILURE`].
#[derive(Debug)]
pub enum ApiError {
    BadRequest(String),
    NotFound(String),
    Internal(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            ApiError::Internal(detail) => {
                log::error!("supplier selection failed: {}", detail);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    GENERIC_FAILURE.to_string(),
                )
            }
        };
        (status, Json(json!({ "error": message }))).into_response()
    }
}

impl From<SelectionError> for ApiError {
    fn from(err: SelectionError) -> Self {
        match err {
            SelectionError::MissingRequirementId => ApiError::BadRequest(err.to_string()),
            SelectionError::RequirementNotFound(_) => {
                ApiError::NotFound("Requirement not found".to_string())
            }
            // Exhausted candidate tiers stay a 500, indistinguishable from
            // internal failures to the caller.
            SelectionError::NoSuppliersAvailable { .. }
            | SelectionError::CostOverflow { .. }
            | SelectionError::Store(_) => ApiError::Internal(err.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::error::StoreError;
    use crate::core::requirement::RequirementId;
    use crate::core::supplier::SupplierId;

    #[test]
    fn test_status_mapping() {
        let cases = [
            (SelectionError::MissingRequirementId, StatusCode::BAD_REQUEST),
            (
                SelectionError::RequirementNotFound(RequirementId::new("R")),
                StatusCode::NOT_FOUND,
            ),
            (
                SelectionError::NoSuppliersAvailable {
                    category: "steel".into(),
                },
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
            (
                SelectionError::CostOverflow {
                    supplier_id: SupplierId::new("S"),
                },
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
            (
                SelectionError::Store(StoreError::Unavailable("down".into())),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];
        for (err, status) in cases {
            let response = ApiError::from(err).into_response();
            assert_eq!(response.status(), status);
        }
    }
}
