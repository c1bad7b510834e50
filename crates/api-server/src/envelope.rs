//! Success/failure response envelopes shared by all handlers.

use axum::http::StatusCode;
use axum::Json;
use reach_core::ReachError;
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
}

pub type ApiError = (StatusCode, Json<ErrorResponse>);

pub fn error(status: StatusCode, error: &str, message: impl Into<String>) -> ApiError {
    (
        status,
        Json(ErrorResponse {
            error: error.to_string(),
            message: message.into(),
        }),
    )
}

/// Map domain errors onto HTTP status codes and the error envelope.
/// Per-target delivery failures never reach here; they live in call logs.
pub fn from_reach_error(err: ReachError) -> ApiError {
    match &err {
        ReachError::NotFound(_) => error(StatusCode::NOT_FOUND, "not_found", err.to_string()),
        ReachError::Validation(_) => {
            error(StatusCode::BAD_REQUEST, "validation_failed", err.to_string())
        }
        ReachError::InvalidTargetRule(_) => error(
            StatusCode::UNPROCESSABLE_ENTITY,
            "invalid_target_rule",
            err.to_string(),
        ),
        ReachError::InvalidCampaignState { .. } => error(
            StatusCode::CONFLICT,
            "invalid_campaign_state",
            err.to_string(),
        ),
        ReachError::Auth(_) => error(StatusCode::UNAUTHORIZED, "auth_failed", err.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reach_core::types::CampaignStatus;

    #[test]
    fn test_state_conflict_maps_to_409() {
        let (status, body) = from_reach_error(ReachError::InvalidCampaignState {
            actual: CampaignStatus::Completed,
        });
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(body.error, "invalid_campaign_state");
    }

    #[test]
    fn test_not_found_maps_to_404() {
        let (status, _) = from_reach_error(ReachError::NotFound("campaign x".into()));
        assert_eq!(status, StatusCode::NOT_FOUND);
    }
}
